// Integration tests for the tab store, extractor and models

mod common;

use common::{example_site, MockFetcher};
use sorc_browser::{extract, BrowserConfig, BrowserError, Link, MenuChoice, TabId, TabStore};

#[test]
fn test_new_store_has_one_active_empty_tab() {
    let store = TabStore::new();
    assert_eq!(store.len(), 1);
    assert_eq!(store.active_id(), TabId(1));

    let tab = store.active_tab();
    assert!(tab.history.is_empty());
    assert!(tab.content().is_none());
    assert!(tab.current_url().is_none());
    assert_eq!(tab.title(), "New Tab");
}

#[test]
fn test_new_tab_becomes_active_and_ids_are_never_reused() {
    let mut store = TabStore::new();
    assert_eq!(store.new_tab(), TabId(2));
    assert_eq!(store.new_tab(), TabId(3));
    assert_eq!(store.active_id(), TabId(3));

    store.close_tab(TabId(3)).unwrap();
    assert_eq!(store.new_tab(), TabId(4));
    let ids: Vec<TabId> = store.tabs().map(|tab| tab.id).collect();
    assert_eq!(ids, vec![TabId(1), TabId(2), TabId(4)]);
}

#[test]
fn test_switch_tab() {
    let mut store = TabStore::new();
    store.new_tab();
    store.switch_tab(TabId(1)).unwrap();
    assert_eq!(store.active_id(), TabId(1));

    assert_eq!(store.switch_tab(TabId(7)), Err(BrowserError::NotFound(TabId(7))));
    assert_eq!(store.active_id(), TabId(1));
}

#[test]
fn test_close_non_active_tab_keeps_active() {
    let mut store = TabStore::new();
    store.new_tab();
    store.new_tab();
    store.switch_tab(TabId(2)).unwrap();

    store.close_tab(TabId(3)).unwrap();
    assert_eq!(store.active_id(), TabId(2));
    store.close_tab(TabId(1)).unwrap();
    assert_eq!(store.active_id(), TabId(2));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_close_active_tab_activates_oldest_remaining() {
    let mut store = TabStore::new();
    store.new_tab();
    store.new_tab();
    store.close_tab(TabId(1)).unwrap();
    assert_eq!(store.active_id(), TabId(3));

    store.close_tab(TabId(3)).unwrap();
    assert_eq!(store.active_id(), TabId(2));
    assert!(store.contains(store.active_id()));
}

#[test]
fn test_close_last_tab_is_refused() {
    let mut store = TabStore::new();
    assert_eq!(store.close_tab(TabId(1)), Err(BrowserError::LastTab));
    assert_eq!(store.len(), 1);
    assert_eq!(store.active_id(), TabId(1));
}

#[test]
fn test_close_unknown_tab() {
    let mut store = TabStore::new();
    store.new_tab();
    assert_eq!(store.close_tab(TabId(9)), Err(BrowserError::NotFound(TabId(9))));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_first_navigation_leaves_history_empty() {
    let fetcher = example_site();
    let mut store = TabStore::new();
    store.navigate(TabId(1), "http://example.com", &fetcher, None).unwrap();

    let tab = store.active_tab();
    assert_eq!(tab.current_url(), Some("http://example.com"));
    assert!(tab.content().unwrap().contains("Example"));
    assert_eq!(tab.links(), &[Link::new("About", "http://example.com/about")]);
    assert!(tab.history.is_empty());
}

#[test]
fn test_navigation_pushes_previous_url_only() {
    let fetcher = example_site();
    let mut store = TabStore::new();
    store.navigate(TabId(1), "http://example.com", &fetcher, None).unwrap();
    store.navigate(TabId(1), "http://example.com/about", &fetcher, None).unwrap();

    let tab = store.active_tab();
    assert_eq!(tab.current_url(), Some("http://example.com/about"));
    assert_eq!(tab.history_urls(), vec!["http://example.com"]);
    assert_eq!(
        tab.links(),
        &[
            Link::new("Home", "http://example.com/"),
            Link::new("Team", "http://example.com/team"),
        ]
    );
}

#[test]
fn test_failed_navigation_changes_nothing() {
    let fetcher = example_site();
    let mut store = TabStore::new();
    store.navigate(TabId(1), "http://example.com", &fetcher, None).unwrap();

    let err = store
        .navigate(TabId(1), "http://missing.example", &fetcher, None)
        .unwrap_err();
    assert!(matches!(err, BrowserError::Fetch(_)));

    let tab = store.active_tab();
    assert_eq!(tab.current_url(), Some("http://example.com"));
    assert!(tab.history.is_empty());
    assert_eq!(tab.links().len(), 1);
}

#[test]
fn test_navigate_unknown_tab_does_not_fetch() {
    let fetcher = example_site();
    let mut store = TabStore::new();
    let err = store
        .navigate(TabId(5), "http://example.com", &fetcher, None)
        .unwrap_err();
    assert_eq!(err, BrowserError::NotFound(TabId(5)));
    assert!(fetcher.calls().is_empty());
}

#[test]
fn test_go_back_with_empty_history() {
    let fetcher = example_site();
    let mut store = TabStore::new();
    store.navigate(TabId(1), "http://example.com", &fetcher, None).unwrap();

    assert_eq!(
        store.go_back(TabId(1), &fetcher, None),
        Err(BrowserError::EmptyHistory)
    );
    assert_eq!(store.active_tab().current_url(), Some("http://example.com"));
    assert_eq!(fetcher.calls().len(), 1);
}

#[test]
fn test_go_back_refetches_previous_page() {
    let fetcher = example_site();
    let mut store = TabStore::new();
    store.navigate(TabId(1), "http://example.com", &fetcher, None).unwrap();
    store.navigate(TabId(1), "http://example.com/about", &fetcher, None).unwrap();

    store.go_back(TabId(1), &fetcher, None).unwrap();
    let tab = store.active_tab();
    assert_eq!(tab.current_url(), Some("http://example.com"));
    assert!(tab.history.is_empty());
    assert_eq!(
        fetcher.urls(),
        vec!["http://example.com", "http://example.com/about", "http://example.com"]
    );
}

#[test]
fn test_failed_go_back_drops_the_history_entry() {
    let fetcher = example_site();
    let mut store = TabStore::new();
    store.navigate(TabId(1), "http://example.com", &fetcher, None).unwrap();
    store.navigate(TabId(1), "http://example.com/about", &fetcher, None).unwrap();
    fetcher.remove_page("http://example.com");

    let err = store.go_back(TabId(1), &fetcher, None).unwrap_err();
    assert!(matches!(err, BrowserError::Fetch(_)));

    let tab = store.active_tab();
    assert_eq!(tab.current_url(), Some("http://example.com/about"));
    assert!(tab.history.is_empty());
}

#[test]
fn test_tabs_keep_separate_histories() {
    let fetcher = example_site();
    let mut store = TabStore::new();
    store.navigate(TabId(1), "http://example.com", &fetcher, None).unwrap();
    store.navigate(TabId(1), "http://example.com/about", &fetcher, None).unwrap();
    let second = store.new_tab();
    store.navigate(second, "http://example.com", &fetcher, None).unwrap();

    assert!(store.get(second).unwrap().history.is_empty());
    assert_eq!(store.get(TabId(1)).unwrap().history.len(), 1);
}

#[test]
fn test_extract_resolves_relative_hrefs() {
    let page = extract(r#"<a href="/x">X</a>"#, "http://a.com/y/z");
    assert_eq!(page.links, vec![Link::new("X", "http://a.com/x")]);

    let page = extract(
        r##"<a href="w">path</a><a href="//cdn.b.com/s">scheme</a><a href="#top">frag</a>"##,
        "http://a.com/y/z",
    );
    let urls: Vec<&str> = page.links.iter().map(|link| link.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["http://a.com/y/w", "http://cdn.b.com/s", "http://a.com/y/z#top"]
    );
}

#[test]
fn test_extract_labels_empty_anchor_with_url() {
    let page = extract(r#"<a href="http://b.com">   </a>"#, "http://a.com/");
    assert_eq!(page.links, vec![Link::new("http://b.com", "http://b.com")]);

    let page = extract(r#"<a href="/img"><img src="x.png"></a>"#, "http://a.com/");
    assert_eq!(page.links[0].text, "http://a.com/img");
}

#[test]
fn test_extract_skips_anchors_without_href_and_keeps_order() {
    let html = r#"<a name="top">Top</a><a href="/2">Two</a><p>text</p><a href="/3"> Three
        words </a>"#;
    let page = extract(html, "http://a.com/");
    assert_eq!(
        page.links,
        vec![
            Link::new("Two", "http://a.com/2"),
            Link::new("Three words", "http://a.com/3"),
        ]
    );
}

#[test]
fn test_extract_visible_text_only() {
    let html = "<html><head><title>T</title><style>p { color: red }</style></head>\
                <body><h1>Hello</h1><script>var x = 1;</script><p>World   wide</p></body></html>";
    let page = extract(html, "http://a.com/");
    assert!(page.text.contains("Hello"));
    assert!(page.text.contains("World wide"));
    assert!(!page.text.contains("var x"));
    assert!(!page.text.contains("color"));
    assert!(page.text.find("Hello").unwrap() < page.text.find("World").unwrap());
}

#[test]
fn test_extract_tolerates_malformed_markup() {
    let page = extract(
        "<p>unclosed <a href='/ok'>ok</a></i><div><span>deep",
        "http://a.com/",
    );
    assert_eq!(page.links.len(), 1);
    assert_eq!(page.links[0].url, "http://a.com/ok");
    assert!(page.text.contains("deep"));

    let page = extract("", "not a url");
    assert!(page.text.is_empty());
    assert!(page.links.is_empty());
}

#[test]
fn test_extract_without_usable_base_keeps_href() {
    let page = extract(r#"<a href="/x">X</a>"#, "not a url");
    assert_eq!(page.links, vec![Link::new("X", "/x")]);
}

#[test]
fn test_normalize_url() {
    let config = BrowserConfig::default();
    assert_eq!(config.normalize_url("example.com"), "http://example.com");
    assert_eq!(config.normalize_url(" https://example.com "), "https://example.com");
    assert_eq!(config.normalize_url("http://example.com/a"), "http://example.com/a");
}

#[test]
fn test_menu_choice_parsing() {
    assert_eq!("1".parse::<MenuChoice>(), Ok(MenuChoice::FollowLink));
    assert_eq!(" 9 ".parse::<MenuChoice>(), Ok(MenuChoice::Exit));
    assert!("0".parse::<MenuChoice>().is_err());
    assert!("10".parse::<MenuChoice>().is_err());
    assert!("x".parse::<MenuChoice>().is_err());
    assert_eq!(MenuChoice::SetProxy.key(), 8);
}

#[test]
fn test_tab_id_parsing() {
    assert_eq!("3".parse::<TabId>(), Ok(TabId(3)));
    assert!("-1".parse::<TabId>().is_err());
    assert!("one".parse::<TabId>().is_err());
    assert!("+3".parse::<TabId>().is_err());
    assert!(" 3".parse::<TabId>().is_err());
    assert!("".parse::<TabId>().is_err());
}

#[test]
fn test_mock_fetcher_reports_missing_pages() {
    let fetcher = MockFetcher::new();
    let mut store = TabStore::new();
    let err = store
        .navigate(TabId(1), "http://nowhere", &fetcher, None)
        .unwrap_err();
    assert!(err.to_string().starts_with("Request error:"));
}
