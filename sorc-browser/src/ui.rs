use chrono::Local;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget, Wrap},
};
use tui_input::Input;

use crate::browser::{Browser, MenuChoice, Notice, Prompt};
use crate::http_client::Fetcher;
use crate::models::{HistoryEntry, Link, ProxyConfig, Tab, TabId};

const BANNER: &str = r"
                      ::::::::      :::     ::::    :::  ::::::::
                    :+:    :+:   :+: :+:   :+:+:   :+: :+:    :+:
                   +:+         +:+   +:+  :+:+:+  +:+ +:+
                  :#:        +#++:++#++: +#+ +:+ +#+ :#:
                 +#+   +#+# +#+     +#+ +#+  +#+#+# +#+   +#+#
                #+#    #+# #+#     #+# #+#   #+#+# #+#    #+#
               ########  ###     ### ###    ####  ########
                      ::::::::  :::    ::: ::::::::::: ::::::::
                    :+:    :+: :+:    :+:     :+:    :+:    :+:
                   +:+    +:+ +:+    +:+     +:+    +:+
                  +#+    +:+ +#+    +:+     +#+    :#:
                 +#+    +#+ +#+    +#+     +#+    +#+   +#+#
                #+#    #+# #+#    #+#     #+#    #+#    #+#
               ########   ########      ###    ########
";

const MENU_HEIGHT: u16 = MenuChoice::ALL.len() as u16 + 2;
const MAX_TAB_ROWS: u16 = 5;

fn header_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
}

fn title_style(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Where each panel sits for a given terminal area.
pub struct ScreenLayout {
    pub title: Rect,
    pub tabs: Rect,
    /// Page text, or the history table while it is shown.
    pub content: Rect,
    pub links: Option<Rect>,
    pub menu: Rect,
    pub notices: Rect,
    pub prompt: Rect,
}

pub fn screen_layout<F: Fetcher>(area: Rect, browser: &Browser<F>) -> ScreenLayout {
    let tab_rows = (browser.store().len() as u16).min(MAX_TAB_ROWS);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Title
            Constraint::Length(tab_rows + 3), // Tab list
            Constraint::Min(5),               // Page
            Constraint::Length(MENU_HEIGHT),  // Menu and messages
            Constraint::Length(3),            // Prompt
        ])
        .split(area);

    let (content, links) = if browser.showing_history() || browser.active_tab().links().is_empty() {
        (chunks[2], None)
    } else {
        let page = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[2]);
        (page[0], Some(page[1]))
    };

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(20)])
        .split(chunks[3]);

    ScreenLayout {
        title: chunks[0],
        tabs: chunks[1],
        content,
        links,
        menu: bottom[0],
        notices: bottom[1],
        prompt: chunks[4],
    }
}

/// Columns available to the page text inside its border.
pub fn content_width<F: Fetcher>(area: Rect, browser: &Browser<F>) -> u16 {
    screen_layout(area, browser).content.width.saturating_sub(2)
}

/// Rows `text` occupies once wrapped to `width` columns.
pub fn wrapped_rows(text: &str, width: u16) -> usize {
    Paragraph::new(text).wrap(Wrap { trim: false }).line_count(width)
}

/// Lays out the whole screen for the current session state.
pub fn render_browser<F: Fetcher>(area: Rect, buf: &mut Buffer, browser: &Browser<F>, input: &Input) {
    let layout = screen_layout(area, browser);
    let store = browser.store();

    TitleBar::render(layout.title, buf, store.active_id());
    TabList::render(layout.tabs, buf, store.tabs(), store.active_id());

    let tab = browser.active_tab();
    if browser.showing_history() {
        HistoryTable::render(layout.content, buf, &tab.history);
    } else {
        ContentArea::render(layout.content, buf, tab);
        if let Some(links) = layout.links {
            LinkTable::render(links, buf, tab.links(), tab.link_offset);
        }
    }

    MenuPanel::render(layout.menu, buf);
    NoticePanel::render(layout.notices, buf, browser.notices(), browser.proxy());
    PromptBar::render(layout.prompt, buf, browser.prompt(), input);
}

pub struct TitleBar;

impl TitleBar {
    pub fn render(area: Rect, buf: &mut Buffer, active: TabId) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" SorcBrowser ", title_style(Color::Green)));

        Paragraph::new(Span::styled(format!("Active Tab: {active}"), title_style(Color::Cyan)))
            .block(block)
            .render(area, buf);
    }
}

pub struct TabList;

impl TabList {
    pub fn render<'a>(area: Rect, buf: &mut Buffer, tabs: impl Iterator<Item = &'a Tab>, active: TabId) {
        let tabs: Vec<&Tab> = tabs.collect();
        let rows: Vec<Row> = tabs
            .iter()
            .map(|tab| {
                let url_style = if tab.id == active {
                    title_style(Color::Green)
                } else {
                    Style::default().fg(Color::Yellow)
                };
                Row::new(vec![
                    Cell::from(tab.id.to_string()).style(Style::default().fg(Color::Cyan)),
                    Cell::from(tab.title()).style(url_style),
                ])
            })
            .collect();

        // Keep the active tab on screen when there are more tabs than rows.
        let visible = area.height.saturating_sub(3).max(1) as usize;
        let position = tabs.iter().position(|tab| tab.id == active).unwrap_or(0);
        let offset = (position + 1).saturating_sub(visible);

        let table = Table::new(rows, [Constraint::Length(4), Constraint::Min(10)])
            .header(Row::new(vec!["ID", "URL"]).style(header_style()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" Tabs ", title_style(Color::Blue))),
            );

        let mut state = TableState::default().with_offset(offset);
        StatefulWidget::render(table, area, buf, &mut state);
    }
}

pub struct ContentArea;

impl ContentArea {
    pub fn render(area: Rect, buf: &mut Buffer, tab: &Tab) {
        let Some(page) = tab.page.as_ref() else {
            let mut lines: Vec<Line> = BANNER
                .lines()
                .map(|line| Line::styled(line.to_string(), title_style(Color::Green)))
                .collect();
            lines.push(Line::styled("Welcome to SorcBrowser!", title_style(Color::Green)));
            lines.push(Line::styled(
                "Choose 3 to enter a URL.",
                Style::default().fg(Color::DarkGray),
            ));

            Paragraph::new(Text::from(lines))
                .block(Block::default().borders(Borders::ALL).title(" New Tab "))
                .render(area, buf);
            return;
        };

        let block = Block::default().borders(Borders::ALL).title(Line::from(vec![
            Span::styled(" Current page: ", title_style(Color::Cyan)),
            Span::styled(format!("{} ", page.url), Style::default().fg(Color::Yellow)),
        ]));

        // The width may have shrunk since the offset was set.
        let rows = wrapped_rows(&page.content, block.inner(area).width);
        let scroll = tab.scroll_offset.min(rows.saturating_sub(1)).min(u16::MAX as usize) as u16;
        Paragraph::new(page.content.as_str())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(area, buf);
    }
}

pub struct LinkTable;

impl LinkTable {
    pub fn render(area: Rect, buf: &mut Buffer, links: &[Link], offset: usize) {
        let rows: Vec<Row> = links
            .iter()
            .enumerate()
            .map(|(idx, link)| {
                Row::new(vec![
                    Cell::from((idx + 1).to_string()).style(Style::default().fg(Color::Cyan)),
                    Cell::from(link.text.as_str()).style(Style::default().fg(Color::Green)),
                    Cell::from(link.url.as_str()).style(Style::default().fg(Color::Yellow)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Percentage(35),
                Constraint::Percentage(65),
            ],
        )
        .header(Row::new(vec!["#", "Link Text", "URL"]).style(header_style()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Page Links (↑/↓) ", title_style(Color::Blue))),
        );

        let mut state = TableState::default().with_offset(offset.min(links.len().saturating_sub(1)));
        StatefulWidget::render(table, area, buf, &mut state);
    }
}

pub struct HistoryTable;

impl HistoryTable {
    /// Most recent entry first.
    pub fn render(area: Rect, buf: &mut Buffer, history: &[HistoryEntry]) {
        let rows: Vec<Row> = history
            .iter()
            .rev()
            .enumerate()
            .map(|(idx, entry)| {
                let visited = entry.visited_at.with_timezone(&Local).format("%H:%M:%S");
                Row::new(vec![
                    Cell::from((idx + 1).to_string()).style(Style::default().fg(Color::Cyan)),
                    Cell::from(entry.url.as_str()).style(Style::default().fg(Color::Yellow)),
                    Cell::from(visited.to_string()).style(Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [Constraint::Length(4), Constraint::Min(10), Constraint::Length(10)],
        )
        .header(Row::new(vec!["#", "URL", "Visited"]).style(header_style()))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Browsing History ", title_style(Color::Blue))),
        );

        Widget::render(table, area, buf);
    }
}

pub struct MenuPanel;

impl MenuPanel {
    pub fn render(area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = MenuChoice::ALL
            .iter()
            .map(|choice| {
                Line::from(vec![
                    Span::styled(format!("{}. ", choice.key()), Style::default().fg(Color::Cyan)),
                    Span::raw(choice.label()),
                ])
            })
            .collect();

        Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" Choose an action ", title_style(Color::White))),
            )
            .render(area, buf);
    }
}

pub struct NoticePanel;

impl NoticePanel {
    pub fn render(area: Rect, buf: &mut Buffer, notices: &[Notice], proxy: Option<&ProxyConfig>) {
        let mut lines: Vec<Line> = notices
            .iter()
            .map(|notice| {
                let color = if notice.is_error() { Color::Red } else { Color::Green };
                Line::styled(notice.text().to_string(), title_style(color))
            })
            .collect();

        let proxy_line = match proxy {
            Some(proxy) => format!("Proxy: {}", proxy.http),
            None => "Proxy: none".to_string(),
        };
        lines.push(Line::styled(proxy_line, Style::default().fg(Color::DarkGray)));

        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Messages "))
            .render(area, buf);
    }
}

pub struct PromptBar;

impl PromptBar {
    pub fn render(area: Rect, buf: &mut Buffer, prompt: Prompt, input: &Input) {
        let hint = if prompt.is_cancellable() {
            " Esc: cancel | PgUp/PgDn: scroll "
        } else {
            " PgUp/PgDn: scroll "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Yellow))
            .title(Span::styled(format!(" {}", prompt.label()), title_style(Color::White)))
            .title_bottom(Line::from(hint).right_aligned());

        let inner_area = block.inner(area);
        block.render(area, buf);

        if prompt == Prompt::Acknowledge {
            return;
        }

        let width = inner_area.width as usize;
        let scroll = input.visual_scroll(width.saturating_sub(1));
        Paragraph::new(input.value())
            .style(Style::default().fg(Color::White))
            .scroll((0, scroll as u16))
            .render(inner_area, buf);

        // Draw cursor
        let cursor = input.visual_cursor().saturating_sub(scroll);
        if cursor < width {
            if let Some(cell) = buf.cell_mut((inner_area.x + cursor as u16, inner_area.y)) {
                cell.set_style(Style::default().bg(Color::White).fg(Color::Black));
            }
        }
    }
}
