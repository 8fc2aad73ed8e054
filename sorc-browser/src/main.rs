use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sorc_browser::{ui, Browser, BrowserConfig, Flow, HttpClient};
use tracing_subscriber::EnvFilter;
use tui_input::{Input, InputRequest};

const SCROLL_STEP: usize = 1;
const PAGE_SCROLL_STEP: usize = 10;

struct App {
    browser: Browser<HttpClient>,
    input: Input,
    /// Columns the page text was wrapped to in the last frame.
    content_width: u16,
    should_quit: bool,
}

impl App {
    fn new() -> Result<Self> {
        let config = BrowserConfig::default();
        let http_client = HttpClient::new(&config)?;

        Ok(Self {
            browser: Browser::new(config, http_client),
            input: Input::default(),
            content_width: 0,
            should_quit: false,
        })
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let line = self.input.value().to_string();
                self.input = Input::default();
                // Blocks until any fetch triggered by this line has finished.
                if self.browser.submit(&line) == Flow::Exit {
                    self.should_quit = true;
                }
            }
            KeyCode::Esc => {
                self.input = Input::default();
                self.browser.cancel();
            }
            KeyCode::PageUp => self.browser.scroll_up(PAGE_SCROLL_STEP),
            KeyCode::PageDown => self.browser.scroll_down(PAGE_SCROLL_STEP, self.content_width),
            KeyCode::Up => self.browser.scroll_links_up(SCROLL_STEP),
            KeyCode::Down => self.browser.scroll_links_down(SCROLL_STEP),
            KeyCode::Char(c) => {
                self.input.handle(InputRequest::InsertChar(c));
            }
            KeyCode::Backspace => {
                self.input.handle(InputRequest::DeletePrevChar);
            }
            KeyCode::Delete => {
                self.input.handle(InputRequest::DeleteNextChar);
            }
            KeyCode::Left => {
                self.input.handle(InputRequest::GoToPrevChar);
            }
            KeyCode::Right => {
                self.input.handle(InputRequest::GoToNextChar);
            }
            KeyCode::Home => {
                self.input.handle(InputRequest::GoToStart);
            }
            KeyCode::End => {
                self.input.handle(InputRequest::GoToEnd);
            }
            _ => {}
        }
    }
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            app.content_width = ui::content_width(area, &app.browser);
            ui::render_browser(area, f.buffer_mut(), &app.browser, &app.input);
        })?;

        if app.should_quit {
            return Ok(());
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key_event(key);
            }
        }
    }
}

/// Logs go to stderr only when it is redirected, so they never draw over
/// the interface.
fn init_logging() {
    if io::stderr().is_terminal() {
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    let terminal = execute!(stdout, EnterAlternateScreen)
        .map_err(anyhow::Error::from)
        .and_then(|_| Terminal::new(CrosstermBackend::new(stdout)).map_err(anyhow::Error::from));
    if terminal.is_err() {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
    terminal.context("Failed to set up the terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let app = App::new()?;

    let mut terminal = setup_terminal()?;
    let res = run_app(&mut terminal, app);
    let restored = restore_terminal(&mut terminal).context("Failed to restore the terminal");

    res?;
    restored
}
