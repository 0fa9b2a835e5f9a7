// TUI event loop and terminal management
use crate::{App, InputMode};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{info, warn};
use tunescout_core::SearchBackend;

pub async fn run_tui<B: SearchBackend>(mut app: App<B>) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app).await;

    // Restore terminal even when the loop bailed out
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<B: SearchBackend>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<B>,
) -> anyhow::Result<()> {
    // Open on results for the default query, like a fresh page load
    app.mark_loading();
    terminal.draw(|f| crate::ui::render(f, app))?;
    app.initial_search().await;

    loop {
        terminal.draw(|f| crate::ui::render(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Searching => match key.code {
                KeyCode::Enter => {
                    if !app.search_input.trim().is_empty() {
                        app.enter_normal_mode();
                        // Draw the loading state before blocking on the search
                        app.mark_loading();
                        terminal.draw(|f| crate::ui::render(f, app))?;
                        app.submit_search().await;
                    }
                }
                KeyCode::Char(c) => {
                    app.search_input.push(c);
                }
                KeyCode::Backspace => {
                    app.search_input.pop();
                }
                KeyCode::Esc => {
                    app.enter_normal_mode();
                }
                _ => {}
            },
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => {
                    app.should_quit = true;
                }
                KeyCode::Char('/') => {
                    app.enter_search_mode();
                }
                KeyCode::Tab => {
                    app.next_tab();
                }
                KeyCode::Char('d') => {
                    app.toggle_mode();
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    app.next_result();
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    app.previous_result();
                }
                KeyCode::Char(c @ '1'..='5') if app.visible_results().is_empty() => {
                    let index = c as usize - '1' as usize;
                    if app.run_quick_search(index).await {
                        info!("Quick search: {}", app.search_input);
                    }
                }
                KeyCode::Enter => {
                    if let Some(url) = app.play_selected() {
                        // Videos go to the watch page, audio to the raw stream
                        if let Err(e) = open::that(&url) {
                            warn!("Failed to open {}: {}", url, e);
                            app.status_message = Some(format!("Failed to open player: {}", e));
                        }
                    }
                }
                _ => {}
            },
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
