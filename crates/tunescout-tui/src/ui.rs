// UI rendering logic
use crate::{App, InputMode};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use tunescout_core::{
    fallback::quick_searches, FallbackReason, SearchBackend, SearchMode, SearchResult,
    SessionState, Source, Tab,
};

pub fn render<B: SearchBackend>(frame: &mut Frame, app: &mut App<B>) {
    let session = app.session().clone();

    // Notice and error rows only take space when there is something to say
    let notice_height = if session.is_fallback { 3 } else { 0 };
    let error_height = if session.error.is_some() { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),              // Header + mode
            Constraint::Length(3),              // Tabs
            Constraint::Length(3),              // Search input
            Constraint::Length(notice_height),  // Fallback notice
            Constraint::Length(error_height),   // Error
            Constraint::Min(5),                 // Results
            Constraint::Length(4),              // Now playing
            Constraint::Length(1),              // Status bar
        ])
        .split(frame.area());

    render_header(frame, &session, chunks[0]);
    render_tabs(frame, &session, chunks[1]);
    render_search_input(frame, app, chunks[2]);
    if session.is_fallback {
        render_fallback_notice(frame, &session, chunks[3]);
    }
    if let Some(error) = &session.error {
        render_error(frame, error, chunks[4]);
    }

    if session.loading {
        render_loading(frame, chunks[5]);
    } else if session.current_results().is_empty() {
        render_quick_searches(frame, &session, chunks[5]);
    } else {
        render_results_list(frame, app, &session, chunks[5]);
    }

    render_now_playing(frame, &session, chunks[6]);
    render_status_bar(frame, app, chunks[7]);
}

fn source_color(source: Source) -> Color {
    match source {
        Source::YouTube => Color::Red,
        Source::Jamendo => Color::Rgb(255, 165, 0),
    }
}

fn render_header(frame: &mut Frame, session: &SessionState, area: Rect) {
    let mode = match session.mode {
        SearchMode::Single => Span::styled(
            " Single Source ",
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        SearchMode::Dual => Span::styled(
            " Dual Search ",
            Style::default().fg(Color::Black).bg(Color::Magenta),
        ),
    };

    let line = Line::from(vec![
        Span::styled(
            "♪ TuneScout",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Free music from YouTube and Jamendo", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        mode,
    ]);

    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_tabs(frame: &mut Frame, session: &SessionState, area: Rect) {
    let tabs: Vec<(Tab, String)> = match session.mode {
        SearchMode::Single => vec![
            (Tab::YouTube, "YouTube".to_string()),
            (Tab::Jamendo, "Jamendo".to_string()),
        ],
        SearchMode::Dual => {
            let (yt, jm, all) = session.result_counts();
            vec![
                (Tab::All, format!("All ({})", all)),
                (Tab::YouTube, format!("YouTube ({})", yt)),
                (Tab::Jamendo, format!("Jamendo ({})", jm)),
            ]
        }
    };

    let mut spans = Vec::new();
    for (tab, label) in tabs {
        let style = if tab == session.active_tab {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", label), style));
        spans.push(Span::raw(" "));
    }

    let title = match session.mode {
        SearchMode::Single => " Source (Tab to switch) ",
        SearchMode::Dual => " Results (Tab to switch) ",
    };
    let widget = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(widget, area);
}

fn render_search_input<B: SearchBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let input_style = match app.input_mode {
        InputMode::Searching => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default(),
    };

    let input = Paragraph::new(app.search_input.as_str())
        .style(input_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Search (ESC to navigate, / to search)")
                .border_style(input_style),
        );

    frame.render_widget(input, area);

    if app.input_mode == InputMode::Searching {
        frame.set_cursor_position((
            area.x + app.search_input.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}

fn render_fallback_notice(frame: &mut Frame, session: &SessionState, area: Rect) {
    let detail = match &session.fallback_reason {
        Some(FallbackReason::Unreachable) => "looks blocked on this network",
        Some(FallbackReason::NoResults) => "had nothing for this search",
        Some(FallbackReason::Failed(_)) | None => "returned an error",
    };
    let line = Line::from(vec![
        Span::styled(
            "⚠ YouTube Unavailable",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" - YouTube {}. Showing free music from Jamendo instead.", detail)),
    ]);

    let notice = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(notice, area);
}

fn render_error(frame: &mut Frame, error: &str, area: Rect) {
    let widget = Paragraph::new(Span::styled(error, Style::default().fg(Color::Red)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Error ")
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Searching...",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Results (Loading...) "))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_quick_searches(frame: &mut Frame, session: &SessionState, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Nothing here yet. Try one of these:",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    for (i, query) in quick_searches(session.active_tab).iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", i + 1), Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(format!(" {}", query)),
        ]));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Quick Searches "));
    frame.render_widget(widget, area);
}

fn result_item(result: &SearchResult, show_badge: bool, playing: bool, selected: bool) -> ListItem<'static> {
    let mut spans = Vec::new();
    if playing {
        spans.push(Span::styled("▶ ", Style::default().fg(Color::Green)));
    } else {
        spans.push(Span::raw("  "));
    }
    if show_badge {
        spans.push(Span::styled(
            format!(" {} ", result.source.badge()),
            Style::default()
                .fg(Color::Black)
                .bg(source_color(result.source))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    let title_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    spans.push(Span::styled(result.title.clone(), title_style));
    spans.push(Span::styled(
        format!("  {}", result.creator()),
        Style::default().fg(Color::DarkGray),
    ));

    ListItem::new(Line::from(spans))
}

fn render_results_list<B: SearchBackend>(
    frame: &mut Frame,
    app: &mut App<B>,
    session: &SessionState,
    area: Rect,
) {
    let results = session.current_results();
    let show_badge = session.active_tab == Tab::All;

    let items: Vec<ListItem> = results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            result_item(
                result,
                show_badge,
                session.is_playing(result),
                i == app.selected_index,
            )
        })
        .collect();

    let title = format!(" {} results ({}) ", session.active_tab, results.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray));

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_now_playing(frame: &mut Frame, session: &SessionState, area: Rect) {
    let lines = match session.now_playing() {
        Some(track) => {
            let how = match track.source {
                Source::YouTube => "video opened in browser",
                Source::Jamendo => "audio stream opened",
            };
            vec![
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", track.source.badge()),
                        Style::default().fg(Color::Black).bg(source_color(track.source)),
                    ),
                    Span::raw(" "),
                    Span::styled(track.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ]),
                Line::from(Span::styled(
                    format!("{} · {}", track.creator(), how),
                    Style::default().fg(Color::DarkGray),
                )),
            ]
        }
        None => vec![Line::from(Span::styled(
            "Nothing playing",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let widget =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Now Playing "));
    frame.render_widget(widget, area);
}

fn render_status_bar<B: SearchBackend>(frame: &mut Frame, app: &App<B>, area: Rect) {
    let text = match (&app.status_message, app.input_mode) {
        (Some(msg), _) => Span::styled(msg.clone(), Style::default().fg(Color::Yellow)),
        (None, InputMode::Searching) => Span::styled(
            "Enter: search  Esc: results",
            Style::default().fg(Color::DarkGray),
        ),
        (None, InputMode::Normal) => Span::styled(
            "/: search  j/k: move  Enter: play  Tab: switch  d: dual mode  1-5: quick search  q: quit",
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(text)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;
    use tunescout_core::{FetchError, SearchOrchestrator};

    struct Blocked;

    #[async_trait]
    impl SearchBackend for Blocked {
        async fn fetch(
            &self,
            source: Source,
            query: &str,
            _timeout: Duration,
        ) -> Result<Vec<SearchResult>, FetchError> {
            match source {
                Source::YouTube => Err(FetchError::Timeout(Duration::from_secs(8))),
                Source::Jamendo => Ok(vec![SearchResult {
                    id: "1".into(),
                    title: format!("{} mix", query),
                    source,
                    thumbnail: None,
                    channel: None,
                    artwork: None,
                    artist: Some("Free Artist".into()),
                    stream_url: Some("https://stream/1".into()),
                    license: None,
                }]),
            }
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_empty_screen_shows_quick_searches() {
        let mut app = App::new(SearchOrchestrator::new(Blocked));
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();

        terminal.draw(|f| render(f, &mut app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Quick Searches"));
        assert!(text.contains("Nothing playing"));
    }

    #[tokio::test]
    async fn test_fallback_notice_is_rendered() {
        let mut app = App::new(SearchOrchestrator::new(Blocked));
        app.submit_search().await;

        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("YouTube Unavailable"));
        assert!(text.contains("Coke Studio Pakistan mix"));
    }
}
