//! Rendering - UI drawing functions for both pages, header, notice and footer

use crate::analyze::AnalyzePhase;
use crate::app::{AppState, NoticeKind, Page};
use crate::dashboard::{truncate, QuickStats, TicketRow, NO_RESULTS_NOTICE, TABLE_HEADERS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};
use triage_shared::helpers::{format_date_time, Tone};

use super::input::{Focus, TuiView};

const DESCRIPTION_CELL_WIDTH: usize = 48;

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Red => Color::Red,
        Tone::Orange => Color::LightRed,
        Tone::Yellow => Color::Yellow,
        Tone::Green => Color::Green,
        Tone::Gray => Color::Gray,
    }
}

fn input_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { Color::Yellow } else { Color::Gray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
}

/// Place the cursor after `text` inside a bordered single-line input
fn set_input_cursor(f: &mut Frame, area: Rect, text: &str) {
    let max = area.width.saturating_sub(2);
    let x = (text.chars().count() as u16).min(max.saturating_sub(1));
    f.set_cursor(area.x + 1 + x, area.y + 1);
}

/// Draw the whole UI
pub fn draw_ui(f: &mut Frame, app: &AppState, view: &TuiView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Navigation
            Constraint::Min(10),   // Page
            Constraint::Length(1), // Notice
            Constraint::Length(3), // Footer
        ])
        .split(f.size());

    draw_nav(f, chunks[0], app.page());
    match app.page() {
        Page::Dashboard => draw_dashboard(f, chunks[1], app, view),
        Page::Analyze => draw_analyze(f, chunks[1], app, view),
    }
    draw_notice(f, chunks[2], app);
    draw_footer(f, chunks[3], app.page());
}

fn draw_nav(f: &mut Frame, area: Rect, page: Page) {
    let selected = Page::ALL.iter().position(|p| *p == page).unwrap_or(0);
    let title = format!(" Incident Triage v{} ", env!("TRIAGE_VERSION"));

    let tabs = Tabs::new(Page::ALL.iter().map(|p| p.title()).collect::<Vec<_>>())
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    title,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        )
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    f.render_widget(tabs, area);
}

fn draw_dashboard(f: &mut Frame, area: Rect, app: &AppState, view: &TuiView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stat cards
            Constraint::Length(3), // Search and filter
            Constraint::Min(5),    // Table
        ])
        .split(area);

    draw_stat_cards(f, chunks[0], &QuickStats::from_tickets(app.store().tickets()));
    draw_search_bar(f, chunks[1], app);
    draw_ticket_table(f, chunks[2], app, view);
}

fn draw_stat_cards(f: &mut Frame, area: Rect, stats: &QuickStats) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    let values = [
        ("Total Tickets", stats.total, Color::Cyan),
        ("Resolved", stats.resolved, Color::Green),
        ("Open", stats.open, Color::Red),
        ("In Progress", stats.in_progress, Color::Yellow),
    ];

    for ((label, value, color), card) in values.into_iter().zip(cards.iter()) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", label)),
        );
        f.render_widget(paragraph, *card);
    }
}

fn draw_search_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(24)])
        .split(area);

    let input = app.dashboard().search_input();
    let search = Paragraph::new(input).block(input_block(" Search tickets ", true));
    f.render_widget(search, chunks[0]);
    set_input_cursor(f, chunks[0], input);

    let filter = Paragraph::new(app.dashboard().status_filter().label())
        .style(Style::default().fg(Color::Cyan))
        .block(input_block(" Status (Ctrl+F) ", false));
    f.render_widget(filter, chunks[1]);
}

fn draw_ticket_table(f: &mut Frame, area: Rect, app: &AppState, view: &TuiView) {
    let visible = app.dashboard().visible(app.store().tickets());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(format!(" Tickets ({}) ", visible.len()));

    if visible.is_empty() {
        let empty = Paragraph::new(NO_RESULTS_NOTICE)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = visible
        .iter()
        .map(|ticket| {
            let row = TicketRow::from(*ticket);
            Row::new(vec![
                Cell::from(row.title),
                Cell::from(truncate(&row.description, DESCRIPTION_CELL_WIDTH)),
                Cell::from(row.status).style(Style::default().fg(tone_color(row.status_tone))),
                Cell::from(row.priority).style(Style::default().fg(tone_color(row.priority_tone))),
                Cell::from(row.category),
                Cell::from(row.created),
                Cell::from(row.resolved),
            ])
        })
        .collect();

    let header = Row::new(TABLE_HEADERS.to_vec())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(30),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(16),
        Constraint::Length(13),
        Constraint::Length(13),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = TableState::default();
    state.select(Some(view.selected_row.min(visible.len() - 1)));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_analyze(f: &mut Frame, area: Rect, app: &AppState, view: &TuiView) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_analyze_form(f, halves[0], app, view);
    draw_result_panel(f, halves[1], app, view);
}

fn draw_analyze_form(f: &mut Frame, area: Rect, app: &AppState, view: &TuiView) {
    let form = app.analyze().form();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Description
            Constraint::Length(3), // File path
            Constraint::Length(2), // Attachment and submit state
        ])
        .split(area);

    let title = Paragraph::new(form.title.as_str())
        .block(input_block(" Ticket Title ", view.focus == Focus::Title));
    f.render_widget(title, chunks[0]);

    let mut description = form.description.clone();
    if view.focus == Focus::Description {
        description.push('▏');
    }
    let description = Paragraph::new(description)
        .wrap(Wrap { trim: false })
        .block(input_block(" Description ", view.focus == Focus::Description));
    f.render_widget(description, chunks[1]);

    let file = Paragraph::new(view.file_input.as_str()).block(input_block(
        " Log file path (Enter attach, Del remove) ",
        view.focus == Focus::FilePath,
    ));
    f.render_widget(file, chunks[2]);

    let attachment = match &form.file {
        Some(file) => Line::from(vec![
            Span::styled("Attached: ", Style::default().fg(Color::Gray)),
            Span::raw(format!("{} ({} KB)", file.name(), file.meta.size.div_ceil(1024))),
        ]),
        None => Line::from(Span::styled("No file attached", Style::default().fg(Color::Gray))),
    };
    let submit = if app.analyze().phase() == AnalyzePhase::Submitting {
        Line::from(Span::styled("Analyzing...", Style::default().fg(Color::Yellow)))
    } else if app.analyze().can_submit() {
        Line::from(Span::styled(
            "Ready - Ctrl+S to analyze",
            Style::default().fg(Color::Green),
        ))
    } else {
        Line::from(Span::styled(
            "Enter a title and a description or attach a file",
            Style::default().fg(Color::Gray),
        ))
    };
    f.render_widget(Paragraph::new(vec![attachment, submit]), chunks[3]);

    match view.focus {
        Focus::Title => set_input_cursor(f, chunks[0], &form.title),
        Focus::FilePath => set_input_cursor(f, chunks[2], &view.file_input),
        _ => {}
    }
}

fn draw_result_panel(f: &mut Frame, area: Rect, app: &AppState, view: &TuiView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(" Analysis Results ");

    let Some(analysis) = app.analyze().analysis() else {
        let empty = Paragraph::new("Submit a ticket to see the predicted root cause.")
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled("Root Cause", heading)),
        Line::from(Span::styled(
            analysis.result.root_cause.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Summary", heading)),
        Line::from(analysis.result.summary.as_str()),
        Line::from(""),
    ];
    if !analysis.result.similar_cases.is_empty() {
        lines.push(Line::from(format!(
            "Similar cases: {}",
            analysis.result.similar_cases.len()
        )));
    }
    lines.push(Line::from(Span::styled(
        format!(
            "{}  -  {}",
            analysis.title,
            format_date_time(Some(analysis.analyzed_at))
        ),
        Style::default().fg(Color::Gray),
    )));

    let result = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    f.render_widget(result, chunks[0]);

    let focused = view.focus == Focus::TrueLabel;
    if app.analyze().phase() == AnalyzePhase::FeedbackSubmitted {
        let done = Paragraph::new("Feedback submitted for this result.")
            .style(Style::default().fg(Color::Green))
            .block(input_block(" Feedback ", false));
        f.render_widget(done, chunks[1]);
    } else {
        let label = app.analyze().true_label();
        let feedback = Paragraph::new(label)
            .block(input_block(" Correct root cause (Enter to send) ", focused));
        f.render_widget(feedback, chunks[1]);
        if focused {
            set_input_cursor(f, chunks[1], label);
        }
    }
}

fn draw_notice(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(notice) = app.notice() else {
        return;
    };
    let color = match notice.kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    let line = Line::from(vec![
        Span::styled(format!(" {}", notice.text), Style::default().fg(color)),
        Span::styled("  (Esc to dismiss)", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Draw footer with keyboard shortcuts
fn draw_footer(f: &mut Frame, area: Rect, page: Page) {
    let key = Style::default().fg(Color::Black).bg(Color::Gray);
    let mut spans = vec![
        Span::styled(" Tab ", key),
        Span::raw(" Switch page  "),
        Span::styled(" Esc ", key),
        Span::raw(" Quit  "),
    ];
    match page {
        Page::Dashboard => spans.extend([
            Span::styled(" Ctrl+F ", key),
            Span::raw(" Status filter  "),
            Span::styled(" Ctrl+U ", key),
            Span::raw(" Clear search  "),
            Span::styled(" ↑/↓ ", key),
            Span::raw(" Select row"),
        ]),
        Page::Analyze => spans.extend([
            Span::styled(" ↑/↓ ", key),
            Span::raw(" Field  "),
            Span::styled(" Ctrl+S ", key),
            Span::raw(" Analyze  "),
            Span::styled(" Enter ", key),
            Span::raw(" Confirm field"),
        ]),
    }

    let footer = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray)),
        )
        .alignment(Alignment::Left);

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Analysis;
    use crate::app::Message;
    use crate::config::TriageConfig;
    use ratatui::{backend::TestBackend, Terminal};
    use triage_shared::{PredictionResult, TicketStore};

    fn screen(app: &AppState, view: &TuiView) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| draw_ui(f, app, view)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app() -> AppState {
        AppState::new(&TriageConfig::default(), TicketStore::seeded().unwrap(), None)
    }

    #[test]
    fn test_dashboard_renders_tickets() {
        let app = app();
        let text = screen(&app, &TuiView::default());
        assert!(text.contains("Total Tickets"));
        assert!(text.contains("Tickets (5)"));
        assert!(text.contains("All Status"));
    }

    #[test]
    fn test_dashboard_renders_empty_notice() {
        let mut app = app();
        app.update(Message::SearchChanged("zzz-no-match".to_string()));
        app.update(Message::Quit);
        let text = screen(&app, &TuiView::default());
        assert!(text.contains(NO_RESULTS_NOTICE));
    }

    #[test]
    fn test_analyze_page_renders_result() {
        let mut app = app();
        app.update(Message::Navigate(Page::Analyze));
        app.update(Message::TitleChanged("DB down".to_string()));
        app.update(Message::DescriptionChanged("timeout errors".to_string()));
        app.update(Message::Submit);
        app.update(Message::AnalysisFinished(Ok(Analysis {
            title: "DB down".to_string(),
            description: "timeout errors".to_string(),
            result: PredictionResult {
                root_cause: "Database".to_string(),
                summary: "Connection pool exhausted".to_string(),
                similar_cases: Vec::new(),
            },
            analyzed_at: chrono::Local::now().naive_local(),
        })));

        let text = screen(&app, &TuiView::default());
        assert!(text.contains("Root Cause"));
        assert!(text.contains("Database"));
        assert!(text.contains("Connection pool exhausted"));
    }
}
