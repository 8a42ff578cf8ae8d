//! UI module: View components for the TUI.

pub mod form;
pub mod history;
pub mod stats;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::ports::ApiHealth;
use crate::tui::app::Screen;
use crate::tui::styles::ClinicTheme;

/// Render the title bar with the API status indicator and the nav tabs.
pub fn render_header(f: &mut Frame, area: Rect, active: Screen, health: ApiHealth) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("StrokeWatch", ClinicTheme::title()),
        Span::styled(" │ ", ClinicTheme::text_muted()),
        Span::styled(
            "Using Machine Learning to Predict Stroke Risk",
            ClinicTheme::text_secondary(),
        ),
        Span::styled("    API: ", ClinicTheme::text_secondary()),
        Span::styled("● ", ClinicTheme::api_health(health)),
        Span::styled(health.label(), ClinicTheme::api_health(health)),
    ]));
    f.render_widget(title, chunks[0]);

    let tabs = [
        (Screen::Predict, "[N] Predict"),
        (Screen::History, "[H] History"),
        (Screen::Stats, "[A] Statistics"),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (screen, label) in tabs {
        let style = if screen == active {
            ClinicTheme::focused()
        } else {
            ClinicTheme::key_desc()
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("  "));
    }

    let nav = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );
    f.render_widget(nav, chunks[1]);
}

/// Render the bottom disclaimer bar.
pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "Medical application - for informational purposes only.",
            ClinicTheme::text_muted(),
        )]),
        Line::from(vec![Span::styled(
            "This assessment should not replace professional medical advice.",
            ClinicTheme::text_muted(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(ClinicTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
