//! Statistics screen: pre-aggregated counts from the stats endpoint.
//!
//! Percentages are always derived locally from the raw counts; the wire
//! never supplies them.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::domain::RiskLevel;
use crate::ports::StatsReport;
use crate::tui::styles::ClinicTheme;

/// Statistics screen state.
#[derive(Debug, Default)]
pub struct StatsState {
    pub report: Option<StatsReport>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Render the statistics screen.
pub fn render_stats(f: &mut Frame, area: Rect, state: &StatsState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_stats_header(f, chunks[0], state.loading);
    render_stats_content(f, chunks[1], state);
    render_stats_footer(f, chunks[2]);
}

fn render_stats_header(f: &mut Frame, area: Rect, loading: bool) {
    let mut spans = vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("Prediction Statistics", ClinicTheme::title()),
        Span::styled(" │ Service Aggregates", ClinicTheme::text_secondary()),
    ];
    if loading {
        spans.push(Span::styled("  Refreshing...", ClinicTheme::text_muted()));
    }

    let header = Paragraph::new(Line::from(spans))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

/// What the content area should show for a given state.
enum StatsContent<'a> {
    Loading,
    Empty,
    Error(&'a str),
    Report(&'a StatsReport),
}

fn classify(state: &StatsState) -> StatsContent<'_> {
    if let Some(err) = &state.error {
        return StatsContent::Error(err);
    }
    match &state.report {
        None => StatsContent::Loading,
        Some(report) if report.total_predictions == 0 => StatsContent::Empty,
        Some(report) => StatsContent::Report(report),
    }
}

fn render_stats_content(f: &mut Frame, area: Rect, state: &StatsState) {
    match classify(state) {
        StatsContent::Loading => render_loading(f, area),
        StatsContent::Empty => render_empty(f, area),
        StatsContent::Error(message) => render_stats_error(f, area, message),
        StatsContent::Report(report) => render_report(f, area, report),
    }
}

fn render_loading(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Loading statistics...", ClinicTheme::text_muted())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No data available yet", ClinicTheme::text_secondary())),
        Line::from(""),
        Line::from(Span::styled(
            "Make some predictions to see statistics",
            ClinicTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_stats_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Cannot Load Statistics", ClinicTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, ClinicTheme::text())),
        Line::from(""),
        Line::from(Span::styled("Press [R] to retry", ClinicTheme::text_muted())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(ClinicTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_report(f: &mut Frame, area: Rect, report: &StatsReport) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Summary cards
            Constraint::Length(11), // Risk distribution
            Constraint::Min(0),     // Summary text
        ])
        .margin(1)
        .split(area);

    render_summary_cards(f, chunks[0], report);
    render_distribution(f, chunks[1], report);
    render_summary_text(f, chunks[2], report);
}

fn render_summary_cards(f: &mut Frame, area: Rect, report: &StatsReport) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let last_updated = report
        .timestamp
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "—".to_string());

    let cards = [
        ("Total Predictions", report.total_predictions.to_string()),
        ("Average Patient Age", format!("{:.1} years", report.average_age)),
        ("Last Updated", last_updated),
    ];

    for (i, (title, value)) in cards.iter().enumerate() {
        let card = Paragraph::new(Line::from(Span::styled(value.clone(), ClinicTheme::text())))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(Span::styled(format!(" {title} "), ClinicTheme::text_secondary()))
                    .borders(Borders::ALL)
                    .border_style(ClinicTheme::border()),
            );
        f.render_widget(card, columns[i]);
    }
}

fn render_distribution(f: &mut Frame, area: Rect, report: &StatsReport) {
    let block = Block::default()
        .title(Span::styled(" Risk Distribution ", ClinicTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicTheme::border());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let counts = report.risk_distribution;
    let total = report.total_predictions;
    let rows = [
        (RiskLevel::High, "High Risk", counts.high),
        (RiskLevel::Medium, "Medium Risk", counts.medium),
        (RiskLevel::Low, "Low Risk", counts.low),
    ];

    for (i, (level, label, count)) in rows.iter().enumerate() {
        let pct = percent(*count, total);
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(Span::styled(
                        format!(" {label} — {count} patients "),
                        ClinicTheme::text_secondary(),
                    ))
                    .borders(Borders::ALL)
                    .border_style(ClinicTheme::border()),
            )
            .gauge_style(ClinicTheme::risk_level(*level))
            .percent(pct.clamp(0.0, 100.0) as u16)
            .label(format!("{pct:.1}%"));
        f.render_widget(gauge, chunks[i]);
    }
}

fn render_summary_text(f: &mut Frame, area: Rect, report: &StatsReport) {
    let counts = report.risk_distribution;
    let total = report.total_predictions;

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{:.1}%", percent(counts.high, total)),
                ClinicTheme::danger(),
            ),
            Span::styled(
                " of patients fall into the high-risk category",
                ClinicTheme::text_secondary(),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!("{:.1}%", percent(counts.low, total)),
                ClinicTheme::success(),
            ),
            Span::styled(
                " of patients fall into the low-risk category",
                ClinicTheme::text_secondary(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Total assessments performed: ", ClinicTheme::text_secondary()),
            Span::styled(total.to_string(), ClinicTheme::text()),
        ]),
    ];

    let summary = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Summary ", ClinicTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(summary, area);
}

fn render_stats_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[R] ", ClinicTheme::key_hint()),
        Span::styled("Refresh ", ClinicTheme::key_desc()),
        Span::styled("[N] ", ClinicTheme::key_hint()),
        Span::styled("New Prediction ", ClinicTheme::key_desc()),
        Span::styled("[H] ", ClinicTheme::key_hint()),
        Span::styled("History ", ClinicTheme::key_desc()),
        Span::styled("[Q] ", ClinicTheme::key_hint()),
        Span::styled("Quit", ClinicTheme::key_desc()),
    ]))
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(footer, area);
}

/// Share of `count` in `total`, as a percentage.
///
/// Callers only reach this with `total > 0`; the zero case renders the
/// empty state before any division happens.
fn percent(count: u64, total: u64) -> f64 {
    (count as f64 / total as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RiskCounts;

    #[test]
    fn test_percentages_derive_from_raw_counts() {
        let counts = RiskCounts { high: 3, medium: 5, low: 12 };
        let total = 20;

        assert!((percent(counts.high, total) - 15.0).abs() < f64::EPSILON);
        assert!((percent(counts.medium, total) - 25.0).abs() < f64::EPSILON);
        assert!((percent(counts.low, total) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_total_selects_empty_state() {
        let state = StatsState {
            report: Some(StatsReport {
                total_predictions: 0,
                average_age: 0.0,
                risk_distribution: RiskCounts::default(),
                timestamp: None,
            }),
            loading: false,
            error: None,
        };
        // The empty state is chosen before any percentage is derived.
        assert!(matches!(classify(&state), StatsContent::Empty));
    }

    #[test]
    fn test_missing_report_selects_loading_state() {
        let state = StatsState::default();
        assert!(matches!(classify(&state), StatsContent::Loading));
    }

    #[test]
    fn test_error_takes_precedence() {
        let state = StatsState {
            report: None,
            loading: false,
            error: Some("transport failure: connection refused".to_string()),
        };
        assert!(matches!(classify(&state), StatsContent::Error(_)));
    }
}
