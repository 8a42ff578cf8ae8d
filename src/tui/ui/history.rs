//! History screen: the session's past assessments, newest first.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::application::SessionHistory;
use crate::domain::PredictionRecord;
use crate::tui::styles::ClinicTheme;

/// Height of one history card, borders included.
const CARD_HEIGHT: u16 = 6;

/// Scroll state for the history screen.
#[derive(Debug, Default)]
pub struct HistoryState {
    pub offset: usize,
}

impl HistoryState {
    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, len: usize) {
        if self.offset + 1 < len {
            self.offset += 1;
        }
    }
}

/// Render the history screen.
///
/// The shell owns the ordering; entries are rendered as given.
pub fn render_history(f: &mut Frame, area: Rect, state: &HistoryState, history: &SessionHistory) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Cards
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_history_header(f, chunks[0], history.len());

    if history.is_empty() {
        render_empty(f, chunks[1]);
    } else {
        render_cards(f, chunks[1], state, history);
    }

    render_history_footer(f, chunks[2]);
}

fn render_history_header(f: &mut Frame, area: Rect, total: usize) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("Prediction History", ClinicTheme::title()),
        Span::styled(" │ Total predictions: ", ClinicTheme::text_secondary()),
        Span::styled(total.to_string(), ClinicTheme::text()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No predictions yet", ClinicTheme::text_secondary())),
        Line::from(""),
        Line::from(Span::styled(
            "Start by making a prediction on the intake form [N]",
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

fn render_cards(f: &mut Frame, area: Rect, state: &HistoryState, history: &SessionHistory) {
    let entries = history.entries();
    let visible = usize::from(area.height / CARD_HEIGHT).max(1);
    let offset = state.offset.min(entries.len().saturating_sub(1));

    let constraints: Vec<Constraint> = entries
        .iter()
        .skip(offset)
        .take(visible)
        .map(|_| Constraint::Length(CARD_HEIGHT))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, record) in entries.iter().skip(offset).take(visible).enumerate() {
        render_card(f, chunks[i], offset + i, record);
    }
}

fn render_card(f: &mut Frame, area: Rect, index: usize, record: &PredictionRecord) {
    let prediction = &record.prediction;
    let patient = &record.patient;
    let risk_style = ClinicTheme::risk_level(prediction.risk_level);

    let title = Line::from(vec![
        Span::styled(format!(" #{} ", index + 1), ClinicTheme::subtitle()),
        Span::styled(
            format!("│ {} ", prediction.timestamp.format("%Y-%m-%d %H:%M:%S")),
            ClinicTheme::text_secondary(),
        ),
    ]);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(ClinicTheme::border());

    let lines = vec![
        Line::from(vec![
            Span::styled(" Risk: ", ClinicTheme::text_secondary()),
            Span::styled(
                prediction.risk_level.to_string(),
                risk_style.add_modifier(ratatui::style::Modifier::BOLD),
            ),
            Span::styled("  ", ClinicTheme::text()),
            Span::styled(prediction.risk_level.description(), ClinicTheme::text_muted()),
        ]),
        Line::from(vec![
            Span::styled(" Age: ", ClinicTheme::text_secondary()),
            Span::styled(format!("{} years", patient.age), ClinicTheme::text()),
            Span::styled("  BMI: ", ClinicTheme::text_secondary()),
            Span::styled(format!("{} kg/m²", patient.bmi), ClinicTheme::text()),
            Span::styled("  Glucose: ", ClinicTheme::text_secondary()),
            Span::styled(format!("{} mg/dL", patient.avg_glucose_level), ClinicTheme::text()),
        ]),
        Line::from(vec![
            Span::styled(" Hypertension: ", ClinicTheme::text_secondary()),
            Span::styled(yes_no(patient.hypertension), ClinicTheme::text()),
            Span::styled("  Heart disease: ", ClinicTheme::text_secondary()),
            Span::styled(yes_no(patient.heart_disease), ClinicTheme::text()),
            Span::styled("  Smoking: ", ClinicTheme::text_secondary()),
            Span::styled(patient.smoking_status.label(), ClinicTheme::text()),
        ]),
        Line::from(vec![
            Span::styled(" Stroke: ", ClinicTheme::text_secondary()),
            Span::styled(
                format!("{:.1}%", prediction.stroke_probability * 100.0),
                risk_style,
            ),
            Span::styled("  No stroke: ", ClinicTheme::text_secondary()),
            Span::styled(
                format!("{:.1}%", prediction.no_stroke_probability * 100.0),
                ClinicTheme::success(),
            ),
            Span::styled("  Confidence: ", ClinicTheme::text_secondary()),
            Span::styled(format!("{:.1}%", prediction.confidence * 100.0), ClinicTheme::text()),
        ]),
    ];

    let card = Paragraph::new(lines).block(block);
    f.render_widget(card, area);
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn render_history_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled("[↑↓] ", ClinicTheme::key_hint()),
        Span::styled("Scroll ", ClinicTheme::key_desc()),
        Span::styled("[N] ", ClinicTheme::key_hint()),
        Span::styled("New Prediction ", ClinicTheme::key_desc()),
        Span::styled("[A] ", ClinicTheme::key_hint()),
        Span::styled("Statistics ", ClinicTheme::key_desc()),
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
