//! Patient intake form.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{
    PatientRecord, PredictionRecord, SmokingStatus, AGE_RANGE, AGE_RANGE_MESSAGE, BMI_RANGE,
    BMI_RANGE_MESSAGE, GLUCOSE_RANGE, GLUCOSE_RANGE_MESSAGE,
};
use crate::ports::ModelInfo;
use crate::tui::styles::ClinicTheme;

/// Intake fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Age,
    Glucose,
    Bmi,
    Hypertension,
    HeartDisease,
    Smoking,
}

pub const FIELD_ORDER: [FieldId; 6] = [
    FieldId::Age,
    FieldId::Glucose,
    FieldId::Bmi,
    FieldId::Hypertension,
    FieldId::HeartDisease,
    FieldId::Smoking,
];

impl FieldId {
    fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Glucose => "Glucose Level",
            Self::Bmi => "BMI",
            Self::Hypertension => "Hypertension",
            Self::HeartDisease => "Heart Disease",
            Self::Smoking => "Smoking Status",
        }
    }

    fn hint(self) -> &'static str {
        match self {
            Self::Age => "years (18-120)",
            Self::Glucose => "mg/dL (50-300)",
            Self::Bmi => "kg/m² (10-50)",
            Self::Hypertension | Self::HeartDisease => "[Space] to toggle",
            Self::Smoking => "[←/→] to change",
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, Self::Age | Self::Glucose | Self::Bmi)
    }
}

/// Draft state for the intake form, plus the inline result display.
pub struct FormState {
    pub age: String,
    pub glucose: String,
    pub bmi: String,
    pub hypertension: bool,
    pub heart_disease: bool,
    pub smoking: SmokingStatus,
    pub selected: usize,
    pub error: Option<String>,
    pub result: Option<PredictionRecord>,
    pub submitting: bool,
    pub model_info: Option<ModelInfo>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            age: String::new(),
            glucose: String::new(),
            bmi: String::new(),
            hypertension: false,
            heart_disease: false,
            smoking: SmokingStatus::Never,
            selected: 0,
            error: None,
            result: None,
            submitting: false,
            model_info: None,
        }
    }
}

impl FormState {
    #[must_use]
    pub fn selected_field(&self) -> FieldId {
        FIELD_ORDER[self.selected]
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % FIELD_ORDER.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected == 0 {
            self.selected = FIELD_ORDER.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// Add a character to the selected numeric field. Editing clears any
    /// displayed validation error.
    pub fn input_char(&mut self, c: char) {
        if !self.selected_field().is_numeric() {
            return;
        }
        if c.is_ascii_digit() || c == '.' {
            if let Some(buffer) = self.numeric_buffer_mut() {
                buffer.push(c);
            }
            self.error = None;
        }
    }

    /// Delete the last character of the selected numeric field
    pub fn delete_char(&mut self) {
        if let Some(buffer) = self.numeric_buffer_mut() {
            buffer.pop();
            self.error = None;
        }
    }

    /// Clear the selected numeric field
    pub fn clear_field(&mut self) {
        if let Some(buffer) = self.numeric_buffer_mut() {
            buffer.clear();
            self.error = None;
        }
    }

    /// Toggle or advance the selected choice field.
    pub fn toggle_selected(&mut self) {
        match self.selected_field() {
            FieldId::Hypertension => self.hypertension = !self.hypertension,
            FieldId::HeartDisease => self.heart_disease = !self.heart_disease,
            FieldId::Smoking => self.smoking = self.smoking.next(),
            _ => return,
        }
        self.error = None;
    }

    /// Cycle the selected choice field backwards.
    pub fn cycle_left(&mut self) {
        match self.selected_field() {
            FieldId::Smoking => {
                self.smoking = self.smoking.prev();
                self.error = None;
            }
            FieldId::Hypertension | FieldId::HeartDisease => self.toggle_selected(),
            _ => {}
        }
    }

    /// Cycle the selected choice field forwards.
    pub fn cycle_right(&mut self) {
        match self.selected_field() {
            FieldId::Smoking => {
                self.smoking = self.smoking.next();
                self.error = None;
            }
            FieldId::Hypertension | FieldId::HeartDisease => self.toggle_selected(),
            _ => {}
        }
    }

    fn numeric_buffer_mut(&mut self) -> Option<&mut String> {
        match self.selected_field() {
            FieldId::Age => Some(&mut self.age),
            FieldId::Glucose => Some(&mut self.glucose),
            FieldId::Bmi => Some(&mut self.bmi),
            _ => None,
        }
    }

    fn numeric_value(&self, field: FieldId) -> &str {
        match field {
            FieldId::Age => &self.age,
            FieldId::Glucose => &self.glucose,
            FieldId::Bmi => &self.bmi,
            _ => "",
        }
    }

    /// Clear the draft back to defaults and discard the displayed
    /// result and error. The model metadata panel is kept.
    pub fn reset(&mut self) {
        let model_info = self.model_info.take();
        let submitting = self.submitting;
        *self = Self { model_info, submitting, ..Self::default() };
    }

    /// Validate the draft and convert it to a patient record.
    ///
    /// Fail-closed: empty, unparsable, and out-of-range numerics all fail
    /// their field's check; the messages are joined into one line.
    ///
    /// # Errors
    /// Returns the joined validation message.
    pub fn to_patient_record(&self) -> Result<PatientRecord, String> {
        let mut errors = Vec::new();

        let age = parse_in_range(&self.age, &AGE_RANGE);
        if age.is_none() {
            errors.push(AGE_RANGE_MESSAGE);
        }
        let avg_glucose_level = parse_in_range(&self.glucose, &GLUCOSE_RANGE);
        if avg_glucose_level.is_none() {
            errors.push(GLUCOSE_RANGE_MESSAGE);
        }
        let bmi = parse_in_range(&self.bmi, &BMI_RANGE);
        if bmi.is_none() {
            errors.push(BMI_RANGE_MESSAGE);
        }

        if let (Some(age), Some(avg_glucose_level), Some(bmi)) = (age, avg_glucose_level, bmi) {
            Ok(PatientRecord {
                age,
                hypertension: self.hypertension,
                heart_disease: self.heart_disease,
                avg_glucose_level,
                bmi,
                smoking_status: self.smoking,
            })
        } else {
            Err(errors.join(", "))
        }
    }

    /// Load sample data (typical at-risk patient) for quick manual testing.
    pub fn load_sample(&mut self) {
        self.age = "55".to_string();
        self.glucose = "120.5".to_string();
        self.bmi = "27.3".to_string();
        self.hypertension = true;
        self.heart_disease = false;
        self.smoking = SmokingStatus::Never;
        self.error = None;
    }
}

fn parse_in_range(raw: &str, range: &std::ops::RangeInclusive<f64>) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    range.contains(&value).then_some(value)
}

/// Render the intake form with the inline result panel.
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Fields + result
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_fields(f, columns[0], state);
    render_outcome(f, columns[1], state);

    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("Patient Information", ClinicTheme::title()),
        Span::styled(" │ Stroke Risk Assessment", ClinicTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_fields(f: &mut Frame, area: Rect, state: &FormState) {
    let field_height = 3;
    let constraints: Vec<Constraint> = FIELD_ORDER
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    for (i, field) in FIELD_ORDER.iter().enumerate() {
        let is_selected = i == state.selected;
        let border_style = if is_selected {
            ClinicTheme::border_focused()
        } else {
            ClinicTheme::border()
        };
        let title_style = if is_selected {
            ClinicTheme::focused()
        } else {
            ClinicTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let content = Paragraph::new(Line::from(field_value_spans(state, *field, is_selected)))
            .block(block);

        f.render_widget(content, chunks[i]);
    }
}

fn field_value_spans(state: &FormState, field: FieldId, is_selected: bool) -> Vec<Span<'_>> {
    let mut spans = vec![Span::raw(" ")];

    match field {
        FieldId::Age | FieldId::Glucose | FieldId::Bmi => {
            let value = state.numeric_value(field);
            if value.is_empty() {
                spans.push(Span::styled(field.hint(), ClinicTheme::text_muted()));
            } else {
                spans.push(Span::styled(value, ClinicTheme::text()));
            }
            if is_selected {
                spans.push(Span::styled("▌", ClinicTheme::focused()));
            }
        }
        FieldId::Hypertension | FieldId::HeartDisease => {
            let on = if field == FieldId::Hypertension {
                state.hypertension
            } else {
                state.heart_disease
            };
            let (marker, style) = if on {
                ("[x] Yes", ClinicTheme::warning())
            } else {
                ("[ ] No", ClinicTheme::text())
            };
            spans.push(Span::styled(marker, style));
        }
        FieldId::Smoking => {
            spans.push(Span::styled("< ", ClinicTheme::text_muted()));
            spans.push(Span::styled(state.smoking.label(), ClinicTheme::text()));
            spans.push(Span::styled(" >", ClinicTheme::text_muted()));
        }
    }

    spans
}

fn render_outcome(f: &mut Frame, area: Rect, state: &FormState) {
    if state.submitting {
        render_submitting(f, area);
    } else if let Some(record) = &state.result {
        render_result(f, area, record);
    } else {
        render_model_info(f, area, state.model_info.as_ref());
    }
}

fn render_submitting(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("Analyzing patient data...", ClinicTheme::text_secondary())),
        Line::from(""),
        Line::from(Span::styled(
            "Waiting for the prediction service",
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

fn render_result(f: &mut Frame, area: Rect, record: &PredictionRecord) {
    let prediction = &record.prediction;
    let risk_style = ClinicTheme::risk_level(prediction.risk_level);

    let block = Block::default()
        .title(Span::styled(" Assessment Result ", ClinicTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(risk_style);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Risk level
            Constraint::Length(3), // Stroke probability
            Constraint::Length(3), // No-stroke probability
            Constraint::Length(2), // Confidence + timestamp
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let risk_display = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Risk Level: {}", prediction.risk_level),
            risk_style.add_modifier(ratatui::style::Modifier::BOLD),
        )),
        Line::from(Span::styled(
            prediction.risk_level.description(),
            ClinicTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(risk_display, chunks[0]);

    let stroke_gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" Stroke Probability ", ClinicTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(ClinicTheme::border()),
        )
        .gauge_style(risk_style)
        .percent(to_percent_u16(prediction.stroke_probability))
        .label(format!("{:.1}%", prediction.stroke_probability * 100.0));
    f.render_widget(stroke_gauge, chunks[1]);

    let no_stroke_gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(" No Stroke Probability ", ClinicTheme::text_secondary()))
                .borders(Borders::ALL)
                .border_style(ClinicTheme::border()),
        )
        .gauge_style(ClinicTheme::success())
        .percent(to_percent_u16(prediction.no_stroke_probability))
        .label(format!("{:.1}%", prediction.no_stroke_probability * 100.0));
    f.render_widget(no_stroke_gauge, chunks[2]);

    let meta = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Confidence: ", ClinicTheme::text_secondary()),
            Span::styled(
                format!("{:.1}%", prediction.confidence * 100.0),
                ClinicTheme::text(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Assessed: ", ClinicTheme::text_secondary()),
            Span::styled(
                prediction.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                ClinicTheme::text_muted(),
            ),
        ]),
    ]);
    f.render_widget(meta, chunks[3]);
}

fn render_model_info(f: &mut Frame, area: Rect, info: Option<&ModelInfo>) {
    let block = Block::default()
        .title(Span::styled(" Model Information ", ClinicTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(ClinicTheme::border());

    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines = match info {
        Some(info) => {
            let mut lines = vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled("  Type: ", ClinicTheme::text_secondary()),
                    Span::styled(info.model.model_type.clone(), ClinicTheme::text()),
                ]),
                Line::from(vec![
                    Span::styled("  Accuracy: ", ClinicTheme::text_secondary()),
                    Span::styled(
                        format!("{:.1}%", info.model.accuracy * 100.0),
                        ClinicTheme::text(),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("  Features: ", ClinicTheme::text_secondary()),
                    Span::styled(info.features.join(", "), ClinicTheme::text_muted()),
                ]),
            ];
            if !info.model_loaded {
                lines.push(Line::from(Span::styled(
                    "  Model not loaded on the server",
                    ClinicTheme::warning(),
                )));
            }
            lines
        }
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Enter patient data to request an assessment",
                ClinicTheme::text_secondary(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press [S] to load sample data",
                ClinicTheme::text_muted(),
            )),
        ],
    };

    let content = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(content, inner);
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error {
        Line::from(vec![
            Span::styled("! ", ClinicTheme::danger()),
            Span::styled(err.clone(), ClinicTheme::danger()),
        ])
    } else if state.submitting {
        Line::from(Span::styled("Analyzing...", ClinicTheme::text_muted()))
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", ClinicTheme::key_hint()),
            Span::styled("Fields ", ClinicTheme::key_desc()),
            Span::styled("[Enter] ", ClinicTheme::key_hint()),
            Span::styled("Submit ", ClinicTheme::key_desc()),
            Span::styled("[S] ", ClinicTheme::key_hint()),
            Span::styled("Sample ", ClinicTheme::key_desc()),
            Span::styled("[R] ", ClinicTheme::key_hint()),
            Span::styled("Reset ", ClinicTheme::key_desc()),
            Span::styled("[H] ", ClinicTheme::key_hint()),
            Span::styled("History ", ClinicTheme::key_desc()),
            Span::styled("[A] ", ClinicTheme::key_hint()),
            Span::styled("Statistics", ClinicTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(footer, area);
}

fn to_percent_u16(fraction: f64) -> u16 {
    (fraction * 100.0).clamp(0.0, 100.0) as u16
}
