//! Color palette and styles for the terminal UI.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::RiskLevel;
use crate::ports::ApiHealth;

/// Clinical color palette.
pub struct ClinicTheme;

impl ClinicTheme {
    // === Semantic Colors ===

    /// Green - healthy / low risk
    pub const SUCCESS: Color = Color::Rgb(76, 175, 80); // #4CAF50

    /// Orange - degraded / medium risk
    pub const WARNING: Color = Color::Rgb(255, 152, 0); // #FF9800

    /// Red - failure / high risk
    pub const DANGER: Color = Color::Rgb(244, 67, 54); // #F44336

    /// Blue - informational
    pub const INFO: Color = Color::Rgb(33, 150, 243); // #2196F3

    // === Accent Colors ===

    /// Light blue for focused elements
    pub const ACCENT_LIGHT: Color = Color::Rgb(100, 181, 246); // #64B5F6

    // === Text Colors ===

    /// Primary text (near-white)
    pub const TEXT_PRIMARY: Color = Color::Rgb(236, 239, 241); // #ECEFF1

    /// Secondary text (blue-gray)
    pub const TEXT_SECONDARY: Color = Color::Rgb(176, 190, 197); // #B0BEC5

    /// Muted text
    pub const TEXT_MUTED: Color = Color::Rgb(120, 144, 156); // #78909C

    /// Border gray
    pub const BORDER: Color = Color::Rgb(96, 125, 139); // #607D8B

    // === Preset Styles ===

    /// Style for titles
    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for subtitles
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::ACCENT_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for normal text
    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    /// Style for secondary text
    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for muted text
    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    /// Style for success messages
    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Style for warning messages
    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    /// Style for danger/error messages
    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for info messages
    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for focused elements
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::ACCENT_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for borders
    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Style for focused borders
    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for key hints
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key descriptions
    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Get risk level style
    #[must_use]
    pub fn risk_level(level: RiskLevel) -> Style {
        match level {
            RiskLevel::Low => Self::success(),
            RiskLevel::Medium => Self::warning(),
            RiskLevel::High => Self::danger(),
        }
    }

    /// Get the style of the API status indicator
    #[must_use]
    pub fn api_health(status: ApiHealth) -> Style {
        match status {
            ApiHealth::Checking => Self::info(),
            ApiHealth::Healthy => Self::success(),
            ApiHealth::Unhealthy => Self::warning(),
            ApiHealth::Disconnected => Self::danger(),
        }
    }
}
