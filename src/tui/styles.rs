//! Color palette and styles.
//!
//! Green-to-blue accents on a dark slate background, with blue for values
//! and red for errors.

use ratatui::style::{Color, Modifier, Style};

/// Theme color palette.
pub struct ProbeTheme;

impl ProbeTheme {
    // === Accent Colors ===

    /// Green accent for titles and the cursor
    pub const ACCENT_GREEN: Color = Color::Rgb(74, 222, 128); // #4ADE80

    /// Blue accent for focus
    pub const ACCENT_BLUE: Color = Color::Rgb(59, 130, 246); // #3B82F6

    /// Deeper blue for the submit hint
    pub const BUTTON: Color = Color::Rgb(37, 99, 235); // #2563EB

    /// Light blue for result values
    pub const VALUE: Color = Color::Rgb(96, 165, 250); // #60A5FA

    // === Semantic Colors ===

    /// Red for errors
    pub const DANGER: Color = Color::Rgb(220, 38, 38); // #DC2626

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    /// Borders
    pub const BORDER: Color = Color::Rgb(71, 85, 105); // #475569

    // === Preset Styles ===

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::ACCENT_GREEN)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    /// Result values (age, gender, percentages)
    #[must_use]
    pub fn value() -> Style {
        Style::default().fg(Self::VALUE).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Submit hint while idle
    #[must_use]
    pub fn button() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::BUTTON)
            .add_modifier(Modifier::BOLD)
    }

    /// Submit hint while a lookup is running
    #[must_use]
    pub fn button_disabled() -> Style {
        Style::default().fg(Self::TEXT_MUTED).bg(Self::BORDER)
    }

    #[must_use]
    pub fn cursor() -> Style {
        Style::default().fg(Self::ACCENT_GREEN)
    }

    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::ACCENT_BLUE)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT_BLUE)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::ACCENT_GREEN)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Bar color by likelihood: strong matches green, weak ones muted.
    #[must_use]
    pub fn probability(p: f64) -> Style {
        if p >= 0.5 {
            Style::default().fg(Self::ACCENT_GREEN)
        } else if p >= 0.15 {
            Style::default().fg(Self::ACCENT_BLUE)
        } else {
            Self::text_muted()
        }
    }
}
