//! Name lookup form and results panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::application::LookupSession;
use crate::domain::InferenceResult;
use crate::tui::format::{country_line, format_age, format_gender, probability_bar};
use crate::tui::styles::ProbeTheme;

const BAR_WIDTH: usize = 20;

/// Name input field state
#[derive(Debug, Default)]
pub struct LookupFormState {
    pub input: String,
    pub validation: Option<String>,
}

impl LookupFormState {
    /// Add a character to the name
    pub fn input_char(&mut self, c: char) {
        if !c.is_control() {
            self.input.push(c);
            self.validation = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        self.input.pop();
    }

    /// Clear the name and any validation message
    pub fn clear(&mut self) {
        self.input.clear();
        self.validation = None;
    }
}

/// Render the lookup form with its results
pub fn render_lookup(f: &mut Frame, area: Rect, form: &LookupFormState, session: &LookupSession) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Name input
            Constraint::Length(1), // Submit
            Constraint::Length(1), // Message
            Constraint::Min(0),    // Results
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_input(f, chunks[1], form, session.is_loading());
    render_submit(f, chunks[2], session.is_loading());
    render_message(f, chunks[3], form, session);

    if let (Some(name), Some(result)) = (session.shown_name(), session.result()) {
        render_results(f, chunks[4], name, result);
    }

    render_footer(f, chunks[5]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ProbeTheme::text()),
        Span::styled("Name Probe", ProbeTheme::title()),
        Span::styled(
            " │ Age, gender and nationality by first name",
            ProbeTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ProbeTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_input(f: &mut Frame, area: Rect, form: &LookupFormState, loading: bool) {
    let (border_style, title_style) = if loading {
        (ProbeTheme::border(), ProbeTheme::text_secondary())
    } else {
        (ProbeTheme::border_focused(), ProbeTheme::focused())
    };

    let block = Block::default()
        .title(Span::styled(" Name ", title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    let value = if form.input.is_empty() {
        Span::styled("Enter a name", ProbeTheme::text_muted())
    } else {
        Span::styled(form.input.as_str(), ProbeTheme::text())
    };

    let content = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        value,
        if loading {
            Span::raw("")
        } else {
            Span::styled("▌", ProbeTheme::cursor())
        },
    ]))
    .block(block);

    f.render_widget(content, area);
}

fn render_submit(f: &mut Frame, area: Rect, loading: bool) {
    let button = if loading {
        Span::styled(" Loading... ", ProbeTheme::button_disabled())
    } else {
        Span::styled(" [Enter] Predict ", ProbeTheme::button())
    };

    f.render_widget(Paragraph::new(Line::from(vec![Span::raw(" "), button])), area);
}

fn render_message(f: &mut Frame, area: Rect, form: &LookupFormState, session: &LookupSession) {
    let message = form.validation.as_deref().or_else(|| session.error());
    let Some(message) = message else {
        return;
    };

    let line = Line::from(vec![
        Span::styled(" ! ", ProbeTheme::danger()),
        Span::styled(message, ProbeTheme::danger()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_results(f: &mut Frame, area: Rect, name: &str, result: &InferenceResult) {
    let mut lines = vec![
        Line::from(Span::styled(format!("Results for {name}"), ProbeTheme::subtitle())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Age: ", ProbeTheme::text_secondary()),
            Span::styled(format_age(result.age), ProbeTheme::value()),
        ]),
        Line::from(vec![
            Span::styled("Gender: ", ProbeTheme::text_secondary()),
            Span::styled(format_gender(result.gender), ProbeTheme::value()),
        ]),
        Line::from(""),
        Line::from(Span::styled("Probable Nationalities:", ProbeTheme::text_secondary())),
    ];

    if result.countries.is_empty() {
        lines.push(Line::from(Span::styled("  none reported", ProbeTheme::text_muted())));
    }

    for country in &result.countries {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                probability_bar(country.probability, BAR_WIDTH),
                ProbeTheme::probability(country.probability),
            ),
            Span::raw(" "),
            Span::styled(country_line(country), ProbeTheme::text()),
        ]));
    }

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(ProbeTheme::border()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(panel, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let content = Line::from(vec![
        Span::styled("[Enter] ", ProbeTheme::key_hint()),
        Span::styled("Predict ", ProbeTheme::key_desc()),
        Span::styled("[Ctrl+U] ", ProbeTheme::key_hint()),
        Span::styled("Clear Name ", ProbeTheme::key_desc()),
        Span::styled("[Esc] ", ProbeTheme::key_hint()),
        Span::styled("Reset ", ProbeTheme::key_desc()),
        Span::styled("[Ctrl+Q] ", ProbeTheme::key_hint()),
        Span::styled("Quit", ProbeTheme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ProbeTheme::border()),
    );

    f.render_widget(footer, area);
}
