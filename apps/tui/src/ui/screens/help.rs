use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::ui::widgets::popup::centered_rect;

pub fn render_help(f: &mut Frame<'_>) {
    let area = centered_rect(80, 85, f.area());

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let key = |k: &'static str, text: &'static str| {
        TextLine::from(vec![
            Span::styled(
                format!("  {k}"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" - {text}"), Style::default()),
        ])
    };

    let help_text = vec![
        TextLine::from(Span::styled(
            "UHI Scope",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Fetches Urban Heat Island analysis results from the backend and renders them as a map, legend and summary statistics.",
        ),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Keyboard Shortcuts:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        key("F1 / ?", "Toggle this help screen"),
        key("Tab / 1 / 2", "Switch between map and dashboard"),
        key("r / F5 / Enter", "Apply parameters and refresh"),
        key("+ / -", "Step the sample point count"),
        key("[ / ]", "Step the history window in days"),
        key("z", "Cycle the zone filter"),
        key("h", "Toggle the heat layer overlay (map)"),
        key("Up / Down", "Browse sample points"),
        key("e", "Export the loaded analysis as JSON"),
        key("x", "Dismiss the error banner"),
        key("q", "Quit"),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Zones:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from("  Low    - below 34 C; within normal range"),
        TextLine::from("  Medium - 34 C and above; elevated heat"),
        TextLine::from("  High   - 40 C and above; heat island hotspot"),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Press Esc to close this help screen",
            Style::default().fg(Color::Yellow),
        )),
    ];

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Text::from(help_text))
            .block(help_block)
            .wrap(Wrap { trim: false }),
        area,
    );
}
