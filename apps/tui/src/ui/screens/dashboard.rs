use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::App;
use crate::domain::HeatZone;
use crate::ui::widgets::legend::zone_color;

pub fn render_dashboard_view(app: &App, f: &mut Frame<'_>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary
            Constraint::Min(8),    // Charts and table
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(2, 1)));

    render_summary(app, f, main_layout[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(main_layout[1]);

    render_zone_barchart(app, f, content[0]);
    render_points_table(app, f, content[1]);

    let shortcuts = TextLine::from(vec![
        Span::styled(
            "Esc/Tab",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(": Map view | ", Style::default().fg(Color::Gray)),
        Span::styled(
            "↑/↓",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(": Browse points | ", Style::default().fg(Color::Gray)),
        Span::styled(
            "z",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(": Zone filter | ", Style::default().fg(Color::Gray)),
        Span::styled(
            "e",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(": Export", Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(
        Paragraph::new(shortcuts).alignment(Alignment::Center),
        main_layout[2],
    );
}

fn render_summary(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Analysis Summary ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(analysis) = app.analysis.as_ref() else {
        let paragraph = Paragraph::new("No analysis loaded yet. Press 'r' to fetch.")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    };

    let label_style = Style::default().fg(Color::Gray);
    let value_style = Style::default().fg(Color::White);

    let mut lines = vec![
        TextLine::from(vec![
            Span::styled("Loaded: ", label_style),
            Span::styled(
                analysis
                    .loaded_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string(),
                value_style,
            ),
            Span::styled("   Points: ", label_style),
            Span::styled(analysis.data.len().to_string(), value_style),
            Span::styled("   Window: ", label_style),
            Span::styled(format!("{} days", app.params.days_back), value_style),
        ]),
    ];

    if let Some(mean) = analysis.mean_temperature() {
        lines.push(TextLine::from(vec![
            Span::styled("Mean temperature: ", label_style),
            Span::styled(format!("{mean:.1} C"), value_style),
        ]));
    }

    if let Some(hottest) = analysis.hottest_point() {
        lines.push(TextLine::from(vec![
            Span::styled("Hottest point: ", label_style),
            Span::styled(
                format!(
                    "{:.4}, {:.4} at {:.1} C",
                    hottest.latitude, hottest.longitude, hottest.temperature
                ),
                Style::default().fg(zone_color(hottest.zone)),
            ),
        ]));
    }

    lines.push(TextLine::from(vec![
        Span::styled("Share: ", label_style),
        Span::styled(
            format!(
                "low {:.1}% / medium {:.1}% / high {:.1}%",
                analysis.statistics.share(HeatZone::Low) * 100.0,
                analysis.statistics.share(HeatZone::Medium) * 100.0,
                analysis.statistics.share(HeatZone::High) * 100.0
            ),
            value_style,
        ),
    ]));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_zone_barchart(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Zone Counts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let Some(analysis) = app.analysis.as_ref() else {
        let paragraph = Paragraph::new("No data")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    };

    let bars: Vec<Bar<'_>> = HeatZone::ALL
        .iter()
        .map(|&zone| {
            Bar::default()
                .value(analysis.statistics.count(zone))
                .label(TextLine::from(zone.label()))
                .style(Style::default().fg(zone_color(zone)))
                .value_style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let max_value = HeatZone::ALL
        .iter()
        .map(|&zone| analysis.statistics.count(zone))
        .max()
        .unwrap_or(0)
        .max(1);

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .max(max_value)
        .bar_gap(1)
        .bar_width(8);

    f.render_widget(chart, area);
}

fn render_points_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title_base = match app.selected_zone {
        Some(zone) => format!(" Sample Points | {} ", zone.label()),
        None => " Sample Points ".to_string(),
    };

    let Some(analysis) = app.analysis.as_ref() else {
        let block = Block::default()
            .title(title_base)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let paragraph = Paragraph::new("No data")
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    };

    let visible = app.visible_indices();
    let total_rows = visible.len();
    let max_visible_rows = area.height.saturating_sub(4) as usize;

    let selected_position = app
        .selected_point
        .and_then(|index| visible.iter().position(|&i| i == index));

    let mut scroll_offset = 0;
    if total_rows > max_visible_rows {
        if let Some(position) = selected_position {
            if position >= max_visible_rows {
                scroll_offset = position.saturating_sub(max_visible_rows) + 1;
            }
        }
    }

    let header = Row::new(vec![
        Cell::from("Latitude"),
        Cell::from("Longitude"),
        Cell::from("Temp C"),
        Cell::from("Zone"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows = visible
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(max_visible_rows)
        .filter_map(|(position, &index)| {
            analysis.data.get(index).map(|point| {
                let is_selected = selected_position == Some(position);
                let style = if is_selected {
                    Style::default()
                        .bg(Color::Rgb(0, 0, 238))
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(zone_color(point.zone))
                };

                Row::new(vec![
                    Cell::from(format!("{:.4}", point.latitude)),
                    Cell::from(format!("{:.4}", point.longitude)),
                    Cell::from(format!("{:.1}", point.temperature)),
                    Cell::from(point.zone.label()),
                ])
                .style(style)
            })
        });

    let widths = [
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(12),
    ];

    let position_hint = selected_position.map_or(0, |position| position + 1);
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!("{title_base}({position_hint} of {total_rows}) "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}
