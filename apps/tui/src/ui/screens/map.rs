use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine, Points};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};

use crate::app::{App, AppActions};
use crate::config::MapViewport;
use crate::domain::HeatZone;
use crate::ui::widgets::heat::{bin_color, heat_bins};
use crate::ui::widgets::legend::{render_legend, zone_color};

pub fn render_map_view(app: &App, actions: &AppActions, f: &mut Frame<'_>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title area
            Constraint::Min(10),   // Content area
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(2, 1)));

    render_title(app, actions, f, main_layout[0]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(main_layout[1]);

    render_map_canvas(app, &actions.viewport, f, content[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Legend
            Constraint::Min(7),    // Point detail
            Constraint::Length(6), // Parameters
        ])
        .split(content[1]);

    render_legend(app, f, side[0]);
    render_point_detail(app, f, side[1]);
    render_parameters(app, actions, f, side[2]);

    render_status(app, f, main_layout[2]);
    render_shortcuts(f, main_layout[3]);
}

fn render_title(app: &App, actions: &AppActions, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("== UHI Scope ==")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(inner);

    let title = Paragraph::new(TextLine::from(vec![
        Span::styled(
            "Urban Heat Island ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Dashboard",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Left);
    f.render_widget(title, chunks[0]);

    if app.is_loading() {
        let throbber = Throbber::default()
            .label("Fetching analysis...")
            .style(Style::default().fg(Color::Cyan))
            .throbber_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .throbber_set(BRAILLE_SIX)
            .use_type(WhichUse::Spin);
        let mut state = app.throbber.clone();
        f.render_stateful_widget(throbber, chunks[1], &mut state);
    } else {
        let backend = Paragraph::new(Span::styled(
            actions
                .client
                .as_ref()
                .map_or_else(String::new, |client| client.base_url().to_string()),
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Right);
        f.render_widget(backend, chunks[1]);
    }
}

/// Per-zone marker coordinates for the canvas, honoring the zone filter.
fn zone_coordinates(app: &App) -> [(Color, Vec<(f64, f64)>); 3] {
    let mut groups = [
        (zone_color(HeatZone::Low), Vec::new()),
        (zone_color(HeatZone::Medium), Vec::new()),
        (zone_color(HeatZone::High), Vec::new()),
    ];

    if let Some(analysis) = app.analysis.as_ref() {
        for index in app.visible_indices() {
            if let Some(point) = analysis.data.get(index) {
                let slot = match point.zone {
                    HeatZone::Low => 0,
                    HeatZone::Medium => 1,
                    HeatZone::High => 2,
                };
                groups[slot].1.push((point.longitude, point.latitude));
            }
        }
    }

    groups
}

fn render_map_canvas(app: &App, viewport: &MapViewport, f: &mut Frame<'_>, area: Rect) {
    let title = match app.selected_zone {
        Some(zone) => format!(" Heat Map | {} only ", zone.label()),
        None => " Heat Map ".to_string(),
    };
    let block = Block::default()
        .title(title)
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

    let [west, east] = viewport.x_bounds();
    let [south, north] = viewport.y_bounds();

    let groups = zone_coordinates(app);
    let bins = if app.show_heat_layer {
        heat_bins(&analysis.data, viewport)
    } else {
        Vec::new()
    };
    let max_bin = bins.iter().map(|bin| bin.count).max().unwrap_or(0);
    let selected = app.selected_sample().map(|point| {
        (
            point.longitude,
            point.latitude,
            zone_color(point.zone),
        )
    });

    let marker = if app.show_heat_layer {
        Marker::Block
    } else {
        Marker::Dot
    };

    f.render_widget(
        Canvas::default()
            .block(block)
            .marker(marker)
            .x_bounds([west, east])
            .y_bounds([south, north])
            .paint(|ctx| {
                // Crosshair through the viewport center
                ctx.draw(&CanvasLine {
                    x1: viewport.center_lon,
                    y1: south,
                    x2: viewport.center_lon,
                    y2: north,
                    color: Color::DarkGray,
                });
                ctx.draw(&CanvasLine {
                    x1: west,
                    y1: viewport.center_lat,
                    x2: east,
                    y2: viewport.center_lat,
                    color: Color::DarkGray,
                });

                if app.show_heat_layer {
                    for bin in &bins {
                        ctx.draw(&Points {
                            coords: &[(bin.lon, bin.lat)],
                            color: bin_color(bin.count, max_bin),
                        });
                    }
                    return;
                }

                for (color, coords) in &groups {
                    ctx.draw(&Points {
                        coords,
                        color: *color,
                    });
                }

                if let Some((lon, lat, color)) = selected {
                    let pulse = (app.animation_counter * 3.0).sin().mul_add(0.2, 0.8);
                    ctx.draw(&Circle {
                        x: lon,
                        y: lat,
                        radius: viewport.span * 0.06 * pulse,
                        color,
                    });
                }
            }),
        area,
    );
}

fn render_point_detail(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Point ")
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let Some(point) = app.selected_sample() else {
        let hint = if app.analysis.is_some() {
            "Up/Down: browse points\nEsc: clear selection"
        } else {
            "No data yet"
        };
        let paragraph = Paragraph::new(hint)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
        return;
    };

    let label_style = Style::default().fg(Color::Gray);
    let value_style = Style::default().fg(Color::White);

    let lines = vec![
        TextLine::from(vec![
            Span::styled("Position: ", label_style),
            Span::styled(
                format!("{:.4}, {:.4}", point.latitude, point.longitude),
                value_style,
            ),
        ]),
        TextLine::from(vec![
            Span::styled("Temperature: ", label_style),
            Span::styled(format!("{:.1} C", point.temperature), value_style),
        ]),
        TextLine::from(vec![
            Span::styled("Zone: ", label_style),
            Span::styled(
                point.zone.label(),
                Style::default()
                    .fg(zone_color(point.zone))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        TextLine::from(""),
        TextLine::from(Span::styled(
            point.recommendation_text().to_string(),
            Style::default().fg(Color::Yellow),
        )),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_parameters(app: &App, actions: &AppActions, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Parameters ")
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let label_style = Style::default().fg(Color::Gray);
    let value_style = Style::default().fg(Color::Yellow);

    let lines = vec![
        TextLine::from(vec![
            Span::styled("Sample points: ", label_style),
            Span::styled(app.params.num_points.to_string(), value_style),
            Span::styled("  (+/-)", label_style),
        ]),
        TextLine::from(vec![
            Span::styled("History window: ", label_style),
            Span::styled(format!("{} days", app.params.days_back), value_style),
            Span::styled("  ([/])", label_style),
        ]),
        TextLine::from(vec![
            Span::styled("Viewport: ", label_style),
            Span::styled(
                format!(
                    "{:.4}, {:.4} ±{:.2}",
                    actions.viewport.center_lat,
                    actions.viewport.center_lon,
                    actions.viewport.span
                ),
                value_style,
            ),
        ]),
        TextLine::from(Span::styled(
            "r: apply and refresh",
            Style::default().fg(Color::Gray),
        )),
    ];

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let status_text = if app.status_message.is_empty() {
        Text::from("")
    } else {
        Text::from(Span::styled(
            &app.status_message,
            Style::default().fg(Color::Green),
        ))
    };

    let paragraph = Paragraph::new(status_text)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(Color::Gray);

    let shortcuts = TextLine::from(vec![
        Span::styled("Tab", key_style),
        Span::styled(": Dashboard | ", text_style),
        Span::styled("r", key_style),
        Span::styled(": Refresh | ", text_style),
        Span::styled("z", key_style),
        Span::styled(": Zone filter | ", text_style),
        Span::styled("h", key_style),
        Span::styled(": Heat layer | ", text_style),
        Span::styled("e", key_style),
        Span::styled(": Export | ", text_style),
        Span::styled("F1", key_style),
        Span::styled(": Help | ", text_style),
        Span::styled("q", key_style),
        Span::styled(": Quit", text_style),
    ]);

    f.render_widget(
        Paragraph::new(shortcuts).alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{AnalysisResponse, SamplePoint, ZoneStatistics};
    use crate::app::state::Lifecycle;

    fn point(lat: f64, lon: f64, temperature: f64, zone: HeatZone) -> SamplePoint {
        SamplePoint {
            latitude: lat,
            longitude: lon,
            temperature,
            zone,
            recommendation: None,
        }
    }

    fn app_with_one_point_per_zone() -> App {
        let mut app = App::new();
        app.lifecycle = Lifecycle::Ready;
        app.begin_fetch();
        app.apply_fetch_success(AnalysisResponse {
            success: true,
            points: Some(3),
            days: Some(30),
            data: vec![
                point(20.29, 85.81, 30.5, HeatZone::Low),
                point(20.30, 85.82, 36.0, HeatZone::Medium),
                point(20.31, 85.83, 42.5, HeatZone::High),
            ],
            statistics: Some(ZoneStatistics {
                high: 1,
                medium: 1,
                low: 1,
            }),
            error: None,
        });
        app
    }

    #[test]
    fn three_zones_render_as_three_colored_markers() {
        let app = app_with_one_point_per_zone();
        let groups = zone_coordinates(&app);

        assert_eq!(groups[0].0, Color::Green);
        assert_eq!(groups[1].0, Color::Rgb(255, 165, 0));
        assert_eq!(groups[2].0, Color::Red);
        for (_, coords) in &groups {
            assert_eq!(coords.len(), 1);
        }

        let statistics = app.analysis.as_ref().unwrap().statistics;
        assert_eq!(statistics.low, 1);
        assert_eq!(statistics.medium, 1);
        assert_eq!(statistics.high, 1);
    }

    #[test]
    fn zone_filter_empties_the_other_marker_groups() {
        let mut app = app_with_one_point_per_zone();
        app.selected_zone = Some(HeatZone::High);

        let groups = zone_coordinates(&app);
        assert!(groups[0].1.is_empty());
        assert!(groups[1].1.is_empty());
        assert_eq!(groups[2].1, vec![(85.83, 20.31)]);
    }
}
