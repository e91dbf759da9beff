use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::api::models::ZoneStatistics;
use crate::app::App;
use crate::domain::HeatZone;

pub const fn zone_color(zone: HeatZone) -> Color {
    match zone {
        HeatZone::Low => Color::Green,
        HeatZone::Medium => Color::Rgb(255, 165, 0),
        HeatZone::High => Color::Red,
    }
}

/// Zone counts with the active filter highlighted. Reads statistics only;
/// selecting a zone elsewhere never changes the counts shown here.
pub fn render_legend(app: &App, f: &mut Frame<'_>, area: Rect) {
    let statistics = app
        .analysis
        .as_ref()
        .map_or_else(ZoneStatistics::default, |analysis| analysis.statistics);

    let block = Block::default()
        .title(" Zones ")
        .title_style(Style::default().fg(Color::Cyan))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut lines = vec![filter_line("All zones", None, app.selected_zone)];
    for zone in HeatZone::ALL {
        lines.push(zone_line(zone, &statistics, app.selected_zone));
    }
    lines.push(TextLine::from(Span::styled(
        "z: cycle filter",
        Style::default().fg(Color::Gray),
    )));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn filter_line(
    label: &str,
    this: Option<HeatZone>,
    selected: Option<HeatZone>,
) -> TextLine<'_> {
    let is_selected = this == selected;
    let style = if is_selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let prefix = if is_selected { ">" } else { " " };

    TextLine::from(Span::styled(format!("{prefix} {label}"), style))
}

fn zone_line(
    zone: HeatZone,
    statistics: &ZoneStatistics,
    selected: Option<HeatZone>,
) -> TextLine<'static> {
    let is_selected = selected == Some(zone);
    let marker_style = Style::default().fg(zone_color(zone));
    let label_style = if is_selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let prefix = if is_selected { ">" } else { " " };

    TextLine::from(vec![
        Span::styled(format!("{prefix} "), label_style),
        Span::styled("●", marker_style),
        Span::styled(
            format!(
                " {:<12} {:>4} ({:>5.1}%)",
                zone.label(),
                statistics.count(zone),
                statistics.share(zone) * 100.0
            ),
            label_style,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::SamplePoint;

    fn sample(zone: HeatZone) -> SamplePoint {
        SamplePoint {
            latitude: 20.3,
            longitude: 85.82,
            temperature: 35.0,
            zone,
            recommendation: None,
        }
    }

    #[test]
    fn zone_colors_follow_severity() {
        assert_eq!(zone_color(HeatZone::Low), Color::Green);
        assert_eq!(zone_color(HeatZone::Medium), Color::Rgb(255, 165, 0));
        assert_eq!(zone_color(HeatZone::High), Color::Red);
    }

    #[test]
    fn one_point_per_zone_yields_unit_counts() {
        let points = vec![
            sample(HeatZone::Low),
            sample(HeatZone::Medium),
            sample(HeatZone::High),
        ];
        let statistics = ZoneStatistics::tally(&points);

        for zone in HeatZone::ALL {
            assert_eq!(statistics.count(zone), 1);
        }
    }
}
