use ratatui::style::Color;

use crate::api::models::SamplePoint;
use crate::config::MapViewport;

pub const GRID_COLS: usize = 24;
pub const GRID_ROWS: usize = 16;

/// One occupied cell of the density grid, centered at (lon, lat).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatBin {
    pub lon: f64,
    pub lat: f64,
    pub count: usize,
}

/// Bin points into a GRID_COLS x GRID_ROWS density grid over the viewport.
/// Points outside the viewport are ignored.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn heat_bins(points: &[SamplePoint], viewport: &MapViewport) -> Vec<HeatBin> {
    let [west, east] = viewport.x_bounds();
    let [south, north] = viewport.y_bounds();
    let cell_w = (east - west) / GRID_COLS as f64;
    let cell_h = (north - south) / GRID_ROWS as f64;

    let mut counts = vec![0_usize; GRID_COLS * GRID_ROWS];
    for point in points {
        if !viewport.contains(point.latitude, point.longitude) {
            continue;
        }
        let col = (((point.longitude - west) / cell_w) as usize).min(GRID_COLS - 1);
        let row = (((point.latitude - south) / cell_h) as usize).min(GRID_ROWS - 1);
        counts[row * GRID_COLS + col] += 1;
    }

    counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(index, &count)| {
            let col = index % GRID_COLS;
            let row = index / GRID_COLS;
            HeatBin {
                lon: cell_w.mul_add(col as f64 + 0.5, west),
                lat: cell_h.mul_add(row as f64 + 0.5, south),
                count,
            }
        })
        .collect()
}

/// Intensity ramp for the overlay; denser cells read hotter.
#[allow(clippy::cast_precision_loss)]
pub fn bin_color(count: usize, max_count: usize) -> Color {
    let ratio = if max_count == 0 {
        0.0
    } else {
        count as f64 / max_count as f64
    };

    if ratio >= 0.66 {
        Color::Red
    } else if ratio >= 0.33 {
        Color::Rgb(255, 165, 0)
    } else {
        Color::Yellow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HeatZone;

    fn viewport() -> MapViewport {
        MapViewport {
            center_lat: 20.0,
            center_lon: 85.0,
            span: 0.5,
        }
    }

    fn point_at(lat: f64, lon: f64) -> SamplePoint {
        SamplePoint {
            latitude: lat,
            longitude: lon,
            temperature: 35.0,
            zone: HeatZone::Medium,
            recommendation: None,
        }
    }

    #[test]
    fn coincident_points_accumulate_in_one_bin() {
        let points = vec![
            point_at(20.0, 85.0),
            point_at(20.0, 85.0),
            point_at(20.0, 85.0),
        ];

        let bins = heat_bins(&points, &viewport());
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn bin_centers_stay_inside_the_viewport() {
        let view = viewport();
        let points = vec![point_at(19.51, 84.51), point_at(20.49, 85.49)];

        let bins = heat_bins(&points, &view);
        assert_eq!(bins.len(), 2);
        for bin in bins {
            assert!(view.contains(bin.lat, bin.lon));
        }
    }

    #[test]
    fn points_outside_the_viewport_are_ignored() {
        let points = vec![point_at(40.0, 85.0), point_at(20.0, 120.0)];
        assert!(heat_bins(&points, &viewport()).is_empty());
    }

    #[test]
    fn intensity_ramp_runs_yellow_to_red() {
        assert_eq!(bin_color(1, 10), Color::Yellow);
        assert_eq!(bin_color(5, 10), Color::Rgb(255, 165, 0));
        assert_eq!(bin_color(10, 10), Color::Red);
    }
}
