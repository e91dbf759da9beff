use color_eyre::eyre::eyre;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

// Sampling area the backend draws from by default (Bhubaneswar).
const DEFAULT_CENTER_LAT: f64 = 20.2961;
const DEFAULT_CENTER_LON: f64 = 85.8245;
const DEFAULT_VIEW_SPAN: f64 = 0.05;

/// Geographic rectangle the map canvas projects onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center_lat: f64,
    pub center_lon: f64,
    pub span: f64,
}

impl MapViewport {
    pub fn x_bounds(&self) -> [f64; 2] {
        [self.center_lon - self.span, self.center_lon + self.span]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        [self.center_lat - self.span, self.center_lat + self.span]
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        let [west, east] = self.x_bounds();
        let [south, north] = self.y_bounds();
        (west..=east).contains(&longitude) && (south..=north).contains(&latitude)
    }
}

/// Initializes the application configuration
/// Returns the backend base URL and the map viewport
pub fn init_app_config() -> color_eyre::eyre::Result<(String, MapViewport)> {
    // Load environment variables from .env file
    dotenv().ok();

    Ok((api_base_url(), map_viewport()?))
}

/// Backend base URL, overridable via UHI_API_URL
pub fn api_base_url() -> String {
    env::var("UHI_API_URL")
        .map(|url| url.trim().to_string())
        .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Directory exported analysis snapshots are written to
pub fn export_dir() -> PathBuf {
    env::var("UHI_EXPORT_DIR").map_or_else(|_| PathBuf::from("."), PathBuf::from)
}

/// Map viewport, overridable via UHI_CENTER_LAT / UHI_CENTER_LON / UHI_VIEW_SPAN
pub fn map_viewport() -> color_eyre::eyre::Result<MapViewport> {
    let center_lat = env_f64("UHI_CENTER_LAT")?.unwrap_or(DEFAULT_CENTER_LAT);
    let center_lon = env_f64("UHI_CENTER_LON")?.unwrap_or(DEFAULT_CENTER_LON);
    let span = env_f64("UHI_VIEW_SPAN")?.unwrap_or(DEFAULT_VIEW_SPAN);

    if span <= 0.0 {
        return Err(eyre!("UHI_VIEW_SPAN must be positive, got {span}"));
    }

    Ok(MapViewport {
        center_lat,
        center_lon,
        span,
    })
}

fn env_f64(key: &str) -> color_eyre::eyre::Result<Option<f64>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| eyre!("{key} is not a number: {raw}")),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_bounds_are_centered_on_the_city() {
        let viewport = MapViewport {
            center_lat: 20.0,
            center_lon: 85.0,
            span: 0.5,
        };

        assert_eq!(viewport.x_bounds(), [84.5, 85.5]);
        assert_eq!(viewport.y_bounds(), [19.5, 20.5]);
    }

    #[test]
    fn viewport_contains_checks_both_axes() {
        let viewport = MapViewport {
            center_lat: 20.0,
            center_lon: 85.0,
            span: 0.1,
        };

        assert!(viewport.contains(20.05, 85.05));
        assert!(!viewport.contains(20.5, 85.05));
        assert!(!viewport.contains(20.05, 84.0));
    }
}
