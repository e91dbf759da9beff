#[allow(clippy::module_inception)]
mod config;

pub use config::{api_base_url, export_dir, init_app_config, map_viewport, MapViewport};
