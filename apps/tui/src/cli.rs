use clap::Parser;

use crate::api::client::{MAX_DAYS, MAX_POINTS, MIN_DAYS, MIN_POINTS};

#[derive(Debug, Parser)]
#[command(name = "uhi_scope-tui", version, about = "Urban Heat Island TUI dashboard")]
pub struct CliArgs {
    /// Run one analysis, print the summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as the JSON export document
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override backend base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Override export directory
    #[arg(long = "export-dir", value_name = "PATH")]
    pub export_dir: Option<String>,

    /// Initial sample point count
    #[arg(long, value_name = "N", default_value_t = 100,
          value_parser = clap::value_parser!(i64).range(MIN_POINTS..=MAX_POINTS))]
    pub points: i64,

    /// Initial history window in days
    #[arg(long, value_name = "N", default_value_t = 30,
          value_parser = clap::value_parser!(i64).range(MIN_DAYS..=MAX_DAYS))]
    pub days: i64,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.api_url {
            std::env::set_var("UHI_API_URL", url);
        }
        if let Some(dir) = &self.export_dir {
            std::env::set_var("UHI_EXPORT_DIR", dir);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
