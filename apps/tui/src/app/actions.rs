use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use color_eyre::Result;

use crate::api::models::AnalysisExport;
use crate::api::ApiClient;
use crate::app::state::Analysis;
use crate::config::{export_dir, init_app_config, MapViewport};

/// Side-effecting collaborators of the shell: the backend client, the
/// export target, and the map viewport resolved from configuration.
#[derive(Debug)]
pub struct AppActions {
    pub export_dir: PathBuf,
    pub viewport: MapViewport,
    pub client: Option<ApiClient>,
}

impl AppActions {
    pub fn new() -> Self {
        Self {
            export_dir: PathBuf::from("."),
            viewport: MapViewport {
                center_lat: 0.0,
                center_lon: 0.0,
                span: 1.0,
            },
            client: None,
        }
    }

    pub fn initialize(&mut self) -> Result<()> {
        let (base_url, viewport) = init_app_config()?;

        self.viewport = viewport;
        self.export_dir = export_dir();
        self.client = Some(ApiClient::new(&base_url)?);

        Ok(())
    }

    pub fn client(&self) -> Result<&ApiClient> {
        self.client
            .as_ref()
            .ok_or_else(|| color_eyre::eyre::eyre!("API client not initialized"))
    }

    pub async fn check_health(&self) -> Result<bool> {
        Ok(self.client()?.check_health().await)
    }

    /// Write the current analysis as `uhi-analysis-<date>.json`. Read-only
    /// with respect to shell state.
    pub fn export_snapshot(&self, analysis: &Analysis) -> Result<PathBuf> {
        let now = Utc::now();

        if !self.export_dir.exists() {
            fs::create_dir_all(&self.export_dir)?;
        }

        let file_path = self
            .export_dir
            .join(format!("uhi-analysis-{}.json", now.format("%Y-%m-%d")));

        let export = AnalysisExport {
            data: &analysis.data,
            statistics: &analysis.statistics,
            exported_at: now.to_rfc3339(),
        };

        let json = serde_json::to_string_pretty(&export)?;
        fs::write(&file_path, json)?;

        Ok(file_path)
    }
}

impl Default for AppActions {
    fn default() -> Self {
        Self::new()
    }
}
