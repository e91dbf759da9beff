use std::time::Instant;

use chrono::{DateTime, Utc};
use throbber_widgets_tui::ThrobberState;

use crate::api::client::{validate_parameters, MAX_DAYS, MIN_DAYS, MIN_POINTS};
use crate::api::models::{AnalysisResponse, SamplePoint, ZoneStatistics};
use crate::domain::HeatZone;

/// Interactive stepping stays below the hard validation ceiling, matching
/// the parameter control's smaller range.
pub const UI_MAX_POINTS: i64 = 200;

const POINTS_STEP: i64 = 10;
const DAYS_STEP: i64 = 1;

pub const UNHEALTHY_MESSAGE: &str =
    "backend health check failed; press 'r' to retry once the service is up";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestParameters {
    pub num_points: i64,
    pub days_back: i64,
}

impl RequestParameters {
    pub const fn new(num_points: i64, days_back: i64) -> Self {
        Self {
            num_points,
            days_back,
        }
    }

    pub fn increase_points(&mut self) {
        self.num_points = (self.num_points + POINTS_STEP).min(UI_MAX_POINTS);
    }

    pub fn decrease_points(&mut self) {
        self.num_points = (self.num_points - POINTS_STEP).max(MIN_POINTS);
    }

    pub fn widen_days(&mut self) {
        self.days_back = (self.days_back + DAYS_STEP).min(MAX_DAYS);
    }

    pub fn narrow_days(&mut self) {
        self.days_back = (self.days_back - DAYS_STEP).max(MIN_DAYS);
    }

    pub fn validate(&self) -> Vec<String> {
        validate_parameters(self.num_points, self.days_back)
    }
}

impl Default for RequestParameters {
    fn default() -> Self {
        Self::new(100, 30)
    }
}

/// Startup lifecycle. Unhealthy is terminal until an explicit retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    HealthChecking,
    Unhealthy,
    Ready,
}

/// Phase of the current fetch cycle within Ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Map,
    Dashboard,
}

/// One fetch response, swapped in wholesale. Points and statistics always
/// come from the same response; they are never mixed across fetches.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub data: Vec<SamplePoint>,
    pub statistics: ZoneStatistics,
    pub loaded_at: DateTime<Utc>,
}

impl Analysis {
    pub fn mean_temperature(&self) -> Option<f64> {
        if self.data.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.data.len() as f64;
        Some(self.data.iter().map(|point| point.temperature).sum::<f64>() / count)
    }

    pub fn hottest_point(&self) -> Option<&SamplePoint> {
        self.data
            .iter()
            .max_by(|a, b| a.temperature.total_cmp(&b.temperature))
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub lifecycle: Lifecycle,
    pub fetch_phase: FetchPhase,
    pub screen: AppScreen,
    pub show_help: bool,
    pub params: RequestParameters,
    pub analysis: Option<Analysis>,
    pub error: Option<String>,
    pub status_message: String,
    pub selected_zone: Option<HeatZone>,
    pub selected_point: Option<usize>,
    pub show_heat_layer: bool,
    pub refresh_requested: bool,
    pub export_requested: bool,
    pub animation_counter: f64,
    pub last_frame: Instant,
    pub throbber: ThrobberState,
}

impl App {
    pub fn new() -> Self {
        Self::with_params(RequestParameters::default())
    }

    pub fn with_params(params: RequestParameters) -> Self {
        Self {
            running: true,
            lifecycle: Lifecycle::Uninitialized,
            fetch_phase: FetchPhase::Idle,
            screen: AppScreen::Map,
            show_help: false,
            params,
            analysis: None,
            error: None,
            status_message: String::new(),
            selected_zone: None,
            selected_point: None,
            show_heat_layer: false,
            refresh_requested: false,
            export_requested: false,
            animation_counter: 0.0,
            last_frame: Instant::now(),
            throbber: ThrobberState::default(),
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        // Animation counter cycles between 0 and 2*PI
        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        if self.fetch_phase == FetchPhase::Loading || self.lifecycle == Lifecycle::HealthChecking {
            self.throbber.calc_next();
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.fetch_phase, FetchPhase::Loading)
            || matches!(self.lifecycle, Lifecycle::HealthChecking)
    }

    pub fn begin_health_check(&mut self) {
        self.lifecycle = Lifecycle::HealthChecking;
        self.error = None;
        self.status_message = "Checking backend health...".to_string();
    }

    pub fn health_result(&mut self, healthy: bool) {
        if healthy {
            self.lifecycle = Lifecycle::Ready;
            self.status_message = "Backend online".to_string();
        } else {
            self.lifecycle = Lifecycle::Unhealthy;
            self.error = Some(UNHEALTHY_MESSAGE.to_string());
        }
    }

    /// Flag an explicit refresh. Ignored while a request is in flight so at
    /// most one fetch exists at a time.
    pub fn request_refresh(&mut self) {
        if self.is_loading() {
            return;
        }
        self.refresh_requested = true;
    }

    /// Consume a pending refresh request. Validation failures settle the
    /// cycle immediately; only a valid pair reaches the network.
    pub fn begin_fetch(&mut self) -> Option<RequestParameters> {
        self.refresh_requested = false;

        let problems = self.params.validate();
        if !problems.is_empty() {
            self.fetch_phase = FetchPhase::Failed;
            self.error = Some(problems.join("; "));
            return None;
        }

        self.fetch_phase = FetchPhase::Loading;
        self.error = None;
        self.status_message = format!(
            "Fetching {} points over {} days...",
            self.params.num_points, self.params.days_back
        );
        Some(self.params)
    }

    pub fn apply_fetch_success(&mut self, response: AnalysisResponse) {
        let statistics = response
            .statistics
            .unwrap_or_else(|| ZoneStatistics::tally(&response.data));

        self.analysis = Some(Analysis {
            data: response.data,
            statistics,
            loaded_at: Utc::now(),
        });
        self.fetch_phase = FetchPhase::Loaded;
        self.error = None;
        self.selected_point = None;
        self.status_message = format!(
            "Loaded {} sample points",
            self.analysis.as_ref().map_or(0, |analysis| analysis.data.len())
        );
    }

    pub fn apply_fetch_error(&mut self, message: String) {
        self.fetch_phase = FetchPhase::Failed;
        self.error = Some(message);
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Flag an export of the current analysis; a no-op until data exists.
    pub fn request_export(&mut self) {
        if self.analysis.is_none() {
            self.status_message = "Nothing to export yet".to_string();
            return;
        }
        self.export_requested = true;
    }

    /// Cycle the legend filter: all -> low -> medium -> high -> all.
    /// Pure view-state change; never touches the network.
    pub fn cycle_zone_filter(&mut self) {
        self.selected_zone = match self.selected_zone {
            None => Some(HeatZone::Low),
            Some(HeatZone::Low) => Some(HeatZone::Medium),
            Some(HeatZone::Medium) => Some(HeatZone::High),
            Some(HeatZone::High) => None,
        };

        // Selection must stay within the filtered view
        if let Some(index) = self.selected_point {
            if !self.visible_indices().contains(&index) {
                self.selected_point = None;
            }
        }
    }

    pub fn toggle_heat_layer(&mut self) {
        self.show_heat_layer = !self.show_heat_layer;
    }

    /// Indices into the loaded data that pass the zone filter.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.analysis.as_ref().map_or_else(Vec::new, |analysis| {
            analysis
                .data
                .iter()
                .enumerate()
                .filter(|(_, point)| {
                    self.selected_zone
                        .map_or(true, |zone| point.zone == zone)
                })
                .map(|(index, _)| index)
                .collect()
        })
    }

    pub fn select_next_point(&mut self) {
        self.move_selection(1);
    }

    pub fn select_prev_point(&mut self) {
        self.move_selection(-1);
    }

    pub fn selected_sample(&self) -> Option<&SamplePoint> {
        let analysis = self.analysis.as_ref()?;
        analysis.data.get(self.selected_point?)
    }

    fn move_selection(&mut self, step: isize) {
        let visible = self.visible_indices();
        if visible.is_empty() {
            self.selected_point = None;
            return;
        }

        let position = self
            .selected_point
            .and_then(|index| visible.iter().position(|&i| i == index));

        let next = match position {
            Some(position) => {
                let len = visible.len() as isize;
                ((position as isize + step).rem_euclid(len)) as usize
            }
            None => 0,
        };

        self.selected_point = Some(visible[next]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HeatZone;

    fn sample(zone: HeatZone, temperature: f64) -> SamplePoint {
        SamplePoint {
            latitude: 20.3,
            longitude: 85.82,
            temperature,
            zone,
            recommendation: None,
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new();
        app.lifecycle = Lifecycle::Ready;
        app.begin_fetch();
        app.apply_fetch_success(AnalysisResponse {
            success: true,
            points: Some(3),
            days: Some(30),
            data: vec![
                sample(HeatZone::Low, 30.0),
                sample(HeatZone::Medium, 36.0),
                sample(HeatZone::High, 42.0),
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
    fn successful_fetch_moves_loading_to_loaded_with_payload_fields() {
        let mut app = App::new();
        app.lifecycle = Lifecycle::Ready;

        assert_eq!(app.begin_fetch(), Some(RequestParameters::default()));
        assert_eq!(app.fetch_phase, FetchPhase::Loading);

        let data = vec![sample(HeatZone::High, 44.0), sample(HeatZone::Low, 29.0)];
        app.apply_fetch_success(AnalysisResponse {
            success: true,
            points: Some(2),
            days: Some(30),
            data: data.clone(),
            statistics: Some(ZoneStatistics {
                high: 1,
                medium: 0,
                low: 1,
            }),
            error: None,
        });

        assert_eq!(app.fetch_phase, FetchPhase::Loaded);
        let analysis = app.analysis.as_ref().unwrap();
        assert_eq!(analysis.data, data);
        assert_eq!(analysis.statistics.high, 1);
        assert_eq!(app.error, None);
    }

    #[test]
    fn statistics_fall_back_to_a_tally_when_the_payload_has_none() {
        let mut app = App::new();
        app.lifecycle = Lifecycle::Ready;
        app.begin_fetch();
        app.apply_fetch_success(AnalysisResponse {
            success: true,
            points: None,
            days: None,
            data: vec![sample(HeatZone::High, 41.0), sample(HeatZone::High, 43.0)],
            statistics: None,
            error: None,
        });

        assert_eq!(app.analysis.as_ref().unwrap().statistics.high, 2);
    }

    #[test]
    fn fetch_error_message_is_surfaced_in_the_banner() {
        let mut app = App::new();
        app.lifecycle = Lifecycle::Ready;
        app.begin_fetch();

        let error = crate::api::ClientError::Http {
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        app.apply_fetch_error(error.to_string());

        assert_eq!(app.fetch_phase, FetchPhase::Failed);
        assert!(app.error.as_ref().unwrap().contains("502"));
    }

    #[test]
    fn invalid_parameters_fail_before_any_network_call() {
        let mut app = App::with_params(RequestParameters::new(5, 400));
        app.lifecycle = Lifecycle::Ready;

        assert_eq!(app.begin_fetch(), None);
        assert_eq!(app.fetch_phase, FetchPhase::Failed);
        let banner = app.error.unwrap();
        assert!(banner.contains("got 5"));
        assert!(banner.contains("got 400"));
    }

    #[test]
    fn refresh_is_ignored_while_a_request_is_in_flight() {
        let mut app = App::new();
        app.lifecycle = Lifecycle::Ready;
        app.begin_fetch();
        assert_eq!(app.fetch_phase, FetchPhase::Loading);

        app.request_refresh();
        assert!(!app.refresh_requested);
    }

    #[test]
    fn unhealthy_sets_a_persistent_banner_until_retried() {
        let mut app = App::new();
        app.begin_health_check();
        app.health_result(false);

        assert_eq!(app.lifecycle, Lifecycle::Unhealthy);
        assert_eq!(app.error.as_deref(), Some(UNHEALTHY_MESSAGE));

        app.begin_health_check();
        app.health_result(true);
        assert_eq!(app.lifecycle, Lifecycle::Ready);
        assert_eq!(app.error, None);
    }

    #[test]
    fn zone_cycling_only_changes_the_filter() {
        let mut app = loaded_app();
        let before = app.analysis.clone();

        app.cycle_zone_filter();
        assert_eq!(app.selected_zone, Some(HeatZone::Low));
        app.cycle_zone_filter();
        app.cycle_zone_filter();
        assert_eq!(app.selected_zone, Some(HeatZone::High));
        app.cycle_zone_filter();
        assert_eq!(app.selected_zone, None);

        assert_eq!(app.fetch_phase, FetchPhase::Loaded);
        assert_eq!(app.analysis, before);
        assert!(!app.refresh_requested);
    }

    #[test]
    fn zone_filter_narrows_the_visible_points() {
        let mut app = loaded_app();
        assert_eq!(app.visible_indices(), vec![0, 1, 2]);

        app.selected_zone = Some(HeatZone::High);
        assert_eq!(app.visible_indices(), vec![2]);
    }

    #[test]
    fn selection_wraps_within_the_filtered_view() {
        let mut app = loaded_app();
        app.selected_zone = Some(HeatZone::Medium);

        app.select_next_point();
        assert_eq!(app.selected_point, Some(1));
        app.select_next_point();
        assert_eq!(app.selected_point, Some(1));

        app.selected_zone = None;
        app.select_prev_point();
        assert_eq!(app.selected_point, Some(0));
        app.select_prev_point();
        assert_eq!(app.selected_point, Some(2));
    }

    #[test]
    fn narrowing_the_filter_drops_a_hidden_selection() {
        let mut app = loaded_app();
        app.select_next_point();
        assert_eq!(app.selected_point, Some(0));

        app.cycle_zone_filter(); // low: index 0 still visible
        assert_eq!(app.selected_point, Some(0));
        app.cycle_zone_filter(); // medium: index 0 hidden
        assert_eq!(app.selected_point, None);
    }

    #[test]
    fn parameter_steps_clamp_to_the_interactive_range() {
        let mut params = RequestParameters::new(UI_MAX_POINTS - 5, MAX_DAYS);
        params.increase_points();
        assert_eq!(params.num_points, UI_MAX_POINTS);
        params.widen_days();
        assert_eq!(params.days_back, MAX_DAYS);

        let mut params = RequestParameters::new(MIN_POINTS, MIN_DAYS);
        params.decrease_points();
        assert_eq!(params.num_points, MIN_POINTS);
        params.narrow_days();
        assert_eq!(params.days_back, MIN_DAYS);
    }

    #[test]
    fn fresh_data_resets_the_point_selection() {
        let mut app = loaded_app();
        app.select_next_point();
        assert!(app.selected_point.is_some());

        app.begin_fetch();
        app.apply_fetch_success(AnalysisResponse {
            success: true,
            points: Some(1),
            days: Some(30),
            data: vec![sample(HeatZone::Low, 31.0)],
            statistics: None,
            error: None,
        });

        assert_eq!(app.selected_point, None);
    }
}
