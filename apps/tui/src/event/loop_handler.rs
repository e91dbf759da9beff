use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fmt;
use std::io::Stdout;
use tokio::sync::oneshot;

use crate::api::models::{AnalysisExport, AnalysisResponse};
use crate::api::ClientError;
use crate::app::state::Analysis;
use crate::app::{handle_input, App, AppActions, Lifecycle, RequestParameters};
use crate::domain::HeatZone;
use crate::ui;

// Define states for the background request slot
#[derive(Clone, Copy, PartialEq, Debug)]
enum RequestState {
    Idle,
    Probing,
    Fetching,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Probing => write!(f, "Probing"),
            Self::Fetching => write!(f, "Fetching"),
        }
    }
}

// Define events for the background request slot
#[derive(Debug)]
enum RequestEvent {
    StartProbe,
    ProbeFinished(bool),
    StartFetch,
    FetchSucceeded(AnalysisResponse),
    FetchFailed(String),
}

impl fmt::Display for RequestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartProbe => write!(f, "StartProbe"),
            Self::ProbeFinished(healthy) => write!(f, "ProbeFinished({healthy})"),
            Self::StartFetch => write!(f, "StartFetch"),
            Self::FetchSucceeded(_) => write!(f, "FetchSucceeded"),
            Self::FetchFailed(message) => write!(f, "FetchFailed({message})"),
        }
    }
}

// Custom error type for invalid request transitions
#[derive(Debug)]
struct StateTransitionError {
    from: RequestState,
    event: String,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

/// State machine guarding the single background request slot. All shell
/// mutations triggered by request completion happen here, in one place.
struct RequestMachine {
    state: RequestState,
}

impl RequestMachine {
    const fn new() -> Self {
        Self {
            state: RequestState::Idle,
        }
    }

    fn process_event(
        &mut self,
        event: RequestEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let event_name = event.to_string();

        let next_state = match (self.state, event) {
            (RequestState::Idle, RequestEvent::StartProbe) => {
                app.begin_health_check();
                RequestState::Probing
            }
            (RequestState::Probing, RequestEvent::ProbeFinished(healthy)) => {
                app.health_result(healthy);
                if healthy {
                    // Becoming Ready triggers a fetch cycle
                    app.request_refresh();
                }
                RequestState::Idle
            }
            (RequestState::Idle, RequestEvent::StartFetch) => RequestState::Fetching,
            (RequestState::Fetching, RequestEvent::FetchSucceeded(response)) => {
                app.apply_fetch_success(response);
                RequestState::Idle
            }
            (RequestState::Fetching, RequestEvent::FetchFailed(message)) => {
                app.apply_fetch_error(message);
                RequestState::Idle
            }
            (state, _) => {
                return Err(StateTransitionError {
                    from: state,
                    event: event_name,
                })
            }
        };

        self.state = next_state;
        Ok(())
    }
}

/// Receiver for the one request allowed in flight at a time.
enum InFlight {
    Health(oneshot::Receiver<bool>),
    Fetch(oneshot::Receiver<std::result::Result<AnalysisResponse, ClientError>>),
}

fn spawn_health_probe(actions: &AppActions) -> Result<InFlight> {
    let client = actions.client()?.clone();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = tx.send(client.check_health().await);
    });

    Ok(InFlight::Health(rx))
}

fn spawn_fetch(actions: &AppActions, params: RequestParameters) -> Result<InFlight> {
    let client = actions.client()?.clone();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let outcome = client
            .fetch_analysis(params.num_points, params.days_back)
            .await;
        let _ = tx.send(outcome);
    });

    Ok(InFlight::Fetch(rx))
}

/// Poll the in-flight request without blocking the draw loop. Returns true
/// once the request has settled and the slot is free again.
fn settle_in_flight(flight: &mut InFlight, machine: &mut RequestMachine, app: &mut App) -> bool {
    use tokio::sync::oneshot::error::TryRecvError;

    match flight {
        InFlight::Health(rx) => match rx.try_recv() {
            Ok(healthy) => {
                let _ = machine.process_event(RequestEvent::ProbeFinished(healthy), app);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Closed) => {
                let _ = machine.process_event(RequestEvent::ProbeFinished(false), app);
                true
            }
        },
        InFlight::Fetch(rx) => match rx.try_recv() {
            Ok(Ok(response)) => {
                let _ = machine.process_event(RequestEvent::FetchSucceeded(response), app);
                true
            }
            Ok(Err(error)) => {
                let _ =
                    machine.process_event(RequestEvent::FetchFailed(error.to_string()), app);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Closed) => {
                let _ = machine.process_event(
                    RequestEvent::FetchFailed("analysis task ended unexpectedly".to_string()),
                    app,
                );
                true
            }
        },
    }
}

/// Run the application in headless mode (no UI)
pub async fn run_headless(app: &mut App, actions: &AppActions, json: bool) -> Result<()> {
    app.begin_health_check();
    let healthy = actions.check_health().await?;
    app.health_result(healthy);

    if !healthy {
        return Err(eyre!(
            "backend health check failed at {}",
            actions.client()?.base_url()
        ));
    }

    let params = app
        .begin_fetch()
        .ok_or_else(|| eyre!(app.error.clone().unwrap_or_default()))?;

    match actions
        .client()?
        .fetch_analysis(params.num_points, params.days_back)
        .await
    {
        Ok(response) => app.apply_fetch_success(response),
        Err(error) => {
            app.apply_fetch_error(error.to_string());
            return Err(eyre!("analysis fetch failed: {error}"));
        }
    }

    let analysis = app
        .analysis
        .as_ref()
        .ok_or_else(|| eyre!("no analysis loaded"))?;

    if json {
        render_headless_json(analysis)?;
    } else {
        render_headless_summary(params, analysis);
    }

    Ok(())
}

fn render_headless_json(analysis: &Analysis) -> Result<()> {
    let export = AnalysisExport {
        data: &analysis.data,
        statistics: &analysis.statistics,
        exported_at: chrono::Utc::now().to_rfc3339(),
    };
    let json = serde_json::to_string_pretty(&export)?;
    println!("{json}");
    Ok(())
}

fn render_headless_summary(params: RequestParameters, analysis: &Analysis) {
    println!("\nUHI Analysis");
    println!("============");
    println!("Sample points: {}", analysis.data.len());
    println!("History window: {} days", params.days_back);

    println!("\nZone counts:");
    for zone in HeatZone::ALL {
        println!(
            "- {}: {} ({:.1}%)",
            zone.label(),
            analysis.statistics.count(zone),
            analysis.statistics.share(zone) * 100.0
        );
    }

    if let Some(mean) = analysis.mean_temperature() {
        println!("\nMean temperature: {mean:.1} C");
    }

    if let Some(point) = analysis.hottest_point() {
        println!(
            "Hottest point: {:.4}, {:.4} at {:.1} C",
            point.latitude, point.longitude, point.temperature
        );
    }
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    actions: &AppActions,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    let mut machine = RequestMachine::new();
    let mut in_flight: Option<InFlight> = None;

    loop {
        // Update animations and the loading spinner
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, actions, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, actions, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_))
                | Err(_) => {
                    // Ignore non-key events for now
                }
            }
        }

        // Settle a finished background request
        let settled = in_flight
            .as_mut()
            .is_some_and(|flight| settle_in_flight(flight, &mut machine, app));
        if settled {
            in_flight = None;
        }

        // Start new work only while the slot is free
        if in_flight.is_none() {
            if app.lifecycle == Lifecycle::Uninitialized {
                if machine.process_event(RequestEvent::StartProbe, app).is_ok() {
                    in_flight = Some(spawn_health_probe(actions)?);
                }
            } else if app.refresh_requested {
                match app.lifecycle {
                    Lifecycle::Unhealthy => {
                        app.refresh_requested = false;
                        if machine.process_event(RequestEvent::StartProbe, app).is_ok() {
                            in_flight = Some(spawn_health_probe(actions)?);
                        }
                    }
                    Lifecycle::Ready => {
                        if let Some(params) = app.begin_fetch() {
                            if machine.process_event(RequestEvent::StartFetch, app).is_ok() {
                                in_flight = Some(spawn_fetch(actions, params)?);
                            } else {
                                app.apply_fetch_error(
                                    "request slot busy; try again".to_string(),
                                );
                            }
                        }
                    }
                    Lifecycle::Uninitialized | Lifecycle::HealthChecking => {
                        app.refresh_requested = false;
                    }
                }
            }
        }

        // Export inline; snapshot IO is small and keeps ordering simple
        if app.export_requested {
            app.export_requested = false;

            if let Some(analysis) = app.analysis.as_ref() {
                match actions.export_snapshot(analysis) {
                    Ok(path) => {
                        app.status_message = format!("Exported {}", path.display());
                    }
                    Err(e) => {
                        app.error = Some(format!("export failed: {e}"));
                    }
                }
            }

            if terminal.draw(|f| ui::ui(app, actions, f)).is_err() {
                // Non-fatal redraw error
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{SamplePoint, ZoneStatistics};

    fn response(points: usize) -> AnalysisResponse {
        let data = (0..points)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let temperature = 30.0 + i as f64;
                SamplePoint {
                    latitude: 20.29,
                    longitude: 85.82,
                    temperature,
                    zone: HeatZone::Low,
                    recommendation: None,
                }
            })
            .collect::<Vec<_>>();
        let statistics = ZoneStatistics::tally(&data);
        AnalysisResponse {
            success: true,
            points: None,
            days: None,
            data,
            statistics: Some(statistics),
            error: None,
        }
    }

    #[test]
    fn probe_success_queues_the_initial_fetch() {
        let mut app = App::new();
        let mut machine = RequestMachine::new();

        machine
            .process_event(RequestEvent::StartProbe, &mut app)
            .unwrap();
        assert_eq!(app.lifecycle, Lifecycle::HealthChecking);

        machine
            .process_event(RequestEvent::ProbeFinished(true), &mut app)
            .unwrap();
        assert_eq!(app.lifecycle, Lifecycle::Ready);
        assert!(app.refresh_requested);
    }

    #[test]
    fn probe_failure_leaves_no_fetch_queued() {
        let mut app = App::new();
        let mut machine = RequestMachine::new();

        machine
            .process_event(RequestEvent::StartProbe, &mut app)
            .unwrap();
        machine
            .process_event(RequestEvent::ProbeFinished(false), &mut app)
            .unwrap();

        assert_eq!(app.lifecycle, Lifecycle::Unhealthy);
        assert!(!app.refresh_requested);
    }

    #[test]
    fn fetch_events_settle_back_to_idle() {
        let mut app = App::new();
        app.lifecycle = Lifecycle::Ready;
        let mut machine = RequestMachine::new();

        app.begin_fetch();
        machine
            .process_event(RequestEvent::StartFetch, &mut app)
            .unwrap();
        machine
            .process_event(RequestEvent::FetchSucceeded(response(3)), &mut app)
            .unwrap();

        assert_eq!(machine.state, RequestState::Idle);
        assert_eq!(app.analysis.as_ref().unwrap().data.len(), 3);
    }

    #[test]
    fn out_of_order_events_are_rejected() {
        let mut app = App::new();
        let mut machine = RequestMachine::new();

        let error = machine
            .process_event(RequestEvent::FetchFailed("late".to_string()), &mut app)
            .unwrap_err();

        assert!(error.to_string().contains("Invalid transition"));
        assert_eq!(machine.state, RequestState::Idle);
    }
}
