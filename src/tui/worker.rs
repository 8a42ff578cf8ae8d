//! Background workers for network requests.
//!
//! Requests never run on the render thread: each is a one-shot worker
//! thread reporting over an mpsc channel that the main loop drains each
//! tick. The health monitor is the only periodic task; it carries a stop
//! flag so the session teardown can cancel it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::application::AssessmentService;
use crate::domain::{PatientRecord, PredictionRecord};
use crate::ports::{ApiHealth, ModelInfo, PredictionApi, StatsReport};

/// Interval between liveness probes.
pub const HEALTH_PROBE_INTERVAL: Duration = Duration::from_secs(30);

/// Granularity at which the monitor re-checks its stop flag while idle.
const STOP_POLL_SLICE: Duration = Duration::from_millis(200);

/// Outcome of a prediction request.
#[derive(Debug, Clone)]
pub enum PredictOutcome {
    /// Assessment complete with the composed history record
    Complete(PredictionRecord),
    /// Request failed; message is ready for inline display
    Error(String),
}

/// Message from a statistics fetch, tagged with its request sequence
/// number so the shell can discard responses superseded by a newer fetch.
#[derive(Debug, Clone)]
pub struct StatsMessage {
    pub seq: u64,
    pub result: Result<StatsReport, String>,
}

/// Handle to a running one-shot request worker.
pub struct RequestHandle<T> {
    rx: Receiver<T>,
    _handle: JoinHandle<()>,
}

impl<T> RequestHandle<T> {
    /// Try to receive the result (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

/// Spawn a one-shot worker thread producing a single message.
fn spawn_request<T, F>(job: F) -> RequestHandle<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        // The receiver may be gone if a newer request superseded this one.
        let _ = tx.send(job());
    });

    RequestHandle { rx, _handle: handle }
}

/// Worker for prediction submissions.
pub struct PredictWorker;

impl PredictWorker {
    /// Spawn a background submission.
    pub fn spawn<A>(
        service: Arc<AssessmentService<A>>,
        patient: PatientRecord,
    ) -> RequestHandle<PredictOutcome>
    where
        A: PredictionApi + 'static,
    {
        spawn_request(move || match service.submit(patient) {
            Ok(record) => PredictOutcome::Complete(record),
            Err(err) => PredictOutcome::Error(err.user_message()),
        })
    }
}

/// Worker for statistics fetches.
pub struct StatsWorker;

impl StatsWorker {
    /// Spawn a background statistics fetch carrying `seq`.
    pub fn spawn<A>(service: Arc<AssessmentService<A>>, seq: u64) -> RequestHandle<StatsMessage>
    where
        A: PredictionApi + 'static,
    {
        spawn_request(move || StatsMessage {
            seq,
            result: service.fetch_statistics().map_err(|err| err.to_string()),
        })
    }
}

/// Worker for the one-time model metadata fetch.
pub struct ModelInfoWorker;

impl ModelInfoWorker {
    /// Spawn the fetch; a failure is logged and reported as `None`.
    pub fn spawn<A>(service: Arc<AssessmentService<A>>) -> RequestHandle<Option<ModelInfo>>
    where
        A: PredictionApi + 'static,
    {
        spawn_request(move || match service.fetch_model_info() {
            Ok(info) => Some(info),
            Err(err) => {
                tracing::warn!("Failed to fetch model info: {err}");
                None
            }
        })
    }
}

/// Handle to the periodic health monitor.
///
/// The monitor probes immediately on spawn and then once per interval
/// until stopped. `stop` must be called during teardown so the probe
/// thread does not outlive the UI session.
pub struct HealthMonitorHandle {
    rx: Receiver<ApiHealth>,
    stop: Arc<AtomicBool>,
    _handle: JoinHandle<()>,
}

impl HealthMonitorHandle {
    /// Try to receive the latest probe outcome (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<ApiHealth> {
        self.rx.try_recv().ok()
    }

    /// Signal the monitor thread to exit after its current cycle.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for HealthMonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Periodic liveness probe against the prediction service.
pub struct HealthMonitor;

impl HealthMonitor {
    /// Spawn the monitor with the given probe interval.
    pub fn spawn<A>(
        service: Arc<AssessmentService<A>>,
        interval: Duration,
    ) -> HealthMonitorHandle
    where
        A: PredictionApi + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                let status = service.probe_health();
                if tx.send(status).is_err() {
                    break;
                }

                // Sleep in slices so a stop request is honored promptly.
                let mut remaining = interval;
                while !stop_flag.load(Ordering::Relaxed) && remaining > Duration::ZERO {
                    let slice = remaining.min(STOP_POLL_SLICE);
                    thread::sleep(slice);
                    remaining = remaining.saturating_sub(slice);
                }
            }
        });

        HealthMonitorHandle { rx, stop, _handle: handle }
    }
}
