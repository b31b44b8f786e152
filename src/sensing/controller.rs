use anyhow::{Context, Result};
use image::DynamicImage;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
    time::{self, Instant},
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::bridge::{PresentationBridge, StateEmitter};
use crate::classifier::{ClassifyError, EmotionClassifier, FaceImage};
use crate::intervention::{InterventionController, SchedulerState};
use crate::models::EmotionLabel;
use crate::settings::MonitorSettings;
use crate::window::WindowAggregator;

use super::loop_worker::aggregation_loop;
use super::region::{extract_face, FaceCrop, FaceLocator};
use super::stats::{MonitorCounters, MonitorStats};
use super::throttle::FrameThrottler;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// What happened to one captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Arrived inside the sampling interval and was dropped
    Throttled,
    /// Sampled, but an intervention is active and sampling is paused
    Paused,
    /// Sampled, but no usable face region was found
    NoFace,
    /// Face crop handed to the classifier
    Submitted,
    /// The monitor has been shut down
    Stopped,
}

/// One monitoring session: frames in, throttled face crops out to the
/// classifier, labels back into the window, verdicts into the scheduler.
pub struct EmotionMonitor {
    session_id: Uuid,
    settings: MonitorSettings,
    throttler: Mutex<FrameThrottler>,
    locator: Arc<dyn FaceLocator>,
    classifier: Arc<dyn EmotionClassifier>,
    controller: InterventionController,
    samples_tx: mpsc::UnboundedSender<EmotionLabel>,
    counters: Arc<MonitorCounters>,
    cancel_token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl EmotionMonitor {
    /// Starts a session. Must be called from within a tokio runtime.
    pub fn start(
        settings: MonitorSettings,
        locator: Arc<dyn FaceLocator>,
        classifier: Arc<dyn EmotionClassifier>,
        emitter: Arc<dyn StateEmitter>,
    ) -> Self {
        let controller = InterventionController::new(settings.intervention_config(), emitter);
        Self::with_controller(settings, locator, classifier, controller)
    }

    pub fn with_controller(
        settings: MonitorSettings,
        locator: Arc<dyn FaceLocator>,
        classifier: Arc<dyn EmotionClassifier>,
        controller: InterventionController,
    ) -> Self {
        let session_id = Uuid::new_v4();
        // dropping the monitor cancels the loop and every scheduler timer
        let cancel_token = controller.session_token();
        let counters = Arc::new(MonitorCounters::default());
        let (samples_tx, samples_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(aggregation_loop(
            samples_rx,
            WindowAggregator::new(settings.window_config()),
            controller.clone(),
            counters.clone(),
            cancel_token.clone(),
        ));

        log_info!(
            "monitor session {} started (sampling every {}ms, window {})",
            session_id,
            settings.sample_interval_ms,
            settings.window_size
        );

        Self {
            session_id,
            throttler: Mutex::new(FrameThrottler::new(settings.sample_interval())),
            settings,
            locator,
            classifier,
            controller,
            samples_tx,
            counters,
            cancel_token,
            handle: Some(handle),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn bridge(&self) -> PresentationBridge {
        PresentationBridge::new(self.controller.clone())
    }

    pub fn controller(&self) -> &InterventionController {
        &self.controller
    }

    pub fn stats(&self) -> MonitorStats {
        self.counters.snapshot()
    }

    /// Entry point for the capture loop, called at whatever rate frames arrive.
    /// Never waits on the classifier.
    pub async fn observe_frame(&self, frame: &DynamicImage, at: Instant) -> FrameOutcome {
        if self.cancel_token.is_cancelled() {
            return FrameOutcome::Stopped;
        }
        self.counters.record_frame();

        if !self.throttler.lock().await.should_process(at) {
            return FrameOutcome::Throttled;
        }
        self.counters.record_sampled();

        if self.settings.pause_sampling_while_engaged
            && self.controller.state().await != SchedulerState::Idle
        {
            return FrameOutcome::Paused;
        }

        let landmarks = self.locator.locate(frame);
        let Some(crop) = extract_face(frame, landmarks.as_deref(), self.settings.crop_padding_px)
        else {
            log_debug!("no usable face in sampled frame");
            return FrameOutcome::NoFace;
        };

        self.counters.record_submitted();
        self.spawn_classification(crop);
        FrameOutcome::Submitted
    }

    fn spawn_classification(&self, crop: FaceCrop) {
        let classifier = self.classifier.clone();
        let samples_tx = self.samples_tx.clone();
        let counters = self.counters.clone();
        let timeout = self.settings.classifier_timeout();

        tokio::spawn(async move {
            match classify_crop(classifier.as_ref(), crop, timeout).await {
                Ok(label) => {
                    if samples_tx.send(label).is_err() {
                        // session already torn down
                        counters.record_dropped();
                    }
                }
                Err(err @ ClassifyError::Encode(_)) => {
                    counters.record_dropped();
                    log_error!("emotion sample dropped: {err}");
                }
                Err(err) => {
                    counters.record_dropped();
                    log_warn!("emotion sample dropped: {err}");
                }
            }
        });
    }

    /// Stops sampling and all scheduler timers. Classifier calls still in
    /// flight finish on their own and their labels are discarded.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.cancel_token.cancel();
        self.controller.shutdown().await;

        let stats = self.counters.snapshot();
        log_info!(
            "monitor session {} stopping: {} frames, {} samples, {} dropped, {} windows",
            self.session_id,
            stats.frames_seen,
            stats.samples_observed,
            stats.samples_dropped,
            stats.windows_evaluated
        );

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("aggregation loop task failed to join")?;
        }
        Ok(())
    }
}

impl Drop for EmotionMonitor {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn classify_crop(
    classifier: &dyn EmotionClassifier,
    crop: FaceCrop,
    timeout: Duration,
) -> Result<EmotionLabel, ClassifyError> {
    let jpeg = tokio::task::spawn_blocking(move || crop.to_jpeg())
        .await
        .map_err(|err| ClassifyError::Encode(err.to_string()))?
        .map_err(|err| ClassifyError::Encode(format!("{err:#}")))?;

    match time::timeout(timeout, classifier.classify(FaceImage { jpeg })).await {
        Ok(result) => result,
        Err(_) => Err(ClassifyError::TimedOut(timeout)),
    }
}
