mod utils;

pub mod bridge;
pub mod classifier;
pub mod intervention;
pub mod models;
pub mod sensing;
pub mod settings;
pub mod window;

pub use bridge::{
    ChannelEmitter, LogEmitter, PresentationBridge, PromptVariant, StateChange, StateEmitter,
    StatePayload, UserAction,
};
pub use classifier::{ClassifyError, EmotionClassifier, FaceImage, HttpClassifier};
pub use intervention::{
    CooldownReason, InterventionConfig, InterventionController, InterventionState, SchedulerState,
};
pub use models::EmotionLabel;
pub use sensing::{EmotionMonitor, FaceLocator, FrameOutcome, Landmark, MonitorStats};
pub use settings::MonitorSettings;
pub use utils::init_logging;
pub use window::{DistressVerdict, WindowAggregator, WindowConfig};

/// Loads settings (env overrides applied), sets up logging and starts a
/// monitoring session that talks to the HTTP classifier.
pub fn start_monitor(
    settings_path: impl AsRef<std::path::Path>,
    locator: std::sync::Arc<dyn FaceLocator>,
    emitter: std::sync::Arc<dyn StateEmitter>,
) -> anyhow::Result<EmotionMonitor> {
    let settings = MonitorSettings::load(settings_path)?.with_env_overrides();
    init_logging(settings.debug);

    log::info!("moodbreak starting up, classifier at {}", settings.classifier_url);

    let classifier = HttpClassifier::new(settings.classifier_url.clone(), settings.classifier_timeout())?;
    Ok(EmotionMonitor::start(
        settings,
        locator,
        std::sync::Arc::new(classifier),
        emitter,
    ))
}
