pub mod controller;
pub mod loop_worker;
pub mod region;
pub mod stats;
pub mod throttle;

pub use controller::{EmotionMonitor, FrameOutcome};
pub use region::{extract_face, locate_face_box, FaceBox, FaceCrop, FaceLocator, Landmark};
pub use stats::MonitorStats;
pub use throttle::FrameThrottler;
