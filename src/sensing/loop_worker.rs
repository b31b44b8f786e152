use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::intervention::InterventionController;
use crate::models::EmotionLabel;
use crate::window::WindowAggregator;

use super::stats::MonitorCounters;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Sole owner of the sample window. Classifier tasks hand their labels over
/// the channel in completion order; full windows are forwarded to the
/// intervention controller one at a time.
pub async fn aggregation_loop(
    mut samples: mpsc::UnboundedReceiver<EmotionLabel>,
    mut aggregator: WindowAggregator,
    controller: InterventionController,
    counters: Arc<MonitorCounters>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                samples.close();
                let mut discarded = 0;
                while samples.try_recv().is_ok() {
                    counters.record_dropped();
                    discarded += 1;
                }
                log_info!(
                    "aggregation loop shutting down with {} buffered samples, {} queued labels discarded",
                    aggregator.len(),
                    discarded
                );
                break;
            }
            received = samples.recv() => {
                let Some(label) = received else {
                    log_info!("sample channel closed, aggregation loop exiting");
                    break;
                };

                log_debug!("sample {} observed ({} in window)", label, aggregator.len() + 1);
                if let Some(verdict) = aggregator.observe(label) {
                    counters.record_window();
                    controller.handle_verdict(verdict).await;
                }
                counters.record_observed();
            }
        }
    }
}
