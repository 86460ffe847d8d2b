use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle, time};
use tracing::info;

use crate::DeviceClient;

/// Fixed refresh cadence for the recurring status poll.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Recurring status refresh with a single-slot task handle: starting a new
/// poll always tears down the previous one, so at most one timer is live
/// per poller regardless of how often `start` is called.
pub struct StatusPoller {
    client: Arc<DeviceClient>,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl StatusPoller {
    pub fn new(client: Arc<DeviceClient>) -> Self {
        Self::with_interval(client, POLL_INTERVAL)
    }

    pub fn with_interval(client: Arc<DeviceClient>, interval: Duration) -> Self {
        Self {
            client,
            interval,
            task: Mutex::new(None),
        }
    }

    /// Refreshes immediately, then keeps refreshing on the fixed interval
    /// until [`StatusPoller::stop`]. Refresh outcomes land on the client's
    /// view and connection indicator; a failed tick never stops the loop.
    pub async fn start(&self) {
        let client = Arc::clone(&self.client);
        let interval = self.interval;
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            loop {
                ticker.tick().await;
                let _ = client.refresh_status().await;
            }
        });

        let previous = self.task.lock().await.replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
        info!(interval_ms = self.interval.as_millis() as u64, "status poll started");
    }

    /// Safe to call with no poll running.
    pub async fn stop(&self) {
        if let Some(task) = self.task.lock().await.take() {
            task.abort();
            info!("status poll stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}
