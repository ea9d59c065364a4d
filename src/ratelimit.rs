use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// Spaces out calls so that no two start closer together than `min_delay`.
///
/// Callers that arrive too early are suspended until their turn, never rejected.
/// Clones share the same last-call state.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    min_delay: Duration,
    last_call: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_call: Arc::new(Mutex::new(None)),
        }
    }

    /// Waits until a call is allowed and records it as made.
    pub async fn wait(&self) {
        // held across the sleep so waiting callers queue up in order
        let mut last_call = self.last_call.lock().await;

        if let Some(last) = *last_call {
            let ready_at = last + self.min_delay;
            if ready_at > Instant::now() {
                log::trace!("Rate limited, waiting {:?}", ready_at - Instant::now());
                sleep_until(ready_at).await;
            }
        }

        *last_call = Some(Instant::now());
    }
}
