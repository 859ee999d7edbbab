use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Trailing-edge debounce: each `schedule` drops the pending timer and
/// starts a new one, so only the last call in a burst fires.
#[derive(Debug)]
pub struct Debouncer {
    runtime: Handle,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: None,
        }
    }

    pub fn schedule<F>(&mut self, delay: Duration, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            fire();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
