//! Debounce timer handle for draft autosave.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A trailing-edge debounce timer owned by the editing session.
///
/// Each `arm` aborts any pending timer and starts a fresh one, so the armed
/// future only fires after a full quiet period. Dropping the handle (session
/// teardown) cancels an armed-but-unfired timer; an edit made just before
/// teardown can be lost, which is the accepted tradeoff.
#[derive(Default)]
pub struct DebounceHandle {
    task: Option<JoinHandle<()>>,
}

impl DebounceHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the timer: cancel the pending one and schedule `fire` to run
    /// after `delay` of inactivity.
    pub fn arm<F>(&mut self, delay: Duration, fire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.disarm();
        // Capture the deadline now: a spawned task may not be polled until
        // later, and `sleep(delay)` would start the window at first poll.
        let deadline = tokio::time::Instant::now() + delay;
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            fire.await;
        }));
    }

    /// Cancel the pending timer, if any.
    pub fn disarm(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether a timer is armed and has not yet fired.
    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for DebounceHandle {
    fn drop(&mut self) {
        self.disarm();
    }
}
