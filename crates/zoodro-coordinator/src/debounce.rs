//! Cancel-and-reschedule debouncing on the tokio timer.
//!
//! A drag gesture fires many intermediate move events; only the value that
//! is still current once the events have been quiet for `delay` reaches the
//! callback.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Delays a callback until calls have stopped for a fixed interval.
///
/// Each [`call`](Debouncer::call) cancels the pending invocation (if any)
/// and schedules a new one with the latest value. Dropping the debouncer
/// cancels whatever is pending.
pub struct Debouncer<T> {
    delay: Duration,
    callback: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: None,
        }
    }

    /// Schedules `callback(value)` after the delay, replacing any pending call.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn call(&mut self, value: T) {
        self.cancel();
        let callback = Arc::clone(&self.callback);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback(value);
        }));
    }

    /// Drops the pending call without running it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |v| sink.lock().unwrap().push(v))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_value() {
        let (seen, callback) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(100), callback);

        for v in 1..=5 {
            debouncer.call(v);
            tokio::time::sleep(Duration::from_millis(30)).await;
        }
        assert!(seen.lock().unwrap().is_empty(), "nothing fires mid-burst");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*seen.lock().unwrap(), vec![5]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn separated_calls_each_fire() {
        let (seen, callback) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(100), callback);

        debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(150)).await;
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_the_call() {
        let (seen, callback) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(100), callback);

        debouncer.call(7);
        assert!(debouncer.is_pending());
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(seen.lock().unwrap().is_empty());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_call() {
        let (seen, callback) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(100), callback);

        debouncer.call(9);
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(seen.lock().unwrap().is_empty());
    }
}
