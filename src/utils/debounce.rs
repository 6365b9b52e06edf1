use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Coalesces bursts of events into one callback per quiet period.
///
/// Every `push` resets the deadline; when `quiet` passes without a new event the callback
/// runs once with the most recent value. Dropping the debouncer flushes a pending value.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Must be called from within a tokio runtime
    pub fn spawn<F>(quiet: Duration, mut on_settle: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(value) => latest = value,
                            None => {
                                on_settle(latest);
                                return;
                            }
                        },
                        _ = tokio::time::sleep(quiet) => {
                            on_settle(latest);
                            break;
                        }
                    }
                }
            }
        });

        Self { tx, task }
    }

    pub fn push(&self, value: T) {
        let _ = self.tx.send(value);
    }

    /// Stops the timer task without running a pending callback
    pub fn cancel(&self) {
        self.task.abort();
    }
}
