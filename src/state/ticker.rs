use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Handle to a repeating timer task. Every timer in the app (countdown,
/// dashboard refresh, presentation rotation) runs through one of these
/// so that each has a stop that actually suppresses late ticks.
///
/// Guarantees:
/// - the callback runs serialized — a tick never starts before the
///   previous callback finished;
/// - `stop` is idempotent, and once it has been observed no further
///   callback invocation begins, even for a tick already due;
/// - dropping the handle stops the timer.
pub struct Ticker {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a timer firing roughly every `period`. The immediate first
    /// tick of the underlying interval is skipped so that starting a
    /// ticker does not fire at once.
    pub fn spawn<F, Fut>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            timer.tick().await;
            loop {
                tokio::select! {
                    biased;
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = timer.tick() => {
                        // Re-check: a stop that raced this tick wins.
                        if *stop_rx.borrow() {
                            break;
                        }
                        tick().await;
                    }
                }
            }
        });
        Self { stop: stop_tx, task }
    }

    pub fn stop(&self) {
        // send only fails when the task is already gone.
        let _ = self.stop.send(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop.borrow()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn counting_ticker(period_ms: u64) -> (Ticker, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let ticker = Ticker::spawn(Duration::from_millis(period_ms), move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });
        (ticker, count)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_period_and_skips_immediate_tick() {
        let (ticker, count) = counting_ticker(100);
        sleep(Duration::from_millis(350)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        ticker.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_further_ticks() {
        let (ticker, count) = counting_ticker(100);
        sleep(Duration::from_millis(250)).await;
        ticker.stop();
        let seen = count.load(Ordering::SeqCst);
        sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent() {
        let (ticker, count) = counting_ticker(100);
        ticker.stop();
        ticker.stop();
        assert!(ticker.is_stopped());
        sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_stops_the_timer() {
        let (ticker, count) = counting_ticker(100);
        drop(ticker);
        sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
