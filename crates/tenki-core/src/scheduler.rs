//! Periodic refresh timer.
//!
//! Sends a message on a fixed period until cancelled or until the receiving
//! side goes away. The first message is sent one full period after start;
//! the initial load is the caller's job.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub struct RefreshScheduler {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Start ticking on the current tokio runtime.
    pub fn spawn<M, F>(period: Duration, tx: UnboundedSender<M>, make_message: F) -> Self
    where
        M: Send + 'static,
        F: Fn() -> M + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            // A suspended laptop should produce one refresh on wake, not a burst.
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        tracing::debug!("Refresh tick");
                        if tx.send(make_message()).is_err() {
                            tracing::debug!("Refresh receiver closed, stopping scheduler");
                            break;
                        }
                    }
                }
            }
        });

        tracing::info!("Refresh scheduler started ({:?} period)", period);
        Self {
            cancel,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop ticking and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Refresh scheduler ended abnormally: {}", e);
            }
        }
        tracing::info!("Refresh scheduler stopped");
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_after_each_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = RefreshScheduler::spawn(Duration::from_secs(300), tx, || "tick");

        tokio::time::sleep(Duration::from_secs(299)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(rx.recv().await, Some("tick"));

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(rx.recv().await, Some("tick"));

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = RefreshScheduler::spawn(Duration::from_secs(60), tx, || 1u8);

        scheduler.shutdown().await;

        tokio::time::sleep(Duration::from_secs(600)).await;
        // Sender was dropped with the task, so the channel is closed and empty.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel::<u8>();
        let scheduler = RefreshScheduler::spawn(Duration::from_secs(1), tx, || 0);
        drop(rx);

        tokio::time::sleep(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;

        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_until_shutdown() {
        let (tx, _rx) = mpsc::unbounded_channel::<u8>();
        let scheduler = RefreshScheduler::spawn(Duration::from_secs(30), tx, || 0);
        tokio::task::yield_now().await;

        assert!(scheduler.is_running());
        tokio::time::timeout(Duration::from_secs(1), scheduler.shutdown())
            .await
            .expect("shutdown joins the task");
    }
}
