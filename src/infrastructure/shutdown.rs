//! Cooperative shutdown signal.

use std::future::Future;

use tokio::sync::watch;

/// How a service driven by [`drain_on_shutdown`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drained {
    /// The work returned on its own.
    Finished,
    /// Shutdown was signalled and the work was wound down.
    Stopped,
}

/// Resolve once `true` has been sent or the sender is gone.
pub async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

/// Drive `work` until it returns or shutdown is signalled.
///
/// On shutdown `stop` asks the work to wind down, and `work` keeps being
/// polled alongside the returned future so jobs already in flight complete.
/// `stop` returning `None` means the work is idle and is dropped as is.
pub async fn drain_on_shutdown<W, S, F>(
    work: W,
    stop: S,
    shutdown: &mut watch::Receiver<bool>,
) -> Drained
where
    W: Future<Output = ()>,
    S: FnOnce() -> Option<F>,
    F: Future<Output = ()>,
{
    tokio::pin!(work);

    tokio::select! {
        () = &mut work => return Drained::Finished,
        () = wait_for_shutdown(shutdown) => {}
    }

    if let Some(stopping) = stop() {
        tokio::join!(stopping, work);
    }
    Drained::Stopped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::{pending, Ready};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn resolves_after_signal() {
        let (tx, mut rx) = watch::channel(false);
        tx.send(true).unwrap();
        wait_for_shutdown(&mut rx).await;
    }

    #[test]
    fn pending_until_signalled() {
        let (tx, mut rx) = watch::channel(false);
        let mut wait = tokio_test::task::spawn(wait_for_shutdown(&mut rx));

        tokio_test::assert_pending!(wait.poll());
        tx.send(false).unwrap();
        tokio_test::assert_pending!(wait.poll());

        tx.send(true).unwrap();
        assert!(wait.is_woken());
        tokio_test::assert_ready!(wait.poll());
    }

    #[tokio::test]
    async fn resolves_when_sender_dropped() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        wait_for_shutdown(&mut rx).await;
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_work_completes_after_shutdown() {
        let (tx, mut rx) = watch::channel(false);
        let stop = Arc::new(Notify::new());
        let replied = Arc::new(AtomicBool::new(false));

        let work = {
            let stop = stop.clone();
            let replied = replied.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(2)).await;
                replied.store(true, Ordering::SeqCst);
                stop.notified().await;
            }
        };
        tx.send(true).unwrap();

        let outcome = drain_on_shutdown(
            work,
            || {
                stop.notify_one();
                Some(async {})
            },
            &mut rx,
        )
        .await;

        assert_eq!(outcome, Drained::Stopped);
        assert!(replied.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn idle_work_is_dropped_on_shutdown() {
        let (tx, mut rx) = watch::channel(false);
        tx.send(true).unwrap();

        let outcome = drain_on_shutdown(pending::<()>(), || None::<Ready<()>>, &mut rx).await;

        assert_eq!(outcome, Drained::Stopped);
    }

    #[tokio::test]
    async fn finished_work_does_not_wait_for_shutdown() {
        let (_tx, mut rx) = watch::channel(false);

        let outcome = drain_on_shutdown(async {}, || None::<Ready<()>>, &mut rx).await;

        assert_eq!(outcome, Drained::Finished);
    }
}
