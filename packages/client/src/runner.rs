//! Dual-task runner: run two loops side by side and stop both when either ends.

use tokio::task::{JoinError, JoinHandle};

use crate::error::ClientError;

/// Which task finished first, with its output.
#[derive(Debug, PartialEq, Eq)]
pub enum FirstFinished<L, R> {
    /// The local-input task finished; the remote task was cancelled
    Local(L),
    /// The remote-message task finished; the local task was cancelled
    Remote(R),
}

/// Spawn `local` and `remote`, wait for the first to finish, cancel the other and
/// wait until the cancelled task has actually terminated.
///
/// Cancellation takes effect at the loser's current suspension point (waiting for
/// input or for a frame), so it never runs another round of its loop.
///
/// # Errors
///
/// `ClientError::TaskFailed` if the winning task panicked.
pub async fn run_until_first_finishes<L, R>(
    local: L,
    remote: R,
) -> Result<FirstFinished<L::Output, R::Output>, ClientError>
where
    L: Future + Send + 'static,
    L::Output: Send + 'static,
    R: Future + Send + 'static,
    R::Output: Send + 'static,
{
    let mut local_task = tokio::spawn(local);
    let mut remote_task = tokio::spawn(remote);

    let first = tokio::select! {
        result = &mut local_task => FirstFinished::Local(result),
        result = &mut remote_task => FirstFinished::Remote(result),
    };

    match first {
        FirstFinished::Local(result) => {
            cancel(remote_task, "remote-message").await;
            result.map(FirstFinished::Local).map_err(task_failed)
        }
        FirstFinished::Remote(result) => {
            cancel(local_task, "local-input").await;
            result.map(FirstFinished::Remote).map_err(task_failed)
        }
    }
}

async fn cancel<T>(task: JoinHandle<T>, name: &str) {
    task.abort();
    match task.await {
        Err(e) if e.is_cancelled() => tracing::debug!("Cancelled {} task", name),
        Err(e) => tracing::warn!("{} task failed before cancellation: {}", name, e),
        // finished on its own before the abort landed
        Ok(_) => tracing::debug!("{} task finished before cancellation", name),
    }
}

fn task_failed(e: JoinError) -> ClientError {
    ClientError::TaskFailed(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
        time::Duration,
    };

    /// Sets the flag when dropped, i.e. when the owning task is torn down.
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_remote_finishing_first_cancels_local() {
        // テスト項目: remote が先に終了すると local がキャンセルされ、終了が確認されてから戻る
        // given (前提条件):
        let dropped = Arc::new(AtomicBool::new(false));
        let flag = DropFlag(dropped.clone());
        let local = async move {
            let _flag = flag;
            std::future::pending::<()>().await;
        };
        let remote = async { "closed" };

        // when (操作):
        let result = run_until_first_finishes(local, remote).await;

        // then (期待する結果):
        assert_eq!(result.unwrap(), FirstFinished::Remote("closed"));
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_local_finishing_first_cancels_remote() {
        // テスト項目: local が先に終了すると remote がキャンセルされる
        // given (前提条件):
        let dropped = Arc::new(AtomicBool::new(false));
        let flag = DropFlag(dropped.clone());
        let local = async { 42 };
        let remote = async move {
            let _flag = flag;
            std::future::pending::<()>().await;
        };

        // when (操作):
        let result = run_until_first_finishes(local, remote).await;

        // then (期待する結果):
        assert_eq!(result.unwrap(), FirstFinished::Local(42));
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_loop_does_not_run_another_round() {
        // テスト項目: キャンセルされたループは次の周回を実行しない
        // given (前提条件):
        async fn count_rounds(counter: Arc<AtomicUsize>) {
            loop {
                tokio::time::sleep(Duration::from_secs(10)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }
        let rounds = Arc::new(AtomicUsize::new(0));
        let local = count_rounds(rounds.clone());
        let remote = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
        };

        // when (操作):
        run_until_first_finishes(local, remote).await.unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;

        // then (期待する結果):
        assert_eq!(rounds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicking_winner_is_reported() {
        // テスト項目: 先に終了したタスクが panic した場合は TaskFailed になる
        // given (前提条件):
        async fn exploding() {
            panic!("input thread exploded")
        }
        let remote = std::future::pending::<()>();

        // when (操作):
        let result = run_until_first_finishes(exploding(), remote).await;

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::TaskFailed(_))));
    }
}
