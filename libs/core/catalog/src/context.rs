use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{CatalogError, CatalogResult};

/// Per-call context threaded through every service and repository operation.
///
/// Carries the request id used in logs and error bodies, a cancellation token
/// and an optional deadline. Cloning is cheap and clones share cancellation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            cancellation: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Context for internal calls that are not tied to a client request.
    pub fn background() -> Self {
        Self::new("background")
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// True once the token fired or the deadline passed.
    pub fn is_done(&self) -> bool {
        self.cancellation.is_cancelled()
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Drive `fut` to completion unless the context is cancelled or expires first.
    ///
    /// A context that is already done never polls `fut`.
    pub async fn run<T, F>(&self, fut: F) -> CatalogResult<T>
    where
        F: Future<Output = CatalogResult<T>>,
    {
        if self.is_done() {
            return Err(CatalogError::Cancelled);
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(CatalogError::Cancelled),
            _ = expired => Err(CatalogError::Cancelled),
            result = fut => result,
        }
    }

    /// Cancellable sleep.
    pub async fn sleep(&self, duration: Duration) -> CatalogResult<()> {
        self.run(async {
            tokio::time::sleep(duration).await;
            Ok(())
        })
        .await
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_run_returns_future_output() {
        let ctx = RequestContext::new("req-1");
        let value = ctx.run(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(ctx.request_id(), "req-1");
    }

    #[tokio::test]
    async fn test_run_short_circuits_when_already_cancelled() {
        let ctx = RequestContext::new("req-2");
        ctx.cancel();

        let polled = AtomicBool::new(false);
        let result = ctx
            .run(async {
                polled.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Cancelled);
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_pending_work() {
        let ctx = RequestContext::new("req-3");
        let token = ctx.cancellation().clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        });

        let err = ctx.sleep(Duration::from_secs(30)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[tokio::test]
    async fn test_deadline_expires() {
        let ctx = RequestContext::new("req-4").with_timeout(Duration::from_millis(50));
        let err = ctx.sleep(Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert!(ctx.is_done());
    }

    #[tokio::test]
    async fn test_clones_share_cancellation() {
        let ctx = RequestContext::new("req-5");
        let clone = ctx.clone();
        clone.cancel();
        assert!(ctx.is_done());
    }
}
