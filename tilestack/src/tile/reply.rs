//! Handle to an in-flight tile request.

use std::future::Future;

use bytes::Bytes;
use tokio::sync::oneshot;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::FetchError;
use crate::compositor::TileImageData;

/// A finished tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileData {
    pub data: Bytes,
    pub format: String,
    /// True when served from the composite or tile cache
    pub cached: bool,
}

impl TileData {
    pub fn from_image(image: TileImageData, cached: bool) -> Self {
        Self {
            data: image.data,
            format: image.format,
            cached,
        }
    }
}

/// The pending result of a tile request.
///
/// Completes exactly once, with either a [`TileData`] or a [`FetchError`].
/// Dropping an unfinished reply cancels the work behind it, as does
/// [`abort`](Self::abort).
pub struct TileReply {
    receiver: oneshot::Receiver<Result<TileData, FetchError>>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl TileReply {
    /// Runs `task` on the tokio runtime and returns a reply for its result.
    ///
    /// Must be called from within a runtime. When the reply is aborted the
    /// task future is dropped at its next await point.
    pub(crate) fn spawn<F>(task: F) -> Self
    where
        F: Future<Output = Result<TileData, FetchError>> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = token.cancelled() => Err(FetchError::Aborted),
                result = task => result,
            };
            // Receiver gone means nobody is waiting
            let _ = sender.send(result);
        });

        Self::from_parts(receiver, cancel)
    }

    /// A reply that has already failed.
    pub fn failed(error: FetchError) -> Self {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(Err(error));
        Self::from_parts(receiver, CancellationToken::new())
    }

    fn from_parts(
        receiver: oneshot::Receiver<Result<TileData, FetchError>>,
        cancel: CancellationToken,
    ) -> Self {
        let guard = cancel.clone().drop_guard();
        Self {
            receiver,
            cancel,
            _guard: guard,
        }
    }

    /// Cancels the request. Safe to call at any time, including after it
    /// finished; no success is reported afterwards.
    pub fn abort(&self) {
        self.cancel.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A token that aborts this request when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Waits for the result.
    pub async fn finished(mut self) -> Result<TileData, FetchError> {
        if self.cancel.is_cancelled() {
            return Err(FetchError::Aborted);
        }
        let result = (&mut self.receiver)
            .await
            .unwrap_or(Err(FetchError::Aborted));
        if self.cancel.is_cancelled() {
            return Err(FetchError::Aborted);
        }
        result
    }
}
