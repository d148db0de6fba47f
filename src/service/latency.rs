use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::errors::AppError;

/// Waits out a simulated network round trip. Resolves with `Cancelled` as soon
/// as `cancel` fires, so the caller never commits on behalf of a dead session.
pub async fn round_trip(delay: Duration, cancel: &CancellationToken) -> Result<(), AppError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}
