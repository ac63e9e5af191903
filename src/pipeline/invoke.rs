//! The provider call, wrapped in an explicit deadline.
//!
//! This is the only stage with network I/O and the single suspending point
//! of a run. The call is deadline-bound so a slow provider cannot hold a
//! request slot indefinitely. There is no retry here by design: a
//! retry-or-fallback policy belongs between this stage and normalisation,
//! behind the [`crate::provider::InferenceProvider`] seam.

use crate::error::ExtractError;
use crate::provider::{InferenceProvider, ProviderRequest};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

/// Send the request to the provider, failing after `timeout_secs`.
pub async fn invoke(
    provider: &Arc<dyn InferenceProvider>,
    request: &ProviderRequest,
    timeout_secs: u64,
) -> Result<String, ExtractError> {
    let start = Instant::now();

    let reply = match timeout(
        Duration::from_secs(timeout_secs),
        provider.complete(request),
    )
    .await
    {
        Ok(Ok(reply)) => reply,
        Ok(Err(e)) => {
            warn!("Provider '{}' call failed: {e}", provider.name());
            return Err(e);
        }
        Err(_) => {
            warn!(
                "Provider '{}' call exceeded {timeout_secs}s deadline",
                provider.name()
            );
            return Err(ExtractError::ProviderTimeout { secs: timeout_secs });
        }
    };

    debug!(
        "Provider '{}' replied with {} chars in {:?}",
        provider.name(),
        reply.len(),
        start.elapsed()
    );
    Ok(reply)
}
