//! 呼び出し元の ID が Identity Store に存在するかの確認

use crate::domain::{IdentityId, IdentityStore};

use super::error::CoordinatorError;

/// Fails with `Unauthorized` unless `identity` is a known user.
pub(crate) async fn ensure_known(
    identities: &dyn IdentityStore,
    identity: &IdentityId,
) -> Result<(), CoordinatorError> {
    let exists = identities
        .exists(identity)
        .await
        .map_err(|e| CoordinatorError::Infrastructure(e.to_string()))?;
    if !exists {
        tracing::warn!(identity = %identity, "Unknown identity");
        return Err(CoordinatorError::Unauthorized(format!(
            "unknown identity: {identity}"
        )));
    }
    Ok(())
}
