//! Collaborator ports for identities and credentials.

use async_trait::async_trait;

use super::{
    error::{AuthError, RepositoryError},
    value_object::IdentityId,
};

/// User records keyed by identity; only existence and name lookup are exposed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn exists(&self, identity: &IdentityId) -> Result<bool, RepositoryError>;

    /// Display name of the identity, `None` when unknown.
    async fn find_name(&self, identity: &IdentityId) -> Result<Option<String>, RepositoryError>;
}

/// Token issuance and verification.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    fn sign(&self, identity: &IdentityId) -> Result<String, AuthError>;

    /// Verify `token` and extract the identity it was issued for.
    fn verify(&self, token: &str) -> Result<IdentityId, AuthError>;
}
