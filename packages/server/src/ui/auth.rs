//! Bearer token authentication for HTTP handlers.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::domain::{AuthError, IdentityId, TokenService};

use super::{error::ApiError, state::AppState};

/// Caller identity taken from a verified `Authorization: Bearer` token
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity(pub IdentityId);

/// Extract the bearer token from the Authorization header, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify the header token, falling back to `query_token` (WebSocket clients).
pub fn authenticate(
    tokens: &dyn TokenService,
    headers: &HeaderMap,
    query_token: Option<&str>,
) -> Result<IdentityId, AuthError> {
    let token = bearer_token(headers)
        .or(query_token.filter(|token| !token.is_empty()))
        .ok_or(AuthError::MissingCredential)?;
    tokens.verify(token)
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let identity = authenticate(state.tokens.as_ref(), &parts.headers, None).map_err(|e| {
            tracing::debug!(error = %e, "Rejected request");
            ApiError::from(e)
        })?;
        Ok(Self(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockTokenService;
    use axum::http::HeaderValue;

    #[test]
    fn test_header_token_takes_precedence() {
        // テスト項目: Authorization ヘッダーがあればクエリのトークンより優先される
        // given (前提条件):
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify()
            .withf(|token| token == "from-header")
            .returning(|_| Ok(IdentityId::new("alice".to_string()).unwrap()));
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));

        // when (操作):
        let identity = authenticate(&tokens, &headers, Some("from-query")).unwrap();

        // then (期待する結果):
        assert_eq!(identity.as_str(), "alice");
    }

    #[test]
    fn test_query_token_fallback_and_missing() {
        // テスト項目: ヘッダーがなければクエリのトークンを使い、どちらもなければ MissingCredential
        let mut tokens = MockTokenService::new();
        tokens
            .expect_verify()
            .withf(|token| token == "from-query")
            .returning(|_| Ok(IdentityId::new("bob".to_string()).unwrap()));
        let headers = HeaderMap::new();

        assert_eq!(
            authenticate(&tokens, &headers, Some("from-query"))
                .unwrap()
                .as_str(),
            "bob"
        );
        assert_eq!(
            authenticate(&tokens, &headers, None),
            Err(AuthError::MissingCredential)
        );
    }
}
