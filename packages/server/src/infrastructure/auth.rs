//! JWT Token Service
//!
//! HS256 で署名したアクセストークンの発行と検証。`sub` にプロフィール ID を入れます。

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthError, IdentityId, TokenService};

/// JWT Claims 構造
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// プロフィール ID
    pub sub: String,
    /// 発行時刻 (Unix timestamp, 秒)
    pub iat: i64,
    /// 有効期限 (Unix timestamp, 秒)
    pub exp: i64,
}

/// JWT Token Service
#[derive(Clone)]
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: chrono::Duration,
}

impl JwtTokenService {
    pub fn new(secret: &str, ttl: chrono::Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// 任意の Claims で署名する（期限切れトークンのテスト用）
    pub fn sign_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn sign(&self, identity: &IdentityId) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: identity.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign_claims(&claims)
    }

    fn verify(&self, token: &str) -> Result<IdentityId, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        Ok(IdentityId::new(data.claims.sub)?)
    }
}
