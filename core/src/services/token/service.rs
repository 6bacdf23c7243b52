//! JWT codec with per-kind signing keys
//!
//! Access tokens are signed with `secret + csrf_token`, binding each
//! access token to the CSRF cookie of the browser it was issued to.
//! Refresh tokens are signed with the bare secret; they never travel
//! outside the HttpOnly cookie.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use ambry_shared::utils::user_agent;

use crate::domain::entities::token::{Claims, TokenKind};
use crate::errors::{AuthnError, DomainError, DomainResult};

/// Stateless JWT encoder/decoder
#[derive(Debug, Clone)]
pub struct TokenCodec {
    secret: String,
    issuer: String,
}

impl TokenCodec {
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    fn signing_key(&self, kind: TokenKind, csrf_token: &str) -> Vec<u8> {
        match kind {
            TokenKind::Access => format!("{}{}", self.secret, csrf_token).into_bytes(),
            TokenKind::Refresh => self.secret.clone().into_bytes(),
        }
    }

    fn invalid(kind: TokenKind) -> DomainError {
        match kind {
            TokenKind::Access => DomainError::Authn(AuthnError::InvalidAccessToken),
            TokenKind::Refresh => DomainError::Authn(AuthnError::InvalidRefreshToken),
        }
    }

    fn encode_with(&self, claims: &Claims, csrf_token: &str) -> DomainResult<String> {
        let key = EncodingKey::from_secret(&self.signing_key(claims.sub, csrf_token));
        encode(&Header::new(Algorithm::HS256), claims, &key)
            .map_err(|e| DomainError::internal(format!("token encoding failed: {e}")))
    }

    /// Sign an access-token claims set with the CSRF-bound key
    pub fn encode_access(&self, claims: &Claims, csrf_token: &str) -> DomainResult<String> {
        self.encode_with(claims, csrf_token)
    }

    /// Sign a refresh-token claims set
    pub fn encode_refresh(&self, claims: &Claims) -> DomainResult<String> {
        self.encode_with(claims, "")
    }

    fn decode_with(
        &self,
        token: &str,
        kind: TokenKind,
        csrf_token: &str,
        request_user_agent: &str,
    ) -> DomainResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = 0;

        let key = DecodingKey::from_secret(&self.signing_key(kind, csrf_token));
        let data =
            decode::<Claims>(token, &key, &validation).map_err(|_| Self::invalid(kind))?;
        let claims = data.claims;

        if claims.sub != kind {
            return Err(Self::invalid(kind));
        }
        if !user_agent::is_compatible(&claims.user_agent, request_user_agent) {
            return Err(Self::invalid(kind));
        }
        Ok(claims)
    }

    /// Decode and validate an access token.
    ///
    /// Signature, expiry, issuer, token kind and user-agent
    /// compatibility are all checked; any failure reads as an invalid
    /// token.
    pub fn decode_access(
        &self,
        token: &str,
        csrf_token: &str,
        request_user_agent: &str,
    ) -> DomainResult<Claims> {
        self.decode_with(token, TokenKind::Access, csrf_token, request_user_agent)
    }

    /// Decode and validate a refresh token
    pub fn decode_refresh(&self, token: &str, request_user_agent: &str) -> DomainResult<Claims> {
        self.decode_with(token, TokenKind::Refresh, "", request_user_agent)
    }
}
