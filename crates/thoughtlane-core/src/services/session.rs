//! Session gate - turns an inbound credential into an identity.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ports::{AuthError, TokenClaims, TokenService};

/// The caller behind a valid session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

#[derive(Clone)]
pub struct SessionGate {
    tokens: Arc<dyn TokenService>,
}

impl SessionGate {
    pub fn new(tokens: Arc<dyn TokenService>) -> Self {
        Self { tokens }
    }

    /// `Ok(None)` when no credential was presented (an empty cookie counts
    /// as none). A credential that fails validation is an error.
    pub fn authenticate(&self, credential: Option<&str>) -> Result<Option<Identity>, AuthError> {
        let Some(token) = credential.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let claims = self.tokens.validate_token(token)?;
        Ok(Some(Identity::from(claims)))
    }

    /// Like [`authenticate`](Self::authenticate), but anonymous callers are rejected.
    pub fn require(&self, credential: Option<&str>) -> Result<Identity, AuthError> {
        self.authenticate(credential)?.ok_or(AuthError::MissingAuth)
    }

    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String, AuthError> {
        self.tokens.generate_token(user_id, username)
    }

    pub fn token_lifetime_seconds(&self) -> i64 {
        self.tokens.expiration_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts tokens of the form `<uuid>:<username>`.
    struct PlainTokens;

    impl TokenService for PlainTokens {
        fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError> {
            Ok(format!("{user_id}:{username}"))
        }

        fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
            if token == "expired" {
                return Err(AuthError::TokenExpired);
            }
            let (id, username) = token
                .split_once(':')
                .ok_or_else(|| AuthError::InvalidToken("malformed".into()))?;
            let user_id =
                Uuid::parse_str(id).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
            Ok(TokenClaims {
                user_id,
                username: username.to_string(),
                exp: 0,
            })
        }

        fn expiration_seconds(&self) -> i64 {
            60
        }
    }

    fn gate() -> SessionGate {
        SessionGate::new(Arc::new(PlainTokens))
    }

    #[test]
    fn no_credential_is_anonymous() {
        assert_eq!(gate().authenticate(None).unwrap(), None);
        assert_eq!(gate().authenticate(Some("")).unwrap(), None);
    }

    #[test]
    fn valid_credential_yields_identity() {
        let gate = gate();
        let id = Uuid::new_v4();
        let token = gate.issue(id, "alice").unwrap();

        let identity = gate.require(Some(&token)).unwrap();
        assert_eq!(identity.user_id, id);
        assert_eq!(identity.username, "alice");
    }

    #[test]
    fn bad_credentials_are_errors() {
        let gate = gate();
        assert!(matches!(
            gate.authenticate(Some("garbage")),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(
            gate.authenticate(Some("expired")),
            Err(AuthError::TokenExpired)
        ));
        assert!(matches!(gate.require(None), Err(AuthError::MissingAuth)));
    }
}
