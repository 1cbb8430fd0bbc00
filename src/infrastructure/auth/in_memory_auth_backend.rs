//! Process-local auth backend for development and tests

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::application::dto::{AuthSession, SignInCredentials, SignUpCredentials};
use crate::application::ports::{AuthBackend, AuthBackendError};

pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // Account ID
    email: String,
    exp: usize,
    iat: usize,
    jti: String, // Session ID, used for revocation
}

struct StoredAccount {
    id: Uuid,
    email: String,
    salt: [u8; 16],
    password_digest: String,
    user_metadata: Value,
    created_at: String,
}

impl StoredAccount {
    fn to_user(&self) -> Value {
        json!({
            "id": self.id.to_string(),
            "email": self.email,
            "user_metadata": self.user_metadata,
            "created_at": self.created_at,
        })
    }
}

/// Accounts keyed by lower-cased e-mail, sessions as HS256 JWTs
pub struct InMemoryAuthBackend {
    accounts: DashMap<String, StoredAccount>,
    /// Revoked session IDs with their token expiry
    revoked_sessions: DashMap<String, usize>,
    signing_secret: Vec<u8>,
    token_ttl_secs: u64,
}

impl InMemoryAuthBackend {
    pub fn new() -> Self {
        Self::with_token_ttl(DEFAULT_TOKEN_TTL_SECS)
    }

    pub fn with_token_ttl(token_ttl_secs: u64) -> Self {
        let signing_secret: Vec<u8> = (0..32).map(|_| rand::rng().random()).collect();
        Self {
            accounts: DashMap::new(),
            revoked_sessions: DashMap::new(),
            signing_secret,
            token_ttl_secs,
        }
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn revoked_session_count(&self) -> usize {
        self.revoked_sessions.len()
    }

    /// Forget revocations whose token would be rejected as expired anyway
    fn prune_revoked_sessions(&self, now: usize) {
        self.revoked_sessions.retain(|_, exp| *exp > now);
    }

    fn issue_token(&self, account: &StoredAccount) -> Result<String, AuthBackendError> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: account.id.to_string(),
            email: account.email.clone(),
            iat: now,
            exp: now + self.token_ttl_secs as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.signing_secret),
        )
        .map_err(|e| AuthBackendError::Unexpected(format!("Token signing failed: {}", e)))
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AuthBackendError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.signing_secret),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthBackendError::Rejected("Invalid session token".to_string()))
    }
}

impl Default for InMemoryAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn password_digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl AuthBackend for InMemoryAuthBackend {
    async fn sign_up(&self, credentials: &SignUpCredentials) -> Result<Value, AuthBackendError> {
        let key = credentials.email.to_lowercase();

        match self.accounts.entry(key) {
            Entry::Occupied(_) => Err(AuthBackendError::Rejected(
                "User already registered".to_string(),
            )),
            Entry::Vacant(slot) => {
                let salt: [u8; 16] = rand::rng().random();
                let account = StoredAccount {
                    id: Uuid::new_v4(),
                    email: credentials.email.clone(),
                    salt,
                    password_digest: password_digest(&salt, &credentials.password),
                    user_metadata: credentials.user_metadata(),
                    created_at: Utc::now().to_rfc3339(),
                };
                let user = account.to_user();
                slot.insert(account);

                tracing::debug!(user_id = %user["id"], "Registered in-memory account");
                Ok(user)
            }
        }
    }

    async fn sign_in(
        &self,
        credentials: &SignInCredentials,
    ) -> Result<AuthSession, AuthBackendError> {
        let invalid = || AuthBackendError::Rejected("Invalid login credentials".to_string());

        let account = self
            .accounts
            .get(&credentials.email.to_lowercase())
            .ok_or_else(invalid)?;

        if password_digest(&account.salt, &credentials.password) != account.password_digest {
            return Err(invalid());
        }

        Ok(AuthSession {
            user: account.to_user(),
            access_token: self.issue_token(&account)?,
            expires_in: self.token_ttl_secs,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthBackendError> {
        let claims = self.verify_token(access_token)?;
        self.prune_revoked_sessions(Utc::now().timestamp() as usize);

        match self.revoked_sessions.entry(claims.jti) {
            Entry::Occupied(_) => Err(AuthBackendError::Rejected("Session not found".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(claims.exp);
                Ok(())
            }
        }
    }
}
