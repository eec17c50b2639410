//! Bearer-token authentication.
//!
//! The identity provider is external; here it is represented by the
//! [`Authenticator`] capability. The bundled implementation reads a token
//! file, which is enough for single-tenant deployments and tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use grantdesk_models::{Identity, RoleError, RoleSet, UserId};

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token unknown, expired, or malformed.
    #[error("invalid token")]
    InvalidToken,

    #[error("failed to read token file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse token file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("identity {user}: {source}")]
    Role {
        user: String,
        #[source]
        source: RoleError,
    },
}

/// Resolves bearer tokens to identities.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError>;
}

#[derive(Debug, Deserialize)]
struct RawIdentity {
    id: String,
    email: String,
    name: String,
    #[serde(default)]
    roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TokenFile {
    #[serde(default)]
    tokens: HashMap<String, RawIdentity>,
}

/// Authenticator backed by a static token table.
///
/// Token file format:
///
/// ```json
/// {
///   "tokens": {
///     "s3cr3t": { "id": "user-ada", "email": "ada@example.org",
///                 "name": "Ada", "roles": ["REVIEWER"] }
///   }
/// }
/// ```
///
/// Role strings are validated on load; an unknown role rejects the file.
#[derive(Debug, Clone, Default)]
pub struct TokenFileAuthenticator {
    tokens: HashMap<String, Identity>,
}

impl TokenFileAuthenticator {
    /// Creates an authenticator from (token, identity) pairs.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Identity)>) -> Self {
        Self {
            tokens: entries.into_iter().collect(),
        }
    }

    /// Parses a token table from JSON.
    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let file: TokenFile = serde_json::from_str(json)?;
        let mut tokens = HashMap::with_capacity(file.tokens.len());

        for (token, raw) in file.tokens {
            let roles = RoleSet::parse(&raw.roles).map_err(|source| AuthError::Role {
                user: raw.id.clone(),
                source,
            })?;
            tokens.insert(
                token,
                Identity {
                    id: UserId::from(raw.id),
                    email: raw.email,
                    name: raw.name,
                    roles,
                },
            );
        }

        Ok(Self { tokens })
    }

    /// Loads a token table from a file.
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let json = fs::read_to_string(path).map_err(|source| AuthError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let auth = Self::from_json(&json)?;
        info!(path = %path.display(), identities = auth.len(), "Loaded token file");
        Ok(auth)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl Authenticator for TokenFileAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        self.tokens
            .get(token.trim())
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
