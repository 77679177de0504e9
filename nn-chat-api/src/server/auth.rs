//! HTTP Basic authentication against a file of argon2 password hashes.
//!
//! Each non-empty line of the credentials file is `name:hash`, where `hash`
//! is a PHC string such as the ones printed by the `hash-password` binary.
//! Lines starting with `#` are ignored.

use crate::server::ServerError;
use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Basic};
use nn_chat_common::model::user::{InvalidUserNameError, UserName};
use std::{collections::HashMap, fmt::Debug, path::Path, sync::Arc};
use thiserror::Error;

pub const PASSWORD_SALT_LEN: usize = 16;

type AuthorizationHeader = TypedHeader<Authorization<Basic>>;

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct AuthenticatedUser {
    name: UserName,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn user_name(&self) -> &UserName {
        &self.name
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<Credentials>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = AuthorizationHeader::from_request_parts(parts, state)
            .await
            .map_err(ServerError::InvalidAuthorizationHeader)?;

        let name = Arc::<Credentials>::from_ref(state)
            .verify(header.username(), header.password())
            .ok_or(ServerError::InvalidCredentials)?;

        Ok(Self { name })
    }
}

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Reading the credentials file failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line {line} is not of the form name:hash")]
    MalformedLine { line: usize },
    #[error("Line {line}: {error}")]
    UserName {
        line: usize,
        error: InvalidUserNameError,
    },
    #[error("Line {line} has an invalid password hash: {error}")]
    Hash {
        line: usize,
        error: password_hash::Error,
    },
}

#[derive(Clone, Eq, PartialEq, Default)]
pub struct Credentials {
    hashes: HashMap<UserName, String>,
}

impl Credentials {
    pub async fn load(path: &Path) -> Result<Self, CredentialsError> {
        let contents = tokio::fs::read_to_string(path).await?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, CredentialsError> {
        let mut hashes = HashMap::new();

        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (name, hash) = line
                .split_once(':')
                .ok_or(CredentialsError::MalformedLine { line: line_number })?;
            let name = UserName::new(name.to_owned()).map_err(|error| {
                CredentialsError::UserName {
                    line: line_number,
                    error,
                }
            })?;
            PasswordHash::new(hash).map_err(|error| CredentialsError::Hash {
                line: line_number,
                error,
            })?;

            hashes.insert(name, hash.to_owned());
        }

        Ok(Self { hashes })
    }

    /// Builds credentials from already hashed passwords.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (UserName, String)>,
    ) -> Result<Self, password_hash::Error> {
        let hashes = entries
            .into_iter()
            .map(|(name, hash)| {
                PasswordHash::new(&hash)?;
                Ok((name, hash))
            })
            .collect::<Result<HashMap<_, _>, password_hash::Error>>()?;

        Ok(Self { hashes })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// The user, if `password` matches the stored hash for `name`.
    #[must_use]
    pub fn verify(&self, name: &str, password: &str) -> Option<UserName> {
        let name = UserName::new(name.to_owned()).ok()?;
        let hash = PasswordHash::new(self.hashes.get(&name)?).ok()?;

        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
            .then_some(name)
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("users", &self.hashes.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Hashes `password` with a fresh random salt into a PHC string.
pub fn hash_password(argon2: &Argon2<'_>, password: &str) -> Result<String, password_hash::Error> {
    let salt_bytes: [u8; PASSWORD_SALT_LEN] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes)?;

    Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
}
