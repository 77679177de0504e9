//! One-time tokens guarding state-changing form submissions.
//!
//! Every rendered listing page carries a fresh token for the viewing user. The
//! next submission or deletion from that user must present it, and the token is
//! gone after the first successful use. Tokens are keyed by user name, so a
//! token issued to one user is never accepted for another.

use crate::model::user::UserName;
use dashmap::DashMap;
use std::fmt::{Debug, Display, Formatter};

pub const ONE_TIME_TOKEN_BYTES: usize = 8;

#[derive(Clone, Eq, PartialEq, Hash)]
pub struct OneTimeToken(String);

impl OneTimeToken {
    #[must_use]
    pub fn generate_random() -> Self {
        let bytes: [u8; ONE_TIME_TOKEN_BYTES] = rand::random();
        Self(hex::encode(bytes))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OneTimeToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Debug for OneTimeToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OneTimeToken").field(&"[redacted]").finish()
    }
}

/// The live token of each user. At most one entry per user exists at a time.
#[derive(Debug, Default)]
pub struct OneTimeTokenStore {
    tokens: DashMap<UserName, OneTimeToken>,
}

impl OneTimeTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh token for `user`, silently replacing any unconsumed one.
    pub fn issue(&self, user: &UserName) -> OneTimeToken {
        let token = OneTimeToken::generate_random();
        self.tokens.insert(user.clone(), token.clone());
        token
    }

    /// Removes the live token of `user` if and only if it equals `supplied`.
    ///
    /// The comparison and the removal happen under the same shard lock, so of
    /// two concurrent calls presenting the same token at most one returns true.
    pub fn consume(&self, user: &UserName, supplied: &str) -> bool {
        self.tokens
            .remove_if(user, |_, token| token.as_str() == supplied)
            .is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
