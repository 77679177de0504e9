use serde::{
    Deserialize, Deserializer, Serialize,
    de::{Error, Unexpected},
};
use std::fmt::{Display, Formatter};
use thiserror::Error;

pub const USER_NAME_MAX_LEN: usize = 64;
pub const ADMIN_USER_NAME: &str = "admin";

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The user name is invalid: {0:?}")]
pub struct InvalidUserNameError(String);

impl UserName {
    /// Names must be non-empty, at most [`USER_NAME_MAX_LEN`] characters and
    /// free of `:`, which separates names from hashes in the credentials file.
    pub fn new(name: String) -> Result<Self, InvalidUserNameError> {
        if !name.is_empty() && name.chars().count() <= USER_NAME_MAX_LEN && !name.contains(':') {
            Ok(UserName(name))
        } else {
            Err(InvalidUserNameError(name))
        }
    }

    #[must_use]
    pub fn admin() -> Self {
        UserName(ADMIN_USER_NAME.to_owned())
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl Display for UserName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for UserName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let inner = String::deserialize(deserializer)?;
        UserName::new(inner)
            .map_err(|err| Error::invalid_value(Unexpected::Str(&err.0), &"UserName"))
    }
}
