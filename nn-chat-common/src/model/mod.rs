pub mod post;
pub mod user;

use crate::model::user::InvalidUserNameError;
use derive_where::derive_where;
use std::{
    fmt::{Display, Formatter},
    marker::PhantomData,
    num::ParseIntError,
    str::FromStr,
};
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    UserName(#[from] InvalidUserNameError),
    #[error("Identifier was not positive: {0}")]
    NonPositiveId(i64),
}

/// Storage-assigned identifier, typed by the kind of object it refers to.
#[derive_where(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct Id<Marker>(i64, PhantomData<Marker>);

impl<Marker> Id<Marker> {
    pub fn new(id: i64) -> Result<Self, ModelValidationError> {
        if id > 0 {
            Ok(Self(id, PhantomData))
        } else {
            Err(ModelValidationError::NonPositiveId(id))
        }
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> TryFrom<i64> for Id<Marker> {
    type Error = ModelValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum ParseIdError {
    #[error("Identifier is not an integer: {0}")]
    NotAnInteger(#[from] ParseIntError),
    #[error(transparent)]
    Invalid(#[from] ModelValidationError),
}

impl<Marker> FromStr for Id<Marker> {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = i64::from_str(s.trim())?;
        Ok(Self::new(id)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Id, ParseIdError, post::PostMarker};

    #[test]
    fn parse_id() {
        assert_eq!("42".parse::<Id<PostMarker>>().unwrap().get(), 42);
        assert_eq!(" 7 ".parse::<Id<PostMarker>>().unwrap().get(), 7);

        assert!(matches!(
            "abc".parse::<Id<PostMarker>>(),
            Err(ParseIdError::NotAnInteger(_))
        ));
        assert!(matches!(
            "12abc".parse::<Id<PostMarker>>(),
            Err(ParseIdError::NotAnInteger(_))
        ));
        assert!(matches!(
            "0".parse::<Id<PostMarker>>(),
            Err(ParseIdError::Invalid(_))
        ));
        assert!(matches!(
            "-3".parse::<Id<PostMarker>>(),
            Err(ParseIdError::Invalid(_))
        ));
    }
}
