use std::fmt;

use serde::{de, ser};

use crate::verdict::Verdict;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Occurs when a schema description is malformed: a field declared more
    /// than once, a banned field that is also declared, inverted bounds on a
    /// rule, or a `Multi` rule with no branches. Raised at construction, never
    /// at validation time.
    BadSchema(String),
    /// Occurs when serde serialization or deserialization fails
    SerdeFail(String),
    /// A record was refused by a blocking [`WriteGuard`][crate::WriteGuard].
    /// Carries the full verdict so the caller can see every fault.
    FailValidate(Verdict),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::BadSchema(ref err) => write!(f, "Bad schema: {}", err),
            Error::SerdeFail(ref msg) => f.write_str(msg),
            Error::FailValidate(ref verdict) => write!(f, "Failed validation: {}", verdict),
        }
    }
}

impl std::error::Error for Error {}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::SerdeFail(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::SerdeFail(msg.to_string())
    }
}
