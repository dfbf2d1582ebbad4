//! Client identifiers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ClientIdError;

/// Lowest identifier accepted at connect time.
pub const MIN_CLIENT_ID: u8 = 1;
/// Highest identifier accepted at connect time.
pub const MAX_CLIENT_ID: u8 = 10;

/// A validated client identifier.
///
/// Supplied by the client as a query parameter on the upgrade request.
/// Unique among live sessions (the registry enforces that); reuse after
/// disconnect is fine. A `ClientId` can only be constructed through the
/// validation path, so holding one means the 1–10 contract already held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClientId(u8);

impl ClientId {
    pub fn new(raw: i64) -> Result<Self, ClientIdError> {
        if raw < i64::from(MIN_CLIENT_ID) || raw > i64::from(MAX_CLIENT_ID) {
            return Err(ClientIdError::OutOfRange(raw));
        }
        Ok(Self(raw as u8))
    }

    /// Apply the full query-parameter contract: the identifier must be
    /// present, parse as an integer, and lie within the accepted range.
    pub fn from_param(param: Option<&str>) -> Result<Self, ClientIdError> {
        match param {
            None => Err(ClientIdError::Missing),
            Some("") => Err(ClientIdError::Missing),
            Some(raw) => raw.parse(),
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl FromStr for ClientId {
    type Err = ClientIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s
            .parse()
            .map_err(|_| ClientIdError::NotANumber(s.to_string()))?;
        Self::new(raw)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
