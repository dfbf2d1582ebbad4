//! Pre-session rejection errors.

use thiserror::Error;

use crate::client_id::{MAX_CLIENT_ID, MIN_CLIENT_ID};

/// Why a connection attempt was rejected before any session was created.
/// The messages are client-visible — they become the body of the
/// 400-class response on the upgrade request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientIdError {
    #[error("client id is required")]
    Missing,

    #[error("client id must be an integer, got \"{0}\"")]
    NotANumber(String),

    #[error("client id {0} is outside the accepted range {min}-{max}", min = MIN_CLIENT_ID, max = MAX_CLIENT_ID)]
    OutOfRange(i64),
}
