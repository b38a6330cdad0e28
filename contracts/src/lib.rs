#![allow(clippy::new_without_default)]

use serde::Serialize;
use std::fmt::Display;

pub use auth::*;
pub use list::*;

mod auth;
mod list;

pub mod status_codes {
    pub const OK: u16 = 200;
    pub const CREATED: u16 = 201;
    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const NOT_FOUND: u16 = 404;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
}

/// Semantic result of an operation, mapped to a transport status code by [`Status::code`].
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The request succeeded
    Ok,
    /// A new resource was created
    Created,
    /// The request was malformed
    BadRequest,
    /// Credentials were missing or rejected
    Unauthorized,
    /// The requested resource does not exist
    NotFound,
    /// Something went wrong on the server side
    InternalServerError,
}

impl Status {
    pub fn code(self) -> u16 {
        use status_codes::*;
        match self {
            Status::Ok => OK,
            Status::Created => CREATED,
            Status::BadRequest => BAD_REQUEST,
            Status::Unauthorized => UNAUTHORIZED,
            Status::NotFound => NOT_FOUND,
            Status::InternalServerError => INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Status> for u16 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let output = match self {
            Status::Ok => "ok",
            Status::Created => "created",
            Status::BadRequest => "bad request",
            Status::Unauthorized => "unauthorized",
            Status::NotFound => "not found",
            Status::InternalServerError => "internal server error",
        };
        write!(f, "{}", output)
    }
}

/// Encoding the caller should use for the `data` of an [`Outcome`].
#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
}

impl Format {
    pub fn content_type(self) -> &'static str {
        match self {
            Format::Json => "application/json",
        }
    }
}

/// Uniform result of every list operation.
///
/// Failures are values too: an `Outcome` with a non-success `status` and no `data`.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct Outcome<T> {
    pub status: Status,
    pub format: Format,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    pub fn new<M>(status: Status, message: M) -> Self
    where
        M: Into<String>,
    {
        Self {
            status,
            format: Format::Json,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }
}

impl<T> Outcome<T>
where
    T: Serialize,
{
    /// Serialize the whole outcome, as sent over the wire.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
