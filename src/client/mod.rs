pub mod api;
pub mod controller;
pub mod filter;
pub mod session;

use std::fmt;

pub use api::{EmployeeApi, HttpApi};
pub use controller::{DirectoryController, Phase};
pub use filter::{EmployeeFilter, EmployeeStats, StatusFilter};
pub use session::{FileSessionStorage, MemorySessionStorage, Session, SessionStorage};

#[derive(Debug)]
pub enum ClientError {
    Http(reqwest::Error),
    Status { status: u16, message: String },
    Session(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Http(err) => write!(f, "Request failed: {}", err),
            ClientError::Status { status, message } => write!(f, "Server responded {}: {}", status, message),
            ClientError::Session(msg) => write!(f, "Session storage error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Http(err)
    }
}
