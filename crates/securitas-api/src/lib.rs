// securitas-api: Async Rust client for the Securitas Direct alarm panel API

pub mod auth;
pub mod client;
pub mod error;
pub mod executor;
pub mod identity;
pub mod models;
pub mod operations;
pub mod session;
pub mod transport;

pub use auth::{ApiFlavor, Credentials};
pub use client::{AlarmClient, ClientConfig, DEFAULT_BASE_URL};
pub use error::{Error, ErrorKind, NormalizedError, RawFailure, RemoteError, normalize};
pub use executor::{AuthHeader, RequestExecutor, request_id};
pub use identity::DeviceIdentity;
pub use models::{
    AlarmStatus, ArmMode, AuthOutcome, CommandResult, DisarmMode, Installation, StatusException,
};
pub use operations::{Operation, OperationSpec};
pub use session::{Session, SessionStore};
pub use transport::TransportConfig;
