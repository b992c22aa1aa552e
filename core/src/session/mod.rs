//! Session minting
//!
//! Turns an optional visitor identity into a short-lived client secret by
//! calling the vendor's `POST /v1/chatkit/sessions` with the server's own
//! credential and workflow identifier.
//!
//! One upstream contract version is pinned (see [`contract`]): the `user`
//! field is the bare identifier string and the secret is the top-level
//! `client_secret`. Any other successful response shape is a contract
//! mismatch, not something to probe for.

pub mod contract;
pub mod errors;
pub mod service;

pub use contract::{
    ChatKitConfiguration, CreateSessionBody, CreateSessionReply, FileUploadConfig, SessionRequest,
    SessionResponse, WorkflowRef, BETA_HEADER, BETA_HEADER_VALUE, SESSIONS_PATH,
};
pub use errors::SessionError;
pub use service::SessionService;
