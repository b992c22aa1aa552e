//! WESCU Chat: backend for the website's embedded chat assistant
//!
//! The binary wires configuration, logging and the HTTP server together.
//! Domain logic lives in `wescu-chat-core`, routes in `wescu-chat-api`.

pub mod cli;
