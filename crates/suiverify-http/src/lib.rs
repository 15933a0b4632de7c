//! SuiVerify HTTP server functionality.
pub mod config;
#[cfg(test)]
pub(crate) mod data;
pub mod did;
pub mod encrypt_upload;
pub mod errors;
pub mod handlers;
pub mod server;
pub mod state;
