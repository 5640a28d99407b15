//! `weasis-launcher` library.
//!
//! Turns study retrieval requests into `weasis://` launch URIs for the Weasis
//! desktop viewer.

pub mod access;
pub mod commands;
pub mod config;
pub mod constants;
pub mod descriptor;
pub mod error;
pub mod handlers;
pub mod launch;
pub mod manifest;
pub mod request;
pub mod server;
pub mod text;
pub mod uri;

//--------------------------------------------------------------------------------------------------
// Re-Exports
//--------------------------------------------------------------------------------------------------

pub use access::*;
pub use commands::*;
pub use config::*;
pub use constants::*;
pub use descriptor::*;
pub use error::*;
pub use launch::*;
pub use manifest::*;
pub use request::*;
pub use server::*;
pub use uri::*;
