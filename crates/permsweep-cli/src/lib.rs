//! permsweep binary crate: configuration, the legacy user store, token
//! decryption, credential resolution, and the sequential cleanup run.

pub mod cli;
pub mod config;
pub mod error;
pub mod resolver;
pub mod runner;
pub mod secrets;
pub mod store;
pub mod worker;
