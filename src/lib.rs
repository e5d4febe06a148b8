// ABOUTME: Library root for cert-manager-verifier - exposes the verification API.
// ABOUTME: The main binary is in main.rs.

pub mod cluster;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod output;
pub mod poll;
pub mod types;
pub mod verify;

pub use verify::{VerifyOptions, VerifyResult, verify};
