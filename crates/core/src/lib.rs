//! Core library for the orchestration console
//!
//! This crate contains everything the console needs that does not talk to
//! the network:
//! - DTOs mirrored from the backend REST API
//! - Percent-encoding path builder for API routes
//! - Session (credential) and theme stores with persistence mirrors

pub mod error;
pub mod models;
pub mod observable;
pub mod path;
pub mod session;
pub mod storage;
pub mod theme;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
