//! Core types and utilities shared by the gridplay painter and critter demos.

pub mod types;
pub mod config;
pub mod error;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
