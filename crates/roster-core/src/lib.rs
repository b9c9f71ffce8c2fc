//! Core types and trait definitions for the Roster directory.
//!
//! This crate has no HTTP or database dependencies.
//! Data sources, preference storage and the terminal front-end all depend on
//! it; everything here is plain data and pure functions over that data.

pub mod directory;
pub mod error;
pub mod feed;
pub mod follow;
pub mod mask;
pub mod person;
pub mod route;
pub mod search;
pub mod source;
pub mod takedown;
pub mod view;

pub use error::{Error, Result};
