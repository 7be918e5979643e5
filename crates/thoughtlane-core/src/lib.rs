//! # ThoughtLane Core
//!
//! The domain layer of the ThoughtLane blogging backend.
//! This crate contains the content and engagement business logic (posts,
//! comments, tags, likes) with zero infrastructure dependencies: every store,
//! token, hashing and file-storage concern is reached through a port.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, DomainResult};
