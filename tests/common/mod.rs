//! Common test utilities and helpers.
//!
//! This module provides shared functionality for all tests, including:
//! - Packet PDF builders
//! - Raw lopdf documents for less common text operators
//! - Assertions on extracted text and raw content streams

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod raw;

pub use assertions::*;
pub use fixtures::*;
pub use raw::*;
