//! Redaction decision logic.
//!
//! This module holds the parts of the engine that only look at text:
//! locating the confidential span on a page and folding page results into a
//! per-document disposition. Nothing here touches PDF bytes.

pub mod locator;
pub mod state;

pub use locator::{SpanLocator, SpanResult};
pub use state::{DocumentState, PageEvent};
