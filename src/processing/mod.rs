//! Line and batch processing.
//!
//! [`rewrite_line`] handles one line; [`BatchRewriter`] drives whole
//! batches and turns a fatal line into a [`RewriteError`](crate::error::RewriteError).

mod orchestrator;
mod record_rewrite;

pub use orchestrator::BatchRewriter;
pub use record_rewrite::{FatalReason, LineContext, LineOutcome, TransformedLine, rewrite_line};
