//! HTTP API module for the contribution rewriter.
//!
//! This module provides the `POST /rewrite` endpoint, which rewrites a batch
//! of files supplied as JSON lines against the server's schedule table.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{FileRequest, RewriteRequest};
pub use response::{ApiError, ApiErrorResponse, FileResponse, RewriteResponse};
pub use state::AppState;
