use std::time::Instant;

use async_trait::async_trait;
use http::StatusCode;
use tracing::info;

use crate::{Context, Handler};

/// Logs method, path, resolved status and elapsed time for every request
/// that passes through it.
pub struct Logger;

#[async_trait]
impl Handler for Logger {
    async fn handle(&self, ctx: &mut Context) {
        let start = Instant::now();
        ctx.next().await;
        let status = ctx.response_status().unwrap_or(StatusCode::OK);
        info!(
            method = %ctx.method(),
            path = ctx.path(),
            status = status.as_u16(),
            elapsed = ?start.elapsed(),
            "request served"
        );
    }
}
