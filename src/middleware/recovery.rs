use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use http::StatusCode;
use tracing::error;

use crate::{Context, Handler};

/// Converts a panic anywhere in its continuation into a 500 response.
///
/// The chain mechanism itself does not handle panics; place this first in
/// the chain (root group, before other middlewares) to shield the transport
/// layer from unwinding handlers.
pub struct Recovery;

#[async_trait]
impl Handler for Recovery {
    async fn handle(&self, ctx: &mut Context) {
        if let Err(payload) = AssertUnwindSafe(ctx.next()).catch_unwind().await {
            let message = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("unknown panic");
            error!(path = ctx.path(), panic = message, "handler panicked");
            ctx.string(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
        }
    }
}
