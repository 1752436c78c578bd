use std::sync::Arc;

use async_trait::async_trait;

use crate::Context;

/// Shared, immutable handle to a registered handler.
pub type HandlerService = Arc<dyn Handler>;

/// Handler is the unit of work for both route endpoints and middlewares.
/// A middleware is simply a handler that calls [`Context::next`] to run the
/// rest of the chain; everything it does before that call happens on the way
/// in, everything after happens on the way out. A handler that never calls
/// `next` cancels the remainder of the chain.
///
/// Register handlers through the [crate::Builder] registration methods.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Process the request carried by `ctx`, optionally passing control to
    /// the rest of the chain via `ctx.next().await`.
    async fn handle(&self, ctx: &mut Context);

    /// Name used in chain execution logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
