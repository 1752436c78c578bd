pub(crate) mod builder;
pub(crate) mod group;

use async_trait::async_trait;
use http::{Request, Response, StatusCode};
use tracing::{debug, error};

use crate::{
    context::Context,
    handler::{Handler, HandlerService},
    routing::router::MethodRouter,
};
use builder::Builder;
use group::Group;

/// The composition root. Holds the finalized route tries, the group
/// registry and the not-found handler, all read-only once built, so an
/// `Engine` can be shared across concurrent request tasks without locking.
pub struct Engine {
    pub(crate) router: MethodRouter,
    pub(crate) groups: Vec<Group>,
    pub(crate) not_found: HandlerService,
}

impl Engine {
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Entry point for the transport layer: turns one request into one
    /// response, returning once the full handler chain has run.
    ///
    /// Builds the request context, collects the middlewares of every group
    /// whose prefix covers the path (in group creation order), resolves the
    /// route to its handler or falls back to the not-found handler, and
    /// drives the chain.
    pub async fn handle(&self, request: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let mut ctx = Context::new(request);
        let mut chain: Vec<HandlerService> = self
            .groups
            .iter()
            .filter(|group| group.covers(ctx.path()))
            .flat_map(|group| group.middlewares().iter().cloned())
            .collect();
        match self.router.get_route(ctx.method(), ctx.path()) {
            Some((pattern, params)) => {
                debug!(method = %ctx.method(), path = ctx.path(), pattern, "route matched");
                match self.router.handler(ctx.method(), pattern) {
                    Some(handler) => chain.push(handler.clone()),
                    None => {
                        // Unreachable while the builder invariant holds:
                        // every terminal pattern has a handler entry.
                        error!(pattern, "terminal pattern without a handler");
                        chain.push(self.not_found.clone());
                    }
                }
                ctx.params = params;
            }
            None => {
                debug!(method = %ctx.method(), path = ctx.path(), "no route");
                chain.push(self.not_found.clone());
            }
        }
        ctx.handlers = chain;
        ctx.next().await;
        ctx.into_response()
    }
}

/// Built-in terminal handler for unmatched requests.
struct NotFound;

#[async_trait]
impl Handler for NotFound {
    async fn handle(&self, ctx: &mut Context) {
        let body = format!("404 NOT FOUND: {}", ctx.path());
        ctx.string(StatusCode::NOT_FOUND, &body);
    }
}
