//! Routing core for HTTP services: a per-method route trie with named
//! parameters and trailing wildcards, hierarchical path-prefix groups, and
//! onion-style middleware execution over a per-request context.
//!
//! The transport layer is an external collaborator: this crate consumes an
//! [`http::Request`] and produces an [`http::Response`], nothing more. All
//! registration happens on a [`Builder`] during single-threaded setup;
//! [`Builder::build`] validates the route set and finalizes it into an
//! immutable [`Engine`] that can be shared freely across request tasks.
//!
//! # Example usage
//!
//! ```
//! use async_trait::async_trait;
//! use http::{Method, Request, StatusCode};
//! use trellis::{Context, Engine, Handler};
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, ctx: &mut Context) {
//!         let name = ctx.param("name").unwrap_or("world").to_string();
//!         ctx.string(StatusCode::OK, &format!("hello {name}"));
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut builder = Engine::builder();
//! let root = builder.root();
//! builder.get(root, "/hello/:name", Hello);
//! let engine = builder.build().unwrap();
//!
//! let request = Request::builder()
//!     .method(Method::GET)
//!     .uri("/hello/ferris")
//!     .body(Vec::new())
//!     .unwrap();
//! let response = engine.handle(request).await;
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.body().as_slice(), b"hello ferris");
//! # }
//! ```
pub(crate) mod context;
pub(crate) mod engine;
pub(crate) mod handler;
pub mod middleware;
pub(crate) mod routing;

pub use context::Context;
pub use engine::builder::{Builder, GroupId};
pub use engine::Engine;
pub use handler::{Handler, HandlerService};
pub use routing::router::DuplicatePolicy;
pub use routing::{Error, Result};

/// Creates a new [`Builder`], equivalent to [`Engine::builder`].
pub fn builder() -> Builder {
    Engine::builder()
}
