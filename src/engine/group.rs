use crate::handler::HandlerService;

/// A path-prefix scope with its own ordered middleware list.
///
/// The prefix is computed once at creation time from the parent's prefix and
/// the group's local suffix, and never changes. Groups only influence which
/// middlewares apply to a request and which pattern string a route is
/// registered under; the route trie itself is shared by all groups.
pub struct Group {
    prefix: String,
    middlewares: Vec<HandlerService>,
}

impl Group {
    pub(crate) fn new(prefix: String, middlewares: Vec<HandlerService>) -> Self {
        Self { prefix, middlewares }
    }

    /// Whether this group's middlewares apply to a request path. Plain
    /// string prefix semantics: `/v1` also covers `/v1x`.
    pub(crate) fn covers(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    pub(crate) fn middlewares(&self) -> &[HandlerService] {
        &self.middlewares
    }
}
