use std::collections::HashMap;

use http::Method;

use super::{path, trie::Trie, Error, Result};
use crate::handler::HandlerService;

/// How `add_route` treats a (method, pattern) pair that is already
/// registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail registration with [`Error::DuplicateRoute`].
    #[default]
    Reject,
    /// Let the later handler silently replace the earlier one.
    Overwrite,
}

/// One trie per HTTP method plus the flat pattern-to-handler table.
///
/// All groups share a single `MethodRouter`; grouping only affects the
/// pattern string a route is registered under.
#[derive(Default)]
pub struct MethodRouter {
    roots: HashMap<Method, Trie>,
    handlers: HashMap<(Method, String), HandlerService>,
}

impl MethodRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a route. Setup phase only.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler: HandlerService,
        policy: DuplicatePolicy,
    ) -> Result<()> {
        path::validate_pattern(pattern)?;
        let key = (method.clone(), pattern.to_string());
        if policy == DuplicatePolicy::Reject && self.handlers.contains_key(&key) {
            return Err(Error::DuplicateRoute {
                method,
                pattern: pattern.to_string(),
            });
        }
        let parts = path::split(pattern);
        self.roots.entry(method).or_default().insert(pattern, &parts);
        self.handlers.insert(key, handler);
        Ok(())
    }

    /// Resolves `path` against the trie registered for `method`, returning
    /// the matched pattern and the extracted parameter bindings.
    pub fn get_route(&self, method: &Method, path: &str) -> Option<(&str, HashMap<String, String>)> {
        let root = self.roots.get(method)?;
        let parts = path::split(path);
        let pattern = root.search(&parts)?;
        Some((pattern, extract_params(pattern, &parts)))
    }

    /// Looks up the handler registered under an exact (method, pattern) key.
    pub fn handler(&self, method: &Method, pattern: &str) -> Option<&HandlerService> {
        self.handlers.get(&(method.clone(), pattern.to_string()))
    }
}

/// Walks the pattern's segments and the concrete path's segments in
/// lockstep. `:name` binds a single segment; `*name` binds the rest of the
/// path joined with `/` (possibly empty) and ends the walk.
fn extract_params(pattern: &str, parts: &[&str]) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (index, segment) in path::split(pattern).into_iter().enumerate() {
        if let Some(name) = segment.strip_prefix(':') {
            if let Some(value) = parts.get(index) {
                params.insert(name.to_string(), value.to_string());
            }
        } else if let Some(name) = segment.strip_prefix('*') {
            params.insert(name.to_string(), parts[index.min(parts.len())..].join("/"));
            break;
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Context;

    struct Noop;

    #[async_trait]
    impl crate::Handler for Noop {
        async fn handle(&self, _ctx: &mut Context) {}
    }

    fn noop() -> HandlerService {
        Arc::new(Noop)
    }

    fn router(routes: &[(Method, &str)]) -> MethodRouter {
        let mut router = MethodRouter::new();
        for (method, pattern) in routes {
            router
                .add_route(method.clone(), *pattern, noop(), DuplicatePolicy::Reject)
                .unwrap();
        }
        router
    }

    #[test]
    fn binds_named_parameters() {
        let router = router(&[(Method::GET, "/p/:lang/doc")]);

        let (pattern, params) = router.get_route(&Method::GET, "/p/go/doc").unwrap();
        assert_eq!(pattern, "/p/:lang/doc");
        assert_eq!(params.get("lang").map(String::as_str), Some("go"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn wrong_depth_does_not_match() {
        let router = router(&[(Method::GET, "/p/:lang/doc")]);

        assert!(router.get_route(&Method::GET, "/p/go").is_none());
        assert!(router.get_route(&Method::GET, "/p/go/doc/extra").is_none());
    }

    #[test]
    fn binds_wildcard_remainder() {
        let router = router(&[(Method::GET, "/static/*filepath")]);

        let (_, params) = router.get_route(&Method::GET, "/static/css/a.css").unwrap();
        assert_eq!(params.get("filepath").map(String::as_str), Some("css/a.css"));

        let (_, params) = router.get_route(&Method::GET, "/static").unwrap();
        assert_eq!(params.get("filepath").map(String::as_str), Some(""));
    }

    #[test]
    fn unregistered_method_does_not_match() {
        let router = router(&[(Method::GET, "/hello")]);

        assert!(router.get_route(&Method::POST, "/hello").is_none());
    }

    #[test]
    fn lookup_is_idempotent() {
        let router = router(&[(Method::GET, "/p/:lang/doc"), (Method::GET, "/static/*filepath")]);

        let first = router.get_route(&Method::GET, "/p/go/doc").unwrap();
        let second = router.get_route(&Method::GET, "/p/go/doc").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_routes_are_rejected_by_default() {
        let mut router = router(&[(Method::GET, "/hello")]);

        let result = router.add_route(Method::GET, "/hello", noop(), DuplicatePolicy::Reject);
        assert_eq!(
            result,
            Err(Error::DuplicateRoute {
                method: Method::GET,
                pattern: "/hello".to_string()
            })
        );
    }

    #[test]
    fn duplicate_routes_may_overwrite_when_configured() {
        let mut router = router(&[(Method::GET, "/hello")]);

        let result = router.add_route(Method::GET, "/hello", noop(), DuplicatePolicy::Overwrite);
        assert_eq!(result, Ok(()));
        assert!(router.get_route(&Method::GET, "/hello").is_some());
    }

    #[test]
    fn same_pattern_may_serve_multiple_methods() {
        let router = router(&[(Method::GET, "/hello"), (Method::POST, "/hello")]);

        assert!(router.get_route(&Method::GET, "/hello").is_some());
        assert!(router.get_route(&Method::POST, "/hello").is_some());
        assert!(router.handler(&Method::GET, "/hello").is_some());
        assert!(router.handler(&Method::POST, "/hello").is_some());
    }
}
