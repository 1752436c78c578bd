use std::sync::Arc;

use http::Method;

use super::{group::Group, Engine, NotFound};
use crate::{
    handler::{Handler, HandlerService},
    routing::{
        router::{DuplicatePolicy, MethodRouter},
        Result,
    },
};

/// Handle to a group created on a [`Builder`]. Only meaningful for the
/// builder that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupId(usize);

struct GroupDef {
    prefix: String,
    middlewares: Vec<HandlerService>,
}

struct RouteDef {
    method: Method,
    pattern: String,
    handler: HandlerService,
}

/// Collects groups, middlewares and routes during the single-threaded setup
/// phase, then finalizes them into an immutable [`Engine`].
///
/// All validation (pattern syntax, duplicate routes) happens in [`build`];
/// registration itself cannot fail.
///
/// [`build`]: Builder::build
pub struct Builder {
    groups: Vec<GroupDef>,
    routes: Vec<RouteDef>,
    duplicates: DuplicatePolicy,
    not_found: HandlerService,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            groups: vec![GroupDef {
                prefix: String::new(),
                middlewares: Vec::new(),
            }],
            routes: Vec::new(),
            duplicates: DuplicatePolicy::default(),
            not_found: Arc::new(NotFound),
        }
    }

    /// The root group. Its prefix is empty, so middlewares registered on it
    /// apply to every request, including unmatched ones.
    pub fn root(&self) -> GroupId {
        GroupId(0)
    }

    /// Creates a group nested under `parent`. The new group's prefix is the
    /// parent's prefix with `suffix` appended.
    pub fn group(&mut self, parent: GroupId, suffix: &str) -> GroupId {
        let prefix = format!("{}{}", self.groups[parent.0].prefix, suffix);
        self.groups.push(GroupDef {
            prefix,
            middlewares: Vec::new(),
        });
        GroupId(self.groups.len() - 1)
    }

    /// Appends a middleware to the given group. Middlewares run in
    /// registration order, across groups in group creation order.
    pub fn register_middleware<H: Handler + 'static>(
        &mut self,
        group: GroupId,
        middleware: H,
    ) -> &mut Self {
        self.groups[group.0].middlewares.push(Arc::new(middleware));
        self
    }

    /// Registers a route on the given group. The group's prefix is prepended
    /// to `pattern` before the route reaches the shared router.
    pub fn register_route<H: Handler + 'static>(
        &mut self,
        group: GroupId,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> &mut Self {
        self.routes.push(RouteDef {
            method,
            pattern: format!("{}{}", self.groups[group.0].prefix, pattern),
            handler: Arc::new(handler),
        });
        self
    }

    pub fn get<H: Handler + 'static>(&mut self, group: GroupId, pattern: &str, handler: H) -> &mut Self {
        self.register_route(group, Method::GET, pattern, handler)
    }

    pub fn post<H: Handler + 'static>(&mut self, group: GroupId, pattern: &str, handler: H) -> &mut Self {
        self.register_route(group, Method::POST, pattern, handler)
    }

    pub fn put<H: Handler + 'static>(&mut self, group: GroupId, pattern: &str, handler: H) -> &mut Self {
        self.register_route(group, Method::PUT, pattern, handler)
    }

    pub fn delete<H: Handler + 'static>(&mut self, group: GroupId, pattern: &str, handler: H) -> &mut Self {
        self.register_route(group, Method::DELETE, pattern, handler)
    }

    pub fn patch<H: Handler + 'static>(&mut self, group: GroupId, pattern: &str, handler: H) -> &mut Self {
        self.register_route(group, Method::PATCH, pattern, handler)
    }

    pub fn head<H: Handler + 'static>(&mut self, group: GroupId, pattern: &str, handler: H) -> &mut Self {
        self.register_route(group, Method::HEAD, pattern, handler)
    }

    pub fn options<H: Handler + 'static>(&mut self, group: GroupId, pattern: &str, handler: H) -> &mut Self {
        self.register_route(group, Method::OPTIONS, pattern, handler)
    }

    /// Sets how a second registration of the same method + pattern is
    /// treated. The default rejects it at build time.
    pub fn with_duplicate_routes(&mut self, policy: DuplicatePolicy) -> &mut Self {
        self.duplicates = policy;
        self
    }

    /// Replaces the built-in 404 handler.
    pub fn with_not_found<H: Handler + 'static>(&mut self, handler: H) -> &mut Self {
        self.not_found = Arc::new(handler);
        self
    }

    /// Validates every registered route and finalizes the engine. After this
    /// point the route set and group registry are immutable.
    pub fn build(self) -> Result<Engine> {
        let mut router = MethodRouter::new();
        for route in self.routes {
            router.add_route(route.method, &route.pattern, route.handler, self.duplicates)?;
        }
        Ok(Engine {
            router,
            groups: self
                .groups
                .into_iter()
                .map(|group| Group::new(group.prefix, group.middlewares))
                .collect(),
            not_found: self.not_found,
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use http::StatusCode;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{routing::Error, Context};

    struct Ok200;

    #[async_trait]
    impl Handler for Ok200 {
        async fn handle(&self, ctx: &mut Context) {
            ctx.status(StatusCode::OK);
        }
    }

    #[test]
    fn group_prefixes_compose_at_creation_time() {
        let mut builder = Engine::builder();
        let root = builder.root();
        let v1 = builder.group(root, "/v1");
        let admin = builder.group(v1, "/admin");
        builder.get(admin, "/users/:id", Ok200);

        let engine = builder.build().unwrap();
        assert!(engine
            .router
            .get_route(&Method::GET, "/v1/admin/users/42")
            .is_some());
    }

    #[test]
    fn build_rejects_malformed_patterns() {
        let mut builder = Engine::builder();
        let root = builder.root();
        builder.get(root, "/files/*path/raw", Ok200);

        assert_eq!(
            builder.build().err(),
            Some(Error::WildcardNotLast {
                pattern: "/files/*path/raw".to_string()
            })
        );
    }

    #[test]
    fn build_accepts_multibyte_patterns() {
        let mut builder = Engine::builder();
        let root = builder.root();
        builder.get(root, "/über", Ok200);

        let engine = builder.build().unwrap();
        assert!(engine.router.get_route(&Method::GET, "/über").is_some());
    }

    #[test]
    fn build_rejects_duplicates_by_default() {
        let mut builder = Engine::builder();
        let root = builder.root();
        builder.get(root, "/hello", Ok200);
        builder.get(root, "/hello", Ok200);

        assert_eq!(
            builder.build().err(),
            Some(Error::DuplicateRoute {
                method: Method::GET,
                pattern: "/hello".to_string()
            })
        );
    }

    #[test]
    fn build_accepts_duplicates_when_overwriting() {
        let mut builder = Engine::builder();
        builder.with_duplicate_routes(DuplicatePolicy::Overwrite);
        let root = builder.root();
        builder.get(root, "/hello", Ok200);
        builder.get(root, "/hello", Ok200);

        assert!(builder.build().is_ok());
    }

    #[test]
    fn validation_failures_name_the_prefixed_pattern() {
        let mut builder = Engine::builder();
        let root = builder.root();
        let api = builder.group(root, "/api");
        builder.get(api, "/x/ab:y", Ok200);

        assert_eq!(
            builder.build().err(),
            Some(Error::MixedSegment {
                pattern: "/api/x/ab:y".to_string(),
                segment: "ab:y".to_string()
            })
        );
    }
}
