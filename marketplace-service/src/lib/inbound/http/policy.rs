//! Route policy table.
//!
//! A data-driven replacement for framework-level filter exemption rules:
//! every (method, path) the API serves is listed here with its access
//! level. Rules are evaluated top to bottom and the first full path match
//! wins, which is how an exact sub-path (`GET /products/me`, authenticated)
//! overrides the wildcard parent (`GET /products/:id`, public) instead of
//! being swallowed by prefix matching.
//!
//! The table is total over the API surface, so it can also distinguish "no
//! such route" from "route exists under another method" and the 404/405
//! responses share the JSON error contract with everything else.

use auth::Role;
use http::Method;

/// Access level a rule grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Dispatch without authentication; no identity is attached.
    Public,
    /// A verified bearer token is required.
    Authenticated,
    /// A verified bearer token whose role matches is required.
    RequireRole(Role),
}

/// Outcome of consulting the table for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Public,
    Authenticated,
    RequireRole(Role),
    /// No rule matches the path under any method.
    RouteNotFound,
    /// Some rule matches the path, but none under this method.
    MethodNotAllowed,
}

struct RouteRule {
    methods: &'static [Method],
    pattern: &'static str,
    access: RouteAccess,
}

/// Ordered, read-only route rules. Built once at startup, shared by
/// reference across request tasks.
pub struct RoutePolicyTable {
    rules: Vec<RouteRule>,
}

impl RoutePolicyTable {
    /// The marketplace API surface.
    pub fn standard() -> Self {
        use RouteAccess::*;

        const GET: &[Method] = &[Method::GET];
        const POST: &[Method] = &[Method::POST];
        const GET_PUT_DELETE: &[Method] = &[Method::GET, Method::PUT, Method::DELETE];
        const PUT_DELETE: &[Method] = &[Method::PUT, Method::DELETE];

        let rules = vec![
            RouteRule {
                methods: POST,
                pattern: "/users/register",
                access: Public,
            },
            RouteRule {
                methods: POST,
                pattern: "/users/login",
                access: Public,
            },
            RouteRule {
                methods: GET_PUT_DELETE,
                pattern: "/users/me",
                access: Authenticated,
            },
            RouteRule {
                methods: &[Method::GET, Method::POST],
                pattern: "/users",
                access: RequireRole(Role::Admin),
            },
            RouteRule {
                methods: GET_PUT_DELETE,
                pattern: "/users/:id",
                access: RequireRole(Role::Admin),
            },
            // The exact sub-path rule sits above the wildcard it overrides.
            RouteRule {
                methods: GET,
                pattern: "/products/me",
                access: Authenticated,
            },
            RouteRule {
                methods: GET,
                pattern: "/products",
                access: Public,
            },
            RouteRule {
                methods: POST,
                pattern: "/products",
                access: Authenticated,
            },
            RouteRule {
                methods: GET,
                pattern: "/products/:id",
                access: Public,
            },
            RouteRule {
                methods: PUT_DELETE,
                pattern: "/products/:id",
                access: Authenticated,
            },
        ];

        Self { rules }
    }

    /// Decide how a (method, path) pair is handled.
    ///
    /// Two phases, mirroring how the router itself matches: the first rule
    /// whose pattern matches the path claims the route (so `/users/login`
    /// is never swallowed by `/users/:id` under another method), then the
    /// method is resolved against the rules of that pattern alone.
    pub fn decide(&self, method: &Method, path: &str) -> RouteDecision {
        let Some(winning_pattern) = self
            .rules
            .iter()
            .find(|rule| pattern_matches(rule.pattern, path))
            .map(|rule| rule.pattern)
        else {
            return RouteDecision::RouteNotFound;
        };

        for rule in self.rules.iter().filter(|r| r.pattern == winning_pattern) {
            if rule.methods.contains(method) {
                return match rule.access {
                    RouteAccess::Public => RouteDecision::Public,
                    RouteAccess::Authenticated => RouteDecision::Authenticated,
                    RouteAccess::RequireRole(role) => RouteDecision::RequireRole(role),
                };
            }
        }

        RouteDecision::MethodNotAllowed
    }
}

/// Segment-wise match; `:name` segments match any single segment.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let pattern_segments: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let path_segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    if pattern_segments.len() != path_segments.len() {
        return false;
    }

    pattern_segments
        .iter()
        .zip(path_segments.iter())
        .all(|(pat, seg)| pat.starts_with(':') || pat == seg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RoutePolicyTable {
        RoutePolicyTable::standard()
    }

    #[test]
    fn test_login_and_register_are_public() {
        assert_eq!(
            table().decide(&Method::POST, "/users/login"),
            RouteDecision::Public
        );
        assert_eq!(
            table().decide(&Method::POST, "/users/register"),
            RouteDecision::Public
        );
    }

    #[test]
    fn test_product_reads_are_public() {
        assert_eq!(
            table().decide(&Method::GET, "/products"),
            RouteDecision::Public
        );
        assert_eq!(
            table().decide(&Method::GET, "/products/8b28907f-3c4b-4b91-98cc-b43f392c58b0"),
            RouteDecision::Public
        );
    }

    #[test]
    fn test_products_me_overrides_the_public_wildcard() {
        assert_eq!(
            table().decide(&Method::GET, "/products/me"),
            RouteDecision::Authenticated
        );
    }

    #[test]
    fn test_product_mutations_require_authentication() {
        assert_eq!(
            table().decide(&Method::POST, "/products"),
            RouteDecision::Authenticated
        );
        assert_eq!(
            table().decide(&Method::PUT, "/products/8b28907f-3c4b-4b91-98cc-b43f392c58b0"),
            RouteDecision::Authenticated
        );
        assert_eq!(
            table().decide(&Method::DELETE, "/products/8b28907f-3c4b-4b91-98cc-b43f392c58b0"),
            RouteDecision::Authenticated
        );
    }

    #[test]
    fn test_user_management_requires_admin_role() {
        assert_eq!(
            table().decide(&Method::GET, "/users"),
            RouteDecision::RequireRole(Role::Admin)
        );
        assert_eq!(
            table().decide(&Method::DELETE, "/users/8b28907f-3c4b-4b91-98cc-b43f392c58b0"),
            RouteDecision::RequireRole(Role::Admin)
        );
    }

    #[test]
    fn test_own_profile_requires_authentication_not_admin() {
        assert_eq!(
            table().decide(&Method::GET, "/users/me"),
            RouteDecision::Authenticated
        );
        assert_eq!(
            table().decide(&Method::PUT, "/users/me"),
            RouteDecision::Authenticated
        );
    }

    #[test]
    fn test_known_path_wrong_method_is_405() {
        assert_eq!(
            table().decide(&Method::PATCH, "/products"),
            RouteDecision::MethodNotAllowed
        );
        // The static path claims the route; the :id wildcard does not
        // capture it under its own methods.
        assert_eq!(
            table().decide(&Method::GET, "/users/login"),
            RouteDecision::MethodNotAllowed
        );
        assert_eq!(
            table().decide(&Method::PUT, "/products/me"),
            RouteDecision::MethodNotAllowed
        );
    }

    #[test]
    fn test_unknown_path_is_404() {
        assert_eq!(
            table().decide(&Method::GET, "/orders"),
            RouteDecision::RouteNotFound
        );
        assert_eq!(
            table().decide(&Method::GET, "/products/1/reviews"),
            RouteDecision::RouteNotFound
        );
    }
}
