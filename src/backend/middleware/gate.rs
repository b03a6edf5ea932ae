//! Authorization Gate
//!
//! Declarative route security. The gate holds an ordered list of rules,
//! each pairing path patterns (and optionally HTTP methods) with an access
//! requirement. The first rule that matches a request decides; requests no
//! rule matches need an authenticated caller.
//!
//! # Patterns
//!
//! - `/actuator/health` - matches exactly that path
//! - `/api/jobs/**` - matches `/api/jobs` itself and anything below it
//!
//! # Outcomes
//!
//! - No identity on a protected route - 401 with the generic
//!   "Full authentication is required" body
//! - Identity without the required permission - 403
//!
//! Both are logged with source address, method and path.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::WWW_AUTHENTICATE, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::backend::error::ApiError;
use crate::backend::middleware::auth::RequestIdentity;
use crate::shared::Role;

/// What a caller needs to reach a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Anyone, with or without a token
    Public,
    /// Any valid identity
    Authenticated,
    /// An identity holding this permission token
    Permission(String),
}

/// Result of evaluating a request against the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Unauthenticated,
    Forbidden,
}

/// One row of the gate's rule table
#[derive(Debug, Clone)]
pub struct AccessRule {
    patterns: Vec<String>,
    /// `None` matches every method
    methods: Option<Vec<Method>>,
    access: Access,
}

impl AccessRule {
    pub fn new<I, P>(patterns: I, access: Access) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            methods: None,
            access,
        }
    }

    /// Restrict the rule to the given methods
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = Some(methods.into_iter().collect());
        self
    }

    pub fn access(&self) -> &Access {
        &self.access
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        let method_ok = self
            .methods
            .as_ref()
            .map_or(true, |methods| methods.contains(method));

        method_ok && self.patterns.iter().any(|p| pattern_matches(p, path))
    }
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix("/**") {
        Some(prefix) => {
            path == prefix
                || path
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
        None => path == pattern,
    }
}

/// Ordered rule table, first match wins
#[derive(Debug, Clone)]
pub struct AccessGate {
    rules: Vec<AccessRule>,
}

impl AccessGate {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// The application's route security
    ///
    /// API documentation paths are public only when `docs_enabled`;
    /// otherwise they fall through to the authenticated default.
    pub fn standard(docs_enabled: bool) -> Self {
        let mut rules = vec![
            AccessRule::new(["/api/auth/**", "/api/v1/auth/**"], Access::Public),
            AccessRule::new(["/api/jobs/**", "/api/v1/jobs/**"], Access::Public)
                .methods([Method::GET]),
            AccessRule::new(["/actuator/health", "/actuator/health/**"], Access::Public),
        ];

        if docs_enabled {
            rules.push(AccessRule::new(
                [
                    "/v3/api-docs/**",
                    "/swagger-ui/**",
                    "/swagger-ui.html",
                    "/swagger-resources/**",
                    "/webjars/**",
                ],
                Access::Public,
            ));
        }

        rules.push(AccessRule::new(
            ["/actuator/**"],
            Access::Permission(Role::Admin.permission()),
        ));

        Self::new(rules)
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    /// Access requirement for a request; unmatched routes need authentication
    pub fn required_access(&self, method: &Method, path: &str) -> &Access {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(AccessRule::access)
            .unwrap_or(&Access::Authenticated)
    }

    pub fn evaluate(
        &self,
        method: &Method,
        path: &str,
        identity: Option<&RequestIdentity>,
    ) -> Decision {
        match (self.required_access(method, path), identity) {
            (Access::Public, _) => Decision::Allow,
            (_, None) => Decision::Unauthenticated,
            (Access::Authenticated, Some(_)) => Decision::Allow,
            (Access::Permission(permission), Some(identity)) => {
                if identity.has_permission(permission) {
                    Decision::Allow
                } else {
                    Decision::Forbidden
                }
            }
        }
    }
}

fn client_addr(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Authorization middleware
///
/// Must run after `authenticate` so the identity is already attached.
pub async fn authorize(
    State(gate): State<Arc<AccessGate>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let identity = request.extensions().get::<RequestIdentity>();

    match gate.evaluate(request.method(), &path, identity) {
        Decision::Allow => next.run(request).await,
        Decision::Unauthenticated => {
            tracing::warn!(
                "Unauthorized access attempt from IP: {} to {} {}",
                client_addr(&request),
                request.method(),
                path
            );
            let mut response = ApiError::Unauthenticated.into_response_at(&path);
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            response
        }
        Decision::Forbidden => {
            tracing::warn!(
                "Access denied for user {} from IP: {} to {} {}",
                identity.map(|i| i.user_id.to_string()).unwrap_or_default(),
                client_addr(&request),
                request.method(),
                path
            );
            ApiError::AccessDenied.into_response_at(&path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn identity(role: Role) -> RequestIdentity {
        RequestIdentity::new(Uuid::new_v4(), "user@example.com", role)
    }

    #[test]
    fn test_pattern_matching() {
        assert!(pattern_matches("/api/auth/**", "/api/auth"));
        assert!(pattern_matches("/api/auth/**", "/api/auth/login"));
        assert!(pattern_matches("/api/auth/**", "/api/auth/a/b"));
        assert!(!pattern_matches("/api/auth/**", "/api/authx"));
        assert!(!pattern_matches("/api/auth/**", "/api"));
        assert!(pattern_matches("/swagger-ui.html", "/swagger-ui.html"));
        assert!(!pattern_matches("/swagger-ui.html", "/swagger-ui.html/x"));
    }

    #[test]
    fn test_public_routes() {
        let gate = AccessGate::standard(false);
        for (method, path) in [
            (Method::POST, "/api/auth/register"),
            (Method::POST, "/api/v1/auth/login"),
            (Method::GET, "/api/jobs"),
            (Method::GET, "/api/v1/jobs/42"),
            (Method::GET, "/actuator/health"),
            (Method::GET, "/actuator/health/liveness"),
        ] {
            assert_eq!(gate.evaluate(&method, path, None), Decision::Allow, "{method} {path}");
        }
    }

    #[test]
    fn test_job_writes_need_authentication() {
        let gate = AccessGate::standard(false);
        assert_eq!(
            gate.evaluate(&Method::POST, "/api/jobs", None),
            Decision::Unauthenticated
        );
        assert_eq!(
            gate.evaluate(&Method::DELETE, "/api/v1/jobs/1", None),
            Decision::Unauthenticated
        );
        assert_eq!(
            gate.evaluate(&Method::POST, "/api/jobs", Some(&identity(Role::Candidate))),
            Decision::Allow
        );
    }

    #[test]
    fn test_actuator_requires_admin() {
        let gate = AccessGate::standard(false);
        assert_eq!(
            gate.evaluate(&Method::GET, "/actuator/info", None),
            Decision::Unauthenticated
        );
        assert_eq!(
            gate.evaluate(&Method::GET, "/actuator/info", Some(&identity(Role::Recruiter))),
            Decision::Forbidden
        );
        assert_eq!(
            gate.evaluate(&Method::GET, "/actuator/info", Some(&identity(Role::Admin))),
            Decision::Allow
        );
    }

    #[test]
    fn test_first_match_wins() {
        // health is matched before the admin-only actuator rule
        let gate = AccessGate::standard(false);
        assert_eq!(
            gate.evaluate(&Method::GET, "/actuator/health", Some(&identity(Role::Candidate))),
            Decision::Allow
        );

        let gate = AccessGate::new(vec![
            AccessRule::new(["/x/**"], Access::Permission("ROLE_ADMIN".to_string())),
            AccessRule::new(["/x/open"], Access::Public),
        ]);
        assert_eq!(gate.evaluate(&Method::GET, "/x/open", None), Decision::Unauthenticated);
    }

    #[test]
    fn test_unmatched_requires_authentication() {
        let gate = AccessGate::standard(false);
        assert_eq!(
            gate.evaluate(&Method::GET, "/api/v1/users/me", None),
            Decision::Unauthenticated
        );
        assert_eq!(
            gate.evaluate(&Method::GET, "/no/such/route", Some(&identity(Role::Candidate))),
            Decision::Allow
        );
    }

    #[test]
    fn test_docs_rule_follows_flag() {
        let closed = AccessGate::standard(false);
        let open = AccessGate::standard(true);
        for path in ["/v3/api-docs", "/swagger-ui/index.html", "/swagger-ui.html", "/webjars/x.js"] {
            assert_eq!(
                closed.evaluate(&Method::GET, path, None),
                Decision::Unauthenticated
            );
            assert_eq!(open.evaluate(&Method::GET, path, None), Decision::Allow);
        }
    }
}
