//! Route table and path matching.
//!
//! # Responsibilities
//! - Store per-method, order-significant route registrations
//! - Match request paths against route patterns
//!
//! # Design Decisions
//! - Path matching is case-sensitive, segment by segment
//! - `:name` segments match any single non-empty segment
//! - No regex, matching is O(number of segments)
//! - First matching route wins within a method

use std::collections::HashMap;

use http::Method;

use crate::app::handler::Handler;

/// Compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Param,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Self {
        let segments = raw
            .split('/')
            .map(|s| {
                if s.starts_with(':') {
                    Segment::Param
                } else {
                    Segment::Literal(s.to_owned())
                }
            })
            .collect();
        Self {
            raw: raw.to_owned(),
            segments,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let mut given = path.split('/');
        for segment in &self.segments {
            let Some(actual) = given.next() else {
                return false;
            };
            match segment {
                Segment::Literal(expected) => {
                    if actual != expected {
                        return false;
                    }
                }
                Segment::Param => {
                    if actual.is_empty() {
                        return false;
                    }
                }
            }
        }
        given.next().is_none()
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// A registered route: one path pattern and its ordered callback chain.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: PathPattern,
    callbacks: Vec<Handler>,
}

impl Route {
    pub(crate) fn new(pattern: PathPattern, callbacks: Vec<Handler>) -> Self {
        Self { pattern, callbacks }
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn callbacks(&self) -> &[Handler] {
        &self.callbacks
    }

    pub(crate) fn callbacks_mut(&mut self) -> &mut [Handler] {
        &mut self.callbacks
    }
}

/// Routes keyed by HTTP method, in registration order per method.
#[derive(Debug, Default)]
pub struct RouteTable {
    by_method: HashMap<Method, Vec<Route>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, method: Method, pattern: PathPattern, callbacks: Vec<Handler>) {
        self.by_method
            .entry(method)
            .or_default()
            .push(Route::new(pattern, callbacks));
    }

    /// First route registered under `method` whose pattern matches `path`.
    pub fn find(&self, method: &Method, path: &str) -> Option<&Route> {
        self.by_method
            .get(method)?
            .iter()
            .find(|route| route.pattern.matches(path))
    }

    pub fn for_method(&self, method: &Method) -> &[Route] {
        self.by_method.get(method).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.by_method.values().all(Vec::is_empty)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Route> {
        self.by_method.values_mut().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let pattern = PathPattern::parse("/api/v1");

        assert!(pattern.matches("/api/v1"));
        assert!(!pattern.matches("/api/v2"));
        assert!(!pattern.matches("/api/v1/extra"));
        assert!(!pattern.matches("/api"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let pattern = PathPattern::parse("/Admin");

        assert!(pattern.matches("/Admin"));
        assert!(!pattern.matches("/admin"));
    }

    #[test]
    fn test_param_segment() {
        let pattern = PathPattern::parse("/users/:id/posts");

        assert!(pattern.matches("/users/42/posts"));
        assert!(pattern.matches("/users/abc/posts"));
        assert!(!pattern.matches("/users//posts"));
        assert!(!pattern.matches("/users/42"));
    }

    #[test]
    fn test_first_registered_route_wins() {
        let mut table = RouteTable::new();
        table.add(
            Method::GET,
            PathPattern::parse("/a/:x"),
            vec![Handler::named("first", |_rq, _rs, _nx| async { Ok(()) })],
        );
        table.add(
            Method::GET,
            PathPattern::parse("/a/b"),
            vec![Handler::named("second", |_rq, _rs, _nx| async { Ok(()) })],
        );

        let route = table.find(&Method::GET, "/a/b").unwrap();
        assert_eq!(route.callbacks()[0].label(), "first");
        assert!(table.find(&Method::POST, "/a/b").is_none());
    }
}
