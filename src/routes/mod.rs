//! Route tables: URL paths to pages.
//!
//! Two tables exist. Which one is active is decided once at startup from the
//! session state; navigation never re-checks authentication.

use std::collections::HashMap;

use serde::Serialize;

use crate::auth::SessionState;
use crate::models::ListQuery;

/// A page and the parameters parsed from its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "camelCase")]
pub enum Page {
    Logs { query: ListQuery },
    CreateLog { run_number: Option<u64> },
    #[serde(rename_all = "camelCase")]
    Log { log_id: u64 },
    Runs { query: ListQuery },
    #[serde(rename_all = "camelCase")]
    Run { run_number: u64 },
    Subsystems,
    Tokens,
    #[serde(rename_all = "camelCase")]
    Profile { user_id: u64 },
    /// Shown while the login callback completes
    Loader,
    Login,
}

/// Frame a page is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutKind {
    Main,
    Unauthorized,
}

type Params<'a> = HashMap<&'static str, &'a str>;
type PageBuilder = fn(&Params<'_>, ListQuery) -> Option<Page>;

struct RouteEntry {
    pattern: &'static str,
    build: PageBuilder,
}

/// Outcome of matching a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Path actually shown; differs from the request when it fell back
    pub path: String,
    pub pattern: &'static str,
    pub page: Page,
    pub layout: LayoutKind,
}

pub struct RouteTable {
    entries: Vec<RouteEntry>,
    layout: LayoutKind,
    default_path: &'static str,
}

fn param(params: &Params<'_>, name: &str) -> Option<u64> {
    params.get(name)?.parse().ok()
}

impl RouteTable {
    /// Routes enabled when the user is signed in.
    pub fn authenticated() -> Self {
        let entries: Vec<RouteEntry> = vec![
            RouteEntry { pattern: "/", build: |_, query| Some(Page::Logs { query }) },
            RouteEntry { pattern: "/callback", build: |_, _| Some(Page::Loader) },
            RouteEntry { pattern: "/logs", build: |_, query| Some(Page::Logs { query }) },
            RouteEntry {
                pattern: "/logs/create",
                build: |_, _| Some(Page::CreateLog { run_number: None }),
            },
            RouteEntry {
                pattern: "/logs/create/runs/:id",
                build: |p, _| Some(Page::CreateLog { run_number: Some(param(p, "id")?) }),
            },
            RouteEntry {
                pattern: "/logs/:id",
                build: |p, _| Some(Page::Log { log_id: param(p, "id")? }),
            },
            RouteEntry { pattern: "/runs", build: |_, query| Some(Page::Runs { query }) },
            RouteEntry {
                pattern: "/runs/:id",
                build: |p, _| Some(Page::Run { run_number: param(p, "id")? }),
            },
            RouteEntry { pattern: "/subsystems", build: |_, _| Some(Page::Subsystems) },
            RouteEntry { pattern: "/tokens", build: |_, _| Some(Page::Tokens) },
            RouteEntry {
                pattern: "/user/:userId",
                build: |p, _| Some(Page::Profile { user_id: param(p, "userId")? }),
            },
        ];
        Self {
            entries,
            layout: LayoutKind::Main,
            default_path: "/",
        }
    }

    /// Routes enabled when no session token is present.
    pub fn locked_out() -> Self {
        let entries: Vec<RouteEntry> = vec![
            RouteEntry { pattern: "/", build: |_, _| Some(Page::Login) },
            RouteEntry { pattern: "/callback", build: |_, _| Some(Page::Login) },
        ];
        Self {
            entries,
            layout: LayoutKind::Unauthorized,
            default_path: "/",
        }
    }

    pub fn for_session(session: SessionState) -> Self {
        match session {
            SessionState::Authenticated => Self::authenticated(),
            SessionState::LockedOut => Self::locked_out(),
        }
    }

    pub fn patterns(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.pattern).collect()
    }

    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// Match `path` (optionally with a query string); unknown paths fall back
    /// to the default route.
    pub fn resolve(&self, path: &str) -> ResolvedRoute {
        if let Some(resolved) = self.try_resolve(path) {
            return resolved;
        }
        tracing::debug!("No route for {}, falling back to {}", path, self.default_path);
        match self.try_resolve(self.default_path) {
            Some(resolved) => resolved,
            // Both tables define the default path
            None => ResolvedRoute {
                path: self.default_path.to_string(),
                pattern: self.default_path,
                page: Page::Login,
                layout: self.layout,
            },
        }
    }

    fn try_resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let (path, raw_query) = path.split_once('?').unwrap_or((path, ""));
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        self.entries.iter().find_map(|entry| {
            let params = match_pattern(entry.pattern, &segments)?;
            let page = (entry.build)(&params, ListQuery::from_query_str(raw_query))?;
            Some(ResolvedRoute {
                path: canonical_path(&segments, raw_query),
                pattern: entry.pattern,
                page,
                layout: self.layout,
            })
        })
    }
}

fn match_pattern<'a>(pattern: &'static str, segments: &[&'a str]) -> Option<Params<'a>> {
    let parts: Vec<&'static str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() != segments.len() {
        return None;
    }
    let mut params = Params::new();
    for (&part, &segment) in parts.iter().zip(segments) {
        match part.strip_prefix(':') {
            Some(name) => {
                params.insert(name, segment);
            }
            None if part == segment => {}
            None => return None,
        }
    }
    Some(params)
}

fn canonical_path(segments: &[&str], raw_query: &str) -> String {
    let path = format!("/{}", segments.join("/"));
    if raw_query.is_empty() {
        path
    } else {
        format!("{}?{}", path, raw_query)
    }
}
