// Router: maps navigation paths to views and keeps a history stack so the
// front end can go back, the way history-mode navigation does in a browser.
// Paths may carry `:param` segments and a query string.

use percent_encoding::percent_decode_str;
use reqwest::Url;
use std::collections::HashMap;

const ORIGIN: &str = "http://localhost/";

/// Screens the front end can show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Projects,
    Project,
    Video,
    Crawler,
}

#[derive(Clone, Debug)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
}

/// Routing table of the front end.
pub fn routes() -> Vec<Route> {
    vec![
        Route { path: "/", name: "projects", view: View::Projects },
        Route { path: "/project/:project", name: "project", view: View::Project },
        Route { path: "/video", name: "video", view: View::Video },
        Route { path: "/crawler", name: "crawler", view: View::Crawler },
    ]
}

/// A resolved navigation target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub view: View,
    pub name: &'static str,
    /// Path relative to the router base, including the query.
    pub path: String,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
}

impl Location {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

pub struct Router {
    base: String,
    routes: Vec<Route>,
    history: Vec<Location>,
}

impl Router {
    pub fn new(base: &str, routes: Vec<Route>) -> Self {
        let trimmed = base.trim_matches('/');
        let base = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };
        Router {
            base,
            routes,
            history: Vec::new(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Full path of `path` under the base.
    pub fn href(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    /// Match `path` against the routing table. Both base-relative paths and
    /// full paths starting with the base are accepted.
    pub fn resolve(&self, path: &str) -> Option<Location> {
        let relative = match path.strip_prefix(self.base.as_str()) {
            Some(rest) if self.base != "/" => rest,
            _ => path.trim_start_matches('/'),
        };
        let url = Url::parse(ORIGIN)
            .and_then(|root| root.join(relative))
            .ok()?;

        let segments: Vec<&str> = url
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let query: HashMap<String, String> = url.query_pairs().into_owned().collect();

        self.routes.iter().find_map(|route| {
            let params = match_pattern(route.path, &segments)?;
            Some(Location {
                view: route.view,
                name: route.name,
                path: relative_path(&url),
                params,
                query: query.clone(),
            })
        })
    }

    /// Navigate to `path`. Unknown paths leave the history untouched.
    pub fn push(&mut self, path: &str) -> Option<&Location> {
        let location = self.resolve(path)?;
        tracing::debug!(path = %location.path, view = ?location.view, "navigate");
        self.history.push(location);
        self.history.last()
    }

    /// Return to the previous location. The first entry is never popped.
    pub fn back(&mut self) -> Option<&Location> {
        if self.history.len() > 1 {
            self.history.pop();
        }
        self.history.last()
    }

    pub fn current(&self) -> Option<&Location> {
        self.history.last()
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

/// Path of the project view, with `project` encoded as a single segment.
pub fn project_link(project: &str) -> Option<String> {
    let mut url = Url::parse(ORIGIN).ok()?;
    url.path_segments_mut().ok()?.clear().push("project").push(project);
    Some(relative_path(&url))
}

/// `path` with an encoded query string. An empty `query` adds nothing.
pub fn query_link(path: &str, query: &[(&str, &str)]) -> Option<String> {
    let mut url = Url::parse(ORIGIN).ok()?.join(path).ok()?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Some(relative_path(&url))
}

fn relative_path(url: &Url) -> String {
    match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    }
}

// Segments of the pattern starting with ':' capture the percent-decoded
// segment. `+` and `&` are literal in a path.
fn match_pattern(pattern: &str, segments: &[&str]) -> Option<HashMap<String, String>> {
    let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if parts.len() != segments.len() {
        return None;
    }
    let mut params = HashMap::new();
    for (part, segment) in parts.iter().zip(segments) {
        if let Some(name) = part.strip_prefix(':') {
            params.insert(name.to_string(), decode_segment(segment));
        } else if part != segment {
            return None;
        }
    }
    Some(params)
}

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
