//! Route/query bridge: parse the current location, derive the search route context,
//! and hold the session-scoped return URL.
//!
//! The bridge is expressed as two small traits, [`Navigator`] and [`SessionStore`],
//! so the controller never touches a browser API directly. [`MemoryRouter`] and
//! [`MemorySessionStore`] are the in-memory implementations used by the CLI and tests.

use std::cell::RefCell;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::types::{LaunchConfig, RouteContext};

/// Origin used to resolve path-only locations.
const LOCAL_ORIGIN: &str = "http://localhost";

// ---------------------------------------------------------------------------
// Route snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSnapshot {
    location: String,
    page: Option<String>,
    query: Vec<(String, String)>,
}

impl RouteSnapshot {
    /// Parse a location (`/openmrs/spa/search?query=jo`) relative to the SPA base.
    ///
    /// The page is the first path segment after `spa_base`. A location outside
    /// the SPA base has no page.
    pub fn parse(location: &str, spa_base: &str) -> Result<Self, String> {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            return Err("empty location".to_string());
        }
        let origin = Url::parse(LOCAL_ORIGIN).map_err(|e| e.to_string())?;
        let url = origin
            .join(trimmed)
            .map_err(|e| format!("invalid location '{trimmed}': {e}"))?;

        let path_segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();
        let base_segments: Vec<&str> = spa_base.split('/').filter(|s| !s.is_empty()).collect();

        let page = if path_segments.starts_with(&base_segments) {
            path_segments.get(base_segments.len()).map(|s| s.to_string())
        } else {
            None
        };

        let query = url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();

        let location = match url.query() {
            Some(q) => format!("{}?{q}", url.path()),
            None => url.path().to_string(),
        };

        Ok(RouteSnapshot { location, page, query })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    /// First value for `key`.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Derive the route facts the controller reads on every evaluation.
pub fn route_context(snapshot: &RouteSnapshot, config: &LaunchConfig) -> RouteContext {
    let is_search_route = snapshot.page() == Some(config.search_segment.as_str());
    let initial_query = if is_search_route {
        snapshot.query(&config.query_param).unwrap_or_default().to_string()
    } else {
        String::new()
    };
    RouteContext { is_search_route, initial_query }
}

// ---------------------------------------------------------------------------
// Session storage and the return URL slot
// ---------------------------------------------------------------------------

/// Session-scoped string storage.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory session storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// The single return-URL cell. The controller only reads and clears it;
/// [`enter_search_route`] is the only writer.
pub struct ReturnUrlSlot<'a> {
    store: &'a dyn SessionStore,
    key: &'a str,
}

impl<'a> ReturnUrlSlot<'a> {
    pub fn new(store: &'a dyn SessionStore, key: &'a str) -> Self {
        Self { store, key }
    }

    pub fn key(&self) -> &str {
        self.key
    }

    /// Stored value; empty strings count as absent.
    pub fn read(&self) -> Option<String> {
        self.store.get(self.key).filter(|v| !v.is_empty())
    }

    pub fn clear(&self) {
        self.store.remove(self.key);
    }

    pub fn remember(&self, url: &str) {
        self.store.set(self.key, url);
    }
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

pub trait Navigator {
    fn navigate(&self, to: &str);
}

/// In-memory router: current location plus the list of navigations performed.
#[derive(Debug)]
pub struct MemoryRouter {
    spa_base: String,
    location: RefCell<String>,
    history: RefCell<Vec<String>>,
}

impl MemoryRouter {
    pub fn new(spa_base: &str, location: &str) -> Self {
        Self {
            spa_base: spa_base.to_string(),
            location: RefCell::new(location.to_string()),
            history: RefCell::new(Vec::new()),
        }
    }

    pub fn location(&self) -> String {
        self.location.borrow().clone()
    }

    /// Navigations performed through [`Navigator::navigate`], oldest first.
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    pub fn snapshot(&self) -> Result<RouteSnapshot, String> {
        RouteSnapshot::parse(&self.location.borrow(), &self.spa_base)
    }

    /// Move to `location` without recording a navigation (address-bar entry).
    pub fn visit(&self, location: &str) {
        *self.location.borrow_mut() = location.to_string();
    }
}

impl Navigator for MemoryRouter {
    fn navigate(&self, to: &str) {
        info!(to, "Navigate");
        *self.location.borrow_mut() = to.to_string();
        self.history.borrow_mut().push(to.to_string());
    }
}

/// Navigation-entry collaborator: remember where the user was, then go to the
/// dedicated search route for `term`.
///
/// The return URL is not overwritten when already on the search route, so a
/// refined search still returns to the original page.
pub fn enter_search_route(
    store: &dyn SessionStore,
    navigator: &dyn Navigator,
    config: &LaunchConfig,
    current: &RouteSnapshot,
    term: &str,
) {
    let slot = ReturnUrlSlot::new(store, &config.return_url_key);
    if route_context(current, config).is_search_route {
        debug!("Already on search route, keeping return URL");
    } else {
        slot.remember(current.location());
    }
    navigator.navigate(&config.search_location(term.trim()));
}
