//! Opportunistic profile preloading.
//!
//! Preloads are fire-and-forget: nothing the controller does depends on their
//! outcome, and failures are dropped where they happen.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

/// Cache warmer for a resource key.
pub trait Preloader {
    fn preload(&self, resource_key: &str);
}

impl<F> Preloader for F
where
    F: Fn(&str),
{
    fn preload(&self, resource_key: &str) {
        self(resource_key)
    }
}

/// Resource key of a user's profile under the REST base.
pub fn profile_resource_key(rest_base_url: &str, user_id: &str) -> String {
    format!("{}/user/{user_id}", rest_base_url.trim_end_matches('/'))
}

/// Emits a preload only when the user id changes to a non-empty value.
#[derive(Debug, Default)]
pub struct PreloadGate {
    last_id: Option<String>,
}

impl PreloadGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` and return it if a preload should be issued for it.
    pub fn observe(&mut self, id: Option<&str>) -> Option<String> {
        let id = id.filter(|s| !s.is_empty());
        if self.last_id.as_deref() == id {
            return None;
        }
        self.last_id = id.map(str::to_string);
        self.last_id.clone()
    }
}

/// Shared record of warmed resource keys and how often each was requested.
#[derive(Debug, Clone, Default)]
pub struct WarmCache {
    entries: Arc<DashMap<String, usize>>,
}

impl WarmCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_warm(&self, resource_key: &str) -> bool {
        self.entries.contains_key(resource_key)
    }

    pub fn requests(&self, resource_key: &str) -> usize {
        self.entries.get(resource_key).map(|e| *e).unwrap_or(0)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl Preloader for WarmCache {
    fn preload(&self, resource_key: &str) {
        debug!(key = resource_key, "Warming profile cache");
        *self.entries.entry(resource_key.to_string()).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_key() {
        assert_eq!(profile_resource_key("/ws/rest/v1", "abc"), "/ws/rest/v1/user/abc");
        assert_eq!(profile_resource_key("/ws/rest/v1/", "abc"), "/ws/rest/v1/user/abc");
    }

    #[test]
    fn gate_fires_once_per_id() {
        let mut gate = PreloadGate::new();
        assert_eq!(gate.observe(None), None);
        assert_eq!(gate.observe(Some("u1")), Some("u1".to_string()));
        assert_eq!(gate.observe(Some("u1")), None);
        assert_eq!(gate.observe(Some("u2")), Some("u2".to_string()));
    }

    #[test]
    fn gate_refires_after_logout_and_back() {
        let mut gate = PreloadGate::new();
        assert!(gate.observe(Some("u1")).is_some());
        assert!(gate.observe(None).is_none());
        assert_eq!(gate.observe(Some("u1")), Some("u1".to_string()));
    }

    #[test]
    fn empty_id_is_absent() {
        let mut gate = PreloadGate::new();
        assert_eq!(gate.observe(Some("")), None);
        assert_eq!(gate.observe(None), None);
    }

    #[test]
    fn warm_cache_counts_requests() {
        let cache = WarmCache::new();
        let shared = cache.clone();
        cache.preload("/ws/rest/v1/user/u1");
        shared.preload("/ws/rest/v1/user/u1");
        assert!(cache.is_warm("/ws/rest/v1/user/u1"));
        assert_eq!(cache.requests("/ws/rest/v1/user/u1"), 2);
        assert_eq!(cache.requests("/ws/rest/v1/user/u2"), 0);
    }

    #[test]
    fn closures_are_preloaders() {
        let seen = std::cell::RefCell::new(Vec::new());
        let p = |key: &str| seen.borrow_mut().push(key.to_string());
        p.preload("k");
        assert_eq!(*seen.borrow(), vec!["k".to_string()]);
    }
}
