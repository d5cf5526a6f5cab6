//! SearchLaunch: header search activation for a single-page clinical app.
//!
//! The header shows a compact search icon that opens into either an inline search
//! control (wide layouts) or a full-screen overlay (narrow layouts). This crate
//! owns the state machine behind that affordance and the small collaborators it
//! talks to, all without a UI runtime.
//!
//! # Modules
//!
//! - [`controller`]: Search activation state machine (`evaluate` → render decision + effects)
//! - [`session`]: Runtime that applies controller effects to the collaborators
//! - [`route`]: Route/query bridge, session storage, return URL slot
//! - [`layout`]: Viewport width → layout type and class
//! - [`outside`]: Outside-pointer detector with an armed flag
//! - [`preload`]: Fire-and-forget profile preloading
//! - [`form`]: Form workspace close/submit policy and modal delegation
//! - [`types`]: Shared types and [`LaunchConfig`](types::LaunchConfig)

pub mod controller;
pub mod form;
pub mod layout;
pub mod outside;
pub mod preload;
pub mod route;
pub mod session;
pub mod types;

use std::path::Path;

use tracing::{debug, warn};

use layout::Breakpoints;
use types::LaunchConfig;

pub const CONFIG_FILE_NAME: &str = ".searchlaunch.toml";

// ---------------------------------------------------------------------------
// .searchlaunch.toml config loading
// ---------------------------------------------------------------------------

/// Known keys in `.searchlaunch.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] = &[
    "spa_base",
    "rest_base_url",
    "search_segment",
    "query_param",
    "return_url_key",
    "default_destination",
    "restricted_role",
    "home_path",
    "breakpoints",
];

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Load configuration from `.searchlaunch.toml` in the given project root.
///
/// Missing or unparsable files yield defaults (the latter with a warning).
pub fn load_launch_config(project_root: &Path) -> LaunchConfig {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return LaunchConfig::default();
    }

    debug!(path = %config_path.display(), "Loading {CONFIG_FILE_NAME}");
    match std::fs::read_to_string(&config_path) {
        Ok(content) => parse_launch_config(&content),
        Err(e) => {
            warn!(path = %config_path.display(), error = %e, "Could not read config file");
            LaunchConfig::default()
        }
    }
}

/// Parse config text, merging overrides onto defaults.
/// Unknown keys trigger a warning with a typo suggestion.
pub fn parse_launch_config(content: &str) -> LaunchConfig {
    let mut config = LaunchConfig::default();

    let table = match content.parse::<toml::Table>() {
        Ok(t) => t,
        Err(e) => {
            warn!(error = %e, "Failed to parse {CONFIG_FILE_NAME}");
            return config;
        }
    };

    // Warn on unknown keys
    for key in table.keys() {
        if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
            continue;
        }
        let suggestion = KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k));
        match suggestion {
            Some(s) if edit_distance(key, s) <= 3 => {
                warn!(key = key.as_str(), suggestion = *s, "Unknown config key, did you mean '{s}'?");
            }
            _ => {
                warn!(
                    key = key.as_str(),
                    "Unknown config key (known keys: {})",
                    KNOWN_CONFIG_KEYS.join(", ")
                );
            }
        }
    }

    let get_str = |key: &str| table.get(key).and_then(|v| v.as_str()).map(|s| s.to_string());

    if let Some(v) = get_str("spa_base") {
        config.spa_base = v;
    }
    if let Some(v) = get_str("rest_base_url") {
        // default destination tracks the REST base unless set explicitly
        config.default_destination = format!("{}/", v.trim_end_matches('/'));
        config.rest_base_url = v;
    }
    if let Some(v) = get_str("search_segment") {
        config.search_segment = v;
    }
    if let Some(v) = get_str("query_param") {
        config.query_param = v;
    }
    if let Some(v) = get_str("return_url_key") {
        config.return_url_key = v;
    }
    if let Some(v) = get_str("default_destination") {
        config.default_destination = v;
    }
    if let Some(v) = get_str("restricted_role") {
        config.restricted_role = v.trim().to_lowercase();
    }
    if let Some(v) = get_str("home_path") {
        config.home_path = v;
    }

    // Partial [breakpoints] tables override individual edges
    if let Some(bp) = table.get("breakpoints").and_then(|v| v.as_table()) {
        let edge = |key: &str, fallback: u32| {
            bp.get(key)
                .and_then(|v| v.as_integer())
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(fallback)
        };
        let defaults = Breakpoints::default();
        config.breakpoints = Breakpoints {
            tablet_min: edge("tablet_min", defaults.tablet_min),
            small_desktop_min: edge("small_desktop_min", defaults.small_desktop_min),
            large_desktop_min: edge("large_desktop_min", defaults.large_desktop_min),
        };
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(parse_launch_config(""), LaunchConfig::default());
    }

    #[test]
    fn invalid_toml_falls_back_to_default() {
        assert_eq!(parse_launch_config("spa_base = ["), LaunchConfig::default());
    }

    #[test]
    fn overrides_merge_onto_defaults() {
        let config = parse_launch_config(
            r#"
            spa_base = "/emr/spa"
            restricted_role = "Kiosk"
            [breakpoints]
            small_desktop_min = 900
            "#,
        );
        assert_eq!(config.spa_base, "/emr/spa");
        assert_eq!(config.restricted_role, "kiosk");
        assert_eq!(config.search_segment, "search");
        assert_eq!(config.breakpoints.small_desktop_min, 900);
        assert_eq!(config.breakpoints.tablet_min, 600);
    }

    #[test]
    fn rest_base_moves_default_destination() {
        let config = parse_launch_config(r#"rest_base_url = "/api/v2""#);
        assert_eq!(config.default_destination, "/api/v2/");

        let config = parse_launch_config(
            r#"
            rest_base_url = "/api/v2"
            default_destination = "/home"
            "#,
        );
        assert_eq!(config.default_destination, "/home");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = parse_launch_config(r#"serch_segment = "find""#);
        assert_eq!(config.search_segment, "search");
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("serch_segment", "search_segment"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
    }

    #[test]
    fn load_from_project_root() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "query_param = \"q\"\n").unwrap();
        assert_eq!(load_launch_config(dir.path()).query_param, "q");
    }

    #[test]
    fn load_missing_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(load_launch_config(dir.path()), LaunchConfig::default());
    }
}
