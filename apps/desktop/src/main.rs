//! SearchLaunch Desktop: Dioxus-powered clinical app header.

use std::sync::Mutex;

use dioxus::prelude::*;

mod app;
mod search;
mod sidebar;
mod state;
mod workspace;

use app::App;
use searchlaunch_core::types::LaunchConfig;

/// Pre-runtime storage, loaded before Dioxus launches, consumed on first render.
pub static INITIAL_CONFIG: Mutex<Option<LaunchConfig>> = Mutex::new(None);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("searchlaunch=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let config = match std::env::current_dir() {
        Ok(cwd) => searchlaunch_core::load_launch_config(&cwd),
        Err(_) => LaunchConfig::default(),
    };
    if let Ok(mut slot) = INITIAL_CONFIG.lock() {
        *slot = Some(config);
    }

    #[cfg(feature = "desktop")]
    {
        use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

        LaunchBuilder::new()
            .with_cfg(
                Config::default()
                    .with_menu(None)
                    .with_background_color((22, 22, 22, 255))
                    .with_disable_context_menu(true)
                    .with_window(
                        WindowBuilder::new()
                            .with_title("SearchLaunch")
                            .with_inner_size(LogicalSize::new(1400.0, 900.0))
                            .with_min_inner_size(LogicalSize::new(360.0, 500.0))
                            .with_resizable(true)
                            .with_decorations(true),
                    ),
            )
            .launch(App);
    }

    #[cfg(not(feature = "desktop"))]
    {
        dioxus::launch(App);
    }
}
