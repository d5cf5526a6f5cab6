//! SearchLaunch CLI: drive the header search controller from the terminal.
//!
//! Calls `searchlaunch-core` directly with in-memory routing and session storage.

mod scenario;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

use searchlaunch_core::form::{FormWorkspace, FormWorkspaceProps, RestrictedRoleRedirect};
use searchlaunch_core::layout::LayoutType;
use searchlaunch_core::load_launch_config;
use searchlaunch_core::route::{route_context, RouteSnapshot};
use searchlaunch_core::types::{LaunchConfig, UserContext};

/// SearchLaunch CLI: replay and inspect header search behavior.
#[derive(Parser)]
#[command(name = "slaunch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Project root holding .searchlaunch.toml (default: current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scripted scenario file
    Replay {
        /// Scenario TOML file
        file: PathBuf,
    },
    /// Show the route context derived from a location
    Route {
        /// Location, e.g. /openmrs/spa/search?query=john
        location: String,
    },
    /// Classify a viewport width
    Classify {
        /// Width in CSS pixels
        width: u32,
    },
    /// Print the effective configuration
    Config,
    /// Print form workspace effects for a lifecycle event
    Form {
        #[arg(value_enum)]
        event: FormEvent,

        /// Role display names of the acting user (repeatable)
        #[arg(long = "role")]
        roles: Vec<String>,

        /// Existing encounter being edited
        #[arg(long)]
        encounter: Option<String>,

        /// Reopen the clinical forms workspace after closing a new form
        #[arg(long)]
        reopen_forms: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormEvent {
    Close,
    Submit,
}

fn resolve_config(root: Option<PathBuf>) -> LaunchConfig {
    match root.or_else(|| std::env::current_dir().ok()) {
        Some(root) => load_launch_config(&root),
        None => LaunchConfig::default(),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => fail(&e.to_string()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("searchlaunch=warn".parse().unwrap()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.root);

    match cli.command {
        Commands::Replay { file } => {
            let content = std::fs::read_to_string(&file)
                .unwrap_or_else(|e| fail(&format!("could not read {}: {e}", file.display())));
            let scenario = scenario::parse_scenario(&content).unwrap_or_else(|e| fail(&e));
            let report = scenario::run_scenario(&scenario, &config).unwrap_or_else(|e| fail(&e));

            if cli.json {
                print_json(&report);
            } else {
                for s in &report.steps {
                    let view = match s.render.view.variant() {
                        Some(v) => format!("{v:?}"),
                        None => "Icon".to_string(),
                    };
                    println!(
                        "{:>3}  {:<28} {:<14} {:<14} armed={:<5} {}",
                        s.index,
                        format!("{:?}", s.step),
                        view,
                        s.layout,
                        s.render.outside_close_armed,
                        s.location
                    );
                }
                eprintln!(
                    "\n{} navigations, {} preloads",
                    report.navigations.len(),
                    report.preloaded.len()
                );
            }
        }
        Commands::Route { location } => {
            let snapshot =
                RouteSnapshot::parse(&location, &config.spa_base).unwrap_or_else(|e| fail(&e));
            let ctx = route_context(&snapshot, &config);
            if cli.json {
                print_json(&serde_json::json!({
                    "location": snapshot.location(),
                    "page": snapshot.page(),
                    "is_search_route": ctx.is_search_route,
                    "initial_query": ctx.initial_query,
                }));
            } else {
                println!("location:        {}", snapshot.location());
                println!("page:            {}", snapshot.page().unwrap_or("-"));
                println!("search route:    {}", ctx.is_search_route);
                println!("initial query:   {:?}", ctx.initial_query);
            }
        }
        Commands::Classify { width } => {
            let layout = LayoutType::from_width(width, &config.breakpoints);
            if cli.json {
                print_json(&serde_json::json!({
                    "width": width,
                    "layout": layout,
                    "class": layout.class(),
                }));
            } else {
                println!("{width}px  {}  {:?}", layout.as_str(), layout.class());
            }
        }
        Commands::Config => {
            if cli.json {
                print_json(&config);
            } else {
                match toml::to_string_pretty(&config) {
                    Ok(s) => print!("{s}"),
                    Err(e) => fail(&e.to_string()),
                }
            }
        }
        Commands::Form { event, roles, encounter, reopen_forms } => {
            let mut props = FormWorkspaceProps::new("cli-form", "cli-patient");
            props.encounter_uuid = encounter;
            props.additional_props.insert(
                "openClinicalFormsWorkspaceOnFormClose".to_string(),
                serde_json::Value::Bool(reopen_forms),
            );
            let workspace = FormWorkspace::new(props, RestrictedRoleRedirect::from_config(&config));
            let user = UserContext::new(Some("cli-user"), &roles);

            let effects = match event {
                FormEvent::Close => workspace.on_close(),
                FormEvent::Submit => workspace.on_submit(&user),
            };
            if cli.json {
                print_json(&effects);
            } else {
                for effect in &effects {
                    println!("{effect:?}");
                }
            }
        }
    }
}
