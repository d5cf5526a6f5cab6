//! Scripted header search scenarios.
//!
//! A scenario starts at a location with a user and a viewport width, then runs a
//! list of steps. Every step is followed by a render pass, the same way the header
//! re-renders after each event.
//!
//! ```toml
//! start = "/openmrs/spa/patient/1/chart"
//! width = 1280
//! user = { id = "u1", roles = ["Clinician"] }
//!
//! [[step]]
//! action = "icon"
//!
//! [[step]]
//! action = "enter_search"
//! term = "smith"
//! ```

use serde::{Deserialize, Serialize};

use searchlaunch_core::layout::LayoutType;
use searchlaunch_core::outside::{DomHit, PointerEvent};
use searchlaunch_core::preload::WarmCache;
use searchlaunch_core::route::{MemoryRouter, MemorySessionStore, SessionStore};
use searchlaunch_core::session::HeaderSearchSession;
use searchlaunch_core::types::{LaunchConfig, RenderDecision, UserContext};

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub start: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default)]
    pub user: UserSpec,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_width() -> u32 {
    1280
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UserSpec {
    pub id: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserSpec {
    fn context(&self) -> UserContext {
        UserContext::new(self.id.as_deref(), &self.roles)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Re-render with unchanged inputs.
    Render,
    /// Address-bar route change.
    Navigate { to: String },
    Layout { width: u32 },
    User(UserSpec),
    Icon,
    Open,
    Close,
    Outside {
        #[serde(default)]
        inside: bool,
    },
    CompactSelect,
    EnterSearch { term: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub step: Step,
    pub layout: &'static str,
    pub render: RenderDecision,
    pub location: String,
    pub return_url: Option<String>,
    pub dismissed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub steps: Vec<StepReport>,
    pub navigations: Vec<String>,
    pub preloaded: Vec<String>,
}

type ScenarioSession = HeaderSearchSession<MemorySessionStore, MemoryRouter, WarmCache>;

pub fn parse_scenario(content: &str) -> Result<Scenario, String> {
    toml::from_str(content).map_err(|e| format!("invalid scenario: {e}"))
}

/// Run a scenario against in-memory collaborators.
pub fn run_scenario(scenario: &Scenario, config: &LaunchConfig) -> Result<Report, String> {
    let router = MemoryRouter::new(&config.spa_base, &scenario.start);
    let store = MemorySessionStore::new();
    let cache = WarmCache::new();
    let mut session = HeaderSearchSession::new(config.clone(), store.clone(), router, cache.clone());

    let mut user = scenario.user.context();
    let mut width = scenario.width;
    let mut steps = Vec::with_capacity(scenario.steps.len() + 1);

    let (render, layout) = render_pass(&mut session, config, &user, width)?;
    steps.push(StepReport {
        index: 0,
        step: Step::Render,
        layout: layout.as_str(),
        render,
        location: session.navigator().location(),
        return_url: store.get(&config.return_url_key),
        dismissed: false,
    });

    for (i, step) in scenario.steps.iter().enumerate() {
        let mut dismissed = false;
        match step {
            Step::Render => {}
            Step::Navigate { to } => session.navigator().visit(to),
            Step::Layout { width: w } => width = *w,
            Step::User(spec) => user = spec.context(),
            Step::Icon => {
                session.icon_clicked();
            }
            Step::Open => {
                session.open();
            }
            Step::Close => {
                session.close();
            }
            Step::Outside { inside } => {
                let event = PointerEvent::mouse(i as u64 + 1, 0.0, 0.0);
                dismissed = session.pointer_down(&event, &DomHit(*inside));
            }
            Step::CompactSelect => {
                session.compact_selected();
            }
            Step::EnterSearch { term } => {
                let snapshot = session.navigator().snapshot()?;
                session.enter_search(&snapshot, term);
            }
        }

        let (render, layout) = render_pass(&mut session, config, &user, width)?;
        steps.push(StepReport {
            index: i + 1,
            step: step.clone(),
            layout: layout.as_str(),
            render,
            location: session.navigator().location(),
            return_url: store.get(&config.return_url_key),
            dismissed,
        });
    }

    Ok(Report {
        steps,
        navigations: session.navigator().history(),
        preloaded: cache.keys(),
    })
}

fn render_pass(
    session: &mut ScenarioSession,
    config: &LaunchConfig,
    user: &UserContext,
    width: u32,
) -> Result<(RenderDecision, LayoutType), String> {
    let layout = LayoutType::from_width(width, &config.breakpoints);
    let snapshot = session.navigator().snapshot()?;
    Ok((session.evaluate(&snapshot, user, layout.class()), layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use searchlaunch_core::types::HeaderView;

    const ROUND_TRIP: &str = r#"
start = "/openmrs/spa/patient/1/chart"
width = 1280
user = { id = "u1", roles = ["Clinician"] }

[[step]]
action = "icon"

[[step]]
action = "enter_search"
term = "smith"

[[step]]
action = "outside"

[[step]]
action = "close"
"#;

    #[test]
    fn parses_steps() {
        let s = parse_scenario(ROUND_TRIP).unwrap();
        assert_eq!(s.steps.len(), 4);
        assert_eq!(s.steps[1], Step::EnterSearch { term: "smith".into() });
        assert_eq!(s.steps[2], Step::Outside { inside: false });
    }

    #[test]
    fn round_trip_report() {
        let s = parse_scenario(ROUND_TRIP).unwrap();
        let report = run_scenario(&s, &LaunchConfig::default()).unwrap();

        assert_eq!(report.steps.len(), 5);
        assert!(report.steps[1].render.view.variant().is_some());
        assert_eq!(report.steps[2].location, "/openmrs/spa/search?query=smith");
        // on the search route outside clicks are ignored
        assert!(!report.steps[3].dismissed);
        assert_eq!(report.steps[4].location, "/openmrs/spa/patient/1/chart");
        assert_eq!(report.steps[4].return_url, None);
        assert_eq!(
            report.navigations,
            vec![
                "/openmrs/spa/search?query=smith".to_string(),
                "/openmrs/spa/patient/1/chart".to_string(),
            ]
        );
        assert_eq!(report.preloaded, vec!["/ws/rest/v1/user/u1".to_string()]);
    }

    #[test]
    fn narrow_width_renders_overlay() {
        let s = parse_scenario(
            r#"
start = "/openmrs/spa/search?query=a"
width = 400
"#,
        )
        .unwrap();
        let report = run_scenario(&s, &LaunchConfig::default()).unwrap();
        assert_eq!(report.steps[0].layout, "phone");
        assert!(matches!(report.steps[0].render.view, HeaderView::Overlay(_)));
    }

    #[test]
    fn unknown_action_is_error() {
        let err = parse_scenario("start = \"/\"\n[[step]]\naction = \"explode\"\n").unwrap_err();
        assert!(err.starts_with("invalid scenario"), "{err}");
    }

    #[test]
    fn bad_start_location_is_error() {
        let s = parse_scenario("start = \"\"").unwrap();
        assert!(run_scenario(&s, &LaunchConfig::default()).is_err());
    }
}
