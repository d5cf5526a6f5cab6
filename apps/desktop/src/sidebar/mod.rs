//! Side strip with page navigation, the forms toggle and the persona switcher.

mod activity_bar;

pub use activity_bar::ActivityBar;
