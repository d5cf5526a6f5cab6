//! Layout classification from viewport width.

use serde::Serialize;

use crate::types::LayoutClass;

/// Minimum widths (in CSS pixels) at which each layout begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakpoints {
    pub tablet_min: u32,
    pub small_desktop_min: u32,
    pub large_desktop_min: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            tablet_min: 600,
            small_desktop_min: 1024,
            large_desktop_min: 1440,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutType {
    Phone,
    Tablet,
    SmallDesktop,
    LargeDesktop,
}

impl LayoutType {
    pub fn from_width(width: u32, bp: &Breakpoints) -> Self {
        if width >= bp.large_desktop_min {
            LayoutType::LargeDesktop
        } else if width >= bp.small_desktop_min {
            LayoutType::SmallDesktop
        } else if width >= bp.tablet_min {
            LayoutType::Tablet
        } else {
            LayoutType::Phone
        }
    }

    pub fn is_desktop(self) -> bool {
        matches!(self, LayoutType::SmallDesktop | LayoutType::LargeDesktop)
    }

    pub fn class(self) -> LayoutClass {
        if self.is_desktop() {
            LayoutClass::Wide
        } else {
            LayoutClass::Narrow
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutType::Phone => "phone",
            LayoutType::Tablet => "tablet",
            LayoutType::SmallDesktop => "small-desktop",
            LayoutType::LargeDesktop => "large-desktop",
        }
    }
}

/// Classify a viewport width. Pure; safe to call on every render.
pub fn classify(width: u32, bp: &Breakpoints) -> LayoutClass {
    LayoutType::from_width(width, bp).class()
}
