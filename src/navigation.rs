pub const NAVBAR_SELECTOR: &str = ".navbar";
pub const TOGGLE_SELECTOR: &str = ".burger";
pub const MENU_SELECTOR: &str = ".nav-links";
pub const MENU_LINK_SELECTOR: &str = ".nav-link";
pub const IN_PAGE_ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";
pub const ACTIVE_CLASS: &str = "active";

const SCROLL_LOCKED_OVERFLOW: &str = "hidden";
const SCROLL_RESTORED_OVERFLOW: &str = "";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum NavMenu {
    #[default]
    Closed,
    Open,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavEvent {
    ToggleActivated,
    LinkActivated,
    PointerDown { inside_navbar: bool },
}

/// What the DOM should show for a menu state: `active` on the toggle and the
/// menu, plus the body's `overflow` value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NavPresentation {
    pub active: bool,
    pub body_overflow: &'static str,
}

impl NavMenu {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn apply(self, event: NavEvent) -> Self {
        match event {
            NavEvent::ToggleActivated => match self {
                Self::Closed => Self::Open,
                Self::Open => Self::Closed,
            },
            NavEvent::LinkActivated => Self::Closed,
            NavEvent::PointerDown { inside_navbar: true } => self,
            NavEvent::PointerDown { inside_navbar: false } => Self::Closed,
        }
    }

    pub fn presentation(self) -> NavPresentation {
        NavPresentation {
            active: self.is_open(),
            body_overflow: if self.is_open() {
                SCROLL_LOCKED_OVERFLOW
            } else {
                SCROLL_RESTORED_OVERFLOW
            },
        }
    }
}

/// Returns the element id an in-page href points at. `#` alone and hrefs
/// that are not fragments have no target.
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Document offset to scroll to so the target starts just below the fixed
/// navigation bar.
pub fn scroll_target_top(target_offset_top: f64, navbar_height: f64) -> f64 {
    target_offset_top - navbar_height
}
