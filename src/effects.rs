use crate::timers::{TimerId, Timers};

pub const BUTTON_SELECTOR: &str = ".btn";
pub const CARD_SELECTOR: &str = ".project-card";
pub const RIPPLE_CLASS: &str = "ripple";

pub const NEUTRAL_TILT_TRANSFORM: &str = "perspective(1000px) rotateX(0) rotateY(0) translateY(0)";
const TILT_PERSPECTIVE_PX: u32 = 1_000;
const TILT_LIFT_PX: i32 = -8;

/// Client-space rectangle of an element, as reported by
/// `getBoundingClientRect`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RippleGeometry {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

impl RippleGeometry {
    /// Circle as large as the button's longer side, centred on the click.
    pub fn from_click(button: Rect, client_x: f64, client_y: f64) -> Self {
        let size = button.width.max(button.height);
        Self {
            size,
            left: client_x - button.left - size / 2.0,
            top: client_y - button.top - size / 2.0,
        }
    }

    pub fn style_properties(&self) -> [(&'static str, String); 4] {
        [
            ("width", format!("{}px", self.size)),
            ("height", format!("{}px", self.size)),
            ("left", format!("{}px", self.left)),
            ("top", format!("{}px", self.top)),
        ]
    }
}

/// Schedules removal of one ripple on its own timer.
pub fn schedule_ripple_removal<T: Timers>(
    timers: &T,
    duration_ms: u32,
    remove: impl FnOnce() + 'static,
) -> TimerId {
    timers.set_timeout(duration_ms, Box::new(remove))
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    pub fn from_pointer(card: Rect, client_x: f64, client_y: f64, divisor: f64) -> Self {
        let x = client_x - card.left;
        let y = client_y - card.top;
        let center_x = card.width / 2.0;
        let center_y = card.height / 2.0;

        Self {
            rotate_x: (y - center_y) / divisor,
            rotate_y: (center_x - x) / divisor,
        }
    }

    pub fn transform(&self) -> String {
        format!(
            "perspective({TILT_PERSPECTIVE_PX}px) rotateX({}deg) rotateY({}deg) translateY({TILT_LIFT_PX}px)",
            self.rotate_x, self.rotate_y
        )
    }
}
