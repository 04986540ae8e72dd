use crate::config::EnhanceConfig;

pub const SECTION_SELECTOR: &str = "section";
pub const PROGRESS_BAR_SELECTOR: &str = ".progress-bar";
pub const BACK_TO_TOP_SELECTOR: &str = ".back-to-top";
pub const VISIBLE_CLASS: &str = "visible";

const RAISED_NAVBAR_SHADOW: &str = "0 4px 20px rgba(0, 0, 0, 0.1)";
const RESTING_NAVBAR_SHADOW: &str = "0 1px 2px 0 rgba(0, 0, 0, 0.05)";

/// Coalesces scroll events into at most one pending animation-frame update.
#[derive(Debug, Default)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    /// Returns true when the caller should schedule a frame; false while one
    /// is already pending, in which case the event is dropped.
    pub fn try_begin(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    pub fn finish(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

#[derive(Clone, PartialEq, Debug)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBox {
    fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavbarShadow {
    Resting,
    Raised,
}

impl NavbarShadow {
    pub fn box_shadow(self) -> &'static str {
        match self {
            Self::Resting => RESTING_NAVBAR_SHADOW,
            Self::Raised => RAISED_NAVBAR_SHADOW,
        }
    }
}

/// Everything one frame writes back to the page, in application order.
#[derive(Clone, PartialEq, Debug)]
pub struct ScrollFrame {
    pub active_section: Option<usize>,
    pub progress_percent: Option<f64>,
    pub back_to_top_visible: bool,
    pub navbar_shadow: NavbarShadow,
}

pub fn project_frame(
    metrics: ScrollMetrics,
    sections: &[SectionBox],
    config: &EnhanceConfig,
) -> ScrollFrame {
    ScrollFrame {
        active_section: active_section(sections, metrics.scroll_y, f64::from(config.look_ahead_px)),
        progress_percent: progress_percent(metrics),
        back_to_top_visible: back_to_top_visible(
            metrics.scroll_y,
            f64::from(config.back_to_top_threshold_px),
        ),
        navbar_shadow: navbar_shadow(metrics.scroll_y, f64::from(config.navbar_shadow_threshold_px)),
    }
}

/// Index of the section containing `scroll_y + look_ahead`. When ranges
/// overlap the last one in document order wins.
pub fn active_section(sections: &[SectionBox], scroll_y: f64, look_ahead: f64) -> Option<usize> {
    let probe = scroll_y + look_ahead;
    sections
        .iter()
        .enumerate()
        .filter(|(_, section)| section.contains(probe))
        .map(|(index, _)| index)
        .last()
}

/// Nav link href that corresponds to a section id.
pub fn section_href(section_id: &str) -> String {
    format!("#{section_id}")
}

/// Scrolled share of the scrollable height, or `None` when the page cannot
/// scroll and the ratio is undefined.
pub fn progress_percent(metrics: ScrollMetrics) -> Option<f64> {
    let scrollable = metrics.document_height - metrics.viewport_height;
    if scrollable <= 0.0 {
        return None;
    }
    Some(metrics.scroll_y / scrollable * 100.0)
}

pub fn progress_width(percent: f64) -> String {
    format!("{percent}%")
}

pub fn back_to_top_visible(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

pub fn navbar_shadow(scroll_y: f64, threshold: f64) -> NavbarShadow {
    if scroll_y > threshold {
        NavbarShadow::Raised
    } else {
        NavbarShadow::Resting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<SectionBox> {
        vec![
            SectionBox { id: "hero".to_string(), top: 0.0, height: 600.0 },
            SectionBox { id: "about".to_string(), top: 600.0, height: 800.0 },
            SectionBox { id: "projects".to_string(), top: 1_400.0, height: 1_000.0 },
            SectionBox { id: "contact".to_string(), top: 2_400.0, height: 500.0 },
        ]
    }

    fn metrics(scroll_y: f64) -> ScrollMetrics {
        ScrollMetrics { scroll_y, viewport_height: 900.0, document_height: 2_900.0 }
    }

    #[test]
    fn gate_drops_events_while_a_frame_is_pending() {
        let mut gate = FrameGate::default();
        let scheduled = (0..5).filter(|_| gate.try_begin()).count();
        assert_eq!(scheduled, 1);
        assert!(gate.is_pending());

        gate.finish();
        assert!(gate.try_begin());
    }

    #[test]
    fn active_section_uses_look_ahead_offset() {
        let sections = sections();
        assert_eq!(active_section(&sections, 0.0, 200.0), Some(0));
        assert_eq!(active_section(&sections, 399.0, 200.0), Some(0));
        assert_eq!(active_section(&sections, 400.0, 200.0), Some(1));
        assert_eq!(active_section(&sections, 2_200.0, 200.0), Some(3));
    }

    #[test]
    fn exactly_one_section_matches_across_the_page() {
        let sections = sections();
        let mut position = 0.0;
        while position < 2_700.0 {
            let probe = position + 200.0;
            let expected: Vec<usize> = sections
                .iter()
                .enumerate()
                .filter(|(_, section)| probe >= section.top && probe < section.top + section.height)
                .map(|(index, _)| index)
                .collect();
            assert_eq!(expected.len(), 1);
            assert_eq!(active_section(&sections, position, 200.0), expected.last().copied());
            position += 37.0;
        }
    }

    #[test]
    fn overlapping_sections_resolve_to_the_last_in_document_order() {
        let sections = vec![
            SectionBox { id: "outer".to_string(), top: 0.0, height: 1_000.0 },
            SectionBox { id: "inner".to_string(), top: 100.0, height: 200.0 },
        ];
        assert_eq!(active_section(&sections, 0.0, 200.0), Some(1));
        assert_eq!(active_section(&sections, 200.0, 200.0), Some(0));
    }

    #[test]
    fn probe_past_every_section_leaves_nav_unchanged() {
        assert_eq!(active_section(&sections(), 5_000.0, 200.0), None);
        assert_eq!(section_href("about"), "#about");
    }

    #[test]
    fn progress_is_monotonic_and_reaches_full_width() {
        let mut previous = -1.0;
        let mut scroll_y = 0.0;
        while scroll_y <= 2_000.0 {
            let percent = progress_percent(metrics(scroll_y)).expect("page is scrollable");
            assert!(percent >= previous);
            previous = percent;
            scroll_y += 50.0;
        }
        assert_eq!(progress_percent(metrics(2_000.0)), Some(100.0));
        assert_eq!(progress_percent(metrics(0.0)), Some(0.0));
    }

    #[test]
    fn unscrollable_page_has_no_progress_value() {
        let short = ScrollMetrics { scroll_y: 0.0, viewport_height: 900.0, document_height: 900.0 };
        assert_eq!(progress_percent(short), None);
        let shorter = ScrollMetrics { scroll_y: 0.0, viewport_height: 900.0, document_height: 400.0 };
        assert_eq!(progress_percent(shorter), None);
    }

    #[test]
    fn progress_width_renders_as_percentage() {
        assert_eq!(progress_width(50.0), "50%");
        assert_eq!(progress_width(12.5), "12.5%");
    }

    #[test]
    fn back_to_top_boundary_is_exclusive() {
        assert!(!back_to_top_visible(300.0, 300.0));
        assert!(back_to_top_visible(301.0, 300.0));
        assert!(!back_to_top_visible(0.0, 300.0));
    }

    #[test]
    fn navbar_shadow_switches_after_threshold() {
        assert_eq!(navbar_shadow(50.0, 50.0), NavbarShadow::Resting);
        assert_eq!(navbar_shadow(51.0, 50.0), NavbarShadow::Raised);
        assert_eq!(NavbarShadow::Raised.box_shadow(), "0 4px 20px rgba(0, 0, 0, 0.1)");
        assert_eq!(NavbarShadow::Resting.box_shadow(), "0 1px 2px 0 rgba(0, 0, 0, 0.05)");
    }

    #[test]
    fn frame_projection_combines_all_four_states() {
        let frame = project_frame(metrics(1_000.0), &sections(), &EnhanceConfig::default());
        assert_eq!(
            frame,
            ScrollFrame {
                active_section: Some(1),
                progress_percent: Some(50.0),
                back_to_top_visible: true,
                navbar_shadow: NavbarShadow::Raised,
            }
        );
    }
}
