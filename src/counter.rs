use crate::timers::Timers;
use std::{cell::RefCell, rc::Rc};

pub const COUNTER_SELECTOR: &str = "[data-count-to]";
pub const COUNTER_TARGET_ATTRIBUTE: &str = "data-count-to";
pub const COUNTER_DURATION_ATTRIBUTE: &str = "data-count-duration";
pub const DEFAULT_COUNTER_DURATION_MS: u32 = 2_000;
pub const COUNTER_TICK_MS: u32 = 16;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CounterFrame {
    Counting(u64),
    Finished(u64),
}

impl CounterFrame {
    pub fn value(self) -> u64 {
        match self {
            Self::Counting(value) | Self::Finished(value) => value,
        }
    }
}

/// Count-up from zero in fixed ticks.
#[derive(Clone, Debug)]
pub struct CounterAnimation {
    target: u64,
    increment: f64,
    current: f64,
}

impl CounterAnimation {
    pub fn new(target: u64, duration_ms: u32) -> Self {
        let ticks = (f64::from(duration_ms) / f64::from(COUNTER_TICK_MS)).max(1.0);
        Self {
            target,
            increment: target as f64 / ticks,
            current: 0.0,
        }
    }

    pub fn tick(&mut self) -> CounterFrame {
        self.current += self.increment;
        if self.current >= self.target as f64 {
            CounterFrame::Finished(self.target)
        } else {
            CounterFrame::Counting(self.current.ceil() as u64)
        }
    }
}

pub fn parse_counter_target(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

pub fn parse_counter_duration(value: Option<&str>) -> u32 {
    value
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_COUNTER_DURATION_MS)
}

/// Drives the animation on `timers`, handing each displayed value to
/// `render` until the target is shown.
pub fn run_counter<T>(timers: &T, animation: CounterAnimation, render: impl Fn(u64) + 'static)
where
    T: Timers + Clone + 'static,
{
    schedule_tick(timers.clone(), Rc::new(RefCell::new(animation)), Rc::new(render));
}

fn schedule_tick<T>(timers: T, animation: Rc<RefCell<CounterAnimation>>, render: Rc<dyn Fn(u64)>)
where
    T: Timers + Clone + 'static,
{
    let next_timers = timers.clone();
    timers.set_timeout(
        COUNTER_TICK_MS,
        Box::new(move || {
            let frame = animation.borrow_mut().tick();
            (*render)(frame.value());
            if let CounterFrame::Counting(_) = frame {
                schedule_tick(next_timers, animation, render);
            }
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timers::ManualTimers;

    #[test]
    fn animation_counts_up_and_lands_on_target() {
        let mut animation = CounterAnimation::new(100, 160);
        let frames: Vec<CounterFrame> = std::iter::from_fn(|| {
            let frame = animation.tick();
            Some(frame)
        })
        .take(10)
        .collect();

        assert_eq!(frames[0], CounterFrame::Counting(10));
        assert_eq!(frames[8], CounterFrame::Counting(90));
        assert_eq!(frames[9], CounterFrame::Finished(100));
    }

    #[test]
    fn displayed_values_round_up() {
        let mut animation = CounterAnimation::new(10, 64);
        assert_eq!(animation.tick(), CounterFrame::Counting(3));
        assert_eq!(animation.tick(), CounterFrame::Counting(5));
        assert_eq!(animation.tick(), CounterFrame::Counting(8));
        assert_eq!(animation.tick(), CounterFrame::Finished(10));
    }

    #[test]
    fn zero_target_finishes_immediately() {
        let mut animation = CounterAnimation::new(0, 2_000);
        assert_eq!(animation.tick(), CounterFrame::Finished(0));
    }

    #[test]
    fn attributes_parse_with_defaults() {
        assert_eq!(parse_counter_target(" 42 "), Some(42));
        assert_eq!(parse_counter_target("lots"), None);
        assert_eq!(parse_counter_duration(Some("500")), 500);
        assert_eq!(parse_counter_duration(Some("0")), DEFAULT_COUNTER_DURATION_MS);
        assert_eq!(parse_counter_duration(None), DEFAULT_COUNTER_DURATION_MS);
    }

    #[test]
    fn runner_stops_after_rendering_the_target() {
        let timers = ManualTimers::new();
        let rendered = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&rendered);

        run_counter(&timers, CounterAnimation::new(30, 48), move |value| {
            sink.borrow_mut().push(value);
        });
        timers.advance(1_000);

        assert_eq!(*rendered.borrow(), vec![10, 20, 30]);
        assert_eq!(timers.pending(), 0);
    }
}
