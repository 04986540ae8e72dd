#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TimerId(pub u64);

/// One-shot timer scheduling. Implementations are cheap handles that can be
/// cloned into the tasks they run.
pub trait Timers {
    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId;

    /// Cancels a pending task. Unknown or already fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTimers;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{TimerId, Timers};
    use gloo_timers::callback::Timeout;
    use std::{cell::RefCell, collections::HashMap, rc::Rc};

    #[derive(Clone, Default)]
    pub struct BrowserTimers {
        inner: Rc<RefCell<Pending>>,
    }

    #[derive(Default)]
    struct Pending {
        next_id: u64,
        timeouts: HashMap<TimerId, Timeout>,
    }

    impl Timers for BrowserTimers {
        fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId {
            let mut pending = self.inner.borrow_mut();
            pending.next_id += 1;
            let id = TimerId(pending.next_id);

            let inner = Rc::clone(&self.inner);
            let timeout = Timeout::new(delay_ms, move || {
                // The handle is still running this closure, so it is leaked
                // instead of dropped.
                let fired = inner.borrow_mut().timeouts.remove(&id);
                if let Some(fired) = fired {
                    fired.forget();
                }
                task();
            });

            pending.timeouts.insert(id, timeout);
            id
        }

        fn clear_timeout(&self, id: TimerId) {
            let cancelled = self.inner.borrow_mut().timeouts.remove(&id);
            drop(cancelled);
        }
    }
}

#[cfg(test)]
pub use manual::ManualTimers;
