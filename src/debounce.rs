//! General-purpose debounce helper. Nothing on the page is wired through it
//! yet; it is kept for handlers that fire faster than they should run.

use crate::timers::{TimerId, Timers};
use std::{cell::RefCell, rc::Rc};

pub const DEFAULT_DEBOUNCE_WAIT_MS: u32 = 10;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DebounceMode {
    /// Run once, `wait` after the last call of a burst, with its argument.
    Trailing,
    /// Run on the first call of a burst; further calls only extend the quiet
    /// period.
    Immediate,
}

pub struct Debounced<T, A>
where
    T: Timers + Clone + 'static,
    A: 'static,
{
    timers: T,
    wait_ms: u32,
    mode: DebounceMode,
    func: Rc<dyn Fn(A)>,
    pending: Rc<RefCell<Option<TimerId>>>,
}

impl<T, A> Debounced<T, A>
where
    T: Timers + Clone + 'static,
    A: 'static,
{
    pub fn new(timers: T, wait_ms: u32, mode: DebounceMode, func: impl Fn(A) + 'static) -> Self {
        Self {
            timers,
            wait_ms,
            mode,
            func: Rc::new(func),
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn call(&self, arg: A) {
        let previous = self.pending.borrow_mut().take();
        let call_now = self.mode == DebounceMode::Immediate && previous.is_none();
        if let Some(previous) = previous {
            self.timers.clear_timeout(previous);
        }

        let pending = Rc::clone(&self.pending);
        let id = match self.mode {
            DebounceMode::Trailing => {
                let func = Rc::clone(&self.func);
                self.timers.set_timeout(
                    self.wait_ms,
                    Box::new(move || {
                        pending.borrow_mut().take();
                        (*func)(arg);
                    }),
                )
            }
            DebounceMode::Immediate => {
                let id = self.timers.set_timeout(
                    self.wait_ms,
                    Box::new(move || {
                        pending.borrow_mut().take();
                    }),
                );
                *self.pending.borrow_mut() = Some(id);
                if call_now {
                    (*self.func)(arg);
                }
                return;
            }
        };

        *self.pending.borrow_mut() = Some(id);
    }
}
