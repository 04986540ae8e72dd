use crate::{
    config::EnhanceConfig,
    logging::{log_event, LogLevel},
    timers::Timers,
};
use serde_json::json;

pub const MAIL_LINK_SELECTOR: &str = "a[href^=\"mailto:\"]";

pub const TOOLTIP_CSS: &str = "position: fixed; top: 50%; left: 50%; \
    transform: translate(-50%, -50%); \
    background: linear-gradient(135deg, #3B82F6, #8B5CF6); color: white; \
    padding: 1rem 2rem; border-radius: 0.5rem; font-weight: 500; \
    box-shadow: 0 10px 30px rgba(59, 130, 246, 0.3); z-index: 10000; \
    animation: fadeInUp 0.3s ease-out; transition: opacity 0.3s ease, transform 0.3s ease;";
pub const TOOLTIP_FADED_OPACITY: &str = "0";
pub const TOOLTIP_FADED_TRANSFORM: &str = "translate(-50%, -50%) translateY(-20px)";

const MAILTO_SCHEME: &str = "mailto:";

#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), &'static str>;
}

/// Address part of a `mailto:` href, without any `?subject=` style query.
pub fn mailto_address(href: &str) -> Option<&str> {
    let rest = href.strip_prefix(MAILTO_SCHEME)?;
    let address = rest.split('?').next().unwrap_or(rest).trim();
    (!address.is_empty()).then_some(address)
}

/// Best-effort copy. Failures are logged and otherwise swallowed.
pub async fn copy_address<C: Clipboard>(clipboard: &C, address: &str, config: &EnhanceConfig) -> bool {
    match clipboard.write_text(address).await {
        Ok(()) => {
            log_event(config.log_level, LogLevel::Debug, "clipboard_write_ok", json!({}));
            true
        }
        Err(error_class) => {
            log_event(
                config.log_level,
                LogLevel::Warn,
                "clipboard_write_failed",
                json!({ "error_class": error_class }),
            );
            false
        }
    }
}

/// Runs `fade` after the display period and `remove` once the fade has
/// played out.
pub fn schedule_tooltip_dismissal<T>(
    timers: &T,
    config: &EnhanceConfig,
    fade: impl FnOnce() + 'static,
    remove: impl FnOnce() + 'static,
) where
    T: Timers + Clone + 'static,
{
    let fade_ms = config.tooltip_fade_ms;
    let nested = timers.clone();
    timers.set_timeout(
        config.tooltip_display_ms,
        Box::new(move || {
            fade();
            nested.set_timeout(fade_ms, Box::new(remove));
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timers::ManualTimers;
    use std::{cell::RefCell, rc::Rc};

    struct RecordingClipboard {
        result: Result<(), &'static str>,
        written: RefCell<Vec<String>>,
    }

    impl Clipboard for RecordingClipboard {
        async fn write_text(&self, text: &str) -> Result<(), &'static str> {
            self.written.borrow_mut().push(text.to_string());
            self.result
        }
    }

    #[test]
    fn mailto_address_strips_scheme_and_query() {
        assert_eq!(mailto_address("mailto:hello@example.com"), Some("hello@example.com"));
        assert_eq!(
            mailto_address("mailto:hello@example.com?subject=Hi"),
            Some("hello@example.com")
        );
        assert_eq!(mailto_address("mailto:"), None);
        assert_eq!(mailto_address("https://example.com"), None);
    }

    #[tokio::test]
    async fn successful_copy_writes_the_address() {
        let clipboard = RecordingClipboard { result: Ok(()), written: RefCell::new(Vec::new()) };

        let copied = copy_address(&clipboard, "hello@example.com", &EnhanceConfig::default()).await;

        assert!(copied);
        assert_eq!(*clipboard.written.borrow(), vec!["hello@example.com".to_string()]);
    }

    #[tokio::test]
    async fn failed_copy_is_swallowed() {
        let clipboard = RecordingClipboard {
            result: Err("clipboard_unavailable"),
            written: RefCell::new(Vec::new()),
        };

        let copied = copy_address(&clipboard, "hello@example.com", &EnhanceConfig::default()).await;

        assert!(!copied, "failure should be reported to the caller only as a flag");
        assert_eq!(clipboard.written.borrow().len(), 1);
    }

    #[test]
    fn tooltip_fades_then_is_removed() {
        let timers = ManualTimers::new();
        let steps = Rc::new(RefCell::new(Vec::new()));
        let config = EnhanceConfig::default();

        let fade_steps = Rc::clone(&steps);
        let fade_clock = timers.clone();
        let remove_steps = Rc::clone(&steps);
        let remove_clock = timers.clone();
        schedule_tooltip_dismissal(
            &timers,
            &config,
            move || fade_steps.borrow_mut().push(("fade", fade_clock.now_ms())),
            move || remove_steps.borrow_mut().push(("remove", remove_clock.now_ms())),
        );

        timers.advance(1_999);
        assert!(steps.borrow().is_empty());

        timers.advance(1);
        assert_eq!(*steps.borrow(), vec![("fade", 2_000)]);

        timers.advance(300);
        assert_eq!(*steps.borrow(), vec![("fade", 2_000), ("remove", 2_300)]);
    }
}
