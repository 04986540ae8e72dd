use crate::{
    clipboard::{
        copy_address, mailto_address, schedule_tooltip_dismissal, Clipboard, MAIL_LINK_SELECTOR,
        TOOLTIP_CSS, TOOLTIP_FADED_OPACITY, TOOLTIP_FADED_TRANSFORM,
    },
    config::{EnhanceConfig, CONFIG_ELEMENT_ID},
    counter::{
        parse_counter_duration, parse_counter_target, run_counter, CounterAnimation,
        COUNTER_DURATION_ATTRIBUTE, COUNTER_SELECTOR, COUNTER_TARGET_ATTRIBUTE,
    },
    effects::{
        schedule_ripple_removal, Rect, RippleGeometry, Tilt, BUTTON_SELECTOR, CARD_SELECTOR,
        NEUTRAL_TILT_TRANSFORM, RIPPLE_CLASS,
    },
    konami::{KonamiDetector, RAINBOW_ANIMATION, RAINBOW_KEYFRAMES, RAINBOW_STYLE_ID},
    logging::{log_event, LogLevel},
    navigation::{
        fragment_id, scroll_target_top, NavEvent, NavMenu, ACTIVE_CLASS, IN_PAGE_ANCHOR_SELECTOR,
        MENU_LINK_SELECTOR, MENU_SELECTOR, NAVBAR_SELECTOR, TOGGLE_SELECTOR,
    },
    scroll::{
        project_frame, progress_width, section_href, FrameGate, ScrollFrame, ScrollMetrics,
        SectionBox, BACK_TO_TOP_SELECTOR, PROGRESS_BAR_SELECTOR, SECTION_SELECTOR, VISIBLE_CLASS,
    },
    timers::{BrowserTimers, Timers},
};
use js_sys::{Array, Function, Promise, Reflect, JSON};
use serde_json::json;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    window, Document, Element, Event, EventTarget, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, KeyboardEvent, MouseEvent, ScrollBehavior, ScrollToOptions, Window,
};

const LAZY_IMAGE_SELECTOR: &str = "img[data-src]";
const DEFERRED_SOURCE_ATTRIBUTE: &str = "data-src";
const LOADED_CLASS: &str = "loaded";

struct NavigatorClipboard {
    window: Window,
}

impl Clipboard for NavigatorClipboard {
    async fn write_text(&self, text: &str) -> Result<(), &'static str> {
        let navigator = Reflect::get(&self.window, &JsValue::from_str("navigator"))
            .map_err(|_| "clipboard_unavailable")?;
        let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .map_err(|_| "clipboard_unavailable")?;
        if clipboard.is_undefined() || clipboard.is_null() {
            return Err("clipboard_unavailable");
        }

        let write_text = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
            .map_err(|_| "clipboard_unavailable")?;
        let Some(write_text) = write_text.dyn_ref::<Function>() else {
            return Err("clipboard_unavailable");
        };

        let promise = write_text
            .call1(&clipboard, &JsValue::from_str(text))
            .map_err(|_| "clipboard_write_threw")?
            .dyn_into::<Promise>()
            .map_err(|_| "clipboard_write_threw")?;

        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|_| "clipboard_write_rejected")
    }
}

/// Markup hooks looked up once at start-up.
struct PageHooks {
    navbar: Option<HtmlElement>,
    toggle: Option<Element>,
    menu: Option<Element>,
    menu_links: Vec<Element>,
    sections: Vec<HtmlElement>,
    progress_bar: Option<HtmlElement>,
    back_to_top: Option<Element>,
}

impl PageHooks {
    fn collect(document: &Document) -> Self {
        Self {
            navbar: query(document, NAVBAR_SELECTOR),
            toggle: query(document, TOGGLE_SELECTOR),
            menu: query(document, MENU_SELECTOR),
            menu_links: query_all(document, MENU_LINK_SELECTOR),
            sections: query_all(document, SECTION_SELECTOR),
            progress_bar: query(document, PROGRESS_BAR_SELECTOR),
            back_to_top: query(document, BACK_TO_TOP_SELECTOR),
        }
    }
}

/// Owns every piece of page state and the listeners that mutate it.
struct PageController {
    config: EnhanceConfig,
    window: Window,
    document: Document,
    timers: BrowserTimers,
    hooks: PageHooks,
    menu: Cell<NavMenu>,
    frame_gate: RefCell<FrameGate>,
    konami: RefCell<KonamiDetector>,
}

impl PageController {
    fn new(config: EnhanceConfig, window: Window, document: Document) -> Self {
        let hooks = PageHooks::collect(&document);
        Self {
            config,
            window,
            document,
            timers: BrowserTimers::default(),
            hooks,
            menu: Cell::new(NavMenu::default()),
            frame_gate: RefCell::new(FrameGate::default()),
            konami: RefCell::new(KonamiDetector::new()),
        }
    }

    fn log(&self, level: LogLevel, event: &str, fields: serde_json::Value) {
        log_event(self.config.log_level, level, event, fields);
    }

    fn start(self: &Rc<Self>) {
        if !self.config.greeting.is_empty() {
            self.log(LogLevel::Info, "greeting", json!({ "lines": self.config.greeting }));
        }

        if let Err(error_class) = self.init_reveal_library() {
            self.log(
                LogLevel::Warn,
                "reveal_library_skipped",
                json!({ "error_class": error_class }),
            );
        }

        let toggle_bound = self.bind_navigation_toggle();
        let anchors = self.bind_smooth_scroll();
        self.bind_scroll_updates();
        let buttons = self.bind_ripples();
        let cards = self.bind_tilt();
        let mail_links = self.bind_mail_links();
        let lazy_images = self.observe_lazy_images();
        self.bind_konami();
        self.bind_page_loaded();

        self.log(
            LogLevel::Info,
            "enhancer_ready",
            json!({
                "navigation_toggle": toggle_bound,
                "in_page_anchors": anchors,
                "sections": self.hooks.sections.len(),
                "buttons": buttons,
                "cards": cards,
                "mail_links": mail_links,
                "lazy_images": lazy_images,
            }),
        );
    }

    fn init_reveal_library(&self) -> Result<(), &'static str> {
        let aos = Reflect::get(&self.window, &JsValue::from_str("AOS"))
            .map_err(|_| "reveal_library_unreadable")?;
        if aos.is_undefined() || aos.is_null() {
            return Err("reveal_library_missing");
        }

        let init = Reflect::get(&aos, &JsValue::from_str("init"))
            .map_err(|_| "reveal_library_unreadable")?;
        let Some(init) = init.dyn_ref::<Function>() else {
            return Err("reveal_init_missing");
        };

        let encoded =
            serde_json::to_string(&self.config.reveal).map_err(|_| "reveal_options_invalid")?;
        let options = JSON::parse(&encoded).map_err(|_| "reveal_options_invalid")?;
        init.call1(&aos, &options).map_err(|_| "reveal_init_failed")?;
        Ok(())
    }

    fn bind_navigation_toggle(self: &Rc<Self>) -> bool {
        let (Some(toggle), Some(_)) = (self.hooks.toggle.as_ref(), self.hooks.menu.as_ref()) else {
            self.log(
                LogLevel::Warn,
                "navigation_toggle_unbound",
                json!({ "toggle": TOGGLE_SELECTOR, "menu": MENU_SELECTOR }),
            );
            return false;
        };

        let controller = Rc::clone(self);
        listen(toggle, "click", move |_| {
            controller.dispatch_nav(NavEvent::ToggleActivated);
        });

        for link in &self.hooks.menu_links {
            let controller = Rc::clone(self);
            listen(link, "click", move |_| {
                controller.dispatch_nav(NavEvent::LinkActivated);
            });
        }

        let controller = Rc::clone(self);
        listen(&self.document, "click", move |event| {
            let inside_navbar = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| element.closest(NAVBAR_SELECTOR).ok().flatten())
                .is_some();
            controller.dispatch_nav(NavEvent::PointerDown { inside_navbar });
        });

        true
    }

    fn dispatch_nav(&self, event: NavEvent) {
        let next = self.menu.get().apply(event);
        self.menu.set(next);

        let presentation = next.presentation();
        for element in [self.hooks.toggle.as_ref(), self.hooks.menu.as_ref()]
            .into_iter()
            .flatten()
        {
            set_class(element, ACTIVE_CLASS, presentation.active);
        }
        if let Some(body) = self.document.body() {
            let _ = body.style().set_property("overflow", presentation.body_overflow);
        }
    }

    fn bind_smooth_scroll(self: &Rc<Self>) -> usize {
        let anchors: Vec<Element> = query_all(&self.document, IN_PAGE_ANCHOR_SELECTOR);

        for anchor in &anchors {
            let controller = Rc::clone(self);
            let source = anchor.clone();
            listen(anchor, "click", move |event| {
                event.prevent_default();
                if let Some(href) = source.get_attribute("href") {
                    controller.scroll_to_fragment(&href);
                }
            });
        }

        anchors.len()
    }

    fn scroll_to_fragment(&self, href: &str) {
        let Some(id) = fragment_id(href) else {
            return;
        };
        let Some(target) = self
            .document
            .get_element_by_id(id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        else {
            self.log(LogLevel::Debug, "anchor_target_missing", json!({ "fragment": id }));
            return;
        };

        let navbar_height = self
            .hooks
            .navbar
            .as_ref()
            .map(|navbar| f64::from(navbar.offset_height()))
            .unwrap_or(0.0);

        let options = ScrollToOptions::new();
        options.set_top(scroll_target_top(f64::from(target.offset_top()), navbar_height));
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn bind_scroll_updates(self: &Rc<Self>) {
        let controller = Rc::clone(self);
        listen(&self.window, "scroll", move |_| {
            controller.request_scroll_frame();
        });
    }

    fn request_scroll_frame(self: &Rc<Self>) {
        if !self.frame_gate.borrow_mut().try_begin() {
            return;
        }

        let controller = Rc::clone(self);
        let callback = Closure::once_into_js(move || {
            controller.refresh_scroll_state();
            controller.frame_gate.borrow_mut().finish();
        });

        if self
            .window
            .request_animation_frame(callback.unchecked_ref())
            .is_err()
        {
            self.frame_gate.borrow_mut().finish();
            self.log(LogLevel::Debug, "animation_frame_refused", json!({}));
        }
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        let viewport_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|value| value.as_f64())
            .unwrap_or(0.0);
        let document_height = self
            .document
            .document_element()
            .map(|root| f64::from(root.scroll_height()))
            .unwrap_or(0.0);

        ScrollMetrics {
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            viewport_height,
            document_height,
        }
    }

    fn refresh_scroll_state(&self) {
        let sections: Vec<SectionBox> = self
            .hooks
            .sections
            .iter()
            .map(|section| SectionBox {
                id: section.id(),
                top: f64::from(section.offset_top()),
                height: f64::from(section.offset_height()),
            })
            .collect();

        let frame = project_frame(self.scroll_metrics(), &sections, &self.config);
        self.apply_scroll_frame(&frame, &sections);
    }

    fn apply_scroll_frame(&self, frame: &ScrollFrame, sections: &[SectionBox]) {
        if let Some(section) = frame.active_section.and_then(|index| sections.get(index)) {
            let href = section_href(&section.id);
            for link in &self.hooks.menu_links {
                let matches = link.get_attribute("href").as_deref() == Some(href.as_str());
                set_class(link, ACTIVE_CLASS, matches);
            }
        }

        if let (Some(bar), Some(percent)) = (self.hooks.progress_bar.as_ref(), frame.progress_percent)
        {
            let _ = bar.style().set_property("width", &progress_width(percent));
        }

        if let Some(back_to_top) = self.hooks.back_to_top.as_ref() {
            set_class(back_to_top, VISIBLE_CLASS, frame.back_to_top_visible);
        }

        if let Some(navbar) = self.hooks.navbar.as_ref() {
            let _ = navbar
                .style()
                .set_property("box-shadow", frame.navbar_shadow.box_shadow());
        }
    }

    fn bind_ripples(self: &Rc<Self>) -> usize {
        let buttons: Vec<HtmlElement> = query_all(&self.document, BUTTON_SELECTOR);

        for button in &buttons {
            let controller = Rc::clone(self);
            let host = button.clone();
            listen(button, "click", move |event| {
                if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                    controller.spawn_ripple(&host, mouse);
                }
            });
        }

        buttons.len()
    }

    fn spawn_ripple(&self, button: &HtmlElement, event: &MouseEvent) {
        let geometry = RippleGeometry::from_click(
            client_rect(button),
            f64::from(event.client_x()),
            f64::from(event.client_y()),
        );

        let Some(ripple) = self
            .document
            .create_element("span")
            .ok()
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };

        let style = ripple.style();
        for (property, value) in geometry.style_properties() {
            let _ = style.set_property(property, &value);
        }
        let _ = ripple.class_list().add_1(RIPPLE_CLASS);

        if button.append_child(&ripple).is_err() {
            return;
        }

        schedule_ripple_removal(&self.timers, self.config.ripple_duration_ms, move || {
            ripple.remove();
        });
    }

    fn bind_tilt(self: &Rc<Self>) -> usize {
        let cards: Vec<HtmlElement> = query_all(&self.document, CARD_SELECTOR);
        let divisor = f64::from(self.config.tilt_divisor);

        for card in &cards {
            let tilted = card.clone();
            listen(card, "mousemove", move |event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let tilt = Tilt::from_pointer(
                    client_rect(&tilted),
                    f64::from(mouse.client_x()),
                    f64::from(mouse.client_y()),
                    divisor,
                );
                let _ = tilted.style().set_property("transform", &tilt.transform());
            });

            let reset = card.clone();
            listen(card, "mouseleave", move |_| {
                let _ = reset.style().set_property("transform", NEUTRAL_TILT_TRANSFORM);
            });
        }

        cards.len()
    }

    fn bind_mail_links(self: &Rc<Self>) -> usize {
        let links: Vec<Element> = query_all(&self.document, MAIL_LINK_SELECTOR);

        for link in &links {
            let controller = Rc::clone(self);
            let source = link.clone();
            listen(link, "click", move |_| {
                let href = source.get_attribute("href").unwrap_or_default();
                if let Some(address) = mailto_address(&href) {
                    controller.show_copy_feedback(address.to_string());
                }
            });
        }

        links.len()
    }

    fn show_copy_feedback(self: &Rc<Self>, address: String) {
        if let Some(tooltip) = self.append_tooltip() {
            let faded = tooltip.clone();
            schedule_tooltip_dismissal(
                &self.timers,
                &self.config,
                move || {
                    let style = faded.style();
                    let _ = style.set_property("opacity", TOOLTIP_FADED_OPACITY);
                    let _ = style.set_property("transform", TOOLTIP_FADED_TRANSFORM);
                },
                move || tooltip.remove(),
            );
        }

        let controller = Rc::clone(self);
        spawn_local(async move {
            let clipboard = NavigatorClipboard {
                window: controller.window.clone(),
            };
            copy_address(&clipboard, &address, &controller.config).await;
        });
    }

    fn append_tooltip(&self) -> Option<HtmlElement> {
        let body = self.document.body()?;
        let tooltip = self
            .document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;

        tooltip.set_text_content(Some(self.config.tooltip_message.as_str()));
        tooltip.style().set_css_text(TOOLTIP_CSS);
        body.append_child(&tooltip).ok()?;
        Some(tooltip)
    }

    fn observe_lazy_images(&self) -> usize {
        let images: Vec<Element> = query_all(&self.document, LAZY_IMAGE_SELECTOR);
        if images.is_empty() {
            return 0;
        }

        let supported =
            Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false);
        if !supported {
            self.log(
                LogLevel::Debug,
                "lazy_images_unsupported",
                json!({ "images": images.len() }),
            );
            return 0;
        }

        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }

                    let image = entry.target();
                    if let Some(source) = image.get_attribute(DEFERRED_SOURCE_ATTRIBUTE) {
                        let _ = image.set_attribute("src", &source);
                        let _ = image.remove_attribute(DEFERRED_SOURCE_ATTRIBUTE);
                    }
                    observer.unobserve(&image);
                }
            },
        );

        let observer = match IntersectionObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(_) => {
                self.log(LogLevel::Warn, "lazy_image_observer_failed", json!({}));
                return 0;
            }
        };
        callback.forget();

        for image in &images {
            observer.observe(image);
        }
        images.len()
    }

    fn bind_konami(self: &Rc<Self>) {
        let controller = Rc::clone(self);
        listen(&self.document, "keydown", move |event| {
            let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let matched = controller.konami.borrow_mut().push(&keyboard.key());
            if matched {
                controller.start_rainbow();
            }
        });
    }

    fn start_rainbow(&self) {
        self.ensure_rainbow_keyframes();

        let Some(body) = self.document.body() else {
            return;
        };
        let _ = body.style().set_property("animation", RAINBOW_ANIMATION);
        self.log(
            LogLevel::Info,
            "rainbow_mode",
            json!({ "duration_ms": self.config.rainbow_duration_ms }),
        );

        self.timers.set_timeout(
            self.config.rainbow_duration_ms,
            Box::new(move || {
                let _ = body.style().set_property("animation", "");
            }),
        );
    }

    fn ensure_rainbow_keyframes(&self) {
        if self.document.get_element_by_id(RAINBOW_STYLE_ID).is_some() {
            return;
        }
        let (Some(head), Ok(style)) = (self.document.head(), self.document.create_element("style"))
        else {
            return;
        };

        style.set_id(RAINBOW_STYLE_ID);
        style.set_text_content(Some(RAINBOW_KEYFRAMES));
        let _ = head.append_child(&style);
    }

    fn bind_page_loaded(self: &Rc<Self>) {
        let ready_state = Reflect::get(&self.document, &JsValue::from_str("readyState"))
            .ok()
            .and_then(|value| value.as_string());

        if ready_state.as_deref() == Some("complete") {
            self.on_page_loaded();
            return;
        }

        let controller = Rc::clone(self);
        listen(&self.window, "load", move |_| {
            controller.on_page_loaded();
        });
    }

    fn on_page_loaded(&self) {
        self.refresh_scroll_state();

        if let Some(body) = self.document.body() {
            let _ = body.class_list().add_1(LOADED_CLASS);
        }

        self.start_counters();
    }

    fn start_counters(&self) {
        let counters: Vec<Element> = query_all(&self.document, COUNTER_SELECTOR);

        for counter in counters {
            let Some(target) = counter
                .get_attribute(COUNTER_TARGET_ATTRIBUTE)
                .as_deref()
                .and_then(parse_counter_target)
            else {
                continue;
            };
            let duration_ms =
                parse_counter_duration(counter.get_attribute(COUNTER_DURATION_ATTRIBUTE).as_deref());

            run_counter(
                &self.timers,
                CounterAnimation::new(target, duration_ms),
                move |value| counter.set_text_content(Some(value.to_string().as_str())),
            );
        }
    }
}

fn query<T: JsCast>(document: &Document, selector: &str) -> Option<T> {
    document
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<T>().ok())
}

fn query_all<T: JsCast>(document: &Document, selector: &str) -> Vec<T> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<T>().ok())
        .collect()
}

/// Registers a page-lifetime listener. The closure is leaked once attached.
fn listen(target: &EventTarget, event_type: &str, handler: impl FnMut(Event) + 'static) {
    let callback = Closure::<dyn FnMut(Event)>::new(handler);
    if target
        .add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())
        .is_ok()
    {
        callback.forget();
    }
}

fn set_class(element: &Element, class: &str, enabled: bool) {
    let classes = element.class_list();
    let _ = if enabled {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
}

fn client_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect {
        left: rect.left(),
        top: rect.top(),
        width: rect.width(),
        height: rect.height(),
    }
}

fn read_config(document: &Document) -> EnhanceConfig {
    let raw = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
        .unwrap_or_default();

    EnhanceConfig::from_json(&raw).unwrap_or_else(|error_class| {
        let fallback = EnhanceConfig::default();
        log_event(
            fallback.log_level,
            LogLevel::Warn,
            "config_rejected",
            json!({ "error_class": error_class }),
        );
        fallback
    })
}

pub fn run() {
    let Some(window) = window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    let config = read_config(&document);
    let controller = Rc::new(PageController::new(config, window, document));
    controller.start();
}
