pub mod clipboard;
pub mod config;
pub mod counter;
pub mod debounce;
pub mod effects;
pub mod konami;
pub mod logging;
pub mod navigation;
pub mod scroll;
pub mod timers;

#[cfg(target_arch = "wasm32")]
pub mod frontend;
