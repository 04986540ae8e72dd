use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CONFIG_ELEMENT_ID: &str = "enhance-config";

const DEFAULT_LOOK_AHEAD_PX: u32 = 200;
const DEFAULT_BACK_TO_TOP_THRESHOLD_PX: u32 = 300;
const DEFAULT_NAVBAR_SHADOW_THRESHOLD_PX: u32 = 50;
const DEFAULT_RIPPLE_DURATION_MS: u32 = 600;
const DEFAULT_TILT_DIVISOR: u32 = 20;
const DEFAULT_TOOLTIP_MESSAGE: &str = "Email copied!";
const DEFAULT_TOOLTIP_DISPLAY_MS: u32 = 2_000;
const DEFAULT_TOOLTIP_FADE_MS: u32 = 300;
const DEFAULT_RAINBOW_DURATION_MS: u32 = 5_000;
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
const DEFAULT_REVEAL_DURATION_MS: u32 = 800;
const DEFAULT_REVEAL_ONCE: bool = true;
const DEFAULT_REVEAL_OFFSET_PX: u32 = 100;
const DEFAULT_REVEAL_EASING: &str = "ease-out";

const LOOK_AHEAD_PX_BOUNDS: (u32, u32) = (0, 2_000);
const BACK_TO_TOP_THRESHOLD_PX_BOUNDS: (u32, u32) = (0, 10_000);
const NAVBAR_SHADOW_THRESHOLD_PX_BOUNDS: (u32, u32) = (0, 10_000);
const RIPPLE_DURATION_MS_BOUNDS: (u32, u32) = (50, 10_000);
const TILT_DIVISOR_BOUNDS: (u32, u32) = (1, 500);
const TOOLTIP_DISPLAY_MS_BOUNDS: (u32, u32) = (100, 60_000);
const TOOLTIP_FADE_MS_BOUNDS: (u32, u32) = (0, 10_000);
const RAINBOW_DURATION_MS_BOUNDS: (u32, u32) = (100, 60_000);
const REVEAL_DURATION_MS_BOUNDS: (u32, u32) = (0, 10_000);
const REVEAL_OFFSET_PX_BOUNDS: (u32, u32) = (0, 2_000);

/// Options handed to the scroll-reveal library's `init`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RevealOptions {
    pub duration: u32,
    pub once: bool,
    pub offset: u32,
    pub easing: String,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_REVEAL_DURATION_MS,
            once: DEFAULT_REVEAL_ONCE,
            offset: DEFAULT_REVEAL_OFFSET_PX,
            easing: DEFAULT_REVEAL_EASING.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnhanceConfig {
    pub look_ahead_px: u32,
    pub back_to_top_threshold_px: u32,
    pub navbar_shadow_threshold_px: u32,
    pub ripple_duration_ms: u32,
    pub tilt_divisor: u32,
    pub tooltip_message: String,
    pub tooltip_display_ms: u32,
    pub tooltip_fade_ms: u32,
    pub rainbow_duration_ms: u32,
    pub log_level: LogLevel,
    pub greeting: Vec<String>,
    pub reveal: RevealOptions,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            look_ahead_px: DEFAULT_LOOK_AHEAD_PX,
            back_to_top_threshold_px: DEFAULT_BACK_TO_TOP_THRESHOLD_PX,
            navbar_shadow_threshold_px: DEFAULT_NAVBAR_SHADOW_THRESHOLD_PX,
            ripple_duration_ms: DEFAULT_RIPPLE_DURATION_MS,
            tilt_divisor: DEFAULT_TILT_DIVISOR,
            tooltip_message: DEFAULT_TOOLTIP_MESSAGE.to_string(),
            tooltip_display_ms: DEFAULT_TOOLTIP_DISPLAY_MS,
            tooltip_fade_ms: DEFAULT_TOOLTIP_FADE_MS,
            rainbow_duration_ms: DEFAULT_RAINBOW_DURATION_MS,
            log_level: DEFAULT_LOG_LEVEL,
            greeting: Vec::new(),
            reveal: RevealOptions::default(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    look_ahead_px: Option<Value>,
    back_to_top_threshold_px: Option<Value>,
    navbar_shadow_threshold_px: Option<Value>,
    ripple_duration_ms: Option<Value>,
    tilt_divisor: Option<Value>,
    tooltip_message: Option<Value>,
    tooltip_display_ms: Option<Value>,
    tooltip_fade_ms: Option<Value>,
    rainbow_duration_ms: Option<Value>,
    log_level: Option<Value>,
    greeting: Option<Value>,
    reveal: Option<RawRevealConfig>,
}

#[derive(Default, Deserialize)]
struct RawRevealConfig {
    duration: Option<Value>,
    once: Option<Value>,
    offset: Option<Value>,
    easing: Option<Value>,
}

impl EnhanceConfig {
    /// Reads the config block's JSON text. Fields that are missing, mistyped
    /// or out of bounds keep their defaults; only unparseable JSON is an error.
    pub fn from_json(raw: &str) -> Result<Self, &'static str> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let raw: RawConfig = serde_json::from_str(raw).map_err(|_| "config_json_invalid")?;
        let reveal = raw.reveal.unwrap_or_default();

        Ok(Self {
            look_ahead_px: parse_u32_with_bounds(
                raw.look_ahead_px.as_ref(),
                DEFAULT_LOOK_AHEAD_PX,
                LOOK_AHEAD_PX_BOUNDS,
            ),
            back_to_top_threshold_px: parse_u32_with_bounds(
                raw.back_to_top_threshold_px.as_ref(),
                DEFAULT_BACK_TO_TOP_THRESHOLD_PX,
                BACK_TO_TOP_THRESHOLD_PX_BOUNDS,
            ),
            navbar_shadow_threshold_px: parse_u32_with_bounds(
                raw.navbar_shadow_threshold_px.as_ref(),
                DEFAULT_NAVBAR_SHADOW_THRESHOLD_PX,
                NAVBAR_SHADOW_THRESHOLD_PX_BOUNDS,
            ),
            ripple_duration_ms: parse_u32_with_bounds(
                raw.ripple_duration_ms.as_ref(),
                DEFAULT_RIPPLE_DURATION_MS,
                RIPPLE_DURATION_MS_BOUNDS,
            ),
            tilt_divisor: parse_u32_with_bounds(
                raw.tilt_divisor.as_ref(),
                DEFAULT_TILT_DIVISOR,
                TILT_DIVISOR_BOUNDS,
            ),
            tooltip_message: parse_non_empty_string(raw.tooltip_message.as_ref())
                .unwrap_or_else(|| DEFAULT_TOOLTIP_MESSAGE.to_string()),
            tooltip_display_ms: parse_u32_with_bounds(
                raw.tooltip_display_ms.as_ref(),
                DEFAULT_TOOLTIP_DISPLAY_MS,
                TOOLTIP_DISPLAY_MS_BOUNDS,
            ),
            tooltip_fade_ms: parse_u32_with_bounds(
                raw.tooltip_fade_ms.as_ref(),
                DEFAULT_TOOLTIP_FADE_MS,
                TOOLTIP_FADE_MS_BOUNDS,
            ),
            rainbow_duration_ms: parse_u32_with_bounds(
                raw.rainbow_duration_ms.as_ref(),
                DEFAULT_RAINBOW_DURATION_MS,
                RAINBOW_DURATION_MS_BOUNDS,
            ),
            log_level: raw
                .log_level
                .as_ref()
                .and_then(Value::as_str)
                .and_then(LogLevel::parse)
                .unwrap_or(DEFAULT_LOG_LEVEL),
            greeting: parse_string_list(raw.greeting.as_ref()),
            reveal: RevealOptions {
                duration: parse_u32_with_bounds(
                    reveal.duration.as_ref(),
                    DEFAULT_REVEAL_DURATION_MS,
                    REVEAL_DURATION_MS_BOUNDS,
                ),
                once: reveal
                    .once
                    .as_ref()
                    .and_then(Value::as_bool)
                    .unwrap_or(DEFAULT_REVEAL_ONCE),
                offset: parse_u32_with_bounds(
                    reveal.offset.as_ref(),
                    DEFAULT_REVEAL_OFFSET_PX,
                    REVEAL_OFFSET_PX_BOUNDS,
                ),
                easing: parse_non_empty_string(reveal.easing.as_ref())
                    .unwrap_or_else(|| DEFAULT_REVEAL_EASING.to_string()),
            },
        })
    }
}

fn parse_u32_with_bounds(value: Option<&Value>, default: u32, bounds: (u32, u32)) -> u32 {
    value
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_block_yields_defaults() {
        let config = EnhanceConfig::from_json("  ").expect("blank config is allowed");
        assert_eq!(config, EnhanceConfig::default());
        assert_eq!(config.look_ahead_px, 200);
        assert_eq!(config.ripple_duration_ms, 600);
        assert_eq!(
            config.reveal,
            RevealOptions {
                duration: 800,
                once: true,
                offset: 100,
                easing: "ease-out".to_string(),
            }
        );
    }

    #[test]
    fn in_bounds_values_override_defaults() {
        let config = EnhanceConfig::from_json(
            r#"{
                "lookAheadPx": 120,
                "tooltipMessage": "  Copied  ",
                "logLevel": "debug",
                "greeting": ["hi", 3, "there"],
                "reveal": { "once": false, "easing": "linear" }
            }"#,
        )
        .expect("valid config");

        assert_eq!(config.look_ahead_px, 120);
        assert_eq!(config.tooltip_message, "Copied");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.greeting, vec!["hi".to_string(), "there".to_string()]);
        assert!(!config.reveal.once);
        assert_eq!(config.reveal.easing, "linear");
        assert_eq!(config.reveal.duration, 800);
    }

    #[test]
    fn out_of_bounds_or_mistyped_values_fall_back() {
        let config = EnhanceConfig::from_json(
            r#"{
                "rippleDurationMs": 10,
                "tiltDivisor": 0,
                "backToTopThresholdPx": "300",
                "tooltipDisplayMs": -5,
                "tooltipMessage": "   ",
                "logLevel": "verbose"
            }"#,
        )
        .expect("valid json");

        assert_eq!(config.ripple_duration_ms, 600);
        assert_eq!(config.tilt_divisor, 20);
        assert_eq!(config.back_to_top_threshold_px, 300);
        assert_eq!(config.tooltip_display_ms, 2_000);
        assert_eq!(config.tooltip_message, "Email copied!");
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn malformed_json_is_reported() {
        assert_eq!(EnhanceConfig::from_json("{ lookAheadPx: 1"), Err("config_json_invalid"));
    }

    #[test]
    fn reveal_options_serialize_for_the_library() {
        let encoded = serde_json::to_value(RevealOptions::default()).expect("serializable");
        assert_eq!(
            encoded,
            serde_json::json!({ "duration": 800, "once": true, "offset": 100, "easing": "ease-out" })
        );
    }
}
