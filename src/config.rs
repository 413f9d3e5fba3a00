//! Runtime configuration. Defaults reproduce the shipped page; the host may
//! override any subset through `start_app_with_config`.

use serde::Deserialize;

use crate::i18n::Locale;

pub const DEFAULT_DATA_URL: &str = "jyosuushi.json";
pub const DEFAULT_QUESTION_COUNT: usize = 10;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub data_url: String,
    pub question_count: usize,
    pub locale: Locale,
    pub animation: AnimationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            question_count: DEFAULT_QUESTION_COUNT,
            locale: Locale::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Background pattern parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Side of the square tile in pixels.
    pub pattern_size: f64,
    /// Cells per tile side.
    pub cells: u32,
    pub prime: i64,
    /// Horizontal pixels per frame; vertical speed is half of this.
    pub speed: f64,
    pub icon_size: f64,
    pub font_color: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            pattern_size: 500.0,
            cells: 12,
            prime: 10007,
            speed: 0.2,
            icon_size: 20.0,
            font_color: "rgba(100, 100, 100, 0.2)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let cfg = AppConfig::from_json(r#"{"question_count": 5, "animation": {"speed": 1.0}}"#).unwrap();
        assert_eq!(cfg.question_count, 5);
        assert_eq!(cfg.data_url, DEFAULT_DATA_URL);
        assert_eq!(cfg.animation.speed, 1.0);
        assert_eq!(cfg.animation.cells, 12);
        assert_eq!(cfg.locale, Locale::TraditionalChinese);
    }
}
