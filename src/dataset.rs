//! Counter dataset shared by the quiz and the background animator.
//!
//! The page ships a single `jyosuushi.json` document. It is fetched once and the
//! typed result is handed to both components: the quiz refuses to start on
//! failure, the animator falls back to a built-in glyph set.

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

// --- Errors -----------------------------------------------------------------

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DataLoadError {
    #[error("request for {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("reading {url} failed with HTTP status {status}")]
    Status { url: String, status: u16 },
    #[error("malformed counter data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("counter `{key}` has no icons")]
    MissingIcons { key: String },
    #[error("item `{kanji}` in counter `{key}` has no readings")]
    MissingReadings { key: String, kanji: String },
}

// --- Model ------------------------------------------------------------------

/// Name of a counter category in both bundled scripts.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DisplayName {
    #[serde(rename = "ch")]
    pub primary: String,
    #[serde(rename = "en")]
    pub secondary: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CounterItem {
    pub kanji: String,
    /// Every spelling accepted as a correct answer for `kanji`.
    #[serde(rename = "hiragana")]
    pub readings: Vec<String>,
}

impl CounterItem {
    /// Exact membership test; `answer` is expected to be trimmed already.
    pub fn accepts(&self, answer: &str) -> bool {
        self.readings.iter().any(|r| r == answer)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CounterCategory {
    pub name: DisplayName,
    #[serde(rename = "icon")]
    pub icons: Vec<String>,
    #[serde(default)]
    pub items: Vec<CounterItem>,
}

#[derive(Deserialize)]
struct Document {
    counters: IndexMap<String, CounterCategory>,
}

/// All counter categories keyed by counter, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    counters: IndexMap<String, CounterCategory>,
}

impl Dataset {
    pub fn from_json(text: &str) -> Result<Self, DataLoadError> {
        let doc: Document = serde_json::from_str(text)?;
        let dataset = Dataset {
            counters: doc.counters,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<(), DataLoadError> {
        for (key, category) in &self.counters {
            if category.icons.is_empty() {
                return Err(DataLoadError::MissingIcons { key: key.clone() });
            }
            if let Some(item) = category.items.iter().find(|i| i.readings.is_empty()) {
                return Err(DataLoadError::MissingReadings {
                    key: key.clone(),
                    kanji: item.kanji.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.counters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn category(&self, key: &str) -> Option<&CounterCategory> {
        self.counters.get(key)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &CounterCategory)> {
        self.counters.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Every icon of every category, in category order. Duplicates are kept.
    pub fn all_icons(&self) -> Vec<&str> {
        self.counters
            .values()
            .flat_map(|c| c.icons.iter().map(String::as_str))
            .collect()
    }
}

// --- Fetch ------------------------------------------------------------------

/// Fetch and parse the dataset. No retries, no deadline: the first response wins.
pub async fn fetch_dataset(url: &str) -> Result<Dataset, DataLoadError> {
    let transport = |reason: JsValue| DataLoadError::Transport {
        url: url.to_string(),
        reason: reason
            .as_string()
            .unwrap_or_else(|| format!("{reason:?}")),
    };
    let win = web_sys::window().ok_or_else(|| transport(JsValue::from_str("no window")))?;
    let response: web_sys::Response = JsFuture::from(win.fetch_with_str(url))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(transport)?;
    if !response.ok() {
        return Err(DataLoadError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    let body = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    let text = body
        .as_string()
        .ok_or_else(|| transport(JsValue::from_str("response body is not text")))?;
    Dataset::from_json(&text)
}
