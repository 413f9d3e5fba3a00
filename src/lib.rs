//! Josuushi Quiz core crate.
//!
//! Flashcard drill for Japanese counters (josuushi) plus the scrolling glyph
//! background behind it. `start_app()` fetches the counter data once and hands
//! the result to both components: the quiz only becomes startable on success,
//! the background always runs (built-in glyphs when the data is missing).

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

pub mod background;
pub mod config;
pub mod dataset;
pub mod dom;
pub mod i18n;
pub mod quiz;

use background::Vocabulary;
use background::canvas::BackgroundHandle;
use config::AppConfig;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

thread_local! {
    static BACKGROUND: RefCell<Option<BackgroundHandle>> = const { RefCell::new(None) };
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub async fn start_app() -> Result<(), JsValue> {
    run(AppConfig::default()).await
}

/// Same as `start_app` with a JSON object overriding any part of `AppConfig`.
#[wasm_bindgen]
pub async fn start_app_with_config(config: String) -> Result<(), JsValue> {
    let config = AppConfig::from_json(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    run(config).await
}

/// Stop the background loop (view unmount). Safe to call more than once.
#[wasm_bindgen]
pub fn stop_background() {
    // Dropping the handle cancels the pending frame.
    BACKGROUND.with(|cell| cell.borrow_mut().take());
}

async fn run(config: AppConfig) -> Result<(), JsValue> {
    log::info!("loading counters from {}", config.data_url);
    let loaded = dataset::fetch_dataset(&config.data_url).await;

    let vocab = match &loaded {
        Ok(dataset) => Vocabulary::from_dataset(dataset, &mut rand::thread_rng()),
        Err(err) => {
            log::warn!("background uses built-in glyphs: {err}");
            Vocabulary::fallback()
        }
    };
    match background::canvas::start(&vocab, &config.animation) {
        Ok(handle) => BACKGROUND.with(|cell| {
            // Replacing an earlier handle stops its loop.
            cell.replace(Some(handle));
        }),
        Err(err) => log::error!("background unavailable: {err:?}"),
    }

    dom::mount_quiz(loaded, &config)
}
