//! Browser side of the background: the full-viewport canvas, the offscreen
//! pattern tile and the requestAnimationFrame loop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasPattern, CanvasRenderingContext2d, Document, HtmlCanvasElement, Window, window};

use super::{Animator, PatternSurface, Rect, TileLayout, Vocabulary};
use crate::config::AnimationConfig;

pub const CANVAS_ID: &str = "backgroundCanvas";

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()
        .map_err(JsValue::from)
}

// --- Surface ----------------------------------------------------------------

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pattern: Option<CanvasPattern>,
}

impl CanvasSurface {
    /// Reuse `#backgroundCanvas` or append a fixed, full-viewport one.
    pub fn attach(doc: &Document) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
            el.dyn_into()?
        } else {
            let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
            c.set_id(CANVAS_ID);
            c.set_attribute(
                "style",
                "position:fixed; left:0; top:0; z-index:-1; pointer-events:none;",
            )?;
            doc.body()
                .ok_or_else(|| JsValue::from_str("no body"))?
                .append_child(&c)?;
            c
        };
        let ctx = context_2d(&canvas)?;
        Ok(Self {
            canvas,
            ctx,
            pattern: None,
        })
    }

    /// Draw one tile offscreen and register it as the repeating fill.
    pub fn build_pattern(
        &mut self,
        doc: &Document,
        layout: &TileLayout,
        vocab: &Vocabulary,
        config: &AnimationConfig,
    ) -> Result<(), JsValue> {
        let tile: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        let side = layout.pattern_size.round() as u32;
        tile.set_width(side);
        tile.set_height(side);
        let ptx = context_2d(&tile)?;
        ptx.set_font(&format!("{}px sans-serif", config.icon_size));
        ptx.set_fill_style_str(&config.font_color);
        ptx.set_text_align("center");
        ptx.set_text_baseline("middle");
        for (x, y, glyph) in layout.cells(vocab) {
            ptx.fill_text(glyph, x, y)?;
        }
        self.pattern = self
            .ctx
            .create_pattern_with_html_canvas_element(&tile, "repeat")?;
        Ok(())
    }

    pub fn fit_viewport(canvas: &HtmlCanvasElement, win: &Window) {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32;
        canvas.set_width(dim(win.inner_width()));
        canvas.set_height(dim(win.inner_height()));
    }
}

impl PatternSurface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.ctx.translate(x, y).ok();
    }

    fn fill_pattern(&mut self, rect: Rect) {
        if let Some(pattern) = &self.pattern {
            self.ctx.set_fill_style_canvas_pattern(pattern);
            self.ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
        }
    }

    fn reset_transform(&mut self) {
        self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
    }
}

// --- Frame loop -------------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Running background. Dropping the handle stops the loop and detaches the
/// resize listener.
pub struct BackgroundHandle {
    running: Rc<Cell<bool>>,
    frame_id: Rc<Cell<Option<i32>>>,
    frame: FrameCallback,
    resize: Option<Closure<dyn FnMut()>>,
}

impl BackgroundHandle {
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn stop(&mut self) {
        if !self.running.replace(false) {
            return;
        }
        let Some(win) = window() else { return };
        if let Some(id) = self.frame_id.take() {
            win.cancel_animation_frame(id).ok();
        }
        if let Some(resize) = self.resize.take() {
            win.remove_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())
                .ok();
        }
        // Breaks the closure's reference to itself.
        self.frame.borrow_mut().take();
        log::debug!("background animation stopped");
    }
}

impl Drop for BackgroundHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn request_frame(win: &Window, frame: &FrameCallback) -> Option<i32> {
    let borrowed = frame.borrow();
    let callback = borrowed.as_ref()?;
    match win.request_animation_frame(callback.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(err) => {
            log::error!("requestAnimationFrame failed: {err:?}");
            None
        }
    }
}

/// Build the tile from `vocab` and start scrolling it.
pub fn start(vocab: &Vocabulary, config: &AnimationConfig) -> Result<BackgroundHandle, JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let layout = TileLayout::new(config);
    let mut surface = CanvasSurface::attach(&doc)?;
    surface.build_pattern(&doc, &layout, vocab, config)?;
    CanvasSurface::fit_viewport(&surface.canvas, &win);

    let resize = {
        let canvas = surface.canvas.clone();
        let win_resize = win.clone();
        let closure = Closure::wrap(Box::new(move || {
            CanvasSurface::fit_viewport(&canvas, &win_resize);
        }) as Box<dyn FnMut()>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure
    };

    let running = Rc::new(Cell::new(true));
    let frame_id = Rc::new(Cell::new(None));
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    let mut animator = Animator::new(&layout, config.speed);
    {
        let running = running.clone();
        let frame_id = frame_id.clone();
        *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
            if !running.get() {
                return;
            }
            animator.render_frame(&mut surface);
            if let Some(w) = window() {
                frame_id.set(request_frame(&w, &f));
            }
        }) as Box<dyn FnMut(f64)>));
    }
    frame_id.set(request_frame(&win, &g));
    log::info!(
        "background animation started with {} glyphs",
        vocab.len()
    );

    Ok(BackgroundHandle {
        running,
        frame_id,
        frame: g,
        resize: Some(resize),
    })
}
