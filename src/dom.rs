//! DOM implementation of the quiz `Surface` and the listener wiring.
//!
//! Element ids and utility classes follow the shipped `index.html`. Text that
//! comes from the user or the data file is always written as text content.

use std::cell::RefCell;

use rand::rngs::ThreadRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, window};

use crate::config::AppConfig;
use crate::dataset::{DataLoadError, Dataset};
use crate::i18n::Locale;
use crate::quiz::dispatch::{
    Action, BUTTON_BINDINGS, Controller, Screen, Surface, report_load_failure,
};
use crate::quiz::{Feedback, QuestionView, ScopeEntry, Summary};

const SCREENS: [(Screen, &str); 3] = [
    (Screen::Start, "start-screen"),
    (Screen::Practice, "practice-screen"),
    (Screen::End, "end-screen"),
];

const HIDDEN: &str = "hidden";
const ANSWER_INPUT: &str = "answer-input";
const SCOPE_CHECKBOXES: &str = "scope-checkboxes";

pub struct DomSurface {
    doc: Document,
    locale: Locale,
}

impl DomSurface {
    pub fn new(doc: Document, locale: Locale) -> Self {
        Self { doc, locale }
    }

    fn el(&self, id: &str) -> Option<Element> {
        let el = self.doc.get_element_by_id(id);
        if el.is_none() {
            log::warn!("missing element #{id}");
        }
        el
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.el(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(el) = self.el(id) {
            let classes = el.class_list();
            let res = if hidden {
                classes.add_1(HIDDEN)
            } else {
                classes.remove_1(HIDDEN)
            };
            res.ok();
        }
    }

    fn button(&self, id: &str) -> Option<HtmlButtonElement> {
        self.el(id)?.dyn_into().ok()
    }

    fn input(&self) -> Option<HtmlInputElement> {
        self.el(ANSWER_INPUT)?.dyn_into().ok()
    }

    fn set_answer_enabled(&self, enabled: bool) {
        if let Some(input) = self.input() {
            input.set_disabled(!enabled);
            if enabled {
                input.set_value("");
                input.focus().ok();
            }
        }
        if let Some(btn) = self.button("submit-answer-btn") {
            btn.set_disabled(!enabled);
        }
        self.set_hidden("submit-answer-btn", !enabled);
        self.set_hidden("next-question-btn", enabled);
    }

    fn create(&self, tag: &str, class: &str) -> Result<Element, JsValue> {
        let el = self.doc.create_element(tag)?;
        if !class.is_empty() {
            el.set_class_name(class);
        }
        Ok(el)
    }

    fn scope_row(&self, entry: &ScopeEntry) -> Result<Element, JsValue> {
        let label = self.create("label", "flex items-start")?;
        let input: HtmlInputElement = self
            .create("input", "h-5 w-5 text-blue-600 border-gray-300 rounded flex-shrink-0")?
            .dyn_into()?;
        input.set_type("checkbox");
        input.set_checked(entry.checked);
        input.set_attribute("data-key", &entry.key)?;
        let names = self.create("span", "ml-2 text-gray-700")?;
        let primary = self.create("span", "block")?;
        primary.set_text_content(Some(&entry.primary));
        let secondary = self.create("small", "block")?;
        secondary.set_text_content(Some(&entry.secondary));
        names.append_child(&primary)?;
        names.append_child(&secondary)?;
        label.append_child(&input)?;
        label.append_child(&names)?;
        Ok(label)
    }

    fn review_row(&self, row: &crate::quiz::ReviewRow) -> Result<Element, JsValue> {
        let tr = self.create("tr", if row.correct { "bg-green-100" } else { "bg-red-100" })?;
        let [prompt_label, answer_label, verdict_label, readings_label] = self.locale.review_labels();
        let cell = |label: &str, class: &str| -> Result<Element, JsValue> {
            let td = self.create("td", class)?;
            td.set_attribute("data-label", label)?;
            tr.append_child(&td)?;
            Ok(td)
        };
        cell(prompt_label, "border px-4 py-2")?.set_text_content(Some(&row.kanji));
        let answer = cell(answer_label, "border px-4 py-2")?;
        if row.correct {
            answer.set_text_content(Some(&row.answer));
        } else {
            let span = self.create("span", "font-bold text-red-700")?;
            span.set_text_content(Some(&row.answer));
            answer.append_child(&span)?;
        }
        cell(verdict_label, "border px-4 py-2 text-center")?
            .set_text_content(Some(self.locale.review_marker(row.correct)));
        cell(readings_label, "border px-4 py-2")?.set_text_content(Some(&row.readings.join(", ")));
        Ok(tr)
    }

    fn try_show_scope_dialog(&self, entries: &[ScopeEntry]) -> Result<(), JsValue> {
        let Some(container) = self.el(SCOPE_CHECKBOXES) else {
            return Ok(());
        };
        container.set_inner_html("");
        for entry in entries {
            let row = self.scope_row(entry)?;
            container.append_child(&row)?;
        }
        self.set_hidden("scope-modal", false);
        Ok(())
    }

    fn try_show_summary(&self, summary: &Summary) -> Result<(), JsValue> {
        self.set_text(
            "final-score",
            &self.locale.final_score(summary.correct, summary.total),
        );
        let Some(body) = self.el("review-body") else {
            return Ok(());
        };
        body.set_inner_html("");
        for row in &summary.rows {
            let tr = self.review_row(row)?;
            body.append_child(&tr)?;
        }
        Ok(())
    }

    fn try_show_feedback(&self, feedback: &Feedback) -> Result<(), JsValue> {
        self.set_answer_enabled(false);
        if let Some(icon) = self.el("icon-display") {
            let classes = icon.class_list();
            classes.remove_2("animate-joy", "animate-sad")?;
            // Reading layout restarts the CSS animation.
            if let Some(html) = icon.dyn_ref::<HtmlElement>() {
                let _ = html.offset_width();
            }
            let class = match feedback {
                Feedback::Correct => "animate-joy",
                Feedback::Incorrect { .. } => "animate-sad",
            };
            classes.add_1(class)?;
        }
        let Some(status) = self.el("status-bar") else {
            return Ok(());
        };
        status.set_inner_html("");
        match feedback {
            Feedback::Correct => {
                status.set_text_content(Some(self.locale.correct()));
                status.set_class_name("h-8 mb-4 text-lg font-semibold text-green-500");
            }
            Feedback::Incorrect { readings } => {
                status.set_text_content(Some(self.locale.incorrect()));
                let answer = self.create("span", "font-bold")?;
                answer.set_text_content(Some(&self.locale.reading_alternatives(readings)));
                status.append_child(&answer)?;
                status.set_class_name("h-8 mb-4 text-lg font-semibold text-red-500");
            }
        }
        Ok(())
    }

    fn try_show_fatal(&self, lines: &[String]) -> Result<(), JsValue> {
        let Some(app) = self.el("app") else {
            return Ok(());
        };
        let div = self.create("div", "text-red-500 font-bold text-center")?;
        for (n, line) in lines.iter().enumerate() {
            if n > 0 {
                let br = self.create("br", "")?;
                div.append_child(&br)?;
            }
            let text = self.doc.create_text_node(line);
            div.append_child(&text)?;
        }
        app.set_inner_html("");
        app.append_child(&div)?;
        Ok(())
    }
}

impl Surface for DomSurface {
    fn show_screen(&mut self, screen: Screen) {
        for (s, id) in SCREENS {
            self.set_hidden(id, s != screen);
        }
        if let Some(body) = self.doc.body() {
            let classes = body.class_list();
            let res = if screen == Screen::End {
                classes
                    .remove_1("items-center")
                    .and_then(|_| classes.add_1("py-12"))
            } else {
                classes
                    .add_1("items-center")
                    .and_then(|_| classes.remove_1("py-12"))
            };
            res.ok();
        }
    }

    fn set_scope_label(&mut self, label: &str) {
        self.set_text("scope-display", label);
    }

    fn set_start_enabled(&mut self, enabled: bool) {
        if let Some(btn) = self.button("start-quiz-btn") {
            btn.set_disabled(!enabled);
        }
    }

    fn show_scope_dialog(&mut self, entries: &[ScopeEntry]) {
        if let Err(err) = self.try_show_scope_dialog(entries) {
            log::error!("rendering scope dialog failed: {err:?}");
        }
    }

    fn set_scope_error(&mut self, visible: bool) {
        self.set_hidden("scope-error", !visible);
    }

    fn close_scope_dialog(&mut self) {
        self.set_hidden("scope-modal", true);
    }

    fn show_question(&mut self, view: &QuestionView) {
        self.set_text("progress-text", &self.locale.progress(view.number, view.total));
        self.set_text("category-display", &self.locale.category_caption(&view.category));
        self.set_text("icon-display", &view.icon);
        self.set_text("kanji-display", &view.kanji);
        if let Some(status) = self.el("status-bar") {
            status.set_inner_html("&nbsp;");
        }
        self.set_answer_enabled(true);
    }

    fn show_feedback(&mut self, feedback: &Feedback) {
        if let Err(err) = self.try_show_feedback(feedback) {
            log::error!("rendering feedback failed: {err:?}");
        }
    }

    fn show_summary(&mut self, summary: &Summary) {
        if let Err(err) = self.try_show_summary(summary) {
            log::error!("rendering review failed: {err:?}");
        }
    }

    fn show_fatal(&mut self, lines: &[String]) {
        if let Err(err) = self.try_show_fatal(lines) {
            log::error!("rendering load failure failed: {err:?}");
        }
    }
}

// --- Wiring -----------------------------------------------------------------

thread_local! {
    static QUIZ: RefCell<Option<Controller<DomSurface, ThreadRng>>> = const { RefCell::new(None) };
}

fn dispatch(action: Action) {
    QUIZ.with(|cell| {
        if let Some(controller) = cell.borrow_mut().as_mut() {
            controller.dispatch(action);
        }
    });
}

fn answer_value(doc: &Document) -> String {
    doc.get_element_by_id(ANSWER_INPUT)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

fn document() -> Result<Document, JsValue> {
    window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Mount the quiz on the page. A failed load is reported once and nothing is
/// wired, so the start button stays disabled.
pub fn mount_quiz(loaded: Result<Dataset, DataLoadError>, config: &AppConfig) -> Result<(), JsValue> {
    let doc = document()?;
    let mut surface = DomSurface::new(doc.clone(), config.locale);
    let dataset = match loaded {
        Ok(dataset) => dataset,
        Err(err) => {
            report_load_failure(&mut surface, &err, config.locale);
            return Ok(());
        }
    };
    let controller = Controller::mount(
        dataset,
        config.question_count,
        config.locale,
        surface,
        rand::thread_rng(),
    );
    QUIZ.with(|cell| cell.replace(Some(controller)));

    for &(id, kind) in BUTTON_BINDINGS {
        let Some(el) = doc.get_element_by_id(id) else {
            log::warn!("no #{id}; {kind:?} is unreachable");
            continue;
        };
        let doc_click = doc.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            dispatch(Action::from_kind(kind, || answer_value(&doc_click)));
        }) as Box<dyn FnMut(_)>);
        el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    if let Some(input) = doc.get_element_by_id(ANSWER_INPUT) {
        let doc_key = doc.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            if evt.key() == "Enter" {
                dispatch(Action::Submit(answer_value(&doc_key)));
            }
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // One delegated listener for every checkbox the dialog renders.
    if let Some(container) = doc.get_element_by_id(SCOPE_CHECKBOXES) {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            let Some(input) = evt
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            if let Some(key) = input.get_attribute("data-key") {
                dispatch(Action::ToggleScope {
                    key,
                    checked: input.checked(),
                });
            }
        }) as Box<dyn FnMut(_)>);
        container.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}
