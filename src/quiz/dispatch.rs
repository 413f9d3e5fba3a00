//! Named user actions, the rendering surface contract and the controller that
//! ties them to the quiz state machine.

use rand::Rng;

use super::{Feedback, QuestionView, QuizEvent, QuizState, Render, ScopeEntry, ScopeSelector, Summary};
use crate::dataset::{DataLoadError, Dataset};
use crate::i18n::Locale;

// --- Surface ----------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Start,
    Practice,
    End,
}

/// Everything the controller draws to. The DOM implementation lives in
/// `crate::dom`; tests use a recording fake.
pub trait Surface {
    fn show_screen(&mut self, screen: Screen);
    fn set_scope_label(&mut self, label: &str);
    fn set_start_enabled(&mut self, enabled: bool);
    fn show_scope_dialog(&mut self, entries: &[ScopeEntry]);
    fn set_scope_error(&mut self, visible: bool);
    fn close_scope_dialog(&mut self);
    /// Clears the status line and re-enables the answer field.
    fn show_question(&mut self, view: &QuestionView);
    /// Disables the answer field until the next question.
    fn show_feedback(&mut self, feedback: &Feedback);
    fn show_summary(&mut self, summary: &Summary);
    /// Load-failure notice, one entry per line. Entries are plain text.
    fn show_fatal(&mut self, lines: &[String]);
}

// --- Actions ----------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    OpenScope,
    SelectAll,
    DeselectAll,
    ConfirmScope,
    CancelScope,
    StartQuiz,
    SubmitAnswer,
    NextQuestion,
    StopQuiz,
    Restart,
}

/// Button id -> action. `SubmitAnswer` also fires on Enter in the answer field.
pub const BUTTON_BINDINGS: &[(&str, ActionKind)] = &[
    ("modify-scope-btn", ActionKind::OpenScope),
    ("select-all-btn", ActionKind::SelectAll),
    ("deselect-all-btn", ActionKind::DeselectAll),
    ("confirm-scope-btn", ActionKind::ConfirmScope),
    ("cancel-scope-btn", ActionKind::CancelScope),
    ("start-quiz-btn", ActionKind::StartQuiz),
    ("submit-answer-btn", ActionKind::SubmitAnswer),
    ("next-question-btn", ActionKind::NextQuestion),
    ("stop-quiz-btn", ActionKind::StopQuiz),
    ("restart-btn", ActionKind::Restart),
];

impl ActionKind {
    pub fn for_element(id: &str) -> Option<Self> {
        BUTTON_BINDINGS
            .iter()
            .find(|(element, _)| *element == id)
            .map(|(_, kind)| *kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    OpenScope,
    SelectAll,
    DeselectAll,
    ToggleScope { key: String, checked: bool },
    ConfirmScope,
    CancelScope,
    StartQuiz,
    Submit(String),
    NextQuestion,
    StopQuiz,
    Restart,
}

impl Action {
    /// Build the action for a button press. `answer` is read lazily because
    /// only `SubmitAnswer` carries the field's content.
    pub fn from_kind(kind: ActionKind, answer: impl FnOnce() -> String) -> Self {
        match kind {
            ActionKind::OpenScope => Action::OpenScope,
            ActionKind::SelectAll => Action::SelectAll,
            ActionKind::DeselectAll => Action::DeselectAll,
            ActionKind::ConfirmScope => Action::ConfirmScope,
            ActionKind::CancelScope => Action::CancelScope,
            ActionKind::StartQuiz => Action::StartQuiz,
            ActionKind::SubmitAnswer => Action::Submit(answer()),
            ActionKind::NextQuestion => Action::NextQuestion,
            ActionKind::StopQuiz => Action::StopQuiz,
            ActionKind::Restart => Action::Restart,
        }
    }
}

// --- Controller -------------------------------------------------------------

pub struct Controller<S: Surface, R: Rng> {
    dataset: Dataset,
    locale: Locale,
    state: QuizState,
    selector: ScopeSelector,
    surface: S,
    rng: R,
}

impl<S: Surface, R: Rng> Controller<S, R> {
    /// Show the start screen with the full scope and enable starting.
    pub fn mount(dataset: Dataset, question_count: usize, locale: Locale, surface: S, rng: R) -> Self {
        let state = QuizState::new(&dataset, question_count);
        let mut controller = Self {
            dataset,
            locale,
            state,
            selector: ScopeSelector::default(),
            surface,
            rng,
        };
        controller.surface.show_screen(Screen::Start);
        controller.refresh_scope_label();
        controller.surface.set_start_enabled(true);
        log::info!(
            "quiz ready with {} counter categories",
            controller.dataset.len()
        );
        controller
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn dispatch(&mut self, action: Action) {
        log::debug!("dispatch {action:?}");
        match action {
            Action::OpenScope => {
                self.selector.open(&self.state.scope);
                self.surface.set_scope_error(false);
                self.redraw_scope_dialog();
            }
            Action::SelectAll => {
                self.selector.select_all(&self.dataset);
                self.redraw_scope_dialog();
            }
            Action::DeselectAll => {
                self.selector.deselect_all();
                self.redraw_scope_dialog();
            }
            Action::ToggleScope { key, checked } => self.selector.toggle(&key, checked),
            Action::ConfirmScope => match self.selector.confirm(&self.dataset) {
                Ok(scope) => {
                    self.state = std::mem::take(&mut self.state).with_scope(scope);
                    self.surface.set_scope_error(false);
                    self.surface.close_scope_dialog();
                    self.refresh_scope_label();
                }
                Err(err) => {
                    log::warn!("scope not changed: {err}");
                    self.surface.set_scope_error(true);
                }
            },
            Action::CancelScope => {
                self.selector.cancel();
                self.surface.set_scope_error(false);
                self.surface.close_scope_dialog();
            }
            Action::StartQuiz => self.apply(QuizEvent::Start),
            Action::Submit(raw) => self.apply(QuizEvent::Submit(raw)),
            Action::NextQuestion => self.apply(QuizEvent::Advance),
            Action::StopQuiz => self.apply(QuizEvent::Stop),
            Action::Restart => self.apply(QuizEvent::Restart),
        }
    }

    fn apply(&mut self, event: QuizEvent) {
        let step = std::mem::take(&mut self.state).step(event, &self.dataset, &mut self.rng);
        self.state = step.state;
        match step.render {
            Render::Nothing => {}
            Render::StartScreen => {
                self.selector.cancel();
                self.refresh_scope_label();
                self.surface.show_screen(Screen::Start);
            }
            Render::Question(view) => {
                self.surface.show_screen(Screen::Practice);
                self.surface.show_question(&view);
            }
            Render::Feedback(feedback) => self.surface.show_feedback(&feedback),
            Render::Summary(summary) => {
                log::info!("quiz finished: {} / {}", summary.correct, summary.total);
                self.surface.show_summary(&summary);
                self.surface.show_screen(Screen::End);
            }
        }
    }

    fn redraw_scope_dialog(&mut self) {
        let entries = self.selector.entries(&self.dataset);
        self.surface.show_scope_dialog(&entries);
    }

    fn refresh_scope_label(&mut self) {
        let label = self.state.scope.label(&self.dataset, self.locale);
        self.surface.set_scope_label(&label);
    }
}

/// Dataset could not be loaded: report once and leave the quiz unstartable.
pub fn report_load_failure<S: Surface>(surface: &mut S, err: &DataLoadError, locale: Locale) {
    log::error!("counter data unavailable: {err}");
    surface.set_start_enabled(false);
    surface.show_fatal(&locale.load_failure(&err.to_string()));
}
