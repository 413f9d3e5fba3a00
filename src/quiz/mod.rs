//! Quiz session state machine.
//!
//! `NotStarted -> InProgress(cursor) -> Terminal`. Every transition is a pure
//! function of the current state, an event, the dataset and an rng; the
//! returned `Step` tells the surface what to draw. DOM wiring lives in
//! `crate::dom`, the action table in `dispatch`.

pub mod dispatch;
pub mod scope;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::dataset::{CounterItem, Dataset, DisplayName};
pub use scope::{PracticeScope, ScopeEntry, ScopeError, ScopeSelector};

// --- Questions & records ----------------------------------------------------

/// A counter item tagged with its category's icons and name. Immutable once drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub category_key: String,
    pub category_name: DisplayName,
    pub category_icons: Vec<String>,
    pub item: CounterItem,
}

impl Question {
    fn from_item(key: &str, name: &DisplayName, icons: &[String], item: &CounterItem) -> Self {
        Self {
            category_key: key.to_string(),
            category_name: name.clone(),
            category_icons: icons.to_vec(),
            item: item.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerRecord {
    /// Position of the question in the session.
    pub index: usize,
    pub question: Question,
    pub answer: String,
    pub correct: bool,
}

/// Every in-scope item, tagged, in scope then item order.
pub fn question_pool(dataset: &Dataset, scope: &PracticeScope) -> Vec<Question> {
    scope
        .keys()
        .filter_map(|key| dataset.category(key).map(|c| (key, c)))
        .flat_map(|(key, c)| {
            c.items
                .iter()
                .map(move |item| Question::from_item(key, &c.name, &c.icons, item))
        })
        .collect()
}

/// Uniform shuffle of the pool, truncated to `count`.
pub fn draw_questions<R: Rng + ?Sized>(
    dataset: &Dataset,
    scope: &PracticeScope,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut pool = question_pool(dataset, scope);
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}

// --- Session ----------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizSession {
    questions: Vec<Question>,
    cursor: usize,
    records: Vec<AnswerRecord>,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            cursor: 0,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn current(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.questions.len()
    }

    /// Whether the question under the cursor already has a record.
    pub fn is_answered(&self) -> bool {
        self.records.last().map(|r| r.index) == Some(self.cursor)
    }

    /// Grade `raw` against the current question. Returns `None` for blank
    /// input, an already answered question, or a finished session.
    fn submit(&mut self, raw: &str) -> Option<&AnswerRecord> {
        let answer = raw.trim();
        if answer.is_empty() || self.is_answered() {
            return None;
        }
        let question = self.current()?.clone();
        let correct = question.item.accepts(answer);
        self.records.push(AnswerRecord {
            index: self.cursor,
            question,
            answer: answer.to_string(),
            correct,
        });
        self.records.last()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            correct: self.records.iter().filter(|r| r.correct).count(),
            total: self.questions.len(),
            rows: self
                .records
                .iter()
                .map(|r| ReviewRow {
                    kanji: r.question.item.kanji.clone(),
                    answer: r.answer.clone(),
                    correct: r.correct,
                    readings: r.question.item.readings.clone(),
                })
                .collect(),
        }
    }
}

// --- Views ------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position.
    pub number: usize,
    pub total: usize,
    pub category: DisplayName,
    pub icon: String,
    pub kanji: String,
}

impl QuestionView {
    fn of<R: Rng + ?Sized>(session: &QuizSession, rng: &mut R) -> Option<Self> {
        let q = session.current()?;
        Some(Self {
            number: session.cursor + 1,
            total: session.len(),
            category: q.category_name.clone(),
            icon: q.category_icons.choose(rng).cloned().unwrap_or_default(),
            kanji: q.item.kanji.clone(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { readings: Vec<String> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRow {
    pub kanji: String,
    pub answer: String,
    pub correct: bool,
    pub readings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub correct: usize,
    pub total: usize,
    pub rows: Vec<ReviewRow>,
}

// --- State machine ----------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    NotStarted,
    InProgress(QuizSession),
    Terminal(QuizSession),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizEvent {
    Start,
    Submit(String),
    Advance,
    Stop,
    Restart,
}

/// What the surface should show after a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Render {
    Nothing,
    StartScreen,
    Question(QuestionView),
    Feedback(Feedback),
    Summary(Summary),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizState {
    pub scope: PracticeScope,
    pub question_count: usize,
    pub phase: Phase,
}

#[derive(Debug)]
pub struct Step {
    pub state: QuizState,
    pub render: Render,
}

impl QuizState {
    pub fn new(dataset: &Dataset, question_count: usize) -> Self {
        Self {
            scope: PracticeScope::all(dataset),
            question_count,
            phase: Phase::NotStarted,
        }
    }

    pub fn session(&self) -> Option<&QuizSession> {
        match &self.phase {
            Phase::NotStarted => None,
            Phase::InProgress(s) | Phase::Terminal(s) => Some(s),
        }
    }

    pub fn with_scope(self, scope: PracticeScope) -> Self {
        Self { scope, ..self }
    }

    pub fn step<R: Rng + ?Sized>(self, event: QuizEvent, dataset: &Dataset, rng: &mut R) -> Step {
        let QuizState {
            scope,
            question_count,
            phase,
        } = self;
        let (phase, render) = match (phase, event) {
            (_, QuizEvent::Restart) => {
                return Step {
                    state: QuizState::new(dataset, question_count),
                    render: Render::StartScreen,
                };
            }
            (Phase::NotStarted, QuizEvent::Start) => {
                let questions = draw_questions(dataset, &scope, question_count, rng);
                display(QuizSession::new(questions), rng)
            }
            (Phase::InProgress(mut session), QuizEvent::Submit(raw)) => {
                let render = match session.submit(&raw) {
                    Some(record) if record.correct => Render::Feedback(Feedback::Correct),
                    Some(record) => Render::Feedback(Feedback::Incorrect {
                        readings: record.question.item.readings.clone(),
                    }),
                    None => Render::Nothing,
                };
                (Phase::InProgress(session), render)
            }
            (Phase::InProgress(mut session), QuizEvent::Advance) => {
                session.cursor += 1;
                display(session, rng)
            }
            (Phase::InProgress(session), QuizEvent::Stop) => {
                let summary = session.summary();
                (Phase::Terminal(session), Render::Summary(summary))
            }
            (phase, _) => (phase, Render::Nothing),
        };
        Step {
            state: QuizState {
                scope,
                question_count,
                phase,
            },
            render,
        }
    }
}

/// Show the question under the cursor, or end the session when none is left.
fn display<R: Rng + ?Sized>(session: QuizSession, rng: &mut R) -> (Phase, Render) {
    match QuestionView::of(&session, rng) {
        Some(view) => (Phase::InProgress(session), Render::Question(view)),
        None => {
            let summary = session.summary();
            (Phase::Terminal(session), Render::Summary(summary))
        }
    }
}
