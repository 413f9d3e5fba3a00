// Integration tests (native) for the `josuushi-quiz` crate.
// These drive the public controller and animator APIs headless, with a
// recording surface in place of the DOM.

use josuushi_quiz::background::{Animator, PatternSurface, Rect, TileLayout, Vocabulary};
use josuushi_quiz::config::{AnimationConfig, AppConfig};
use josuushi_quiz::dataset::Dataset;
use josuushi_quiz::i18n::Locale;
use josuushi_quiz::quiz::dispatch::{Action, Controller, Screen, Surface, report_load_failure};
use josuushi_quiz::quiz::{Feedback, Phase, QuestionView, ScopeEntry, Summary};
use rand::SeedableRng;
use rand::rngs::StdRng;

const FIXTURE: &str = include_str!("fixtures/jyosuushi.json");

#[derive(Default)]
struct Page {
    screen: Option<Screen>,
    label: String,
    start_enabled: bool,
    scope_error: bool,
    question: Option<QuestionView>,
    feedback: Vec<Feedback>,
    summary: Option<Summary>,
    fatal: Vec<Vec<String>>,
}

impl Surface for Page {
    fn show_screen(&mut self, screen: Screen) {
        self.screen = Some(screen);
    }
    fn set_scope_label(&mut self, label: &str) {
        self.label = label.to_string();
    }
    fn set_start_enabled(&mut self, enabled: bool) {
        self.start_enabled = enabled;
    }
    fn show_scope_dialog(&mut self, _entries: &[ScopeEntry]) {}
    fn set_scope_error(&mut self, visible: bool) {
        self.scope_error = visible;
    }
    fn close_scope_dialog(&mut self) {}
    fn show_question(&mut self, view: &QuestionView) {
        self.question = Some(view.clone());
    }
    fn show_feedback(&mut self, feedback: &Feedback) {
        self.feedback.push(feedback.clone());
    }
    fn show_summary(&mut self, summary: &Summary) {
        self.summary = Some(summary.clone());
    }
    fn show_fatal(&mut self, lines: &[String]) {
        self.fatal.push(lines.to_vec());
    }
}

fn controller(seed: u64) -> Controller<Page, StdRng> {
    let ds = Dataset::from_json(FIXTURE).unwrap();
    Controller::mount(ds, 10, Locale::TraditionalChinese, Page::default(), StdRng::seed_from_u64(seed))
}

fn current_readings(c: &Controller<Page, StdRng>) -> Vec<String> {
    c.state().session().and_then(|s| s.current()).unwrap().item.readings.clone()
}

#[test]
fn full_round_with_mixed_answers() {
    let mut c = controller(2024);
    assert!(c.surface().start_enabled);
    assert_eq!(c.surface().label, "全部");

    c.dispatch(Action::StartQuiz);
    assert_eq!(c.state().session().unwrap().len(), 10);
    for n in 0..10 {
        assert_eq!(c.surface().question.as_ref().unwrap().number, n + 1);
        let answer = if n % 2 == 0 {
            current_readings(&c).last().unwrap().clone()
        } else {
            "わからない".to_string()
        };
        c.dispatch(Action::Submit(answer));
        c.dispatch(Action::NextQuestion);
    }

    let summary = c.surface().summary.clone().unwrap();
    assert_eq!(c.surface().screen, Some(Screen::End));
    assert_eq!((summary.correct, summary.total), (5, 10));
    assert!(summary.rows.iter().step_by(2).all(|r| r.correct));
    assert!(summary.rows.iter().skip(1).step_by(2).all(|r| !r.correct && r.answer == "わからない"));
}

#[test]
fn scoped_quiz_only_draws_from_selected_counter() {
    let mut c = controller(7);
    c.dispatch(Action::OpenScope);
    c.dispatch(Action::DeselectAll);
    c.dispatch(Action::ToggleScope { key: "匹".into(), checked: true });
    c.dispatch(Action::ConfirmScope);
    assert_eq!(c.surface().label, "小動物");

    c.dispatch(Action::StartQuiz);
    let session = c.state().session().unwrap();
    assert_eq!(session.len(), 3);
    assert!(session.questions().iter().all(|q| q.category_key == "匹"));
    let view = c.surface().question.clone().unwrap();
    assert!(["🐈", "🐕", "🐟"].contains(&view.icon.as_str()));
    assert_eq!(view.category.secondary, "Small animals");
}

#[test]
fn readings_must_match_exactly() {
    let mut c = controller(3);
    c.dispatch(Action::OpenScope);
    c.dispatch(Action::DeselectAll);
    c.dispatch(Action::ToggleScope { key: "人".into(), checked: true });
    c.dispatch(Action::ConfirmScope);
    c.dispatch(Action::StartQuiz);

    let expected = current_readings(&c);
    let katakana: String = expected[0]
        .chars()
        .map(|ch| char::from_u32(ch as u32 + 0x60).unwrap_or(ch))
        .collect();
    c.dispatch(Action::Submit(katakana));
    assert_eq!(
        c.surface().feedback.last(),
        Some(&Feedback::Incorrect { readings: expected })
    );
    // Input is locked until the next question.
    c.dispatch(Action::Submit("ひとり".into()));
    assert_eq!(c.surface().feedback.len(), 1);
    assert_eq!(c.state().session().unwrap().records().len(), 1);
}

#[test]
fn stop_and_restart_clear_everything() {
    let mut c = controller(5);
    c.dispatch(Action::OpenScope);
    c.dispatch(Action::ToggleScope { key: "つ".into(), checked: false });
    c.dispatch(Action::ConfirmScope);
    assert_eq!(c.surface().label, "人數, 細長物品, 小動物, 薄平物品");
    c.dispatch(Action::StartQuiz);
    c.dispatch(Action::StopQuiz);
    assert_eq!(c.surface().summary.as_ref().unwrap().rows.len(), 0);

    c.dispatch(Action::Restart);
    assert_eq!(c.state().phase, Phase::NotStarted);
    assert_eq!(c.surface().screen, Some(Screen::Start));
    assert_eq!(c.surface().label, "全部");
}

#[test]
fn failed_load_keeps_quiz_locked() {
    let mut page = Page::default();
    let err = Dataset::from_json("<html>404</html>").unwrap_err();
    report_load_failure(&mut page, &err, Locale::TraditionalChinese);
    assert!(!page.start_enabled);
    assert_eq!(page.fatal.len(), 1);
    assert_eq!(page.fatal[0].last().map(String::as_str), Some("無法初始化應用程式。"));
}

#[test]
fn load_failure_passes_data_strings_through_as_text() {
    let mut page = Page::default();
    let json = r#"{"counters": {"本": {"name": {"ch": "a", "en": "b"}, "icon": ["|"],
        "items": [{"kanji": "<img src=x onerror=alert(1)>", "hiragana": []}]}}}"#;
    let err = Dataset::from_json(json).unwrap_err();
    report_load_failure(&mut page, &err, Locale::English);
    let lines = &page.fatal[0];
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("<img src=x onerror=alert(1)>"));
    assert!(lines.iter().all(|l| !l.contains("<br>")));
}

#[test]
fn default_config_matches_shipped_page() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.data_url, "jyosuushi.json");
    assert_eq!(cfg.question_count, 10);
    assert_eq!(cfg.animation, AnimationConfig::default());
}

struct Viewport {
    fills: Vec<Rect>,
}

impl PatternSurface for Viewport {
    fn size(&self) -> (f64, f64) {
        (1280.0, 720.0)
    }
    fn clear(&mut self, _: f64, _: f64) {}
    fn translate(&mut self, _: f64, _: f64) {}
    fn fill_pattern(&mut self, rect: Rect) {
        self.fills.push(rect);
    }
    fn reset_transform(&mut self) {}
}

#[test]
fn background_motion_is_periodic() {
    let layout = TileLayout::new(&AnimationConfig::default());
    let mut anim = Animator::new(&layout, 0.2);
    let mut vp = Viewport { fills: Vec::new() };
    // 2500 frames moves x by exactly one tile side.
    for _ in 0..2500 {
        anim.render_frame(&mut vp);
    }
    let off = anim.offset();
    assert!(off.x < 1e-6 || (500.0 - off.x) < 1e-6, "x offset {}", off.x);
    assert!((off.y - 250.0).abs() < 1e-6, "y offset {}", off.y);
    assert!(vp.fills.iter().all(|r| r.x <= 0.0 && r.x + r.width >= 1280.0 - 1e-9));
}

#[test]
fn fallback_tile_uses_builtin_glyphs() {
    let layout = TileLayout::new(&AnimationConfig::default());
    let vocab = Vocabulary::fallback();
    for (_, _, g) in layout.cells(&vocab) {
        assert!(["■", "▲", "●"].contains(&g));
    }
    assert_eq!(layout.glyph_at(&vocab, 4, 7), layout.glyph_at(&vocab, 4, 19));
}
