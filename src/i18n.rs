//! User-facing strings for the two bundled locales.

use serde::Deserialize;

use crate::dataset::DisplayName;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    #[default]
    #[serde(alias = "zh-TW")]
    TraditionalChinese,
    #[serde(alias = "en")]
    English,
}

impl Locale {
    pub fn progress(self, number: usize, total: usize) -> String {
        match self {
            Locale::TraditionalChinese => format!("第{number}題 / 共{total}題"),
            Locale::English => format!("Question {number} / {total}"),
        }
    }

    pub fn category_caption(self, name: &DisplayName) -> String {
        format!("{} ({})", name.primary, name.secondary)
    }

    pub fn all_scope(self) -> &'static str {
        match self {
            Locale::TraditionalChinese => "全部",
            Locale::English => "All",
        }
    }

    pub fn correct(self) -> &'static str {
        match self {
            Locale::TraditionalChinese => "答對了！",
            Locale::English => "Correct!",
        }
    }

    /// Status line prefix shown before the accepted readings.
    pub fn incorrect(self) -> &'static str {
        match self {
            Locale::TraditionalChinese => "答錯了... 正確答案是: ",
            Locale::English => "Not quite... the answer is: ",
        }
    }

    pub fn reading_alternatives(self, readings: &[String]) -> String {
        readings.join(" or ")
    }

    pub fn final_score(self, correct: usize, total: usize) -> String {
        match self {
            Locale::TraditionalChinese => format!("您答對了 {correct} / {total} 題！"),
            Locale::English => format!("You got {correct} / {total} right!"),
        }
    }

    /// Column captions of the review table: prompt, answer, verdict, readings.
    pub fn review_labels(self) -> [&'static str; 4] {
        match self {
            Locale::TraditionalChinese => ["題目", "您的答案", "正解？", "正確答案"],
            Locale::English => ["Prompt", "Your answer", "Correct?", "Answers"],
        }
    }

    pub fn review_marker(self, correct: bool) -> &'static str {
        if correct { "✅" } else { "❌" }
    }

    /// Lines of the load-failure notice. The surface puts each on its own line.
    pub fn load_failure(self, reason: &str) -> Vec<String> {
        let (heading, footer) = match self {
            Locale::TraditionalChinese => ("錯誤：", "無法初始化應用程式。"),
            Locale::English => ("Error:", "The app could not start."),
        };
        vec![heading.to_string(), reason.to_string(), footer.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_one_based_text() {
        assert_eq!(Locale::TraditionalChinese.progress(1, 10), "第1題 / 共10題");
        assert_eq!(Locale::English.progress(3, 4), "Question 3 / 4");
    }

    #[test]
    fn load_failure_keeps_reason_verbatim_on_its_own_line() {
        let lines = Locale::English.load_failure("bad <b>一本</b>");
        assert_eq!(lines, vec!["Error:", "bad <b>一本</b>", "The app could not start."]);
        assert!(Locale::TraditionalChinese.load_failure("x").iter().all(|l| !l.contains("<br>")));
    }

    #[test]
    fn locale_parses_from_config_names() {
        let l: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(l, Locale::English);
        let l: Locale = serde_json::from_str("\"traditional-chinese\"").unwrap();
        assert_eq!(l, Locale::TraditionalChinese);
    }
}
