//! Practice scope and the scope-selection dialog.

use thiserror::Error;

use crate::dataset::Dataset;
use crate::i18n::Locale;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("select at least one counter")]
    Empty,
}

/// Committed set of counter keys a quiz draws from. Never empty; kept in
/// dataset order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PracticeScope {
    keys: Vec<String>,
}

impl PracticeScope {
    /// Every key of the dataset. An empty dataset yields an empty scope, which
    /// only happens before any data is loaded.
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            keys: dataset.keys().map(str::to_string).collect(),
        }
    }

    pub fn from_selection<'a>(
        dataset: &Dataset,
        selected: impl IntoIterator<Item = &'a str> + Clone,
    ) -> Result<Self, ScopeError> {
        let keys: Vec<String> = dataset
            .keys()
            .filter(|k| selected.clone().into_iter().any(|s| s == *k))
            .map(str::to_string)
            .collect();
        if keys.is_empty() {
            return Err(ScopeError::Empty);
        }
        Ok(Self { keys })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    pub fn is_full(&self, dataset: &Dataset) -> bool {
        self.keys.len() == dataset.len() && dataset.keys().all(|k| self.contains(k))
    }

    pub fn label(&self, dataset: &Dataset, locale: Locale) -> String {
        if self.is_full(dataset) {
            return locale.all_scope().to_string();
        }
        self.keys()
            .filter_map(|k| dataset.category(k))
            .map(|c| c.name.primary.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One checkbox row of the dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopeEntry {
    pub key: String,
    pub primary: String,
    pub secondary: String,
    pub checked: bool,
}

/// In-progress selection shown in the dialog. Only `confirm` touches the
/// committed scope.
#[derive(Clone, Debug, Default)]
pub struct ScopeSelector {
    draft: Option<Vec<String>>,
}

impl ScopeSelector {
    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn open(&mut self, committed: &PracticeScope) {
        self.draft = Some(committed.keys().map(str::to_string).collect());
    }

    pub fn toggle(&mut self, key: &str, checked: bool) {
        if let Some(draft) = self.draft.as_mut() {
            draft.retain(|k| k != key);
            if checked {
                draft.push(key.to_string());
            }
        }
    }

    pub fn select_all(&mut self, dataset: &Dataset) {
        if let Some(draft) = self.draft.as_mut() {
            *draft = dataset.keys().map(str::to_string).collect();
        }
    }

    pub fn deselect_all(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            draft.clear();
        }
    }

    /// Commit the draft. On `ScopeError::Empty` the dialog stays open and the
    /// caller keeps its previous scope.
    pub fn confirm(&mut self, dataset: &Dataset) -> Result<PracticeScope, ScopeError> {
        let draft = self.draft.as_deref().unwrap_or_default();
        let scope = PracticeScope::from_selection(dataset, draft.iter().map(String::as_str))?;
        self.draft = None;
        Ok(scope)
    }

    pub fn cancel(&mut self) {
        self.draft = None;
    }

    pub fn entries(&self, dataset: &Dataset) -> Vec<ScopeEntry> {
        let draft = self.draft.as_deref().unwrap_or_default();
        dataset
            .categories()
            .map(|(key, c)| ScopeEntry {
                key: key.to_string(),
                primary: c.name.primary.clone(),
                secondary: c.name.secondary.clone(),
                checked: draft.iter().any(|k| k == key),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_json(
            r#"{"counters": {
                "つ": {"name": {"ch": "個數", "en": "General"}, "icon": ["●"], "items": []},
                "人": {"name": {"ch": "人數", "en": "People"}, "icon": ["☺"], "items": []},
                "本": {"name": {"ch": "細長", "en": "Long"}, "icon": ["|"], "items": []}
            }}"#,
        )
        .unwrap()
    }

    #[test]
    fn full_scope_is_labelled_all() {
        let ds = dataset();
        let scope = PracticeScope::all(&ds);
        assert_eq!(scope.label(&ds, Locale::English), "All");
        assert_eq!(scope.label(&ds, Locale::TraditionalChinese), "全部");
    }

    #[test]
    fn partial_scope_lists_names_in_dataset_order() {
        let ds = dataset();
        let scope = PracticeScope::from_selection(&ds, ["本", "つ"]).unwrap();
        assert_eq!(scope.keys().collect::<Vec<_>>(), vec!["つ", "本"]);
        assert_eq!(scope.label(&ds, Locale::English), "個數, 細長");
    }

    #[test]
    fn confirming_empty_selection_keeps_dialog_open() {
        let ds = dataset();
        let committed = PracticeScope::all(&ds);
        let mut sel = ScopeSelector::default();
        sel.open(&committed);
        sel.deselect_all();
        assert_eq!(sel.confirm(&ds), Err(ScopeError::Empty));
        assert!(sel.is_open());
    }

    #[test]
    fn select_all_and_toggle_only_touch_the_draft() {
        let ds = dataset();
        let committed = PracticeScope::from_selection(&ds, ["人"]).unwrap();
        let mut sel = ScopeSelector::default();
        sel.open(&committed);
        sel.select_all(&ds);
        sel.toggle("人", false);
        assert!(sel.entries(&ds).iter().all(|e| e.checked != (e.key == "人")));
        assert_eq!(committed.keys().collect::<Vec<_>>(), vec!["人"]);

        let next = sel.confirm(&ds).unwrap();
        assert_eq!(next.keys().collect::<Vec<_>>(), vec!["つ", "本"]);
        assert!(!sel.is_open());
    }

    #[test]
    fn cancel_discards_draft() {
        let ds = dataset();
        let mut sel = ScopeSelector::default();
        sel.open(&PracticeScope::all(&ds));
        sel.deselect_all();
        sel.cancel();
        assert!(!sel.is_open());
        assert!(sel.entries(&ds).iter().all(|e| !e.checked));
    }
}
