//! Browse-list query: free text, subject facet, level ceiling and sort.

use crate::{AssessmentTest, SortKey, SubjectFacet};
use std::cmp::Ordering;

/// Ephemeral query parameters of the browse list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListQuery {
    pub text: String,
    pub subject: SubjectFacet,
    /// Keep tests with `level <= ceiling`.
    pub level_ceiling: Option<i64>,
    pub sort: SortKey,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply raw level-ceiling input. Blank clears the ceiling, a positive
    /// number sets it, anything else leaves it unchanged. Returns whether the
    /// input was accepted.
    pub fn set_level_ceiling_input(&mut self, input: &str) -> bool {
        let input = input.trim();
        if input.is_empty() {
            self.level_ceiling = None;
            return true;
        }
        match input.parse::<i64>() {
            Ok(ceiling) if ceiling > 0 => {
                self.level_ceiling = Some(ceiling);
                true
            }
            _ => false,
        }
    }

    /// Reset every parameter to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn has_filters(&self) -> bool {
        !self.text.trim().is_empty()
            || self.subject != SubjectFacet::All
            || self.level_ceiling.is_some()
    }

    /// Whether `test` passes the facet, ceiling and text predicates.
    pub fn matches(&self, test: &AssessmentTest) -> bool {
        if !self.subject.admits(test.subject) {
            return false;
        }
        if let Some(ceiling) = self.level_ceiling {
            if test.level > ceiling {
                return false;
            }
        }
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        haystack(test).contains(&needle)
    }
}

fn haystack(test: &AssessmentTest) -> String {
    format!("{} {} {}", test.name, test.subject.as_str(), test.level).to_lowercase()
}

/// Derive the filtered, sorted view. The input is never reordered.
pub fn apply<'a>(tests: &'a [AssessmentTest], query: &ListQuery) -> Vec<&'a AssessmentTest> {
    let mut view: Vec<&AssessmentTest> = tests.iter().filter(|t| query.matches(t)).collect();
    view.sort_by(|a, b| compare(a, b, query.sort));
    view
}

fn compare(a: &AssessmentTest, b: &AssessmentTest, sort: SortKey) -> Ordering {
    match sort {
        SortKey::Name => compare_names(&a.name, &b.name),
        SortKey::Level => b.level.cmp(&a.level),
        SortKey::Updated => b.last_updated.cmp(&a.last_updated),
    }
}

// Case-folded first so "apple" sorts beside "Apple", raw text breaks ties.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
