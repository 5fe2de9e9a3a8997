use serde::Serialize;
use std::fmt;

/// One row of the aggregated shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientLine {
    pub name: String,
    /// Distinct measures in the order they were first seen.
    pub measures: Vec<String>,
    pub checked: bool,
}

impl IngredientLine {
    pub fn measure(&self) -> String {
        self.measures.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    NotFound,
    Fetch(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NotFound => write!(f, "not found in the directory"),
            FailureReason::Fetch(message) => write!(f, "{}", message),
        }
    }
}

/// A planned recipe whose ingredients did not make it into the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    pub recipe_id: String,
    pub recipe_name: String,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    pub lines: Vec<IngredientLine>,
    pub failures: Vec<ResolutionFailure>,
    pub recipes_requested: usize,
}

impl ShoppingList {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn checked_count(&self) -> usize {
        self.lines.iter().filter(|line| line.checked).count()
    }

    /// Flips the checkbox of the line at `index`; returns false when out of range.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.lines.get_mut(index) {
            Some(line) => {
                line.checked = !line.checked;
                true
            }
            None => false,
        }
    }

    /// Marks every line whose name matches (case-insensitively).
    pub fn check_by_name(&mut self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        let mut found = false;
        for line in self.lines.iter_mut().filter(|l| l.name.to_lowercase() == needle) {
            line.checked = true;
            found = true;
        }
        found
    }

    /// Summary for the user when some recipes could not be resolved.
    pub fn notification(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }

        let names: Vec<&str> = self
            .failures
            .iter()
            .map(|f| f.recipe_name.as_str())
            .collect();

        Some(format!(
            "Could not load {} of {} planned recipes ({}); the list only covers the rest",
            self.failures.len(),
            self.recipes_requested,
            names.join(", ")
        ))
    }
}
