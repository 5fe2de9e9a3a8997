use serde::{Deserialize, Serialize};

/// Directory records carry at most this many ingredient/measure pairs.
pub const MAX_INGREDIENTS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientPair {
    pub ingredient: Option<String>,
    pub measure: Option<String>,
}

impl IngredientPair {
    pub fn new(ingredient: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            ingredient: Some(ingredient.into()),
            measure: Some(measure.into()),
        }
    }

    /// A pair counts only when its ingredient is non-blank.
    pub fn is_present(&self) -> bool {
        self.ingredient
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub area: Option<String>,
    pub instructions: Option<String>,
    pub thumbnail: Option<String>,
    pub tags: Option<String>,
    pub youtube: Option<String>,
    pub ingredients: Vec<IngredientPair>,
}

impl Recipe {
    /// Present pairs as stored `(ingredient, measure)`; a missing measure is `""`.
    /// Whitespace is only looked at to decide presence, never stripped.
    pub fn present_ingredients(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.ingredients
            .iter()
            .take(MAX_INGREDIENTS)
            .filter(|pair| pair.is_present())
            .map(|pair| {
                (
                    pair.ingredient.as_deref().unwrap_or_default(),
                    pair.measure.as_deref().unwrap_or_default(),
                )
            })
    }

    pub fn ingredient_count(&self) -> usize {
        self.present_ingredients().count()
    }
}
