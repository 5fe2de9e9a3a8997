use crate::domain::model::{Plan, PlannedRecipe};
use crate::domain::ports::RecipeDirectory;
use crate::domain::recipe::Recipe;
use crate::domain::shopping::{FailureReason, IngredientLine, ResolutionFailure, ShoppingList};
use futures::stream::{self, StreamExt};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Resolves every distinct planned recipe and merges their ingredients.
///
/// Lookups run concurrently (at most `concurrency` at a time) but results are
/// merged in planned-recipe order, so completion order never changes the list.
/// Recipes that fail to resolve are skipped and reported in `failures`.
pub async fn build_shopping_list<D>(plan: &Plan, directory: &D, concurrency: usize) -> ShoppingList
where
    D: RecipeDirectory + ?Sized,
{
    let planned = plan.planned_recipes();
    if planned.is_empty() {
        return ShoppingList::default();
    }

    tracing::info!("Resolving {} planned recipes", planned.len());

    let outcomes: Vec<_> = stream::iter(planned.iter())
        .map(|recipe| async move { (recipe, directory.get_by_id(&recipe.id).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut resolved = Vec::with_capacity(planned.len());
    let mut failures = Vec::new();

    for (planned_recipe, outcome) in outcomes {
        match outcome {
            Ok(Some(recipe)) => resolved.push(recipe),
            Ok(None) => {
                tracing::warn!("Recipe {} is not in the directory", planned_recipe.id);
                failures.push(failure(planned_recipe, FailureReason::NotFound));
            }
            Err(e) => {
                tracing::warn!("Skipping recipe {}: {}", planned_recipe.id, e);
                failures.push(failure(planned_recipe, FailureReason::Fetch(e.to_string())));
            }
        }
    }

    let lines = merge_ingredients(&resolved);
    tracing::info!(
        "Shopping list has {} ingredients from {} recipes ({} skipped)",
        lines.len(),
        resolved.len(),
        failures.len()
    );

    ShoppingList {
        lines,
        failures,
        recipes_requested: planned.len(),
    }
}

fn failure(recipe: &PlannedRecipe, reason: FailureReason) -> ResolutionFailure {
    ResolutionFailure {
        recipe_id: recipe.id.clone(),
        recipe_name: recipe.name.clone(),
        reason,
    }
}

/// Merges ingredients by lower-cased name.
///
/// Names and measures are used exactly as the directory returns them.
/// Measures are kept once each (exact, case-sensitive match) in first-seen
/// order and blank ones are skipped. The display name is rebuilt from the
/// lower-cased key with only its first letter upper-cased, so "Sea Salt" is
/// listed as "Sea salt".
pub fn merge_ingredients<'a>(recipes: impl IntoIterator<Item = &'a Recipe>) -> Vec<IngredientLine> {
    let mut merged: HashMap<String, Vec<String>> = HashMap::new();

    for recipe in recipes {
        for (ingredient, measure) in recipe.present_ingredients() {
            let measures = merged.entry(ingredient.to_lowercase()).or_default();
            if !measure.trim().is_empty() && !measures.iter().any(|m| m == measure) {
                measures.push(measure.to_string());
            }
        }
    }

    let mut lines: Vec<IngredientLine> = merged
        .into_iter()
        .map(|(key, measures)| IngredientLine {
            name: display_name(&key),
            measures,
            checked: false,
        })
        .collect();

    lines.sort_by(|a, b| locale_compare(&a.name, &b.name));
    lines
}

fn display_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Dictionary ordering: accents and case only matter when the base letters tie.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let base = |s: &str| -> Vec<char> { s.chars().flat_map(char::to_lowercase).map(fold_accent).collect() };
    let lower = |s: &str| s.to_lowercase();

    base(a)
        .cmp(&base(b))
        .then_with(|| lower(a).cmp(&lower(b)))
        // lower case sorts before upper case
        .then_with(|| b.cmp(a))
}

/// Single-character folds only. Ligatures and sharp s (æ, œ, ß) are left as
/// they are, so they sort after `z` instead of expanding to `ae`/`oe`/`ss`.
fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'ñ' | 'ń' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => 'o',
        'ś' | 'š' => 's',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}
