use crate::domain::model::{Day, MealType, Plan, SlotKey};
use crate::domain::recipe::{Recipe, MAX_INGREDIENTS};
use serde::Serialize;
use strum::VariantArray;

const CALORIES_PER_INGREDIENT: u32 = 40;

fn base_calories(meal_type: MealType) -> u32 {
    match meal_type {
        MealType::Breakfast => 400,
        MealType::Lunch => 600,
        MealType::Dinner => 700,
    }
}

/// Rough placeholder: a per-meal base plus a flat amount per ingredient.
///
/// Every non-empty ingredient field counts here, blank-looking ones included.
pub fn estimate_calories(recipe: &Recipe, meal_type: MealType) -> u32 {
    let ingredients = recipe
        .ingredients
        .iter()
        .take(MAX_INGREDIENTS)
        .filter(|pair| pair.ingredient.as_deref().is_some_and(|name| !name.is_empty()))
        .count() as u32;
    base_calories(meal_type) + ingredients * CALORIES_PER_INGREDIENT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalorieSummary {
    pub per_day: Vec<(Day, u64)>,
    pub week_total: u64,
    pub daily_average: u64,
}

impl CalorieSummary {
    pub fn from_plan(plan: &Plan) -> Self {
        let per_day: Vec<(Day, u64)> = Day::VARIANTS
            .iter()
            .map(|day| (*day, day_calories(plan, *day)))
            .collect();
        let week_total: u64 = per_day.iter().map(|(_, total)| total).sum();
        let daily_average = (week_total as f64 / Day::VARIANTS.len() as f64).round() as u64;

        Self {
            per_day,
            week_total,
            daily_average,
        }
    }
}

/// Widened to `u64` so slots holding huge stored values cannot overflow.
pub fn day_calories(plan: &Plan, day: Day) -> u64 {
    MealType::VARIANTS
        .iter()
        .filter_map(|meal_type| plan.get(SlotKey::new(day, *meal_type)))
        .filter_map(|meal| meal.calories)
        .map(u64::from)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recipe::IngredientPair;

    #[test]
    fn test_estimate_uses_meal_base_and_ingredient_count() {
        let recipe = Recipe {
            id: "1".to_string(),
            name: "Omelette".to_string(),
            ingredients: vec![
                IngredientPair::new("Eggs", "3"),
                IngredientPair::new("Butter", "1 tbs"),
                IngredientPair::new(" ", ""),
                IngredientPair::new("", ""),
                IngredientPair::default(),
            ],
            ..Default::default()
        };

        // the whitespace-only ingredient still counts, empty and missing ones do not
        assert_eq!(estimate_calories(&recipe, MealType::Breakfast), 520);
        assert_eq!(estimate_calories(&recipe, MealType::Dinner), 820);
    }

    #[test]
    fn test_summary_handles_huge_stored_values() {
        let stored = serde_json::json!({
            "Monday-breakfast": {"recipeId": "1", "recipeName": "Feast", "calories": 3000000000u64},
            "Monday-dinner": {"recipeId": "2", "recipeName": "Banquet", "calories": 3000000000u64},
            "Tuesday-lunch": {"recipeId": "3", "recipeName": "Buffet", "calories": 1e12},
        });
        let plan = Plan::from_persisted(stored.to_string().as_bytes()).unwrap();

        let summary = CalorieSummary::from_plan(&plan);

        assert_eq!(summary.per_day[0], (Day::Monday, 6_000_000_000));
        assert_eq!(summary.per_day[1], (Day::Tuesday, u32::MAX as u64));
        assert_eq!(summary.week_total, 6_000_000_000 + u32::MAX as u64);
    }

    #[test]
    fn test_summary_totals_and_average() {
        let plan = Plan::initialize()
            .add_recipe(SlotKey::new(Day::Monday, MealType::Breakfast), "1", "Oats", None, Some(500))
            .unwrap()
            .add_recipe(SlotKey::new(Day::Monday, MealType::Dinner), "2", "Stew", None, Some(900))
            .unwrap()
            .add_recipe(SlotKey::new(Day::Friday, MealType::Lunch), "3", "Wrap", None, None)
            .unwrap()
            .add_recipe(SlotKey::new(Day::Sunday, MealType::Lunch), "4", "Roast", None, Some(700))
            .unwrap();

        let summary = CalorieSummary::from_plan(&plan);

        assert_eq!(summary.per_day[0], (Day::Monday, 1400));
        assert_eq!(summary.per_day[4], (Day::Friday, 0));
        assert_eq!(summary.week_total, 2100);
        assert_eq!(summary.daily_average, 300);
    }
}
