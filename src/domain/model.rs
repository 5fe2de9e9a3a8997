use crate::utils::error::{PlannerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString, VariantArray};

/// Number of cells in the weekly grid: 7 days x 3 meals.
pub const SLOT_COUNT: usize = 21;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantArray,
)]
#[strum(ascii_case_insensitive)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub fn today() -> Self {
        use chrono::Datelike;
        chrono::Local::now().weekday().into()
    }
}

impl From<chrono::Weekday> for Day {
    fn from(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Day::Monday,
            chrono::Weekday::Tue => Day::Tuesday,
            chrono::Weekday::Wed => Day::Wednesday,
            chrono::Weekday::Thu => Day::Thursday,
            chrono::Weekday::Fri => Day::Friday,
            chrono::Weekday::Sat => Day::Saturday,
            chrono::Weekday::Sun => Day::Sunday,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

/// Address of one grid cell, rendered as `"{Day}-{mealType}"` (e.g. `Monday-breakfast`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub day: Day,
    pub meal_type: MealType,
}

impl SlotKey {
    pub const fn new(day: Day, meal_type: MealType) -> Self {
        Self { day, meal_type }
    }

    /// All 21 keys, Monday breakfast first and Sunday dinner last.
    pub fn all() -> impl Iterator<Item = SlotKey> {
        Day::VARIANTS.iter().flat_map(|day| {
            MealType::VARIANTS
                .iter()
                .map(move |meal_type| SlotKey::new(*day, *meal_type))
        })
    }

    /// Strict lookup for stored keys: only the exact `"{Day}-{mealType}"`
    /// spelling matches, with no `today` alias and no case folding.
    pub fn from_canonical(s: &str) -> Option<SlotKey> {
        SlotKey::all().find(|key| key.to_string() == s)
    }

    fn index(self) -> usize {
        self.day as usize * MealType::VARIANTS.len() + self.meal_type as usize
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day, self.meal_type)
    }
}

impl FromStr for SlotKey {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PlannerError::InvalidSlotKey { key: s.to_string() };

        let (day, meal_type) = s.trim().split_once('-').ok_or_else(invalid)?;
        let day = if day.eq_ignore_ascii_case("today") {
            Day::today()
        } else {
            day.parse::<Day>().map_err(|_| invalid())?
        };
        let meal_type = meal_type.parse::<MealType>().map_err(|_| invalid())?;

        Ok(SlotKey::new(day, meal_type))
    }
}

/// Recipe assigned to a slot. A slot holding one of these is never "half empty".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedMeal {
    pub recipe_id: String,
    pub recipe_name: String,
    pub recipe_image: Option<String>,
    pub calories: Option<u32>,
}

impl PlannedMeal {
    pub fn new(
        recipe_id: impl Into<String>,
        recipe_name: impl Into<String>,
        recipe_image: Option<String>,
        calories: Option<u32>,
    ) -> Result<Self> {
        let recipe_id = recipe_id.into();
        let recipe_name = recipe_name.into();

        if recipe_id.trim().is_empty() {
            return Err(PlannerError::InvalidRecipe {
                reason: "recipe id is empty".to_string(),
            });
        }
        if recipe_name.trim().is_empty() {
            return Err(PlannerError::InvalidRecipe {
                reason: format!("recipe {} has no name", recipe_id),
            });
        }

        Ok(Self {
            recipe_id,
            recipe_name,
            recipe_image,
            calories,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRecipe {
    pub id: String,
    pub name: String,
}

/// Immutable weekly plan. Every mutation returns a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    slots: [Option<PlannedMeal>; SLOT_COUNT],
}

impl Plan {
    pub fn initialize() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub fn get(&self, key: SlotKey) -> Option<&PlannedMeal> {
        self.slots[key.index()].as_ref()
    }

    pub fn slots(&self) -> impl Iterator<Item = (SlotKey, Option<&PlannedMeal>)> + '_ {
        SlotKey::all().map(move |key| (key, self.get(key)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Last write wins: whatever was in the slot is replaced.
    pub fn add_recipe(
        &self,
        key: SlotKey,
        recipe_id: impl Into<String>,
        recipe_name: impl Into<String>,
        recipe_image: Option<String>,
        calories: Option<u32>,
    ) -> Result<Plan> {
        let meal = PlannedMeal::new(recipe_id, recipe_name, recipe_image, calories)?;
        Ok(self.with_meal(key, meal))
    }

    pub fn with_meal(&self, key: SlotKey, meal: PlannedMeal) -> Plan {
        let mut next = self.clone();
        next.slots[key.index()] = Some(meal);
        next
    }

    pub fn remove_recipe(&self, key: SlotKey) -> Plan {
        let mut next = self.clone();
        next.slots[key.index()] = None;
        next
    }

    /// Distinct recipes in the plan, first occurrence in slot order.
    pub fn planned_recipes(&self) -> Vec<PlannedRecipe> {
        let mut recipes: Vec<PlannedRecipe> = Vec::new();

        for meal in self.slots.iter().flatten() {
            if !recipes.iter().any(|r| r.id == meal.recipe_id) {
                recipes.push(PlannedRecipe {
                    id: meal.recipe_id.clone(),
                    name: meal.recipe_name.clone(),
                });
            }
        }

        recipes
    }

    pub fn to_persisted(&self) -> Result<Vec<u8>> {
        let entries: BTreeMap<String, PersistedSlot<'_>> = self
            .slots()
            .map(|(key, meal)| (key.to_string(), PersistedSlot::new(key, meal)))
            .collect();

        Ok(serde_json::to_vec(&entries)?)
    }

    /// Parses the stored layout and heals it to the full 21-slot grid:
    /// missing, unreadable or half-filled entries become empty slots.
    pub fn from_persisted(bytes: &[u8]) -> Result<Plan> {
        let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| {
            PlannerError::MalformedPersistedState {
                message: e.to_string(),
            }
        })?;

        let serde_json::Value::Object(entries) = value else {
            return Err(PlannerError::MalformedPersistedState {
                message: "expected an object keyed by slot".to_string(),
            });
        };

        let mut plan = Plan::initialize();
        let mut restored = [false; SLOT_COUNT];

        for (raw_key, raw_slot) in entries {
            let Some(key) = SlotKey::from_canonical(&raw_key) else {
                tracing::warn!("Ignoring unknown slot '{}' in saved plan", raw_key);
                continue;
            };

            match serde_json::from_value::<StoredSlot>(raw_slot) {
                Ok(stored) => {
                    plan.slots[key.index()] = stored.into_meal(key);
                    restored[key.index()] = true;
                }
                Err(e) => {
                    tracing::warn!("Slot {} in saved plan is unreadable, clearing it: {}", key, e);
                }
            }
        }

        let missing = restored.iter().filter(|seen| !**seen).count();
        if missing > 0 {
            tracing::debug!("Saved plan was missing {} slots, filled with empty ones", missing);
        }

        Ok(plan)
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::initialize()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSlot<'a> {
    id: String,
    recipe_id: Option<&'a str>,
    recipe_name: Option<&'a str>,
    recipe_image: Option<&'a str>,
    day: Day,
    meal_type: MealType,
    calories: Option<u32>,
}

impl<'a> PersistedSlot<'a> {
    fn new(key: SlotKey, meal: Option<&'a PlannedMeal>) -> Self {
        Self {
            id: key.to_string(),
            recipe_id: meal.map(|m| m.recipe_id.as_str()),
            recipe_name: meal.map(|m| m.recipe_name.as_str()),
            recipe_image: meal.and_then(|m| m.recipe_image.as_deref()),
            day: key.day,
            meal_type: key.meal_type,
            calories: meal.and_then(|m| m.calories),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSlot {
    #[serde(default)]
    recipe_id: Option<String>,
    #[serde(default)]
    recipe_name: Option<String>,
    #[serde(default)]
    recipe_image: Option<String>,
    #[serde(default)]
    calories: Option<f64>,
}

impl StoredSlot {
    fn into_meal(self, key: SlotKey) -> Option<PlannedMeal> {
        let recipe_id = self.recipe_id?;
        let calories = self
            .calories
            .filter(|c| c.is_finite() && *c >= 0.0)
            .map(|c| c.round().min(u32::MAX as f64) as u32);

        match PlannedMeal::new(recipe_id, self.recipe_name.unwrap_or_default(), self.recipe_image, calories) {
            Ok(meal) => Some(meal),
            Err(e) => {
                tracing::warn!("Slot {} in saved plan is inconsistent, clearing it: {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn monday_breakfast() -> SlotKey {
        SlotKey::new(Day::Monday, MealType::Breakfast)
    }

    #[test]
    fn test_initialize_covers_every_slot_once() {
        let plan = Plan::initialize();
        let keys: Vec<SlotKey> = plan.slots().map(|(key, _)| key).collect();
        let distinct: HashSet<SlotKey> = keys.iter().copied().collect();

        assert_eq!(keys.len(), SLOT_COUNT);
        assert_eq!(distinct.len(), SLOT_COUNT);
        assert!(plan.slots().all(|(_, meal)| meal.is_none()));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_slot_key_round_trips_through_display() {
        for key in SlotKey::all() {
            assert_eq!(key.to_string().parse::<SlotKey>().unwrap(), key);
        }
        assert_eq!(monday_breakfast().to_string(), "Monday-breakfast");
    }

    #[test]
    fn test_slot_key_parsing_is_case_insensitive() {
        let key: SlotKey = "tuesday-DINNER".parse().unwrap();
        assert_eq!(key, SlotKey::new(Day::Tuesday, MealType::Dinner));

        let today: SlotKey = "today-lunch".parse().unwrap();
        assert_eq!(today.day, Day::today());
    }

    #[test]
    fn test_invalid_slot_key_is_rejected() {
        for raw in ["Funday-lunch", "Monday-brunch", "Monday", "", "Monday-"] {
            let err = raw.parse::<SlotKey>().unwrap_err();
            assert!(matches!(err, PlannerError::InvalidSlotKey { .. }), "{}", raw);
        }
    }

    #[test]
    fn test_add_then_remove_restores_empty_slot() {
        let original = Plan::initialize()
            .add_recipe(
                SlotKey::new(Day::Friday, MealType::Lunch),
                "52771",
                "Spicy Arrabiata Penne",
                None,
                Some(920),
            )
            .unwrap();
        let key = monday_breakfast();

        let added = original
            .add_recipe(key, "52772", "Teriyaki Chicken", Some("https://img/1.jpg".into()), Some(1000))
            .unwrap();
        assert_eq!(added.get(key).unwrap().recipe_name, "Teriyaki Chicken");

        let removed = added.remove_recipe(key);
        assert!(removed.get(key).is_none());
        assert_eq!(removed, original);
        // the original snapshot is untouched
        assert!(original.get(key).is_none());
    }

    #[test]
    fn test_add_overwrites_existing_recipe() {
        let key = monday_breakfast();
        let plan = Plan::initialize()
            .add_recipe(key, "1", "Pancakes", None, None)
            .unwrap()
            .add_recipe(key, "2", "Porridge", None, Some(450))
            .unwrap();

        let meal = plan.get(key).unwrap();
        assert_eq!(meal.recipe_id, "2");
        assert_eq!(meal.calories, Some(450));
    }

    #[test]
    fn test_add_rejects_blank_id_or_name() {
        let plan = Plan::initialize();
        assert!(plan.add_recipe(monday_breakfast(), " ", "Soup", None, None).is_err());
        assert!(plan.add_recipe(monday_breakfast(), "1", "", None, None).is_err());
    }

    #[test]
    fn test_planned_recipes_are_distinct() {
        let plan = Plan::initialize()
            .add_recipe(monday_breakfast(), "A", "Pancakes", None, None)
            .unwrap()
            .add_recipe(SlotKey::new(Day::Tuesday, MealType::Dinner), "A", "Pancakes", None, None)
            .unwrap()
            .add_recipe(SlotKey::new(Day::Sunday, MealType::Lunch), "B", "Salad", None, None)
            .unwrap();

        let recipes = plan.planned_recipes();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].id, "A");
        assert_eq!(recipes[1].id, "B");
    }

    #[test]
    fn test_persisted_layout_uses_composite_keys() {
        let plan = Plan::initialize()
            .add_recipe(monday_breakfast(), "52771", "Arrabiata", Some("thumb.jpg".into()), Some(720))
            .unwrap();

        let bytes = plan.to_persisted().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let entries = json.as_object().unwrap();

        assert_eq!(entries.len(), SLOT_COUNT);
        let slot = &entries["Monday-breakfast"];
        assert_eq!(slot["id"], "Monday-breakfast");
        assert_eq!(slot["recipeId"], "52771");
        assert_eq!(slot["mealType"], "breakfast");
        assert_eq!(slot["day"], "Monday");
        assert_eq!(slot["calories"], 720);
        assert!(entries["Sunday-dinner"]["recipeId"].is_null());

        assert_eq!(Plan::from_persisted(&bytes).unwrap(), plan);
    }

    #[test]
    fn test_from_persisted_heals_partial_state() {
        let raw = serde_json::json!({
            "Monday-breakfast": {"recipeId": "1", "recipeName": "Pancakes", "calories": 640.4},
            "Tuesday-lunch": {"recipeId": "2", "recipeName": null},
            "Wednesday-dinner": "garbage",
            "Brunch-slot": {"recipeId": "3", "recipeName": "Eggs"}
        });

        let plan = Plan::from_persisted(raw.to_string().as_bytes()).unwrap();

        let meal = plan.get(monday_breakfast()).unwrap();
        assert_eq!(meal.recipe_name, "Pancakes");
        assert_eq!(meal.calories, Some(640));
        assert!(plan.get(SlotKey::new(Day::Tuesday, MealType::Lunch)).is_none());
        assert!(plan.get(SlotKey::new(Day::Wednesday, MealType::Dinner)).is_none());
        assert_eq!(plan.planned_recipes().len(), 1);
    }

    #[test]
    fn test_from_persisted_accepts_only_canonical_keys() {
        let raw = serde_json::json!({
            "today-dinner": {"recipeId": "1", "recipeName": "Curry"},
            "monday-lunch": {"recipeId": "2", "recipeName": "Soup"},
            "MONDAY-LUNCH": {"recipeId": "3", "recipeName": "Stew"},
            " Friday-dinner": {"recipeId": "4", "recipeName": "Tacos"},
            "Sunday-dinner": {"recipeId": "5", "recipeName": "Roast"},
        });

        let plan = Plan::from_persisted(raw.to_string().as_bytes()).unwrap();

        let filled: Vec<String> = plan
            .slots()
            .filter(|(_, meal)| meal.is_some())
            .map(|(key, _)| key.to_string())
            .collect();
        assert_eq!(filled, vec!["Sunday-dinner".to_string()]);
        assert_eq!(SlotKey::from_canonical("Monday-breakfast"), Some(SlotKey::new(Day::Monday, MealType::Breakfast)));
        assert_eq!(SlotKey::from_canonical("today-breakfast"), None);
    }

    #[test]
    fn test_from_persisted_rejects_non_object() {
        assert!(matches!(
            Plan::from_persisted(b"[1, 2, 3]"),
            Err(PlannerError::MalformedPersistedState { .. })
        ));
        assert!(matches!(
            Plan::from_persisted(b"{not json"),
            Err(PlannerError::MalformedPersistedState { .. })
        ));
    }
}
