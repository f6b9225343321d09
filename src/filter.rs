use crate::model::RecipeSummary;
use serde::{Deserialize, Serialize};

/// Cuisines offered by the filter controls
pub const CUISINES: &[&str] = &["Italian", "Indian", "Chinese"];
/// Diets offered by the filter controls
pub const DIETS: &[&str] = &["Vegetarian", "Vegan", "NonVeg"];
/// Meal types offered by the filter controls
pub const MEAL_TYPES: &[&str] = &["Breakfast", "Lunch", "Dinner"];

/// Search text and filter selections applied to the loaded recipes.
///
/// Empty tags mean "no constraint", matching an "All ..." selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub search_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(alias = "maxTime", skip_serializing_if = "Option::is_none")]
    pub max_ready_minutes: Option<u32>,
}

/// Partial update to [`FilterCriteria`].
///
/// `None` leaves a field untouched, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search_text: Option<String>,
    pub cuisine: Option<Option<String>>,
    pub diet: Option<Option<String>>,
    pub meal_type: Option<Option<String>>,
    pub max_ready_minutes: Option<Option<u32>>,
}

impl FilterPatch {
    pub fn cuisine(value: Option<&str>) -> Self {
        Self {
            cuisine: Some(value.map(str::to_string)),
            ..Default::default()
        }
    }

    pub fn diet(value: Option<&str>) -> Self {
        Self {
            diet: Some(value.map(str::to_string)),
            ..Default::default()
        }
    }

    pub fn meal_type(value: Option<&str>) -> Self {
        Self {
            meal_type: Some(value.map(str::to_string)),
            ..Default::default()
        }
    }

    pub fn max_ready_minutes(value: Option<u32>) -> Self {
        Self {
            max_ready_minutes: Some(value),
            ..Default::default()
        }
    }
}

impl FilterCriteria {
    /// Merge `patch` into these criteria
    pub fn apply_patch(&mut self, patch: FilterPatch) {
        if let Some(text) = patch.search_text {
            self.search_text = text;
        }
        if let Some(cuisine) = patch.cuisine {
            self.cuisine = normalize_tag(cuisine);
        }
        if let Some(diet) = patch.diet {
            self.diet = normalize_tag(diet);
        }
        if let Some(meal_type) = patch.meal_type {
            self.meal_type = normalize_tag(meal_type);
        }
        if let Some(max) = patch.max_ready_minutes {
            self.max_ready_minutes = max;
        }
    }

    /// Whether a single recipe passes every active constraint
    pub fn matches(&self, recipe: &RecipeSummary) -> bool {
        let search = self.search_text.to_lowercase();
        self.matches_with_lowered(recipe, &search)
    }

    fn matches_with_lowered(&self, recipe: &RecipeSummary, search: &str) -> bool {
        recipe.title.to_lowercase().contains(search)
            && tag_matches(self.cuisine.as_deref(), recipe.cuisine.as_deref())
            && tag_matches(self.diet.as_deref(), recipe.diet.as_deref())
            && tag_matches(self.meal_type.as_deref(), recipe.meal_type.as_deref())
            && match (self.max_ready_minutes, recipe.ready_in_minutes) {
                (Some(max), Some(minutes)) => minutes <= max,
                // No bound, or the recipe has no duration: keep it visible
                _ => true,
            }
    }
}

fn normalize_tag(tag: Option<String>) -> Option<String> {
    tag.filter(|t| !t.is_empty())
}

fn tag_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        None | Some("") => true,
        Some(wanted) => actual == Some(wanted),
    }
}

/// Recipes from `items` that satisfy `criteria`, in their original order
pub fn apply<'a>(
    items: &'a [RecipeSummary],
    criteria: &FilterCriteria,
) -> Vec<&'a RecipeSummary> {
    let search = criteria.search_text.to_lowercase();
    items
        .iter()
        .filter(|recipe| criteria.matches_with_lowered(recipe, &search))
        .collect()
}
