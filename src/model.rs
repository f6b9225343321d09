use serde::{Deserialize, Serialize};
use std::fmt;

/// Minutes shown on a recipe card when the source omits a duration
pub const DEFAULT_DISPLAY_MINUTES: u32 = 30;
/// Servings shown on a recipe card when the source omits them
pub const DEFAULT_DISPLAY_SERVINGS: u32 = 2;

/// Identifier of a recipe as issued by the source.
///
/// Sources hand out either numeric or string ids; both are accepted and
/// compared by exact value (`5` and `"5"` are different ids).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeId::Int(id) => write!(f, "{}", id),
            RecipeId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecipeId {
    fn from(id: i64) -> Self {
        RecipeId::Int(id)
    }
}

impl From<i32> for RecipeId {
    fn from(id: i32) -> Self {
        RecipeId::Int(id.into())
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        RecipeId::Text(id.to_string())
    }
}

impl From<String> for RecipeId {
    fn from(id: String) -> Self {
        RecipeId::Text(id)
    }
}

impl RecipeId {
    /// Parse user input: all-digit strings become numeric ids
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(id) => RecipeId::Int(id),
            Err(_) => RecipeId::Text(raw.trim().to_string()),
        }
    }
}

/// One recipe as listed by the search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub diet: Option<String>,
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
}

impl RecipeSummary {
    pub fn new(id: impl Into<RecipeId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image: None,
            cuisine: None,
            diet: None,
            meal_type: None,
            ready_in_minutes: None,
            servings: None,
        }
    }

    pub fn with_ready_in_minutes(mut self, minutes: u32) -> Self {
        self.ready_in_minutes = Some(minutes);
        self
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn with_diet(mut self, diet: impl Into<String>) -> Self {
        self.diet = Some(diet.into());
        self
    }

    pub fn with_meal_type(mut self, meal_type: impl Into<String>) -> Self {
        self.meal_type = Some(meal_type.into());
        self
    }

    /// Duration for display; zero counts as missing
    pub fn display_minutes(&self) -> u32 {
        self.ready_in_minutes
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_DISPLAY_MINUTES)
    }

    pub fn display_servings(&self) -> u32 {
        self.servings
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_DISPLAY_SERVINGS)
    }
}

/// Body of a search response. Only `results` is required.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub results: Vec<RecipeSummary>,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u32>,
}
