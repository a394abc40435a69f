use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::recipes::{Recipe, RecipeBook};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipesFile {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

impl RecipesFile {
    pub fn into_book(self) -> Result<RecipeBook> {
        RecipeBook::from_recipes(self.recipes).context("recipe file contains an invalid recipe")
    }
}
