use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{CRAFTING_SLOT_COUNT, CraftOutput, ItemKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub label: String,
    pub ingredients: Vec<ItemKind>,
    pub output: CraftOutput,
}

impl Recipe {
    pub fn new(label: impl Into<String>, ingredients: Vec<ItemKind>, output: CraftOutput) -> Self {
        Self {
            label: label.into(),
            ingredients,
            output,
        }
    }

    fn sorted_ingredients(&self) -> Vec<ItemKind> {
        let mut sorted = self.ingredients.clone();
        sorted.sort();
        sorted
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    #[error("recipe `{label}` needs exactly four ingredients, got {count}")]
    WrongIngredientCount { label: String, count: usize },
    #[error("recipe `{label}` has the same ingredients as `{existing}`")]
    AmbiguousIngredients { label: String, existing: String },
    #[error("recipe `{label}` produces zero items")]
    EmptyOutput { label: String },
}

/// Registered crafting recipes, matched against a full set of slots as a
/// multiset. Registration keeps ingredient multisets pairwise disjoint, so at
/// most one recipe can ever match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeBook {
    recipes: Vec<(Vec<ItemKind>, Recipe)>,
}

impl Default for RecipeBook {
    fn default() -> Self {
        let mut book = Self::empty();
        for recipe in builtin_recipes() {
            if let Err(err) = book.register(recipe) {
                tracing::error!(%err, "built-in recipe rejected");
            }
        }
        book
    }
}

impl RecipeBook {
    pub fn empty() -> Self {
        Self {
            recipes: Vec::new(),
        }
    }

    pub fn from_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Result<Self, RecipeError> {
        let mut book = Self::empty();
        for recipe in recipes {
            book.register(recipe)?;
        }
        Ok(book)
    }

    pub fn register(&mut self, recipe: Recipe) -> Result<(), RecipeError> {
        if recipe.ingredients.len() != CRAFTING_SLOT_COUNT {
            return Err(RecipeError::WrongIngredientCount {
                label: recipe.label,
                count: recipe.ingredients.len(),
            });
        }
        if recipe.output.count == 0 {
            return Err(RecipeError::EmptyOutput {
                label: recipe.label,
            });
        }
        let sorted = recipe.sorted_ingredients();
        if let Some((_, existing)) = self.recipes.iter().find(|(key, _)| *key == sorted) {
            return Err(RecipeError::AmbiguousIngredients {
                label: recipe.label,
                existing: existing.label.clone(),
            });
        }
        self.recipes.push((sorted, recipe));
        Ok(())
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter().map(|(_, recipe)| recipe)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Output for the four slots, or `None` unless every slot is filled and
    /// the filled items equal some recipe's ingredients in any order.
    pub fn match_recipe(&self, slots: &[Option<ItemKind>; CRAFTING_SLOT_COUNT]) -> Option<CraftOutput> {
        let mut filled = slots.iter().copied().collect::<Option<Vec<_>>>()?;
        filled.sort();
        self.recipes
            .iter()
            .find(|(key, _)| *key == filled)
            .map(|(_, recipe)| recipe.output)
    }
}

fn builtin_recipes() -> Vec<Recipe> {
    use ItemKind::{CraneArm, Gear, Iron};

    vec![
        Recipe::new(
            "4 Iron -> 1 Gear",
            vec![Iron, Iron, Iron, Iron],
            CraftOutput { item: Gear, count: 1 },
        ),
        Recipe::new(
            "2 Iron + 2 Gear -> 1 Crane Arm",
            vec![Iron, Iron, Gear, Gear],
            CraftOutput {
                item: CraneArm,
                count: 1,
            },
        ),
    ]
}
