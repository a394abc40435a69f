mod loader;
mod recipe_data;
mod tuning;

pub use loader::{
    load_recipes, load_recipes_from_path, load_tuning, load_tuning_from_path, recipes_path,
    tuning_path,
};
pub use recipe_data::RecipesFile;
pub use tuning::SimTuning;
