use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use super::{RecipesFile, SimTuning};
use crate::recipes::RecipeBook;

const TUNING_RELATIVE_PATH: &str = "assets/data/tuning.json";
const RECIPES_RELATIVE_PATH: &str = "assets/data/recipes.json";

pub fn tuning_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(TUNING_RELATIVE_PATH)
}

pub fn recipes_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(RECIPES_RELATIVE_PATH)
}

pub fn load_tuning() -> Result<SimTuning> {
    load_tuning_from_path(tuning_path())
}

pub fn load_tuning_from_path(path: impl AsRef<Path>) -> Result<SimTuning> {
    read_json(path.as_ref(), "tuning")
}

pub fn load_recipes() -> Result<RecipeBook> {
    load_recipes_from_path(recipes_path())
}

pub fn load_recipes_from_path(path: impl AsRef<Path>) -> Result<RecipeBook> {
    let path = path.as_ref();
    let file: RecipesFile = read_json(path, "recipes")?;
    file.into_book()
        .with_context(|| format!("failed building recipe book from {}", path.display()))
}

fn read_json<T>(path: &Path, label: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed reading {label} file: {}", path.display()))?;

    serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing {label} file as JSON: {}", path.display()))
}
