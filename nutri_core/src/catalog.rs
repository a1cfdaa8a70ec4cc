//! Shared food catalog (seed entries).
//!
//! Catalog entries are reference data: they have no owning user and are
//! never aggregated directly. Logging one copies it into a fresh user-owned
//! entry. Seeds are read-only after creation; there is deliberately no edit
//! or delete operation on them.

use crate::{EntryOrigin, Error, FoodEntry, NutritionStore, Result};
use once_cell::sync::Lazy;
use uuid::Uuid;

/// A built-in seed food definition
#[derive(Clone, Debug)]
pub struct SeedFood {
    pub name: &'static str,
    pub protein_grams: u32,
    pub calories: u32,
}

/// Built-in staples, built once and reused across all operations
static DEFAULT_SEEDS: Lazy<Vec<SeedFood>> = Lazy::new(|| {
    vec![
        SeedFood { name: "Nasi Putih", protein_grams: 4, calories: 204 },
        SeedFood { name: "Dada Ayam Panggang", protein_grams: 31, calories: 165 },
        SeedFood { name: "Telur Rebus", protein_grams: 6, calories: 78 },
        SeedFood { name: "Tempe Goreng", protein_grams: 10, calories: 190 },
        SeedFood { name: "Susu Full Cream", protein_grams: 8, calories: 150 },
    ]
});

/// The built-in seed definitions
pub fn default_seeds() -> &'static [SeedFood] {
    &DEFAULT_SEEDS
}

/// Typed input for a user-contributed catalog entry
#[derive(Clone, Debug)]
pub struct NewCatalogFood {
    pub name: String,
    pub protein_grams: u32,
    pub calories: u32,
    pub image: Option<String>,
}

/// Insert any built-in seeds not already present (matched by name)
///
/// Idempotent: calling this repeatedly adds nothing new.
pub fn seed_catalog(store: &mut NutritionStore) -> usize {
    let mut added = 0;
    for seed in default_seeds() {
        let exists = store
            .catalog_foods()
            .iter()
            .any(|f| f.name == seed.name);
        if exists {
            continue;
        }
        store.foods.push(FoodEntry {
            id: Uuid::new_v4(),
            name: seed.name.to_string(),
            portion_count: 1,
            protein_grams: seed.protein_grams,
            calories: seed.calories,
            image: None,
            origin: EntryOrigin::CatalogSeed,
            user_id: None,
        });
        added += 1;
    }
    if added > 0 {
        tracing::info!("Seeded {} catalog foods", added);
    }
    added
}

/// Add a user-contributed shared catalog entry
pub fn add_catalog_food(store: &mut NutritionStore, input: NewCatalogFood) -> Result<FoodEntry> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation("food name is required".into()));
    }

    let entry = FoodEntry {
        id: Uuid::new_v4(),
        name,
        portion_count: 1,
        protein_grams: input.protein_grams,
        calories: input.calories,
        image: input.image,
        origin: EntryOrigin::CatalogSeed,
        user_id: None,
    };
    store.foods.push(entry.clone());
    tracing::info!("Added catalog food '{}'", entry.name);
    Ok(entry)
}

/// All catalog entries, name-sorted
pub fn list_catalog(store: &NutritionStore) -> Vec<FoodEntry> {
    let mut foods: Vec<FoodEntry> = store.catalog_foods().into_iter().cloned().collect();
    foods.sort_by(|a, b| a.name.cmp(&b.name));
    foods
}
