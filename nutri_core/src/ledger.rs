//! Meal ledger: the working set of food entries logged through the day.
//!
//! Every ledger mutation pairs a FoodEntry with its MealLogRecord; the two
//! are created inside one unit of work so a caller committing through
//! [`NutritionStore::update`] gets the pair atomically or not at all.
//!
//! Single-entry submission is all-or-nothing; batch submission skips
//! malformed items and carries on with the rest. These are deliberately
//! different policies.

use crate::{
    BatchItem, EntryOrigin, Error, FoodEntry, MealLogRecord, MealSlot, NewFoodEntry,
    NutritionStore, Result,
};
use chrono::NaiveDate;
use uuid::Uuid;

fn require_user(store: &NutritionStore, user_id: Uuid) -> Result<()> {
    if store.find_user_by_id(user_id).is_none() {
        return Err(Error::NotFound(format!("user {}", user_id)));
    }
    Ok(())
}

/// Push the food/record pair without re-validating; callers validate first
fn insert_pair(
    store: &mut NutritionStore,
    user_id: Uuid,
    entry: NewFoodEntry,
) -> (FoodEntry, MealLogRecord) {
    let food = FoodEntry {
        id: Uuid::new_v4(),
        name: entry.name,
        portion_count: entry.portion_count,
        protein_grams: entry.protein_grams,
        calories: entry.calories,
        image: entry.image,
        origin: EntryOrigin::UserLogged,
        user_id: Some(user_id),
    };
    let record = MealLogRecord {
        id: Uuid::new_v4(),
        food_id: food.id,
        user_id,
        slot: entry.slot,
        date: entry.date,
    };
    store.foods.push(food.clone());
    store.meal_logs.push(record.clone());
    (food, record)
}

/// Add one validated entry to a user's ledger
pub fn add_entry(
    store: &mut NutritionStore,
    user_id: Uuid,
    entry: NewFoodEntry,
) -> Result<(FoodEntry, MealLogRecord)> {
    require_user(store, user_id)?;
    if entry.name.trim().is_empty() {
        return Err(Error::Validation("food name is required".into()));
    }
    if entry.portion_count < 1 {
        return Err(Error::Validation("portion must be at least 1".into()));
    }

    let (food, record) = insert_pair(store, user_id, entry);
    tracing::info!(
        "Logged '{}' for {} at {} on {}",
        food.name,
        user_id,
        record.slot,
        record.date
    );
    Ok((food, record))
}

/// Add a batch of entries for one user and date
///
/// Items missing required fields are skipped with a warning; the remaining
/// items still commit. Returns the foods that were accepted.
pub fn add_entry_batch(
    store: &mut NutritionStore,
    user_id: Uuid,
    date: NaiveDate,
    items: Vec<BatchItem>,
) -> Result<Vec<FoodEntry>> {
    require_user(store, user_id)?;

    let mut accepted = Vec::new();
    for (idx, item) in items.into_iter().enumerate() {
        match item.into_new_entry(date) {
            Some(entry) => {
                let (food, _) = insert_pair(store, user_id, entry);
                accepted.push(food);
            }
            None => {
                tracing::warn!("Skipping batch item {}: missing required fields", idx);
            }
        }
    }

    tracing::info!("Batch logged {} entries for {}", accepted.len(), user_id);
    Ok(accepted)
}

/// Log a catalog entry by copying it into a fresh user-owned entry
///
/// The seed row itself is never logged or mutated.
pub fn log_catalog_food(
    store: &mut NutritionStore,
    user_id: Uuid,
    catalog_food_id: Uuid,
    portion_count: u32,
    slot: MealSlot,
    date: NaiveDate,
) -> Result<(FoodEntry, MealLogRecord)> {
    require_user(store, user_id)?;
    if portion_count < 1 {
        return Err(Error::Validation("portion must be at least 1".into()));
    }

    let seed = store
        .find_food(catalog_food_id)
        .ok_or_else(|| Error::NotFound(format!("food {}", catalog_food_id)))?;
    if seed.origin != EntryOrigin::CatalogSeed {
        return Err(Error::Validation(
            "only catalog entries can be logged by reference".into(),
        ));
    }

    let entry = NewFoodEntry {
        name: seed.name.clone(),
        portion_count,
        protein_grams: seed.protein_grams,
        calories: seed.calories,
        image: seed.image.clone(),
        slot,
        date,
    };
    Ok(insert_pair(store, user_id, entry))
}

/// Materialized (food, record) pairs for one user, slot, and date
pub fn list_by_slot_and_date(
    store: &NutritionStore,
    user_id: Uuid,
    slot: MealSlot,
    date: NaiveDate,
) -> Vec<(FoodEntry, MealLogRecord)> {
    store
        .find_meal_logs_by_slot(user_id, slot, date)
        .into_iter()
        .map(|(f, r)| (f.clone(), r.clone()))
        .collect()
}

/// Delete a meal-log record and its food row
pub fn delete_entry(store: &mut NutritionStore, record_id: Uuid) -> Result<()> {
    let record = store
        .find_record(record_id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("meal log {}", record_id)))?;

    store.meal_logs.retain(|r| r.id != record_id);
    store
        .foods
        .retain(|f| !(f.id == record.food_id && f.origin == EntryOrigin::UserLogged));

    tracing::info!("Deleted meal log {}", record_id);
    Ok(())
}
