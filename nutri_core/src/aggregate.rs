//! Daily aggregator: per-slot and whole-day rollup against targets.
//!
//! Aggregation is a pure read over the store; it never mutates ledger state
//! and can be called repeatedly with identical results.

use crate::targets::compute_targets;
use crate::{DaySummary, MealSlot, NutritionStore, SlotSummary, Targets};
use chrono::NaiveDate;
use uuid::Uuid;

/// Percent of target reached, rounded to one decimal and clamped to [0, 100]
///
/// A target of zero or less yields 0 rather than dividing by zero.
fn progress_percent(total: u64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    let pct = (total as f64 / target * 100.0 * 10.0).round() / 10.0;
    pct.min(100.0)
}

/// Roll up one user's day into per-slot and overall totals with progress
///
/// An unknown user or a day with no entries yields a zero-valued summary.
///
/// Dashboard totals count each entry once regardless of `portion_count`;
/// only the archive path multiplies by portions. The asymmetry is inherited
/// behavior that downstream readings depend on, kept on purpose.
pub fn aggregate_day(store: &NutritionStore, user_id: Uuid, date: NaiveDate) -> DaySummary {
    let targets = store
        .find_user_by_id(user_id)
        .map(compute_targets)
        .unwrap_or_else(Targets::default);

    let mut slots = [SlotSummary::default(); 4];
    for (food, record) in store.find_meal_logs_by_user_and_date(user_id, date) {
        let slot = &mut slots[record.slot.index()];
        slot.total_protein += food.protein_grams as u64;
        slot.total_calories += food.calories as u64;
    }

    let total_protein: u64 = slots.iter().map(|s| s.total_protein).sum();
    let total_calories: u64 = slots.iter().map(|s| s.total_calories).sum();

    DaySummary {
        date,
        slots,
        total_protein,
        total_calories,
        progress_calories: progress_percent(total_calories, targets.target_calories),
        progress_protein: progress_percent(total_protein, targets.target_protein),
        calories_reached: total_calories as f64 >= targets.target_calories,
        protein_reached: total_protein as f64 >= targets.target_protein,
        targets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::add_entry;
    use crate::profile::{register_profile, RegisterProfile};
    use crate::{ActivityLevel, BodyType, Gender, Goal, NewFoodEntry};

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn setup_user(store: &mut NutritionStore) -> Uuid {
        register_profile(
            store,
            RegisterProfile {
                username: "budi".into(),
                age: 25,
                height_cm: 175,
                weight_kg: 70,
                gender: Gender::Male,
                goal: Goal::Cut,
                activity: ActivityLevel::Light,
                body_type: BodyType::Mesomorph,
            },
        )
        .unwrap()
        .id
    }

    fn log(store: &mut NutritionStore, user_id: Uuid, slot: MealSlot, portion: u32, protein: u32, calories: u32) {
        add_entry(
            store,
            user_id,
            NewFoodEntry {
                name: "makanan".into(),
                portion_count: portion,
                protein_grams: protein,
                calories,
                image: None,
                slot,
                date: test_date(),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_empty_day_is_zero_valued() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);

        let summary = aggregate_day(&store, user_id, test_date());
        assert_eq!(summary.total_protein, 0);
        assert_eq!(summary.total_calories, 0);
        assert_eq!(summary.progress_calories, 0.0);
        assert!(!summary.calories_reached);
    }

    #[test]
    fn test_unknown_user_is_zero_valued() {
        let store = NutritionStore::default();
        let summary = aggregate_day(&store, Uuid::new_v4(), test_date());
        assert_eq!(summary.total_calories, 0);
        assert_eq!(summary.targets.target_calories, 0.0);
        assert_eq!(summary.progress_calories, 0.0);
    }

    #[test]
    fn test_slot_totals_ignore_portion_count() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);
        log(&mut store, user_id, MealSlot::Morning, 3, 10, 200);

        let summary = aggregate_day(&store, user_id, test_date());
        // One portion counted per entry on the dashboard, portion 3 or not
        assert_eq!(summary.slot(MealSlot::Morning).total_protein, 10);
        assert_eq!(summary.slot(MealSlot::Morning).total_calories, 200);
        assert_eq!(summary.total_calories, 200);
    }

    #[test]
    fn test_totals_sum_across_slots() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);
        log(&mut store, user_id, MealSlot::Morning, 1, 20, 400);
        log(&mut store, user_id, MealSlot::Midday, 1, 30, 600);
        log(&mut store, user_id, MealSlot::Night, 1, 15, 300);

        let summary = aggregate_day(&store, user_id, test_date());
        assert_eq!(summary.slot(MealSlot::Morning).total_calories, 400);
        assert_eq!(summary.slot(MealSlot::Midday).total_calories, 600);
        assert_eq!(summary.slot(MealSlot::Evening).total_calories, 0);
        assert_eq!(summary.total_protein, 65);
        assert_eq!(summary.total_calories, 1300);
    }

    #[test]
    fn test_progress_clamped_to_100() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);
        // Cut targets: protein 175, calories tdee-300
        log(&mut store, user_id, MealSlot::Midday, 1, 500, 9000);

        let summary = aggregate_day(&store, user_id, test_date());
        assert_eq!(summary.progress_protein, 100.0);
        assert_eq!(summary.progress_calories, 100.0);
        assert!(summary.protein_reached);
        assert!(summary.calories_reached);
    }

    #[test]
    fn test_progress_rounded_to_one_decimal() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);
        // Protein target for cut at 70 kg is exactly 175
        log(&mut store, user_id, MealSlot::Midday, 1, 58, 100);

        let summary = aggregate_day(&store, user_id, test_date());
        // 58/175 = 33.142857% -> 33.1
        assert_eq!(summary.progress_protein, 33.1);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);
        log(&mut store, user_id, MealSlot::Evening, 2, 25, 550);

        let first = aggregate_day(&store, user_id, test_date());
        let second = aggregate_day(&store, user_id, test_date());
        assert_eq!(first, second);
        assert_eq!(store.meal_logs.len(), 1);
    }

    #[test]
    fn test_zero_target_yields_zero_progress() {
        assert_eq!(progress_percent(500, 0.0), 0.0);
        assert_eq!(progress_percent(500, -10.0), 0.0);
    }
}
