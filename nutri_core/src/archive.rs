//! Report archiver: snapshots a day's totals into immutable history.
//!
//! Two variants exist and behave differently over an empty day:
//! - record-only (`reset = false`) always creates a report, zero totals
//!   included;
//! - archive-with-reset (`reset = true`) is a no-op returning None when the
//!   day is empty, and otherwise deletes the aggregated records and foods in
//!   the same unit of work that creates the report.
//!
//! Unlike the slot dashboard, archive totals multiply each entry by its
//! portion count. Reports are append-only; nothing here updates or deletes
//! one.

use crate::{DailyReport, NutritionStore, Result};
use chrono::{NaiveDate, Utc};
use std::fs::OpenOptions;
use std::path::Path;
use uuid::Uuid;

/// Label stamped on whole-day reports
pub const DAY_REPORT_LABEL: &str = "full-day";

/// Archive one user's day, optionally clearing the working ledger
pub fn archive_day(
    store: &mut NutritionStore,
    user_id: Uuid,
    date: NaiveDate,
    reset: bool,
) -> Result<Option<DailyReport>> {
    let pairs = store.find_meal_logs_by_user_and_date(user_id, date);

    let total_protein: u64 = pairs
        .iter()
        .map(|(f, _)| f.protein_grams as u64 * f.portion_count as u64)
        .sum();
    let total_calories: u64 = pairs
        .iter()
        .map(|(f, _)| f.calories as u64 * f.portion_count as u64)
        .sum();

    if reset && pairs.is_empty() {
        tracing::info!("Nothing to archive for {} on {}", user_id, date);
        return Ok(None);
    }

    let record_ids: Vec<Uuid> = pairs.iter().map(|(_, r)| r.id).collect();
    let food_ids: Vec<Uuid> = pairs.iter().map(|(f, _)| f.id).collect();

    let report = DailyReport {
        id: Uuid::new_v4(),
        user_id,
        label: DAY_REPORT_LABEL.into(),
        created_at: Utc::now(),
        total_protein,
        total_calories,
    };
    store.reports.push(report.clone());

    if reset {
        store.meal_logs.retain(|r| !record_ids.contains(&r.id));
        store.foods.retain(|f| !food_ids.contains(&f.id));
        tracing::info!(
            "Archived and cleared {} entries for {} on {}",
            record_ids.len(),
            user_id,
            date
        );
    } else {
        tracing::info!("Recorded report for {} on {}", user_id, date);
    }

    Ok(Some(report))
}

/// A user's reports, strictly newest first
pub fn list_reports(store: &NutritionStore, user_id: Uuid) -> Vec<DailyReport> {
    store
        .reports_by_user(user_id)
        .into_iter()
        .cloned()
        .collect()
}

/// Append a user's reports to a CSV file, newest first
///
/// Writes headers only when the file is empty, syncs before returning, and
/// returns the number of rows written.
pub fn export_reports_csv(
    store: &NutritionStore,
    user_id: Uuid,
    csv_path: &Path,
) -> Result<usize> {
    let reports = list_reports(store, user_id);
    if reports.is_empty() {
        tracing::info!("No reports to export for {}", user_id);
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for report in &reports {
        writer.serialize(CsvRow::from(report))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} reports to {:?}", reports.len(), csv_path);
    Ok(reports.len())
}

/// A row in the CSV export
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    label: String,
    created_at: String,
    total_protein: u64,
    total_calories: u64,
}

impl From<&DailyReport> for CsvRow {
    fn from(report: &DailyReport) -> Self {
        CsvRow {
            id: report.id.to_string(),
            label: report.label.clone(),
            created_at: report.created_at.to_rfc3339(),
            total_protein: report.total_protein,
            total_calories: report.total_calories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::add_entry;
    use crate::profile::{register_profile, RegisterProfile};
    use crate::{ActivityLevel, BodyType, Gender, Goal, MealSlot, NewFoodEntry};

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
                goal: Goal::Maintain,
                activity: ActivityLevel::Light,
                body_type: BodyType::Mesomorph,
            },
        )
        .unwrap()
        .id
    }

    fn log(store: &mut NutritionStore, user_id: Uuid, portion: u32, protein: u32, calories: u32) {
        add_entry(
            store,
            user_id,
            NewFoodEntry {
                name: "makanan".into(),
                portion_count: portion,
                protein_grams: protein,
                calories,
                image: None,
                slot: MealSlot::Midday,
                date: test_date(),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_reset_on_empty_day_is_noop() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);

        let report = archive_day(&mut store, user_id, test_date(), true).unwrap();
        assert!(report.is_none());
        assert!(store.reports.is_empty());
    }

    #[test]
    fn test_record_only_on_empty_day_creates_zero_report() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);

        let report = archive_day(&mut store, user_id, test_date(), false)
            .unwrap()
            .unwrap();
        assert_eq!(report.total_protein, 0);
        assert_eq!(report.total_calories, 0);
        assert_eq!(store.reports.len(), 1);
    }

    #[test]
    fn test_archive_totals_multiply_by_portion() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);
        log(&mut store, user_id, 3, 10, 200);
        log(&mut store, user_id, 1, 5, 100);

        let report = archive_day(&mut store, user_id, test_date(), false)
            .unwrap()
            .unwrap();
        assert_eq!(report.total_protein, 3 * 10 + 5);
        assert_eq!(report.total_calories, 3 * 200 + 100);
    }

    #[test]
    fn test_reset_empties_the_day() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);
        log(&mut store, user_id, 1, 10, 200);
        log(&mut store, user_id, 2, 20, 400);
        assert_eq!(store.meal_logs.len(), 2);

        let report = archive_day(&mut store, user_id, test_date(), true).unwrap();
        assert!(report.is_some());
        assert_eq!(store.reports.len(), 1);
        assert!(store
            .find_meal_logs_by_user_and_date(user_id, test_date())
            .is_empty());
        assert!(store.meal_logs.is_empty());
        assert!(store.foods.is_empty());
    }

    #[test]
    fn test_record_only_leaves_ledger_intact() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);
        log(&mut store, user_id, 1, 10, 200);

        archive_day(&mut store, user_id, test_date(), false).unwrap();
        assert_eq!(store.meal_logs.len(), 1);
        assert_eq!(store.foods.len(), 1);
    }

    #[test]
    fn test_reset_keeps_other_dates_and_users() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);
        log(&mut store, user_id, 1, 10, 200);

        let other_day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        add_entry(
            &mut store,
            user_id,
            NewFoodEntry {
                name: "besok".into(),
                portion_count: 1,
                protein_grams: 7,
                calories: 150,
                image: None,
                slot: MealSlot::Morning,
                date: other_day,
            },
        )
        .unwrap();

        archive_day(&mut store, user_id, test_date(), true).unwrap();
        assert_eq!(
            store.find_meal_logs_by_user_and_date(user_id, other_day).len(),
            1
        );
    }

    #[test]
    fn test_list_reports_descending() {
        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);
        let base = Utc::now();

        for (days_ago, calories) in [(2_i64, 100_u64), (0, 300), (1, 200)] {
            store.reports.push(DailyReport {
                id: Uuid::new_v4(),
                user_id,
                label: DAY_REPORT_LABEL.into(),
                created_at: base - chrono::Duration::days(days_ago),
                total_protein: 0,
                total_calories: calories,
            });
        }

        let reports = list_reports(&store, user_id);
        let calories: Vec<u64> = reports.iter().map(|r| r.total_calories).collect();
        assert_eq!(calories, vec![300, 200, 100]);
    }

    #[test]
    fn test_export_appends_with_single_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("reports.csv");

        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);
        log(&mut store, user_id, 1, 10, 200);
        archive_day(&mut store, user_id, test_date(), false).unwrap();

        let first = export_reports_csv(&store, user_id, &csv_path).unwrap();
        assert_eq!(first, 1);

        archive_day(&mut store, user_id, test_date(), false).unwrap();
        let second = export_reports_csv(&store, user_id, &csv_path).unwrap();
        assert_eq!(second, 2);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let header_lines = contents
            .lines()
            .filter(|l| l.starts_with("id,"))
            .count();
        assert_eq!(header_lines, 1);
        // 1 header + 1 from first export + 2 from second
        assert_eq!(contents.lines().count(), 4);
    }

    #[test]
    fn test_export_with_no_reports_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("reports.csv");

        let mut store = NutritionStore::default();
        let user_id = setup_user(&mut store);

        let count = export_reports_csv(&store, user_id, &csv_path).unwrap();
        assert_eq!(count, 0);
        assert!(!csv_path.exists());
    }
}
