//! JSON store persistence with file locking.
//!
//! The whole ledger lives in one JSON document. Every mutating operation is
//! a load-modify-save unit of work: the new document is written to a temp
//! file, synced, and renamed over the original, so a failure anywhere in the
//! middle leaves the previous state on disk.

use crate::{
    DailyReport, EntryOrigin, Error, FoodEntry, MealLogRecord, MealSlot, Result, UserProfile,
};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// All persisted rows, loaded and saved as one document
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionStore {
    pub users: Vec<UserProfile>,
    pub foods: Vec<FoodEntry>,
    pub meal_logs: Vec<MealLogRecord>,
    pub reports: Vec<DailyReport>,
}

impl NutritionStore {
    /// Load the store from a file with shared locking
    ///
    /// A missing file is an empty store. A corrupted file is an error: a
    /// ledger must not silently reset to empty.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No store file at {:?}, starting empty", path);
            return Ok(Self::default());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        let read_result = reader.read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        let store: NutritionStore = serde_json::from_str(&contents).map_err(|e| {
            Error::Persistence(format!("store file {:?} is not readable: {}", path, e))
        })?;

        tracing::debug!(
            "Loaded store from {:?} ({} users, {} foods, {} logs, {} reports)",
            path,
            store.users.len(),
            store.foods.len(),
            store.meal_logs.len(),
            store.reports.len()
        );
        Ok(store)
    }

    /// Save the store with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved store to {:?}", path);
        Ok(())
    }

    /// Load, run one unit of work, and save atomically
    ///
    /// On any error inside the closure the on-disk store is left untouched,
    /// which gives every core operation commit-or-rollback semantics.
    pub fn update<T, F>(path: &Path, f: F) -> Result<T>
    where
        F: FnOnce(&mut NutritionStore) -> Result<T>,
    {
        let mut store = Self::load(path)?;
        let out = f(&mut store)?;
        store.save(path)?;
        Ok(out)
    }

    // ========================================================================
    // Repository queries (fully materialized, no lazy traversal)
    // ========================================================================

    pub fn find_user_by_id(&self, user_id: Uuid) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn find_user_by_username(&self, username: &str) -> Option<&UserProfile> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn find_food(&self, food_id: Uuid) -> Option<&FoodEntry> {
        self.foods.iter().find(|f| f.id == food_id)
    }

    pub fn find_record(&self, record_id: Uuid) -> Option<&MealLogRecord> {
        self.meal_logs.iter().find(|r| r.id == record_id)
    }

    /// User-logged (food, record) pairs for one user and date
    ///
    /// Catalog-seed foods never appear here even if a stray record points at
    /// them; only UserLogged entries count toward aggregation.
    pub fn find_meal_logs_by_user_and_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Vec<(&FoodEntry, &MealLogRecord)> {
        self.meal_logs
            .iter()
            .filter(|r| r.user_id == user_id && r.date == date)
            .filter_map(|r| self.find_food(r.food_id).map(|f| (f, r)))
            .filter(|(f, _)| f.origin == EntryOrigin::UserLogged)
            .collect()
    }

    /// User-logged (food, record) pairs narrowed to one slot
    pub fn find_meal_logs_by_slot(
        &self,
        user_id: Uuid,
        slot: MealSlot,
        date: NaiveDate,
    ) -> Vec<(&FoodEntry, &MealLogRecord)> {
        self.find_meal_logs_by_user_and_date(user_id, date)
            .into_iter()
            .filter(|(_, r)| r.slot == slot)
            .collect()
    }

    /// All shared catalog entries
    pub fn catalog_foods(&self) -> Vec<&FoodEntry> {
        self.foods
            .iter()
            .filter(|f| f.origin == EntryOrigin::CatalogSeed)
            .collect()
    }

    /// A user's reports, newest first
    pub fn reports_by_user(&self, user_id: Uuid) -> Vec<&DailyReport> {
        let mut reports: Vec<&DailyReport> = self
            .reports
            .iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reports
    }
}
