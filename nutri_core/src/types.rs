//! Core domain types for the Nutri tracking system.
//!
//! This module defines the fundamental types used throughout the system:
//! - User profiles and their biometric enums
//! - Food entries and their meal-log records
//! - Daily reports and aggregation summaries
//! - Typed input structs for the single and batch ingestion paths

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Biometric Enums
// ============================================================================

/// Biological gender, as used by the Mifflin-St Jeor formula
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(Error::Validation(format!("unknown gender '{}'", other))),
        }
    }
}

/// Nutrition goal driving the calorie/protein adjustment
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Bulk,
    Cut,
    Maintain,
}

impl FromStr for Goal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "bulk" | "bulking" => Ok(Goal::Bulk),
            "cut" | "cutting" => Ok(Goal::Cut),
            "maintain" => Ok(Goal::Maintain),
            other => Err(Error::Validation(format!("unknown goal '{}'", other))),
        }
    }
}

/// Daily activity level scaling BMR into TDEE
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Heavy,
}

impl ActivityLevel {
    /// Parse an activity string, falling back to Light (1.375) when unrecognized
    pub fn parse_lenient(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "sedentary" => ActivityLevel::Sedentary,
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "heavy" => ActivityLevel::Heavy,
            other => {
                tracing::warn!("Unknown activity level '{}', defaulting to light", other);
                ActivityLevel::Light
            }
        }
    }
}

/// Somatotype, applied as a final multiplier on TDEE
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    Ectomorph,
    Mesomorph,
    Endomorph,
}

impl BodyType {
    /// Parse a body-type string, falling back to Mesomorph (1.0) when unrecognized
    pub fn parse_lenient(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "ectomorph" => BodyType::Ectomorph,
            "mesomorph" => BodyType::Mesomorph,
            "endomorph" => BodyType::Endomorph,
            other => {
                tracing::warn!("Unknown body type '{}', defaulting to mesomorph", other);
                BodyType::Mesomorph
            }
        }
    }
}

// ============================================================================
// Meal Slot
// ============================================================================

/// One of the four fixed times of day meal entries are categorized into
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Morning,
    Midday,
    Evening,
    Night,
}

impl MealSlot {
    /// All slots in day order
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Morning,
        MealSlot::Midday,
        MealSlot::Evening,
        MealSlot::Night,
    ];

    /// Stable index into per-slot arrays
    pub fn index(self) -> usize {
        match self {
            MealSlot::Morning => 0,
            MealSlot::Midday => 1,
            MealSlot::Evening => 2,
            MealSlot::Night => 3,
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MealSlot::Morning => "morning",
            MealSlot::Midday => "midday",
            MealSlot::Evening => "evening",
            MealSlot::Night => "night",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for MealSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(MealSlot::Morning),
            "midday" => Ok(MealSlot::Midday),
            "evening" => Ok(MealSlot::Evening),
            "night" => Ok(MealSlot::Night),
            other => Err(Error::Validation(format!("unknown meal slot '{}'", other))),
        }
    }
}

// ============================================================================
// Persisted Rows
// ============================================================================

/// A registered user with biometric inputs and derived energy targets
///
/// `bmr` and `tdee` are derived columns: they are recomputed and persisted
/// whenever any biometric input changes and are never set directly by callers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub age: u32,
    pub height_cm: u32,
    pub weight_kg: u32,
    pub gender: Gender,
    pub goal: Goal,
    pub activity: ActivityLevel,
    pub body_type: BodyType,
    pub profile_picture: Option<String>,
    pub bmr: f64,
    pub tdee: f64,
}

/// Where a food entry came from
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    /// Logged by a user for a specific day; counted in aggregation
    UserLogged,
    /// Shared reference data with no owner; copied on selection, never aggregated
    CatalogSeed,
}

/// A food row, either a user-logged entry or a shared catalog seed
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: Uuid,
    pub name: String,
    pub portion_count: u32,
    pub protein_grams: u32,
    pub calories: u32,
    /// Opaque image filename handed through from the upload layer
    pub image: Option<String>,
    pub origin: EntryOrigin,
    /// None exactly when origin is CatalogSeed
    pub user_id: Option<Uuid>,
}

/// Links a food entry to a user, a meal slot, and a calendar date
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MealLogRecord {
    pub id: Uuid,
    pub food_id: Uuid,
    pub user_id: Uuid,
    pub slot: MealSlot,
    pub date: NaiveDate,
}

/// Immutable snapshot of a day's totals, created only by the archiver
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub total_protein: u64,
    pub total_calories: u64,
}

// ============================================================================
// Computed Outputs
// ============================================================================

/// Output of the target calculator
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Targets {
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: f64,
    pub target_protein: f64,
}

/// Totals for a single meal slot
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SlotSummary {
    pub total_protein: u64,
    pub total_calories: u64,
}

/// Full daily rollup: per-slot and overall totals plus target progress
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub slots: [SlotSummary; 4],
    pub total_protein: u64,
    pub total_calories: u64,
    pub targets: Targets,
    /// Percent of target calories consumed, 1 decimal, clamped to [0, 100]
    pub progress_calories: f64,
    /// Percent of target protein consumed, 1 decimal, clamped to [0, 100]
    pub progress_protein: f64,
    pub calories_reached: bool,
    pub protein_reached: bool,
}

impl DaySummary {
    /// Totals for one slot
    pub fn slot(&self, slot: MealSlot) -> &SlotSummary {
        &self.slots[slot.index()]
    }
}

// ============================================================================
// Typed Inputs
// ============================================================================

/// Validated-at-the-boundary input for a single meal-ledger entry
#[derive(Clone, Debug)]
pub struct NewFoodEntry {
    pub name: String,
    pub portion_count: u32,
    pub protein_grams: u32,
    pub calories: u32,
    pub image: Option<String>,
    pub slot: MealSlot,
    pub date: NaiveDate,
}

/// A numeric batch field that may arrive as a number or a string with units
///
/// Batch payloads come from scraped menus where "25 g" and "120 kkal" are
/// common; string values keep their digits only.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Numberish {
    Num(u64),
    Text(String),
}

impl Numberish {
    /// Extract the numeric value, stripping non-digit characters from strings
    pub fn digits(&self) -> Option<u32> {
        match self {
            Numberish::Num(n) => u32::try_from(*n).ok(),
            Numberish::Text(s) => {
                let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
                digits.parse().ok()
            }
        }
    }
}

/// One item of a batch submission; every field optional so that malformed
/// items can be skipped without failing the sibling items
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BatchItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub portion: Option<Numberish>,
    #[serde(default)]
    pub protein: Option<Numberish>,
    #[serde(default)]
    pub calories: Option<Numberish>,
    #[serde(default)]
    pub slot: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl BatchItem {
    /// Convert into a validated entry, or None when a required field is
    /// missing or unusable
    pub fn into_new_entry(self, date: NaiveDate) -> Option<NewFoodEntry> {
        let name = self.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())?;
        let portion_count = self.portion.as_ref().and_then(Numberish::digits).filter(|p| *p >= 1)?;
        let protein_grams = self.protein.as_ref().and_then(Numberish::digits)?;
        let calories = self.calories.as_ref().and_then(Numberish::digits)?;
        let slot = self.slot.as_deref().and_then(|s| MealSlot::from_str(s).ok())?;

        Some(NewFoodEntry {
            name,
            portion_count,
            protein_grams,
            calories,
            image: self.image,
            slot,
            date,
        })
    }
}
