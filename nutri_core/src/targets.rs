//! Target calculator: BMR, TDEE, and goal-adjusted calorie/protein targets.
//!
//! Everything in this module is a pure function of the profile's biometric
//! inputs. Range validation happens at the profile boundary; this module
//! assumes valid inputs.

use crate::{ActivityLevel, BodyType, Gender, Goal, Targets, UserProfile};

/// Activity multiplier applied to BMR
pub fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::Heavy => 1.725,
    }
}

/// Somatotype multiplier applied to TDEE
pub fn body_type_multiplier(body_type: BodyType) -> f64 {
    match body_type {
        BodyType::Ectomorph => 1.1,
        BodyType::Mesomorph => 1.0,
        BodyType::Endomorph => 0.9,
    }
}

/// Basal Metabolic Rate via Mifflin-St Jeor
pub fn compute_bmr(gender: Gender, weight_kg: u32, height_cm: u32, age: u32) -> f64 {
    let base = 10.0 * weight_kg as f64 + 6.25 * height_cm as f64 - 5.0 * age as f64;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Calorie surplus/deficit applied for bulk/cut goals
const GOAL_CALORIE_DELTA: f64 = 300.0;

/// Compute BMR, TDEE, and goal-adjusted targets for a profile
///
/// Deterministic: identical inputs always yield identical outputs.
pub fn compute_targets(profile: &UserProfile) -> Targets {
    let bmr = compute_bmr(profile.gender, profile.weight_kg, profile.height_cm, profile.age);
    let tdee = bmr * activity_multiplier(profile.activity) * body_type_multiplier(profile.body_type);

    let weight = profile.weight_kg as f64;
    let (target_calories, target_protein) = match profile.goal {
        Goal::Bulk => (tdee + GOAL_CALORIE_DELTA, weight * 2.2),
        Goal::Cut => (tdee - GOAL_CALORIE_DELTA, weight * 2.5),
        Goal::Maintain => (tdee, weight * 2.0),
    };

    Targets {
        bmr,
        tdee,
        target_calories,
        target_protein,
    }
}
