//! Profile registration and biometric updates.
//!
//! This is the validation boundary for biometric inputs. Whenever any input
//! that feeds the target calculator changes, the derived bmr/tdee columns
//! are recomputed and persisted in the same unit of work.

use crate::targets::compute_targets;
use crate::{
    ActivityLevel, BodyType, Error, Gender, Goal, NutritionStore, Result, UserProfile,
};
use uuid::Uuid;

pub const MIN_AGE: u32 = 10;
pub const MAX_AGE: u32 = 100;
pub const MIN_HEIGHT_CM: u32 = 100;
pub const MAX_HEIGHT_CM: u32 = 250;
pub const MIN_WEIGHT_KG: u32 = 30;
pub const MAX_WEIGHT_KG: u32 = 300;

/// Typed registration input
#[derive(Clone, Debug)]
pub struct RegisterProfile {
    pub username: String,
    pub age: u32,
    pub height_cm: u32,
    pub weight_kg: u32,
    pub gender: Gender,
    pub goal: Goal,
    pub activity: ActivityLevel,
    pub body_type: BodyType,
}

/// Partial biometric update; None leaves a field unchanged
#[derive(Clone, Debug, Default)]
pub struct BiometricUpdate {
    pub age: Option<u32>,
    pub height_cm: Option<u32>,
    pub weight_kg: Option<u32>,
    pub gender: Option<Gender>,
    pub goal: Option<Goal>,
    pub activity: Option<ActivityLevel>,
    pub body_type: Option<BodyType>,
}

fn validate_ranges(age: u32, height_cm: u32, weight_kg: u32) -> Result<()> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(Error::Validation(format!(
            "age must be between {} and {}",
            MIN_AGE, MAX_AGE
        )));
    }
    if !(MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&height_cm) {
        return Err(Error::Validation(format!(
            "height must be between {} and {} cm",
            MIN_HEIGHT_CM, MAX_HEIGHT_CM
        )));
    }
    if !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight_kg) {
        return Err(Error::Validation(format!(
            "weight must be between {} and {} kg",
            MIN_WEIGHT_KG, MAX_WEIGHT_KG
        )));
    }
    Ok(())
}

/// Register a new user, computing and persisting the derived targets
pub fn register_profile(store: &mut NutritionStore, input: RegisterProfile) -> Result<UserProfile> {
    let username = input.username.trim().to_string();
    if username.is_empty() {
        return Err(Error::Validation("username is required".into()));
    }
    if store.find_user_by_username(&username).is_some() {
        return Err(Error::Validation(format!(
            "username '{}' already exists",
            username
        )));
    }
    validate_ranges(input.age, input.height_cm, input.weight_kg)?;

    let mut profile = UserProfile {
        id: Uuid::new_v4(),
        username,
        age: input.age,
        height_cm: input.height_cm,
        weight_kg: input.weight_kg,
        gender: input.gender,
        goal: input.goal,
        activity: input.activity,
        body_type: input.body_type,
        profile_picture: None,
        bmr: 0.0,
        tdee: 0.0,
    };
    let targets = compute_targets(&profile);
    profile.bmr = targets.bmr;
    profile.tdee = targets.tdee;

    tracing::info!(
        "Registered '{}': bmr {:.0}, tdee {:.0}",
        profile.username,
        profile.bmr,
        profile.tdee
    );

    store.users.push(profile.clone());
    Ok(profile)
}

/// Apply a partial biometric update and recompute the derived targets
pub fn update_biometrics(
    store: &mut NutritionStore,
    user_id: Uuid,
    update: BiometricUpdate,
) -> Result<UserProfile> {
    let profile = store
        .users
        .iter_mut()
        .find(|u| u.id == user_id)
        .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))?;

    let age = update.age.unwrap_or(profile.age);
    let height_cm = update.height_cm.unwrap_or(profile.height_cm);
    let weight_kg = update.weight_kg.unwrap_or(profile.weight_kg);
    validate_ranges(age, height_cm, weight_kg)?;

    profile.age = age;
    profile.height_cm = height_cm;
    profile.weight_kg = weight_kg;
    if let Some(gender) = update.gender {
        profile.gender = gender;
    }
    if let Some(goal) = update.goal {
        profile.goal = goal;
    }
    if let Some(activity) = update.activity {
        profile.activity = activity;
    }
    if let Some(body_type) = update.body_type {
        profile.body_type = body_type;
    }

    let targets = compute_targets(profile);
    profile.bmr = targets.bmr;
    profile.tdee = targets.tdee;

    tracing::info!(
        "Updated biometrics for '{}': bmr {:.0}, tdee {:.0}",
        profile.username,
        profile.bmr,
        profile.tdee
    );

    Ok(profile.clone())
}

/// Attach an opaque image filename to a profile
pub fn set_profile_picture(
    store: &mut NutritionStore,
    user_id: Uuid,
    filename: String,
) -> Result<()> {
    let profile = store
        .users
        .iter_mut()
        .find(|u| u.id == user_id)
        .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))?;
    profile.profile_picture = Some(filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_input(username: &str) -> RegisterProfile {
        RegisterProfile {
            username: username.into(),
            age: 25,
            height_cm: 175,
            weight_kg: 70,
            gender: Gender::Male,
            goal: Goal::Maintain,
            activity: ActivityLevel::Light,
            body_type: BodyType::Mesomorph,
        }
    }

    #[test]
    fn test_register_persists_derived_targets() {
        let mut store = NutritionStore::default();
        let profile = register_profile(&mut store, register_input("budi")).unwrap();

        assert!((profile.bmr - 1673.75).abs() < 1e-9);
        assert!((profile.tdee - 1673.75 * 1.375).abs() < 1e-9);
        assert_eq!(store.users.len(), 1);
    }

    #[test]
    fn test_duplicate_username_rejected_without_write() {
        let mut store = NutritionStore::default();
        register_profile(&mut store, register_input("budi")).unwrap();

        let result = register_profile(&mut store, register_input("budi"));
        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(store.users.len(), 1);
    }

    #[test]
    fn test_out_of_range_age_rejected() {
        let mut store = NutritionStore::default();
        let mut input = register_input("tua");
        input.age = 101;

        let result = register_profile(&mut store, input);
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(store.users.is_empty());
    }

    #[test]
    fn test_update_recomputes_targets() {
        let mut store = NutritionStore::default();
        let profile = register_profile(&mut store, register_input("budi")).unwrap();

        let updated = update_biometrics(
            &mut store,
            profile.id,
            BiometricUpdate {
                weight_kg: Some(80),
                ..Default::default()
            },
        )
        .unwrap();

        // 10*80 + 6.25*175 - 5*25 + 5
        assert!((updated.bmr - 1773.75).abs() < 1e-9);
        assert!((updated.tdee - 1773.75 * 1.375).abs() < 1e-9);

        // The stored row carries the recomputed values too
        let stored = store.find_user_by_id(profile.id).unwrap();
        assert!((stored.bmr - updated.bmr).abs() < 1e-9);
    }

    #[test]
    fn test_update_rejects_out_of_range_without_mutating() {
        let mut store = NutritionStore::default();
        let profile = register_profile(&mut store, register_input("budi")).unwrap();

        let result = update_biometrics(
            &mut store,
            profile.id,
            BiometricUpdate {
                weight_kg: Some(500),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::Validation(_))));

        let stored = store.find_user_by_id(profile.id).unwrap();
        assert_eq!(stored.weight_kg, 70);
    }

    #[test]
    fn test_update_unknown_user_not_found() {
        let mut store = NutritionStore::default();
        let result = update_biometrics(&mut store, Uuid::new_v4(), BiometricUpdate::default());
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
