use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use super::dto::ProfileRequest;
use super::repo;
use super::repo_types::UserProfile;
use crate::calculations::{calorie_goal, derive_targets, rda_targets, round_whole, Gender};
use crate::daily_logs::{repo as daily_logs_repo, services::today};
use crate::nutrition::repo as targets_repo;
use crate::state::AppState;
use crate::weight_logs::repo as weight_logs_repo;
use crate::weight_logs::services::{weight_changed, PROFILE_NOTE};

/// The targets a day should be measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedTargets {
    pub calorie_goal: i32,
    pub protein_target_g: i32,
    pub carbs_target_g: i32,
    pub fat_target_g: i32,
    /// `None` when the user has no profile yet.
    pub water_target_ml: Option<i32>,
}

/// Used until the user saves a profile.
pub const DEFAULT_TARGETS: ResolvedTargets = ResolvedTargets {
    calorie_goal: 2000,
    protein_target_g: 150,
    carbs_target_g: 200,
    fat_target_g: 70,
    water_target_ml: None,
};

/// Effective targets for a profile.
///
/// The calorie goal is never stored; it is recomputed from the profile's
/// TDEE and goal. With custom targets switched on, each custom value that is
/// set (and non-zero) replaces its auto value; the others stay automatic.
pub fn resolve_targets(profile: Option<&UserProfile>) -> ResolvedTargets {
    let Some(p) = profile else {
        return DEFAULT_TARGETS;
    };
    let auto = ResolvedTargets {
        calorie_goal: round_whole(calorie_goal(p.tdee, p.goal())),
        protein_target_g: p.protein_target_g,
        carbs_target_g: p.carbs_target_g,
        fat_target_g: p.fat_target_g,
        water_target_ml: Some(p.water_target_ml),
    };
    if !p.use_custom_targets {
        return auto;
    }

    let pick = |custom: Option<i32>, auto: i32| custom.filter(|v| *v != 0).unwrap_or(auto);
    ResolvedTargets {
        calorie_goal: pick(p.custom_calorie_goal, auto.calorie_goal),
        protein_target_g: pick(p.custom_protein_target_g, auto.protein_target_g),
        carbs_target_g: pick(p.custom_carbs_target_g, auto.carbs_target_g),
        fat_target_g: pick(p.custom_fat_target_g, auto.fat_target_g),
        water_target_ml: Some(pick(p.custom_water_target_ml, p.water_target_ml)),
    }
}

pub async fn targets_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<ResolvedTargets> {
    let profile = repo::find(db, user_id).await?;
    Ok(resolve_targets(profile.as_ref()))
}

pub struct SavedProfile {
    pub profile: UserProfile,
    pub created: bool,
}

/// Creates or replaces the profile in one transaction: derived fields are
/// recomputed together, today's log snapshot follows the new targets, a
/// changed weight is recorded as today's weigh-in, and vitamin targets are
/// reseeded when age or gender changed.
pub async fn save_profile(
    st: &AppState,
    user_id: Uuid,
    req: &ProfileRequest,
) -> anyhow::Result<SavedProfile> {
    let derived = derive_targets(&req.metrics());

    let mut tx = st.db.begin().await?;
    let previous = repo::find_for_update(&mut tx, user_id).await?;
    let profile = repo::upsert(&mut tx, user_id, req, &derived).await?;

    let targets = resolve_targets(Some(&profile));
    let synced =
        daily_logs_repo::update_targets_for_date(&mut *tx, user_id, today(), &targets).await?;

    let weighed = weight_changed(previous.as_ref().map(|p| p.weight_kg), req.weight_kg);
    if weighed {
        weight_logs_repo::upsert(&mut *tx, user_id, today(), req.weight_kg, PROFILE_NOTE).await?;
    }

    let reseed = previous
        .as_ref()
        .map_or(true, |p| p.age != req.age || p.gender() != req.gender);
    if reseed {
        seed_vitamin_targets(&mut tx, user_id, req.age, req.gender).await?;
    }
    tx.commit().await?;

    info!(
        %user_id,
        created = previous.is_none(),
        synced_today = synced,
        weighed,
        reseeded = reseed,
        "profile saved"
    );
    Ok(SavedProfile {
        profile,
        created: previous.is_none(),
    })
}

async fn seed_vitamin_targets(
    conn: &mut PgConnection,
    user_id: Uuid,
    age: i32,
    gender: Gender,
) -> anyhow::Result<()> {
    let rdas = rda_targets(age, gender);
    for (nutrient, amount) in rdas.iter() {
        targets_repo::upsert_target(
            &mut *conn,
            user_id,
            nutrient.display_name(),
            *amount,
            nutrient.unit().as_str(),
        )
        .await?;
    }
    debug!(%user_id, age, %gender, "vitamin targets seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::metabolic::macro_targets;
    use crate::calculations::{ActivityLevel, BodyMetrics, Goal};
    use time::OffsetDateTime;

    fn profile(metrics: BodyMetrics) -> UserProfile {
        let d = derive_targets(&metrics);
        UserProfile {
            user_id: Uuid::nil(),
            age: metrics.age,
            weight_kg: metrics.weight_kg,
            height_cm: metrics.height_cm,
            gender: metrics.gender.to_string(),
            activity_level: metrics.activity_level.to_string(),
            goal: metrics.goal.to_string(),
            bmr: d.bmr,
            tdee: d.tdee,
            protein_target_g: d.macros.protein_g,
            carbs_target_g: d.macros.carbs_g,
            fat_target_g: d.macros.fat_g,
            water_target_ml: d.water_target_ml,
            use_custom_targets: false,
            custom_calorie_goal: None,
            custom_protein_target_g: None,
            custom_carbs_target_g: None,
            custom_fat_target_g: None,
            custom_water_target_ml: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn reference() -> UserProfile {
        profile(BodyMetrics {
            age: 30,
            weight_kg: 70.0,
            height_cm: 175.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::ModeratelyActive,
            goal: Goal::Lose,
        })
    }

    #[test]
    fn no_profile_uses_defaults() {
        let t = resolve_targets(None);
        assert_eq!(t, DEFAULT_TARGETS);
        assert_eq!(
            (t.calorie_goal, t.protein_target_g, t.carbs_target_g, t.fat_target_g),
            (2000, 150, 200, 70)
        );
    }

    #[test]
    fn auto_targets_match_direct_calculation() {
        let p = reference();
        let t = resolve_targets(Some(&p));
        let goal = calorie_goal(p.tdee, Goal::Lose);
        let macros = macro_targets(goal, p.weight_kg, Goal::Lose);
        assert_eq!(t.calorie_goal, round_whole(goal));
        assert_eq!(t.calorie_goal, 2056);
        assert_eq!(
            (t.protein_target_g, t.carbs_target_g, t.fat_target_g),
            (macros.protein_g, macros.carbs_g, macros.fat_g)
        );
        assert_eq!(t.water_target_ml, Some(2750));
    }

    #[test]
    fn custom_values_fall_back_per_field() {
        let mut p = reference();
        p.use_custom_targets = true;
        p.custom_protein_target_g = Some(180);
        p.custom_fat_target_g = Some(0);
        p.custom_water_target_ml = Some(3000);
        let t = resolve_targets(Some(&p));
        assert_eq!(t.protein_target_g, 180);
        assert_eq!(t.fat_target_g, p.fat_target_g);
        assert_eq!(t.carbs_target_g, p.carbs_target_g);
        assert_eq!(t.calorie_goal, 2056);
        assert_eq!(t.water_target_ml, Some(3000));
    }

    #[test]
    fn customs_are_ignored_when_switched_off() {
        let mut p = reference();
        p.custom_calorie_goal = Some(1500);
        p.custom_protein_target_g = Some(200);
        assert_eq!(resolve_targets(Some(&p)), resolve_targets(Some(&reference())));

        p.use_custom_targets = true;
        assert_eq!(resolve_targets(Some(&p)).calorie_goal, 1500);
    }

    #[test]
    fn unknown_stored_goal_resolves_as_maintain() {
        let mut p = reference();
        p.goal = "cut".into();
        assert_eq!(
            resolve_targets(Some(&p)).calorie_goal,
            round_whole(p.tdee)
        );
    }
}
