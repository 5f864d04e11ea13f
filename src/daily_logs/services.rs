use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use super::repo::{self, NewDailyLog};
use super::repo_types::DailyLog;
use crate::error::{AppError, AppResult};
use crate::profile;
use crate::state::AppState;

/// Calendar day used for "today", in UTC.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// The user's log for `date`, created with a snapshot of the current
/// effective targets if it doesn't exist yet.
pub async fn get_or_create(st: &AppState, user_id: Uuid, date: Date) -> AppResult<DailyLog> {
    if let Some(log) = repo::find_by_date(&st.db, user_id, date).await? {
        return Ok(log);
    }
    let targets = profile::targets_for_user(&st.db, user_id).await?;
    match repo::insert(&st.db, user_id, date, &targets, &NewDailyLog::default()).await? {
        Some(log) => {
            info!(%user_id, log_id = %log.id, %date, "daily log created");
            Ok(log)
        }
        // lost a race with a concurrent create for the same date
        None => repo::find_by_date(&st.db, user_id, date)
            .await?
            .ok_or(AppError::NotFound("Daily log")),
    }
}

/// The user's existing log for `date`. Never creates one.
pub async fn find_for_date(st: &AppState, user_id: Uuid, date: Date) -> AppResult<DailyLog> {
    existing(repo::find_by_date(&st.db, user_id, date).await?)
}

fn existing(log: Option<DailyLog>) -> AppResult<DailyLog> {
    log.ok_or(AppError::NotFound("Daily log"))
}

/// NotFound unless `log_id` is one of the user's logs.
pub async fn ensure_owned(st: &AppState, user_id: Uuid, log_id: Uuid) -> AppResult<()> {
    if repo::is_owned(&st.db, user_id, log_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Daily log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};

    fn log(date: Date) -> DailyLog {
        DailyLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date,
            calorie_goal: 2000,
            protein_target_g: 150,
            carbs_target_g: 200,
            fat_target_g: 67,
            total_calories: 0.0,
            total_water_ml: 0,
            exercise_minutes: 0,
            notes: String::new(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn missing_day_is_not_found() {
        let err = existing(None).unwrap_err();
        assert!(matches!(err, AppError::NotFound("Daily log")));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn existing_day_is_returned_as_is() {
        let day = log(Date::MIN);
        let id = day.id;
        assert_eq!(existing(Some(day)).unwrap().id, id);
    }
}
