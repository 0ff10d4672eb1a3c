use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{ProfileInput, ProfileRequest};
use super::needs::CaloricNeeds;
use super::repo;
use super::repo_types::UserProfile;
use crate::{auth::AuthUser, error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/profile", get(get_profile).put(put_profile))
        .route("/user/profile/needs", get(get_needs))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Option<UserProfile>>, ApiError> {
    let profile = repo::find_by_user(&state.db, user_id)
        .await
        .map_err(ApiError::internal("Failed to fetch user profile"))?;
    Ok(Json(profile))
}

#[instrument(skip(state, payload))]
pub async fn put_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(body) = payload?;
    let input = ProfileInput::try_from(body)?;

    let profile = repo::upsert(&state.db, user_id, &input)
        .await
        .map_err(ApiError::internal("Failed to update user profile"))?;

    info!(%user_id, "user profile saved");
    Ok(Json(profile))
}

#[instrument(skip(state))]
pub async fn get_needs(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<CaloricNeeds>, ApiError> {
    let profile = repo::find_by_user(&state.db, user_id)
        .await
        .map_err(ApiError::internal("Failed to fetch user profile"))?
        .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;

    match profile.needs() {
        Some(needs) => Ok(Json(needs)),
        None => {
            warn!(%user_id, gender = %profile.gender, "stored profile has unknown gender");
            Err(ApiError::BadRequest("Profile gender is not set".into()))
        }
    }
}
