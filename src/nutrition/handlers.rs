use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::{get, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::aggregate::{aggregate, apply_adjustments, period_intake, Aggregates, PeriodIntake};
use super::dto::{AdjustRequest, AdjustResponse, AdjustmentInput, IntakeQuery};
use super::parser::parse_nutrients;
use super::repo;
use crate::{auth::AuthUser, error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/nutrition", get(get_nutrition))
        .route("/nutrition/adjust", put(adjust_nutrition))
        .route("/nutrition/intake", get(get_intake))
}

async fn load_aggregates(state: &AppState, user_id: uuid::Uuid) -> anyhow::Result<Aggregates> {
    let uploads = repo::list_upload_responses(&state.db, user_id).await?;
    let mut agg = aggregate(
        uploads
            .iter()
            .map(|u| (u.created_at, parse_nutrients(&u.ai_response))),
    );
    let adjustments = repo::list_adjustments(&state.db, user_id).await?;
    apply_adjustments(&mut agg.daily, &adjustments);
    Ok(agg)
}

#[instrument(skip(state))]
pub async fn get_nutrition(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Aggregates>, ApiError> {
    let agg = load_aggregates(&state, user_id)
        .await
        .map_err(ApiError::internal("Failed to fetch nutrition data"))?;
    Ok(Json(agg))
}

#[instrument(skip(state, payload))]
pub async fn adjust_nutrition(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<AdjustRequest>, JsonRejection>,
) -> Result<Json<AdjustResponse>, ApiError> {
    let Json(body) = payload?;
    let input = AdjustmentInput::try_from(body)?;

    let adjustment = repo::upsert_adjustment(&state.db, user_id, &input)
        .await
        .map_err(ApiError::internal("Failed to update nutrition adjustment"))?;

    info!(%user_id, date = %input.date, "nutrition adjusted");
    Ok(Json(AdjustResponse { adjustment }))
}

#[instrument(skip(state, query))]
pub async fn get_intake(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<IntakeQuery>, QueryRejection>,
) -> Result<Json<PeriodIntake>, ApiError> {
    let Query(q) = query?;
    let agg = load_aggregates(&state, user_id)
        .await
        .map_err(ApiError::internal("Failed to fetch nutrition data"))?;
    let today = OffsetDateTime::now_utc().date();
    Ok(Json(period_intake(&agg.daily, today, q.period)))
}
