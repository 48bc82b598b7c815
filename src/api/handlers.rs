use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::AppState;
use crate::error::Error;
use crate::models::*;
use crate::week;

// ============================================================
// Error Handling
// ============================================================

/// HTTP translation of the domain error taxonomy.
///
/// Validation failures carry the full violation list for the client; a
/// persistence failure is logged server-side and the client only sees a
/// generic message, so internals never leak.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            Error::Validation(violations) => {
                tracing::warn!("Validation error: {}", violations.join("; "));
                (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "errors": violations })),
                )
                    .into_response()
            }
            err @ Error::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": err.to_string() })),
            )
                .into_response(),
            Error::Persistence(e) => {
                tracing::error!("Persistence error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Boards
// ============================================================

pub async fn list_boards(State(state): State<AppState>) -> Result<Json<Vec<Board>>, ApiError> {
    Ok(Json(state.db.get_all_boards()?))
}

pub async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Board>, ApiError> {
    let board = state
        .db
        .get_board(id)?
        .ok_or(Error::not_found("board", id))?;
    Ok(Json(board))
}

pub async fn create_board(
    State(state): State<AppState>,
    Json(input): Json<CreateBoardInput>,
) -> Result<(StatusCode, Json<Board>), ApiError> {
    Ok((StatusCode::CREATED, Json(state.db.create_board(input)?)))
}

pub async fn update_board(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateBoardInput>,
) -> Result<Json<Board>, ApiError> {
    let board = state
        .db
        .update_board(id, input)?
        .ok_or(Error::not_found("board", id))?;
    Ok(Json(board))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.db.delete_board(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("board", id).into())
    }
}

// ============================================================
// Members
// ============================================================

pub async fn list_board_members(
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
) -> Result<Json<Vec<Member>>, ApiError> {
    state
        .db
        .get_board(board_id)?
        .ok_or(Error::not_found("board", board_id))?;

    Ok(Json(state.db.get_members_by_board(board_id)?))
}

pub async fn create_board_member(
    State(state): State<AppState>,
    Path(board_id): Path<i64>,
    Json(input): Json<CreateMemberInput>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    let member = state.db.create_member(board_id, input)?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Member>, ApiError> {
    let member = state
        .db
        .get_member(id)?
        .ok_or(Error::not_found("member", id))?;
    Ok(Json(member))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateMemberInput>,
) -> Result<Json<Member>, ApiError> {
    let member = state
        .db
        .update_member(id, input)?
        .ok_or(Error::not_found("member", id))?;
    Ok(Json(member))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.db.delete_member(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::not_found("member", id).into())
    }
}

// ============================================================
// Tasks
// ============================================================

/// Query parameters for listing a member's tasks.
#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    /// Restrict to one board day.
    pub date: Option<NaiveDate>,
}

pub async fn list_member_tasks(
    State(state): State<AppState>,
    Path(member_id): Path<i64>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    state
        .db
        .get_member(member_id)?
        .ok_or(Error::not_found("member", member_id))?;

    Ok(Json(state.db.get_tasks_by_member(member_id, query.date)?))
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(patch): Json<TaskPatch>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.manager.create(&patch)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.manager.find(id)?))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.manager.update(id, &patch)?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let task = state.manager.find(id)?;
    state.manager.remove(&task)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn split_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SplitResponse>, ApiError> {
    let mut task = state.manager.find(id)?;
    let sibling = state.manager.split(&mut task)?;
    Ok(Json(SplitResponse { task, sibling }))
}

pub async fn merge_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<MergeTaskInput>,
) -> Result<Json<Task>, ApiError> {
    let mut target = state.manager.find(id)?;
    let source = state.manager.find(input.source)?;
    state.manager.merge(&source, &mut target)?;
    Ok(Json(target))
}

pub async fn move_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<MoveTaskInput>,
) -> Result<Json<Task>, ApiError> {
    let date: NaiveDate = input.date.parse().map_err(|_| {
        Error::validation(format!(
            "Date '{}' is not a valid YYYY-MM-DD date",
            input.date
        ))
    })?;

    let mut task = state.manager.find(id)?;
    state.manager.move_to(&mut task, input.member, date)?;
    Ok(Json(task))
}

// ============================================================
// Weeks
// ============================================================

pub async fn get_week(
    Path((year, week)): Path<(i32, u32)>,
) -> Result<Json<Vec<NaiveDate>>, ApiError> {
    let days = week::working_days(year, week)
        .ok_or_else(|| Error::validation(format!("Week {week} of {year} does not exist")))?;
    Ok(Json(days))
}
