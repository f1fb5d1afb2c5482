use axum::extract::{Path, State};
use axum::Json;
use shared::{PostId, VoteRequest, VoteResponse};
use tracing::info;

use crate::api::Db;
use crate::database_connection::DbResponse;
use crate::error::AppError;

pub async fn create_post(
    State(db): State<Db>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    let count = db.create_post(&payload.postid).await?;
    info!("Post {} registered with {count} votes", payload.postid);

    Ok(Json(VoteResponse::success(count)))
}

pub async fn get_post(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<VoteResponse>, AppError> {
    let post = PostId::new(id);

    match db.get_upvotes(&post).await? {
        DbResponse::Ok(count) => Ok(Json(VoteResponse::success(count))),
        DbResponse::Err => Err(AppError::PostNotFound(post)),
    }
}
