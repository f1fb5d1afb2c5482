use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use shared::{PostId, VoteDirection, VoteRequest, VoteResponse};
use tracing::info;

use crate::api::Db;
use crate::database_connection::DbResponse;
use crate::error::AppError;

pub async fn upvote(
    State(db): State<Db>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    vote(&db, payload.postid, VoteDirection::Up).await
}

pub async fn downvote(
    State(db): State<Db>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, AppError> {
    vote(&db, payload.postid, VoteDirection::Down).await
}

pub async fn post_upvote(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<VoteResponse>, AppError> {
    let post = path_post(id, &body)?;
    vote(&db, post, VoteDirection::Up).await
}

pub async fn post_downvote(
    State(db): State<Db>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<VoteResponse>, AppError> {
    let post = path_post(id, &body)?;
    vote(&db, post, VoteDirection::Down).await
}

/// The path names the post. A body is optional, but when present it has to
/// parse and agree with the path.
fn path_post(id: String, body: &[u8]) -> Result<PostId, AppError> {
    let path = PostId::new(id);

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(path);
    }

    let payload: VoteRequest =
        serde_json::from_slice(body).map_err(|e| AppError::MalformedBody(e.to_string()))?;

    if payload.postid != path {
        return Err(AppError::PostIdMismatch { path, body: payload.postid });
    }

    Ok(path)
}

async fn vote(db: &Db, post: PostId, direction: VoteDirection) -> Result<Json<VoteResponse>, AppError> {
    match db.apply_vote(&post, direction).await? {
        DbResponse::Ok(count) => {
            info!("{direction} on post {post}, count is now {count}");
            Ok(Json(VoteResponse::success(count)))
        }
        DbResponse::Err => Err(AppError::PostNotFound(post)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::api::routes;
    use crate::database_connection::DatabaseConnection;

    async fn db_with_post(id: &str) -> Db {
        let db = DatabaseConnection::in_memory().await;
        db.create_post(&PostId::new(id)).await.unwrap();
        Arc::new(db)
    }

    async fn post_json(db: &Db, uri: &str, body: &str) -> (StatusCode, VoteResponse) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json;charset=UTF-8")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = routes(db.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn upvote_returns_new_count() {
        let db = db_with_post("42").await;

        let (status, body) = post_json(&db, "/upvote", r#"{"postid":"42"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, VoteResponse::success(1));
    }

    #[tokio::test]
    async fn numeric_post_ids_are_accepted() {
        let db = db_with_post("42").await;

        post_json(&db, "/upvote", r#"{"postid":42}"#).await;
        let (_, body) = post_json(&db, "/downvote", r#"{"postid":42}"#).await;

        assert_eq!(body, VoteResponse::success(0));
    }

    #[tokio::test]
    async fn unknown_post_is_not_found() {
        let db = db_with_post("42").await;

        let (status, body) = post_json(&db, "/upvote", r#"{"postid":"7"}"#).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.status, "not_found");
        assert_eq!(body.success_count(), None);
    }

    #[tokio::test]
    async fn per_post_routes_use_path_id() {
        let db = db_with_post("42").await;

        let (_, body) = post_json(&db, "/posts/42/upvote", r#"{"postid":"42"}"#).await;
        assert_eq!(body, VoteResponse::success(1));

        let (_, body) = post_json(&db, "/posts/42/downvote", "").await;
        assert_eq!(body, VoteResponse::success(0));
    }

    #[tokio::test]
    async fn per_post_body_must_match_path() {
        let db = db_with_post("42").await;

        let (status, body) = post_json(&db, "/posts/42/upvote", r#"{"postid":"43"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.status, "bad_request");
        assert_eq!(db.get_upvotes(&PostId::new("42")).await.unwrap(), DbResponse::Ok(0));
    }

    #[tokio::test]
    async fn per_post_malformed_body_is_refused() {
        let db = db_with_post("42").await;

        for body in [r#"{"postid":"#, r#"{"postid":4.2}"#, r#"{"postid":"43""#, "[]"] {
            let (status, reply) = post_json(&db, "/posts/42/upvote", body).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
            assert_eq!(reply.status, "bad_request");
        }

        assert_eq!(db.get_upvotes(&PostId::new("42")).await.unwrap(), DbResponse::Ok(0));
    }

    #[tokio::test]
    async fn per_post_numeric_body_matches_path() {
        let db = db_with_post("42").await;

        let (status, body) = post_json(&db, "/posts/42/downvote", r#"{"postid":42}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, VoteResponse::success(-1));
    }

    #[tokio::test]
    async fn concurrent_votes_are_all_counted() {
        let db = db_with_post("42").await;

        let votes = (0..20).map(|_| {
            let db = db.clone();
            tokio::spawn(async move { db.apply_vote(&PostId::new("42"), VoteDirection::Up).await })
        });
        for v in votes.collect::<Vec<_>>() {
            v.await.unwrap().unwrap();
        }

        assert_eq!(db.get_upvotes(&PostId::new("42")).await.unwrap(), DbResponse::Ok(20));
    }
}
