use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::database_connection::DatabaseConnection;

pub mod posts;
pub mod votes;

pub type Db = Arc<DatabaseConnection>;

pub fn routes(db: Db) -> Router {
    Router::new()
        .route("/upvote", post(votes::upvote))
        .route("/downvote", post(votes::downvote))
        .route("/posts", post(posts::create_post))
        .route("/posts/:id", get(posts::get_post))
        .route("/posts/:id/upvote", post(votes::post_upvote))
        .route("/posts/:id/downvote", post(votes::post_downvote))
        .with_state(db)
}
