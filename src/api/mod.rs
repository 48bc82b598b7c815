mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;
use crate::manager::TaskManager;

/// Shared router state: the persistence gateway plus the task lifecycle
/// manager built on top of it.
#[derive(Clone)]
pub struct AppState {
    db: Database,
    manager: TaskManager,
}

pub fn create_router(db: Database) -> Router {
    let state = AppState {
        manager: TaskManager::new(db.clone()),
        db,
    };

    let api = Router::new()
        // Boards
        .route("/boards", get(handlers::list_boards))
        .route("/boards", post(handlers::create_board))
        .route("/boards/{id}", get(handlers::get_board))
        .route("/boards/{id}", put(handlers::update_board))
        .route("/boards/{id}", delete(handlers::delete_board))
        .route("/boards/{id}/members", get(handlers::list_board_members))
        .route("/boards/{id}/members", post(handlers::create_board_member))
        // Members
        .route("/members/{id}", get(handlers::get_member))
        .route("/members/{id}", put(handlers::update_member))
        .route("/members/{id}", delete(handlers::delete_member))
        .route("/members/{id}/tasks", get(handlers::list_member_tasks))
        // Tasks
        .route("/tasks", post(handlers::create_task))
        .route("/tasks/{id}", get(handlers::get_task))
        .route("/tasks/{id}", put(handlers::update_task))
        .route("/tasks/{id}", delete(handlers::delete_task))
        .route("/tasks/{id}/split", post(handlers::split_task))
        .route("/tasks/{id}/merge", post(handlers::merge_task))
        .route("/tasks/{id}/move", post(handlers::move_task))
        // Weeks
        .route("/weeks/{year}/{week}", get(handlers::get_week))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
