//! Route definitions for the Docusphere HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The local
//! asset directory is served under `/assets` when the local provider is
//! active.

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::services::ServeDir;

use crate::handlers;
use crate::state::AppState;

/// Build the router with every route, threading `AppState` through.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(file_routes())
        .merge(folder_routes())
        .merge(history_routes())
        .merge(task_routes())
        .merge(post_routes())
        .merge(user_routes())
        .merge(dashboard_routes());

    let mut router = Router::new().nest("/api", api_routes);

    let storage = &state.config.storage;
    if storage.provider == "local" {
        router = router.nest_service("/assets", ServeDir::new(&storage.local.root_path));
    }

    router.with_state(state)
}

/// Health check (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Registration, login, current identity
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// File listing, upload, metadata, sharing, delivery
fn file_routes() -> Router<AppState> {
    use handlers::file;

    Router::new()
        .route("/files", get(file::list_files).post(file::upload_file))
        .route("/files/shared", get(file::shared_files))
        .route(
            "/files/{id}",
            get(file::get_file)
                .put(file::update_file)
                .delete(file::delete_file),
        )
        .route("/files/{id}/rename", put(file::rename_file))
        .route("/files/{id}/move", put(file::move_file))
        .route(
            "/files/{id}/share",
            post(file::share_file).delete(file::unshare_file),
        )
        .route("/files/{id}/download", get(file::download_file))
        .route("/files/{id}/preview", get(file::preview_file))
}

/// Folder hierarchy
fn folder_routes() -> Router<AppState> {
    use handlers::folder;

    Router::new()
        .route(
            "/folders",
            get(folder::list_owned).post(folder::create_folder),
        )
        .route("/folders/contents", get(folder::root_contents))
        .route("/folders/{id}/contents", get(folder::folder_contents))
        .route(
            "/folders/{id}",
            put(folder::set_visibility).delete(folder::delete_folder),
        )
        .route("/folders/{id}/rename", put(folder::rename_folder))
        .route("/folders/{id}/move", put(folder::move_folder))
        .route(
            "/folders/{id}/share",
            post(folder::share_folder).delete(folder::unshare_folder),
        )
}

/// Activity log
fn history_routes() -> Router<AppState> {
    Router::new().route(
        "/history",
        get(handlers::history::query_history).post(handlers::history::record_history),
    )
}

/// Task board
fn task_routes() -> Router<AppState> {
    use handlers::task;

    Router::new()
        .route("/tasks", get(task::list_tasks).post(task::create_task))
        .route(
            "/tasks/{id}",
            get(task::get_task)
                .put(task::update_task)
                .delete(task::delete_task),
        )
        .route("/tasks/{id}/complete", post(task::complete_task))
}

/// Community feed
fn post_routes() -> Router<AppState> {
    use handlers::post as posts;

    Router::new()
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/top-authors", get(posts::top_authors))
        .route("/posts/upload", post(posts::upload_attachment))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/posts/{id}/comments", post(posts::add_comment))
        .route("/posts/{id}/like", put(posts::toggle_like))
}

/// Account administration and self-service
fn user_routes() -> Router<AppState> {
    use handlers::user;

    Router::new()
        .route("/users", get(user::list_users).post(user::create_user))
        .route(
            "/users/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route("/users/{id}/change-info", post(user::change_info))
        .route("/users/{id}/change-password", post(user::change_password))
}

/// Dashboard aggregates
fn dashboard_routes() -> Router<AppState> {
    use handlers::statistics;

    Router::new()
        .route("/statistics", get(statistics::statistics))
        .route("/storage/chart", get(statistics::storage_chart))
        .route("/activity/chart", get(statistics::activity_chart))
        .route("/login-history/chart", get(statistics::login_chart))
}
