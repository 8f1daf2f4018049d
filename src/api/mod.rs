pub mod appointment;
pub mod doctor;
pub mod notification;
pub mod user;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use sea_orm::{DatabaseConnection, DbErr};
use serde_json::json;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

/// The four CRUD groups under `/api`, with the frontend bundle as the fallback.
///
/// Any path that is neither an API route nor a file in `static_dir` gets
/// `index.html`, so client-side routes survive a reload.
pub fn router(db: DatabaseConnection, static_dir: &Path) -> Router {
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .nest("/api/user", user_routes())
        .nest("/api/doctor", doctor_routes())
        .nest("/api/appointment", appointment_routes())
        .nest("/api/notification", notification_routes())
        .fallback_service(spa)
        .layer(Extension(db))
}

fn user_routes() -> Router {
    Router::new()
        .route("/", get(user::list_users).post(user::create_user))
        .route(
            "/:id",
            get(user::get_user)
                .patch(user::update_user)
                .delete(user::delete_user),
        )
}

fn doctor_routes() -> Router {
    Router::new()
        .route("/", get(doctor::list_doctors).post(doctor::create_doctor))
        .route(
            "/:id",
            get(doctor::get_doctor)
                .patch(doctor::update_doctor)
                .delete(doctor::delete_doctor),
        )
}

fn appointment_routes() -> Router {
    Router::new()
        .route(
            "/",
            get(appointment::list_appointments).post(appointment::create_appointment),
        )
        .route(
            "/:id",
            get(appointment::get_appointment)
                .patch(appointment::update_appointment)
                .delete(appointment::delete_appointment),
        )
}

fn notification_routes() -> Router {
    Router::new()
        .route(
            "/",
            get(notification::list_notifications).post(notification::create_notification),
        )
        .route("/:id", axum::routing::delete(notification::delete_notification))
        .route("/:id/read", post(notification::mark_read))
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({"error": message.into()}))).into_response()
}

pub(crate) fn not_found(what: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("{what} not found"))
}

pub(crate) fn db_error(e: DbErr) -> Response {
    tracing::Span::current().record("error", tracing::field::display(&e));
    tracing::error!("Database error: {}", e);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
