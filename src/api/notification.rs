use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::{db_error, not_found};
use crate::entities::{notification, user};

#[derive(Deserialize, Default)]
pub struct NotificationFilter {
    pub user_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: i32,
    pub content: String,
}

// GET /api/notification?user_id=
pub async fn list_notifications(
    Extension(db): Extension<DatabaseConnection>,
    Query(filter): Query<NotificationFilter>,
) -> Response {
    let mut query = notification::Entity::find();
    if let Some(user_id) = filter.user_id {
        query = query.filter(notification::Column::UserId.eq(user_id));
    }

    match query.order_by_desc(notification::Column::Id).all(&db).await {
        Ok(notifications) => (StatusCode::OK, Json(notifications)).into_response(),
        Err(e) => db_error(e),
    }
}

// POST /api/notification
pub async fn create_notification(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateNotificationRequest>,
) -> Response {
    match user::Entity::find_by_id(payload.user_id).one(&db).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("User"),
        Err(e) => return db_error(e),
    }

    let new_notification = notification::ActiveModel {
        user_id: Set(payload.user_id),
        is_read: Set(false),
        content: Set(payload.content),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    };

    match new_notification.insert(&db).await {
        Ok(n) => {
            crate::metrics::increment_created("notifications");
            (StatusCode::CREATED, Json(n)).into_response()
        }
        Err(e) => db_error(e),
    }
}

// POST /api/notification/:id/read
pub async fn mark_read(
    Extension(db): Extension<DatabaseConnection>,
    Path(notification_id): Path<i32>,
) -> Response {
    let existing = match notification::Entity::find_by_id(notification_id).one(&db).await {
        Ok(Some(n)) => n,
        Ok(None) => return not_found("Notification"),
        Err(e) => return db_error(e),
    };
    if existing.is_read {
        return (StatusCode::OK, Json(existing)).into_response();
    }

    let mut active = existing.into_active_model();
    active.is_read = Set(true);
    match active.update(&db).await {
        Ok(n) => (StatusCode::OK, Json(n)).into_response(),
        Err(e) => db_error(e),
    }
}

// DELETE /api/notification/:id
pub async fn delete_notification(
    Extension(db): Extension<DatabaseConnection>,
    Path(notification_id): Path<i32>,
) -> Response {
    match notification::Entity::delete_by_id(notification_id).exec(&db).await {
        Ok(res) if res.rows_affected == 0 => not_found("Notification"),
        Ok(_) => {
            crate::metrics::increment_deleted("notifications");
            (StatusCode::OK, Json(json!({"message": "Notification deleted"}))).into_response()
        }
        Err(e) => db_error(e),
    }
}
