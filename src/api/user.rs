use crate::api::{db_error, error_response, not_found};
use crate::entities::{doctor, user};
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde_json::json;

#[derive(serde::Deserialize)]
pub struct CreateUserRequest {
    firstname: String,
    lastname: String,
    email: String,
    password: String,
    age: Option<i32>,
    gender: Option<String>,
    mobile: Option<i64>,
    address: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct UpdateUserRequest {
    firstname: Option<String>,
    lastname: Option<String>,
    email: Option<String>,
    password: Option<String>,
    age: Option<i32>,
    gender: Option<String>,
    mobile: Option<i64>,
    address: Option<String>,
}

fn hash_password(password: &str) -> Result<String, Response> {
    crate::password::hash_password(password).map_err(|_| {
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password")
    })
}

fn is_duplicate_email(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub async fn list_users(Extension(db): Extension<DatabaseConnection>) -> Response {
    match user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(&db)
        .await
    {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => db_error(e),
    }
}

pub async fn get_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(user_id): Path<i32>,
) -> Response {
    match user::Entity::find_by_id(user_id).one(&db).await {
        Ok(Some(u)) => (StatusCode::OK, Json(u)).into_response(),
        Ok(None) => not_found("User"),
        Err(e) => db_error(e),
    }
}

pub async fn create_user(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateUserRequest>,
) -> Response {
    let password_hash = match hash_password(&payload.password) {
        Ok(hash) => hash,
        Err(response) => return response,
    };

    let now = chrono::Utc::now().naive_utc();
    let new_user = user::ActiveModel {
        firstname: Set(payload.firstname),
        lastname: Set(payload.lastname),
        email: Set(payload.email),
        password_hash: Set(password_hash),
        age: Set(payload.age.unwrap_or_default()),
        gender: Set(payload.gender.unwrap_or_default()),
        mobile: Set(payload.mobile.unwrap_or_default()),
        address: Set(payload.address.unwrap_or_default()),
        is_doctor: Set(false),
        is_admin: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_user.insert(&db).await {
        Ok(u) => {
            tracing::Span::current()
                .record("table", "users")
                .record("action", "create_user")
                .record("user_id", u.id)
                .record("business_event", "User created");

            crate::metrics::increment_created("users");
            (StatusCode::CREATED, Json(u)).into_response()
        }
        Err(e) if is_duplicate_email(&e) => {
            tracing::Span::current()
                .record("table", "users")
                .record("action", "create_user_failed")
                .record("error", "duplicate_email");

            error_response(StatusCode::CONFLICT, "Email already exists")
        }
        Err(e) => db_error(e),
    }
}

pub async fn update_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(user_id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Response {
    let user = match user::Entity::find_by_id(user_id).one(&db).await {
        Ok(Some(u)) => u,
        Ok(None) => return not_found("User"),
        Err(e) => return db_error(e),
    };

    let mut active_user = user.into_active_model();
    if let Some(firstname) = payload.firstname {
        active_user.firstname = Set(firstname);
    }
    if let Some(lastname) = payload.lastname {
        active_user.lastname = Set(lastname);
    }
    if let Some(email) = payload.email {
        active_user.email = Set(email);
    }
    if let Some(password) = payload.password {
        match hash_password(&password) {
            Ok(hash) => active_user.password_hash = Set(hash),
            Err(response) => return response,
        }
    }
    if let Some(age) = payload.age {
        active_user.age = Set(age);
    }
    if let Some(gender) = payload.gender {
        active_user.gender = Set(gender);
    }
    if let Some(mobile) = payload.mobile {
        active_user.mobile = Set(mobile);
    }
    if let Some(address) = payload.address {
        active_user.address = Set(address);
    }
    active_user.updated_at = Set(chrono::Utc::now().naive_utc());

    match save_user(&db, active_user).await {
        Ok(u) => (StatusCode::OK, Json(u)).into_response(),
        Err(e) if is_duplicate_email(&e) => {
            error_response(StatusCode::CONFLICT, "Email already exists")
        }
        Err(e) => db_error(e),
    }
}

/// Saves the user and copies a changed email onto their doctor profile.
async fn save_user(
    db: &DatabaseConnection,
    active_user: user::ActiveModel,
) -> Result<user::Model, DbErr> {
    let email_changed = active_user.email.is_set();
    let txn = db.begin().await?;

    let saved = active_user.update(&txn).await?;
    if email_changed {
        doctor::Entity::update_many()
            .col_expr(doctor::Column::Email, Expr::value(saved.email.clone()))
            .filter(doctor::Column::UserId.eq(saved.id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(saved)
}

pub async fn delete_user(
    Extension(db): Extension<DatabaseConnection>,
    Path(user_id): Path<i32>,
) -> Response {
    match user::Entity::delete_by_id(user_id).exec(&db).await {
        Ok(res) if res.rows_affected == 0 => not_found("User"),
        Ok(_) => {
            crate::metrics::increment_deleted("users");
            (StatusCode::OK, Json(json!({"message": "User deleted"}))).into_response()
        }
        Err(e) => db_error(e),
    }
}
