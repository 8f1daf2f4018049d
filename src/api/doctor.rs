use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{db_error, error_response, not_found};
use crate::entities::{appointment, doctor, user};

#[derive(Deserialize)]
pub struct CreateDoctorRequest {
    pub user_id: i32,
    pub specialization: String,
    pub experience: i32,
    pub fees: i32,
}

#[derive(Deserialize)]
pub struct UpdateDoctorRequest {
    pub specialization: Option<String>,
    pub experience: Option<i32>,
    pub fees: Option<i32>,
}

/// A doctor profile with the owning user inlined.
#[derive(Serialize)]
pub struct DoctorResponse {
    #[serde(flatten)]
    pub doctor: doctor::Model,
    pub user: Option<user::Model>,
}

// GET /api/doctor
pub async fn list_doctors(Extension(db): Extension<DatabaseConnection>) -> Response {
    match doctor::Entity::find()
        .find_also_related(user::Entity)
        .order_by_asc(doctor::Column::Id)
        .all(&db)
        .await
    {
        Ok(rows) => {
            let response: Vec<DoctorResponse> = rows
                .into_iter()
                .map(|(doctor, user)| DoctorResponse { doctor, user })
                .collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => db_error(e),
    }
}

// GET /api/doctor/:id
pub async fn get_doctor(
    Extension(db): Extension<DatabaseConnection>,
    Path(doctor_id): Path<i32>,
) -> Response {
    match doctor::Entity::find_by_id(doctor_id)
        .find_also_related(user::Entity)
        .one(&db)
        .await
    {
        Ok(Some((doctor, user))) => {
            (StatusCode::OK, Json(DoctorResponse { doctor, user })).into_response()
        }
        Ok(None) => not_found("Doctor"),
        Err(e) => db_error(e),
    }
}

// POST /api/doctor - create a profile for an existing user and flag them as a doctor
pub async fn create_doctor(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateDoctorRequest>,
) -> Response {
    let owner = match user::Entity::find_by_id(payload.user_id).one(&db).await {
        Ok(Some(u)) => u,
        Ok(None) => return not_found("User"),
        Err(e) => return db_error(e),
    };

    match doctor::Entity::find()
        .filter(doctor::Column::UserId.eq(owner.id))
        .one(&db)
        .await
    {
        Ok(Some(_)) => {
            return error_response(StatusCode::CONFLICT, "User already has a doctor profile")
        }
        Ok(None) => {}
        Err(e) => return db_error(e),
    }

    let (doctor, owner) = match promote(&db, owner, payload).await {
        Ok(pair) => pair,
        Err(e) => return db_error(e),
    };

    tracing::Span::current()
        .record("table", "doctors")
        .record("action", "create_doctor")
        .record("user_id", owner.id)
        .record("business_event", "Doctor profile created");
    crate::metrics::increment_created("doctors");

    (
        StatusCode::CREATED,
        Json(DoctorResponse {
            doctor,
            user: Some(owner),
        }),
    )
        .into_response()
}

/// Inserts the profile and flags the owner in one transaction.
async fn promote(
    db: &DatabaseConnection,
    owner: user::Model,
    payload: CreateDoctorRequest,
) -> Result<(doctor::Model, user::Model), DbErr> {
    let now = chrono::Utc::now().naive_utc();
    let txn = db.begin().await?;

    let doctor = doctor::ActiveModel {
        user_id: Set(owner.id),
        email: Set(owner.email.clone()),
        specialization: Set(payload.specialization),
        experience: Set(payload.experience),
        fees: Set(payload.fees),
        is_doctor: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut active_owner = owner.into_active_model();
    active_owner.is_doctor = Set(true);
    active_owner.updated_at = Set(now);
    let owner = active_owner.update(&txn).await?;

    txn.commit().await?;
    Ok((doctor, owner))
}

// PATCH /api/doctor/:id
pub async fn update_doctor(
    Extension(db): Extension<DatabaseConnection>,
    Path(doctor_id): Path<i32>,
    Json(payload): Json<UpdateDoctorRequest>,
) -> Response {
    let doctor = match doctor::Entity::find_by_id(doctor_id).one(&db).await {
        Ok(Some(d)) => d,
        Ok(None) => return not_found("Doctor"),
        Err(e) => return db_error(e),
    };

    let mut active_doctor = doctor.into_active_model();
    if let Some(specialization) = payload.specialization {
        active_doctor.specialization = Set(specialization);
    }
    if let Some(experience) = payload.experience {
        active_doctor.experience = Set(experience);
    }
    if let Some(fees) = payload.fees {
        active_doctor.fees = Set(fees);
    }
    active_doctor.updated_at = Set(chrono::Utc::now().naive_utc());

    match active_doctor.update(&db).await {
        Ok(d) => (StatusCode::OK, Json(d)).into_response(),
        Err(e) => db_error(e),
    }
}

// DELETE /api/doctor/:id - removes the profile and clears the owner's doctor flag
pub async fn delete_doctor(
    Extension(db): Extension<DatabaseConnection>,
    Path(doctor_id): Path<i32>,
) -> Response {
    let doctor = match doctor::Entity::find_by_id(doctor_id).one(&db).await {
        Ok(Some(d)) => d,
        Ok(None) => return not_found("Doctor"),
        Err(e) => return db_error(e),
    };

    // appointments point at the owner as doctor; demoting would orphan them
    match appointment::Entity::find()
        .filter(appointment::Column::DoctorId.eq(doctor.user_id))
        .count(&db)
        .await
    {
        Ok(0) => {}
        Ok(_) => {
            return error_response(StatusCode::CONFLICT, "Doctor still has appointments")
        }
        Err(e) => return db_error(e),
    }

    match demote(&db, doctor).await {
        Ok(()) => {
            crate::metrics::increment_deleted("doctors");
            (StatusCode::OK, Json(json!({"message": "Doctor deleted"}))).into_response()
        }
        Err(e) => db_error(e),
    }
}

async fn demote(db: &DatabaseConnection, doctor: doctor::Model) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    doctor::Entity::delete_by_id(doctor.id).exec(&txn).await?;
    user::Entity::update_many()
        .col_expr(user::Column::IsDoctor, Expr::value(false))
        .col_expr(
            user::Column::UpdatedAt,
            Expr::value(chrono::Utc::now().naive_utc()),
        )
        .filter(user::Column::Id.eq(doctor.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await
}
