use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::{db_error, error_response, not_found};
use crate::entities::appointment::{self, is_slot_time, AppointmentStatus};
use crate::entities::user;

#[derive(Deserialize, Default)]
pub struct AppointmentFilter {
    pub user_id: Option<i32>,
    pub doctor_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub user_id: i32,
    /// User id of the doctor.
    pub doctor_id: i32,
    pub date: NaiveDate,
    pub time: String,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateAppointmentRequest {
    pub status: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

fn parse_status(raw: &str) -> Result<AppointmentStatus, Response> {
    raw.parse::<AppointmentStatus>()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e))
}

fn check_time(raw: &str) -> Result<(), Response> {
    if is_slot_time(raw) {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::BAD_REQUEST,
            format!("time must look like \"9:30 AM\", got {raw:?}"),
        ))
    }
}

// GET /api/appointment?user_id=&doctor_id=
pub async fn list_appointments(
    Extension(db): Extension<DatabaseConnection>,
    Query(filter): Query<AppointmentFilter>,
) -> Response {
    let mut query = appointment::Entity::find();
    if let Some(user_id) = filter.user_id {
        query = query.filter(appointment::Column::UserId.eq(user_id));
    }
    if let Some(doctor_id) = filter.doctor_id {
        query = query.filter(appointment::Column::DoctorId.eq(doctor_id));
    }

    match query
        .order_by_asc(appointment::Column::Date)
        .order_by_asc(appointment::Column::Id)
        .all(&db)
        .await
    {
        Ok(appointments) => (StatusCode::OK, Json(appointments)).into_response(),
        Err(e) => db_error(e),
    }
}

// GET /api/appointment/:id
pub async fn get_appointment(
    Extension(db): Extension<DatabaseConnection>,
    Path(appointment_id): Path<i32>,
) -> Response {
    match appointment::Entity::find_by_id(appointment_id).one(&db).await {
        Ok(Some(a)) => (StatusCode::OK, Json(a)).into_response(),
        Ok(None) => not_found("Appointment"),
        Err(e) => db_error(e),
    }
}

// POST /api/appointment
pub async fn create_appointment(
    Extension(db): Extension<DatabaseConnection>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> Response {
    let status = match payload.status.as_deref().map(parse_status).transpose() {
        Ok(status) => status.unwrap_or(AppointmentStatus::Pending),
        Err(response) => return response,
    };
    if let Err(response) = check_time(&payload.time) {
        return response;
    }

    match user::Entity::find_by_id(payload.user_id).one(&db).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Patient"),
        Err(e) => return db_error(e),
    }
    match user::Entity::find_by_id(payload.doctor_id).one(&db).await {
        Ok(Some(d)) if d.is_doctor => {}
        Ok(Some(_)) => {
            return error_response(StatusCode::BAD_REQUEST, "doctor_id does not belong to a doctor")
        }
        Ok(None) => return not_found("Doctor"),
        Err(e) => return db_error(e),
    }

    let now = chrono::Utc::now().naive_utc();
    let new_appointment = appointment::ActiveModel {
        user_id: Set(payload.user_id),
        doctor_id: Set(payload.doctor_id),
        date: Set(payload.date),
        time: Set(payload.time),
        status: Set(status.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_appointment.insert(&db).await {
        Ok(a) => {
            tracing::Span::current()
                .record("table", "appointments")
                .record("action", "create_appointment")
                .record("user_id", a.user_id)
                .record("business_event", "Appointment booked");
            crate::metrics::increment_created("appointments");
            (StatusCode::CREATED, Json(a)).into_response()
        }
        Err(e) => db_error(e),
    }
}

// PATCH /api/appointment/:id
pub async fn update_appointment(
    Extension(db): Extension<DatabaseConnection>,
    Path(appointment_id): Path<i32>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Response {
    let status = match payload.status.as_deref().map(parse_status).transpose() {
        Ok(status) => status,
        Err(response) => return response,
    };
    if let Some(Err(response)) = payload.time.as_deref().map(check_time) {
        return response;
    }

    let existing = match appointment::Entity::find_by_id(appointment_id).one(&db).await {
        Ok(Some(a)) => a,
        Ok(None) => return not_found("Appointment"),
        Err(e) => return db_error(e),
    };

    let mut active = existing.into_active_model();
    if let Some(status) = status {
        active.status = Set(status.to_string());
    }
    if let Some(date) = payload.date {
        active.date = Set(date);
    }
    if let Some(time) = payload.time {
        active.time = Set(time);
    }
    active.updated_at = Set(chrono::Utc::now().naive_utc());

    match active.update(&db).await {
        Ok(a) => {
            if let Some(status) = status {
                crate::metrics::record_appointment_status(status);
            }
            (StatusCode::OK, Json(a)).into_response()
        }
        Err(e) => db_error(e),
    }
}

// DELETE /api/appointment/:id
pub async fn delete_appointment(
    Extension(db): Extension<DatabaseConnection>,
    Path(appointment_id): Path<i32>,
) -> Response {
    match appointment::Entity::delete_by_id(appointment_id).exec(&db).await {
        Ok(res) if res.rows_affected == 0 => not_found("Appointment"),
        Ok(_) => {
            crate::metrics::increment_deleted("appointments");
            (StatusCode::OK, Json(json!({"message": "Appointment deleted"}))).into_response()
        }
        Err(e) => db_error(e),
    }
}
