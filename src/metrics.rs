use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entities::{appointment, doctor, notification, user};

pub async fn init_metrics(db: &DatabaseConnection) {
    let user_count = user::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("carebook_users_total").set(user_count as f64);

    let doctor_count = doctor::Entity::find().count(db).await.unwrap_or(0);
    metrics::gauge!("carebook_doctors_total").set(doctor_count as f64);

    let unread_count = notification::Entity::find()
        .filter(notification::Column::IsRead.eq(false))
        .count(db)
        .await
        .unwrap_or(0);
    metrics::gauge!("carebook_notifications_unread").set(unread_count as f64);

    let mut appointment_count = 0;
    for status in appointment::AppointmentStatus::ALL {
        let count = appointment::Entity::find()
            .filter(appointment::Column::Status.eq(status.as_str()))
            .count(db)
            .await
            .unwrap_or(0);
        appointment_count += count;
        metrics::gauge!("carebook_appointments_total", "status" => status.as_str()).set(count as f64);
    }

    tracing::info!(
        "Initialized metrics: Users={}, Doctors={}, Appointments={}, UnreadNotifications={}",
        user_count, doctor_count, appointment_count, unread_count
    );
}

pub fn increment_created(table: &'static str) {
    metrics::counter!("carebook_records_created_total", "table" => table).increment(1);
}

pub fn increment_deleted(table: &'static str) {
    metrics::counter!("carebook_records_deleted_total", "table" => table).increment(1);
}

pub fn record_appointment_status(status: appointment::AppointmentStatus) {
    metrics::counter!("carebook_appointment_status_changes_total", "status" => status.as_str())
        .increment(1);
}
