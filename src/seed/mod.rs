//! Sample data generator.
//!
//! One run wipes the database, then writes Users, Doctors, Notifications and
//! Appointments as one batch each, in that order. Every batch after Users
//! references ids the store assigned to the users, so the steps cannot overlap.
//!
//! Two runs against the same database at the same time race on the wipe;
//! nothing guards against that.

pub mod generate;
pub mod plan;

pub use plan::SeedPlan;

use rand::Rng;
use sea_orm::{Database, DatabaseConnection, DbErr, EntityTrait, QueryOrder};
use sea_orm_migration::MigratorTrait;

use crate::entities::{appointment, doctor, notification, user};
use crate::error::SeedError;
use crate::migrator::Migrator;

/// Everything one run persisted, with store-assigned ids.
#[derive(Clone, Debug, Default)]
pub struct SeedReport {
    pub users: Vec<user::Model>,
    pub doctors: Vec<doctor::Model>,
    pub notifications: Vec<notification::Model>,
    pub appointments: Vec<appointment::Model>,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.users.len() + self.doctors.len() + self.notifications.len() + self.appointments.len()
    }
}

/// Connects, runs the seed and closes the connection whether or not the run succeeded.
pub async fn seed_database<R: Rng + ?Sized>(
    database_url: &str,
    plan: &SeedPlan,
    rng: &mut R,
) -> Result<SeedReport, SeedError> {
    plan.validate()?;

    let db = Database::connect(database_url).await?;
    tracing::info!("Connected to database");

    let outcome = run(&db, plan, rng).await;

    if let Err(e) = db.close().await {
        tracing::warn!("Failed to close database connection: {}", e);
    }
    outcome
}

pub async fn run<R: Rng + ?Sized>(
    db: &DatabaseConnection,
    plan: &SeedPlan,
    rng: &mut R,
) -> Result<SeedReport, SeedError> {
    plan.validate()?;
    // Hash before the wipe so a hashing failure leaves existing data alone.
    let password_hash = crate::password::hash_password(&plan.default_password)
        .map_err(|e| SeedError::PasswordHash(e.to_string()))?;

    wipe(db).await?;

    let now = chrono::Utc::now().naive_utc();

    let users = insert_users(
        db,
        generate::user_fixtures(plan)
            .into_iter()
            .map(|u| u.into_active_model(&password_hash, now))
            .collect(),
    )
    .await?;
    for u in &users {
        tracing::info!(
            name = %u.full_name(),
            email = %u.email,
            is_doctor = u.is_doctor,
            is_admin = u.is_admin,
            "user"
        );
    }
    tracing::info!(table = "users", count = users.len(), "Inserted users");

    let doctors = insert_doctors(
        db,
        generate::doctor_fixtures(plan, &users)
            .into_iter()
            .map(|d| d.into_active_model(now))
            .collect(),
    )
    .await?;
    for d in &doctors {
        tracing::info!(
            email = %d.email,
            specialization = %d.specialization,
            experience = d.experience,
            fees = d.fees,
            "doctor"
        );
    }
    tracing::info!(table = "doctors", count = doctors.len(), "Inserted doctors");

    let notifications = insert_notifications(
        db,
        generate::notification_fixtures(plan, &users)
            .into_iter()
            .map(|n| n.into_active_model(now))
            .collect(),
    )
    .await?;
    for n in &notifications {
        tracing::info!(
            user_id = n.user_id,
            is_read = n.is_read,
            content = %n.content,
            "notification"
        );
    }
    tracing::info!(
        table = "notifications",
        count = notifications.len(),
        "Inserted notifications"
    );

    let appointments = insert_appointments(
        db,
        generate::appointment_fixtures(plan, &users, rng)
            .into_iter()
            .map(|a| a.into_active_model(now))
            .collect(),
    )
    .await?;
    for a in &appointments {
        tracing::info!(
            user_id = a.user_id,
            doctor_id = a.doctor_id,
            date = %a.date,
            time = %a.time,
            status = %a.status,
            "appointment"
        );
    }
    tracing::info!(
        table = "appointments",
        count = appointments.len(),
        "Inserted appointments"
    );

    Ok(SeedReport {
        users,
        doctors,
        notifications,
        appointments,
    })
}

/// Drops every table and reapplies the schema.
pub async fn wipe(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::fresh(db).await?;
    tracing::info!("Dropped existing database");
    Ok(())
}

fn check_batch(table: &str, expected: usize, found: usize) -> Result<(), DbErr> {
    if expected == found {
        Ok(())
    } else {
        Err(DbErr::Custom(format!(
            "expected {expected} rows in {table} after insert, found {found}"
        )))
    }
}

// The tables are empty after the wipe, so reading back in id order returns
// exactly the batch, in insertion order.

async fn insert_users(
    db: &DatabaseConnection,
    models: Vec<user::ActiveModel>,
) -> Result<Vec<user::Model>, DbErr> {
    let expected = models.len();
    if expected > 0 {
        user::Entity::insert_many(models).exec(db).await?;
    }
    let saved = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?;
    check_batch("users", expected, saved.len())?;
    Ok(saved)
}

async fn insert_doctors(
    db: &DatabaseConnection,
    models: Vec<doctor::ActiveModel>,
) -> Result<Vec<doctor::Model>, DbErr> {
    let expected = models.len();
    if expected > 0 {
        doctor::Entity::insert_many(models).exec(db).await?;
    }
    let saved = doctor::Entity::find()
        .order_by_asc(doctor::Column::Id)
        .all(db)
        .await?;
    check_batch("doctors", expected, saved.len())?;
    Ok(saved)
}

async fn insert_notifications(
    db: &DatabaseConnection,
    models: Vec<notification::ActiveModel>,
) -> Result<Vec<notification::Model>, DbErr> {
    let expected = models.len();
    if expected > 0 {
        notification::Entity::insert_many(models).exec(db).await?;
    }
    let saved = notification::Entity::find()
        .order_by_asc(notification::Column::Id)
        .all(db)
        .await?;
    check_batch("notifications", expected, saved.len())?;
    Ok(saved)
}

async fn insert_appointments(
    db: &DatabaseConnection,
    models: Vec<appointment::ActiveModel>,
) -> Result<Vec<appointment::Model>, DbErr> {
    let expected = models.len();
    if expected > 0 {
        appointment::Entity::insert_many(models).exec(db).await?;
    }
    let saved = appointment::Entity::find()
        .order_by_asc(appointment::Column::Id)
        .all(db)
        .await?;
    check_batch("appointments", expected, saved.len())?;
    Ok(saved)
}
