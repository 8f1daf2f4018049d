//! End-to-end seeding runs against a real (SQLite) database.

mod support;

use std::collections::{HashMap, HashSet};

use carebook_server::entities::appointment::is_slot_time;
use carebook_server::entities::{appointment, doctor, notification, user};
use carebook_server::sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use carebook_server::seed::{self, SeedPlan};
use carebook_server::SeedError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use support::temp_db;

async fn table_counts(db: &carebook_server::sea_orm::DatabaseConnection) -> (u64, u64, u64, u64) {
    (
        user::Entity::find().count(db).await.unwrap(),
        doctor::Entity::find().count(db).await.unwrap(),
        notification::Entity::find().count(db).await.unwrap(),
        appointment::Entity::find().count(db).await.unwrap(),
    )
}

#[tokio::test]
async fn seeding_populates_all_four_tables() {
    let test = temp_db().await;
    let plan = SeedPlan::default();

    let report = seed::run(&test.db, &plan, &mut StdRng::seed_from_u64(1))
        .await
        .expect("seed run succeeds");

    assert_eq!(report.users.len(), 15);
    assert_eq!(report.doctors.len(), 5);
    assert_eq!(report.notifications.len(), 8);
    assert_eq!(report.appointments.len(), 10);
    assert_eq!(report.total(), 38);
    assert_eq!(table_counts(&test.db).await, (15, 5, 8, 10));
}

#[tokio::test]
async fn seeded_rows_respect_relational_invariants() {
    let test = temp_db().await;
    let plan = SeedPlan::default();
    seed::run(&test.db, &plan, &mut StdRng::seed_from_u64(2))
        .await
        .unwrap();

    let users: HashMap<i32, user::Model> = user::Entity::find()
        .all(&test.db)
        .await
        .unwrap()
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let doctors = doctor::Entity::find()
        .find_also_related(user::Entity)
        .all(&test.db)
        .await
        .unwrap();
    let mut specializations = HashSet::new();
    for (d, owner) in &doctors {
        let owner = owner.as_ref().expect("doctor has a user");
        assert!(owner.is_doctor, "doctor {} points at a non-doctor", d.id);
        assert!(d.is_doctor);
        assert!(specializations.insert(d.specialization.clone()));
    }
    let expected: HashSet<String> = [
        "Cardiology",
        "Dermatology",
        "Neurology",
        "Pediatrics",
        "Orthopedics",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(specializations, expected);

    let (start, end) = plan.appointment_window;
    for a in appointment::Entity::find().all(&test.db).await.unwrap() {
        assert!(users[&a.doctor_id].is_doctor);
        assert!(!users[&a.user_id].is_doctor);
        assert!(a.date >= start && a.date <= end, "date {} out of range", a.date);
        assert!(is_slot_time(&a.time), "bad time {}", a.time);
        assert!(a.status.parse::<appointment::AppointmentStatus>().is_ok());
    }

    for n in notification::Entity::find().all(&test.db).await.unwrap() {
        assert!(users.contains_key(&n.user_id));
    }
}

#[tokio::test]
async fn first_user_is_admin_and_cardiologist() {
    let test = temp_db().await;
    let report = seed::run(&test.db, &SeedPlan::default(), &mut StdRng::seed_from_u64(3))
        .await
        .unwrap();

    let first = &report.users[0];
    assert_eq!(first.email, "user1@example.com");
    assert!(first.is_admin);
    assert_eq!(report.users.iter().filter(|u| u.is_admin).count(), 1);
    assert!(report.users[..5].iter().all(|u| u.is_doctor));
    assert!(report.users[5..].iter().all(|u| !u.is_doctor));

    let cardiologist = doctor::Entity::find()
        .filter(doctor::Column::UserId.eq(first.id))
        .one(&test.db)
        .await
        .unwrap()
        .expect("user 1 has a doctor profile");
    assert_eq!(cardiologist.specialization, "Cardiology");
    assert_eq!(cardiologist.experience, 3);
    assert_eq!(cardiologist.fees, 100);
    assert_eq!(cardiologist.email, first.email);
}

#[tokio::test]
async fn reseeding_wipes_previous_state() {
    let test = temp_db().await;
    let plan = SeedPlan::default();
    seed::run(&test.db, &plan, &mut StdRng::seed_from_u64(4))
        .await
        .unwrap();

    let now = chrono::Utc::now().naive_utc();
    user::ActiveModel {
        firstname: Set("Stale".to_string()),
        lastname: Set("Row".to_string()),
        email: Set("stale@example.com".to_string()),
        password_hash: Set("x".to_string()),
        age: Set(50),
        gender: Set("female".to_string()),
        mobile: Set(1),
        address: Set("Nowhere".to_string()),
        is_doctor: Set(false),
        is_admin: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&test.db)
    .await
    .unwrap();
    assert_eq!(table_counts(&test.db).await.0, 16);

    let second = seed::run(&test.db, &plan, &mut StdRng::seed_from_u64(5))
        .await
        .unwrap();

    assert_eq!(table_counts(&test.db).await, (15, 5, 8, 10));
    assert!(second.users.iter().all(|u| u.email != "stale@example.com"));
    let stale = user::Entity::find()
        .filter(user::Column::Email.eq("stale@example.com"))
        .one(&test.db)
        .await
        .unwrap();
    assert!(stale.is_none());
}

#[tokio::test]
async fn same_seed_reproduces_appointments() {
    let first_db = temp_db().await;
    let second_db = temp_db().await;
    let plan = SeedPlan::default();

    let a = seed::run(&first_db.db, &plan, &mut StdRng::seed_from_u64(99))
        .await
        .unwrap();
    let b = seed::run(&second_db.db, &plan, &mut StdRng::seed_from_u64(99))
        .await
        .unwrap();

    let slots = |report: &seed::SeedReport| {
        report
            .appointments
            .iter()
            .map(|a| (a.user_id, a.doctor_id, a.date, a.time.clone(), a.status.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(slots(&a), slots(&b));
}

#[tokio::test]
async fn invalid_plan_leaves_existing_data_alone() {
    let test = temp_db().await;
    seed::run(&test.db, &SeedPlan::default(), &mut StdRng::seed_from_u64(6))
        .await
        .unwrap();

    let mut plan = SeedPlan::default();
    plan.specializations.truncate(3);
    let err = seed::run(&test.db, &plan, &mut StdRng::seed_from_u64(7))
        .await
        .unwrap_err();

    assert!(matches!(err, SeedError::InvalidPlan(_)));
    assert_eq!(table_counts(&test.db).await, (15, 5, 8, 10));
}

#[tokio::test]
async fn seed_database_connects_and_releases() {
    let test = temp_db().await;
    let report = seed::seed_database(&test.url, &SeedPlan::default(), &mut StdRng::seed_from_u64(8))
        .await
        .expect("seeding through a fresh connection succeeds");
    assert_eq!(report.total(), 38);

    // visible through an independent connection
    assert_eq!(table_counts(&test.db).await, (15, 5, 8, 10));
}

#[tokio::test]
async fn unreachable_store_is_a_storage_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("no-such-dir").join("carebook.db");
    let url = support::sqlite_url(&missing);

    let err = seed::seed_database(&url, &SeedPlan::default(), &mut StdRng::seed_from_u64(9))
        .await
        .unwrap_err();

    assert!(err.is_storage(), "expected storage failure, got {err}");
    assert!(!missing.exists());
}
