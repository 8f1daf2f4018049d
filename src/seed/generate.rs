//! Pure fixture builders.
//!
//! Nothing here touches storage. User fixtures are built from the plan alone;
//! the other three take the persisted users so they can reference the ids the
//! store handed out.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;
use sea_orm::{ActiveValue::NotSet, Set};

use super::plan::SeedPlan;
use crate::entities::appointment::AppointmentStatus;
use crate::entities::{appointment, doctor, notification, user};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserFixture {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub age: i32,
    pub gender: String,
    pub mobile: i64,
    pub address: String,
    pub is_doctor: bool,
    pub is_admin: bool,
}

impl UserFixture {
    pub fn into_active_model(self, password_hash: &str, now: NaiveDateTime) -> user::ActiveModel {
        user::ActiveModel {
            id: NotSet,
            firstname: Set(self.firstname),
            lastname: Set(self.lastname),
            email: Set(self.email),
            password_hash: Set(password_hash.to_string()),
            age: Set(self.age),
            gender: Set(self.gender),
            mobile: Set(self.mobile),
            address: Set(self.address),
            is_doctor: Set(self.is_doctor),
            is_admin: Set(self.is_admin),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DoctorFixture {
    pub user_id: i32,
    pub email: String,
    pub specialization: String,
    pub experience: i32,
    pub fees: i32,
}

impl DoctorFixture {
    pub fn into_active_model(self, now: NaiveDateTime) -> doctor::ActiveModel {
        doctor::ActiveModel {
            id: NotSet,
            user_id: Set(self.user_id),
            email: Set(self.email),
            specialization: Set(self.specialization),
            experience: Set(self.experience),
            fees: Set(self.fees),
            is_doctor: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotificationFixture {
    pub user_id: i32,
    pub is_read: bool,
    pub content: String,
}

impl NotificationFixture {
    pub fn into_active_model(self, now: NaiveDateTime) -> notification::ActiveModel {
        notification::ActiveModel {
            id: NotSet,
            user_id: Set(self.user_id),
            is_read: Set(self.is_read),
            content: Set(self.content),
            created_at: Set(now),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppointmentFixture {
    pub user_id: i32,
    pub doctor_id: i32,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
}

impl AppointmentFixture {
    pub fn into_active_model(self, now: NaiveDateTime) -> appointment::ActiveModel {
        appointment::ActiveModel {
            id: NotSet,
            user_id: Set(self.user_id),
            doctor_id: Set(self.doctor_id),
            date: Set(self.date),
            time: Set(self.time),
            status: Set(self.status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

pub fn user_fixtures(plan: &SeedPlan) -> Vec<UserFixture> {
    (1..=plan.user_count)
        .map(|i| {
            let n = i as i64;
            UserFixture {
                firstname: format!("User{i}"),
                lastname: format!("Test{i}"),
                email: format!("user{i}@example.com"),
                age: 20 + i as i32,
                gender: if i % 2 == 0 { "male" } else { "female" }.to_string(),
                mobile: 9_000_000_000 + n,
                address: format!("House No. {i}, Cityville"),
                is_doctor: i <= plan.doctor_count,
                is_admin: i == 1,
            }
        })
        .collect()
}

/// Pairs the first `doctor_count` users with the plan's specializations in order.
pub fn doctor_fixtures(plan: &SeedPlan, users: &[user::Model]) -> Vec<DoctorFixture> {
    users
        .iter()
        .take(plan.doctor_count)
        .zip(plan.specializations.iter())
        .enumerate()
        .map(|(k, (u, specialization))| DoctorFixture {
            user_id: u.id,
            email: u.email.clone(),
            specialization: specialization.clone(),
            experience: 3 + k as i32,
            fees: 100 + k as i32 * 50,
        })
        .collect()
}

pub fn notification_fixtures(plan: &SeedPlan, users: &[user::Model]) -> Vec<NotificationFixture> {
    users
        .iter()
        .enumerate()
        .skip(plan.doctor_count)
        .take(plan.notification_count)
        .enumerate()
        .map(|(n, (index, u))| NotificationFixture {
            user_id: u.id,
            is_read: index % 2 == 0,
            content: format!(
                "Notification {}: You have a new message from the system.",
                n + 1
            ),
        })
        .collect()
}

/// Patients are taken in order; doctors and statuses rotate, so for the default
/// plan each doctor gets two appointments.
pub fn appointment_fixtures<R: Rng + ?Sized>(
    plan: &SeedPlan,
    users: &[user::Model],
    rng: &mut R,
) -> Vec<AppointmentFixture> {
    let split = plan.doctor_count.min(users.len());
    let (doctors, patients) = users.split_at(split);
    let (start, end) = plan.appointment_window;

    patients
        .iter()
        .take(plan.appointment_count)
        .zip(doctors.iter().cycle())
        .zip(AppointmentStatus::ALL.iter().cycle())
        .map(|((patient, doctor), status)| AppointmentFixture {
            user_id: patient.id,
            doctor_id: doctor.id,
            date: random_date(rng, start, end),
            time: random_time(rng),
            status: *status,
        })
        .collect()
}

/// Uniform over the millisecond range between the two midnights, truncated to a date.
pub fn random_date<R: Rng + ?Sized>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let from = start.and_time(NaiveTime::MIN);
    let to = end.and_time(NaiveTime::MIN);
    let span = (to - from).num_milliseconds().max(0);
    let offset = rng.gen_range(0..=span);
    (from + Duration::milliseconds(offset)).date()
}

/// A half-hour slot between 9 AM and 5:30 PM, e.g. "9:00 AM" or "2:30 PM".
pub fn random_time<R: Rng + ?Sized>(rng: &mut R) -> String {
    let hours: u32 = rng.gen_range(9..=17);
    let minutes = if rng.gen_bool(0.5) { "00" } else { "30" };
    let suffix = if hours < 12 { "AM" } else { "PM" };
    let display_hour = if hours > 12 { hours - 12 } else { hours };
    format!("{display_hour}:{minutes} {suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::appointment::is_slot_time;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn persisted(plan: &SeedPlan) -> Vec<user::Model> {
        let now = chrono::Utc::now().naive_utc();
        user_fixtures(plan)
            .into_iter()
            .enumerate()
            .map(|(i, f)| user::Model {
                // offset ids so tests catch index/id mixups
                id: 100 + i as i32,
                firstname: f.firstname,
                lastname: f.lastname,
                email: f.email,
                password_hash: "hash".to_string(),
                age: f.age,
                gender: f.gender,
                mobile: f.mobile,
                address: f.address,
                is_doctor: f.is_doctor,
                is_admin: f.is_admin,
                created_at: now,
                updated_at: now,
            })
            .collect()
    }

    #[test]
    fn users_follow_role_assignment() {
        let users = user_fixtures(&SeedPlan::default());
        assert_eq!(users.len(), 15);

        let admins: Vec<_> = users.iter().filter(|u| u.is_admin).collect();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email, "user1@example.com");

        assert!(users[..5].iter().all(|u| u.is_doctor));
        assert!(users[5..].iter().all(|u| !u.is_doctor));

        let first = &users[0];
        assert_eq!(first.firstname, "User1");
        assert_eq!(first.lastname, "Test1");
        assert_eq!(first.age, 21);
        assert_eq!(first.gender, "female");
        assert_eq!(first.mobile, 9_000_000_001);
        assert_eq!(first.address, "House No. 1, Cityville");
        assert_eq!(users[1].gender, "male");

        let emails: HashSet<_> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails.len(), users.len());
    }

    #[test]
    fn doctors_pair_users_with_specializations() {
        let plan = SeedPlan::default();
        let users = persisted(&plan);
        let doctors = doctor_fixtures(&plan, &users);

        assert_eq!(doctors.len(), 5);
        assert_eq!(
            doctors[0],
            DoctorFixture {
                user_id: 100,
                email: "user1@example.com".to_string(),
                specialization: "Cardiology".to_string(),
                experience: 3,
                fees: 100,
            }
        );
        assert_eq!(doctors[4].specialization, "Orthopedics");
        assert_eq!(doctors[4].experience, 7);
        assert_eq!(doctors[4].fees, 300);

        for d in &doctors {
            let owner = users.iter().find(|u| u.id == d.user_id).unwrap();
            assert!(owner.is_doctor);
            assert_eq!(owner.email, d.email);
        }
    }

    #[test]
    fn notifications_go_to_patients_in_order() {
        let plan = SeedPlan::default();
        let users = persisted(&plan);
        let notifications = notification_fixtures(&plan, &users);

        assert_eq!(notifications.len(), 8);
        assert_eq!(notifications[0].user_id, users[5].id);
        assert_eq!(notifications[7].user_id, users[12].id);
        assert!(!notifications[0].is_read);
        assert!(notifications[1].is_read);
        assert_eq!(
            notifications[0].content,
            "Notification 1: You have a new message from the system."
        );
    }

    #[test]
    fn appointments_rotate_doctors_and_statuses() {
        let plan = SeedPlan::default();
        let users = persisted(&plan);
        let mut rng = StdRng::seed_from_u64(7);
        let appointments = appointment_fixtures(&plan, &users, &mut rng);

        assert_eq!(appointments.len(), 10);
        for (k, a) in appointments.iter().enumerate() {
            assert_eq!(a.user_id, users[5 + k].id);
            assert_eq!(a.doctor_id, users[k % 5].id);
            assert_eq!(a.status, AppointmentStatus::ALL[k % 3]);
        }

        let doctor_ids: HashSet<i32> = users[..5].iter().map(|u| u.id).collect();
        assert!(appointments.iter().all(|a| doctor_ids.contains(&a.doctor_id)));

        let per_status = |s| appointments.iter().filter(|a| a.status == s).count();
        assert_eq!(per_status(AppointmentStatus::Pending), 4);
        assert_eq!(per_status(AppointmentStatus::Confirmed), 3);
        assert_eq!(per_status(AppointmentStatus::Cancelled), 3);
    }

    #[test]
    fn same_seed_gives_same_appointments() {
        let plan = SeedPlan::default();
        let users = persisted(&plan);

        let a = appointment_fixtures(&plan, &users, &mut StdRng::seed_from_u64(42));
        let b = appointment_fixtures(&plan, &users, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn random_dates_stay_inside_window() {
        let (start, end) = SeedPlan::default().appointment_window;
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let d = random_date(&mut rng, start, end);
            assert!(d >= start && d <= end, "{d} outside window");
        }
    }

    #[test]
    fn degenerate_window_yields_its_only_day() {
        let day = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(random_date(&mut rng, day, day), day);
    }

    #[test]
    fn random_times_are_half_hour_slots_in_office_hours() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let t = random_time(&mut rng);
            assert!(is_slot_time(&t), "bad time {t}");
            seen.insert(t);
        }
        // 9 hours x 2 minute marks
        assert_eq!(seen.len(), 18);
        assert!(seen.contains("9:00 AM"));
        assert!(seen.contains("12:30 PM"));
        assert!(seen.contains("5:30 PM"));
        assert!(!seen.contains("6:00 PM"));
    }
}
