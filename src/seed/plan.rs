use chrono::NaiveDate;

use crate::error::SeedError;

pub const SPECIALIZATIONS: [&str; 5] = [
    "Cardiology",
    "Dermatology",
    "Neurology",
    "Pediatrics",
    "Orthopedics",
];

pub const DEFAULT_PASSWORD: &str = "password123";

/// Generation constants for one seeding run.
///
/// Users `1..=doctor_count` become doctors; the rest are patients. Notifications
/// and appointments are handed out to patients in order, starting with the first
/// patient, so both counts must fit inside the patient pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedPlan {
    pub user_count: usize,
    pub doctor_count: usize,
    pub notification_count: usize,
    pub appointment_count: usize,
    /// One entry per doctor, in user order.
    pub specializations: Vec<String>,
    /// Closed range appointment dates are drawn from.
    pub appointment_window: (NaiveDate, NaiveDate),
    pub default_password: String,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            user_count: 15,
            doctor_count: 5,
            notification_count: 8,
            appointment_count: 10,
            specializations: SPECIALIZATIONS.iter().map(|s| s.to_string()).collect(),
            appointment_window: (
                NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid calendar date"),
                NaiveDate::from_ymd_opt(2025, 7, 30).expect("valid calendar date"),
            ),
            default_password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl SeedPlan {
    pub fn patient_count(&self) -> usize {
        self.user_count.saturating_sub(self.doctor_count)
    }

    pub fn validate(&self) -> Result<(), SeedError> {
        if self.doctor_count == 0 {
            return Err(SeedError::InvalidPlan(
                "at least one doctor is required".to_string(),
            ));
        }
        if self.doctor_count > self.user_count {
            return Err(SeedError::InvalidPlan(format!(
                "doctor count {} exceeds user count {}",
                self.doctor_count, self.user_count
            )));
        }
        if self.specializations.len() != self.doctor_count {
            return Err(SeedError::InvalidPlan(format!(
                "{} specializations configured for {} doctors",
                self.specializations.len(),
                self.doctor_count
            )));
        }
        if self.notification_count > self.patient_count() {
            return Err(SeedError::InvalidPlan(format!(
                "{} notifications need more than the {} available patients",
                self.notification_count,
                self.patient_count()
            )));
        }
        if self.appointment_count > self.patient_count() {
            return Err(SeedError::InvalidPlan(format!(
                "{} appointments need more than the {} available patients",
                self.appointment_count,
                self.patient_count()
            )));
        }
        let (start, end) = self.appointment_window;
        if start > end {
            return Err(SeedError::InvalidPlan(format!(
                "appointment window starts {start} after it ends {end}"
            )));
        }
        Ok(())
    }
}
