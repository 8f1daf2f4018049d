use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Patient.
    pub user_id: i32,
    /// The doctor's user id, not the doctors row id.
    pub doctor_id: i32,
    pub date: Date,
    /// 12-hour clock, e.g. "9:30 AM".
    pub time: String,
    pub status: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Patient,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DoctorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Doctor,
}

impl ActiveModelBehavior for ActiveModel {}

/// True for half-hour slots on a 12-hour clock, like "9:00 AM" or "12:30 PM".
pub fn is_slot_time(s: &str) -> bool {
    let Some((clock, suffix)) = s.split_once(' ') else {
        return false;
    };
    let Some((hour, minute)) = clock.split_once(':') else {
        return false;
    };
    let hour_ok = !hour.starts_with('0') && matches!(hour.parse::<u32>(), Ok(1..=12));
    hour_ok && matches!(minute, "00" | "30") && matches!(suffix, "AM" | "PM")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown appointment status: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "confirmed".parse::<AppointmentStatus>(),
            Ok(AppointmentStatus::Confirmed)
        );
        assert_eq!(
            "Cancelled".parse::<AppointmentStatus>(),
            Ok(AppointmentStatus::Cancelled)
        );
        assert!("Rescheduled".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn slot_times_are_half_hours_on_a_12_hour_clock() {
        for ok in ["9:00 AM", "12:30 PM", "1:00 PM", "11:30 AM"] {
            assert!(is_slot_time(ok), "{ok}");
        }
        for bad in ["25:99", "09:00 AM", "0:30 AM", "13:00 PM", "10:15 AM", "10:30", "10:30 am", ""] {
            assert!(!is_slot_time(bad), "{bad}");
        }
    }
}
