pub use super::appointment::Entity as Appointment;
pub use super::doctor::Entity as Doctor;
pub use super::notification::Entity as Notification;
pub use super::user::Entity as User;
