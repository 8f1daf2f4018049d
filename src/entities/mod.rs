pub mod appointment;
pub mod doctor;
pub mod notification;
pub mod user;

pub use appointment::Entity as Appointment;
pub use doctor::Entity as Doctor;
pub use notification::Entity as Notification;
pub use user::Entity as User;

pub mod prelude;
