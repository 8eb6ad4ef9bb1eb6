pub mod booking;
pub mod event;
pub mod user;

pub use booking::{Booking, BookingStatus, CheckInMethod};
pub use event::Event;
pub use user::User;
