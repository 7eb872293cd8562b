pub mod booking;
pub mod payment;
pub mod rating;
pub mod room;
pub mod user;
