pub mod annotations;
pub mod claims;
pub mod health;
pub mod reports;
pub mod uploads;
