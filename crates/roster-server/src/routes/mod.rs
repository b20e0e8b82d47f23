pub mod health;
pub mod messages;
pub mod pending;
pub mod records;
