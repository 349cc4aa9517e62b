//! Domain models for the admin bootstrapper

pub mod user;

pub use user::{CreateSuperuser, User};
