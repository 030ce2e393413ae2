//! Installed applications

pub mod users;
