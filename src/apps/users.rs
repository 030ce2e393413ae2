//! The users app: a user and the phones they own

pub mod forms;
pub mod migrations;
pub mod models;
pub mod store;
pub mod views;

pub use forms::{CombinedForm, PhoneForm};
pub use models::{Phone, User, UserGraph};
pub use store::UserStore;
pub use views::IndexView;
