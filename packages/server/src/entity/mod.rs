pub mod photo;
pub mod photographer;
pub mod user;
