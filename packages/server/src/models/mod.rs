pub mod auth;
pub mod photo;
pub mod photographer;
pub mod shared;
