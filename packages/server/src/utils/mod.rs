pub mod accounts;
pub mod hash;
pub mod jwt;
pub mod linkage;
pub mod policy;
