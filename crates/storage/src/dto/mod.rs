pub mod common;
pub mod rating;
