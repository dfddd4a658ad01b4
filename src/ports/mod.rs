pub mod keys;
pub mod repository;
