pub mod keys;
pub mod sqlite;
