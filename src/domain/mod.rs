pub mod clone_url;
pub mod entities;
pub mod value_objects;
