//! Storage layer for cuotas-cli
//!
//! JSON and YAML file storage with atomic writes and automatic directory
//! creation.

pub mod community;
pub mod file_io;

pub use community::{load_community, save_community};
pub use file_io::{read_json, write_json_atomic, write_yaml_atomic};
