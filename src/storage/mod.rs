mod json;

pub use json::{is_temp_file, read_json, write_json};
