pub mod high_value;
pub mod schema;
pub mod transform;
