pub mod cache;
pub mod model;
pub mod output;
pub mod schema;
pub mod transform;
