//! Entity identity and schema.

mod id;
mod schema;

pub use id::Id;
pub use schema::EntitySchema;

pub(crate) use id::short_type_name;
