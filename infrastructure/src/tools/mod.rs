//! Tool schema rendering for providers.

mod schema;

pub use schema::JsonSchemaToolConverter;
