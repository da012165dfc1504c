//! SpiceDB schema generation from a realm model

mod definition;
mod engine;
mod identifier;

pub use definition::{Definition, DefinitionItem};
pub use engine::SchemaGenerator;
pub use identifier::sanitize_identifier;
