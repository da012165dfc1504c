//! Core library for kc2spicedb:
//! - Keycloak realm export decoding into a typed intermediate form
//! - Realm model building (roles, client roles, composite roles, nested groups)
//! - Deterministic SpiceDB schema generation with identifier sanitization
//!
//! The builder and generator are pure and stateless. They never touch the filesystem;
//! the [`providers`] module offers the file and JSON helpers callers use around them.

mod errors;
pub mod providers;
mod realm;
mod schema_generation;

pub use errors::{Result, SchemaGenerationError};
pub use realm::{
    CompositesExport, Group, GroupExport, OrderedMap, Realm, RealmExport, RealmModelBuilder,
    RoleExport, RoleMap, RoleReference, RolesExport, DEFAULT_REALM_NAME,
};
pub use schema_generation::{sanitize_identifier, Definition, DefinitionItem, SchemaGenerator};
