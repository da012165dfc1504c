//! Schema generation engine implementation
//!
//! Renders a [`Realm`] into SpiceDB schema text. The output order is fixed: the `user`
//! type, the `group` type, the `realm` type, then one type per client in the order the
//! clients appear in the realm. Within a type, relations come first in role order,
//! followed by one permission or comment per composite role in composite order.

use log::debug;

use super::definition::{Definition, DefinitionItem};
use super::identifier::sanitize_identifier;
use crate::realm::{Group, Realm, RoleReference};

const USER_TYPE: &str = "user";
const GROUP_TYPE: &str = "group";
const REALM_TYPE: &str = "realm";

/// Deterministic SpiceDB schema generator.
///
/// Stateless: generating twice from the same realm yields byte-identical text, and the
/// generator can be called from any number of threads at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaGenerator;

impl SchemaGenerator {
    /// Generate SpiceDB schema text for the realm.
    ///
    /// Definitions are separated by a single newline; no trailing newline is added.
    pub fn generate(realm: &Realm) -> String {
        let definitions = Self::build_definitions(realm);
        debug!(
            "Generated {} schema definitions for realm '{}'",
            definitions.len(),
            realm.name
        );

        definitions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the ordered list of definitions for the realm
    pub fn build_definitions(realm: &Realm) -> Vec<Definition> {
        let mut definitions = vec![Definition::new(USER_TYPE)];

        if let Some(group_definition) = Self::group_definition(&realm.groups) {
            definitions.push(group_definition);
        }

        if let Some(realm_definition) = Self::realm_definition(realm) {
            definitions.push(realm_definition);
        }

        for (client, roles) in realm.client_roles.iter() {
            definitions.push(Self::client_definition(realm, client, roles));
        }

        definitions
    }

    /// The `group` type, present whenever the realm has groups.
    ///
    /// `parent` is declared at the type level as soon as any top-level group has children.
    fn group_definition(groups: &[Group]) -> Option<Definition> {
        if groups.is_empty() {
            return None;
        }

        let mut definition = Definition::new(GROUP_TYPE);
        definition.add_relation("member", USER_TYPE);
        if groups.iter().any(Group::has_subgroups) {
            definition.add_relation("parent", GROUP_TYPE);
        }
        Some(definition)
    }

    /// The `realm` type carrying realm-level roles.
    ///
    /// A composite realm role becomes a permission only when all of its components are
    /// realm roles.
    fn realm_definition(realm: &Realm) -> Option<Definition> {
        if realm.realm_roles.is_empty() {
            return None;
        }

        let mut definition = Definition::new(REALM_TYPE);
        for role in &realm.realm_roles {
            definition.add_relation(sanitize_identifier(role), USER_TYPE);
        }

        for (composite, components) in realm.composite_roles.iter() {
            if realm.realm_roles.iter().any(|role| role == composite) {
                definition.items.push(expand_composite(
                    composite,
                    components,
                    |reference| reference.is_realm_scoped(),
                ));
            }
        }

        Some(definition)
    }

    /// A type named after the client carrying that client's roles.
    ///
    /// A composite client role becomes a permission only when every component is a bare
    /// reference to another role of the same client. Composite roles that do not belong
    /// to this client are skipped.
    fn client_definition(realm: &Realm, client: &str, roles: &[String]) -> Definition {
        let mut definition = Definition::new(sanitize_identifier(client));
        for role in roles {
            definition.add_relation(sanitize_identifier(role), USER_TYPE);
        }

        let is_client_role = |name: &str| roles.iter().any(|role| role == name);
        for (composite, components) in realm.composite_roles.iter() {
            if is_client_role(composite) {
                definition.items.push(expand_composite(
                    composite,
                    components,
                    |reference| matches!(reference, RoleReference::Realm(name) if is_client_role(*name)),
                ));
            }
        }

        definition
    }
}

/// Expand a composite role into a union permission, or explain why it cannot be.
///
/// `in_scope` decides whether a component can be expressed as a relation of the
/// definition being built. Client-scoped (`client:role`) components are never operands.
fn expand_composite<F>(composite: &str, components: &[String], in_scope: F) -> DefinitionItem
where
    F: Fn(&RoleReference<'_>) -> bool,
{
    let references: Vec<RoleReference<'_>> = components
        .iter()
        .map(|component| RoleReference::parse(component))
        .collect();

    let operands: Vec<String> = references
        .iter()
        .filter_map(|reference| match reference {
            RoleReference::Realm(name) => Some(sanitize_identifier(name)),
            RoleReference::Client { .. } => None,
        })
        .collect();

    if !operands.is_empty() && references.iter().all(in_scope) {
        DefinitionItem::Permission {
            name: sanitize_identifier(composite),
            operands,
        }
    } else {
        DefinitionItem::Comment(format!(
            "Composite role '{composite}' spans multiple scopes (not fully expanded)"
        ))
    }
}
