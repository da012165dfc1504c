//! Prompt rendering for language model schema generation

use kc2spicedb_schema_generation::{Realm, RoleReference};

const INSTRUCTIONS: &str = "\
Generate a SpiceDB schema definition that represents the above roles and groups.
- Define object types for users, groups, and any resources corresponding to clients.
- Include relations for group membership and role assignments (using role names as relation or permission names).
- If a role is composite or groups have subgroups, represent those relationships (e.g., permissions that combine other roles or a parent-child relation for groups).
Output *only* the SpiceDB schema (object definitions) without additional explanation.";

/// Describe the realm's roles, composite roles and groups, followed by the generation
/// instructions.
pub fn build_prompt(realm: &Realm) -> String {
    let details = realm_details(realm);
    let details_text = if details.is_empty() {
        "(No roles or groups)".to_string()
    } else {
        details.join("\n")
    };

    format!(
        "Keycloak realm '{}' has the following roles and groups:\n{}\n\n{}",
        realm.name, details_text, INSTRUCTIONS
    )
}

fn realm_details(realm: &Realm) -> Vec<String> {
    let mut lines = Vec::new();

    if !realm.realm_roles.is_empty() {
        lines.push(format!("- Realm roles: {}", realm.realm_roles.join(", ")));
    }

    for (client, roles) in realm.client_roles.iter() {
        lines.push(format!("- Client '{client}' roles: {}", roles.join(", ")));
    }

    for (composite, components) in realm.composite_roles.iter() {
        if !components.is_empty() {
            lines.push(format!(
                "- Composite role '{composite}' includes {}",
                describe_components(components)
            ));
        }
    }

    if !realm.groups.is_empty() {
        let groups: Vec<String> = realm
            .groups
            .iter()
            .map(|group| {
                if group.has_subgroups() {
                    let children: Vec<&str> =
                        group.subgroups.iter().map(|sub| sub.name.as_str()).collect();
                    format!("{} (subgroups: {})", group.name, children.join(", "))
                } else {
                    group.name.clone()
                }
            })
            .collect();
        lines.push(format!("- Groups: {}", groups.join(", ")));
    }

    lines
}

/// `realm roles [a, b] and app roles [c]`, with client parts grouped per client in
/// first-seen order
fn describe_components(components: &[String]) -> String {
    let mut realm_parts: Vec<&str> = Vec::new();
    let mut client_parts: Vec<(&str, Vec<&str>)> = Vec::new();

    for component in components {
        match RoleReference::parse(component) {
            RoleReference::Realm(role) => realm_parts.push(role),
            RoleReference::Client { client, role } => {
                match client_parts.iter_mut().find(|(name, _)| *name == client) {
                    Some((_, roles)) => roles.push(role),
                    None => client_parts.push((client, vec![role])),
                }
            }
        }
    }

    let mut segments = Vec::new();
    if !realm_parts.is_empty() {
        segments.push(format!("realm roles [{}]", realm_parts.join(", ")));
    }
    for (client, roles) in client_parts {
        segments.push(format!("{client} roles [{}]", roles.join(", ")));
    }
    segments.join(" and ")
}
