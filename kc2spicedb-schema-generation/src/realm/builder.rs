//! Realm model builder
//!
//! Normalizes a decoded realm export into a [`Realm`]. Decoding is the only step that
//! can fail; normalization itself degrades every missing or empty field to a default.

use log::{debug, info};

use super::export::{CompositesExport, GroupExport, RealmExport, RoleExport};
use super::{Group, Realm, RoleMap, RoleReference};
use crate::errors::Result;
use crate::providers::JsonProvider;

/// Realm name used when the export carries neither `realm` nor `id`
pub const DEFAULT_REALM_NAME: &str = "UnnamedRealm";

/// Builds [`Realm`] values from Keycloak realm exports
#[derive(Debug, Clone, Copy, Default)]
pub struct RealmModelBuilder;

impl RealmModelBuilder {
    /// Build a realm from an already-decoded JSON record
    pub fn build(record: &serde_json::Value) -> Result<Realm> {
        let export = RealmExport::from_value(record)?;
        Ok(Self::from_export(export))
    }

    /// Build a realm from JSON text
    pub fn build_from_str(json: &str) -> Result<Realm> {
        let export: RealmExport = JsonProvider::parse(json)?;
        Ok(Self::from_export(export))
    }

    /// Normalize a typed export into a realm
    pub fn from_export(export: RealmExport) -> Realm {
        debug!("Building realm model from export");

        let name = [export.realm.as_deref(), export.id.as_deref()]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.is_empty())
            .unwrap_or(DEFAULT_REALM_NAME)
            .to_string();

        let realm = Realm {
            name,
            realm_roles: role_names(&export.roles.realm),
            client_roles: client_roles(&export),
            composite_roles: composite_roles(&export),
            groups: build_groups(export.groups),
        };

        info!(
            "Parsed realm '{}': {} realm roles, {} client roles, {} top-level groups.",
            realm.name,
            realm.realm_roles.len(),
            realm.total_client_role_count(),
            realm.groups.len()
        );
        debug!(
            "Realm '{}' has {} groups across all nesting levels",
            realm.name,
            realm.total_group_count()
        );

        if !realm.composite_roles.is_empty() {
            info!(
                "Found {} composite role(s) in the realm export.",
                realm.composite_roles.len()
            );
        }

        realm
    }
}

fn role_names(roles: &[RoleExport]) -> Vec<String> {
    roles
        .iter()
        .filter_map(RoleExport::name)
        .map(str::to_string)
        .collect()
}

fn client_roles(export: &RealmExport) -> RoleMap {
    let mut client_roles = RoleMap::new();
    for (client, roles) in export.roles.client.iter() {
        let names = role_names(roles);
        if !names.is_empty() {
            client_roles.insert(client, names);
        }
    }
    client_roles
}

/// Realm roles are visited before client roles, so a client role sharing a name with a
/// realm role replaces the realm role's component list.
fn composite_roles(export: &RealmExport) -> RoleMap {
    let all_roles = export
        .roles
        .realm
        .iter()
        .chain(export.roles.client.values().flatten());

    let mut composite_roles = RoleMap::new();
    for role in all_roles {
        let Some(name) = role.name() else {
            continue;
        };
        if !role.composite {
            continue;
        }
        let Some(composites) = role.composites.as_ref().filter(|c| !c.is_empty()) else {
            continue;
        };

        let components = composite_components(composites);
        if !components.is_empty() {
            composite_roles.insert(name, components);
        }
    }
    composite_roles
}

fn composite_components(composites: &CompositesExport) -> Vec<String> {
    let mut components = composites.realm.clone();
    for (client, roles) in composites.client.iter() {
        components.extend(
            roles
                .iter()
                .map(|role| RoleReference::client_reference(client, role)),
        );
    }
    components
}

/// A group under construction: its remaining child exports and the children built so far
struct GroupFrame {
    name: String,
    pending: std::vec::IntoIter<GroupExport>,
    built: Vec<Group>,
}

impl GroupFrame {
    fn new(name: String, children: Vec<GroupExport>) -> Self {
        Self {
            name,
            built: Vec::with_capacity(children.len()),
            pending: children.into_iter(),
        }
    }

    fn from_export(mut group: GroupExport) -> Self {
        let children = group
            .sub_groups
            .take()
            .or_else(|| group.subgroups.take())
            .unwrap_or_default();
        Self::new(group.name.take().unwrap_or_default(), children)
    }
}

/// Convert the group forest with an explicit stack, consuming the exports as it goes
fn build_groups(groups: Vec<GroupExport>) -> Vec<Group> {
    let mut stack = vec![GroupFrame::new(String::new(), groups)];

    while let Some(mut frame) = stack.pop() {
        if let Some(child) = frame.pending.next() {
            stack.push(frame);
            stack.push(GroupFrame::from_export(child));
            continue;
        }

        match stack.last_mut() {
            Some(parent) => parent
                .built
                .push(Group::with_subgroups(frame.name, frame.built)),
            None => return frame.built,
        }
    }

    Vec::new()
}
