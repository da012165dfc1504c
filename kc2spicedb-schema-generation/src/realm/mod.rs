//! Realm model: the normalized view of a Keycloak realm export
//!
//! A [`Realm`] is an immutable value built once per export by the
//! [`RealmModelBuilder`] and consumed read-only by the schema generator. It keeps
//! only what matters for authorization schema generation: realm roles, client roles,
//! composite role composition, and the group forest.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub(crate) mod builder;
pub(crate) mod export;

pub use builder::{RealmModelBuilder, DEFAULT_REALM_NAME};
pub use export::{CompositesExport, GroupExport, OrderedMap, RealmExport, RoleExport, RolesExport};

/// Structured representation of a Keycloak realm export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Realm {
    /// Realm name, never empty
    pub name: String,
    /// Realm-level role names in export order
    pub realm_roles: Vec<String>,
    /// Client name to the client's role names, in export order
    pub client_roles: RoleMap,
    /// Composite role name to its component references, in export order
    pub composite_roles: RoleMap,
    /// Top-level groups
    pub groups: Vec<Group>,
}

impl Realm {
    /// Create an empty realm with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Number of roles across all clients
    pub fn total_client_role_count(&self) -> usize {
        self.client_roles.total_len()
    }

    /// Number of groups at every nesting level
    pub fn total_group_count(&self) -> usize {
        self.groups
            .iter()
            .map(|group| 1 + group.all_subgroup_names().len())
            .sum()
    }

    /// True when the realm has no roles, no client roles and no groups
    pub fn is_empty(&self) -> bool {
        self.realm_roles.is_empty() && self.client_roles.is_empty() && self.groups.is_empty()
    }
}

/// A Keycloak group, possibly with nested subgroups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Group {
    /// Group name; empty when the export omits it
    pub name: String,
    /// Child groups in export order
    pub subgroups: Vec<Group>,
}

impl Group {
    /// Create a group without children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subgroups: Vec::new(),
        }
    }

    /// Create a group with the given children
    pub fn with_subgroups(name: impl Into<String>, subgroups: Vec<Group>) -> Self {
        Self {
            name: name.into(),
            subgroups,
        }
    }

    pub fn has_subgroups(&self) -> bool {
        !self.subgroups.is_empty()
    }

    /// Names of all descendant groups.
    ///
    /// Each group's direct children are listed before the descendants of those children,
    /// walking the children in export order. The walk uses an explicit stack so deeply
    /// nested exports cannot exhaust the call stack.
    pub fn all_subgroup_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        let mut pending: Vec<&Group> = vec![self];

        while let Some(group) = pending.pop() {
            names.extend(group.subgroups.iter().map(|child| child.name.clone()));
            pending.extend(group.subgroups.iter().rev());
        }

        names
    }
}

// Unlinks the subtree level by level so dropping a deep chain does not recurse.
impl Drop for Group {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.subgroups);
        while let Some(mut group) = pending.pop() {
            pending.append(&mut group.subgroups);
        }
    }
}

/// Insertion-ordered map from a name to a list of role names.
///
/// Used for client roles (client name to role names) and composite roles (composite role
/// name to component references). Keys are unique; inserting an existing key replaces its
/// value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleMap {
    entries: Vec<(String, Vec<String>)>,
}

impl RoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `key`
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = values,
            None => self.entries.push((key, values)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the lengths of all value lists
    pub fn total_len(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).sum()
    }
}

impl<K, V> FromIterator<(K, Vec<V>)> for RoleMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Vec<V>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, values) in iter {
            map.insert(key, values.into_iter().map(Into::into).collect());
        }
        map
    }
}

impl Serialize for RoleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

/// A component of a composite role.
///
/// Keycloak exports list composite components either as bare realm role names or, for
/// client roles, as `client:role` compound references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleReference<'a> {
    /// A realm-scoped role name
    Realm(&'a str),
    /// A role scoped to a client
    Client { client: &'a str, role: &'a str },
}

impl<'a> RoleReference<'a> {
    /// Classify a component reference; anything containing `:` is client-scoped
    pub fn parse(reference: &'a str) -> Self {
        match reference.split_once(':') {
            Some((client, role)) => Self::Client { client, role },
            None => Self::Realm(reference),
        }
    }

    pub fn is_realm_scoped(&self) -> bool {
        matches!(self, Self::Realm(_))
    }

    /// Format a client-scoped reference the way composite role lists store it
    pub fn client_reference(client: &str, role: &str) -> String {
        format!("{client}:{role}")
    }
}
