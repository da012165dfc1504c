//! Typed decoding of Keycloak realm export JSON.
//!
//! Only the parts of an export that drive schema generation are modelled. Every field
//! is optional: a missing key or an explicit `null` decodes to the field's default, and
//! keys this module does not know about (users, clients, authentication flows, ...) are
//! ignored. A key that is present with the wrong type is a decode error; guessing what
//! a malformed export meant would corrupt the generated authorization data.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::errors::Result;
use crate::providers::JsonProvider;

/// Top level of a realm export
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RealmExport {
    pub realm: Option<String>,
    pub id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub roles: RolesExport,
    #[serde(deserialize_with = "null_as_default")]
    pub groups: Vec<GroupExport>,
}

/// The `roles` section: realm roles and per-client roles
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RolesExport {
    #[serde(deserialize_with = "null_as_default")]
    pub realm: Vec<RoleExport>,
    #[serde(deserialize_with = "null_as_default")]
    pub client: OrderedMap<Vec<RoleExport>>,
}

/// A single role record
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoleExport {
    pub name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub composite: bool,
    pub composites: Option<CompositesExport>,
}

/// Components of a composite role
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompositesExport {
    #[serde(deserialize_with = "null_as_default")]
    pub realm: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub client: OrderedMap<Vec<String>>,
}

/// A group record. Keycloak writes children under `subGroups`; `subgroups` is accepted too.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GroupExport {
    pub name: Option<String>,
    #[serde(rename = "subGroups")]
    pub sub_groups: Option<Vec<GroupExport>>,
    pub subgroups: Option<Vec<GroupExport>>,
}

impl RealmExport {
    /// Decode an export from an already-parsed JSON value
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        Ok(Self::deserialize(serde_stacker::Deserializer::new(value))?)
    }

    /// Decode an export from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        JsonProvider::parse(json)
    }
}

impl RoleExport {
    /// The role's name, if it has a non-empty one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

impl CompositesExport {
    pub fn is_empty(&self) -> bool {
        self.realm.is_empty() && self.client.is_empty()
    }
}

impl GroupExport {
    /// Children of this group, preferring `subGroups` when both keys are present
    pub fn children(&self) -> &[GroupExport] {
        self.sub_groups
            .as_deref()
            .or(self.subgroups.as_deref())
            .unwrap_or_default()
    }
}

/// A JSON object decoded with its keys in source order.
///
/// A repeated key keeps the position of its first occurrence and the value of its last.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<T>(Vec<(String, T)>);

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> OrderedMap<T> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for OrderedMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut entries: Vec<(String, T)> = Vec::new();
        for (key, value) in iter {
            insert_entry(&mut entries, key.into(), value);
        }
        Self(entries)
    }
}

fn insert_entry<T>(entries: &mut Vec<(String, T)>, key: String, value: T) {
    match entries.iter_mut().find(|(existing, _)| *existing == key) {
        Some((_, slot)) => *slot = value,
        None => entries.push((key, value)),
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<T> {
            type Value = OrderedMap<T>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    insert_entry(&mut entries, key, value);
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Treat an explicit `null` like a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SchemaGenerationError;
    use serde_json::json;

    #[test]
    fn test_empty_object_decodes_to_defaults() {
        let export = RealmExport::from_json_str("{}").unwrap();
        assert_eq!(export, RealmExport::default());
    }

    #[test]
    fn test_nulls_decode_to_defaults() {
        let export = RealmExport::from_value(&json!({
            "realm": null,
            "roles": { "realm": null, "client": null },
            "groups": null
        }))
        .unwrap();
        assert_eq!(export, RealmExport::default());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let export = RealmExport::from_value(&json!({
            "realm": "acme",
            "enabled": true,
            "users": [{ "username": "alice" }],
            "roles": { "realm": [{ "name": "admin", "description": "Administrators" }] }
        }))
        .unwrap();
        assert_eq!(export.realm.as_deref(), Some("acme"));
        assert_eq!(export.roles.realm[0].name(), Some("admin"));
    }

    #[test]
    fn test_client_map_keeps_source_order() {
        let export = RealmExport::from_json_str(
            r#"{"roles": {"client": {"zeta": [], "alpha": [], "mid": []}}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = export.roles.client.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_repeated_client_key_keeps_first_position_and_last_value() {
        let export = RealmExport::from_json_str(
            r#"{"roles": {"client": {
                "a": [{ "name": "first" }],
                "b": [{ "name": "middle" }],
                "a": [{ "name": "second" }]
            }}}"#,
        )
        .unwrap();

        let entries: Vec<(&str, Vec<&str>)> = export
            .roles
            .client
            .iter()
            .map(|(client, roles)| (client, roles.iter().filter_map(RoleExport::name).collect()))
            .collect();
        assert_eq!(entries, vec![("a", vec!["second"]), ("b", vec!["middle"])]);
    }

    #[test]
    fn test_wrong_type_is_malformed_export() {
        let result = RealmExport::from_value(&json!({ "roles": { "realm": "admin" } }));
        assert!(matches!(
            result,
            Err(SchemaGenerationError::MalformedExport(_))
        ));
    }

    #[test]
    fn test_non_object_top_level_is_malformed_export() {
        let result = RealmExport::from_json_str("[1, 2, 3]");
        assert!(matches!(
            result,
            Err(SchemaGenerationError::MalformedExport(_))
        ));
    }

    #[test]
    fn test_group_children_prefer_sub_groups() {
        let group: GroupExport = serde_json::from_value(json!({
            "name": "parent",
            "subGroups": [{ "name": "preferred" }],
            "subgroups": [{ "name": "ignored" }]
        }))
        .unwrap();
        assert_eq!(group.children().len(), 1);
        assert_eq!(group.children()[0].name.as_deref(), Some("preferred"));
    }

    #[test]
    fn test_group_children_fall_back_to_lowercase_key() {
        let group: GroupExport = serde_json::from_value(json!({
            "name": "parent",
            "subgroups": [{ "name": "child" }]
        }))
        .unwrap();
        assert_eq!(group.children()[0].name.as_deref(), Some("child"));
    }

    #[test]
    fn test_role_name_filters_empty() {
        let role = RoleExport {
            name: Some(String::new()),
            ..RoleExport::default()
        };
        assert_eq!(role.name(), None);
    }
}
