// SPDX-License-Identifier: PMPL-1.0-or-later
//! Physical mappings, views, sources and stages.
//!
//! A mapping binds domain entities to the naming scheme of one data-source
//! dialect. The records that "extend" a domain record ([`EntityMapping`],
//! [`FormatMapping`], [`PropertyMapping`]) embed their base by value and
//! deref to it, so the base keeps its own defaulting rules.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::decode::{impl_decode, null_as_default};
use crate::entity::{Entity, Property};

// ---------------------------------------------------------------------------
// Mapping records
// ---------------------------------------------------------------------------

/// A property together with its physical column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyMapping {
    #[serde(flatten)]
    pub property: Property,
    /// Physical column name.
    #[serde(deserialize_with = "null_as_default")]
    pub mapping: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_mapping_exp: Option<String>,
}

impl Deref for PropertyMapping {
    type Target = Property;

    fn deref(&self) -> &Property {
        &self.property
    }
}

/// An entity bound to a physical table.
///
/// The mapped properties live in [`EntityMapping::properties`]; the embedded
/// entity's own `properties` list is left empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityMapping {
    #[serde(flatten)]
    pub entity: Entity,
    /// Physical table name.
    #[serde(deserialize_with = "null_as_default")]
    pub mapping: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub properties: Vec<PropertyMapping>,
}

impl EntityMapping {
    /// Physical column name for a domain property.
    pub fn column(&self, property: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.property.name == property)
            .map(|p| p.mapping.as_str())
    }
}

impl Deref for EntityMapping {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.entity
    }
}

/// Date and time formats a mapping applies when reading and writing values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatMapping {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl Deref for FormatMapping {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &self.entity
    }
}

/// A named mapping: the physical naming scheme for one data source dialect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mapping {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub entities: Vec<EntityMapping>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatMapping>,
}

impl Mapping {
    pub fn entity(&self, name: &str) -> Option<&EntityMapping> {
        self.entities.iter().find(|e| e.entity.name == name)
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyView {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_exp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityView {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub properties: Vec<PropertyView>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct View {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub entities: Vec<EntityView>,
}

// ---------------------------------------------------------------------------
// Sources and stages
// ---------------------------------------------------------------------------

/// A data source: a dialect, the mapping it uses, and its connection settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dialect: String,
    #[serde(deserialize_with = "null_as_default")]
    pub mapping: String,
    /// Opaque connection settings (string or object, dialect-specific).
    pub connection: serde_json::Value,
}

/// Rule selecting a source inside a stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRule {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// A named deployment configuration choosing which sources serve a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stage {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sources: Vec<SourceRule>,
}

impl_decode!(
    PropertyMapping,
    EntityMapping,
    FormatMapping,
    Mapping,
    PropertyView,
    EntityView,
    View,
    Source,
    SourceRule,
    Stage,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Decode;
    use crate::entity::RelationType;
    use serde_json::json;

    fn orders_mapping() -> serde_json::Value {
        json!({
            "name": "Orders",
            "mapping": "ORDERS",
            "sequence": "SQ_ORDERS",
            "primaryKey": ["id"],
            "relations": [
                {"name": "details", "type": "oneToMany", "from": "id", "entity": "OrderDetails", "to": "orderId"}
            ],
            "properties": [
                {"name": "id", "type": "integer", "mapping": "ORDER_ID", "primaryKey": true},
                {"name": "orderDate", "type": "dateTime", "mapping": "ORDER_DATE", "readMappingExp": "toDate(ORDER_DATE)"}
            ]
        })
    }

    #[test]
    fn test_entity_mapping_embeds_entity() {
        let mapping = EntityMapping::decode(&orders_mapping()).unwrap();

        assert_eq!(mapping.entity.name, "Orders");
        assert_eq!(mapping.name, "Orders"); // via Deref
        assert_eq!(mapping.primary_key, vec!["id"]);
        assert_eq!(mapping.relations[0].kind, RelationType::OneToMany);
        assert_eq!(mapping.mapping, "ORDERS");
        assert_eq!(mapping.sequence.as_deref(), Some("SQ_ORDERS"));
        assert_eq!(mapping.properties.len(), 2);
        assert!(mapping.entity.properties.is_empty());
        assert_eq!(mapping.column("orderDate"), Some("ORDER_DATE"));
        assert_eq!(
            mapping.properties[1].read_mapping_exp.as_deref(),
            Some("toDate(ORDER_DATE)")
        );
        assert_eq!(mapping.properties[0].primary_key, Some(true));
    }

    #[test]
    fn test_entity_mapping_keeps_base_defaults() {
        let mapping = EntityMapping::decode(&json!({"mapping": "T"})).unwrap();
        assert_eq!(mapping.entity, Entity::default());
        assert_eq!(mapping.mapping, "T");
        assert!(mapping.properties.is_empty());
        assert_eq!(mapping.sequence, None);
    }

    #[test]
    fn test_entity_mapping_rejects_bad_base_relation() {
        let err = EntityMapping::decode(&json!({
            "name": "Orders",
            "relations": [{"name": "x", "type": "sideways"}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_mapping_with_format() {
        let mapping = Mapping::decode(&json!({
            "name": "default",
            "entities": [orders_mapping()],
            "format": {"dateTime": "YYYY-MM-DD HH:mm:ss", "date": "YYYY-MM-DD"}
        }))
        .unwrap();

        assert_eq!(mapping.entity("Orders").unwrap().mapping, "ORDERS");
        let format = mapping.format.unwrap();
        assert_eq!(format.date_time.as_deref(), Some("YYYY-MM-DD HH:mm:ss"));
        assert_eq!(format.time, None);
        assert_eq!(format.name, "");
    }

    #[test]
    fn test_mapping_without_format() {
        let mapping = Mapping::decode(&json!({"name": "default"})).unwrap();
        assert!(mapping.entities.is_empty());
        assert_eq!(mapping.format, None);
    }

    #[test]
    fn test_stage_and_source() {
        let stage = Stage::decode(&json!({
            "name": "default",
            "sources": [{"name": "Catalog", "condition": "entity.in(['Categories','Products'])"}, {"name": "Ordering"}]
        }))
        .unwrap();
        assert_eq!(stage.sources[1].condition, None);

        let sources = Source::decode_many(&json!([
            {"name": "Catalog", "dialect": "PostgreSQL", "mapping": "default", "connection": "${CNN_POSTGRES}"},
            {"name": "Ordering", "dialect": "MongoDB", "mapping": "default", "connection": {"url": "mongodb://x"}}
        ]))
        .unwrap();
        assert_eq!(sources[0].connection, json!("${CNN_POSTGRES}"));
        assert_eq!(sources[1].connection["url"], json!("mongodb://x"));
    }

    #[test]
    fn test_view() {
        let view = View::decode(&json!({
            "name": "collaborator",
            "entities": [{"name": "Customers", "properties": [{"name": "address", "exclude": true}]}]
        }))
        .unwrap();
        assert_eq!(view.entities[0].properties[0].exclude, Some(true));
        assert_eq!(view.entities[0].properties[0].read_exp, None);
    }

    #[test]
    fn test_entity_mapping_serializes_flat() {
        let mapping = EntityMapping::decode(&orders_mapping()).unwrap();
        let value = serde_json::to_value(&mapping).unwrap();
        assert_eq!(value["name"], json!("Orders"));
        assert_eq!(value["mapping"], json!("ORDERS"));
        assert_eq!(value["properties"][0]["mapping"], json!("ORDER_ID"));
        assert_eq!(EntityMapping::decode(&value).unwrap(), mapping);
    }
}
