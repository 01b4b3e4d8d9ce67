// SPDX-License-Identifier: PMPL-1.0-or-later
//! Entities of the domain schema and their building blocks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decode::{impl_decode, null_as_default};

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// Cardinality of a relation between two entities.
///
/// The wire literals form a closed set; anything else fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum RelationType {
    OneToMany,
    ManyToOne,
    OneToOne,
}

impl RelationType {
    pub const ALL: [RelationType; 3] = [
        RelationType::OneToMany,
        RelationType::ManyToOne,
        RelationType::OneToOne,
    ];

    /// Wire literal for this relation type.
    pub fn as_str(self) -> &'static str {
        match self {
            RelationType::OneToMany => "oneToMany",
            RelationType::ManyToOne => "manyToOne",
            RelationType::OneToOne => "oneToOne",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                format!("invalid relation type '{s}', expected one of oneToMany, manyToOne, oneToOne")
            })
    }
}

impl TryFrom<String> for RelationType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RelationType> for &'static str {
    fn from(kind: RelationType) -> Self {
        kind.as_str()
    }
}

/// A typed edge from one entity to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RelationType,
    /// Field on the source entity.
    #[serde(default, deserialize_with = "null_as_default")]
    pub from: String,
    /// Target entity.
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity: String,
    /// Field on the target entity.
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weak: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// An entity that depends on the owner through `relation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity: String,
    pub relation: Relation,
}

// ---------------------------------------------------------------------------
// Structural pieces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Index {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fields: Vec<String>,
}

/// A declared property (column) of an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Property {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_increment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_exp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_exp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_value: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// A boolean rule attached to an entity, with the message reported on violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraint {
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub condition: String,
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A named data type of the domain schema (e.g. `Orders`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Entity {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub primary_key: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub unique_key: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub required: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub indexes: Vec<Index>,
    // Empty on the entity embedded in an `EntityMapping`, whose own
    // `properties` key carries the mapped properties.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "null_as_default")]
    pub properties: Vec<Property>,
    #[serde(deserialize_with = "null_as_default")]
    pub relations: Vec<Relation>,
    #[serde(deserialize_with = "null_as_default")]
    pub dependents: Vec<Dependent>,
    #[serde(deserialize_with = "null_as_default")]
    pub constraints: Vec<Constraint>,
    /// Name of the entity this one extends (composition flag, resolved remotely).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub singular: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub had_read_exps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub had_write_exps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub had_read_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub had_write_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub had_defaults: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub had_view_read_exp: Option<bool>,
}

impl Entity {
    /// Look up a declared property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Look up a relation by name.
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }
}

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumValue {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub value: serde_json::Value,
}

/// An enumeration declared in the domain schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumDomain {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub is_abstract: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub values: Vec<EnumValue>,
}

impl_decode!(Relation, Dependent, Index, Property, Constraint, Entity, EnumValue, EnumDomain);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Decode;
    use crate::error::MappingError;
    use serde_json::json;

    #[test]
    fn test_relation_type_literals() {
        for kind in RelationType::ALL {
            assert_eq!(kind.as_str().parse::<RelationType>().unwrap(), kind);
        }
        assert!("OneToMany".parse::<RelationType>().is_err());
        assert!("".parse::<RelationType>().is_err());
    }

    #[test]
    fn test_relation_scenario() {
        let relation = Relation::decode(&json!({
            "name": "details",
            "type": "oneToMany",
            "from": "id",
            "entity": "OrderDetail",
            "to": "orderId"
        }))
        .unwrap();

        assert_eq!(relation.name, "details");
        assert_eq!(relation.kind, RelationType::OneToMany);
        assert_eq!(relation.from, "id");
        assert_eq!(relation.entity, "OrderDetail");
        assert_eq!(relation.to, "orderId");
        assert_eq!(relation.composite, None);
        assert_eq!(relation.weak, None);
        assert_eq!(relation.target, None);
    }

    #[test]
    fn test_relation_unknown_type_fails() {
        let err = Relation::decode(&json!({"name": "x", "type": "manyToMany"})).unwrap_err();
        assert!(matches!(err, MappingError::Invalid { .. }));
        assert!(err.to_string().contains("manyToMany"));
    }

    #[test]
    fn test_relation_missing_type_fails() {
        assert!(Relation::decode(&json!({"name": "x"})).is_err());
    }

    #[test]
    fn test_relation_type_serializes_as_literal() {
        let value = serde_json::to_value(RelationType::ManyToOne).unwrap();
        assert_eq!(value, json!("manyToOne"));
    }

    #[test]
    fn test_entity_defaults() {
        let entity = Entity::decode(&json!({"name": "Orders"})).unwrap();
        assert_eq!(entity.name, "Orders");
        assert!(entity.primary_key.is_empty());
        assert!(entity.indexes.is_empty());
        assert!(entity.relations.is_empty());
        assert!(entity.dependents.is_empty());
        assert!(entity.constraints.is_empty());
        assert_eq!(entity.extends, None);
        assert_eq!(entity.is_abstract, None);
    }

    #[test]
    fn test_entity_null_reads_as_absent() {
        let entity = Entity::decode(&json!({
            "name": null,
            "primaryKey": null,
            "relations": null,
            "constraints": null,
            "extends": null
        }))
        .unwrap();
        assert_eq!(entity, Entity::default());

        let relation = Relation::decode(&json!({"name": null, "type": "oneToOne", "from": null})).unwrap();
        assert_eq!(relation.name, "");
        assert_eq!(relation.from, "");
    }

    #[test]
    fn test_relation_null_type_fails() {
        let err = Relation::decode(&json!({"name": "x", "type": null})).unwrap_err();
        assert!(matches!(err, MappingError::Invalid { .. }));
    }

    #[test]
    fn test_entity_nested_records() {
        let entity = Entity::decode(&json!({
            "name": "Orders",
            "primaryKey": ["id"],
            "indexes": [{"name": "orderDate", "fields": ["orderDate"]}],
            "properties": [
                {"name": "id", "type": "integer", "primaryKey": true, "autoIncrement": true},
                {"name": "customerId", "type": "string", "length": 5, "required": true}
            ],
            "relations": [
                {"name": "customer", "type": "manyToOne", "from": "customerId", "entity": "Customers", "to": "id"}
            ],
            "dependents": [
                {"entity": "OrderDetails", "relation": {"name": "order", "type": "manyToOne", "from": "orderId", "entity": "Orders", "to": "id"}}
            ],
            "abstract": false,
            "hadReadExps": true
        }))
        .unwrap();

        assert_eq!(entity.primary_key, vec!["id"]);
        assert_eq!(entity.indexes[0].fields, vec!["orderDate"]);
        assert_eq!(entity.property("id").unwrap().auto_increment, Some(true));
        assert_eq!(entity.property("customerId").unwrap().length, Some(5));
        assert_eq!(entity.relation("customer").unwrap().kind, RelationType::ManyToOne);
        assert_eq!(entity.dependents[0].relation.entity, "Orders");
        assert_eq!(entity.is_abstract, Some(false));
        assert_eq!(entity.had_read_exps, Some(true));
    }

    #[test]
    fn test_entity_bad_nested_relation_fails() {
        let err = Entity::decode(&json!({
            "name": "Orders",
            "relations": [{"name": "customer", "type": "several"}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("several"));
    }

    #[test]
    fn test_enum_domain() {
        let domain = EnumDomain::decode(&json!({
            "name": "Gender",
            "values": [{"name": "Male", "value": "M"}, {"name": "Female", "value": "F"}]
        }))
        .unwrap();
        assert_eq!(domain.values.len(), 2);
        assert_eq!(domain.values[1].value, json!("F"));
        assert_eq!(domain.extends, None);
    }
}
