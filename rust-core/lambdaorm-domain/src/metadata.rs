// SPDX-License-Identifier: PMPL-1.0-or-later
//! Introspection results for a query expression.
//!
//! The service parses an expression and can return it in several forms: the
//! parameters it expects, the shape of its result, the constraints that apply
//! and the full metadata tree. All of them are recursive through `children`.
//!
//! On the wire every metadata node is the same flat object whatever its
//! class. Here the class tag selects a [`MetadataNode`] variant that carries
//! only the fields that class uses.

use serde::{Deserialize, Serialize};

use crate::decode::{impl_decode, null_as_default};
use crate::entity::{Constraint, Property, Relation};

// ---------------------------------------------------------------------------
// Leaf records
// ---------------------------------------------------------------------------

/// Line/column position of a node in the source expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    #[serde(deserialize_with = "null_as_default")]
    pub ln: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub col: u32,
}

/// A value or default expression applied to a property on write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Behavior {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub property: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expression: String,
}

/// A parameter referenced by a sentence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameter {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple: Option<bool>,
}

// ---------------------------------------------------------------------------
// Recursive summaries
// ---------------------------------------------------------------------------

/// A parameter an expression expects, nested by the sentence that uses it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataParameter {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub children: Vec<MetadataParameter>,
}

/// One field of the result an expression produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataModel {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub children: Vec<MetadataModel>,
}

/// Constraints enforced on an entity touched by an expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConstraint {
    #[serde(deserialize_with = "null_as_default")]
    pub entity: String,
    #[serde(deserialize_with = "null_as_default")]
    pub constraints: Vec<Constraint>,
    #[serde(deserialize_with = "null_as_default")]
    pub children: Vec<MetadataConstraint>,
}

// ---------------------------------------------------------------------------
// Metadata tree
// ---------------------------------------------------------------------------

/// Class tags decoded as [`MetadataNode::Clause`].
pub const CLAUSE_CLASSES: [&str; 13] = [
    "From",
    "Join",
    "Map",
    "Filter",
    "GroupBy",
    "Having",
    "Sort",
    "Page",
    "Insert",
    "Update",
    "Delete",
    "BulkInsert",
    "Distinct",
];

/// Node-kind specific payload of a [`Metadata`] node.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataNode {
    /// A complete query or DML sentence (`Sentence`).
    Sentence {
        entity: String,
        alias: Option<String>,
        columns: Vec<Property>,
        parameters: Vec<Parameter>,
        constraints: Vec<Constraint>,
        values: Vec<Behavior>,
        defaults: Vec<Behavior>,
    },
    /// A related sentence pulled in through `include` (`SentenceInclude`).
    Include { relation: Relation },
    /// A clause of a sentence (`From`, `Filter`, `Map`, ...).
    Clause {
        clause: Option<String>,
        entity: Option<String>,
        alias: Option<String>,
    },
    /// A reference to an entity property (`Field`).
    Field {
        entity: Option<String>,
        alias: Option<String>,
        property: Option<String>,
        is_root: Option<bool>,
    },
    /// A `key: value` pair of an object literal (`KeyValue`).
    KeyValue { property: Option<String> },
    /// A query parameter reference (`Variable`).
    Variable { number: Option<i64> },
    /// Any other operand: constants, operators, function calls, lists,
    /// objects and blocks.
    Operand,
}

/// A node of the parsed and typed representation of a query expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMetadata", into = "RawMetadata")]
pub struct Metadata {
    /// Class tag as sent by the service.
    pub classtype: String,
    pub pos: Position,
    pub name: String,
    /// Data type of the node's value.
    pub kind: String,
    pub return_type: Option<String>,
    pub children: Vec<Metadata>,
    pub node: MetadataNode,
}

impl Metadata {
    /// All nodes of the tree in pre-order, starting with `self`.
    pub fn nodes(&self) -> Vec<&Metadata> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Entity a sentence, clause or field node refers to.
    pub fn entity(&self) -> Option<&str> {
        match &self.node {
            MetadataNode::Sentence { entity, .. } => Some(entity),
            MetadataNode::Include { relation } => Some(&relation.entity),
            MetadataNode::Clause { entity, .. } | MetadataNode::Field { entity, .. } => {
                entity.as_deref()
            }
            _ => None,
        }
    }
}

/// Flat wire shape of a metadata node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawMetadata {
    #[serde(deserialize_with = "null_as_default")]
    classtype: String,
    #[serde(deserialize_with = "null_as_default")]
    pos: Position,
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    return_type: Option<String>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    children: Vec<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_root: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    relation: Option<Relation>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    columns: Vec<Property>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<Parameter>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    constraints: Vec<Constraint>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    values: Vec<Behavior>,
    #[serde(deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    defaults: Vec<Behavior>,
}

impl TryFrom<RawMetadata> for Metadata {
    type Error = String;

    fn try_from(raw: RawMetadata) -> Result<Self, Self::Error> {
        let node = match raw.classtype.as_str() {
            "Sentence" => MetadataNode::Sentence {
                entity: raw.entity.unwrap_or_default(),
                alias: raw.alias,
                columns: raw.columns,
                parameters: raw.parameters,
                constraints: raw.constraints,
                values: raw.values,
                defaults: raw.defaults,
            },
            "SentenceInclude" => MetadataNode::Include {
                relation: raw
                    .relation
                    .ok_or_else(|| format!("{} node '{}' has no relation", raw.classtype, raw.name))?,
            },
            "Field" => MetadataNode::Field {
                entity: raw.entity,
                alias: raw.alias,
                property: raw.property,
                is_root: raw.is_root,
            },
            "KeyValue" => MetadataNode::KeyValue {
                property: raw.property,
            },
            "Variable" => MetadataNode::Variable { number: raw.number },
            class if CLAUSE_CLASSES.contains(&class) => MetadataNode::Clause {
                clause: raw.clause,
                entity: raw.entity,
                alias: raw.alias,
            },
            _ => MetadataNode::Operand,
        };

        Ok(Metadata {
            classtype: raw.classtype,
            pos: raw.pos,
            name: raw.name,
            kind: raw.kind,
            return_type: raw.return_type,
            children: raw.children,
            node,
        })
    }
}

impl From<Metadata> for RawMetadata {
    fn from(meta: Metadata) -> Self {
        let mut raw = RawMetadata {
            classtype: meta.classtype,
            pos: meta.pos,
            name: meta.name,
            kind: meta.kind,
            return_type: meta.return_type,
            children: meta.children,
            ..Default::default()
        };

        match meta.node {
            MetadataNode::Sentence {
                entity,
                alias,
                columns,
                parameters,
                constraints,
                values,
                defaults,
            } => {
                raw.entity = Some(entity);
                raw.alias = alias;
                raw.columns = columns;
                raw.parameters = parameters;
                raw.constraints = constraints;
                raw.values = values;
                raw.defaults = defaults;
            }
            MetadataNode::Include { relation } => raw.relation = Some(relation),
            MetadataNode::Clause {
                clause,
                entity,
                alias,
            } => {
                raw.clause = clause;
                raw.entity = entity;
                raw.alias = alias;
            }
            MetadataNode::Field {
                entity,
                alias,
                property,
                is_root,
            } => {
                raw.entity = entity;
                raw.alias = alias;
                raw.property = property;
                raw.is_root = is_root;
            }
            MetadataNode::KeyValue { property } => raw.property = property,
            MetadataNode::Variable { number } => raw.number = number,
            MetadataNode::Operand => {}
        }

        raw
    }
}

impl_decode!(
    Position,
    Behavior,
    Parameter,
    MetadataParameter,
    MetadataModel,
    MetadataConstraint,
    Metadata,
);
