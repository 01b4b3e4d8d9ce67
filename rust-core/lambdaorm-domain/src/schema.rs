// SPDX-License-Identifier: PMPL-1.0-or-later
//! The schema aggregate and the stage configuration export format.

use serde::{Deserialize, Serialize};

use crate::decode::{impl_decode, null_as_default};
use crate::entity::{EnumDomain, Entity};
use crate::mapping::{Mapping, Source, Stage, View};

// ---------------------------------------------------------------------------
// Application lifecycle
// ---------------------------------------------------------------------------

/// A listener fired around the listed actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A task run at application start or end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppPathsConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub src: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
}

// ---------------------------------------------------------------------------
// Schema sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainSchema {
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub entities: Vec<Entity>,
    #[serde(deserialize_with = "null_as_default")]
    pub enums: Vec<EnumDomain>,
}

impl DomainSchema {
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<AppPathsConfig>,
    #[serde(deserialize_with = "null_as_default")]
    pub mappings: Vec<Mapping>,
    #[serde(deserialize_with = "null_as_default")]
    pub views: Vec<View>,
    #[serde(deserialize_with = "null_as_default")]
    pub sources: Vec<Source>,
    #[serde(deserialize_with = "null_as_default")]
    pub stages: Vec<Stage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSchema {
    #[serde(deserialize_with = "null_as_default")]
    pub start: Vec<TaskConfig>,
    #[serde(deserialize_with = "null_as_default")]
    pub listeners: Vec<ListenerConfig>,
    #[serde(deserialize_with = "null_as_default")]
    pub end: Vec<TaskConfig>,
}

/// Aggregate root of everything the service knows about a workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: DomainSchema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infrastructure: Option<InfrastructureSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<ApplicationSchema>,
}

// ---------------------------------------------------------------------------
// Stage configuration
// ---------------------------------------------------------------------------

/// Result of synchronising a mapping with its data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    pub mapping: serde_json::Value,
    #[serde(deserialize_with = "null_as_default")]
    pub pending: Vec<serde_json::Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub inconsistency: Vec<serde_json::Value>,
}

/// Exported rows of one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfigEntity {
    #[serde(deserialize_with = "null_as_default")]
    pub entity: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rows: Vec<serde_json::Value>,
}

/// Data exported from (or imported into) a stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub entities: Vec<SchemaConfigEntity>,
}

impl_decode!(
    ListenerConfig,
    TaskConfig,
    AppPathsConfig,
    DomainSchema,
    InfrastructureSchema,
    ApplicationSchema,
    Schema,
    MappingConfig,
    SchemaConfigEntity,
    SchemaConfig,
);
