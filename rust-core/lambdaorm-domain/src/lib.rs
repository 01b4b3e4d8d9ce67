// SPDX-License-Identifier: PMPL-1.0-or-later
//! λORM domain records
//!
//! Typed mirrors of the JSON the λORM query service returns: the domain
//! schema (entities, enumerations), its infrastructure (mappings, views,
//! sources, stages), expression introspection (metadata trees, parameters,
//! constraints) and physical query plans.
//!
//! Every record is a passive value created fresh by [`Decode`] from a parsed
//! response and never mutated afterwards.
//!
//! ```
//! use lambdaorm_domain::{Decode, Relation, RelationType};
//! use serde_json::json;
//!
//! let relation = Relation::decode(&json!({
//!     "name": "details", "type": "oneToMany",
//!     "from": "id", "entity": "OrderDetail", "to": "orderId"
//! })).unwrap();
//! assert_eq!(relation.kind, RelationType::OneToMany);
//! ```

pub mod decode;
pub mod entity;
pub mod error;
pub mod general;
pub mod mapping;
pub mod metadata;
pub mod options;
pub mod plan;
pub mod schema;

pub use decode::Decode;
pub use entity::{
    Constraint, Dependent, Entity, EnumDomain, EnumValue, Index, Property, Relation, RelationType,
};
pub use error::{MappingError, Result};
pub use general::{Health, Ping, Version};
pub use mapping::{
    EntityMapping, EntityView, FormatMapping, Mapping, PropertyMapping, PropertyView, Source,
    SourceRule, Stage, View,
};
pub use metadata::{
    Behavior, Metadata, MetadataConstraint, MetadataModel, MetadataNode, MetadataParameter,
    Parameter, Position,
};
pub use options::{Format, MethodOptions, QueryOptions};
pub use plan::QueryPlan;
pub use schema::{
    AppPathsConfig, ApplicationSchema, DomainSchema, InfrastructureSchema, ListenerConfig,
    MappingConfig, Schema, SchemaConfig, SchemaConfigEntity, TaskConfig,
};
