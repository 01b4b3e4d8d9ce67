// SPDX-License-Identifier: PMPL-1.0-or-later

//! Schema introspection.
//!
//! Read-only views over the schema the service was started with: the domain
//! (entities and enumerations) and the infrastructure around it (mappings,
//! sources, stages and views). Names are sent as single path segments, so
//! entity or mapping names containing `/` or spaces are encoded, not split.

use lambdaorm_domain::error::json_kind;
use lambdaorm_domain::{
    DomainSchema, Entity, EntityMapping, EnumDomain, Mapping, MappingError, Schema, Source, Stage,
};
use serde_json::Value;

use crate::client::OrmClient;
use crate::error::Result;

impl OrmClient {
    /// The complete schema: domain, infrastructure and application sections.
    pub async fn schema(&self) -> Result<Schema> {
        self.get(&["schema"]).await
    }

    /// The domain section of the schema.
    pub async fn domain(&self) -> Result<DomainSchema> {
        self.get(&["domain"]).await
    }

    /// All entities of the domain, in declaration order.
    pub async fn entities(&self) -> Result<Vec<Entity>> {
        self.get_many(&["entities"]).await
    }

    /// A single entity by name.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::NotFound`](crate::OrmError::NotFound) if the
    /// service does not know the entity.
    pub async fn entity(&self, name: &str) -> Result<Entity> {
        self.get(&["entities", name]).await
    }

    /// All enumerations of the domain.
    pub async fn enums(&self) -> Result<Vec<EnumDomain>> {
        self.get_many(&["enums"]).await
    }

    /// A single enumeration by name.
    pub async fn enumeration(&self, name: &str) -> Result<EnumDomain> {
        self.get(&["enums", name]).await
    }

    pub async fn mappings(&self) -> Result<Vec<Mapping>> {
        self.get_many(&["mappings"]).await
    }

    pub async fn mapping(&self, name: &str) -> Result<Mapping> {
        self.get(&["mappings", name]).await
    }

    /// How `entity` is stored under the mapping `mapping`.
    pub async fn entity_mapping(&self, mapping: &str, entity: &str) -> Result<EntityMapping> {
        self.get(&["mappings", mapping, entity]).await
    }

    pub async fn sources(&self) -> Result<Vec<Source>> {
        self.get_many(&["sources"]).await
    }

    pub async fn source(&self, name: &str) -> Result<Source> {
        self.get(&["sources", name]).await
    }

    pub async fn stages(&self) -> Result<Vec<Stage>> {
        self.get_many(&["stages"]).await
    }

    pub async fn stage(&self, name: &str) -> Result<Stage> {
        self.get(&["stages", name]).await
    }

    /// Names of the views the schema declares.
    ///
    /// The service may answer with bare names or with view objects; both
    /// yield the names in the order received.
    pub async fn views(&self) -> Result<Vec<String>> {
        let value = self.get_value(&["views"]).await?;
        Ok(view_names(&value)?)
    }
}

fn view_names(value: &Value) -> std::result::Result<Vec<String>, MappingError> {
    let shape = |expected, found: &Value| MappingError::Shape {
        record: "View",
        expected,
        found: json_kind(found),
    };

    let Value::Array(items) = value else {
        return Err(shape("array", value));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let name = match item {
                Value::String(name) => Some(name),
                Value::Object(fields) => match fields.get("name") {
                    Some(Value::String(name)) => Some(name),
                    _ => None,
                },
                _ => None,
            };
            name.cloned().ok_or_else(|| MappingError::Element {
                record: "View",
                index,
                source: Box::new(shape("name or object with a name", item)),
            })
        })
        .collect()
}
