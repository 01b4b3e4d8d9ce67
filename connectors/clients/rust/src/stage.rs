// SPDX-License-Identifier: PMPL-1.0-or-later

//! Stage data management: existence checks, export and import.

use lambdaorm_domain::error::json_kind;
use lambdaorm_domain::{MappingError, SchemaConfig};
use serde_json::Value;

use crate::client::OrmClient;
use crate::error::Result;

impl OrmClient {
    /// Whether the stage's sources have been created.
    pub async fn stage_exists(&self, name: &str) -> Result<bool> {
        let value = self.get_value(&["stages", name, "exists"]).await?;
        Ok(exists_flag(&value)?)
    }

    /// Export every entity's rows from the stage.
    pub async fn export_stage(&self, name: &str) -> Result<SchemaConfig> {
        self.get(&["stages", name, "export"]).await
    }

    /// Import previously exported rows into the stage. Any response body is
    /// discarded.
    pub async fn import_stage(&self, name: &str, data: &SchemaConfig) -> Result<()> {
        self.post_discard(&["stages", name, "import"], data).await
    }
}

/// Accept either a bare boolean or `{"exists": <bool>}`.
fn exists_flag(value: &Value) -> std::result::Result<bool, MappingError> {
    let flag = match value {
        Value::Bool(flag) => Some(*flag),
        Value::Object(fields) => fields.get("exists").and_then(Value::as_bool),
        _ => None,
    };
    flag.ok_or_else(|| MappingError::Shape {
        record: "StageExists",
        expected: "boolean",
        found: json_kind(value),
    })
}
