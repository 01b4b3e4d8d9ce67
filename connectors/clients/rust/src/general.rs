// SPDX-License-Identifier: PMPL-1.0-or-later

//! Service-level operations: version, liveness, health and metrics.

use lambdaorm_domain::{Health, Ping, Version};
use serde_json::Value;

use crate::client::OrmClient;
use crate::error::Result;

impl OrmClient {
    /// Version of the λORM library the service runs.
    pub async fn version(&self) -> Result<Version> {
        self.get(&["version"]).await
    }

    /// Liveness probe.
    pub async fn ping(&self) -> Result<Ping> {
        self.get(&["ping"]).await
    }

    /// Health report including uptime.
    pub async fn health(&self) -> Result<Health> {
        self.get(&["health"]).await
    }

    /// Service metrics, returned as the raw JSON the service produces.
    pub async fn metrics(&self) -> Result<Value> {
        self.get_value(&["metrics"]).await
    }
}
