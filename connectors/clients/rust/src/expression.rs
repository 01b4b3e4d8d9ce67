// SPDX-License-Identifier: PMPL-1.0-or-later

//! Expression operations.
//!
//! λORM expressions are lambda-style query strings such as
//! `Orders.filter(p => p.id == id).include(p => p.details)`. The service can
//! describe an expression without running it (parameters, result model,
//! constraints, full metadata tree), translate it into a per-source
//! [`QueryPlan`], or execute it, either directly or through a queue topic.
//!
//! All calls POST a JSON body under `/expression`.

use lambdaorm_domain::{
    Metadata, MetadataConstraint, MetadataModel, MetadataParameter, QueryOptions, QueryPlan,
};
use serde::Serialize;
use serde_json::Value;

use crate::client::OrmClient;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct ExpressionRequest<'a> {
    expression: &'a str,
}

#[derive(Debug, Serialize)]
struct PlanRequest<'a> {
    expression: &'a str,
    options: &'a QueryOptions,
}

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    expression: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<&'a str>,
    data: &'a Value,
    options: &'a QueryOptions,
}

impl OrmClient {
    /// Parameters the expression expects, e.g. `id` in `p => p.id == id`.
    pub async fn parameters(&self, expression: &str) -> Result<Vec<MetadataParameter>> {
        self.post_many(&["expression", "parameters"], &ExpressionRequest { expression })
            .await
    }

    /// Shape of the rows the expression returns.
    pub async fn model(&self, expression: &str) -> Result<Vec<MetadataModel>> {
        self.post_many(&["expression", "model"], &ExpressionRequest { expression })
            .await
    }

    /// Constraints checked when the expression writes data.
    pub async fn constraints(&self, expression: &str) -> Result<MetadataConstraint> {
        self.post(&["expression", "constraints"], &ExpressionRequest { expression })
            .await
    }

    /// The full metadata tree of the parsed expression.
    pub async fn metadata(&self, expression: &str) -> Result<Metadata> {
        self.post(&["expression", "metadata"], &ExpressionRequest { expression })
            .await
    }

    /// Translate the expression into native sentences for the sources of
    /// `options.stage`, without executing them.
    ///
    /// # Errors
    ///
    /// A non-success status fails the call; no partial plan is returned.
    pub async fn plan(&self, expression: &str, options: &QueryOptions) -> Result<QueryPlan> {
        self.post(
            &["expression", "plan"],
            &PlanRequest {
                expression,
                options,
            },
        )
        .await
    }

    /// Execute the expression with `data` bound to its parameters.
    ///
    /// The result is whatever the expression produces (rows, inserted ids,
    /// affected counts), so it is returned as raw JSON.
    pub async fn execute(
        &self,
        expression: &str,
        data: &Value,
        options: &QueryOptions,
    ) -> Result<Value> {
        self.post_value(
            &["expression", "execute"],
            &ExecuteRequest {
                expression,
                topic: None,
                data,
                options,
            },
        )
        .await
    }

    /// Enqueue the expression on `topic` for asynchronous execution.
    pub async fn execute_queued(
        &self,
        expression: &str,
        topic: &str,
        data: &Value,
        options: &QueryOptions,
    ) -> Result<Value> {
        self.post_value(
            &["expression", "execute-queued"],
            &ExecuteRequest {
                expression,
                topic: Some(topic),
                data,
                options,
            },
        )
        .await
    }
}
