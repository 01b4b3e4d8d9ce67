// SPDX-License-Identifier: PMPL-1.0-or-later
//! Dispatch of parsed subcommands onto client calls.

use std::fs;

use anyhow::Context;
use lambdaorm_client::OrmClient;
use lambdaorm_domain::{Decode, SchemaConfig};
use serde::Serialize;
use serde_json::{json, Value};

use crate::Command;

fn to_json<T: Serialize>(value: T) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(value)?)
}

fn parse_data(data: &str) -> anyhow::Result<Value> {
    serde_json::from_str(data).context("--data is not valid JSON")
}

/// Run one subcommand and return what it should print.
pub(crate) async fn run(client: &OrmClient, command: Command) -> anyhow::Result<Value> {
    match command {
        Command::Version => to_json(client.version().await?),
        Command::Ping => to_json(client.ping().await?),
        Command::Health => to_json(client.health().await?),
        Command::Metrics => Ok(client.metrics().await?),
        Command::Status => {
            let (version, ping, health) =
                tokio::try_join!(client.version(), client.ping(), client.health())?;
            Ok(json!({
                "url": client.base_url().as_str(),
                "version": version.version,
                "ping": ping,
                "health": health,
            }))
        }

        Command::Schema => to_json(client.schema().await?),
        Command::Domain => to_json(client.domain().await?),
        Command::Entities { name: None } => to_json(client.entities().await?),
        Command::Entities { name: Some(name) } => to_json(client.entity(&name).await?),
        Command::Enums { name: None } => to_json(client.enums().await?),
        Command::Enums { name: Some(name) } => to_json(client.enumeration(&name).await?),
        Command::Mappings { name: None, .. } => to_json(client.mappings().await?),
        Command::Mappings {
            name: Some(name),
            entity: None,
        } => to_json(client.mapping(&name).await?),
        Command::Mappings {
            name: Some(name),
            entity: Some(entity),
        } => to_json(client.entity_mapping(&name, &entity).await?),
        Command::Sources { name: None } => to_json(client.sources().await?),
        Command::Sources { name: Some(name) } => to_json(client.source(&name).await?),
        Command::Stages { name: None } => to_json(client.stages().await?),
        Command::Stages { name: Some(name) } => to_json(client.stage(&name).await?),
        Command::Views => to_json(client.views().await?),

        Command::StageExists { name } => to_json(client.stage_exists(&name).await?),
        Command::StageExport { name } => to_json(client.export_stage(&name).await?),
        Command::StageImport { name, file } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let data = SchemaConfig::decode_str(&text)
                .with_context(|| format!("{} is not a stage export", file.display()))?;
            client.import_stage(&name, &data).await?;
            Ok(json!({"imported": data.entities.len()}))
        }

        Command::Parameters { expression } => to_json(client.parameters(&expression).await?),
        Command::Model { expression } => to_json(client.model(&expression).await?),
        Command::Constraints { expression } => to_json(client.constraints(&expression).await?),
        Command::Metadata { expression } => to_json(client.metadata(&expression).await?),
        Command::Plan {
            expression,
            options,
        } => to_json(client.plan(&expression, &options.into()).await?),
        Command::Execute {
            expression,
            data,
            options,
        } => {
            let data = parse_data(&data)?;
            Ok(client.execute(&expression, &data, &options.into()).await?)
        }
        Command::ExecuteQueued {
            expression,
            topic,
            data,
            options,
        } => {
            let data = parse_data(&data)?;
            Ok(client
                .execute_queued(&expression, &topic, &data, &options.into())
                .await?)
        }
    }
}
