// SPDX-License-Identifier: PMPL-1.0-or-later

//! # λORM Client SDK
//!
//! An async Rust client for the λORM query service: schema introspection,
//! expression analysis and planning, query execution and stage management,
//! returning the typed records of [`lambdaorm_domain`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lambdaorm_client::{OrmClient, QueryOptions};
//!
//! #[tokio::main]
//! async fn main() -> lambdaorm_client::Result<()> {
//!     let client = OrmClient::new("http://localhost:9291")?;
//!     let plan = client
//!         .plan("Orders.filter(p => p.id == 1)", &QueryOptions::stage("default"))
//!         .await?;
//!     println!("{}", plan.sentence);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`client`]: connection configuration and HTTP transport.
//! - [`general`]: version, ping, health and metrics.
//! - [`schema`]: domain, mappings, sources, stages and views.
//! - [`expression`]: introspection, planning and execution of expressions.
//! - [`stage`]: existence checks, export and import of stage data.
//! - [`error`]: error types and the crate-level `Result` alias.

pub mod client;
pub mod error;
pub mod expression;
pub mod general;
pub mod schema;
pub mod stage;

pub use client::{ClientConfig, OrmClient};
pub use error::{OrmError, Result};
pub use lambdaorm_domain::{Format, MethodOptions, QueryOptions};
