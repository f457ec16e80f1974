//! HTTP handlers: thin adapters from the axum surface to the workflow.

pub mod accounts;
