//! Infrastructure layer for Botweave.
//!
//! Contains implementations of the repository and gateway traits defined in
//! `botweave-core`: SQLite storage with split read/write pools, the
//! OpenAI-compatible completion gateway, and the form-intake client.

pub mod config;
pub mod gateway;
pub mod sqlite;
