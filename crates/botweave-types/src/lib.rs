//! Shared domain types for Botweave.

pub mod booking;
pub mod bot;
pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod memory;
