//! HTTP request handlers for the REST API.

pub mod booking;
pub mod bot;
pub mod chat;
pub mod ledger;
pub mod memory;
pub mod usage;
