//! Business logic for Botweave: quota tracking, context composition,
//! intent classification, the bookkeeping shortcut, the booking wizard,
//! and the conversation controller.
//!
//! This crate defines the repository and gateway traits; concrete
//! implementations live in botweave-infra (clean architecture: core never
//! depends on infra).

pub mod booking;
pub mod bookkeeping;
pub mod context;
pub mod convo;
pub mod gateway;
pub mod intent;
pub mod memory;
pub mod quota;
pub mod repository;
