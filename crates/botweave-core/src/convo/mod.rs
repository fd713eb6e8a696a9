//! Conversation orchestration: the repository trait and the controller
//! that wires quota, intent, context composition, and the gateway into a
//! single turn.

pub mod controller;
pub mod repository;

pub use controller::{
    BLOCKED_MESSAGE, ConversationController, FALLBACK_MESSAGE, Turn, TurnKind,
};
pub use repository::ConversationRepository;
