//! Outbound HTTP clients: the chat-completion gateway and the form-intake
//! client for the booking wizard.

pub mod form;
pub mod openai;

pub use form::FormClient;
pub use openai::OpenAiGateway;
