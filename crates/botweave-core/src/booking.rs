//! Appointment-booking wizard.
//!
//! A per-session state machine that collects name, contact, and time over
//! sequential turns, then posts the completed form to an external intake
//! endpoint. The wizard never touches the model gateway or the credit
//! counter; its transcript lives only for the session.

use tracing::warn;

use botweave_types::booking::{BookingForm, BookingRequest, BookingStage};
use botweave_types::gateway::GatewayError;

use crate::intent::{Intent, classify_intent};

pub const ASK_NAME: &str = "Great! What's your name?";
pub const ASK_CONTACT: &str = "Got it. What's your phone number or email?";
pub const ASK_TIME: &str = "And what time works best for you?";
pub const SUBMIT_OK: &str = "Thanks! Your appointment request has been sent.";
pub const SUBMIT_FAILED: &str = "Something went wrong while sending the request.";
pub const IDLE_HINT: &str = "I'm here to help with appointments. Just say 'book' to begin.";

/// External form-intake boundary (e.g., a hosted form endpoint).
///
/// Implementations live in botweave-infra.
pub trait FormIntake: Send + Sync {
    fn submit(
        &self,
        request: &BookingRequest,
    ) -> impl std::future::Future<Output = Result<(), GatewayError>> + Send;
}

/// One booking session's wizard state.
#[derive(Debug, Clone, Default)]
pub struct BookingFlow {
    stage: BookingStage,
    form: BookingForm,
}

impl BookingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> BookingStage {
        self.stage
    }

    /// Advance the wizard by one user turn and return the bot's reply.
    ///
    /// Whatever the user types is accepted verbatim as the answer to the
    /// pending question; the only validation is non-empty input, which the
    /// caller filters before reaching here. On submission failure the
    /// collected fields are kept and the stage stays at `Time` so the user
    /// can retry by restating a time.
    pub async fn advance<F: FormIntake>(&mut self, input: &str, intake: &F) -> String {
        match self.stage {
            BookingStage::Idle => self.start_if_triggered(input),
            BookingStage::Name => {
                self.form.name = input.trim().to_string();
                self.stage = BookingStage::Contact;
                ASK_CONTACT.to_string()
            }
            BookingStage::Contact => {
                self.form.contact = input.trim().to_string();
                self.stage = BookingStage::Time;
                ASK_TIME.to_string()
            }
            BookingStage::Time => {
                self.form.time = input.trim().to_string();
                let request = BookingRequest::from_form(&self.form);
                match intake.submit(&request).await {
                    Ok(()) => {
                        self.stage = BookingStage::Done;
                        self.form = BookingForm::default();
                        SUBMIT_OK.to_string()
                    }
                    Err(err) => {
                        warn!(error = %err, "booking form submission failed");
                        SUBMIT_FAILED.to_string()
                    }
                }
            }
            BookingStage::Done => {
                // A finished session can start over with a fresh trigger.
                self.stage = BookingStage::Idle;
                self.start_if_triggered(input)
            }
        }
    }

    fn start_if_triggered(&mut self, input: &str) -> String {
        if matches!(classify_intent(input), Intent::BookingTrigger) {
            self.stage = BookingStage::Name;
            ASK_NAME.to_string()
        } else {
            IDLE_HINT.to_string()
        }
    }
}
