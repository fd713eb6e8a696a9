//! Intent classification for inbound user messages.
//!
//! A pure function over the raw text, deliberately decoupled from the
//! controller's side effects so the rules can be unit-tested without
//! mocking network or storage.

use std::sync::LazyLock;

use regex::Regex;

use botweave_types::ledger::TransactionKind;

/// Matches bookkeeping commands like `log $42.50 expense to Acme` or
/// `record 12 income from MegaCorp`. Amount is required; the kind defaults
/// to expense when omitted.
static BOOKKEEPING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:log|record)\s+\$?(\d+(?:\.\d{1,2})?)\s*(expense|income)?\s*(?:to|from)?\s+(\w+)")
        .expect("bookkeeping regex is valid")
});

/// What the user appears to be asking for.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// A bookkeeping command: validate the vendor and record the entry
    /// without a model round-trip.
    Bookkeeping {
        kind: TransactionKind,
        amount: f64,
        vendor: String,
    },
    /// Trigger words for the appointment wizard ("book", "appointment").
    BookingTrigger,
    /// Anything else: a normal model turn.
    Chat,
}

/// Classify a user message. Bookkeeping commands win over booking triggers.
pub fn classify_intent(text: &str) -> Intent {
    if let Some(caps) = BOOKKEEPING.captures(text) {
        // Amount group only admits digits and an optional 2-place decimal,
        // so the parse cannot fail on a match.
        if let Ok(amount) = caps[1].parse::<f64>() {
            let kind = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<TransactionKind>().ok())
                .unwrap_or(TransactionKind::Expense);
            return Intent::Bookkeeping {
                kind,
                amount,
                vendor: caps[3].to_string(),
            };
        }
    }

    let normalized = text.to_lowercase();
    if normalized.contains("book") || normalized.contains("appointment") {
        return Intent::BookingTrigger;
    }

    Intent::Chat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_expense_with_vendor() {
        let intent = classify_intent("log $42.50 expense to Acme");
        assert_eq!(
            intent,
            Intent::Bookkeeping {
                kind: TransactionKind::Expense,
                amount: 42.50,
                vendor: "Acme".to_string(),
            }
        );
    }

    #[test]
    fn test_record_income_from_vendor() {
        let intent = classify_intent("record 1200 income from MegaCorp");
        assert_eq!(
            intent,
            Intent::Bookkeeping {
                kind: TransactionKind::Income,
                amount: 1200.0,
                vendor: "MegaCorp".to_string(),
            }
        );
    }

    #[test]
    fn test_kind_defaults_to_expense() {
        let intent = classify_intent("log $9.99 to Staples");
        assert!(matches!(
            intent,
            Intent::Bookkeeping {
                kind: TransactionKind::Expense,
                ..
            }
        ));
    }

    #[test]
    fn test_case_insensitive() {
        let intent = classify_intent("LOG $5 EXPENSE TO acme");
        assert!(matches!(intent, Intent::Bookkeeping { .. }));
    }

    #[test]
    fn test_amount_without_vendor_is_chat() {
        assert_eq!(classify_intent("log $42.50"), Intent::Chat);
    }

    #[test]
    fn test_booking_trigger_words() {
        assert_eq!(classify_intent("I'd like to book something"), Intent::BookingTrigger);
        assert_eq!(classify_intent("Can I get an appointment?"), Intent::BookingTrigger);
    }

    #[test]
    fn test_plain_question_is_chat() {
        assert_eq!(classify_intent("What are your opening hours?"), Intent::Chat);
    }

    #[test]
    fn test_bookkeeping_wins_over_booking_words() {
        // "bookkeeping" contains "book"; the ledger command takes priority.
        let intent = classify_intent("log $10 expense to Bookstore");
        assert!(matches!(intent, Intent::Bookkeeping { .. }));
    }
}
