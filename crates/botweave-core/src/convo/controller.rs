//! The conversation controller: one entry point per user turn.
//!
//! `submit` is infallible by design. Storage failures are logged and the
//! turn continues with what is in hand; gateway failures are replaced by a
//! fixed fallback notice. The widget never sees an error type, only a
//! transcript to render.

use tracing::warn;

use botweave_types::bot::BotConfig;
use botweave_types::chat::{Message, today};
use botweave_types::gateway::GatewayError;
use botweave_types::ledger::Transaction;
use botweave_types::memory::BotMemory;

use crate::bookkeeping::{TransactionRepository, validate_transaction, validation_message};
use crate::context::ContextComposer;
use crate::convo::repository::ConversationRepository;
use crate::gateway::CompletionGateway;
use crate::intent::{Intent, classify_intent};
use crate::quota::{CounterStore, MAX_CREDITS, QuotaTracker};

/// Upsell notice appended once the advisory credit counter hits zero.
pub const BLOCKED_MESSAGE: &str =
    "⚠️ You've used all 10 free messages. For unlimited use, contact the site owner.";

/// Fixed user-facing stand-in for any gateway failure.
pub const FALLBACK_MESSAGE: &str = "⚠️ API error. Try again later.";

/// Notice shown when the bot's server-side daily limit is exhausted.
pub const LIMIT_MESSAGE: &str =
    "⚠️ This bot has reached its daily usage limit. Please try again tomorrow.";

/// Instruction payload for transcript summarization.
const SUMMARY_PROMPT: &str = "Summarize this conversation between a visitor \
    and the assistant in a few sentences. Note what the visitor wanted and \
    any requests that still need follow-up.";

/// What kind of turn `submit` produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    /// Normal model reply.
    Reply,
    /// Gateway failed; the fallback notice was appended instead.
    Fallback,
    /// Advisory credits exhausted; only the upsell notice was appended.
    Blocked,
    /// Server-side daily usage limit reached.
    LimitReached,
    /// Bookkeeping command handled locally, no model round-trip.
    Bookkeeping,
    /// Empty input; nothing changed.
    Ignored,
}

/// Result of one turn: the kind plus the full transcript to render.
#[derive(Debug, Clone)]
pub struct Turn {
    pub kind: TurnKind,
    pub transcript: Vec<Message>,
}

/// Orchestrates one conversation turn end to end.
pub struct ConversationController<S, R, G, T>
where
    S: CounterStore,
    R: ConversationRepository,
    G: CompletionGateway,
    T: TransactionRepository,
{
    quota: QuotaTracker<S>,
    repo: R,
    gateway: G,
    ledger: T,
}

impl<S, R, G, T> ConversationController<S, R, G, T>
where
    S: CounterStore,
    R: ConversationRepository,
    G: CompletionGateway,
    T: TransactionRepository,
{
    pub fn new(counters: S, repo: R, gateway: G, ledger: T) -> Self {
        Self {
            quota: QuotaTracker::new(counters),
            repo,
            gateway,
            ledger,
        }
    }

    /// Process one user turn against a bot.
    ///
    /// Order of checks: empty input, advisory credits, daily usage limit,
    /// bookkeeping shortcut, then the model round-trip. A credit is burned
    /// before the gateway call; the daily counter is bumped only after a
    /// successful reply.
    pub async fn submit(
        &self,
        config: &BotConfig,
        memory: Option<&BotMemory>,
        input: &str,
    ) -> Turn {
        let input = input.trim();
        if input.is_empty() {
            return Turn {
                kind: TurnKind::Ignored,
                transcript: Vec::new(),
            };
        }

        let mut transcript = self.load_transcript(config).await;

        if self.remaining_credits(config).await <= 0 {
            transcript.push(Message::assistant(BLOCKED_MESSAGE));
            self.persist(config, &transcript).await;
            return Turn {
                kind: TurnKind::Blocked,
                transcript,
            };
        }

        if self.daily_usage(config).await >= i64::from(config.usage_limit) {
            transcript.push(Message::assistant(LIMIT_MESSAGE));
            self.persist(config, &transcript).await;
            return Turn {
                kind: TurnKind::LimitReached,
                transcript,
            };
        }

        if let Intent::Bookkeeping {
            kind,
            amount,
            vendor,
        } = classify_intent(input)
        {
            if let Some(memory) = memory {
                return self
                    .bookkeeping_turn(config, memory, transcript, input, kind, amount, &vendor)
                    .await;
            }
        }

        // Burn a credit up front; a failed gateway call still costs one.
        if let Err(err) = self.quota.consume_one(&config.owner, &config.key).await {
            warn!(error = %err, bot = %config.key, "failed to burn credit");
        }

        transcript.push(Message::user(input));

        let composed = ContextComposer::compose(&config.prompt, memory, &transcript);
        match self.gateway.complete(&composed.system, &composed.window).await {
            Ok(reply) => {
                transcript.push(Message::assistant(reply));
                self.persist(config, &transcript).await;
                if let Err(err) = self
                    .repo
                    .bump_usage(&config.owner, &config.key, &today())
                    .await
                {
                    warn!(error = %err, bot = %config.key, "failed to bump daily usage");
                }
                Turn {
                    kind: TurnKind::Reply,
                    transcript,
                }
            }
            Err(err) => {
                warn!(error = %err, bot = %config.key, "completion request failed");
                transcript.push(Message::assistant(FALLBACK_MESSAGE));
                self.persist(config, &transcript).await;
                Turn {
                    kind: TurnKind::Fallback,
                    transcript,
                }
            }
        }
    }

    /// Delete the transcript, leaving usage counters and credits intact.
    pub async fn clear(&self, config: &BotConfig) -> Result<(), botweave_types::error::RepositoryError> {
        self.repo.clear(&config.owner, &config.key).await
    }

    /// Remaining advisory credits for a bot.
    pub async fn credits(&self, config: &BotConfig) -> i64 {
        self.remaining_credits(config).await
    }

    /// Summarize the persisted transcript through the completion gateway.
    ///
    /// Read-only and unmetered: no credit burn, no usage bump, nothing
    /// persisted. The full transcript travels upstream (no history window);
    /// `None` when the pair has no conversation to summarize. This is an
    /// owner-facing read, so gateway failures propagate instead of being
    /// folded into a fallback notice.
    pub async fn summarize(&self, config: &BotConfig) -> Result<Option<String>, GatewayError> {
        let transcript = self.load_transcript(config).await;
        if transcript.is_empty() {
            return Ok(None);
        }
        let summary = self.gateway.complete(SUMMARY_PROMPT, &transcript).await?;
        Ok(Some(summary))
    }

    #[allow(clippy::too_many_arguments)]
    async fn bookkeeping_turn(
        &self,
        config: &BotConfig,
        memory: &BotMemory,
        mut transcript: Vec<Message>,
        input: &str,
        kind: botweave_types::ledger::TransactionKind,
        amount: f64,
        vendor: &str,
    ) -> Turn {
        let result = validate_transaction(vendor, memory);

        let transaction = Transaction::new(kind, amount, input, result.category.clone());
        if let Err(err) = self
            .ledger
            .record(&config.owner, &config.key, &transaction)
            .await
        {
            warn!(error = %err, bot = %config.key, "failed to record ledger entry");
        }

        transcript.push(Message::user(input));
        transcript.push(Message::assistant(validation_message(&result)));
        self.persist(config, &transcript).await;

        Turn {
            kind: TurnKind::Bookkeeping,
            transcript,
        }
    }

    async fn load_transcript(&self, config: &BotConfig) -> Vec<Message> {
        match self.repo.load(&config.owner, &config.key).await {
            Ok(messages) => messages.unwrap_or_default(),
            Err(err) => {
                warn!(error = %err, bot = %config.key, "failed to load transcript");
                Vec::new()
            }
        }
    }

    async fn remaining_credits(&self, config: &BotConfig) -> i64 {
        match self.quota.remaining(&config.owner, &config.key).await {
            Ok(remaining) => remaining,
            Err(err) => {
                // Fail open: metering is advisory, a broken counter must not
                // take the widget down.
                warn!(error = %err, bot = %config.key, "failed to read credits");
                MAX_CREDITS
            }
        }
    }

    async fn daily_usage(&self, config: &BotConfig) -> i64 {
        match self
            .repo
            .load_usage(&config.owner, &config.key, &today())
            .await
        {
            Ok(count) => count,
            Err(err) => {
                warn!(error = %err, bot = %config.key, "failed to read daily usage");
                0
            }
        }
    }

    async fn persist(&self, config: &BotConfig, transcript: &[Message]) {
        if let Err(err) = self
            .repo
            .save(&config.owner, &config.key, transcript)
            .await
        {
            warn!(error = %err, bot = %config.key, "failed to persist transcript");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;

    use botweave_types::bot::{BotKey, OwnerId};
    use botweave_types::error::RepositoryError;
    use botweave_types::gateway::GatewayError;
    use botweave_types::ledger::TransactionKind;
    use botweave_types::memory::VendorDefault;

    // ---------------------------------------------------------------- mocks

    #[derive(Default)]
    struct MemCounters {
        values: Mutex<HashMap<String, i64>>,
    }

    impl CounterStore for &MemCounters {
        async fn get(&self, owner: &OwnerId, key: &str) -> Result<Option<i64>, RepositoryError> {
            Ok(self
                .values
                .lock()
                .unwrap()
                .get(&format!("{owner}/{key}"))
                .copied())
        }

        async fn set(
            &self,
            owner: &OwnerId,
            key: &str,
            value: i64,
        ) -> Result<(), RepositoryError> {
            self.values
                .lock()
                .unwrap()
                .insert(format!("{owner}/{key}"), value);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MemRepo {
        transcripts: Mutex<HashMap<String, Vec<Message>>>,
        usage: Mutex<HashMap<String, i64>>,
        fail_loads: bool,
    }

    impl ConversationRepository for &MemRepo {
        async fn load(
            &self,
            owner: &OwnerId,
            bot: &BotKey,
        ) -> Result<Option<Vec<Message>>, RepositoryError> {
            if self.fail_loads {
                return Err(RepositoryError::Connection);
            }
            Ok(self
                .transcripts
                .lock()
                .unwrap()
                .get(&format!("{owner}/{bot}"))
                .cloned())
        }

        async fn save(
            &self,
            owner: &OwnerId,
            bot: &BotKey,
            messages: &[Message],
        ) -> Result<(), RepositoryError> {
            self.transcripts
                .lock()
                .unwrap()
                .insert(format!("{owner}/{bot}"), messages.to_vec());
            Ok(())
        }

        async fn clear(&self, owner: &OwnerId, bot: &BotKey) -> Result<(), RepositoryError> {
            self.transcripts
                .lock()
                .unwrap()
                .remove(&format!("{owner}/{bot}"));
            Ok(())
        }

        async fn load_usage(
            &self,
            owner: &OwnerId,
            bot: &BotKey,
            day: &str,
        ) -> Result<i64, RepositoryError> {
            Ok(self
                .usage
                .lock()
                .unwrap()
                .get(&format!("{owner}/{bot}/{day}"))
                .copied()
                .unwrap_or(0))
        }

        async fn bump_usage(
            &self,
            owner: &OwnerId,
            bot: &BotKey,
            day: &str,
        ) -> Result<i64, RepositoryError> {
            let mut usage = self.usage.lock().unwrap();
            let count = usage.entry(format!("{owner}/{bot}/{day}")).or_insert(0);
            *count += 1;
            Ok(*count)
        }
    }

    struct ScriptedGateway {
        reply: Result<String, ()>,
        calls: AtomicUsize,
        last_request: Mutex<Option<(String, usize)>>,
    }

    impl ScriptedGateway {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// System payload and message count of the most recent request.
        fn last_request(&self) -> Option<(String, usize)> {
            self.last_request.lock().unwrap().clone()
        }
    }

    impl CompletionGateway for &ScriptedGateway {
        async fn complete(
            &self,
            system: &str,
            recent: &[Message],
        ) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some((system.to_string(), recent.len()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(GatewayError::Status { status: 500 }),
            }
        }
    }

    #[derive(Default)]
    struct MemLedger {
        entries: Mutex<Vec<Transaction>>,
    }

    impl TransactionRepository for &MemLedger {
        async fn record(
            &self,
            _owner: &OwnerId,
            _bot: &BotKey,
            transaction: &Transaction,
        ) -> Result<(), RepositoryError> {
            self.entries.lock().unwrap().push(transaction.clone());
            Ok(())
        }

        async fn list(
            &self,
            _owner: &OwnerId,
            _kind: Option<TransactionKind>,
        ) -> Result<Vec<Transaction>, RepositoryError> {
            Ok(self.entries.lock().unwrap().clone())
        }
    }

    // -------------------------------------------------------------- helpers

    fn config() -> BotConfig {
        BotConfig {
            owner: OwnerId::new("uid-1"),
            key: "business-bot".parse().unwrap(),
            name: "Business Bot".to_string(),
            prompt: "You are a business assistant.".to_string(),
            usage_limit: 50,
            embed_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn memory_with_acme() -> BotMemory {
        let mut memory = BotMemory::default();
        memory.chart_of_accounts.expenses = vec!["Office".to_string()];
        memory.vendor_defaults.insert(
            "Acme".to_string(),
            VendorDefault {
                category: "Expenses > Office".to_string(),
                auto_tag: true,
            },
        );
        memory
    }

    // ---------------------------------------------------------------- tests

    #[tokio::test]
    async fn test_successful_turn_replies_persists_and_bumps_usage() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::replying("Hello!");
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let turn = controller.submit(&config(), None, "hi there").await;

        assert_eq!(turn.kind, TurnKind::Reply);
        assert_eq!(turn.transcript.len(), 2);
        assert_eq!(turn.transcript[1].content, "Hello!");

        // Persisted and metered.
        let cfg = config();
        let stored = (&repo).load(&cfg.owner, &cfg.key).await.unwrap().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(
            (&repo).load_usage(&cfg.owner, &cfg.key, &today()).await.unwrap(),
            1
        );
        // One credit burned.
        assert_eq!(
            controller.credits(&cfg).await,
            MAX_CREDITS - 1
        );
    }

    #[tokio::test]
    async fn test_empty_input_is_ignored() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::replying("Hello!");
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let turn = controller.submit(&config(), None, "   ").await;

        assert_eq!(turn.kind, TurnKind::Ignored);
        assert!(turn.transcript.is_empty());
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(controller.credits(&config()).await, MAX_CREDITS);
    }

    #[tokio::test]
    async fn test_blocked_when_credits_exhausted() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::replying("Hello!");
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let cfg = config();
        for _ in 0..MAX_CREDITS {
            controller.submit(&cfg, None, "hi").await;
        }
        assert_eq!(controller.credits(&cfg).await, 0);

        let turn = controller.submit(&cfg, None, "one more").await;

        assert_eq!(turn.kind, TurnKind::Blocked);
        // Only the upsell notice was appended -- no user message, no model
        // call, no further credit burn.
        let last = turn.transcript.last().unwrap();
        assert_eq!(last.content, BLOCKED_MESSAGE);
        assert_eq!(turn.transcript.len(), (MAX_CREDITS as usize) * 2 + 1);
        assert_eq!(gateway.call_count(), MAX_CREDITS as usize);
        assert_eq!(controller.credits(&cfg).await, 0);

        // The notice is persisted so a reload still shows it.
        let stored = (&repo).load(&cfg.owner, &cfg.key).await.unwrap().unwrap();
        assert_eq!(stored.last().unwrap().content, BLOCKED_MESSAGE);
    }

    #[tokio::test]
    async fn test_limit_reached_when_daily_usage_exhausted() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::replying("Hello!");
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let mut cfg = config();
        cfg.usage_limit = 2;
        for _ in 0..2 {
            (&repo).bump_usage(&cfg.owner, &cfg.key, &today()).await.unwrap();
        }

        let turn = controller.submit(&cfg, None, "hello").await;

        assert_eq!(turn.kind, TurnKind::LimitReached);
        assert_eq!(turn.transcript.last().unwrap().content, LIMIT_MESSAGE);
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(controller.credits(&cfg).await, MAX_CREDITS);
    }

    #[tokio::test]
    async fn test_gateway_failure_appends_fallback_without_usage_bump() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::failing();
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let cfg = config();
        let turn = controller.submit(&cfg, None, "hi").await;

        assert_eq!(turn.kind, TurnKind::Fallback);
        assert_eq!(turn.transcript.len(), 2);
        assert_eq!(turn.transcript[1].content, FALLBACK_MESSAGE);
        // Usage is only metered on success, but the credit is already gone.
        assert_eq!(
            (&repo).load_usage(&cfg.owner, &cfg.key, &today()).await.unwrap(),
            0
        );
        assert_eq!(controller.credits(&cfg).await, MAX_CREDITS - 1);
        // The fallback turn is persisted like any other.
        let stored = (&repo).load(&cfg.owner, &cfg.key).await.unwrap().unwrap();
        assert_eq!(stored.last().unwrap().content, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_bookkeeping_shortcut_skips_gateway_and_credits() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::replying("Hello!");
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let cfg = config();
        let memory = memory_with_acme();
        let turn = controller
            .submit(&cfg, Some(&memory), "log $42.50 expense to Acme")
            .await;

        assert_eq!(turn.kind, TurnKind::Bookkeeping);
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(controller.credits(&cfg).await, MAX_CREDITS);
        assert_eq!(
            (&repo).load_usage(&cfg.owner, &cfg.key, &today()).await.unwrap(),
            0
        );

        // Ledger got the entry with the resolved category.
        let entries = ledger.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, 42.50);
        assert_eq!(entries[0].kind, TransactionKind::Expense);
        assert_eq!(entries[0].category.as_deref(), Some("Expenses > Office"));

        // Transcript carries the command and the auto-tag confirmation.
        assert_eq!(turn.transcript.len(), 2);
        assert!(turn.transcript[1].content.contains("Office"));
    }

    #[tokio::test]
    async fn test_bookkeeping_unknown_vendor_reports_issue() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::replying("Hello!");
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let turn = controller
            .submit(&config(), Some(&memory_with_acme()), "log $5 expense to Globex")
            .await;

        assert_eq!(turn.kind, TurnKind::Bookkeeping);
        assert!(turn.transcript[1].content.contains("Globex"));
        assert!(turn.transcript[1].content.contains("Issues"));
        // Entry is still recorded, uncategorized.
        let entries = ledger.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].category.is_none());
    }

    #[tokio::test]
    async fn test_bookkeeping_without_memory_falls_through_to_chat() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::replying("Sure thing");
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let turn = controller
            .submit(&config(), None, "log $5 expense to Globex")
            .await;

        assert_eq!(turn.kind, TurnKind::Reply);
        assert_eq!(gateway.call_count(), 1);
        assert!(ledger.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transcript_accumulates_across_turns() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::replying("reply");
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let cfg = config();
        controller.submit(&cfg, None, "first").await;
        let turn = controller.submit(&cfg, None, "second").await;

        let contents: Vec<&str> = turn
            .transcript
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, ["first", "reply", "second", "reply"]);
    }

    #[tokio::test]
    async fn test_load_failure_degrades_to_empty_transcript() {
        let counters = MemCounters::default();
        let repo = MemRepo {
            fail_loads: true,
            ..Default::default()
        };
        let gateway = ScriptedGateway::replying("reply");
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let turn = controller.submit(&config(), None, "hi").await;

        assert_eq!(turn.kind, TurnKind::Reply);
        assert_eq!(turn.transcript.len(), 2);
    }

    #[tokio::test]
    async fn test_summarize_sends_whole_transcript_unmetered() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::replying("reply");
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let cfg = config();
        // Eight user turns put the transcript past the history window.
        for i in 0..8 {
            controller.submit(&cfg, None, &format!("m{i}")).await;
        }
        let credits_before = controller.credits(&cfg).await;
        let usage_before = (&repo)
            .load_usage(&cfg.owner, &cfg.key, &today())
            .await
            .unwrap();

        let summary = controller.summarize(&cfg).await.unwrap();
        assert_eq!(summary.as_deref(), Some("reply"));

        // All 16 messages travel upstream, not the 6-turn window.
        let (system, sent) = gateway.last_request().unwrap();
        assert!(system.contains("Summarize"));
        assert_eq!(sent, 16);

        // Read-only: no credit burn, no usage bump.
        assert_eq!(controller.credits(&cfg).await, credits_before);
        assert_eq!(
            (&repo).load_usage(&cfg.owner, &cfg.key, &today()).await.unwrap(),
            usage_before
        );
    }

    #[tokio::test]
    async fn test_summarize_empty_transcript_is_none() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::replying("reply");
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let summary = controller.summarize(&config()).await.unwrap();
        assert!(summary.is_none());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_summarize_gateway_failure_propagates() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::failing();
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let cfg = config();
        (&repo)
            .save(&cfg.owner, &cfg.key, &[Message::user("hi")])
            .await
            .unwrap();

        let err = controller.summarize(&cfg).await.unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 500 }));
    }

    #[tokio::test]
    async fn test_clear_removes_transcript_keeps_counters() {
        let counters = MemCounters::default();
        let repo = MemRepo::default();
        let gateway = ScriptedGateway::replying("reply");
        let ledger = MemLedger::default();
        let controller = ConversationController::new(&counters, &repo, &gateway, &ledger);

        let cfg = config();
        controller.submit(&cfg, None, "hi").await;
        controller.clear(&cfg).await.unwrap();

        assert!((&repo).load(&cfg.owner, &cfg.key).await.unwrap().is_none());
        assert_eq!(controller.credits(&cfg).await, MAX_CREDITS - 1);
        assert_eq!(
            (&repo).load_usage(&cfg.owner, &cfg.key, &today()).await.unwrap(),
            1
        );
    }
}
