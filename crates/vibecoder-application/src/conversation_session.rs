//! Conversation session: one AI exchange at a time for a profile.
//!
//! The session appends the user's message, sends it to the AI transport with
//! a snapshot of the editor state, stages the reply and auto-applies any
//! operations it carries through the [`SectionEditor`]. It never mutates
//! sections any other way.

use crate::asset_fulfiller::{AssetRequestFulfiller, DrainReport};
use crate::section_sync::sync_sections;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use vibecoder_core::catalog::SectionCatalog;
use vibecoder_core::config::SessionConfig;
use vibecoder_core::conversation::{
    BrandProfile, ChatMessage, ConversationLogRepository, ConversationRecord, MessageFeedback,
    MessageRole, MessageStatus, PageCursor, TransportError, VibeContext, VibeRequest,
    VibeResponse, VibeTransport,
};
use vibecoder_core::editor::SectionEditor;
use vibecoder_core::operation::{ApplySideEffects, NoSideEffects, Operation};
use vibecoder_core::section::SectionRepository;
use vibecoder_core::{Result, VibeError};

/// Callback type for user-facing failure notices (toasts).
pub type NoticeCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Where the current (or last) exchange stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Sending,
    /// A pending reply carries operations not yet applied
    AwaitingOps,
    Applying,
    Applied,
    Error,
}

/// Result of applying the pending reply's operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied,
    /// The identical batch was applied before; nothing changed
    Duplicate,
    /// Validation rejected the batch; the reply stays pending
    Rejected(String),
    /// The batch failed while applying; the reply stays pending
    Failed(String),
    NothingToApply,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Another exchange was in flight
    Dropped,
    /// The transport failed; an error reply was appended
    Failed(TransportError),
    Replied {
        message_id: String,
        apply: Option<ApplyOutcome>,
    },
}

struct TranscriptState {
    messages: Vec<ChatMessage>,
    applied_batches: HashSet<String>,
    exchange: ExchangeState,
    /// Oldest persisted record known to this session
    oldest_cursor: Option<PageCursor>,
    history_exhausted: bool,
}

impl TranscriptState {
    fn new() -> Self {
        Self {
            messages: Vec::new(),
            applied_batches: HashSet::new(),
            exchange: ExchangeState::Idle,
            oldest_cursor: None,
            history_exhausted: false,
        }
    }

    fn pending_index(&self) -> Option<usize> {
        self.messages.iter().rposition(ChatMessage::is_pending)
    }

    fn set_status(&mut self, message_id: &str, status: MessageStatus) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == message_id) {
            message.status = status;
        }
    }
}

/// Resets the in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Orchestrates the exchange between the user, the AI and the editor.
///
/// # Thread Safety
///
/// State lives behind `tokio` locks; a single `AtomicBool` guard ensures at
/// most one exchange (send, regenerate or retry) runs at a time.
pub struct ConversationSession {
    profile_id: String,
    config: SessionConfig,
    catalog: Arc<SectionCatalog>,
    editor: Arc<Mutex<SectionEditor>>,
    transport: Arc<dyn VibeTransport>,
    log: Arc<dyn ConversationLogRepository>,
    fulfiller: Arc<AssetRequestFulfiller>,
    section_repository: RwLock<Option<Arc<dyn SectionRepository>>>,
    side_effects: RwLock<Arc<dyn ApplySideEffects>>,
    brand_profile: RwLock<Option<BrandProfile>>,
    notice_callback: RwLock<Option<NoticeCallback>>,
    state: Mutex<TranscriptState>,
    in_flight: AtomicBool,
}

impl ConversationSession {
    pub fn new(
        profile_id: impl Into<String>,
        config: SessionConfig,
        catalog: Arc<SectionCatalog>,
        editor: Arc<Mutex<SectionEditor>>,
        transport: Arc<dyn VibeTransport>,
        log: Arc<dyn ConversationLogRepository>,
        fulfiller: Arc<AssetRequestFulfiller>,
    ) -> Self {
        Self {
            profile_id: profile_id.into(),
            config,
            catalog,
            editor,
            transport,
            log,
            fulfiller,
            section_repository: RwLock::new(None),
            side_effects: RwLock::new(Arc::new(NoSideEffects)),
            brand_profile: RwLock::new(None),
            notice_callback: RwLock::new(None),
            state: Mutex::new(TranscriptState::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Sets the store that committed sections are synced to.
    pub async fn set_section_repository(&self, repository: Arc<dyn SectionRepository>) {
        *self.section_repository.write().await = Some(repository);
    }

    /// Sets the receiver of theme, header and slot changes.
    pub async fn set_side_effects(&self, effects: Arc<dyn ApplySideEffects>) {
        *self.side_effects.write().await = effects;
    }

    pub async fn set_brand_profile(&self, brand_profile: Option<BrandProfile>) {
        *self.brand_profile.write().await = brand_profile;
    }

    /// Sets a callback invoked with a plain-language message on every failure.
    pub async fn set_notice_callback(&self, callback: NoticeCallback) {
        *self.notice_callback.write().await = Some(callback);
    }

    pub fn profile_id(&self) -> &str {
        &self.profile_id
    }

    pub fn editor(&self) -> Arc<Mutex<SectionEditor>> {
        Arc::clone(&self.editor)
    }

    pub fn fulfiller(&self) -> Arc<AssetRequestFulfiller> {
        Arc::clone(&self.fulfiller)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn exchange_state(&self) -> ExchangeState {
        self.state.lock().await.exchange
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.state.lock().await.messages.clone()
    }

    pub async fn pending_message(&self) -> Option<ChatMessage> {
        let state = self.state.lock().await;
        state.pending_index().map(|i| state.messages[i].clone())
    }

    /// Sends `text` to the AI. Dropped while another exchange is in flight.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!(target: "vibecoder::session", "Exchange in flight, message dropped");
            return SendOutcome::Dropped;
        };

        let user_message = ChatMessage::user(text);
        let history = {
            let mut state = self.state.lock().await;
            let history = state.messages.clone();
            state.messages.push(user_message.clone());
            history
        };
        self.persist(&user_message).await;

        self.exchange(text.to_string(), &history).await
    }

    /// Discards the pending reply, if any, and resends the last user text
    /// with the regenerate marker. Committed operations are not replayed.
    pub async fn regenerate(&self) -> SendOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            return SendOutcome::Dropped;
        };

        let (text, history) = {
            let mut state = self.state.lock().await;
            let Some(user_index) = state
                .messages
                .iter()
                .rposition(|m| m.role == MessageRole::User)
            else {
                return SendOutcome::Dropped;
            };
            if let Some(last) = state.messages.last_mut() {
                if last.is_assistant() && last.is_pending() {
                    last.status = MessageStatus::Discarded;
                }
            }
            (
                state.messages[user_index].content.clone(),
                state.messages[..user_index].to_vec(),
            )
        };

        tracing::info!(target: "vibecoder::session", profile_id = %self.profile_id, "Regenerating reply");
        let marked = format!("{text}{}", self.config.regenerate_marker);
        self.exchange(marked, &history).await
    }

    /// Re-attempts the pending reply's operations after a failure.
    pub async fn retry_pending(&self) -> ApplyOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            return ApplyOutcome::NothingToApply;
        };
        self.apply_pending().await
    }

    /// Applies the operations of the assistant reply `message_id`.
    ///
    /// Replaying a reply that already committed is reported as
    /// [`ApplyOutcome::Duplicate`] and changes nothing. Another reply that
    /// carries the same batch is applied normally.
    pub async fn apply_reply(&self, message_id: &str) -> ApplyOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            return ApplyOutcome::NothingToApply;
        };
        self.apply_message(Some(message_id)).await
    }

    /// Wipes the transcript and pending state; with `purge`, also deletes the
    /// persisted log of the profile.
    ///
    /// Refused while an exchange is in flight, so a late reply never lands
    /// in the wiped transcript.
    pub async fn clear(&self, purge: bool) -> Result<()> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            return Err(VibeError::application(
                "cannot clear the conversation while a reply is on its way",
            ));
        };
        *self.state.lock().await = TranscriptState::new();
        self.fulfiller.clear_pending().await;
        if purge {
            self.log.purge(&self.profile_id).await?;
        }
        tracing::info!(target: "vibecoder::session", profile_id = %self.profile_id, purge, "Cleared conversation");
        Ok(())
    }

    /// Replaces the transcript with the newest page of the persisted log.
    /// Returns the number of messages loaded.
    pub async fn load_history(&self) -> Result<usize> {
        {
            let mut state = self.state.lock().await;
            state.messages.clear();
            state.oldest_cursor = None;
            state.history_exhausted = false;
        }
        self.load_older().await
    }

    /// Prepends the page of messages older than the oldest one loaded.
    /// Returns 0 once the log is exhausted.
    pub async fn load_older(&self) -> Result<usize> {
        let cursor = {
            let state = self.state.lock().await;
            if state.history_exhausted {
                return Ok(0);
            }
            state.oldest_cursor.clone()
        };

        let page = self
            .log
            .page_before(&self.profile_id, cursor.as_ref(), self.config.page_size)
            .await?;

        let mut state = self.state.lock().await;
        if page.len() < self.config.page_size {
            state.history_exhausted = true;
        }
        if let Some(first) = page.first() {
            state.oldest_cursor = Some(first.cursor());
        }
        let loaded = page.len();
        let mut messages: Vec<ChatMessage> = page.iter().map(ChatMessage::from_record).collect();
        messages.append(&mut state.messages);
        state.messages = messages;
        Ok(loaded)
    }

    /// Records feedback on an assistant message.
    pub async fn set_feedback(&self, message_id: &str, feedback: MessageFeedback) -> Result<()> {
        let mut state = self.state.lock().await;
        let message = state
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| VibeError::not_found("message", message_id))?;
        if !message.is_assistant() {
            return Err(VibeError::application(
                "feedback can only be recorded on assistant replies",
            ));
        }
        message.feedback = Some(feedback);
        Ok(())
    }

    /// Drains the asset requests staged from replies.
    pub async fn fulfill_assets(&self) -> DrainReport {
        let report = self.fulfiller.drain(&self.profile_id).await;
        if !report.failed.is_empty() {
            self.notify(format!(
                "{} asset(s) could not be generated",
                report.failed.len()
            ))
            .await;
        }
        report
    }

    async fn exchange(&self, text: String, history: &[ChatMessage]) -> SendOutcome {
        self.state.lock().await.exchange = ExchangeState::Sending;

        let started = Instant::now();
        let result = match self.build_request(text, history).await {
            Ok(request) => self.call_transport(&request).await,
            Err(e) => Err(TransportError::Failed(e.to_string())),
        };
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(response) => self.receive(response, latency_ms).await,
            Err(error) => {
                tracing::warn!(
                    target: "vibecoder::session",
                    profile_id = %self.profile_id,
                    error = %error,
                    "AI transport failed"
                );
                let mut reply = ChatMessage::transport_failure(error.clone());
                reply.latency_ms = Some(latency_ms);
                {
                    let mut state = self.state.lock().await;
                    state.messages.push(reply.clone());
                    state.exchange = ExchangeState::Error;
                }
                self.persist(&reply).await;
                self.notify(error.user_message().to_string()).await;
                SendOutcome::Failed(error)
            }
        }
    }

    async fn build_request(&self, text: String, history: &[ChatMessage]) -> Result<VibeRequest> {
        let sections = self.editor.lock().await.sections().to_vec();
        let brand_profile = self.brand_profile.read().await.clone();
        let context = VibeContext::build(
            &sections,
            &self.catalog,
            brand_profile,
            history,
            self.config.history_context_turns,
        )?;
        Ok(VibeRequest {
            message: text,
            context,
            profile_id: self.profile_id.clone(),
        })
    }

    async fn call_transport(
        &self,
        request: &VibeRequest,
    ) -> std::result::Result<VibeResponse, TransportError> {
        match tokio::time::timeout(self.config.transport_timeout(), self.transport.send(request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                seconds: self.config.transport_timeout_secs,
            }),
        }
    }

    async fn receive(&self, response: VibeResponse, latency_ms: u64) -> SendOutcome {
        let mut reply = ChatMessage::assistant(
            response.message,
            response.ops,
            response.asset_requests,
        );
        reply.preview_notes = response.preview_notes;
        reply.latency_ms = Some(latency_ms);
        reply.credits_used = response.credits_used;
        let message_id = reply.id.clone();
        let has_ops = reply.is_pending();

        self.fulfiller.stage(&reply.asset_requests).await;
        {
            let mut state = self.state.lock().await;
            // At most one reply is pending at a time.
            for message in state.messages.iter_mut().filter(|m| m.is_pending()) {
                message.status = MessageStatus::Discarded;
            }
            state.messages.push(reply.clone());
            state.exchange = if has_ops {
                ExchangeState::AwaitingOps
            } else {
                ExchangeState::Applied
            };
        }
        self.persist(&reply).await;

        tracing::info!(
            target: "vibecoder::session",
            profile_id = %self.profile_id,
            operations = reply.operations.len(),
            asset_requests = reply.asset_requests.len(),
            latency_ms,
            "Received AI reply"
        );

        let apply = if has_ops {
            Some(self.apply_pending().await)
        } else {
            None
        };
        SendOutcome::Replied { message_id, apply }
    }

    async fn apply_pending(&self) -> ApplyOutcome {
        self.apply_message(None).await
    }

    /// Applies the reply `target`, or the pending reply when `target` is `None`.
    async fn apply_message(&self, target: Option<&str>) -> ApplyOutcome {
        let staged = {
            let mut state = self.state.lock().await;
            let index = match target {
                Some(id) => state
                    .messages
                    .iter()
                    .position(|m| m.id == id && m.is_assistant()),
                None => state.pending_index(),
            };
            let Some(index) = index else {
                return ApplyOutcome::NothingToApply;
            };
            let message = &state.messages[index];
            if message.operations.is_empty() || message.status == MessageStatus::Discarded {
                return ApplyOutcome::NothingToApply;
            }
            let message_id = message.id.clone();
            let ops = message.operations.clone();
            let already_applied = message.status == MessageStatus::Applied;
            let key = batch_key(&message_id, &ops);

            if already_applied || !state.applied_batches.insert(key.clone()) {
                state.set_status(&message_id, MessageStatus::Applied);
                state.exchange = ExchangeState::Applied;
                Err(message_id)
            } else {
                state.exchange = ExchangeState::Applying;
                Ok((message_id, ops, key))
            }
        };

        let (message_id, ops, key) = match staged {
            Ok(staged) => staged,
            Err(message_id) => {
                tracing::debug!(target: "vibecoder::session", message_id = %message_id, "Reply already applied, skipping");
                self.notify("These changes were already applied.".to_string())
                    .await;
                return ApplyOutcome::Duplicate;
            }
        };

        let effects = Arc::clone(&*self.side_effects.read().await);
        let committed = {
            let mut editor = self.editor.lock().await;
            let before = editor.list().clone();
            editor
                .commit(&ops, effects.as_ref())
                .map(|_| (before, editor.list().clone()))
        };

        match committed {
            Ok((before, after)) => {
                {
                    let mut state = self.state.lock().await;
                    state.set_status(&message_id, MessageStatus::Applied);
                    state.exchange = ExchangeState::Applied;
                }
                let repository = self.section_repository.read().await.clone();
                if let Some(repository) = repository {
                    let report = sync_sections(repository.as_ref(), &before, &after).await;
                    if !report.is_clean() {
                        self.notify("Your changes were applied but could not be saved yet.".to_string())
                            .await;
                    }
                }
                ApplyOutcome::Applied
            }
            Err(err) => {
                {
                    let mut state = self.state.lock().await;
                    state.applied_batches.remove(&key);
                    state.exchange = ExchangeState::Error;
                }
                let message = err.user_message();
                self.notify(message.clone()).await;
                if err.is_validation() {
                    ApplyOutcome::Rejected(message)
                } else {
                    tracing::warn!(target: "vibecoder::session", error = %err, "Validated batch failed to apply");
                    ApplyOutcome::Failed(message)
                }
            }
        }
    }

    async fn persist(&self, message: &ChatMessage) {
        let record = ConversationRecord::from_message(&self.profile_id, message);
        match self.log.append(record).await {
            Ok(stored) => {
                let mut state = self.state.lock().await;
                if state.oldest_cursor.is_none() {
                    state.oldest_cursor = Some(stored.cursor());
                }
            }
            Err(e) => {
                tracing::warn!(
                    target: "vibecoder::session",
                    message_id = %message.id,
                    error = %e,
                    "Failed to persist message"
                );
                self.notify("This message could not be saved to your history.".to_string())
                    .await;
            }
        }
    }

    async fn notify(&self, message: String) {
        let callback = self.notice_callback.read().await.clone();
        if let Some(callback) = callback {
            callback(message);
        }
    }
}

/// Dedup key of one reply's batch: a replay of the same reply collides,
/// another reply with an identical batch does not.
fn batch_key(message_id: &str, ops: &[Operation]) -> String {
    let ops = serde_json::to_string(ops).unwrap_or_else(|_| format!("{ops:?}"));
    format!("{message_id}:{ops}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use vibecoder_core::asset::{
        AssetGenerator, AssetRequest, GeneratedAssetRef, GenerationRequest, RequestedAssetKind,
    };
    use vibecoder_core::config::VibecoderConfig;
    use vibecoder_core::operation::{SectionDraft, SectionPatch};
    use vibecoder_core::section::SectionList;
    use vibecoder_infrastructure::{InMemoryConversationLog, InMemorySectionRepository};

    enum Scripted {
        Reply(VibeResponse),
        Error(TransportError),
        Hang,
    }

    struct MockTransport {
        script: StdMutex<VecDeque<Scripted>>,
        requests: StdMutex<Vec<VibeRequest>>,
    }

    impl MockTransport {
        fn new(script: Vec<Scripted>) -> Arc<Self> {
            Arc::new(Self {
                script: StdMutex::new(script.into()),
                requests: StdMutex::new(Vec::new()),
            })
        }

        fn sent(&self) -> Vec<VibeRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl VibeTransport for MockTransport {
        async fn send(
            &self,
            request: &VibeRequest,
        ) -> std::result::Result<VibeResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Scripted::Reply(response)) => Ok(response),
                Some(Scripted::Error(error)) => Err(error),
                Some(Scripted::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(TransportError::Failed("unreachable".to_string()))
                }
                None => Err(TransportError::Failed("script exhausted".to_string())),
            }
        }
    }

    struct StubGenerator;

    #[async_trait::async_trait]
    impl AssetGenerator for StubGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedAssetRef> {
            Ok(GeneratedAssetRef {
                id: format!("asset-{}", request.prompt),
                url: "https://cdn.example.com/a.png".to_string(),
            })
        }
    }

    fn reply(message: &str, ops: Vec<Operation>) -> Scripted {
        Scripted::Reply(VibeResponse {
            message: message.to_string(),
            ops,
            ..Default::default()
        })
    }

    fn add_text() -> Operation {
        Operation::AddSection {
            after: None,
            section: SectionDraft::of_type("text"),
        }
    }

    struct Fixture {
        session: ConversationSession,
        transport: Arc<MockTransport>,
        log: Arc<InMemoryConversationLog>,
        notices: Arc<StdMutex<Vec<String>>>,
    }

    async fn fixture(script: Vec<Scripted>) -> Fixture {
        fixture_with_log(script, Arc::new(InMemoryConversationLog::new())).await
    }

    async fn fixture_with_log(script: Vec<Scripted>, log: Arc<InMemoryConversationLog>) -> Fixture {
        let config = VibecoderConfig::default();
        let catalog = SectionCatalog::shared();
        let editor = Arc::new(Mutex::new(SectionEditor::new(
            SectionList::new("profile-1"),
            &config,
            Arc::clone(&catalog),
        )));
        let transport = MockTransport::new(script);
        let fulfiller = Arc::new(AssetRequestFulfiller::new(
            Arc::new(StubGenerator),
            config.assets.wide_aspect_threshold,
        ));
        let session = ConversationSession::new(
            "profile-1",
            config.session.clone(),
            catalog,
            editor,
            transport.clone(),
            log.clone(),
            fulfiller,
        );

        let notices = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&notices);
        session
            .set_notice_callback(Arc::new(move |m| sink.lock().unwrap().push(m)))
            .await;

        Fixture {
            session,
            transport,
            log,
            notices,
        }
    }

    async fn section_count(session: &ConversationSession) -> usize {
        session.editor().lock().await.sections().len()
    }

    #[tokio::test]
    async fn test_reply_with_ops_is_applied() {
        let f = fixture(vec![reply("Added a text block", vec![add_text()])]).await;

        let outcome = f.session.send_message("add some text").await;
        let SendOutcome::Replied { message_id, apply } = outcome else {
            panic!("expected a reply");
        };
        assert_eq!(apply, Some(ApplyOutcome::Applied));
        assert_eq!(section_count(&f.session).await, 1);

        let transcript = f.session.transcript().await;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].role, MessageRole::User);
        assert_eq!(transcript[0].status, MessageStatus::Applied);
        assert_eq!(transcript[1].id, message_id);
        assert_eq!(transcript[1].status, MessageStatus::Applied);
        assert!(transcript[1].latency_ms.is_some());
        assert_eq!(f.session.exchange_state().await, ExchangeState::Applied);

        let persisted = f.log.page_before("profile-1", None, 10).await.unwrap();
        assert_eq!(persisted.len(), 2);
        assert_eq!(persisted[1].operations.len(), 1);
    }

    #[tokio::test]
    async fn test_context_snapshot_excludes_current_message() {
        let f = fixture(vec![reply("hi", Vec::new()), reply("again", Vec::new())]).await;
        f.session.send_message("first").await;
        f.session.send_message("second").await;

        let sent = f.transport.sent();
        assert_eq!(sent[1].message, "second");
        assert_eq!(sent[1].profile_id, "profile-1");
        let history: Vec<&str> = sent[1]
            .context
            .conversation_history
            .iter()
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(history, vec!["first", "hi"]);
        assert_eq!(sent[1].context.supported_section_types.len(), 20);
    }

    #[tokio::test]
    async fn test_replaying_a_reply_applies_it_once() {
        let f = fixture(vec![reply("Added", vec![add_text()])]).await;

        let SendOutcome::Replied { message_id, .. } = f.session.send_message("add text").await
        else {
            panic!("expected a reply");
        };
        let replay = f.session.apply_reply(&message_id).await;

        assert_eq!(replay, ApplyOutcome::Duplicate);
        assert_eq!(section_count(&f.session).await, 1);
        assert!(f.session.pending_message().await.is_none());
        assert_eq!(
            *f.notices.lock().unwrap(),
            vec!["These changes were already applied.".to_string()]
        );
        assert_eq!(
            f.session.apply_reply("unknown").await,
            ApplyOutcome::NothingToApply
        );
    }

    #[tokio::test]
    async fn test_same_batch_in_new_reply_applies_after_undo() {
        let f = fixture(vec![
            reply("Added", vec![add_text()]),
            reply("Added again", vec![add_text()]),
        ])
        .await;

        f.session.send_message("add text").await;
        assert!(f.session.editor().lock().await.undo());
        assert_eq!(section_count(&f.session).await, 0);

        let second = f.session.send_message("add text").await;
        assert!(matches!(
            second,
            SendOutcome::Replied {
                apply: Some(ApplyOutcome::Applied),
                ..
            }
        ));
        assert_eq!(section_count(&f.session).await, 1);
        assert_eq!(
            f.session.transcript().await.last().map(|m| m.status),
            Some(MessageStatus::Applied)
        );
        assert!(f.notices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_batch_stays_pending_and_can_retry() {
        let f = fixture(vec![reply(
            "Hid it",
            vec![Operation::UpdateSection {
                section_id: "missing".to_string(),
                patch: SectionPatch::visibility(false),
            }],
        )])
        .await;

        let outcome = f.session.send_message("hide it").await;
        let SendOutcome::Replied {
            apply: Some(ApplyOutcome::Rejected(reason)),
            ..
        } = outcome
        else {
            panic!("expected a rejection");
        };
        assert!(reason.contains("not found"));
        assert!(f.session.pending_message().await.is_some());
        assert_eq!(f.session.exchange_state().await, ExchangeState::Error);
        assert_eq!(f.notices.lock().unwrap().len(), 1);

        // The rejected batch is not remembered as applied.
        assert!(matches!(
            f.session.retry_pending().await,
            ApplyOutcome::Rejected(_)
        ));
    }

    #[tokio::test]
    async fn test_transport_error_appends_error_reply() {
        let f = fixture(vec![Scripted::Error(TransportError::RateLimited)]).await;

        let outcome = f.session.send_message("hello").await;
        assert_eq!(outcome, SendOutcome::Failed(TransportError::RateLimited));

        let transcript = f.session.transcript().await;
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].error, Some(TransportError::RateLimited));
        assert!(transcript[1].content.contains("Too many requests"));
        assert_eq!(f.session.exchange_state().await, ExchangeState::Error);
        assert!(!f.session.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_timeout() {
        let f = fixture(vec![Scripted::Hang]).await;

        let outcome = f.session.send_message("hello").await;
        assert_eq!(
            outcome,
            SendOutcome::Failed(TransportError::Timeout { seconds: 60 })
        );
        assert!(f.notices.lock().unwrap()[0].contains("too long"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_send_while_in_flight_is_dropped() {
        let f = fixture(vec![Scripted::Hang]).await;

        let (first, second) = tokio::join!(f.session.send_message("one"), async {
            tokio::task::yield_now().await;
            f.session.send_message("two").await
        });

        assert_eq!(second, SendOutcome::Dropped);
        assert!(matches!(first, SendOutcome::Failed(TransportError::Timeout { .. })));
        assert_eq!(f.transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_regenerate_discards_pending_and_resends_with_marker() {
        let f = fixture(vec![
            reply(
                "Removing",
                vec![Operation::RemoveSection {
                    section_id: "ghost".to_string(),
                }],
            ),
            reply("Sure thing", Vec::new()),
        ])
        .await;

        f.session.send_message("tidy up").await;
        assert!(f.session.pending_message().await.is_some());

        let outcome = f.session.regenerate().await;
        assert!(matches!(outcome, SendOutcome::Replied { apply: None, .. }));

        let sent = f.transport.sent();
        assert_eq!(sent[1].message, "tidy up [regenerate]");
        assert!(sent[1].context.conversation_history.is_empty());

        let transcript = f.session.transcript().await;
        let users = transcript
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count();
        assert_eq!(users, 1);
        assert_eq!(transcript[1].status, MessageStatus::Discarded);
        assert!(f.session.pending_message().await.is_none());
    }

    #[tokio::test]
    async fn test_new_pending_reply_discards_older_pending() {
        let bad = || Operation::RemoveSection {
            section_id: "ghost".to_string(),
        };
        let f = fixture(vec![
            reply("one", vec![bad()]),
            reply("two", vec![bad(), bad()]),
        ])
        .await;

        f.session.send_message("a").await;
        f.session.send_message("b").await;

        let transcript = f.session.transcript().await;
        let pending = transcript.iter().filter(|m| m.is_pending()).count();
        assert_eq!(pending, 1);
        assert_eq!(transcript[1].status, MessageStatus::Discarded);
    }

    #[tokio::test]
    async fn test_feedback_only_on_assistant_messages() {
        let f = fixture(vec![reply("hello", Vec::new())]).await;
        f.session.send_message("hi").await;
        let transcript = f.session.transcript().await;

        f.session
            .set_feedback(&transcript[1].id, MessageFeedback::Up)
            .await
            .unwrap();
        assert!(f
            .session
            .set_feedback(&transcript[0].id, MessageFeedback::Down)
            .await
            .unwrap_err()
            .is_application());
        assert!(f
            .session
            .set_feedback("nope", MessageFeedback::Up)
            .await
            .unwrap_err()
            .is_not_found());
        assert_eq!(
            f.session.transcript().await[1].feedback,
            Some(MessageFeedback::Up)
        );
    }

    #[tokio::test]
    async fn test_history_pages_backwards_and_skips_live_messages() {
        let log = Arc::new(InMemoryConversationLog::new());
        for i in 0..5 {
            log.append(ConversationRecord::from_message(
                "profile-1",
                &ChatMessage::user(format!("old {i}")),
            ))
            .await
            .unwrap();
        }

        let f = fixture_with_log(vec![reply("live reply", Vec::new())], log).await;
        f.session.send_message("live").await;

        // Live messages are already in the transcript; paging starts before them.
        let older = f.session.load_older().await.unwrap();
        assert_eq!(older, 5);
        let contents: Vec<String> = f
            .session
            .transcript()
            .await
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents.first().map(String::as_str), Some("old 0"));
        assert_eq!(contents.last().map(String::as_str), Some("live reply"));
        assert_eq!(contents.len(), 7);
        assert_eq!(f.session.load_older().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_load_history_takes_newest_page_oldest_first() {
        let log = Arc::new(InMemoryConversationLog::new());
        for i in 0..40 {
            log.append(ConversationRecord::from_message(
                "profile-1",
                &ChatMessage::user(format!("m{i}")),
            ))
            .await
            .unwrap();
        }
        let f = fixture_with_log(Vec::new(), log).await;

        assert_eq!(f.session.load_history().await.unwrap(), 30);
        let transcript = f.session.transcript().await;
        assert_eq!(transcript[0].content, "m10");
        assert_eq!(transcript[29].content, "m39");

        assert_eq!(f.session.load_older().await.unwrap(), 10);
        assert_eq!(f.session.transcript().await[0].content, "m0");
    }

    #[tokio::test]
    async fn test_clear_with_purge() {
        let f = fixture(vec![reply("hello", Vec::new())]).await;
        f.session.send_message("hi").await;

        f.session.clear(true).await.unwrap();
        assert!(f.session.transcript().await.is_empty());
        assert_eq!(f.session.exchange_state().await, ExchangeState::Idle);
        assert!(f
            .log
            .page_before("profile-1", None, 10)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_refused_while_reply_in_flight() {
        let f = fixture(vec![Scripted::Hang]).await;

        let (sent, cleared) = tokio::join!(f.session.send_message("one"), async {
            tokio::task::yield_now().await;
            f.session.clear(false).await
        });

        assert!(cleared.unwrap_err().is_application());
        assert!(matches!(sent, SendOutcome::Failed(TransportError::Timeout { .. })));
        assert_eq!(f.session.transcript().await.len(), 2);

        f.session.clear(false).await.unwrap();
        assert!(f.session.transcript().await.is_empty());
    }

    #[tokio::test]
    async fn test_committed_sections_synced_and_assets_staged() {
        let response = VibeResponse {
            message: "Here you go".to_string(),
            ops: vec![add_text()],
            asset_requests: vec![AssetRequest::new(RequestedAssetKind::Background, "linen")],
            preview_notes: vec!["Adds a text block".to_string()],
            credits_used: Some(2),
        };
        let f = fixture(vec![Scripted::Reply(response)]).await;
        let repository = Arc::new(InMemorySectionRepository::new());
        f.session.set_section_repository(repository.clone()).await;

        f.session.send_message("decorate").await;

        let stored = repository.load("profile-1").await.unwrap();
        assert_eq!(stored.len(), 1);

        let reply = f.session.transcript().await.pop().unwrap();
        assert_eq!(reply.credits_used, Some(2));
        assert_eq!(reply.preview_notes.len(), 1);

        let fulfiller = f.session.fulfiller();
        assert_eq!(fulfiller.pending().await.len(), 1);
        let report = f.session.fulfill_assets().await;
        assert_eq!(report.generated.len(), 1);
        assert_eq!(fulfiller.tray().await[0].id, "asset-linen");
        assert_eq!(section_count(&f.session).await, 1);
    }
}
