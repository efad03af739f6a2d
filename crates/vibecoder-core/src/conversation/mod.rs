//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: transcript messages and their lifecycle
//! - `transport`: the AI call contract and its wire types
//! - `context`: builds the state snapshot sent with a message
//! - `repository`: the persisted conversation log

mod context;
mod message;
mod repository;
mod transport;

pub use message::{ChatMessage, MessageFeedback, MessageRole, MessageStatus};
pub use repository::{ConversationLogRepository, ConversationRecord, PageCursor, select_page};
pub use transport::{
    BrandProfile, HistoryTurn, SectionSummary, TransportError, VibeContext, VibeRequest,
    VibeResponse, VibeTransport,
};
