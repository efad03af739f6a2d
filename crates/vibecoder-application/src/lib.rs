//! Application layer for Vibecoder.
//!
//! Use cases that coordinate the domain with the external collaborators:
//! the conversation exchange with the AI, the asset draft tray and the
//! best-effort sync of committed sections.

pub mod asset_fulfiller;
pub mod conversation_session;
pub mod section_sync;

pub use asset_fulfiller::{AssetRequestFulfiller, DrainReport};
pub use conversation_session::{
    ApplyOutcome, ConversationSession, ExchangeState, NoticeCallback, SendOutcome,
};
pub use section_sync::{SyncReport, sync_sections};
