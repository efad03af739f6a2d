//! Infrastructure layer for Vibecoder.
//!
//! Adapters for the domain traits: file-backed and in-memory repositories,
//! configuration loading and the HTTP clients for the AI and asset services.

pub mod config_service;
pub mod file_conversation_log;
pub mod file_section_repository;
pub mod http_asset_generator;
pub mod http_transport;
pub mod memory;
pub mod paths;
pub mod storage;

pub use config_service::ConfigService;
pub use file_conversation_log::JsonlConversationLog;
pub use file_section_repository::JsonSectionRepository;
pub use http_asset_generator::HttpAssetGenerator;
pub use http_transport::HttpVibeTransport;
pub use memory::{InMemoryConversationLog, InMemorySectionRepository};
pub use paths::VibecoderPaths;
