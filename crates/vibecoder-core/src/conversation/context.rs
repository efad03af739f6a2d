//! Builds the editor-state snapshot sent to the AI.

use super::message::{ChatMessage, MessageStatus};
use super::transport::{BrandProfile, HistoryTurn, SectionSummary, VibeContext};
use crate::catalog::SectionCatalog;
use crate::error::Result;
use crate::section::Section;

impl SectionSummary {
    pub fn from_section(section: &Section) -> Result<Self> {
        Ok(Self {
            id: section.id.clone(),
            section_type: section.section_type().to_string(),
            content: section.content.to_map()?,
            style_options: section.style_options.to_map()?,
            is_visible: section.is_visible,
        })
    }
}

impl VibeContext {
    /// Snapshot of `sections`, the catalog's supported types, the brand
    /// profile and the last `history_turns` transcript messages.
    ///
    /// Discarded replies and transport failures are not sent back as history.
    pub fn build(
        sections: &[Section],
        catalog: &SectionCatalog,
        brand_profile: Option<BrandProfile>,
        transcript: &[ChatMessage],
        history_turns: usize,
    ) -> Result<Self> {
        let sections = sections
            .iter()
            .map(SectionSummary::from_section)
            .collect::<Result<Vec<_>>>()?;

        let relevant: Vec<&ChatMessage> = transcript
            .iter()
            .filter(|m| m.status != MessageStatus::Discarded && m.error.is_none())
            .collect();
        let skip = relevant.len().saturating_sub(history_turns);
        let conversation_history = relevant
            .into_iter()
            .skip(skip)
            .map(|m| HistoryTurn {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        Ok(Self {
            sections,
            supported_section_types: catalog.supported_types(),
            brand_profile,
            conversation_history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::TransportError;
    use crate::section::list_of;

    #[test]
    fn test_history_limited_to_last_turns() {
        let transcript: Vec<ChatMessage> = (0..15)
            .map(|i| ChatMessage::user(format!("message {i}")))
            .collect();

        let context =
            VibeContext::build(&[], SectionCatalog::standard(), None, &transcript, 10).unwrap();
        assert_eq!(context.conversation_history.len(), 10);
        assert_eq!(context.conversation_history[0].content, "message 5");
        assert_eq!(context.conversation_history[9].role, "user");
    }

    #[test]
    fn test_failures_and_discarded_replies_skipped() {
        let mut discarded = ChatMessage::assistant("old", Vec::new(), Vec::new());
        discarded.status = MessageStatus::Discarded;
        let transcript = vec![
            ChatMessage::user("hi"),
            discarded,
            ChatMessage::transport_failure(TransportError::RateLimited),
        ];

        let context =
            VibeContext::build(&[], SectionCatalog::standard(), None, &transcript, 10).unwrap();
        assert_eq!(context.conversation_history.len(), 1);
    }

    #[test]
    fn test_context_wire_shape() {
        let list = list_of(&["a"]);
        let context = VibeContext::build(
            list.sections(),
            SectionCatalog::standard(),
            Some(BrandProfile {
                vibe_tags: vec!["cozy".to_string()],
                ..Default::default()
            }),
            &[],
            10,
        )
        .unwrap();

        let value = serde_json::to_value(&context).unwrap();
        assert_eq!(value["sections"][0]["type"], "text");
        assert_eq!(value["sections"][0]["content"]["title"], "a");
        assert!(value["sections"][0]["content"].get("section_type").is_none());
        assert_eq!(value["supportedSectionTypes"].as_array().unwrap().len(), 20);
        assert_eq!(value["brandProfile"]["vibeTags"][0], "cozy");
    }
}
