//! Section domain model.
//!
//! A section is one typed, independently stylable content block of a
//! profile's page.

use super::content::SectionContent;
use super::merge::{from_object, shallow_merge, to_object};
use crate::error::{Result, VibeError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The closed set of section types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SectionType {
    Hero,
    Text,
    Image,
    Gallery,
    Video,
    Testimonials,
    Faq,
    Features,
    Pricing,
    ProductGrid,
    Cta,
    Newsletter,
    Contact,
    SocialLinks,
    Countdown,
    Embed,
    About,
    Divider,
    Spacer,
    Footer,
}

/// Grouping used by editors and by the AI's catalog context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SectionCategory {
    Content,
    Media,
    SocialProof,
    Commerce,
    Engagement,
    Layout,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderOptions {
    pub radius: u8,
    pub width: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundKind {
    #[default]
    None,
    Solid,
    Gradient,
    Image,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundOptions {
    pub kind: BackgroundKind,
    /// Color, gradient expression or image URL depending on `kind`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    #[default]
    None,
    Fade,
    SlideUp,
    Zoom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutWidth {
    Narrow,
    #[default]
    Normal,
    Wide,
    Full,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionHeight {
    #[default]
    Auto,
    Small,
    Medium,
    Large,
    Screen,
}

/// Visual options of a section. Presets are named bundles of these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    pub colors: ColorOptions,
    pub borders: BorderOptions,
    pub background: BackgroundOptions,
    pub animation: Animation,
    pub layout_width: LayoutWidth,
    pub height: SectionHeight,
}

impl StyleOptions {
    pub fn to_map(&self) -> Result<Map<String, Value>> {
        Ok(to_object(self)?)
    }

    /// Shallow-merges `patch` over these options.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<Self> {
        let merged = shallow_merge(self.to_map()?, patch);
        from_object(merged)
            .map_err(|e| VibeError::application(format!("invalid style options: {e}")))
    }
}

/// A single content block of a profile page.
///
/// `display_order` mirrors the section's index in its list; the list store
/// renumbers after every structural change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique section identifier (UUID format, `preview-N` for previews)
    pub id: String,
    /// Owning profile
    pub profile_id: String,
    pub display_order: u32,
    /// Type-tagged content; the section type is derived from it
    pub content: SectionContent,
    #[serde(default)]
    pub style_options: StyleOptions,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    /// Timestamp of the last update (ISO 8601 format)
    pub updated_at: String,
}

fn default_visible() -> bool {
    true
}

impl Section {
    pub fn section_type(&self) -> SectionType {
        self.content.section_type()
    }
}
