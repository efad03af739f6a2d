//! Per-type section content.
//!
//! `SectionContent` is a tagged union keyed by `section_type`, so the shape of
//! a section's content is always the one its type dictates.

use super::merge::{from_object, shallow_merge, to_object};
use super::model::SectionType;
use crate::error::{Result, VibeError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const TAG: &str = "section_type";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section_type", rename_all = "snake_case")]
pub enum SectionContent {
    Hero(HeroContent),
    Text(TextContent),
    Image(ImageContent),
    Gallery(GalleryContent),
    Video(VideoContent),
    Testimonials(TestimonialsContent),
    Faq(FaqContent),
    Features(FeaturesContent),
    Pricing(PricingContent),
    ProductGrid(ProductGridContent),
    Cta(CtaContent),
    Newsletter(NewsletterContent),
    Contact(ContactContent),
    SocialLinks(SocialLinksContent),
    Countdown(CountdownContent),
    Embed(EmbedContent),
    About(AboutContent),
    Divider(DividerContent),
    Spacer(SpacerContent),
    Footer(FooterContent),
}

impl SectionContent {
    pub fn section_type(&self) -> SectionType {
        match self {
            Self::Hero(_) => SectionType::Hero,
            Self::Text(_) => SectionType::Text,
            Self::Image(_) => SectionType::Image,
            Self::Gallery(_) => SectionType::Gallery,
            Self::Video(_) => SectionType::Video,
            Self::Testimonials(_) => SectionType::Testimonials,
            Self::Faq(_) => SectionType::Faq,
            Self::Features(_) => SectionType::Features,
            Self::Pricing(_) => SectionType::Pricing,
            Self::ProductGrid(_) => SectionType::ProductGrid,
            Self::Cta(_) => SectionType::Cta,
            Self::Newsletter(_) => SectionType::Newsletter,
            Self::Contact(_) => SectionType::Contact,
            Self::SocialLinks(_) => SectionType::SocialLinks,
            Self::Countdown(_) => SectionType::Countdown,
            Self::Embed(_) => SectionType::Embed,
            Self::About(_) => SectionType::About,
            Self::Divider(_) => SectionType::Divider,
            Self::Spacer(_) => SectionType::Spacer,
            Self::Footer(_) => SectionType::Footer,
        }
    }

    /// The content fields as a JSON object, without the type tag.
    pub fn to_map(&self) -> Result<Map<String, Value>> {
        let mut map = to_object(self)?;
        map.remove(TAG);
        Ok(map)
    }

    /// Builds content of the given type from an untagged JSON object.
    ///
    /// Any `section_type` key inside `map` is overwritten by `section_type`.
    pub fn from_map(section_type: SectionType, mut map: Map<String, Value>) -> Result<Self> {
        map.insert(TAG.to_string(), Value::String(section_type.to_string()));
        from_object(map).map_err(|e| {
            VibeError::application(format!("content does not fit a {section_type} section: {e}"))
        })
    }

    /// Shallow-merges `patch` over this content. The type never changes.
    pub fn merged(&self, patch: &Map<String, Value>) -> Result<Self> {
        let merged = shallow_merge(self.to_map()?, patch);
        Self::from_map(self.section_type(), merged)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroContent {
    pub headline: String,
    pub subheadline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryContent {
    pub title: String,
    pub images: Vec<GalleryImage>,
    pub columns: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoContent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub autoplay: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub quote: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestimonialsContent {
    pub title: String,
    pub items: Vec<Testimonial>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqContent {
    pub title: String,
    pub items: Vec<FaqItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureItem {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesContent {
    pub title: String,
    pub items: Vec<FeatureItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingTier {
    pub name: String,
    pub price: String,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingContent {
    pub title: String,
    pub tiers: Vec<PricingTier>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductGridContent {
    pub title: String,
    pub product_ids: Vec<String>,
    pub columns: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtaContent {
    pub headline: String,
    pub button_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterContent {
    pub headline: String,
    pub description: String,
    pub button_label: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactContent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub show_form: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkItem {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinksContent {
    pub title: String,
    pub links: Vec<LinkItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownContent {
    pub title: String,
    /// RFC 3339 timestamp the countdown runs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    pub expired_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedContent {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub height_px: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutContent {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DividerContent {
    pub style: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacerContent {
    pub size: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterContent {
    pub text: String,
    pub links: Vec<LinkItem>,
    pub show_social: bool,
}
