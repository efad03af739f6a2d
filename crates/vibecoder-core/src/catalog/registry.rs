//! The section catalog: per-type defaults and presets.
//!
//! This table is the only place that knows a type's default content, display
//! name, category and presets. Editors and the operation applier read it; it
//! holds no state.

use super::preset::{self, SectionPreset};
use crate::section::{
    AboutContent, ContactContent, CountdownContent, CtaContent, DividerContent, EmbedContent,
    FaqContent, FaqItem, FeaturesContent, FooterContent, GalleryContent, HeroContent,
    ImageContent, NewsletterContent, PricingContent, ProductGridContent, SectionCategory,
    SectionContent, SectionType, SocialLinksContent, SpacerContent, StyleOptions, Testimonial,
    TestimonialsContent, TextContent, VideoContent,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use strum::IntoEnumIterator;

static STANDARD: Lazy<Arc<SectionCatalog>> =
    Lazy::new(|| Arc::new(SectionCatalog::with_types(SectionType::iter())));

/// Catalog entry for one section type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub section_type: SectionType,
    pub name: String,
    pub category: SectionCategory,
    pub default_content: SectionContent,
    /// Ordered presets; the first one is the default style
    pub presets: Vec<SectionPreset>,
}

impl CatalogEntry {
    pub fn preset(&self, id: &str) -> Option<&SectionPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// Style of the preset named `preset_id`, or of the first preset.
    pub fn default_style(&self, preset_id: Option<&str>) -> StyleOptions {
        preset_id
            .and_then(|id| self.preset(id))
            .or_else(|| self.presets.first())
            .map(|p| p.style.clone())
            .unwrap_or_default()
    }
}

/// `{type, name, category}` triple sent to the AI as the supported types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedSectionType {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub name: String,
    pub category: SectionCategory,
}

#[derive(Debug, Clone)]
pub struct SectionCatalog {
    order: Vec<SectionType>,
    entries: HashMap<SectionType, CatalogEntry>,
}

impl SectionCatalog {
    /// The catalog of every section type.
    pub fn standard() -> &'static SectionCatalog {
        &STANDARD
    }

    /// Shared handle to the standard catalog.
    pub fn shared() -> Arc<SectionCatalog> {
        Arc::clone(&STANDARD)
    }

    /// A catalog restricted to `types`, in the given order.
    pub fn with_types(types: impl IntoIterator<Item = SectionType>) -> Self {
        let mut order = Vec::new();
        let mut entries = HashMap::new();
        for section_type in types {
            if entries.insert(section_type, build_entry(section_type)).is_none() {
                order.push(section_type);
            }
        }
        Self { order, entries }
    }

    pub fn entry(&self, section_type: SectionType) -> Option<&CatalogEntry> {
        self.entries.get(&section_type)
    }

    /// Parses a raw type name and returns it only if this catalog supports it.
    pub fn resolve(&self, raw: &str) -> Option<SectionType> {
        SectionType::from_str(raw)
            .ok()
            .filter(|t| self.entries.contains_key(t))
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.order.iter().filter_map(|t| self.entries.get(t))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn supported_types(&self) -> Vec<SupportedSectionType> {
        self.entries()
            .map(|e| SupportedSectionType {
                section_type: e.section_type,
                name: e.name.clone(),
                category: e.category,
            })
            .collect()
    }
}

fn entry(
    section_type: SectionType,
    name: &str,
    category: SectionCategory,
    default_content: SectionContent,
    presets: Vec<SectionPreset>,
) -> CatalogEntry {
    CatalogEntry {
        section_type,
        name: name.to_string(),
        category,
        default_content,
        presets,
    }
}

fn s(value: &str) -> String {
    value.to_string()
}

fn build_entry(section_type: SectionType) -> CatalogEntry {
    use SectionCategory::*;

    match section_type {
        SectionType::Hero => entry(
            section_type,
            "Hero",
            Content,
            SectionContent::Hero(HeroContent {
                headline: s("Welcome to my store"),
                subheadline: s("Handmade goods, shipped with love"),
                cta_label: Some(s("Shop now")),
                ..Default::default()
            }),
            vec![preset::spotlight(), preset::gradient(), preset::minimal()],
        ),
        SectionType::Text => entry(
            section_type,
            "Text",
            Content,
            SectionContent::Text(TextContent {
                title: s("About this"),
                body: s("Tell your visitors something worth knowing."),
            }),
            vec![preset::minimal(), preset::card(), preset::bold()],
        ),
        SectionType::Image => entry(
            section_type,
            "Image",
            Media,
            SectionContent::Image(ImageContent {
                alt: s("Image"),
                ..Default::default()
            }),
            vec![preset::full_bleed(), preset::card()],
        ),
        SectionType::Gallery => entry(
            section_type,
            "Gallery",
            Media,
            SectionContent::Gallery(GalleryContent {
                title: s("Gallery"),
                images: Vec::new(),
                columns: 3,
            }),
            vec![preset::grid(), preset::minimal()],
        ),
        SectionType::Video => entry(
            section_type,
            "Video",
            Media,
            SectionContent::Video(VideoContent {
                title: s("Watch"),
                ..Default::default()
            }),
            vec![preset::full_bleed(), preset::card()],
        ),
        SectionType::Testimonials => entry(
            section_type,
            "Testimonials",
            SocialProof,
            SectionContent::Testimonials(TestimonialsContent {
                title: s("What customers say"),
                items: vec![Testimonial {
                    quote: s("Absolutely love it!"),
                    author: s("A happy customer"),
                    ..Default::default()
                }],
            }),
            vec![preset::card(), preset::minimal(), preset::bold()],
        ),
        SectionType::Faq => entry(
            section_type,
            "FAQ",
            Content,
            SectionContent::Faq(FaqContent {
                title: s("Frequently asked questions"),
                items: vec![FaqItem {
                    question: s("How long does shipping take?"),
                    answer: s("Usually 3-5 business days."),
                }],
            }),
            vec![preset::minimal(), preset::card()],
        ),
        SectionType::Features => entry(
            section_type,
            "Features",
            Content,
            SectionContent::Features(FeaturesContent {
                title: s("Why choose us"),
                items: Vec::new(),
            }),
            vec![preset::grid(), preset::card()],
        ),
        SectionType::Pricing => entry(
            section_type,
            "Pricing",
            Commerce,
            SectionContent::Pricing(PricingContent {
                title: s("Pricing"),
                tiers: Vec::new(),
            }),
            vec![preset::card(), preset::bold()],
        ),
        SectionType::ProductGrid => entry(
            section_type,
            "Product grid",
            Commerce,
            SectionContent::ProductGrid(ProductGridContent {
                title: s("Shop"),
                product_ids: Vec::new(),
                columns: 3,
            }),
            vec![preset::grid(), preset::minimal()],
        ),
        SectionType::Cta => entry(
            section_type,
            "Call to action",
            Engagement,
            SectionContent::Cta(CtaContent {
                headline: s("Ready to get started?"),
                button_label: s("Get started"),
                button_url: None,
            }),
            vec![preset::bold(), preset::gradient(), preset::minimal()],
        ),
        SectionType::Newsletter => entry(
            section_type,
            "Newsletter",
            Engagement,
            SectionContent::Newsletter(NewsletterContent {
                headline: s("Stay in the loop"),
                description: s("New drops and behind-the-scenes, once a month."),
                button_label: s("Subscribe"),
                placeholder: s("you@example.com"),
            }),
            vec![preset::card(), preset::gradient()],
        ),
        SectionType::Contact => entry(
            section_type,
            "Contact",
            Engagement,
            SectionContent::Contact(ContactContent {
                title: s("Get in touch"),
                show_form: true,
                ..Default::default()
            }),
            vec![preset::minimal(), preset::card()],
        ),
        SectionType::SocialLinks => entry(
            section_type,
            "Social links",
            Engagement,
            SectionContent::SocialLinks(SocialLinksContent {
                title: s("Follow along"),
                links: Vec::new(),
            }),
            vec![preset::compact(), preset::minimal()],
        ),
        SectionType::Countdown => entry(
            section_type,
            "Countdown",
            Engagement,
            SectionContent::Countdown(CountdownContent {
                title: s("Launching soon"),
                target_date: None,
                expired_message: s("We're live!"),
            }),
            vec![preset::bold(), preset::gradient()],
        ),
        SectionType::Embed => entry(
            section_type,
            "Embed",
            Media,
            SectionContent::Embed(EmbedContent {
                title: String::new(),
                url: None,
                height_px: 400,
            }),
            vec![preset::full_bleed(), preset::card()],
        ),
        SectionType::About => entry(
            section_type,
            "About",
            Content,
            SectionContent::About(AboutContent {
                title: s("About me"),
                body: s("Share your story."),
                image_url: None,
            }),
            vec![preset::card(), preset::minimal()],
        ),
        SectionType::Divider => entry(
            section_type,
            "Divider",
            Layout,
            SectionContent::Divider(DividerContent { style: s("line") }),
            vec![preset::minimal(), preset::compact()],
        ),
        SectionType::Spacer => entry(
            section_type,
            "Spacer",
            Layout,
            SectionContent::Spacer(SpacerContent { size: s("medium") }),
            vec![preset::minimal()],
        ),
        SectionType::Footer => entry(
            section_type,
            "Footer",
            Layout,
            SectionContent::Footer(FooterContent {
                text: s("© All rights reserved"),
                links: Vec::new(),
                show_social: true,
            }),
            vec![preset::minimal(), preset::bold()],
        ),
    }
}
