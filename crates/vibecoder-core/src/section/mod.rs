//! Section domain module.
//!
//! # Module Structure
//!
//! - `model`: `Section`, `SectionType` and style options
//! - `content`: per-type content, a tagged union keyed by section type
//! - `store`: `SectionList`, the ordered owner of a profile's sections
//! - `repository`: persistence trait for the section document
//! - `merge`: shallow JSON merge used by patches

mod content;
mod merge;
mod model;
mod repository;
mod store;

pub use content::{
    AboutContent, ContactContent, CountdownContent, CtaContent, DividerContent, EmbedContent,
    FaqContent, FaqItem, FeatureItem, FeaturesContent, FooterContent, GalleryContent,
    GalleryImage, HeroContent, ImageContent, LinkItem, NewsletterContent, PricingContent,
    PricingTier, ProductGridContent, SectionContent, SocialLinksContent, SpacerContent,
    Testimonial, TestimonialsContent, TextContent, VideoContent,
};
pub use merge::shallow_merge;
pub use model::{
    Animation, BackgroundKind, BackgroundOptions, BorderOptions, ColorOptions, LayoutWidth,
    Section, SectionCategory, SectionHeight, SectionType, StyleOptions,
};
pub use repository::SectionRepository;
pub use store::SectionList;

#[cfg(test)]
pub(crate) use store::tests::{list_of, text_section};
