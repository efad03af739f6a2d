//! Named style-option bundles.

use crate::section::{
    Animation, BackgroundKind, BackgroundOptions, BorderOptions, ColorOptions, LayoutWidth,
    SectionHeight, StyleOptions,
};
use serde::{Deserialize, Serialize};

/// A named bundle of style options pre-associated with a section type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPreset {
    /// Identifier unique within its section type (e.g. "card")
    pub id: String,
    /// Display name of the preset
    pub name: String,
    /// Style applied when the preset is chosen. `style.preset` holds `id`.
    pub style: StyleOptions,
}

impl SectionPreset {
    pub(crate) fn new(id: &str, name: &str, style: StyleOptions) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            style: StyleOptions {
                preset: Some(id.to_string()),
                ..style
            },
        }
    }
}

pub(crate) fn minimal() -> SectionPreset {
    SectionPreset::new("minimal", "Minimal", StyleOptions::default())
}

pub(crate) fn card() -> SectionPreset {
    SectionPreset::new(
        "card",
        "Card",
        StyleOptions {
            colors: ColorOptions {
                background: Some("#ffffff".to_string()),
                ..Default::default()
            },
            borders: BorderOptions {
                radius: 16,
                width: 1,
                color: Some("#e5e7eb".to_string()),
            },
            layout_width: LayoutWidth::Narrow,
            ..Default::default()
        },
    )
}

pub(crate) fn bold() -> SectionPreset {
    SectionPreset::new(
        "bold",
        "Bold",
        StyleOptions {
            colors: ColorOptions {
                background: Some("#111827".to_string()),
                text: Some("#ffffff".to_string()),
                accent: Some("#f59e0b".to_string()),
            },
            background: BackgroundOptions {
                kind: BackgroundKind::Solid,
                value: Some("#111827".to_string()),
            },
            animation: Animation::SlideUp,
            ..Default::default()
        },
    )
}

pub(crate) fn gradient() -> SectionPreset {
    SectionPreset::new(
        "gradient",
        "Gradient",
        StyleOptions {
            colors: ColorOptions {
                text: Some("#ffffff".to_string()),
                ..Default::default()
            },
            background: BackgroundOptions {
                kind: BackgroundKind::Gradient,
                value: Some("linear-gradient(135deg, #6366f1, #ec4899)".to_string()),
            },
            animation: Animation::Fade,
            ..Default::default()
        },
    )
}

pub(crate) fn spotlight() -> SectionPreset {
    SectionPreset::new(
        "spotlight",
        "Spotlight",
        StyleOptions {
            layout_width: LayoutWidth::Full,
            height: SectionHeight::Screen,
            animation: Animation::Fade,
            ..Default::default()
        },
    )
}

pub(crate) fn full_bleed() -> SectionPreset {
    SectionPreset::new(
        "full_bleed",
        "Full bleed",
        StyleOptions {
            layout_width: LayoutWidth::Full,
            ..Default::default()
        },
    )
}

pub(crate) fn grid() -> SectionPreset {
    SectionPreset::new(
        "grid",
        "Grid",
        StyleOptions {
            layout_width: LayoutWidth::Wide,
            animation: Animation::Zoom,
            ..Default::default()
        },
    )
}

pub(crate) fn compact() -> SectionPreset {
    SectionPreset::new(
        "compact",
        "Compact",
        StyleOptions {
            height: SectionHeight::Small,
            ..Default::default()
        },
    )
}
