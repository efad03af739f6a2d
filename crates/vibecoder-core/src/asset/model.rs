use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display};

/// Kind of asset the AI asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedAssetKind {
    Image,
    Background,
    Promo,
}

/// Concrete asset type sent to the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GeneratedAssetType {
    Banner,
    Thumbnail,
    Background,
    Promo,
}

/// Asset generation request carried by an AI reply. Consumed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRequest {
    #[serde(rename = "type")]
    pub kind: RequestedAssetKind,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<String>>,
    /// `"W:H"` or a decimal ratio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<String>,
}

impl AssetRequest {
    pub fn new(kind: RequestedAssetKind, prompt: impl Into<String>) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
            purpose: None,
            style: None,
            palette: None,
            aspect: None,
            negative: None,
        }
    }

    pub fn with_aspect(mut self, aspect: impl Into<String>) -> Self {
        self.aspect = Some(aspect.into());
        self
    }

    /// Width over height, if `aspect` parses.
    pub fn aspect_ratio(&self) -> Option<f64> {
        parse_aspect(self.aspect.as_deref()?)
    }

    /// Concrete type for the generator. An image at least
    /// `wide_threshold` wide is a banner, any other image a thumbnail.
    pub fn derived_type(&self, wide_threshold: f64) -> GeneratedAssetType {
        match self.kind {
            RequestedAssetKind::Image => match self.aspect_ratio() {
                Some(ratio) if ratio >= wide_threshold => GeneratedAssetType::Banner,
                _ => GeneratedAssetType::Thumbnail,
            },
            RequestedAssetKind::Background => GeneratedAssetType::Background,
            RequestedAssetKind::Promo => GeneratedAssetType::Promo,
        }
    }

    fn spec(&self) -> Option<GenerationSpec> {
        let has_spec = self.purpose.is_some()
            || self.style.is_some()
            || self.palette.is_some()
            || self.aspect.is_some()
            || self.negative.is_some();
        has_spec.then(|| GenerationSpec {
            purpose: self.purpose.clone().unwrap_or_default(),
            style: self.style.clone().unwrap_or_default(),
            palette: self.palette.clone(),
            aspect: self.aspect.clone(),
            negative: self.negative.clone(),
        })
    }
}

fn parse_aspect(raw: &str) -> Option<f64> {
    let ratio = match raw.split_once(':') {
        Some((w, h)) => {
            let w: f64 = w.trim().parse().ok()?;
            let h: f64 = h.trim().parse().ok()?;
            if h == 0.0 {
                return None;
            }
            w / h
        }
        None => raw.trim().parse().ok()?,
    };
    (ratio.is_finite() && ratio > 0.0).then_some(ratio)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSpec {
    pub purpose: String,
    pub style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<String>,
}

/// Body of the asset generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub profile_id: String,
    #[serde(rename = "type")]
    pub asset_type: GeneratedAssetType,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<GenerationSpec>,
}

impl GenerationRequest {
    pub fn from_request(profile_id: &str, request: &AssetRequest, wide_threshold: f64) -> Self {
        Self {
            profile_id: profile_id.to_string(),
            asset_type: request.derived_type(wide_threshold),
            prompt: request.prompt.clone(),
            spec: request.spec(),
        }
    }
}

/// Deserializes a reply's asset requests, skipping entries that do not
/// parse (an unknown `type`, a missing prompt) with a warning.
pub fn lenient_asset_requests<'de, D>(deserializer: D) -> Result<Vec<AssetRequest>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(request) => Some(request),
            Err(e) => {
                tracing::warn!(
                    target: "vibecoder::assets",
                    index,
                    error = %e,
                    "Skipping unrecognized asset request"
                );
                None
            }
        })
        .collect())
}

/// Reply of the asset generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAssetRef {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Draft,
    Applied,
    Discarded,
}

/// A generated asset. Wiring its URL into a section is always a separate,
/// explicit step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedAsset {
    pub id: String,
    pub url: String,
    pub asset_type: GeneratedAssetType,
    pub prompt: String,
    pub status: AssetStatus,
    pub created_at: String,
}

impl GeneratedAsset {
    pub fn draft(generated: GeneratedAssetRef, request: &GenerationRequest) -> Self {
        Self {
            id: generated.id,
            url: generated.url,
            asset_type: request.asset_type,
            prompt: request.prompt.clone(),
            status: AssetStatus::Draft,
            created_at: crate::now_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wide_image_becomes_banner() {
        let wide = AssetRequest::new(RequestedAssetKind::Image, "shop front").with_aspect("16:9");
        let square = AssetRequest::new(RequestedAssetKind::Image, "mug").with_aspect("1:1");
        let decimal = AssetRequest::new(RequestedAssetKind::Image, "strip").with_aspect("1.5");
        let unparsable = AssetRequest::new(RequestedAssetKind::Image, "x").with_aspect("wide");

        assert_eq!(wide.derived_type(1.5), GeneratedAssetType::Banner);
        assert_eq!(square.derived_type(1.5), GeneratedAssetType::Thumbnail);
        assert_eq!(decimal.derived_type(1.5), GeneratedAssetType::Banner);
        assert_eq!(unparsable.derived_type(1.5), GeneratedAssetType::Thumbnail);
    }

    #[test]
    fn test_other_kinds_map_directly() {
        let background = AssetRequest::new(RequestedAssetKind::Background, "paper texture");
        assert_eq!(background.derived_type(1.5), GeneratedAssetType::Background);
        let promo = AssetRequest::new(RequestedAssetKind::Promo, "sale").with_aspect("3:1");
        assert_eq!(promo.derived_type(1.5), GeneratedAssetType::Promo);
    }

    #[test]
    fn test_generation_request_wire_shape() {
        let request: AssetRequest = serde_json::from_value(json!({
            "type": "image",
            "prompt": "pottery on a shelf",
            "style": "watercolor",
            "aspect": "2:1"
        }))
        .unwrap();

        let body = GenerationRequest::from_request("profile-1", &request, 1.5);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["profileId"], "profile-1");
        assert_eq!(value["type"], "banner");
        assert_eq!(value["spec"]["style"], "watercolor");
        assert_eq!(value["spec"]["purpose"], "");

        let bare = AssetRequest::new(RequestedAssetKind::Promo, "sale");
        assert!(GenerationRequest::from_request("p", &bare, 1.5).spec.is_none());
    }
}
