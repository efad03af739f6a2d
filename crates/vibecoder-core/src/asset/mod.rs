//! Asset domain module: AI asset requests and the generated drafts.

mod generator;
mod model;

pub use generator::AssetGenerator;
pub use model::{
    AssetRequest, AssetStatus, GeneratedAsset, GeneratedAssetRef, GeneratedAssetType,
    GenerationRequest, GenerationSpec, RequestedAssetKind, lenient_asset_requests,
};
