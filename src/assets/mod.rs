//! Imported scene data and its conversion into clips and skeletons.

pub mod import;
pub mod convert;
pub mod loader;

pub use import::{
    AssetMatrix4, AssetQuaternion, AssetVector3, ImportedAnimation, ImportedBone,
    ImportedChannel, ImportedMesh, ImportedNode, ImportedScene, ImportedWeight, QuatKey,
    VectorKey,
};
pub use loader::{LoadedModel, load_scene};
