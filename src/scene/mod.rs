//! Skeleton hierarchy and the model that owns it.

pub mod skeleton;
pub mod model;

pub use skeleton::{
    Bone, MAX_BONES_PER_VERTEX, MeshBone, Skeleton, TransitionPhase, VertexInfluences,
    VertexWeight,
};
pub use model::AnimatedModel;
