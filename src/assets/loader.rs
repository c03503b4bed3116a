//! Builds engine-side animation data from an [`ImportedScene`].
//!
//! The node tree is walked depth-first. Every mesh carrying bones feeds the
//! (single, shared) skeleton and gets its own influence buffer; node names and
//! local transforms are collected on the way so the bone hierarchy and the
//! model root transform can be resolved afterwards.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};
use rustc_hash::{FxHashMap, FxHashSet};

use super::convert::uniform_scale;
use super::import::{ImportedAnimation, ImportedChannel, ImportedNode, ImportedScene};
use crate::animation::clip::{AnimationClip, Channel};
use crate::animation::tracks::KeyframeTrack;
use crate::errors::{AnimationError, Result};
use crate::scene::skeleton::{MeshBone, Skeleton, VertexInfluences, VertexWeight};

/// Rate assumed when a container leaves ticks-per-second unset.
pub const DEFAULT_TICKS_PER_SECOND: f32 = 25.0;

/// Everything the loader extracts from one imported scene.
#[derive(Debug, Clone, Default)]
pub struct LoadedModel {
    pub clips: Vec<AnimationClip>,
    pub skeleton: Option<Skeleton>,
    /// One buffer per scene mesh, indexed like [`ImportedScene::meshes`].
    pub vertex_influences: Vec<Vec<VertexInfluences>>,
    /// Accumulated transform of the nodes above the root bone.
    pub root_transform: Mat4,
}

#[derive(Default)]
struct NodeWalk {
    child_to_parent: HashMap<String, String>,
    node_transforms: FxHashMap<String, Mat4>,
    skeleton: Option<Skeleton>,
    loaded_meshes: Vec<bool>,
}

/// Loads skeleton, influences, root transform and clips from `scene`.
pub fn load_scene(scene: &ImportedScene) -> Result<LoadedModel> {
    let mut vertex_influences: Vec<Vec<VertexInfluences>> = scene
        .meshes
        .iter()
        .map(|m| vec![VertexInfluences::default(); m.vertex_count])
        .collect();

    let mut walk = NodeWalk {
        loaded_meshes: vec![false; scene.meshes.len()],
        ..Default::default()
    };
    process_node(&scene.root, scene, &mut walk, &mut vertex_influences)?;

    let mut root_transform = Mat4::IDENTITY;
    if let Some(skeleton) = walk.skeleton.as_mut() {
        let root_bone = skeleton.set_parent_links(&walk.child_to_parent)?;
        root_transform =
            model_root_transform(&walk.child_to_parent, &walk.node_transforms, &root_bone)?;
    }

    let clips = scene
        .animations
        .iter()
        .map(convert_animation)
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "Loaded scene: {} meshes, {} bones, {} clips",
        scene.meshes.len(),
        walk.skeleton.as_ref().map_or(0, Skeleton::bone_count),
        clips.len()
    );

    Ok(LoadedModel {
        clips,
        skeleton: walk.skeleton,
        vertex_influences,
        root_transform,
    })
}

fn process_node(
    node: &ImportedNode,
    scene: &ImportedScene,
    walk: &mut NodeWalk,
    vertex_influences: &mut [Vec<VertexInfluences>],
) -> Result<()> {
    walk.node_transforms
        .insert(node.name.clone(), Mat4::from(node.transformation));

    for &mesh_index in &node.meshes {
        let mesh = scene.meshes.get(mesh_index).ok_or_else(|| {
            AnimationError::index_out_of_range(
                &format!("mesh of node '{}'", node.name),
                mesh_index,
                scene.meshes.len(),
            )
        })?;

        // Instanced meshes only contribute their bones once
        if std::mem::replace(&mut walk.loaded_meshes[mesh_index], true) {
            continue;
        }
        if !mesh.has_bones() {
            log::debug!("Mesh '{}' has no bones, not skinned", mesh.name);
            continue;
        }

        let mesh_bones: Vec<MeshBone> = mesh
            .bones
            .iter()
            .map(|bone| MeshBone {
                name: bone.name.clone(),
                offset: Mat4::from(bone.offset_matrix),
                weights: bone
                    .weights
                    .iter()
                    .map(|w| VertexWeight {
                        vertex: w.vertex_id as usize,
                        weight: w.weight,
                    })
                    .collect(),
            })
            .collect();

        walk.skeleton
            .get_or_insert_with(Skeleton::new)
            .load_bones_from_mesh(&mesh_bones, &mut vertex_influences[mesh_index])?;
    }

    for child in &node.children {
        process_node(child, scene, walk, vertex_influences)?;
        walk.child_to_parent
            .insert(child.name.clone(), node.name.clone());
    }
    Ok(())
}

/// Product of the local transforms from the scene root down to the parent
/// of `root_bone`, outermost first.
///
/// Duplicate node names can make the name-keyed parent chain loop back on
/// itself, which is reported as [`AnimationError::MalformedSkeleton`].
fn model_root_transform(
    child_to_parent: &HashMap<String, String>,
    node_transforms: &FxHashMap<String, Mat4>,
    root_bone: &str,
) -> Result<Mat4> {
    let mut transform = Mat4::IDENTITY;
    let mut visited = FxHashSet::default();
    let mut current = root_bone;
    while let Some(parent) = child_to_parent.get(current) {
        if !visited.insert(parent.as_str()) {
            return Err(AnimationError::MalformedSkeleton(format!(
                "nodes above root bone '{root_bone}' loop back through '{parent}'"
            )));
        }
        if let Some(local) = node_transforms.get(parent) {
            transform = *local * transform;
        }
        current = parent;
    }
    Ok(transform)
}

fn convert_channel(channel: &ImportedChannel) -> Result<Channel> {
    let position = KeyframeTrack::from_keys(
        channel
            .position_keys
            .iter()
            .map(|k| (k.time as f32, Vec3::from(k.value))),
    )?;
    let rotation = KeyframeTrack::from_keys(
        channel
            .rotation_keys
            .iter()
            .map(|k| (k.time as f32, Quat::from(k.value))),
    )?;
    let scale = KeyframeTrack::from_keys(
        channel
            .scaling_keys
            .iter()
            .map(|k| (k.time as f32, uniform_scale(k.value))),
    )?;

    Ok(Channel::new(channel.node_name.clone())
        .with_position(position)
        .with_rotation(rotation)
        .with_scale(scale))
}

fn convert_animation(animation: &ImportedAnimation) -> Result<AnimationClip> {
    let ticks_per_second = if animation.ticks_per_second > 0.0 {
        animation.ticks_per_second as f32
    } else {
        log::debug!(
            "Clip '{}' has no tick rate, assuming {DEFAULT_TICKS_PER_SECOND}",
            animation.name
        );
        DEFAULT_TICKS_PER_SECOND
    };

    let channels = animation
        .channels
        .iter()
        .map(convert_channel)
        .collect::<Result<Vec<_>>>()
        .map_err(|e| match e {
            AnimationError::InvalidClip(msg) => {
                AnimationError::InvalidClip(format!("clip '{}': {msg}", animation.name))
            }
            other => other,
        })?;

    let clip = AnimationClip::new(
        animation.name.clone(),
        animation.duration as f32,
        ticks_per_second,
        channels,
    )?;
    log::debug!(
        "Loaded clip '{}' ({} channels, {:.2}s)",
        clip.name(),
        clip.channels().len(),
        clip.total_seconds()
    );
    Ok(clip)
}
