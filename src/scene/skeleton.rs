use std::collections::{HashMap, VecDeque};
use std::hash::BuildHasher;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::animation::clip::AnimationClip;
use crate::animation::pose::BonePose;
use crate::errors::{AnimationError, Result};

/// Maximum number of bones that may influence a single vertex.
pub const MAX_BONES_PER_VERTEX: usize = 4;

/// Skinning slots of one vertex, laid out for direct vertex-buffer upload.
///
/// Unused joint slots hold `-1` and a weight of `0.0`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VertexInfluences {
    pub joints: [i32; MAX_BONES_PER_VERTEX],
    pub weights: [f32; MAX_BONES_PER_VERTEX],
}

impl Default for VertexInfluences {
    fn default() -> Self {
        Self {
            joints: [-1; MAX_BONES_PER_VERTEX],
            weights: [0.0; MAX_BONES_PER_VERTEX],
        }
    }
}

impl VertexInfluences {
    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.iter().take_while(|&&j| j >= 0).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints[0] < 0
    }

    /// Writes `(bone, weight)` into the first free slot.
    ///
    /// Returns `false` when all slots are taken.
    pub fn push(&mut self, bone: usize, weight: f32) -> bool {
        match self.joints.iter().position(|&j| j < 0) {
            Some(slot) => {
                self.joints[slot] = bone as i32;
                self.weights[slot] = weight;
                true
            }
            None => false,
        }
    }
}

/// A weight assignment from a bone to one vertex of the mesh being loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    pub vertex: usize,
    pub weight: f32,
}

/// Bone data carried by one mesh: offset matrix and the vertices it moves.
#[derive(Debug, Clone)]
pub struct MeshBone {
    pub name: String,
    /// Inverse bind pose, mesh space → bone space.
    pub offset: Mat4,
    pub weights: Vec<VertexWeight>,
}

/// A node of the skeleton hierarchy.
#[derive(Debug, Clone)]
pub struct Bone {
    /// Join key into clip channels.
    pub name: String,
    /// Inverse bind pose, immutable after load.
    pub offset: Mat4,
    pub parent: Option<usize>,
    world: Mat4,
}

impl Bone {
    #[must_use]
    pub fn new(name: impl Into<String>, offset: Mat4, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            offset,
            parent,
            world: Mat4::IDENTITY,
        }
    }

    /// Model-space transform from the last evaluation pass.
    #[must_use]
    pub fn world(&self) -> Mat4 {
        self.world
    }
}

/// Which part of a transition was evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPhase {
    /// Only the first clip contributes.
    ClipA,
    /// Both clips contribute, `weight` being the share of the second.
    Blending { weight: f32 },
    /// Only the second clip contributes.
    ClipB,
}

/// Bone hierarchy plus the per-frame skinning matrices derived from it.
///
/// Bones keep their load order (the order vertex joint indices refer to);
/// evaluation follows a separately computed parent-before-child order.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
    name_to_index: FxHashMap<String, usize>,
    eval_order: Vec<usize>,
    root: Option<usize>,
    final_bone_transforms: Vec<Mat4>,
}

impl Skeleton {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a skeleton from bones whose parent links are already indices.
    ///
    /// Fails on parent indices outside the list, duplicate names, and
    /// hierarchies that are not a single-rooted tree.
    pub fn from_bones(bones: Vec<Bone>) -> Result<Self> {
        let mut name_to_index = FxHashMap::default();
        for (i, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent
                && parent >= bones.len()
            {
                return Err(AnimationError::index_out_of_range(
                    &format!("parent of bone '{}'", bone.name),
                    parent,
                    bones.len(),
                ));
            }
            if name_to_index.insert(bone.name.clone(), i).is_some() {
                return Err(AnimationError::MalformedSkeleton(format!(
                    "bone name '{}' is used more than once",
                    bone.name
                )));
            }
        }

        let parents: Vec<Option<usize>> = bones.iter().map(|b| b.parent).collect();
        let (root, eval_order) = Self::evaluation_order(&parents)?;

        Ok(Self {
            final_bone_transforms: vec![Mat4::IDENTITY; bones.len()],
            bones,
            name_to_index,
            eval_order,
            root: Some(root),
        })
    }

    /// Registers the bones of one mesh and writes their influences into
    /// `vertices`.
    ///
    /// A bone name seen for the first time gets the next index and keeps the
    /// offset from this first sighting. A vertex that would receive a fifth
    /// influence fails with [`AnimationError::BoneOverflow`].
    ///
    /// Every weight is checked before anything is written, so on error both
    /// the skeleton and `vertices` are left unchanged.
    pub fn load_bones_from_mesh(
        &mut self,
        mesh_bones: &[MeshBone],
        vertices: &mut [VertexInfluences],
    ) -> Result<()> {
        let first_new = self.bones.len();

        let mut new_names: FxHashMap<&str, usize> = FxHashMap::default();
        let indices: Vec<usize> = mesh_bones
            .iter()
            .map(|mesh_bone| match self.name_to_index.get(&mesh_bone.name) {
                Some(&index) => index,
                None => {
                    let next = first_new + new_names.len();
                    *new_names.entry(mesh_bone.name.as_str()).or_insert(next)
                }
            })
            .collect();

        let mut occupied: FxHashMap<usize, usize> = FxHashMap::default();
        for mesh_bone in mesh_bones {
            for vw in &mesh_bone.weights {
                let slots = vertices.get(vw.vertex).ok_or_else(|| {
                    AnimationError::index_out_of_range(
                        &format!("vertex weighted by bone '{}'", mesh_bone.name),
                        vw.vertex,
                        vertices.len(),
                    )
                })?;
                let count = occupied.entry(vw.vertex).or_insert_with(|| slots.len());
                if *count >= MAX_BONES_PER_VERTEX {
                    return Err(AnimationError::BoneOverflow {
                        vertex: vw.vertex,
                        bone: mesh_bone.name.clone(),
                    });
                }
                *count += 1;
            }
        }

        for (mesh_bone, &bone_index) in mesh_bones.iter().zip(&indices) {
            if bone_index == self.bones.len() {
                self.bones
                    .push(Bone::new(mesh_bone.name.clone(), mesh_bone.offset, None));
                self.name_to_index.insert(mesh_bone.name.clone(), bone_index);
            }
            for vw in &mesh_bone.weights {
                let pushed = vertices[vw.vertex].push(bone_index, vw.weight);
                debug_assert!(pushed, "slot capacity was checked above");
            }
        }

        // New bones have no parent yet, so appending them keeps the order valid
        self.eval_order.extend(first_new..self.bones.len());
        self.final_bone_transforms
            .resize(self.bones.len(), Mat4::IDENTITY);

        log::debug!(
            "Loaded {} mesh bones ({} new, {} total)",
            mesh_bones.len(),
            self.bones.len() - first_new,
            self.bones.len()
        );
        Ok(())
    }

    /// Resolves name-based child → parent edges into parent indices.
    ///
    /// Edges naming a node that is not a bone are ignored. Exactly one bone
    /// must remain without a parent; its name is returned. On error the
    /// skeleton is left unchanged.
    pub fn set_parent_links<S: BuildHasher>(
        &mut self,
        child_to_parent: &HashMap<String, String, S>,
    ) -> Result<String> {
        let mut parents = vec![None; self.bones.len()];

        for (child, parent) in child_to_parent {
            match (self.name_to_index.get(child), self.name_to_index.get(parent)) {
                (Some(&c), Some(&p)) => parents[c] = Some(p),
                _ => log::trace!("Ignoring non-skeletal link '{child}' -> '{parent}'"),
            }
        }

        let (root, eval_order) = Self::evaluation_order(&parents)?;

        for (bone, parent) in self.bones.iter_mut().zip(parents) {
            bone.parent = parent;
        }
        self.eval_order = eval_order;
        self.root = Some(root);

        let root_name = self.bones[root].name.clone();
        log::debug!(
            "Linked skeleton of {} bones, root '{root_name}'",
            self.bones.len()
        );
        Ok(root_name)
    }

    /// Topologically sorts bones so each parent precedes its children.
    fn evaluation_order(parents: &[Option<usize>]) -> Result<(usize, Vec<usize>)> {
        let roots: Vec<usize> = parents
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.is_none().then_some(i))
            .collect();

        let root = match roots.as_slice() {
            [root] => *root,
            [] => {
                return Err(AnimationError::MalformedSkeleton(if parents.is_empty() {
                    "skeleton has no bones".to_string()
                } else {
                    "no root bone, every bone has a parent".to_string()
                }));
            }
            many => {
                return Err(AnimationError::MalformedSkeleton(format!(
                    "{} root bones (indices {many:?}), expected exactly one",
                    many.len()
                )));
            }
        };

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); parents.len()];
        for (child, parent) in parents.iter().enumerate() {
            if let Some(p) = *parent {
                children[p].push(child);
            }
        }

        let mut order = Vec::with_capacity(parents.len());
        let mut queue = VecDeque::from([root]);
        while let Some(bone) = queue.pop_front() {
            order.push(bone);
            queue.extend(children[bone].iter().copied());
        }

        // With a single root, bones the walk never reached sit on a cycle
        if order.len() != parents.len() {
            let mut reached = vec![false; parents.len()];
            for &i in &order {
                reached[i] = true;
            }
            let cyclic = reached.iter().position(|r| !r).unwrap_or_default();
            return Err(AnimationError::MalformedSkeleton(format!(
                "parent links contain a cycle through bone {cyclic}"
            )));
        }

        Ok((root, order))
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Evaluates `clip` at `time` and rebuilds every final bone matrix.
    pub fn play_single(
        &mut self,
        clip: &AnimationClip,
        time: f32,
        time_normalized: bool,
        root_transform: Mat4,
    ) {
        self.evaluate(root_transform, |name| {
            sample_or_identity(clip, name, time, time_normalized)
        });
    }

    /// Blends two clips sampled at the same normalized time.
    ///
    /// `weight` 0 is pure `clip_a`, 1 is pure `clip_b`. A channel missing
    /// from one clip contributes an identity pose on that side only.
    pub fn blend_linear(
        &mut self,
        clip_a: &AnimationClip,
        clip_b: &AnimationClip,
        normalized_time: f32,
        weight: f32,
        root_transform: Mat4,
    ) -> Result<()> {
        if !(0.0..=1.0).contains(&weight) {
            return Err(AnimationError::InvalidBlendWeight(weight));
        }

        self.evaluate(root_transform, |name| {
            let a = sample_or_identity(clip_a, name, normalized_time, true);
            let b = sample_or_identity(clip_b, name, normalized_time, true);
            a.blend(&b, weight)
        });
        Ok(())
    }

    /// Plays `clip_a`, cross-fades into `clip_b` starting at `begin_seconds`
    /// until `clip_a` ends, then plays `clip_b`.
    ///
    /// `elapsed_seconds` loops over `begin_seconds + clip_b.total_seconds()`
    /// and must be finite.
    pub fn transition(
        &mut self,
        clip_a: &AnimationClip,
        clip_b: &AnimationClip,
        elapsed_seconds: f32,
        begin_seconds: f32,
        root_transform: Mat4,
    ) -> Result<TransitionPhase> {
        if !elapsed_seconds.is_finite() {
            return Err(AnimationError::InvalidPlaybackTime(elapsed_seconds));
        }
        let a_seconds = clip_a.total_seconds();
        if !begin_seconds.is_finite() || begin_seconds < 0.0 || begin_seconds > a_seconds {
            return Err(AnimationError::InvalidTransitionWindow {
                begin: begin_seconds,
                duration: a_seconds,
            });
        }

        let period = begin_seconds + clip_b.total_seconds();
        let elapsed = elapsed_seconds.rem_euclid(period);

        if elapsed <= begin_seconds {
            self.play_single(clip_a, clip_a.normalized_time(elapsed), true, root_transform);
            return Ok(TransitionPhase::ClipA);
        }

        let b_elapsed = elapsed - begin_seconds;
        if elapsed > a_seconds {
            self.play_single(clip_b, clip_b.normalized_time(b_elapsed), true, root_transform);
            return Ok(TransitionPhase::ClipB);
        }

        let weight = b_elapsed / (a_seconds - begin_seconds);
        let a_time = clip_a.normalized_time(elapsed);
        let b_time = clip_b.normalized_time(b_elapsed);

        self.evaluate(root_transform, |name| {
            let a = sample_or_identity(clip_a, name, a_time, true);
            let b = sample_or_identity(clip_b, name, b_time, true);
            a.blend(&b, weight)
        });
        Ok(TransitionPhase::Blending { weight })
    }

    /// One full pass: local poses from `sample_local`, composed top-down,
    /// then multiplied by each bone's offset.
    fn evaluate<F>(&mut self, root_transform: Mat4, mut sample_local: F)
    where
        F: FnMut(&str) -> BonePose,
    {
        let Self {
            bones,
            eval_order,
            final_bone_transforms,
            ..
        } = self;

        for &i in eval_order.iter() {
            let local = sample_local(&bones[i].name).to_matrix();
            let parent_world = match bones[i].parent {
                Some(p) => bones[p].world,
                None => root_transform,
            };
            bones[i].world = parent_world * local;
        }

        final_bone_transforms.clear();
        final_bone_transforms.extend(bones.iter().map(|b| b.world * b.offset));
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    #[must_use]
    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.bone_index(name).map(|i| &self.bones[i])
    }

    /// The root bone, known once the hierarchy has been linked.
    #[must_use]
    pub fn root_bone(&self) -> Option<&Bone> {
        self.root.map(|i| &self.bones[i])
    }

    /// Parent-before-child evaluation order over bone indices.
    #[must_use]
    pub fn evaluation_order_indices(&self) -> &[usize] {
        &self.eval_order
    }

    /// Final skinning matrices in bone storage order.
    #[must_use]
    pub fn final_bone_transforms(&self) -> &[Mat4] {
        &self.final_bone_transforms
    }

    /// Final skinning matrices as raw bytes for buffer upload.
    #[must_use]
    pub fn final_bone_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.final_bone_transforms)
    }
}

fn sample_or_identity(clip: &AnimationClip, bone: &str, time: f32, normalized: bool) -> BonePose {
    match clip.sample_pose(bone, time, normalized) {
        Ok(pose) => pose,
        Err(err) => {
            log::trace!("{err}, using identity local transform");
            BonePose::IDENTITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::clip::Channel;
    use crate::animation::tracks::KeyframeTrack;
    use glam::Vec3;

    fn weights(vertex: usize) -> Vec<VertexWeight> {
        vec![VertexWeight { vertex, weight: 0.25 }]
    }

    fn mesh_bone(name: &str, vertices: &[usize]) -> MeshBone {
        MeshBone {
            name: name.to_string(),
            offset: Mat4::IDENTITY,
            weights: vertices
                .iter()
                .map(|&vertex| VertexWeight { vertex, weight: 0.25 })
                .collect(),
        }
    }

    fn links(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(c, p)| ((*c).to_string(), (*p).to_string()))
            .collect()
    }

    #[test]
    fn vertex_influences_fill_in_order() {
        let mut v = VertexInfluences::default();
        assert!(v.is_empty());
        for bone in 0..MAX_BONES_PER_VERTEX {
            assert!(v.push(bone, 0.25));
        }
        assert_eq!(v.len(), 4);
        assert!(!v.push(9, 0.1));
        assert_eq!(v.joints, [0, 1, 2, 3]);
    }

    #[test]
    fn bones_get_stable_indices_on_first_sight() {
        let mut skeleton = Skeleton::new();
        let mut verts = vec![VertexInfluences::default(); 3];
        skeleton
            .load_bones_from_mesh(&[mesh_bone("hip", &[0]), mesh_bone("knee", &[1])], &mut verts)
            .unwrap();

        let mut more = vec![VertexInfluences::default(); 2];
        let reused = MeshBone {
            name: "hip".into(),
            offset: Mat4::from_translation(Vec3::X),
            weights: weights(0),
        };
        skeleton
            .load_bones_from_mesh(&[reused, mesh_bone("foot", &[1])], &mut more)
            .unwrap();

        assert_eq!(skeleton.bone_index("hip"), Some(0));
        assert_eq!(skeleton.bone_index("knee"), Some(1));
        assert_eq!(skeleton.bone_index("foot"), Some(2));
        // First sighting keeps its offset
        assert_eq!(skeleton.bone("hip").unwrap().offset, Mat4::IDENTITY);
        assert_eq!(more[0].joints[0], 0);
        assert_eq!(more[1].joints[0], 2);
        assert_eq!(skeleton.final_bone_transforms().len(), 3);
    }

    #[test]
    fn fifth_influence_is_an_error() {
        let mut skeleton = Skeleton::new();
        let mut verts = vec![VertexInfluences::default(); 1];
        let bones: Vec<MeshBone> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|n| mesh_bone(n, &[0]))
            .collect();
        let err = skeleton.load_bones_from_mesh(&bones, &mut verts).unwrap_err();
        assert_eq!(
            err,
            AnimationError::BoneOverflow {
                vertex: 0,
                bone: "e".into()
            }
        );
    }

    #[test]
    fn failed_mesh_load_leaves_skeleton_unchanged() {
        let mut skeleton = Skeleton::new();
        let mut first = vec![VertexInfluences::default(); 2];
        skeleton
            .load_bones_from_mesh(&[mesh_bone("root", &[0])], &mut first)
            .unwrap();

        let mut verts = vec![VertexInfluences::default(); 2];
        let crowded: Vec<MeshBone> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|n| mesh_bone(n, &[1, 0]))
            .collect();
        let err = skeleton.load_bones_from_mesh(&crowded, &mut verts).unwrap_err();
        assert!(matches!(err, AnimationError::BoneOverflow { vertex: 1, .. }));

        assert_eq!(skeleton.bone_count(), 1);
        assert_eq!(skeleton.bone_index("e"), None);
        assert_eq!(skeleton.evaluation_order_indices(), &[0]);
        assert_eq!(skeleton.final_bone_transforms().len(), 1);
        assert!(verts.iter().all(VertexInfluences::is_empty));

        // A later mesh still loads and every bone gets evaluated
        let mut ok = vec![VertexInfluences::default(); 1];
        skeleton
            .load_bones_from_mesh(&[mesh_bone("e", &[0])], &mut ok)
            .unwrap();
        skeleton
            .set_parent_links(&links(&[("e", "root")]))
            .unwrap();
        let lift = Channel::new("e").with_position(
            KeyframeTrack::new(vec![0.0], vec![Vec3::new(0.0, 3.0, 0.0)]).unwrap(),
        );
        let clip = AnimationClip::new("lift", 1.0, 1.0, vec![lift]).unwrap();
        skeleton.play_single(&clip, 0.0, true, Mat4::IDENTITY);

        assert_eq!(skeleton.final_bone_transforms().len(), 2);
        assert_eq!(ok[0].joints[0], 1);
        let e = skeleton.final_bone_transforms()[1];
        assert_eq!(e.w_axis.truncate(), Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn bad_vertex_late_in_mesh_registers_nothing() {
        let mut skeleton = Skeleton::new();
        let mut verts = vec![VertexInfluences::default(); 2];
        let err = skeleton
            .load_bones_from_mesh(&[mesh_bone("a", &[0]), mesh_bone("b", &[5])], &mut verts)
            .unwrap_err();
        assert!(matches!(err, AnimationError::IndexOutOfRange { index: 5, len: 2, .. }));
        assert!(skeleton.is_empty());
        assert!(verts[0].is_empty());
    }

    #[test]
    fn repeated_name_within_a_mesh_shares_one_bone() {
        let mut skeleton = Skeleton::new();
        let mut verts = vec![VertexInfluences::default(); 2];
        skeleton
            .load_bones_from_mesh(
                &[mesh_bone("a", &[0]), mesh_bone("b", &[1]), mesh_bone("a", &[1])],
                &mut verts,
            )
            .unwrap();
        assert_eq!(skeleton.bone_count(), 2);
        assert_eq!(verts[1].joints, [1, 0, -1, -1]);
        assert_eq!(skeleton.evaluation_order_indices(), &[0, 1]);
    }

    #[test]
    fn vertex_out_of_range_is_an_error() {
        let mut skeleton = Skeleton::new();
        let mut verts = vec![VertexInfluences::default(); 1];
        let err = skeleton
            .load_bones_from_mesh(&[mesh_bone("a", &[3])], &mut verts)
            .unwrap_err();
        assert!(matches!(err, AnimationError::IndexOutOfRange { index: 3, len: 1, .. }));
    }

    #[test]
    fn parent_links_produce_topological_order() {
        // Storage order deliberately puts children before parents
        let mut skeleton = Skeleton::new();
        let mut verts = vec![VertexInfluences::default(); 1];
        skeleton
            .load_bones_from_mesh(
                &[mesh_bone("hand", &[]), mesh_bone("arm", &[]), mesh_bone("spine", &[0])],
                &mut verts,
            )
            .unwrap();

        let root = skeleton
            .set_parent_links(&links(&[
                ("hand", "arm"),
                ("arm", "spine"),
                ("spine", "Armature"),
                ("Armature", "Scene"),
            ]))
            .unwrap();

        assert_eq!(root, "spine");
        assert_eq!(skeleton.root_bone().unwrap().name, "spine");
        assert_eq!(skeleton.evaluation_order_indices(), &[2, 1, 0]);
        assert_eq!(skeleton.bones()[0].parent, Some(1));
    }

    #[test]
    fn two_roots_are_malformed() {
        let mut skeleton = Skeleton::new();
        let mut verts = vec![VertexInfluences::default(); 1];
        skeleton
            .load_bones_from_mesh(&[mesh_bone("a", &[]), mesh_bone("b", &[])], &mut verts)
            .unwrap();
        let err = skeleton.set_parent_links(&links(&[])).unwrap_err();
        assert!(matches!(err, AnimationError::MalformedSkeleton(_)));
        // Failed linking leaves the skeleton untouched
        assert!(skeleton.root_bone().is_none());
    }

    #[test]
    fn cycle_is_malformed() {
        let bones = vec![
            Bone::new("root", Mat4::IDENTITY, None),
            Bone::new("a", Mat4::IDENTITY, Some(2)),
            Bone::new("b", Mat4::IDENTITY, Some(1)),
        ];
        let err = Skeleton::from_bones(bones).unwrap_err();
        assert!(matches!(err, AnimationError::MalformedSkeleton(_)));
    }

    #[test]
    fn self_parent_is_malformed() {
        let bones = vec![
            Bone::new("root", Mat4::IDENTITY, None),
            Bone::new("loop", Mat4::IDENTITY, Some(1)),
        ];
        assert!(Skeleton::from_bones(bones).is_err());
    }

    #[test]
    fn from_bones_checks_parent_range() {
        let bones = vec![
            Bone::new("root", Mat4::IDENTITY, None),
            Bone::new("a", Mat4::IDENTITY, Some(7)),
        ];
        assert!(matches!(
            Skeleton::from_bones(bones),
            Err(AnimationError::IndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn unanimated_bones_follow_their_parent() {
        let mut skeleton = Skeleton::from_bones(vec![
            Bone::new("root", Mat4::IDENTITY, None),
            Bone::new("child", Mat4::IDENTITY, Some(0)),
        ])
        .unwrap();

        let root_channel = Channel::new("root").with_position(
            KeyframeTrack::new(vec![0.0], vec![Vec3::new(0.0, 2.0, 0.0)]).unwrap(),
        );
        let clip = AnimationClip::new("lift", 1.0, 1.0, vec![root_channel]).unwrap();

        skeleton.play_single(&clip, 0.0, true, Mat4::IDENTITY);

        let child = skeleton.final_bone_transforms()[1];
        assert_eq!(child.w_axis.truncate(), Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn blend_weight_is_validated() {
        let mut skeleton = Skeleton::from_bones(vec![Bone::new("root", Mat4::IDENTITY, None)]).unwrap();
        let clip = AnimationClip::new("idle", 1.0, 1.0, vec![]).unwrap();
        assert_eq!(
            skeleton.blend_linear(&clip, &clip, 0.0, 1.5, Mat4::IDENTITY),
            Err(AnimationError::InvalidBlendWeight(1.5))
        );
        assert!(skeleton.blend_linear(&clip, &clip, 0.0, f32::NAN, Mat4::IDENTITY).is_err());
    }

    #[test]
    fn non_finite_elapsed_time_is_rejected() {
        let mut skeleton = Skeleton::from_bones(vec![Bone::new("root", Mat4::IDENTITY, None)]).unwrap();
        let clip = AnimationClip::new("idle", 2.0, 1.0, vec![]).unwrap();
        for elapsed in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let err = skeleton
                .transition(&clip, &clip, elapsed, 1.0, Mat4::IDENTITY)
                .unwrap_err();
            assert!(matches!(err, AnimationError::InvalidPlaybackTime(_)));
        }
        assert!(skeleton.final_bone_transforms().iter().all(|m| m.is_finite()));
    }

    #[test]
    fn empty_skeleton_plays_nothing() {
        let mut skeleton = Skeleton::new();
        let clip = AnimationClip::new("idle", 1.0, 1.0, vec![]).unwrap();
        skeleton.play_single(&clip, 0.5, true, Mat4::IDENTITY);
        assert!(skeleton.final_bone_transforms().is_empty());
        assert!(skeleton.final_bone_bytes().is_empty());
    }

    #[test]
    fn final_bytes_cover_all_matrices() {
        let mut skeleton = Skeleton::from_bones(vec![
            Bone::new("root", Mat4::IDENTITY, None),
            Bone::new("child", Mat4::IDENTITY, Some(0)),
        ])
        .unwrap();
        let clip = AnimationClip::new("idle", 1.0, 1.0, vec![]).unwrap();
        skeleton.play_single(&clip, 0.0, true, Mat4::IDENTITY);
        assert_eq!(skeleton.final_bone_bytes().len(), 2 * 16 * 4);
    }
}
