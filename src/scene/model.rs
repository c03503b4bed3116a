use glam::Mat4;

use crate::animation::clip::AnimationClip;
use crate::animation::params::PlaybackParameters;
use crate::assets::import::ImportedScene;
use crate::assets::loader::{LoadedModel, load_scene};
use crate::errors::{AnimationError, Result};
use crate::scene::skeleton::{Skeleton, TransitionPhase, VertexInfluences};

/// A skinned model: its clips, its skeleton and the per-mesh skinning slots.
///
/// The model owns everything it plays; the render loop only borrows the final
/// bone matrices returned by [`AnimatedModel::play`].
#[derive(Debug, Clone, Default)]
pub struct AnimatedModel {
    clips: Vec<AnimationClip>,
    skeleton: Option<Skeleton>,
    vertex_influences: Vec<Vec<VertexInfluences>>,
    root_transform: Mat4,
    last_transition: Option<TransitionPhase>,
}

impl From<LoadedModel> for AnimatedModel {
    fn from(loaded: LoadedModel) -> Self {
        Self {
            clips: loaded.clips,
            skeleton: loaded.skeleton,
            vertex_influences: loaded.vertex_influences,
            root_transform: loaded.root_transform,
            last_transition: None,
        }
    }
}

impl AnimatedModel {
    /// Loads a model from an imported scene.
    pub fn from_scene(scene: &ImportedScene) -> Result<Self> {
        load_scene(scene).map(Self::from)
    }

    /// Assembles a model from parts built in code.
    #[must_use]
    pub fn from_parts(
        skeleton: Option<Skeleton>,
        clips: Vec<AnimationClip>,
        root_transform: Mat4,
    ) -> Self {
        Self {
            clips,
            skeleton,
            root_transform,
            ..Default::default()
        }
    }

    /// Evaluates one frame and returns the final bone matrices.
    pub fn play(&mut self, params: &PlaybackParameters) -> Result<&[Mat4]> {
        let skeleton = self.skeleton.as_mut().ok_or(AnimationError::NoSkeleton)?;
        let clips = &self.clips;
        let clip = |index: usize| {
            clips
                .get(index)
                .ok_or_else(|| AnimationError::index_out_of_range("animation clip", index, clips.len()))
        };

        match *params {
            PlaybackParameters::Single(p) => {
                skeleton.play_single(clip(p.clip)?, p.normalized_time, true, self.root_transform);
            }
            PlaybackParameters::Blend(p) => {
                skeleton.blend_linear(
                    clip(p.clip_a)?,
                    clip(p.clip_b)?,
                    p.normalized_time,
                    p.weight,
                    self.root_transform,
                )?;
            }
            PlaybackParameters::Transition(p) => {
                let phase = skeleton.transition(
                    clip(p.clip_a)?,
                    clip(p.clip_b)?,
                    p.elapsed_seconds,
                    p.begin_seconds,
                    self.root_transform,
                )?;
                self.last_transition = Some(phase);
            }
        }

        Ok(skeleton.final_bone_transforms())
    }

    /// Length in seconds of the timeline `params` plays over, for sizing a
    /// [`PlaybackClock`](crate::PlaybackClock).
    ///
    /// Single and Blend follow their leading clip. A transition runs from the
    /// start of clip A to the end of clip B.
    pub fn timeline_seconds(&self, params: &PlaybackParameters) -> Result<f32> {
        let seconds = |index: usize| {
            self.clips
                .get(index)
                .map(AnimationClip::total_seconds)
                .ok_or_else(|| {
                    AnimationError::index_out_of_range("animation clip", index, self.clips.len())
                })
        };

        for index in params.clip_indices() {
            seconds(index)?;
        }
        match *params {
            PlaybackParameters::Transition(p) => Ok(p.begin_seconds + seconds(p.clip_b)?),
            _ => seconds(params.leading_clip()),
        }
    }

    #[must_use]
    pub fn has_animation(&self) -> bool {
        !self.clips.is_empty()
    }

    #[must_use]
    pub fn clip_names(&self) -> Vec<&str> {
        self.clips.iter().map(AnimationClip::name).collect()
    }

    /// Clip durations in seconds, in clip order.
    #[must_use]
    pub fn clip_durations(&self) -> Vec<f32> {
        self.clips.iter().map(AnimationClip::total_seconds).collect()
    }

    #[must_use]
    pub fn clips(&self) -> &[AnimationClip] {
        &self.clips
    }

    #[must_use]
    pub fn clip_index(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.name() == name)
    }

    #[must_use]
    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.skeleton.as_ref()
    }

    /// Skinning slots of the mesh at `mesh` (scene mesh order).
    #[must_use]
    pub fn vertex_influences(&self, mesh: usize) -> Option<&[VertexInfluences]> {
        self.vertex_influences.get(mesh).map(Vec::as_slice)
    }

    #[must_use]
    pub fn root_transform(&self) -> Mat4 {
        self.root_transform
    }

    /// Phase of the most recent transition evaluation.
    #[must_use]
    pub fn last_transition_phase(&self) -> Option<TransitionPhase> {
        self.last_transition
    }

    /// Matrices from the last [`play`](Self::play), empty without a skeleton.
    #[must_use]
    pub fn final_bone_transforms(&self) -> &[Mat4] {
        self.skeleton
            .as_ref()
            .map(Skeleton::final_bone_transforms)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::params::{BlendClips, PlaySingle, TransitionClips};
    use crate::scene::skeleton::Bone;

    fn model() -> AnimatedModel {
        let skeleton = Skeleton::from_bones(vec![Bone::new("root", Mat4::IDENTITY, None)]).unwrap();
        let clips = vec![
            AnimationClip::new("idle", 30.0, 30.0, vec![]).unwrap(),
            AnimationClip::new("run", 15.0, 30.0, vec![]).unwrap(),
        ];
        AnimatedModel::from_parts(Some(skeleton), clips, Mat4::IDENTITY)
    }

    #[test]
    fn clip_listing() {
        let m = model();
        assert!(m.has_animation());
        assert_eq!(m.clip_names(), vec!["idle", "run"]);
        assert_eq!(m.clip_durations(), vec![1.0, 0.5]);
        assert_eq!(m.clip_index("run"), Some(1));
    }

    #[test]
    fn bad_clip_index_is_reported() {
        let mut m = model();
        let err = m
            .play(&PlaybackParameters::Single(PlaySingle {
                clip: 5,
                normalized_time: 0.0,
            }))
            .unwrap_err();
        assert_eq!(err, AnimationError::index_out_of_range("animation clip", 5, 2));
    }

    #[test]
    fn timeline_follows_the_playback_mode() {
        let m = model();
        let single = PlaybackParameters::Single(PlaySingle {
            clip: 1,
            normalized_time: 0.0,
        });
        assert_eq!(m.timeline_seconds(&single), Ok(0.5));

        let blend = PlaybackParameters::Blend(BlendClips {
            clip_a: 0,
            clip_b: 1,
            normalized_time: 0.0,
            weight: 0.5,
        });
        assert_eq!(m.timeline_seconds(&blend), Ok(1.0));

        let transition = PlaybackParameters::Transition(TransitionClips {
            clip_a: 0,
            clip_b: 1,
            elapsed_seconds: 0.0,
            begin_seconds: 0.75,
        });
        assert_eq!(m.timeline_seconds(&transition), Ok(1.25));
    }

    #[test]
    fn timeline_checks_every_referenced_clip() {
        let m = model();
        let blend = PlaybackParameters::Blend(BlendClips {
            clip_a: 0,
            clip_b: 3,
            normalized_time: 0.0,
            weight: 0.5,
        });
        assert_eq!(
            m.timeline_seconds(&blend),
            Err(AnimationError::index_out_of_range("animation clip", 3, 2))
        );
    }

    #[test]
    fn play_without_skeleton_fails() {
        let mut m = AnimatedModel::from_parts(None, vec![], Mat4::IDENTITY);
        assert!(!m.has_animation());
        assert_eq!(
            m.play(&PlaybackParameters::default()),
            Err(AnimationError::NoSkeleton)
        );
        assert!(m.final_bone_transforms().is_empty());
    }

    #[test]
    fn blend_forwards_weight_errors() {
        let mut m = model();
        let params = PlaybackParameters::Blend(BlendClips {
            clip_a: 0,
            clip_b: 1,
            normalized_time: 0.0,
            weight: -0.5,
        });
        assert_eq!(m.play(&params), Err(AnimationError::InvalidBlendWeight(-0.5)));
    }
}
