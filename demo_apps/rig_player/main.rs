//! Plays a procedural tentacle rig headlessly and prints where its tip ends up.
//!
//! Runs each playback mode for a few simulated seconds at 60 fps. Set
//! `RUST_LOG=debug` to see loader output.

use glam::{Mat4, Quat, Vec3};
use myth_skeletal::assets::{
    AssetMatrix4, AssetQuaternion, AssetVector3, ImportedAnimation, ImportedBone, ImportedChannel,
    ImportedMesh, ImportedNode, ImportedScene, ImportedWeight, QuatKey, VectorKey,
};
use myth_skeletal::{
    AnimatedModel, BlendClips, LoopMode, PlaySingle, PlaybackClock, PlaybackParameters,
    PlaybackSettings, Skeleton, TransitionClips,
};

const SEGMENTS: usize = 6;
const SEGMENT_LENGTH: f32 = 0.5;
const FRAME_DT: f32 = 1.0 / 60.0;
const SECONDS_PER_MODE: f32 = 3.0;

fn segment_name(i: usize) -> String {
    format!("segment_{i}")
}

fn bind_height(i: usize) -> f32 {
    i as f32 * SEGMENT_LENGTH
}

/// Nested node chain, one node per segment, each one segment above its parent.
fn segment_nodes(i: usize) -> ImportedNode {
    let local = if i == 0 {
        Mat4::IDENTITY
    } else {
        Mat4::from_translation(Vec3::Y * SEGMENT_LENGTH)
    };
    let node = ImportedNode::new(segment_name(i), AssetMatrix4::from(local));
    if i + 1 < SEGMENTS {
        node.with_child(segment_nodes(i + 1))
    } else {
        node
    }
}

/// Two vertices per segment, the upper one shared with the next segment.
fn tentacle_mesh() -> ImportedMesh {
    let bones = (0..SEGMENTS)
        .map(|i| {
            let mut weights = vec![ImportedWeight {
                vertex_id: (i * 2) as u32,
                weight: 1.0,
            }];
            weights.push(ImportedWeight {
                vertex_id: (i * 2 + 1) as u32,
                weight: if i + 1 < SEGMENTS { 0.5 } else { 1.0 },
            });
            if i > 0 {
                weights.push(ImportedWeight {
                    vertex_id: (i * 2 - 1) as u32,
                    weight: 0.5,
                });
            }
            ImportedBone {
                name: segment_name(i),
                offset_matrix: AssetMatrix4::from(Mat4::from_translation(-Vec3::Y * bind_height(i))),
                weights,
            }
        })
        .collect();

    ImportedMesh {
        name: "tentacle".into(),
        vertex_count: SEGMENTS * 2,
        bones,
    }
}

/// Every segment rotates about `axis` with a per-segment phase lag.
fn wave_animation(name: &str, axis: Vec3, amplitude: f32, seconds: f64) -> ImportedAnimation {
    const TICKS_PER_SECOND: f64 = 30.0;
    const KEYS: usize = 16;
    let duration = seconds * TICKS_PER_SECOND;

    let channels = (0..SEGMENTS)
        .map(|i| {
            let rotation_keys = (0..=KEYS)
                .map(|k| {
                    let phase = k as f32 / KEYS as f32 * std::f32::consts::TAU;
                    let angle = (phase - i as f32 * 0.4).sin() * amplitude;
                    QuatKey {
                        time: duration * k as f64 / KEYS as f64,
                        value: AssetQuaternion::from(Quat::from_axis_angle(axis, angle)),
                    }
                })
                .collect();
            let rest = if i == 0 { 0.0 } else { SEGMENT_LENGTH };
            ImportedChannel {
                node_name: segment_name(i),
                position_keys: vec![VectorKey {
                    time: 0.0,
                    value: AssetVector3::new(0.0, rest, 0.0),
                }],
                rotation_keys,
                scaling_keys: Vec::new(),
            }
        })
        .collect();

    ImportedAnimation {
        name: name.into(),
        duration,
        ticks_per_second: TICKS_PER_SECOND,
        channels,
    }
}

fn build_scene() -> ImportedScene {
    let rig = ImportedNode::new(
        "Rig",
        AssetMatrix4::from(Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0))),
    )
    .with_child(segment_nodes(0));
    let body = ImportedNode::new("TentacleMesh", AssetMatrix4::IDENTITY).with_meshes(vec![0]);
    let root = ImportedNode::new("Scene", AssetMatrix4::IDENTITY)
        .with_child(rig)
        .with_child(body);

    ImportedScene {
        root,
        meshes: vec![tentacle_mesh()],
        animations: vec![
            wave_animation("sway", Vec3::Z, 0.35, 2.0),
            wave_animation("curl", Vec3::X, 0.6, 1.2),
        ],
    }
}

/// Model-space position of the tip vertex after skinning.
fn tip_position(bones: &[Mat4]) -> Vec3 {
    let tip = Vec3::Y * bind_height(SEGMENTS);
    bones
        .last()
        .map_or(tip, |m| m.transform_point3(tip))
}

fn run_mode(
    model: &mut AnimatedModel,
    mut params: PlaybackParameters,
    clock: &mut PlaybackClock,
) -> anyhow::Result<()> {
    let frames = (SECONDS_PER_MODE / FRAME_DT) as usize;
    let mut max_reach = 0.0_f32;

    for frame in 0..frames {
        clock.advance(FRAME_DT);
        let time = match params {
            PlaybackParameters::Transition(_) => clock.time,
            _ => clock.normalized(),
        };
        params.set_time(time);

        let bones = model.play(&params)?;
        let tip = tip_position(bones);
        max_reach = max_reach.max(tip.x.abs().max(tip.z.abs()));

        if frame % 30 == 0 {
            log::info!("{:?} t={time:.3} tip={tip:.3}", params.mode());
        }
    }

    println!("{:?}: {frames} frames, max sideways reach {max_reach:.3}", params.mode());
    if let Some(phase) = model.last_transition_phase() {
        println!("  last transition phase: {phase:?}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut model = AnimatedModel::from_scene(&build_scene())?;
    println!(
        "Loaded {} bones, clips: {:?} ({:?} s)",
        model.skeleton().map_or(0, Skeleton::bone_count),
        model.clip_names(),
        model.clip_durations()
    );

    let single = PlaybackParameters::Single(PlaySingle {
        clip: 0,
        normalized_time: 0.0,
    });
    let mut clock = PlaybackClock::new(model.timeline_seconds(&single)?, PlaybackSettings::default());
    run_mode(&mut model, single, &mut clock)?;

    let blend = PlaybackParameters::Blend(BlendClips {
        clip_a: 0,
        clip_b: 1,
        normalized_time: 0.0,
        weight: 0.5,
    });
    clock.reset(model.timeline_seconds(&blend)?);
    clock.settings = PlaybackSettings {
        time_scale: 1.5,
        loop_mode: LoopMode::PingPong,
    };
    run_mode(&mut model, blend, &mut clock)?;

    let transition = PlaybackParameters::Transition(TransitionClips {
        clip_a: 0,
        clip_b: 1,
        elapsed_seconds: 0.0,
        begin_seconds: model.clip_durations()[0] * 0.5,
    });
    clock.reset(model.timeline_seconds(&transition)?);
    clock.settings = PlaybackSettings::default();
    run_mode(&mut model, transition, &mut clock)?;

    let tentacle = model.vertex_influences(0).unwrap_or_default();
    let skinned = tentacle.iter().filter(|v| !v.is_empty()).count();
    println!("{skinned}/{} vertices skinned", tentacle.len());

    Ok(())
}
