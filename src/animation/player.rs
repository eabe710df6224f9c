//! Runtime playback of an asset's animation clips

use glam::Mat4;

use super::AnimationClip;

/// Playback position of one track
#[derive(Clone, Copy, Debug, Default)]
struct TrackState {
    time: f32,
    playing: bool,
}

/// Plays every clip of one asset in lockstep.
///
/// The door uses this as a play-once, pause, resume, pause sequence, so
/// every operation applies to all tracks at once.
#[derive(Clone, Debug)]
pub struct AnimationPlayer {
    clips: Vec<AnimationClip>,
    states: Vec<TrackState>,
}

impl AnimationPlayer {
    /// Create a player with one stopped track per clip
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        let states = vec![TrackState::default(); clips.len()];
        Self { clips, states }
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Restart every track from the beginning
    pub fn play_all_once(&mut self) {
        for state in &mut self.states {
            state.time = 0.0;
            state.playing = true;
        }
    }

    /// Pause every track where it stands
    pub fn pause_all(&mut self) {
        for state in &mut self.states {
            state.playing = false;
        }
    }

    /// Resume every track that has not reached its end
    pub fn resume_all(&mut self) {
        for (state, clip) in self.states.iter_mut().zip(&self.clips) {
            if state.time < clip.duration() {
                state.playing = true;
            }
        }
    }

    /// True if any track is still advancing
    pub fn is_playing(&self) -> bool {
        self.states.iter().any(|s| s.playing)
    }

    /// Current time of each track
    pub fn times(&self) -> impl Iterator<Item = f32> + '_ {
        self.states.iter().map(|s| s.time)
    }

    /// Advance all playing tracks by the given time delta.
    ///
    /// Tracks rest on their final frame once they reach it.
    pub fn update(&mut self, delta_time: f32) {
        for (state, clip) in self.states.iter_mut().zip(&self.clips) {
            if !state.playing {
                continue;
            }
            state.time += delta_time;
            if state.time >= clip.duration() {
                state.time = clip.duration();
                state.playing = false;
            }
        }
    }

    /// Sample every track's local pose at its current time
    pub fn sample(&self) -> Vec<Mat4> {
        self.states
            .iter()
            .zip(&self.clips)
            .map(|(state, clip)| clip.sample(state.time))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::TransformKeyframe;
    use glam::{Quat, Vec3};

    fn player() -> AnimationPlayer {
        let clip = |name: &str, end: f32| {
            AnimationClip::new(name)
                .with_keyframe(TransformKeyframe::identity(0.0))
                .with_keyframe(TransformKeyframe::new(
                    end,
                    Vec3::X * end,
                    Quat::IDENTITY,
                    Vec3::ONE,
                ))
        };
        AnimationPlayer::new(vec![clip("left", 2.0), clip("right", 3.0)])
    }

    #[test]
    fn test_new_player_is_stopped() {
        let p = player();
        assert_eq!(p.times().count(), 2);
        assert!(!p.is_playing());
    }

    #[test]
    fn test_play_once_clamps_at_end() {
        let mut p = player();
        p.play_all_once();
        p.update(2.5);
        let times: Vec<f32> = p.times().collect();
        assert_eq!(times, vec![2.0, 2.5]);
        assert!(p.is_playing());
        p.update(1.0);
        assert!(!p.is_playing());
        let times: Vec<f32> = p.times().collect();
        assert_eq!(times, vec![2.0, 3.0]);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut p = player();
        p.play_all_once();
        p.update(1.0);
        p.pause_all();
        p.update(1.0);
        assert!(p.times().all(|t| (t - 1.0).abs() < 1e-5));

        p.resume_all();
        p.update(0.5);
        assert!(p.times().all(|t| (t - 1.5).abs() < 1e-5));
    }

    #[test]
    fn test_resume_skips_finished_tracks() {
        let mut p = player();
        p.play_all_once();
        p.update(2.0);
        p.pause_all();
        p.resume_all();
        p.update(0.5);
        let times: Vec<f32> = p.times().collect();
        assert_eq!(times, vec![2.0, 2.5]);
    }

    #[test]
    fn test_sample_follows_time() {
        let mut p = player();
        p.play_all_once();
        p.update(1.0);
        let poses = p.sample();
        assert_eq!(poses.len(), 2);
        assert!((poses[0].w_axis.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_player() {
        let mut p = AnimationPlayer::new(Vec::new());
        assert!(p.is_empty());
        p.play_all_once();
        p.update(1.0);
        assert!(p.sample().is_empty());
    }
}
