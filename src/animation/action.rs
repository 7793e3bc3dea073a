// Playable clip instance with weight fading

use super::clip::AnimationClip;
use serde::{Deserialize, Serialize};

/// Handle to an action owned by an `AnimationMixer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub(crate) usize);

/// Linear weight ramp, advanced with the action's own time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightFade {
    pub from: f32,
    pub to: f32,
    pub elapsed: f32,
    pub duration: f32,
}

impl WeightFade {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn is_fade_out(&self) -> bool {
        self.to < self.from
    }
}

#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: AnimationClip,
    time: f32,
    weight: f32,
    enabled: bool,
    running: bool,
    fade: Option<WeightFade>,
}

impl AnimationAction {
    pub fn new(clip: AnimationClip) -> Self {
        Self {
            clip,
            time: 0.0,
            weight: 1.0,
            enabled: true,
            running: false,
            fade: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.clip.name
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn fade(&self) -> Option<&WeightFade> {
        self.fade.as_ref()
    }

    /// Weight this action contributes to the blend right now.
    pub fn effective_weight(&self) -> f32 {
        if !self.enabled || !self.running {
            return 0.0;
        }
        match &self.fade {
            Some(fade) => fade.value(),
            None => self.weight,
        }
    }

    /// Rewinds to time zero at full weight and drops any pending fade.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.weight = 1.0;
        self.enabled = true;
        self.fade = None;
        self
    }

    pub fn play(&mut self) -> &mut Self {
        self.enabled = true;
        self.running = true;
        self
    }

    pub fn stop(&mut self) -> &mut Self {
        self.running = false;
        self.fade = None;
        self
    }

    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.fade = Some(WeightFade::new(0.0, 1.0, duration));
        self
    }

    /// Ramps the weight down to zero; the action stops once the ramp ends.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.fade = Some(WeightFade::new(1.0, 0.0, duration));
        self
    }

    pub(crate) fn advance(&mut self, delta: f32) {
        if !self.running {
            return;
        }

        self.time += delta;
        let duration = self.clip.duration;
        if duration <= 0.0 {
            self.time = 0.0;
        } else if self.time >= duration {
            self.time = self.time.rem_euclid(duration);
        }

        if let Some(fade) = &mut self.fade {
            fade.elapsed += delta;
            if fade.is_finished() {
                self.weight = fade.to;
                let faded_out = fade.is_fade_out();
                self.fade = None;
                if faded_out {
                    self.enabled = false;
                    self.running = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> AnimationAction {
        AnimationAction::new(AnimationClip::new("walk", 2.0))
    }

    #[test]
    fn idle_action_contributes_nothing() {
        let action = walk();
        assert!(!action.is_running());
        assert_eq!(action.effective_weight(), 0.0);
    }

    #[test]
    fn repeat_wraps_time() {
        let mut action = walk();
        action.play();
        action.advance(2.5);
        assert!((action.time() - 0.5).abs() < 1e-6);
        assert!(action.is_running());
    }

    #[test]
    fn fade_in_ramps_weight() {
        let mut action = walk();
        action.reset().play().fade_in(1.0);
        assert_eq!(action.effective_weight(), 0.0);
        action.advance(0.25);
        assert!((action.effective_weight() - 0.25).abs() < 1e-6);
        action.advance(1.0);
        assert_eq!(action.effective_weight(), 1.0);
        assert!(action.fade().is_none());
    }

    #[test]
    fn fade_out_keeps_playing_until_done() {
        let mut action = walk();
        action.play().fade_out(1.0);
        action.advance(0.5);
        assert!(action.is_running());
        assert!((action.effective_weight() - 0.5).abs() < 1e-6);
        action.advance(0.5);
        assert!(!action.is_running());
        assert!(!action.is_enabled());
    }

    #[test]
    fn reset_rewinds_and_clears_fade() {
        let mut action = walk();
        action.play().fade_out(1.0);
        action.advance(0.75);
        action.reset();
        assert_eq!(action.time(), 0.0);
        assert!(action.fade().is_none());
        assert_eq!(action.weight(), 1.0);
    }

    #[test]
    fn zero_length_clip_stays_at_start() {
        let mut action = AnimationAction::new(AnimationClip::new("pose", 0.0));
        action.play();
        action.advance(0.3);
        assert_eq!(action.time(), 0.0);
    }
}
