use crate::animation::{ActionId, AnimationClip, AnimationMixer};
use crate::error::ViewerError;
use serde::Serialize;
use std::collections::HashMap;

/// Length of the blend when switching animations, in seconds.
pub const CROSS_FADE_SECONDS: f32 = 1.0;

/// Named actions of one character plus the one currently playing.
pub struct AnimationHolder {
    mixer: AnimationMixer,
    actions: HashMap<String, ActionId>,
    names: Vec<String>,
    current: ActionId,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionSnapshot {
    pub name: String,
    pub time: f32,
    pub weight: f32,
    pub running: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnimationSnapshot {
    pub current: String,
    pub actions: Vec<ActionSnapshot>,
}

impl AnimationHolder {
    /// Creates one action per clip and starts `initial`, or the first clip
    /// when no clip has that name.
    pub fn new(clips: &[AnimationClip], initial: &str) -> Result<Self, ViewerError> {
        let first = clips
            .first()
            .ok_or_else(|| ViewerError::new("empty-animation-set"))?;

        let mut mixer = AnimationMixer::new();
        let mut actions = HashMap::new();
        let mut names = Vec::new();
        for clip in clips {
            let id = mixer.clip_action(clip);
            if actions.insert(clip.name.clone(), id).is_none() {
                names.push(clip.name.clone());
            }
        }

        let current = match actions.get(initial) {
            Some(&id) => id,
            None => {
                log::warn!(
                    "No '{}' animation, starting with '{}' instead",
                    initial,
                    first.name
                );
                actions[&first.name]
            }
        };
        if let Some(action) = mixer.action_mut(current) {
            action.play();
        }

        Ok(Self {
            mixer,
            actions,
            names,
            current,
        })
    }

    /// Switches to `name`: the new action restarts from zero and blends in
    /// over `CROSS_FADE_SECONDS` while the previous one blends out.
    /// Playing the current action again restarts it without a blend.
    pub fn play(&mut self, name: &str) -> Result<(), ViewerError> {
        let new_action = *self
            .actions
            .get(name)
            .ok_or_else(|| ViewerError::animation_not_found(name))?;
        let old_action = self.current;

        if let Some(action) = self.mixer.action_mut(new_action) {
            action.reset().play();
        }
        if old_action != new_action {
            self.mixer
                .cross_fade(old_action, new_action, CROSS_FADE_SECONDS)?;
        }

        self.current = new_action;
        log::debug!("Playing animation '{}'", name);
        Ok(())
    }

    pub fn update(&mut self, delta: f32) {
        self.mixer.update(delta);
    }

    pub fn current(&self) -> ActionId {
        self.current
    }

    pub fn current_name(&self) -> &str {
        self.mixer
            .action(self.current)
            .map(|a| a.name())
            .unwrap_or_default()
    }

    pub fn action(&self, name: &str) -> Option<ActionId> {
        self.actions.get(name).copied()
    }

    /// Action names in clip order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    pub fn stop_all(&mut self) {
        self.mixer.stop_all_action();
    }

    pub fn snapshot(&self) -> AnimationSnapshot {
        let actions = self
            .names
            .iter()
            .filter_map(|name| {
                let action = self.mixer.action(self.actions[name])?;
                Some(ActionSnapshot {
                    name: name.clone(),
                    time: action.time(),
                    weight: action.effective_weight(),
                    running: action.is_running(),
                })
            })
            .collect();

        AnimationSnapshot {
            current: self.current_name().to_string(),
            actions,
        }
    }
}
