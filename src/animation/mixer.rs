use super::action::{ActionId, AnimationAction};
use super::clip::AnimationClip;
use crate::error::ViewerError;
use std::collections::HashMap;

/// Owns the actions of one animated object and advances them together.
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
    by_clip: HashMap<String, ActionId>,
}

impl AnimationMixer {
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            by_clip: HashMap::new(),
        }
    }

    /// Returns the action for `clip`, creating it on first use.
    pub fn clip_action(&mut self, clip: &AnimationClip) -> ActionId {
        if let Some(&id) = self.by_clip.get(&clip.name) {
            return id;
        }
        let id = ActionId(self.actions.len());
        self.actions.push(AnimationAction::new(clip.clone()));
        self.by_clip.insert(clip.name.clone(), id);
        id
    }

    pub fn action(&self, id: ActionId) -> Option<&AnimationAction> {
        self.actions.get(id.0)
    }

    pub fn action_mut(&mut self, id: ActionId) -> Option<&mut AnimationAction> {
        self.actions.get_mut(id.0)
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionId, &AnimationAction)> {
        self.actions
            .iter()
            .enumerate()
            .map(|(idx, action)| (ActionId(idx), action))
    }

    /// Fades `from` out and `to` in over the same `duration`.
    /// `from` keeps running until its weight reaches zero.
    pub fn cross_fade(
        &mut self,
        from: ActionId,
        to: ActionId,
        duration: f32,
    ) -> Result<(), ViewerError> {
        if from.0 >= self.actions.len() || to.0 >= self.actions.len() {
            return Err(ViewerError::new("action-not-found")
                .with_arg("from", from.0)
                .with_arg("to", to.0));
        }

        self.actions[from.0].fade_out(duration);
        self.actions[to.0].fade_in(duration);
        Ok(())
    }

    pub fn update(&mut self, delta: f32) {
        for action in &mut self.actions {
            action.advance(delta);
        }
    }

    pub fn stop_all_action(&mut self) {
        for action in &mut self.actions {
            action.stop();
        }
    }

    pub fn running_count(&self) -> usize {
        self.actions.iter().filter(|a| a.is_running()).count()
    }
}

impl Default for AnimationMixer {
    fn default() -> Self {
        Self::new()
    }
}
