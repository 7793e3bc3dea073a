// Clip playback and cross-fading

pub mod action;
pub mod clip;
pub mod mixer;

pub use action::ActionId;
pub use clip::AnimationClip;
pub use mixer::AnimationMixer;
