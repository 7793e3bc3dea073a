// Debug-panel seam: world objects report to an observer, the panel answers with commands

/// Receives what world objects expose for live tweaking.
pub trait DebugObserver {
    fn actions_available(&mut self, folder: &str, names: &[String]);

    fn current_changed(&mut self, folder: &str, name: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugCommand {
    Play { folder: String, name: String },
    CopySnapshot { folder: String },
    ResetCamera,
}
