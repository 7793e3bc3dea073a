pub mod canvas;
pub mod handler;

use crate::settings::Settings;
use std::path::PathBuf;

/// Command line: `foxview-rs [--debug] [model.gltf]`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    pub debug: bool,
    pub model_path: Option<PathBuf>,
}

impl CliArgs {
    /// Parses arguments without the program name.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut cli = CliArgs::default();
        for arg in args {
            match arg.as_str() {
                "--debug" | "-d" => cli.debug = true,
                flag if flag.starts_with('-') => log::warn!("Ignoring unknown flag {}", flag),
                _ => cli.model_path = Some(PathBuf::from(arg)),
            }
        }
        cli
    }

    /// Overrides persisted settings with what was given on the command line.
    pub fn apply(&self, settings: &mut Settings) {
        if self.debug {
            settings.viewer.debug = true;
        }
        if let Some(path) = &self.model_path {
            settings.viewer.model_path = path.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> CliArgs {
        CliArgs::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn empty_command_line_keeps_defaults() {
        assert_eq!(args(&[]), CliArgs::default());
    }

    #[test]
    fn debug_flag_and_model_path() {
        let cli = args(&["--debug", "models/Fox.glb"]);
        assert!(cli.debug);
        assert_eq!(cli.model_path, Some(PathBuf::from("models/Fox.glb")));
    }

    #[test]
    fn unknown_flags_are_skipped() {
        let cli = args(&["--verbose", "fox.gltf"]);
        assert!(!cli.debug);
        assert_eq!(cli.model_path, Some(PathBuf::from("fox.gltf")));
    }

    #[test]
    fn apply_overrides_settings() {
        let mut settings = Settings::default();
        args(&["-d", "other.gltf"]).apply(&mut settings);
        assert!(settings.viewer.debug);
        assert_eq!(settings.viewer.model_path, PathBuf::from("other.gltf"));

        let mut untouched = Settings::default();
        args(&[]).apply(&mut untouched);
        assert!(!untouched.viewer.debug);
    }
}
