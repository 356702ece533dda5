//! Game settings assembled from an optional TOML file and command-line flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use serde::Deserialize;
use tile_merge_core::GridSize;
use tile_merge_rendering::TransitionTimings;
use tile_merge_system_spawning::Config;

use crate::args::Args;

/// Fully resolved settings for a play session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) size: GridSize,
    pub(crate) seed: Option<u64>,
    pub(crate) spawning: Config,
    pub(crate) timings: TransitionTimings,
    pub(crate) animate: bool,
    pub(crate) color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            size: GridSize::default(),
            seed: None,
            spawning: Config::default(),
            timings: TransitionTimings::default(),
            animate: false,
            color: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    size: Option<u32>,
    seed: Option<u64>,
    four_probability: Option<f64>,
    pop_ms: Option<u64>,
    move_ms: Option<u64>,
    animate: Option<bool>,
    color: Option<bool>,
}

impl Settings {
    /// Resolves settings, letting command-line flags override file values.
    pub(crate) fn resolve(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => load_file(path)?,
            None => SettingsFile::default(),
        };
        Self::merge(file, args)
    }

    fn merge(file: SettingsFile, args: &Args) -> Result<Self> {
        let defaults = Self::default();

        let size = match args.size.or(file.size) {
            Some(size) => GridSize::new(size).context("invalid grid size")?,
            None => defaults.size,
        };
        let spawning = match args.four_probability.or(file.four_probability) {
            Some(probability) => {
                Config::new(probability).context("invalid spawning configuration")?
            }
            None => defaults.spawning,
        };
        let timings = TransitionTimings {
            pop: file
                .pop_ms
                .map_or(defaults.timings.pop, Duration::from_millis),
            movement: file
                .move_ms
                .map_or(defaults.timings.movement, Duration::from_millis),
        };

        Ok(Self {
            size,
            seed: args.seed.or(file.seed),
            spawning,
            timings,
            animate: args.animate || file.animate.unwrap_or(defaults.animate),
            color: !args.no_color && file.color.unwrap_or(defaults.color),
        })
    }
}

fn load_file(path: &Path) -> Result<SettingsFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file at {}", path.display()))?;
    parse_file(&contents)
        .with_context(|| format!("failed to parse settings file at {}", path.display()))
}

fn parse_file(contents: &str) -> Result<SettingsFile> {
    toml::from_str(contents).context("failed to parse settings toml contents")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let settings = Settings::merge(SettingsFile::default(), &Args::default())
            .expect("defaults are valid");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn flags_override_file_values() {
        let file = parse_file(
            "size = 5\nseed = 9\nfour_probability = 0.5\nmove_ms = 40\ncolor = false\n",
        )
        .expect("valid toml");
        let args = Args {
            size: Some(3),
            ..Args::default()
        };

        let settings = Settings::merge(file, &args).expect("valid settings");

        assert_eq!(settings.size.get(), 3);
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.spawning.four_probability(), 0.5);
        assert_eq!(settings.timings.movement, Duration::from_millis(40));
        assert_eq!(settings.timings.pop, TransitionTimings::default().pop);
        assert!(!settings.color);
    }

    #[test]
    fn invalid_values_are_reported() {
        let file = parse_file("size = 1\n").expect("valid toml");
        let error = Settings::merge(file, &Args::default()).expect_err("size 1 is invalid");
        assert!(format!("{error:#}").contains("grid size must be at least 2"));

        let args = Args {
            four_probability: Some(2.0),
            ..Args::default()
        };
        assert!(Settings::merge(SettingsFile::default(), &args).is_err());
    }

    #[test]
    fn oversized_grid_is_reported_before_allocation() {
        let file = parse_file("size = 100000\n").expect("valid toml");
        let error = Settings::merge(file, &Args::default()).expect_err("size is too large");
        assert!(format!("{error:#}").contains("grid size must be at most 16"));

        let args = Args {
            size: Some(100_000),
            ..Args::default()
        };
        assert!(Settings::merge(SettingsFile::default(), &args).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_file("speed = 3\n").is_err());
    }
}
