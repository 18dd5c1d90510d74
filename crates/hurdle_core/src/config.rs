//! Runner tuning: every constant the simulation reads, in one structure.
//!
//! Nothing gameplay-shaped is hardcoded at use sites; the session takes a
//! `RunnerConfig` at construction, which keeps the simulation reusable and
//! lets the whole game be retuned from a JSON file. Validation is
//! intentionally strict at construction so simulation code can assume a
//! well-formed config without defensive branching.
//!
//! Defaults reproduce the canonical tuning (800x400 screen, jump -15,
//! gravity 0.8, scroll 5, spawn interval 90 ramping down to 30); a config
//! file only needs the fields it wants to override.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Width/height pair for a drawable body.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RunnerConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Height of the ground band at the bottom of the screen. The ground's
    /// top edge is `screen_height - ground_height`.
    pub ground_height: f32,
    pub actor_size: Size,
    pub obstacle_size: Size,
    /// Upward jump impulse. Negative because the y axis points down.
    pub jump_velocity: f32,
    /// Downward acceleration added to vertical velocity every tick.
    pub gravity: f32,
    /// Pixels per tick that obstacles travel leftward.
    pub scroll_speed: f32,
    /// Ticks between spawns at the start of a run.
    pub initial_spawn_interval: u32,
    /// Floor the spawn interval ramps down to and then holds.
    pub min_spawn_interval: u32,
    /// How many ticks the interval shrinks by per spawn.
    pub spawn_interval_step: u32,
    pub score_per_obstacle: u32,
    /// Fixed simulation rate in Hz.
    pub target_tick_rate: u32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 400.0,
            ground_height: 50.0,
            actor_size: Size {
                width: 40.0,
                height: 60.0,
            },
            obstacle_size: Size {
                width: 20.0,
                height: 40.0,
            },
            jump_velocity: -15.0,
            gravity: 0.8,
            scroll_speed: 5.0,
            initial_spawn_interval: 90,
            min_spawn_interval: 30,
            spawn_interval_step: 1,
            score_per_obstacle: 10,
            target_tick_rate: 60,
        }
    }
}

impl RunnerConfig {
    /// Top y of the ground band.
    pub fn ground_top(&self) -> f32 {
        self.screen_height - self.ground_height
    }

    /// Top-edge y of the actor while standing on the ground.
    pub fn actor_rest_y(&self) -> f32 {
        self.ground_top() - self.actor_size.height
    }

    /// Top-edge y at which obstacles spawn, sitting on the ground band.
    pub fn obstacle_spawn_y(&self) -> f32 {
        self.ground_top() - self.obstacle_size.height
    }

    /// Seconds per fixed simulation step.
    pub fn fixed_dt(&self) -> f64 {
        1.0 / f64::from(self.target_tick_rate)
    }

    /// Window dimensions in physical pixels.
    pub fn window_size(&self) -> (u32, u32) {
        (self.screen_width as u32, self.screen_height as u32)
    }

    pub fn validate(&self) -> Result<(), String> {
        check_positive("screen_width", self.screen_width)?;
        check_positive("screen_height", self.screen_height)?;
        check_positive("ground_height", self.ground_height)?;
        check_positive("actor_size.width", self.actor_size.width)?;
        check_positive("actor_size.height", self.actor_size.height)?;
        check_positive("obstacle_size.width", self.obstacle_size.width)?;
        check_positive("obstacle_size.height", self.obstacle_size.height)?;
        check_positive("gravity", self.gravity)?;
        check_positive("scroll_speed", self.scroll_speed)?;

        if self.jump_velocity >= 0.0 {
            return Err(format!(
                "Config validation failed: jump_velocity must be negative (upward, y points down), got {}",
                self.jump_velocity
            ));
        }
        if self.ground_height + self.actor_size.height > self.screen_height {
            return Err(format!(
                "Config validation failed: actor_size.height {} does not fit above a {} ground band on a {} screen",
                self.actor_size.height, self.ground_height, self.screen_height
            ));
        }
        if self.ground_height + self.obstacle_size.height > self.screen_height {
            return Err(format!(
                "Config validation failed: obstacle_size.height {} does not fit above a {} ground band on a {} screen",
                self.obstacle_size.height, self.ground_height, self.screen_height
            ));
        }
        if self.initial_spawn_interval == 0 {
            return Err(
                "Config validation failed: initial_spawn_interval must be at least 1".to_string(),
            );
        }
        if self.min_spawn_interval == 0 {
            return Err(
                "Config validation failed: min_spawn_interval must be at least 1".to_string(),
            );
        }
        if self.min_spawn_interval >= self.initial_spawn_interval {
            return Err(format!(
                "Config validation failed: min_spawn_interval {} must be below initial_spawn_interval {}",
                self.min_spawn_interval, self.initial_spawn_interval
            ));
        }
        if self.score_per_obstacle == 0 {
            return Err(
                "Config validation failed: score_per_obstacle must be at least 1".to_string(),
            );
        }
        if self.target_tick_rate == 0 {
            return Err(
                "Config validation failed: target_tick_rate must be at least 1".to_string(),
            );
        }

        Ok(())
    }
}

fn check_positive(field: &str, value: f32) -> Result<(), String> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(format!(
            "Config validation failed: {} must be positive, got {}",
            field, value
        ))
    }
}

/// Load and validate a runner config from a JSON file on disk.
///
/// Unspecified fields fall back to the defaults, so a tuning file can carry
/// just the overrides it cares about.
pub fn load_config_from_path(path: &Path) -> Result<RunnerConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {:?}: {}", path, e))?;
    let config: RunnerConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config file {:?}: {}", path, e))?;
    config.validate()?;
    Ok(config)
}

/// Polls a config file's mtime so tuning edits apply without a restart.
pub struct ConfigWatcher {
    path: PathBuf,
    last_modified: Option<SystemTime>,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_modified = modified_time(&path);
        Self {
            path,
            last_modified,
        }
    }

    /// True once per observed mtime change. A missing file reports no
    /// change until it appears.
    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.path);
        match current {
            Some(modified) if self.last_modified != Some(modified) => {
                self.last_modified = Some(modified);
                true
            }
            _ => false,
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "hurdle_config_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn default_config_validates() {
        RunnerConfig::default()
            .validate()
            .expect("canonical defaults must be valid");
    }

    #[test]
    fn canonical_derived_geometry() {
        let config = RunnerConfig::default();
        assert_eq!(config.ground_top(), 350.0);
        assert_eq!(config.actor_rest_y(), 290.0);
        assert_eq!(config.obstacle_spawn_y(), 310.0);
        assert!((config.fixed_dt() - 1.0 / 60.0).abs() < 1e-12);
        assert_eq!(config.window_size(), (800, 400));
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        let mut config = RunnerConfig::default();
        config.screen_width = 0.0;
        let err = config.validate().expect_err("zero width should fail");
        assert!(err.contains("screen_width"));

        let mut config = RunnerConfig::default();
        config.actor_size.height = -60.0;
        let err = config.validate().expect_err("negative height should fail");
        assert!(err.contains("actor_size.height"));
    }

    #[test]
    fn rejects_interval_floor_at_or_above_initial() {
        let mut config = RunnerConfig::default();
        config.min_spawn_interval = config.initial_spawn_interval;
        let err = config.validate().expect_err("floor == initial should fail");
        assert!(err.contains("min_spawn_interval"));

        config.min_spawn_interval = config.initial_spawn_interval + 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_wrong_sign_physics() {
        let mut config = RunnerConfig::default();
        config.jump_velocity = 15.0;
        let err = config.validate().expect_err("downward jump should fail");
        assert!(err.contains("jump_velocity"));

        let mut config = RunnerConfig::default();
        config.gravity = -0.8;
        let err = config.validate().expect_err("upward gravity should fail");
        assert!(err.contains("gravity"));
    }

    #[test]
    fn rejects_actor_that_cannot_fit_above_ground() {
        let mut config = RunnerConfig::default();
        config.actor_size.height = 380.0;
        let err = config.validate().expect_err("oversized actor should fail");
        assert!(err.contains("does not fit"));
    }

    #[test]
    fn load_config_from_path_parses_valid_file() {
        let path = temp_file_path("valid");
        let json = r#"
        {
          "screen_width": 800.0,
          "screen_height": 400.0,
          "ground_height": 50.0,
          "actor_size": { "width": 40.0, "height": 60.0 },
          "obstacle_size": { "width": 20.0, "height": 40.0 },
          "jump_velocity": -15.0,
          "gravity": 0.8,
          "scroll_speed": 5.0,
          "initial_spawn_interval": 90,
          "min_spawn_interval": 30,
          "spawn_interval_step": 1,
          "score_per_obstacle": 10,
          "target_tick_rate": 60
        }
        "#;

        fs::write(&path, json).expect("failed to write temp config file");
        let config = load_config_from_path(&path).expect("valid config should load");
        assert_eq!(config.initial_spawn_interval, 90);
        assert_eq!(config.actor_size.width, 40.0);
        assert_eq!(config.jump_velocity, -15.0);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_config_fills_missing_fields_from_defaults() {
        let path = temp_file_path("partial");
        fs::write(&path, r#"{ "gravity": 1.2 }"#).expect("failed to write temp config file");

        let config = load_config_from_path(&path).expect("partial config should load");
        assert_eq!(config.gravity, 1.2);
        assert_eq!(config.screen_width, 800.0);
        assert_eq!(config.min_spawn_interval, 30);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_config_rejects_invalid_values() {
        let path = temp_file_path("invalid");
        fs::write(&path, r#"{ "min_spawn_interval": 90 }"#)
            .expect("failed to write temp config file");

        let err = load_config_from_path(&path).expect_err("floor == initial should fail");
        assert!(err.contains("min_spawn_interval"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_config_reports_missing_file() {
        let path = temp_file_path("missing");
        let err = load_config_from_path(&path).expect_err("missing file should fail");
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn config_watcher_detects_newly_created_file() {
        let path = temp_file_path("watcher_create");
        let _ = fs::remove_file(&path);

        let mut watcher = ConfigWatcher::new(path.clone());
        assert!(!watcher.should_reload(), "missing file should not reload");

        fs::write(&path, r#"{ "gravity": 0.9 }"#).expect("failed to write temp config file");

        assert!(
            watcher.should_reload(),
            "creating file should trigger reload once"
        );
        assert!(
            !watcher.should_reload(),
            "without changes, second poll should not reload"
        );

        let _ = fs::remove_file(path);
    }
}
