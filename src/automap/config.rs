//! Named integer options, the way the console and config file see them.
//!
//! Every option is an `i32`; zero is off, anything else is on.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown automap option `{0}`")]
    Unknown(String),

    #[error("option `{name}` expects an integer, got `{value}`")]
    BadValue { name: String, value: String },

    #[error("expected `name=value`, got `{0}`")]
    MissingEquals(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutomapConfig {
    /// Turn the map so the player faces up.
    pub rotate: i32,
    /// Draw over the game view instead of a black background.
    pub overlay: i32,
    /// Colour secret sector boundaries.
    pub secrets: i32,
    /// Interpolate between tics.
    pub uncapped: i32,
    pub grid: i32,
    pub follow: i32,
    /// Show things without the cheat.
    pub things: i32,
    /// Show the spectator camera.
    pub spectator: i32,
}

impl Default for AutomapConfig {
    fn default() -> Self {
        Self {
            rotate: 0,
            overlay: 0,
            secrets: 0,
            uncapped: 1,
            grid: 0,
            follow: 1,
            things: 0,
            spectator: 0,
        }
    }
}

impl AutomapConfig {
    pub const NAMES: [&'static str; 8] = [
        "rotate",
        "overlay",
        "secrets",
        "uncapped",
        "grid",
        "follow",
        "things",
        "spectator",
    ];

    fn slot_mut(&mut self, name: &str) -> Option<&mut i32> {
        Some(match name {
            "rotate" => &mut self.rotate,
            "overlay" => &mut self.overlay,
            "secrets" => &mut self.secrets,
            "uncapped" => &mut self.uncapped,
            "grid" => &mut self.grid,
            "follow" => &mut self.follow,
            "things" => &mut self.things,
            "spectator" => &mut self.spectator,
            _ => return None,
        })
    }

    pub fn get(&self, name: &str) -> Result<i32, ConfigError> {
        Ok(match name {
            "rotate" => self.rotate,
            "overlay" => self.overlay,
            "secrets" => self.secrets,
            "uncapped" => self.uncapped,
            "grid" => self.grid,
            "follow" => self.follow,
            "things" => self.things,
            "spectator" => self.spectator,
            _ => return Err(ConfigError::Unknown(name.into())),
        })
    }

    pub fn set(&mut self, name: &str, value: i32) -> Result<(), ConfigError> {
        let slot = self
            .slot_mut(name)
            .ok_or_else(|| ConfigError::Unknown(name.into()))?;
        *slot = value;
        Ok(())
    }

    /// Flip an option between 0 and 1; returns the new state.
    pub fn toggle(&mut self, name: &str) -> Result<bool, ConfigError> {
        let on = self.get(name)? == 0;
        self.set(name, on as i32)?;
        Ok(on)
    }

    /// Apply a `name=value` override.
    pub fn apply(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| ConfigError::MissingEquals(assignment.into()))?;
        let (name, value) = (name.trim(), value.trim());
        let parsed = value.parse::<i32>().map_err(|_| ConfigError::BadValue {
            name: name.into(),
            value: value.into(),
        })?;
        self.set(name, parsed)
    }

    #[inline]
    pub fn rotate_on(&self) -> bool {
        self.rotate != 0
    }

    #[inline]
    pub fn overlay_on(&self) -> bool {
        self.overlay != 0
    }

    #[inline]
    pub fn follow_on(&self) -> bool {
        self.follow != 0
    }

    #[inline]
    pub fn grid_on(&self) -> bool {
        self.grid != 0
    }
}
