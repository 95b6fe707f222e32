//! Session configuration.

use crate::error::{SessionError, SessionResult};
use inkcanvas_core::clock::Duration;
use inkcanvas_core::{Color, DEFAULT_FILL_TOLERANCE, MAX_HISTORY, ToolKind, ToolSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for a drawing session. Every field has a default, so a config
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial surface width in pixels.
    pub width: u32,
    /// Initial surface height in pixels.
    pub height: u32,
    pub history_debounce_ms: u64,
    pub resize_debounce_ms: u64,
    /// Color distance under which neighbouring pixels join a fill.
    pub fill_tolerance: f64,
    /// Oldest history entries are dropped beyond this many.
    pub max_history: usize,
    /// Queue pops one fill may perform. Defaults to the canvas area.
    pub max_fill_iterations: Option<usize>,
    pub initial_tool: ToolKind,
    pub initial_color: String,
    pub initial_width: f64,
    pub initial_font_size: f64,
    /// TTF/OTF font used for text objects.
    pub font_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            history_debounce_ms: 150,
            resize_debounce_ms: 150,
            fill_tolerance: DEFAULT_FILL_TOLERANCE,
            max_history: MAX_HISTORY,
            max_fill_iterations: None,
            initial_tool: ToolKind::Pen,
            initial_color: "#000000".to_string(),
            initial_width: 5.0,
            initial_font_size: 16.0,
            font_path: None,
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> SessionResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SessionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> SessionResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> SessionResult<()> {
        if !(self.initial_width.is_finite() && self.initial_width > 0.0) {
            return Err(SessionError::Config(format!(
                "initial_width must be positive, got {}",
                self.initial_width
            )));
        }
        if !(self.initial_font_size.is_finite() && self.initial_font_size > 0.0) {
            return Err(SessionError::Config(format!(
                "initial_font_size must be positive, got {}",
                self.initial_font_size
            )));
        }
        if !(self.fill_tolerance.is_finite() && self.fill_tolerance >= 0.0) {
            return Err(SessionError::Config(format!(
                "fill_tolerance must not be negative, got {}",
                self.fill_tolerance
            )));
        }
        if self.max_history == 0 {
            return Err(SessionError::Config("max_history must be at least 1".to_string()));
        }
        if self.max_fill_iterations == Some(0) {
            return Err(SessionError::Config(
                "max_fill_iterations must be at least 1".to_string(),
            ));
        }
        Color::parse(&self.initial_color)
            .map_err(|e| SessionError::Config(e.to_string()))?;
        Ok(())
    }

    /// Tool settings a new session starts with.
    pub fn tool_settings(&self) -> SessionResult<ToolSettings> {
        let color = Color::parse(&self.initial_color)
            .map_err(|e| SessionError::Config(e.to_string()))?;
        Ok(ToolSettings {
            tool: self.initial_tool,
            color,
            width: self.initial_width,
            font_size: self.initial_font_size,
        })
    }

    pub fn history_debounce(&self) -> Duration {
        Duration::from_millis(self.history_debounce_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
