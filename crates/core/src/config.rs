//! Engine configuration
//!
//! Board size, palette, shape catalog, gravity ramp and input repeat timing, loaded
//! from TOML. Every field has a default, so a config file only lists what it changes:
//!
//! ```toml
//! [board]
//! columns = 12
//!
//! [pieces]
//! shapes = ["O", "I", "T"]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::factory::PieceFactory;
use crate::types::{
    ShapeKind, BASE_DROP_MS, DEFAULT_ARR_MS, DEFAULT_COLUMNS, DEFAULT_DAS_MS, DEFAULT_PALETTE,
    DEFAULT_ROWS, DROP_INTERVAL_MIN_MS, DROP_STEP_MS, LINES_PER_LEVEL, MAX_PALETTE_LEN,
    SOFT_DROP_REPEAT_MS,
};

/// Environment variable naming a config file to load instead of the default path
pub const CONFIG_ENV_VAR: &str = "BLOCKFALL_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub columns: u16,
    pub rows: u16,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
        }
    }
}

/// Ordered visual identifiers; cell value `n` refers to `colors[n - 1]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub colors: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PiecesConfig {
    pub shapes: Vec<ShapeKind>,
}

impl Default for PiecesConfig {
    fn default() -> Self {
        Self {
            shapes: ShapeKind::ALL.to_vec(),
        }
    }
}

/// Gravity and difficulty ramp, all in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub initial_drop_ms: u32,
    pub min_drop_ms: u32,
    pub drop_step_ms: u32,
    pub lines_per_level: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            initial_drop_ms: BASE_DROP_MS,
            min_drop_ms: DROP_INTERVAL_MIN_MS,
            drop_step_ms: DROP_STEP_MS,
            lines_per_level: LINES_PER_LEVEL,
        }
    }
}

/// Held-command repeat timing, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub das_ms: u32,
    pub arr_ms: u32,
    pub soft_drop_repeat_ms: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            das_ms: DEFAULT_DAS_MS,
            arr_ms: DEFAULT_ARR_MS,
            soft_drop_repeat_ms: SOFT_DROP_REPEAT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board: BoardConfig,
    pub palette: PaletteConfig,
    pub pieces: PiecesConfig,
    pub timing: TimingConfig,
    pub input: InputConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read, parse and validate a config file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `$BLOCKFALL_CONFIG` if set, otherwise from the user config directory
    /// if a file exists there, otherwise fall back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load_from_path(Path::new(&path));
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config dir>/blockfall/config.toml`, when the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("blockfall").join("config.toml"))
    }

    pub fn palette_len(&self) -> u8 {
        self.palette.colors.len().min(MAX_PALETTE_LEN) as u8
    }

    /// Check every constraint the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        let BoardConfig { columns, rows } = self.board;

        if columns == 0 || rows == 0 {
            return invalid(format!("board must be at least 1x1, got {columns}x{rows}"));
        }

        let colors = &self.palette.colors;
        if colors.is_empty() {
            return invalid("palette needs at least one color".into());
        }
        if colors.len() > MAX_PALETTE_LEN {
            return invalid(format!(
                "palette has {} colors, at most {MAX_PALETTE_LEN} are supported",
                colors.len()
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = colors.iter().find(|c| !seen.insert(c.as_str())) {
            return invalid(format!("palette color {dup:?} is listed twice"));
        }

        if self.pieces.shapes.is_empty() {
            return invalid("shape catalog is empty".into());
        }
        let spawn_x = PieceFactory::spawn_x(columns);
        for kind in &self.pieces.shapes {
            let width = kind.mask()[0].len() as i32;
            if spawn_x < 0 || spawn_x + width > columns as i32 {
                return invalid(format!(
                    "shape {} does not fit a board {columns} columns wide",
                    kind.as_str()
                ));
            }
        }

        let timing = &self.timing;
        if timing.min_drop_ms == 0 {
            return invalid("timing.min_drop_ms must be positive".into());
        }
        if timing.initial_drop_ms < timing.min_drop_ms {
            return invalid(format!(
                "timing.initial_drop_ms ({}) is below timing.min_drop_ms ({})",
                timing.initial_drop_ms, timing.min_drop_ms
            ));
        }
        if timing.lines_per_level == 0 {
            return invalid("timing.lines_per_level must be positive".into());
        }

        let input = &self.input;
        if input.arr_ms == 0 || input.soft_drop_repeat_ms == 0 {
            return invalid("input repeat periods must be positive".into());
        }

        Ok(())
    }
}
