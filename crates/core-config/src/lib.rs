//! Configuration loading and parsing.
//!
//! Parses `quire.toml` (or an override path provided by the binary). Every
//! field is optional; absent sections fall back to defaults. A file that fails
//! to parse is reported at `warn!` and replaced by defaults so a typo never
//! prevents the editor from starting.
//!
//! Some values depend on the viewport the editor is laid out in (a caret wider
//! than the viewport makes no sense). The raw parsed values are retained and
//! `Config::apply_context` derives the effective, clamped values; it can be
//! re-run on every resize.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const MAX_CARET_WIDTH: u16 = 8;
pub const MAX_BLINKS_PER_SECOND: u16 = 10;
pub const MIN_QUEUE_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl ConfigContext {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            viewport_width,
            viewport_height,
        }
    }
}

/// Horizontal alignment of each visual line inside the viewport.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentSetting {
    #[default]
    Start,
    Middle,
    End,
}

/// Modifier that turns Enter into Submit.
#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModifierSetting {
    #[default]
    Shift,
    Ctrl,
    Alt,
    Meta,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EditorSection {
    #[serde(default)]
    pub single_line: bool,
    #[serde(default = "EditorSection::default_submit")]
    pub submit: bool,
    #[serde(default)]
    pub submit_modifier: ModifierSetting,
    #[serde(default)]
    pub alignment: AlignmentSetting,
}

impl Default for EditorSection {
    fn default() -> Self {
        Self {
            single_line: false,
            submit: Self::default_submit(),
            submit_modifier: ModifierSetting::default(),
            alignment: AlignmentSetting::default(),
        }
    }
}

impl EditorSection {
    // Notebook input cells evaluate on shift-enter.
    const fn default_submit() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaretSection {
    #[serde(default = "CaretSection::default_width")]
    pub width: u16,
    #[serde(default = "CaretSection::default_blinks_per_second")]
    pub blinks_per_second: u16,
    #[serde(default = "CaretSection::default_max_blink_ms")]
    pub max_blink_ms: u64,
}

impl Default for CaretSection {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            blinks_per_second: Self::default_blinks_per_second(),
            max_blink_ms: Self::default_max_blink_ms(),
        }
    }
}

impl CaretSection {
    const fn default_width() -> u16 {
        1
    }
    const fn default_blinks_per_second() -> u16 {
        1
    }
    const fn default_max_blink_ms() -> u64 {
        10_000
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GestureSection {
    /// Maximum finger travel (px) for a touch press/release to count as a click.
    #[serde(default = "GestureSection::default_touch_slop")]
    pub touch_slop: f32,
    /// Release velocity (px/s) below which no fling starts.
    #[serde(default = "GestureSection::default_fling_min_velocity")]
    pub fling_min_velocity: f32,
    /// Exponential decay rate of fling velocity (1/s).
    #[serde(default = "GestureSection::default_fling_decay")]
    pub fling_decay: f32,
}

impl Default for GestureSection {
    fn default() -> Self {
        Self {
            touch_slop: Self::default_touch_slop(),
            fling_min_velocity: Self::default_fling_min_velocity(),
            fling_decay: Self::default_fling_decay(),
        }
    }
}

impl GestureSection {
    const fn default_touch_slop() -> f32 {
        8.0
    }
    const fn default_fling_min_velocity() -> f32 {
        50.0
    }
    const fn default_fling_decay() -> f32 {
        4.0
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventsSection {
    #[serde(default = "EventsSection::default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for EventsSection {
    fn default() -> Self {
        Self {
            queue_capacity: Self::default_queue_capacity(),
        }
    }
}

impl EventsSection {
    const fn default_queue_capacity() -> usize {
        256
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorSection,
    #[serde(default)]
    pub caret: CaretSection,
    #[serde(default)]
    pub gesture: GestureSection,
    #[serde(default)]
    pub events: EventsSection,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub effective_caret_width: u16,
    pub effective_blinks_per_second: u16,
    pub effective_queue_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(None, ConfigFile::default())
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("quire.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("quire").join("quire.toml");
    }
    PathBuf::from("quire.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config::from_file(Some(content), file)),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

/// Parse configuration from an in-memory TOML string.
pub fn from_str(content: &str) -> Result<Config> {
    let file = toml::from_str::<ConfigFile>(content)?;
    Ok(Config::from_file(Some(content.to_string()), file))
}

impl Config {
    fn from_file(raw: Option<String>, file: ConfigFile) -> Self {
        let mut cfg = Self {
            raw,
            effective_caret_width: file.caret.width,
            effective_blinks_per_second: file.caret.blinks_per_second,
            effective_queue_capacity: file.events.queue_capacity,
            file,
        };
        cfg.clamp_static();
        cfg
    }

    /// Clamp values that do not depend on the viewport.
    fn clamp_static(&mut self) {
        let raw = self.file.caret.blinks_per_second;
        let clamped = raw.clamp(1, MAX_BLINKS_PER_SECOND);
        if clamped != raw {
            info!(target: "config", raw, clamped, max = MAX_BLINKS_PER_SECOND, "blink_rate_clamped");
        }
        self.effective_blinks_per_second = clamped;

        let raw = self.file.events.queue_capacity;
        let clamped = raw.max(MIN_QUEUE_CAPACITY);
        if clamped != raw {
            info!(target: "config", raw, clamped, min = MIN_QUEUE_CAPACITY, "queue_capacity_clamped");
        }
        self.effective_queue_capacity = clamped;
    }

    /// Apply viewport context to compute the clamped caret width.
    /// Returns the effective (possibly clamped) value.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> u16 {
        let raw = self.file.caret.width;
        let viewport_cap = u16::try_from(ctx.viewport_width).unwrap_or(u16::MAX);
        let max = MAX_CARET_WIDTH.min(viewport_cap).max(1);
        let clamped = raw.clamp(1, max);
        if clamped != raw {
            info!(
                target: "config",
                raw,
                clamped,
                max,
                viewport_width = ctx.viewport_width,
                viewport_height = ctx.viewport_height,
                "caret_width_clamped"
            );
        }
        self.effective_caret_width = clamped;
        clamped
    }

    /// Recompute effective values on a viewport change. Returns
    /// `Some(new_width)` when the effective caret width changed, else `None`.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<u16> {
        let prev = self.effective_caret_width;
        let current = self.apply_context(ctx);
        if current != prev { Some(current) } else { None }
    }
}
