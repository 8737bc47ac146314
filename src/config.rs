//! Effect configuration.
//!
//! [`PlexusConfig`] carries every caller-supplied parameter. It can be built
//! in code with chainable setters or persisted as JSON:
//!
//! ```ignore
//! let mut config = PlexusConfig::new();
//! config
//!     .search_distance(0.15)
//!     .max_lines(400, 6)
//!     .color_blend(0.5)
//!     .mesh(MeshMode::Neighborhood, 200);
//! config.save("plexus.json")?;
//! ```
//!
//! The per-frame computation never rejects a configuration. It works on
//! [`PlexusConfig::sanitized`], which clamps every value into range.
//! [`PlexusConfig::validate`] is there for tools that want to report bad
//! values instead of silently clamping them.

use glam::Vec4;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{PlexusError, Result};

fn default_search_distance() -> f32 {
    0.1
}

fn default_max_lines_total() -> usize {
    1000
}

fn default_max_lines_per_particle() -> usize {
    5
}

fn default_max_triangles() -> usize {
    300
}

/// Base line appearance, the equivalent of a line prefab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineTemplate {
    pub start_width: f32,
    pub end_width: f32,
    /// RGBA start color.
    pub start_color: Vec4,
    /// RGBA end color.
    pub end_color: Vec4,
}

impl Default for LineTemplate {
    fn default() -> Self {
        Self {
            start_width: 0.01,
            end_width: 0.01,
            start_color: Vec4::new(0.5, 0.7, 1.0, 1.0),
            end_color: Vec4::new(0.5, 0.7, 1.0, 1.0),
        }
    }
}

impl LineTemplate {
    /// Template with the same width and color at both ends.
    pub fn uniform(width: f32, color: Vec4) -> Self {
        Self {
            start_width: width,
            end_width: width,
            start_color: color,
            end_color: color,
        }
    }
}

/// How accepted lines are turned into triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MeshMode {
    /// Join consecutive neighbors of a particle when the two neighbors are
    /// themselves connected. Never produces a triangle whose edges were not
    /// all accepted as lines.
    #[default]
    Neighborhood,
    /// Cheaper approximation: every `stride`-th neighbor is joined with the
    /// neighbor before it if the two are within search distance. Can produce
    /// triangles across edges the line caps rejected.
    Strided { stride: usize },
}

/// Complete configuration for a plexus effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlexusConfig {
    /// Maximum distance between two connected particles.
    #[serde(default = "default_search_distance")]
    pub search_distance: f32,
    /// Global cap on lines per frame.
    #[serde(default = "default_max_lines_total")]
    pub max_lines_total: usize,
    /// Cap on lines where a particle is the lower-index endpoint.
    #[serde(default = "default_max_lines_per_particle")]
    pub max_lines_per_particle: usize,
    /// Base line width and color.
    #[serde(default)]
    pub line_template: LineTemplate,
    /// How much line width follows particle size (0 = template, 1 = particle).
    #[serde(default)]
    pub size_blend: f32,
    /// How much line color follows particle color (0 = template, 1 = particle).
    #[serde(default)]
    pub color_blend: f32,
    /// Whether to triangulate connections into a mesh.
    #[serde(default)]
    pub use_mesh: bool,
    #[serde(default)]
    pub mesh_mode: MeshMode,
    /// Global cap on triangles per frame.
    #[serde(default = "default_max_triangles")]
    pub max_triangles: usize,
    /// How much vertex color follows particle color (0 = no colors, 1 = particle).
    #[serde(default)]
    pub mesh_color_blend: f32,
}

impl Default for PlexusConfig {
    fn default() -> Self {
        Self {
            search_distance: default_search_distance(),
            max_lines_total: default_max_lines_total(),
            max_lines_per_particle: default_max_lines_per_particle(),
            line_template: LineTemplate::default(),
            size_blend: 0.0,
            color_blend: 0.0,
            use_mesh: false,
            mesh_mode: MeshMode::default(),
            max_triangles: default_max_triangles(),
            mesh_color_blend: 0.0,
        }
    }
}

impl PlexusConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // PRESETS
    // =========================================================================

    /// Constellation preset: sparse lines tinted by their particles, no mesh.
    pub fn constellation() -> Self {
        Self {
            search_distance: 0.2,
            max_lines_total: 500,
            max_lines_per_particle: 3,
            line_template: LineTemplate::uniform(0.004, Vec4::new(0.8, 0.85, 1.0, 0.6)),
            size_blend: 0.0,
            color_blend: 0.5,
            ..Default::default()
        }
    }

    /// Web preset: dense lines with a translucent triangulated skin.
    pub fn web() -> Self {
        Self {
            search_distance: 0.15,
            max_lines_total: 2000,
            max_lines_per_particle: 8,
            line_template: LineTemplate::uniform(0.002, Vec4::new(0.4, 0.9, 0.8, 0.8)),
            size_blend: 0.25,
            color_blend: 0.25,
            use_mesh: true,
            mesh_mode: MeshMode::Neighborhood,
            max_triangles: 1500,
            mesh_color_blend: 1.0,
        }
    }

    // =========================================================================
    // SETTERS
    // =========================================================================

    /// Set the connection distance.
    pub fn search_distance(&mut self, distance: f32) -> &mut Self {
        self.search_distance = distance;
        self
    }

    /// Set the global and per-particle line caps.
    pub fn max_lines(&mut self, total: usize, per_particle: usize) -> &mut Self {
        self.max_lines_total = total;
        self.max_lines_per_particle = per_particle;
        self
    }

    /// Set the base line appearance.
    pub fn line_template(&mut self, template: LineTemplate) -> &mut Self {
        self.line_template = template;
        self
    }

    pub fn size_blend(&mut self, blend: f32) -> &mut Self {
        self.size_blend = blend;
        self
    }

    pub fn color_blend(&mut self, blend: f32) -> &mut Self {
        self.color_blend = blend;
        self
    }

    /// Enable mesh output with the given mode and triangle cap.
    pub fn mesh(&mut self, mode: MeshMode, max_triangles: usize) -> &mut Self {
        self.use_mesh = true;
        self.mesh_mode = mode;
        self.max_triangles = max_triangles;
        self
    }

    /// Disable mesh output.
    pub fn no_mesh(&mut self) -> &mut Self {
        self.use_mesh = false;
        self
    }

    pub fn mesh_color_blend(&mut self, blend: f32) -> &mut Self {
        self.mesh_color_blend = blend;
        self
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Copy with every value clamped into its valid range.
    ///
    /// Negative or NaN distances become 0, which accepts no lines. Blend
    /// factors are clamped to `[0, 1]` and a zero stride becomes 1.
    pub fn sanitized(&self) -> Self {
        let distance = if self.search_distance.is_nan() || self.search_distance < 0.0 {
            0.0
        } else {
            self.search_distance
        };
        let width = |w: f32| if w.is_nan() { 0.0 } else { w.max(0.0) };

        Self {
            search_distance: distance,
            line_template: LineTemplate {
                start_width: width(self.line_template.start_width),
                end_width: width(self.line_template.end_width),
                ..self.line_template
            },
            size_blend: crate::blend::clamp_factor(self.size_blend),
            color_blend: crate::blend::clamp_factor(self.color_blend),
            mesh_mode: match self.mesh_mode {
                MeshMode::Strided { stride } => MeshMode::Strided {
                    stride: stride.max(1),
                },
                mode => mode,
            },
            mesh_color_blend: crate::blend::clamp_factor(self.mesh_color_blend),
            ..self.clone()
        }
    }

    /// Report the first value that [`sanitized`](Self::sanitized) would have
    /// to change.
    pub fn validate(&self) -> Result<()> {
        if self.search_distance.is_nan() || self.search_distance < 0.0 {
            return Err(invalid(
                "search_distance",
                format!("must be a non-negative number, got {}", self.search_distance),
            ));
        }
        if !self.search_distance.is_finite() {
            return Err(invalid("search_distance", "must be finite".into()));
        }
        check_non_negative("line_template.start_width", self.line_template.start_width)?;
        check_non_negative("line_template.end_width", self.line_template.end_width)?;
        check_factor("size_blend", self.size_blend)?;
        check_factor("color_blend", self.color_blend)?;
        check_factor("mesh_color_blend", self.mesh_color_blend)?;
        if let MeshMode::Strided { stride: 0 } = self.mesh_mode {
            return Err(invalid("mesh_mode.stride", "must be at least 1".into()));
        }
        Ok(())
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Compare this config with another to see which stages of the frame
    /// the change affects.
    pub fn diff(&self, other: &PlexusConfig) -> ConfigDiff {
        let selection_changed = self.search_distance != other.search_distance
            || self.max_lines_total != other.max_lines_total
            || self.max_lines_per_particle != other.max_lines_per_particle;

        let mesh_changed = self.use_mesh != other.use_mesh
            || self.mesh_mode != other.mesh_mode
            || self.max_triangles != other.max_triangles
            || self.mesh_color_blend != other.mesh_color_blend;

        let appearance_changed = self.line_template != other.line_template
            || self.size_blend != other.size_blend
            || self.color_blend != other.color_blend;

        ConfigDiff {
            selection_changed,
            mesh_changed,
            appearance_changed,
        }
    }
}

/// Result of comparing two [`PlexusConfig`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigDiff {
    /// Which pairs become lines may change.
    pub selection_changed: bool,
    /// Mesh output may change even for identical lines.
    pub mesh_changed: bool,
    /// Only line widths or colors change.
    pub appearance_changed: bool,
}

impl ConfigDiff {
    /// Returns true if no changes are needed.
    pub fn is_empty(&self) -> bool {
        !self.selection_changed && !self.mesh_changed && !self.appearance_changed
    }
}

fn invalid(field: &'static str, reason: String) -> PlexusError {
    PlexusError::InvalidConfig { field, reason }
}

fn check_factor(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be within [0, 1], got {}", value)))
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be non-negative, got {}", value)))
    }
}
