use crate::error::PairsError;
use crate::style::{Color, Colormap, LineStyle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginalConfig {
    #[serde(default = "MarginalConfig::default_color")]
    pub color: Color,
    #[serde(default = "MarginalConfig::default_linewidth")]
    pub linewidth: f64,
    /// Write each variable's label inside its diagonal panel.
    #[serde(default)]
    pub annotate: bool,
}

impl MarginalConfig {
    fn default_color() -> Color {
        Color::rgb(0x5E, 0x81, 0xAC)
    }
    fn default_linewidth() -> f64 {
        3.0
    }
}

impl Default for MarginalConfig {
    fn default() -> Self {
        Self {
            color: Self::default_color(),
            linewidth: Self::default_linewidth(),
            annotate: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterConfig {
    #[serde(default = "ScatterConfig::default_enabled")]
    pub enabled: bool,
    #[serde(default = "ScatterConfig::default_color")]
    pub color: Color,
    #[serde(default = "ScatterConfig::default_alpha")]
    pub alpha: f64,
    /// Keep every `thin`-th sample when drawing points.
    #[serde(default = "ScatterConfig::default_thin")]
    pub thin: usize,
    /// Recorded on each scatter artist for custom surfaces; the plotters replay ignores it.
    #[serde(default = "ScatterConfig::default_rasterized")]
    pub rasterized: bool,
    #[serde(default = "ScatterConfig::default_marker_size")]
    pub marker_size: f64,
    /// Marker outline; falls back to `color`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_color: Option<Color>,
}

impl ScatterConfig {
    fn default_enabled() -> bool {
        true
    }
    fn default_color() -> Color {
        Color::rgb(0x5E, 0x81, 0xAC)
    }
    fn default_alpha() -> f64 {
        0.2
    }
    fn default_thin() -> usize {
        1
    }
    fn default_rasterized() -> bool {
        true
    }
    fn default_marker_size() -> f64 {
        10.0
    }
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            color: Self::default_color(),
            alpha: Self::default_alpha(),
            thin: Self::default_thin(),
            rasterized: Self::default_rasterized(),
            marker_size: Self::default_marker_size(),
            edge_color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruthsConfig {
    #[serde(default = "TruthsConfig::default_color")]
    pub color: Color,
    #[serde(default = "TruthsConfig::default_linestyle")]
    pub linestyle: LineStyle,
    #[serde(default = "TruthsConfig::default_linewidth")]
    pub linewidth: f64,
    #[serde(default = "TruthsConfig::default_z_order")]
    pub z_order: i32,
}

impl TruthsConfig {
    fn default_color() -> Color {
        Color::rgb(0x2E, 0x34, 0x40)
    }
    fn default_linestyle() -> LineStyle {
        LineStyle::Dashed
    }
    fn default_linewidth() -> f64 {
        1.5
    }
    fn default_z_order() -> i32 {
        5
    }
}

impl Default for TruthsConfig {
    fn default() -> Self {
        Self {
            color: Self::default_color(),
            linestyle: Self::default_linestyle(),
            linewidth: Self::default_linewidth(),
            z_order: Self::default_z_order(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KdeConfig {
    /// Solid contour color, used only when `cmap` is `none`.
    #[serde(default = "KdeConfig::default_color")]
    pub color: Color,
    #[serde(default)]
    pub cmap: Colormap,
    /// Sigma levels of the joint-density contours.
    #[serde(default = "KdeConfig::default_levels")]
    pub levels: Vec<f64>,
    #[serde(default = "KdeConfig::default_linewidth")]
    pub linewidth: f64,
    #[serde(default = "KdeConfig::default_grid_points_1d")]
    pub grid_points_1d: usize,
    #[serde(default = "KdeConfig::default_grid_points_2d")]
    pub grid_points_2d: usize,
}

impl KdeConfig {
    fn default_color() -> Color {
        Color::rgb(0x8F, 0xBC, 0xBB)
    }
    fn default_levels() -> Vec<f64> {
        vec![0.5, 1.0, 1.5, 2.0]
    }
    fn default_linewidth() -> f64 {
        1.0
    }
    fn default_grid_points_1d() -> usize {
        256
    }
    fn default_grid_points_2d() -> usize {
        64
    }
}

impl Default for KdeConfig {
    fn default() -> Self {
        Self {
            color: Self::default_color(),
            cmap: Colormap::default(),
            levels: Self::default_levels(),
            linewidth: Self::default_linewidth(),
            grid_points_1d: Self::default_grid_points_1d(),
            grid_points_2d: Self::default_grid_points_2d(),
        }
    }
}

/// Axis limit policy. `None` uses the full data range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_quantiles: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_quantiles: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Figure side length per variable; the figure is `n * scaling + 1` on each side.
    #[serde(default = "LayoutConfig::default_figsize_scaling")]
    pub figsize_scaling: f64,
    #[serde(default = "LayoutConfig::default_spacing")]
    pub hspace: f64,
    #[serde(default = "LayoutConfig::default_spacing")]
    pub wspace: f64,
    #[serde(default = "LayoutConfig::default_max_ticks")]
    pub max_ticks: usize,
    #[serde(default = "LayoutConfig::default_edge_color")]
    pub edge_color: Color,
    /// Pixels per figure unit when rasterizing.
    #[serde(default = "LayoutConfig::default_dpi")]
    pub dpi: u32,
}

impl LayoutConfig {
    fn default_figsize_scaling() -> f64 {
        2.2
    }
    fn default_spacing() -> f64 {
        0.05
    }
    fn default_max_ticks() -> usize {
        4
    }
    fn default_edge_color() -> Color {
        Color::BLACK
    }
    fn default_dpi() -> u32 {
        100
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            figsize_scaling: Self::default_figsize_scaling(),
            hspace: Self::default_spacing(),
            wspace: Self::default_spacing(),
            max_ticks: Self::default_max_ticks(),
            edge_color: Self::default_edge_color(),
            dpi: Self::default_dpi(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    #[serde(default = "FontConfig::default_ticks")]
    pub ticks: f64,
    #[serde(default = "FontConfig::default_labels")]
    pub labels: f64,
    #[serde(default = "FontConfig::default_annotation")]
    pub annotation: f64,
}

impl FontConfig {
    fn default_ticks() -> f64 {
        13.0
    }
    fn default_labels() -> f64 {
        22.0
    }
    fn default_annotation() -> f64 {
        22.0
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            ticks: Self::default_ticks(),
            labels: Self::default_labels(),
            annotation: Self::default_annotation(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PairsConfig {
    #[serde(default)]
    pub marginal: MarginalConfig,
    #[serde(default)]
    pub scatter: ScatterConfig,
    #[serde(default)]
    pub truths: TruthsConfig,
    #[serde(default)]
    pub kde: KdeConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub fonts: FontConfig,
}

fn check_quantiles(name: &str, q: Option<[f64; 2]>) -> Result<(), PairsError> {
    if let Some(pair) = q {
        if pair.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(PairsError::InvalidConfig(format!(
                "{name} must lie in [0, 1], got {pair:?}"
            )));
        }
    }
    Ok(())
}

impl PairsConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, PairsError> {
        toml::from_str(text).map_err(|err| PairsError::InvalidConfig(err.to_string()))
    }

    /// Reject values outside their domain. Called before any rendering work.
    pub fn validate(&self) -> Result<(), PairsError> {
        let invalid = |msg: String| Err(PairsError::InvalidConfig(msg));
        if self.scatter.thin == 0 {
            return invalid("scatter.thin must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.scatter.alpha) {
            return invalid(format!("scatter.alpha {} outside [0, 1]", self.scatter.alpha));
        }
        check_quantiles("limits.x_quantiles", self.limits.x_quantiles)?;
        check_quantiles("limits.y_quantiles", self.limits.y_quantiles)?;
        if self.kde.levels.is_empty() {
            return invalid("kde.levels needs at least one sigma level".into());
        }
        if let Some(k) = self.kde.levels.iter().find(|k| !(k.is_finite() && **k > 0.0)) {
            return invalid(format!("kde.levels entry {k} must be positive and finite"));
        }
        if self.kde.grid_points_1d < 2 || self.kde.grid_points_2d < 2 {
            return invalid("kde grid needs at least 2 points per axis".into());
        }
        if !(self.layout.figsize_scaling > 0.0) {
            return invalid("layout.figsize_scaling must be positive".into());
        }
        if !(self.layout.hspace >= 0.0 && self.layout.wspace >= 0.0) {
            return invalid("layout spacing must be non-negative".into());
        }
        if self.layout.max_ticks == 0 {
            return invalid("layout.max_ticks must be at least 1".into());
        }
        if self.layout.dpi == 0 {
            return invalid("layout.dpi must be positive".into());
        }
        Ok(())
    }

    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match Self::from_toml_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        warn!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    warn!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write commented-out defaults and return them.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                let mut commented = String::new();
                for line in text.lines() {
                    let trimmed = line.trim();
                    if trimmed.is_empty() || (trimmed.starts_with('[') && trimmed.ends_with(']'))
                    {
                        commented.push_str(line);
                    } else {
                        commented.push_str("# ");
                        commented.push_str(line);
                    }
                    commented.push('\n');
                }
                if let Err(err) = fs::write(path_obj, commented) {
                    warn!("Failed to write default config to {path}: {err}");
                }
            }
            Err(err) => warn!("Failed to serialize default config: {err}; continuing with defaults"),
        }
        default_cfg
    }
}
