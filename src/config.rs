use crate::color::DEFAULT_GROUP_PALETTE;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Vertical spacing per hierarchy level.
    pub row_height: f32,
    /// Minimum horizontal spacing per leaf or column.
    pub column_width: f32,
    /// Reject duplicate ids and runaway depth during layout.
    pub structural_guard: bool,
    pub max_depth: usize,
    pub other_group_label: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_height: 120.0,
            column_width: 240.0,
            structural_guard: true,
            max_depth: DEFAULT_MAX_DEPTH,
            other_group_label: "Other".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupColorConfig {
    pub palette: Vec<String>,
    /// Label to color overrides from user settings.
    pub overrides: BTreeMap<String, String>,
}

impl Default for GroupColorConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_GROUP_PALETTE.iter().map(|c| c.to_string()).collect(),
            overrides: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub layout: LayoutConfig,
    pub colors: GroupColorConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    row_height: Option<f32>,
    column_width: Option<f32>,
    structural_guard: Option<bool>,
    max_depth: Option<usize>,
    other_group_label: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GroupColorConfigFile {
    palette: Option<Vec<String>>,
    overrides: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
    group_colors: Option<GroupColorConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config in {}", path.display()))
}

/// Parses a JSON5 config document and merges it over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.row_height {
            config.layout.row_height = v;
        }
        if let Some(v) = layout.column_width {
            config.layout.column_width = v;
        }
        if let Some(v) = layout.structural_guard {
            config.layout.structural_guard = v;
        }
        if let Some(v) = layout.max_depth {
            config.layout.max_depth = v;
        }
        if let Some(v) = layout.other_group_label {
            config.layout.other_group_label = v;
        }
    }

    if let Some(colors) = parsed.group_colors {
        if let Some(palette) = colors.palette
            && !palette.is_empty()
        {
            config.colors.palette = palette;
        }
        if let Some(overrides) = colors.overrides {
            config.colors.overrides.extend(overrides);
        }
    }

    if !(config.layout.row_height > 0.0) || !(config.layout.column_width > 0.0) {
        anyhow::bail!(
            "rowHeight and columnWidth must be positive (got {} and {})",
            config.layout.row_height,
            config.layout.column_width
        );
    }

    Ok(config)
}
