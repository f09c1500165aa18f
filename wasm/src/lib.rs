use std::collections::BTreeMap;

use orgchart_layout::layout_dump::to_json_string;
use orgchart_layout::{Config, EmployeeNode, LayoutModes, layout_org_chart};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrgChartOptions {
    row_height: Option<f32>,
    column_width: Option<f32>,
    structural_guard: Option<bool>,
    group_colors: Option<BTreeMap<String, String>>,
}

fn build_config(options: OrgChartOptions) -> Config {
    let mut config = Config::default();
    if let Some(row_height) = options.row_height.filter(|v| *v > 0.0) {
        config.layout.row_height = row_height;
    }
    if let Some(column_width) = options.column_width.filter(|v| *v > 0.0) {
        config.layout.column_width = column_width;
    }
    if let Some(guard) = options.structural_guard {
        config.layout.structural_guard = guard;
    }
    if let Some(overrides) = options.group_colors {
        config.colors.overrides.extend(overrides);
    }
    config
}

fn parse_json<'a, T: Deserialize<'a>>(raw: &'a str) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|error| error.to_string())
}

fn layout_json(
    employees_json: &str,
    modes_json: Option<&str>,
    options_json: Option<&str>,
) -> Result<String, String> {
    let records: Vec<EmployeeNode> = parse_json(employees_json)?;
    let modes: LayoutModes = match modes_json {
        Some(raw) => parse_json(raw)?,
        None => LayoutModes::new(),
    };
    let options: OrgChartOptions = match options_json {
        Some(raw) => parse_json(raw)?,
        None => OrgChartOptions::default(),
    };
    let graph = layout_org_chart(records, &modes, &build_config(options))
        .map_err(|error| error.to_string())?;
    to_json_string(&graph).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn layout_org_chart_json(
    employees_json: &str,
    modes_json: Option<String>,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    layout_json(employees_json, modes_json.as_deref(), options_json.as_deref())
        .map_err(|error| JsValue::from_str(&error))
}
