use mml_core::{ConvertOptions, Dialect, RefLoc};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConvertRequestOptions {
    escape_html: Option<bool>,
    sanitized: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConvertResult {
    html: String,
    line_count: usize,
    milestones: Vec<JsMilestone>,
    pages: Vec<RefLoc<usize>>,
    diagnostics: Vec<JsDiagnostic>,
    offsets: Vec<JsOffset>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsMilestone {
    reference: String,
    line: usize,
    prop: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsDiagnostic {
    code: String,
    message: String,
    severity: String,
    range: JsRange,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsRange {
    start_line: usize,
    start_col: usize,
    end_line: usize,
    end_col: usize,
}

/// One literal run, as byte offsets into the source and the HTML.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsOffset {
    source_start: usize,
    source_end: usize,
    html_start: usize,
    html_end: usize,
}

#[wasm_bindgen]
pub fn convert(dialect: JsValue, source: &str) -> Result<JsValue, JsValue> {
    convert_with_options(dialect, source, JsValue::UNDEFINED)
}

#[wasm_bindgen]
pub fn convert_with_options(
    dialect: JsValue,
    source: &str,
    options: JsValue,
) -> Result<JsValue, JsValue> {
    let dialect = dialect_from_js(dialect)?;
    let (options, sanitized) = options_from_js(options)?;
    let conversion = mml_core::convert_with_options(&dialect, source, options);

    let html = if sanitized {
        conversion.sanitized_html()
    } else {
        conversion.html.clone()
    };
    let pages = conversion.page_table();
    let milestones = conversion
        .milestones
        .into_iter()
        .map(|milestone| JsMilestone {
            reference: milestone.reference,
            line: milestone.line,
            prop: milestone.prop,
        })
        .collect();
    let diagnostics = conversion
        .diagnostics
        .into_iter()
        .map(|diag| JsDiagnostic {
            code: diag.code.to_string(),
            message: diag.message,
            severity: match diag.severity {
                mml_core::DiagnosticSeverity::Error => "error".to_string(),
                mml_core::DiagnosticSeverity::Warning => "warning".to_string(),
            },
            range: JsRange {
                start_line: diag.range.start.line,
                start_col: diag.range.start.character,
                end_line: diag.range.end.line,
                end_col: diag.range.end.character,
            },
        })
        .collect();
    let offsets = conversion
        .offsets
        .mappings()
        .iter()
        .map(|mapping| JsOffset {
            source_start: mapping.source.start,
            source_end: mapping.source.end,
            html_start: mapping.html.start,
            html_end: mapping.html.end,
        })
        .collect();

    let result = ConvertResult {
        html,
        line_count: conversion.line_count,
        milestones,
        pages,
        diagnostics,
        offsets,
    };
    serde_wasm_bindgen::to_value(&result).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Index of the last `{reference, location}` entry at or before `query`.
#[wasm_bindgen]
pub fn find_highest_index(locations: JsValue, query: f64) -> Result<Option<u32>, JsValue> {
    let locations: Vec<RefLoc<f64>> = serde_wasm_bindgen::from_value(locations)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(mml_core::find_highest_index(&locations, &query).map(|index| index as u32))
}

/// Where `query` falls between the entries of a location table whose last
/// entry runs up to `total`.
#[wasm_bindgen]
pub fn page_position(locations: JsValue, total: f64, query: f64) -> Result<JsValue, JsValue> {
    let locations: Vec<RefLoc<f64>> = serde_wasm_bindgen::from_value(locations)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    let position = mml_core::page_position(&locations, total, query);
    serde_wasm_bindgen::to_value(&position).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn curl_quotes(text: &str) -> String {
    mml_core::curl_quotes(text)
}

fn dialect_from_js(value: JsValue) -> Result<Dialect, JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok(Dialect::default());
    }
    let dialect: Dialect =
        serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    dialect
        .validate()
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(dialect)
}

fn options_from_js(value: JsValue) -> Result<(ConvertOptions, bool), JsValue> {
    if value.is_null() || value.is_undefined() {
        return Ok((ConvertOptions::default(), false));
    }
    let parsed: ConvertRequestOptions =
        serde_wasm_bindgen::from_value(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let mut out = ConvertOptions::default();
    if let Some(escape_html) = parsed.escape_html {
        out.escape_html = escape_html;
    }
    Ok((out, parsed.sanitized.unwrap_or(false)))
}
