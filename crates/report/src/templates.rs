//! Template loading and management

use api_survey_common::{Result, SurveyError};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Template name of the HTML report
pub const HTML_TEMPLATE: &str = "report.html";

/// Template name of the CSV export
pub const CSV_TEMPLATE: &str = "report.csv";

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    // Register custom filters
    tera.register_filter("csv_field", csv_field_filter);
    tera.register_filter("method_class", method_class_filter);

    tera.add_raw_template(HTML_TEMPLATE, include_str!("../templates/report.html.tera"))
        .map_err(|e| SurveyError::Report(format!("Failed to load report.html template: {}", e)))?;

    tera.add_raw_template(CSV_TEMPLATE, include_str!("../templates/report.csv.tera"))
        .map_err(|e| SurveyError::Report(format!("Failed to load report.csv template: {}", e)))?;

    Ok(tera)
}

/// Quote a CSV field when it contains a separator, quote or line break
pub fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Filter to escape a value as one CSV field
fn csv_field_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let field = match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };

    Ok(Value::String(escape_csv_field(&field)))
}

/// Filter to turn a method name into its CSS class (e.g., "GET" → "method-get")
fn method_class_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let method = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("method_class filter expects a string"))?;

    Ok(Value::String(format!("method-{}", method.to_lowercase())))
}
