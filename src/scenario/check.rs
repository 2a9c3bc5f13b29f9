use serde_json::{Map, Value};

use crate::client::{ApiResponse, CallError};
use crate::utils::json_path::{self, display, lookup};

/// Outcome of validating one response
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub passed: bool,
    pub detail: String,
    pub raw: Option<Value>,
}

impl Verdict {
    pub fn pass(detail: impl Into<String>) -> Self {
        Self {
            passed: true,
            detail: detail.into(),
            raw: None,
        }
    }

    pub fn fail(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            detail: detail.into(),
            raw: None,
        }
    }

    fn with_raw(mut self, raw: Option<Value>) -> Self {
        self.raw = raw;
        self
    }
}

/// Expected JSON type of a container field
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Object,
    List { non_empty: bool },
}

/// Validation policy applied to a single response
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    /// 200 and a text field containing a marker string
    Marker {
        field: String,
        marker: String,
        report: Option<String>,
    },
    /// 200, nothing else
    Reachable,
    /// 200, `success: true`, container of the given shape carrying `required` keys
    /// (on the object, or on the first list element)
    Entity {
        container: String,
        shape: Shape,
        required: Vec<String>,
        report: Vec<String>,
    },
    /// 200, `success: true`, container echoes every submitted field
    Created {
        container: String,
        echo: Map<String, Value>,
        expected_status: Option<String>,
        require_id: bool,
    },
    /// Exact status code
    Status(u16),
    /// 4xx/5xx with a JSON content type
    ErrorResponse,
}

impl Check {
    pub fn evaluate(&self, outcome: &Result<ApiResponse, CallError>) -> Verdict {
        let res = match outcome {
            Ok(res) => res,
            Err(err) => return Verdict::fail(err.to_string()),
        };

        match self {
            Check::Status(expected) => check_status(*expected, res),
            Check::ErrorResponse => check_error_response(res),
            Check::Reachable => match expect_ok(res) {
                Ok(()) => Verdict::pass(format!("HTTP {}", res.status)),
                Err(v) => v,
            },
            Check::Marker {
                field,
                marker,
                report,
            } => with_json(res, |body| check_marker(body, field, marker, report.as_deref())),
            Check::Entity {
                container,
                shape,
                required,
                report,
            } => with_json(res, |body| check_entity(body, container, shape, required, report)),
            Check::Created {
                container,
                echo,
                expected_status,
                require_id,
            } => with_json(res, |body| {
                check_created(body, container, echo, expected_status.as_deref(), *require_id)
            }),
        }
    }
}

fn expect_ok(res: &ApiResponse) -> Result<(), Verdict> {
    if res.status == 200 {
        Ok(())
    } else {
        Err(Verdict::fail(format!("HTTP {}: {}", res.status, res.snippet())))
    }
}

/// Require 200 and a parseable body, then hand the body to `f`
fn with_json<F>(res: &ApiResponse, f: F) -> Verdict
where
    F: FnOnce(&Value) -> Verdict,
{
    if let Err(v) = expect_ok(res) {
        return v;
    }
    match res.json() {
        Ok(body) => {
            let verdict = f(&body);
            verdict.with_raw(Some(body))
        }
        Err(err) => Verdict::fail(err.to_string()),
    }
}

fn invalid_structure(body: &Value) -> Verdict {
    Verdict::fail(format!(
        "Invalid response structure: {}",
        json_path::snippet(&body.to_string(), 200)
    ))
}

fn success_container<'a>(body: &'a Value, container: &str) -> Result<&'a Value, Verdict> {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    match (success, lookup(body, container)) {
        (true, Some(value)) => Ok(value),
        _ => Err(invalid_structure(body)),
    }
}

fn check_marker(body: &Value, field: &str, marker: &str, report: Option<&str>) -> Verdict {
    let text = lookup(body, field).and_then(Value::as_str);
    match text {
        Some(text) if text.contains(marker) => {
            let mut detail = format!("API is running ({})", text);
            if let Some(report) = report {
                let value = lookup(body, report)
                    .map(display)
                    .unwrap_or_else(|| "unknown".to_string());
                detail.push_str(&format!(", {}: {}", report, value));
            }
            Verdict::pass(detail)
        }
        _ => Verdict::fail(format!(
            "Unexpected response format: expected '{}' containing '{}', got {}",
            field,
            marker,
            json_path::snippet(&body.to_string(), 200)
        )),
    }
}

fn missing_keys(value: &Value, required: &[String]) -> Vec<String> {
    required
        .iter()
        .filter(|key| value.get(key.as_str()).is_none())
        .cloned()
        .collect()
}

fn check_entity(
    body: &Value,
    container: &str,
    shape: &Shape,
    required: &[String],
    report: &[String],
) -> Verdict {
    let value = match success_container(body, container) {
        Ok(v) => v,
        Err(v) => return v,
    };

    let (sample, summary) = match shape {
        Shape::Object => {
            if !value.is_object() {
                return Verdict::fail(format!("'{}' should be an object", container));
            }
            (Some(value), format!("{} retrieved", container))
        }
        Shape::List { non_empty } => {
            let Some(items) = value.as_array() else {
                return Verdict::fail(format!("'{}' should be a list", container));
            };
            if *non_empty && items.is_empty() {
                return Verdict::fail(format!("No {} returned", container));
            }
            (items.first(), format!("Retrieved {} {}", items.len(), container))
        }
    };

    if let Some(sample) = sample {
        let missing = missing_keys(sample, required);
        if !missing.is_empty() {
            return Verdict::fail(format!(
                "'{}' missing required fields: [{}]",
                container,
                missing.join(", ")
            ));
        }
    }

    let reported: Vec<String> = report
        .iter()
        .map(|path| {
            let value = lookup(value, path)
                .map(display)
                .unwrap_or_else(|| "unknown".to_string());
            format!("{}: {}", path, value)
        })
        .collect();

    if reported.is_empty() {
        Verdict::pass(summary)
    } else {
        Verdict::pass(format!("{} ({})", summary, reported.join(", ")))
    }
}

fn has_id(entity: &Value) -> bool {
    match entity.get("id") {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    }
}

fn check_created(
    body: &Value,
    container: &str,
    echo: &Map<String, Value>,
    expected_status: Option<&str>,
    require_id: bool,
) -> Verdict {
    let entity = match success_container(body, container) {
        Ok(v) => v,
        Err(v) => return v,
    };
    if !entity.is_object() {
        return Verdict::fail(format!("'{}' should be an object", container));
    }

    let mut mismatches = Vec::new();
    for (key, expected) in echo {
        match entity.get(key) {
            Some(actual) if actual == expected => {}
            Some(actual) => mismatches.push(format!(
                "{} (expected {}, got {})",
                key,
                json_path::snippet(&display(expected), 60),
                json_path::snippet(&display(actual), 60)
            )),
            None => mismatches.push(format!("{} (missing)", key)),
        }
    }

    if let Some(status) = expected_status {
        match entity.get("status").and_then(Value::as_str) {
            Some(actual) if actual == status => {}
            Some(actual) => {
                mismatches.push(format!("status (expected {}, got {})", status, actual))
            }
            None => mismatches.push("status (missing)".to_string()),
        }
    }

    if require_id && !has_id(entity) {
        mismatches.push("id (missing or empty)".to_string());
    }

    if !mismatches.is_empty() {
        return Verdict::fail(format!(
            "'{}' does not match submission: {}",
            container,
            mismatches.join(", ")
        ));
    }

    let id = entity
        .get("id")
        .map(display)
        .unwrap_or_else(|| "unknown".to_string());
    match expected_status {
        Some(status) => Verdict::pass(format!("{} {} with ID: {}", container, status, id)),
        None => Verdict::pass(format!("{} created with ID: {}", container, id)),
    }
}

fn check_status(expected: u16, res: &ApiResponse) -> Verdict {
    if res.status == expected {
        Verdict::pass(format!("HTTP {}", res.status))
    } else {
        Verdict::fail(format!(
            "expected HTTP {}, got {}: {}",
            expected,
            res.status,
            res.snippet()
        ))
    }
}

fn check_error_response(res: &ApiResponse) -> Verdict {
    let is_error = (400..600).contains(&res.status);
    match (is_error, res.is_json()) {
        (true, true) => Verdict::pass(format!("HTTP {} with JSON error body", res.status)),
        (true, false) => Verdict::fail(format!(
            "HTTP {} but content type is {}",
            res.status,
            res.content_type.as_deref().unwrap_or("missing")
        )),
        (false, _) => Verdict::fail(format!("expected 4xx/5xx, got {}", res.status)),
    }
}
