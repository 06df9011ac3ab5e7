//! IPC message dispatch — parse s-expression commands and route them to
//! the analyzer.
//!
//! Text-in/text-out only: the transport (socket, pipe, test harness) is
//! owned by the embedding collaborator. Commands are Emacs-style plists,
//! e.g. `(:type :set-reach-radius :id 3 :radius 0.25)`.

use lexpr::Value;
use tracing::warn;

use crate::analyzer::InteractionAnalyzer;

/// Parse an s-expression message and dispatch to the appropriate handler.
/// Returns an optional response string (s-expression).
pub fn handle_message(analyzer: &mut InteractionAnalyzer, raw: &str) -> Option<String> {
    let value = match lexpr::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            warn!("malformed s-expression: {}", e);
            return Some(error_response(0, &format!("malformed s-expression: {e}")));
        }
    };

    let msg_type = get_keyword(&value, "type");
    let msg_id = get_int(&value, "id").unwrap_or(0);

    match msg_type.as_deref() {
        Some("ping") => Some(format!("(:type :pong :id {})", msg_id)),
        Some("status") => Some(data_response(msg_id, &analyzer.status_sexp())),
        Some("config") => Some(data_response(msg_id, &analyzer.config_sexp())),
        Some("set-gaze-threshold") => match get_float(&value, "deg") {
            Some(deg) if deg > 0.0 => {
                analyzer.set_gaze_threshold(deg);
                Some(ok_response(msg_id))
            }
            _ => Some(error_response(msg_id, "missing or non-positive :deg")),
        },
        Some("set-looking-threshold") => match get_float(&value, "deg") {
            Some(deg) if deg > 0.0 => {
                analyzer.set_looking_threshold(deg);
                Some(ok_response(msg_id))
            }
            _ => Some(error_response(msg_id, "missing or non-positive :deg")),
        },
        Some("set-reach-radius") => match get_float(&value, "radius") {
            Some(radius) if radius > 0.0 => {
                analyzer.set_reach_radius(radius);
                Some(ok_response(msg_id))
            }
            _ => Some(error_response(msg_id, "missing or non-positive :radius")),
        },
        Some("drain-events") => {
            let events = analyzer.drain_events();
            let body: Vec<String> = events.iter().map(|e| e.to_sexp()).collect();
            Some(format!(
                "(:type :response :id {} :status :ok :events ({}))",
                msg_id,
                body.join(" ")
            ))
        }
        Some("reset") => {
            analyzer.reset();
            Some(ok_response(msg_id))
        }
        Some(other) => Some(error_response(msg_id, &format!("unknown type: {other}"))),
        None => Some(error_response(msg_id, "missing :type")),
    }
}

// ── Helpers ────────────────────────────────────────────────

fn ok_response(id: i64) -> String {
    format!("(:type :response :id {} :status :ok)", id)
}

fn data_response(id: i64, data: &str) -> String {
    format!("(:type :response :id {} :status :ok :data {})", id, data)
}

fn error_response(id: i64, reason: &str) -> String {
    format!(
        "(:type :response :id {} :status :error :reason \"{}\")",
        id,
        escape_string(reason)
    )
}

/// Escape a string for s-expression output.
fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Extract a keyword value from an s-expression plist.
/// Walks cons pairs directly to find `:key` followed by its value.
/// Handles both `Value::Keyword("key")` (elisp parser) and
/// `Value::Symbol(":key")` (default parser) forms.
fn get_keyword(value: &Value, key: &str) -> Option<String> {
    let prefixed = format!(":{}", key);
    let mut current = value;
    loop {
        match current {
            Value::Cons(pair) => {
                let car = pair.car();
                let is_key = match car {
                    Value::Keyword(k) => k.as_ref() == key,
                    Value::Symbol(s) => s.as_ref() == prefixed,
                    _ => false,
                };
                if is_key {
                    if let Value::Cons(next) = pair.cdr() {
                        let val = next.car();
                        return match val {
                            Value::Keyword(v) => Some(v.to_string()),
                            Value::Symbol(v) => {
                                let s = v.to_string();
                                Some(s.strip_prefix(':').unwrap_or(&s).to_string())
                            }
                            Value::String(v) => Some(v.to_string()),
                            Value::Number(n) => Some(n.to_string()),
                            Value::Bool(b) => Some(if *b { "t" } else { "nil" }.to_string()),
                            Value::Null => Some("nil".to_string()),
                            _ => Some(val.to_string()),
                        };
                    }
                    return None;
                }
                current = pair.cdr();
            }
            _ => break,
        }
    }
    None
}

/// Extract an integer value from an s-expression plist.
fn get_int(value: &Value, key: &str) -> Option<i64> {
    get_keyword(value, key).and_then(|s| s.parse().ok())
}

/// Extract a floating-point value from an s-expression plist.
fn get_float(value: &Value, key: &str) -> Option<f64> {
    get_keyword(value, key).and_then(|s| s.parse().ok())
}

// ── Tests ───────────────────────────────────────────────────
