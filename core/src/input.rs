use std::collections::HashMap;
use anyhow::{anyhow, Result};
use serde_json::Value;

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub text: String,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut text_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        text_parts.push(arg.as_str());
    }

    ParsedInput {
        text: text_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Reads a currency amount out of a loosely typed document field.
///
/// Never fails: missing, empty, non-numeric and non-finite values all come
/// back as `0.0`. Strings are read up to the end of their leading numeric
/// prefix (exponent included), so `"150 RM"` is `150.0`, `"1e3"` is
/// `1000.0` and `"abc"` is `0.0`.
pub fn parse_amount(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_leading_number(s),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        _ => {
            if let Some(raw) = value {
                if !raw.is_null() {
                    log::debug!("coercing unparsable amount {} to 0", raw);
                }
            }
            0.0
        }
    }
}

fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'-' || bytes[exp_end] == b'+') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_simple() {
        let args = vec![
            "Aircond".to_string(),
            "leaking".to_string(),
            "customer:Siti".to_string(),
            "tech:Ali".to_string(),
        ];
        let parsed = parse_args(&args);
        assert_eq!(parsed.text, "Aircond leaking");
        assert_eq!(parsed.metadata.get("customer"), Some(&"Siti".to_string()));
        assert_eq!(parsed.metadata.get("tech"), Some(&"Ali".to_string()));
    }

    #[test]
    fn test_expand_key() {
        let candidates = vec!["customer", "phone", "price", "technician"];

        assert_eq!(expand_key("c", &candidates).unwrap(), "customer");
        assert_eq!(expand_key("tech", &candidates).unwrap(), "technician");
        assert_eq!(expand_key("pri", &candidates).unwrap(), "price");
        assert_eq!(expand_key("phone", &candidates).unwrap(), "phone");

        // Ambiguous
        assert!(expand_key("p", &candidates).is_err()); // matches phone, price

        // Unknown
        assert!(expand_key("x", &candidates).is_err());
    }

    #[test]
    fn test_parse_amount_coercion() {
        assert_eq!(parse_amount(Some(&json!(150))), 150.0);
        assert_eq!(parse_amount(Some(&json!(99.5))), 99.5);
        assert_eq!(parse_amount(Some(&json!("180.50"))), 180.5);
        assert_eq!(parse_amount(Some(&json!(" 75 RM"))), 75.0);
        assert_eq!(parse_amount(Some(&json!("1e3"))), 1000.0);
        assert_eq!(parse_amount(Some(&json!("2.5E2"))), 250.0);
        assert_eq!(parse_amount(Some(&json!("15e-1 RM"))), 1.5);
        assert_eq!(parse_amount(Some(&json!("40e"))), 40.0);
        assert_eq!(parse_amount(Some(&json!("40e+"))), 40.0);
        assert_eq!(parse_amount(Some(&json!("abc"))), 0.0);
        assert_eq!(parse_amount(Some(&json!(""))), 0.0);
        assert_eq!(parse_amount(Some(&json!("."))), 0.0);
        assert_eq!(parse_amount(Some(&json!(null))), 0.0);
        assert_eq!(parse_amount(Some(&json!(true))), 0.0);
        assert_eq!(parse_amount(Some(&json!([1, 2]))), 0.0);
        assert_eq!(parse_amount(None), 0.0);
    }
}
