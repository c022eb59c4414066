use serde_json::Value;

use super::scalar;

/// Headline fields, in priority order.
const PRIORITY_KEYS: [&str; 7] = [
    "score",
    "cash_released",
    "cash_retained",
    "confidence",
    "gross_margin",
    "reached",
    "tier",
];

/// Print just the headline value of the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(line) = headline(result) {
        println!("{line}");
        return;
    }
    println!("{}", scalar(result));
}

fn headline(result: &Value) -> Option<String> {
    let map = result.as_object()?;
    // Analysis results nest the score inside the diagnostic.
    if let Some(score) = map.get("diagnostic").and_then(|d| d.get("score")) {
        return Some(format!("score: {}", scalar(score)));
    }
    // Tier outcomes carry their indicators one level down.
    let indicators = map.get("indicators").and_then(Value::as_object);
    for key in PRIORITY_KEYS {
        let found = map
            .get(key)
            .or_else(|| indicators.and_then(|i| i.get(key)))
            .filter(|v| !v.is_null());
        if let Some(val) = found {
            return Some(format!("{key}: {}", scalar(val)));
        }
    }
    map.iter()
        .next()
        .map(|(key, val)| format!("{key}: {}", scalar(val)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline_prefers_score() {
        let value = json!({ "diagnostic": { "score": 85 }, "reached": 3 });
        assert_eq!(headline(&value), Some("score: 85".to_string()));
    }

    #[test]
    fn test_headline_reads_indicators() {
        let value = json!({ "meta": {}, "indicators": { "gross_margin": "40" } });
        assert_eq!(headline(&value), Some("gross_margin: 40".to_string()));
    }
}
