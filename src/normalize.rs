// Reconciles an untrusted payload against the canonical report.
//
// `merge` works on raw JSON and is the only place that reasons about
// missing or mistyped keys. `normalize` runs the merge against a baseline
// report and projects the result back onto the typed schema.
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::IntelError;
use crate::schema::Report;
use crate::types::HotelQuery;
use crate::util::NOT_AVAILABLE;

/// Recursive object merge.
///
/// For every key in `incoming`: when both sides hold an object the merge
/// recurses, otherwise the incoming value replaces the base value verbatim
/// (arrays, scalars, nulls, type mismatches). Keys present only in `base`
/// are kept; keys present only in `incoming` are added.
pub fn merge(base: &Value, incoming: &Value) -> Value {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            Value::Object(merge_maps(base_map, incoming_map))
        }
        _ => incoming.clone(),
    }
}

fn merge_maps(base: &Map<String, Value>, incoming: &Map<String, Value>) -> Map<String, Value> {
    let mut out = base.clone();
    for (key, value) in incoming {
        let merged = match out.get(key) {
            Some(existing @ Value::Object(_)) if value.is_object() => merge(existing, value),
            _ => value.clone(),
        };
        out.insert(key.clone(), merged);
    }
    out
}

/// Merge `incoming` onto `base` and return a fully-shaped report.
///
/// Never fails: a payload root that is not an object contributes nothing,
/// and mistyped leaves resolve to their schema defaults. Afterwards the hotel
/// name and city fall back to the query when left empty or unknown.
pub fn normalize(base: &Report, incoming: &Value, query: &HotelQuery) -> Report {
    let base_value = match serde_json::to_value(base) {
        Ok(v) => v,
        Err(err) => {
            warn!(error = %err, "baseline report failed to serialize; using incoming payload alone");
            Value::Object(Map::new())
        }
    };

    let merged = if incoming.is_object() {
        merge(&base_value, incoming)
    } else {
        if !incoming.is_null() {
            warn!(kind = value_kind(incoming), "payload root is not an object; ignoring it");
        }
        base_value
    };

    let mut report: Report = serde_json::from_value(merged).unwrap_or_else(|err| {
        warn!(error = %err, "merged payload did not decode; falling back to baseline");
        base.clone()
    });
    apply_query_fallback(&mut report, query);
    report
}

fn apply_query_fallback(report: &mut Report, query: &HotelQuery) {
    if is_unset(&report.basic_info.hotel_name) {
        report.basic_info.hotel_name = query.hotel_name.clone();
    }
    if is_unset(&report.basic_info.city) {
        report.basic_info.city = query.city.clone();
    }
}

fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == NOT_AVAILABLE
}

/// Cut the text down to the outermost `{ ... }` span. Models tend to wrap
/// JSON in prose or code fences even when asked not to.
pub fn extract_json(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(first), Some(last)) if first < last => &text[first..=last],
        _ => text,
    }
}

/// Parse the model's text into structured data. This is the only fallible
/// step between the service and a normalized report.
pub fn parse_payload(text: &str) -> Result<Value, IntelError> {
    serde_json::from_str(extract_json(text)).map_err(IntelError::MalformedPayload)
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::default_report;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn query() -> HotelQuery {
        HotelQuery::new("Treebo Acacia", "Pune").unwrap()
    }

    #[test]
    fn merge_prefers_incoming_leaves_and_keeps_base_ones() {
        let base = json!({ "a": { "x": 1, "y": 2 }, "b": "keep" });
        let incoming = json!({ "a": { "y": 20, "z": 30 } });
        assert_eq!(
            merge(&base, &incoming),
            json!({ "a": { "x": 1, "y": 20, "z": 30 }, "b": "keep" })
        );
    }

    #[test]
    fn merge_replaces_arrays_wholesale() {
        let base = json!({ "list": [1, 2, 3] });
        let incoming = json!({ "list": [9] });
        assert_eq!(merge(&base, &incoming), json!({ "list": [9] }));
    }

    #[test]
    fn merge_lets_mismatched_types_win() {
        let base = json!({ "amenities": { "gym": { "available": false } } });
        let incoming = json!({ "amenities": "see website" });
        assert_eq!(merge(&base, &incoming), json!({ "amenities": "see website" }));

        let incoming = json!({ "amenities": { "gym": [true] } });
        assert_eq!(
            merge(&base, &incoming),
            json!({ "amenities": { "gym": [true] } })
        );
    }

    #[test]
    fn merge_with_empty_incoming_is_identity() {
        let base = json!({ "a": { "b": [1] }, "c": null });
        assert_eq!(merge(&base, &json!({})), base);
    }

    #[test]
    fn normalize_fills_name_and_city_from_query() {
        let report = normalize(&default_report(), &json!({ "basic_info": {} }), &query());
        assert_eq!(report.basic_info.hotel_name, "Treebo Acacia");
        assert_eq!(report.basic_info.city, "Pune");
        assert_eq!(report.basic_info.segment, "N/A");
    }

    #[test]
    fn normalize_keeps_names_the_source_provided() {
        let incoming = json!({ "basic_info": { "hotel_name": "Acacia Residency", "city": "" } });
        let report = normalize(&default_report(), &incoming, &query());
        assert_eq!(report.basic_info.hotel_name, "Acacia Residency");
        assert_eq!(report.basic_info.city, "Pune");
    }

    #[test]
    fn normalize_ignores_non_object_roots() {
        for incoming in [json!(null), json!([1, 2]), json!("text"), json!(7)] {
            let report = normalize(&default_report(), &incoming, &query());
            let mut expected = default_report();
            expected.basic_info.hotel_name = "Treebo Acacia".into();
            expected.basic_info.city = "Pune".into();
            assert_eq!(report, expected);
        }
    }

    #[test]
    fn normalize_with_empty_payload_is_idempotent() {
        let first = normalize(
            &default_report(),
            &json!({ "revenue_insights": [{ "month": "Jan", "arr": 3100, "occupancy": 55 }] }),
            &query(),
        );
        let second = normalize(&first, &json!({}), &query());
        assert_eq!(second, first);
    }

    #[test]
    fn extract_json_strips_code_fences() {
        let text = "Here you go:\n```json\n{\"a\": {\"b\": 1}}\n```";
        assert_eq!(extract_json(text), "{\"a\": {\"b\": 1}}");
        assert_eq!(extract_json("no braces"), "no braces");
    }

    #[test]
    fn parse_payload_rejects_garbage() {
        assert!(matches!(
            parse_payload("I could not find that hotel."),
            Err(IntelError::MalformedPayload(_))
        ));
        assert_eq!(parse_payload("```{\"a\":1}```").unwrap(), json!({ "a": 1 }));
    }
}
