use serde_json::{Map, Value};

use crate::jobs::model::{Job, UNKNOWN};

/// Reshapes a raw upstream listing into `Job`s, preserving upstream order.
///
/// The job board puts a legal notice in slot 0 of its array, so that slot is
/// always dropped. A body that is not an array yields nothing. Records without
/// a non-empty `id` are skipped; every other field falls back to a default
/// instead of failing the record.
pub fn normalize(raw: Value) -> Vec<Job> {
    let Value::Array(items) = raw else {
        return Vec::new();
    };

    items
        .into_iter()
        .skip(1)
        .filter_map(|item| match item {
            Value::Object(obj) => normalize_one(&obj),
            _ => None,
        })
        .collect()
}

fn normalize_one(obj: &Map<String, Value>) -> Option<Job> {
    let id = identifier(obj.get("id"))?;

    Some(Job {
        id,
        title: text(obj, "position").unwrap_or_else(|| UNKNOWN.to_string()),
        company: text(obj, "company").unwrap_or_else(|| UNKNOWN.to_string()),
        location: text(obj, "location"),
        salary: text(obj, "salary"),
        url: text(obj, "url").unwrap_or_default(),
        description: text(obj, "description"),
    })
}

// Upstream ids show up as strings, occasionally as bare numbers.
fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drops_metadata_slot_and_records_without_id() {
        let raw = json!([
            {"legal": "notice"},
            {"id": "1", "position": "Engineer", "company": "Acme", "url": "http://x/1"},
            {"company": "NoId"}
        ]);

        let jobs = normalize(raw);

        assert_eq!(
            jobs,
            vec![Job {
                id: "1".into(),
                title: "Engineer".into(),
                company: "Acme".into(),
                location: None,
                salary: None,
                url: "http://x/1".into(),
                description: None,
            }]
        );
    }

    #[test]
    fn empty_array_yields_nothing() {
        assert!(normalize(json!([])).is_empty());
    }

    #[test]
    fn first_slot_is_dropped_even_if_it_looks_like_a_job() {
        let raw = json!([
            {"id": "0", "position": "Decoy", "url": "http://x/0"},
            {"id": "2", "position": "Real", "url": "http://x/2"}
        ]);

        let ids: Vec<_> = normalize(raw).into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn non_array_body_is_treated_as_empty() {
        assert!(normalize(json!({"id": "1"})).is_empty());
        assert!(normalize(json!("nope")).is_empty());
        assert!(normalize(Value::Null).is_empty());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let raw = json!([
            {},
            {"id": "7", "position": null, "location": null}
        ]);

        let job = normalize(raw).pop().expect("one job");
        assert_eq!(job.title, "Unknown");
        assert_eq!(job.company, "Unknown");
        assert_eq!(job.url, "");
        assert_eq!(job.location, None);
        assert_eq!(job.salary, None);
        assert_eq!(job.description, None);
    }

    #[test]
    fn empty_or_non_scalar_ids_are_rejected() {
        let raw = json!([
            {},
            {"id": ""},
            {"id": null},
            {"id": ["1"]},
            {"id": false},
            "not an object",
            {"id": 42, "url": "http://x/42"}
        ]);

        let jobs = normalize(raw);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "42");
        assert_eq!(jobs[0].url, "http://x/42");
    }

    #[test]
    fn keeps_upstream_order_and_passes_optionals_through() {
        let raw = json!([
            {"legal": "notice"},
            {"id": "b", "location": "Remote", "salary": "$100k", "description": "<p>hi</p>"},
            {"id": "a"},
            {"id": "c", "salary": 120000}
        ]);

        let jobs = normalize(raw);
        let ids: Vec<_> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(jobs[0].location.as_deref(), Some("Remote"));
        assert_eq!(jobs[0].salary.as_deref(), Some("$100k"));
        assert_eq!(jobs[0].description.as_deref(), Some("<p>hi</p>"));
        assert_eq!(jobs[2].salary.as_deref(), Some("120000"));
    }
}
