use serde_json::{Map, Value};

/// Type tag stored alongside every settings value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingType {
    String,
    Number,
    Boolean,
    Json,
}

impl SettingType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Json => "json",
        }
    }

    /// Unrecognized tags decode as `string`, matching the defensive decode
    /// policy: a bad tag degrades the field, it never fails the read.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "json" => Self::Json,
            _ => Self::String,
        }
    }
}

/// Explicit two-part settings key.
///
/// The storage form is `<category>_<field>`. Parsing splits on the FIRST
/// underscore only, so a field name may itself contain underscores
/// (`security_max_login_attempts` → category `security`, field
/// `max_login_attempts`); a category name may not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingKey {
    pub category: String,
    pub field: String,
}

impl SettingKey {
    #[must_use]
    pub fn new(category: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            field: field.into(),
        }
    }

    #[must_use]
    pub fn encode(&self) -> String {
        format!("{}_{}", self.category, self.field)
    }

    /// Splits a stored key. Keys without an underscore have no category;
    /// they land under an empty-string category rather than being dropped.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        key.split_once('_').map_or_else(
            || Self::new("", key),
            |(category, field)| Self::new(category, field),
        )
    }
}

/// One flat row, ready for upsert keyed on `key.encode()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingRow {
    pub key: SettingKey,
    pub value: String,
    pub value_type: SettingType,
}

/// Flattens a nested `{category: {field: value}}` object into rows.
///
/// Non-object top-level values are skipped: the settings UI only ever
/// submits category groups. Row order is immaterial; the persistence layer
/// upserts by key.
#[must_use]
pub fn flatten(nested: &Map<String, Value>) -> Vec<SettingRow> {
    let mut rows = Vec::new();

    for (category, group) in nested {
        let Some(fields) = group.as_object() else {
            continue;
        };

        for (field, value) in fields {
            let (value_type, encoded) = encode_value(value);
            rows.push(SettingRow {
                key: SettingKey::new(category.clone(), field.clone()),
                value: encoded,
                value_type,
            });
        }
    }

    rows
}

/// Rebuilds the nested object from stored rows, grouping by category.
#[must_use]
pub fn unflatten(rows: &[SettingRow]) -> Map<String, Value> {
    let mut nested = Map::new();

    for row in rows {
        let decoded = decode_value(&row.value, row.value_type);

        let group = nested
            .entry(row.key.category.clone())
            .or_insert_with(|| Value::Object(Map::new()));

        if let Some(group) = group.as_object_mut() {
            group.insert(row.key.field.clone(), decoded);
        }
    }

    nested
}

fn encode_value(value: &Value) -> (SettingType, String) {
    match value {
        Value::Bool(b) => (SettingType::Boolean, b.to_string()),
        Value::Number(n) => (SettingType::Number, n.to_string()),
        Value::Object(_) | Value::Array(_) => (SettingType::Json, value.to_string()),
        Value::String(s) => (SettingType::String, s.clone()),
        Value::Null => (SettingType::String, String::new()),
    }
}

/// Decodes one stored value. Malformed data degrades per field: bad JSON
/// becomes `{}`, an unparseable number becomes `0`. Decimals truncate to
/// integers; float settings are unsupported.
fn decode_value(raw: &str, value_type: SettingType) -> Value {
    match value_type {
        SettingType::Boolean => Value::Bool(raw == "true"),
        SettingType::Number => {
            let n = raw
                .parse::<i64>()
                .or_else(|_| raw.parse::<f64>().map(|f| f.trunc() as i64))
                .unwrap_or(0);
            Value::Number(n.into())
        }
        SettingType::Json => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::Object(Map::new()))
        }
        SettingType::String => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_round_trip_all_types_across_categories() {
        let nested = as_map(json!({
            "general": {
                "site_name": "Vitrine Consulting",
                "posts_per_page": 10,
                "maintenance_mode": false,
            },
            "social": {
                "links": {"github": "https://github.com/vitrine", "x": "@vitrine"},
                "show_footer_icons": true,
            },
        }));

        let rows = flatten(&nested);
        assert_eq!(rows.len(), 5);
        assert_eq!(unflatten(&rows), nested);
    }

    #[test]
    fn test_flatten_type_tags() {
        let nested = as_map(json!({
            "seo": {
                "title": "plain",
                "depth": 3,
                "indexed": true,
                "keywords": ["rust", "consulting"],
            }
        }));

        let rows = flatten(&nested);
        let tag = |field: &str| {
            rows.iter()
                .find(|r| r.key.field == field)
                .map(|r| r.value_type)
                .unwrap()
        };

        assert_eq!(tag("title"), SettingType::String);
        assert_eq!(tag("depth"), SettingType::Number);
        assert_eq!(tag("indexed"), SettingType::Boolean);
        assert_eq!(tag("keywords"), SettingType::Json);
    }

    #[test]
    fn test_key_splits_on_first_underscore_only() {
        let key = SettingKey::parse("security_max_login_attempts");
        assert_eq!(key.category, "security");
        assert_eq!(key.field, "max_login_attempts");
        assert_eq!(key.encode(), "security_max_login_attempts");
    }

    #[test]
    fn test_defensive_decode_of_malformed_json_row() {
        let rows = vec![
            SettingRow {
                key: SettingKey::new("social", "links"),
                value: "{not json".to_string(),
                value_type: SettingType::Json,
            },
            SettingRow {
                key: SettingKey::new("social", "show_footer_icons"),
                value: "true".to_string(),
                value_type: SettingType::Boolean,
            },
        ];

        let nested = unflatten(&rows);
        assert_eq!(nested["social"]["links"], json!({}));
        assert_eq!(nested["social"]["show_footer_icons"], json!(true));
    }

    #[test]
    fn test_number_decode_truncates_and_defaults() {
        assert_eq!(decode_value("42", SettingType::Number), json!(42));
        assert_eq!(decode_value("3.9", SettingType::Number), json!(3));
        assert_eq!(decode_value("-2.5", SettingType::Number), json!(-2));
        assert_eq!(decode_value("garbage", SettingType::Number), json!(0));
        assert_eq!(decode_value("", SettingType::Number), json!(0));
    }

    #[test]
    fn test_unknown_type_tag_decodes_as_string() {
        let rows = vec![SettingRow {
            key: SettingKey::new("general", "site_name"),
            value: "Vitrine".to_string(),
            value_type: SettingType::parse("mystery"),
        }];

        assert_eq!(unflatten(&rows)["general"]["site_name"], json!("Vitrine"));
    }

    #[test]
    fn test_null_encodes_as_empty_string() {
        let nested = as_map(json!({"general": {"tagline": null}}));
        let rows = flatten(&nested);

        assert_eq!(rows[0].value, "");
        assert_eq!(rows[0].value_type, SettingType::String);
        assert_eq!(unflatten(&rows)["general"]["tagline"], json!(""));
    }

    #[test]
    fn test_encode_is_idempotent_after_decode() {
        let nested = as_map(json!({
            "general": {"posts_per_page": 10, "maintenance_mode": true},
            "seo": {"keywords": ["a", "b"]},
        }));

        let first = flatten(&nested);
        let second = flatten(&unflatten(&first));

        let sorted = |mut rows: Vec<SettingRow>| {
            rows.sort_by(|a, b| a.key.encode().cmp(&b.key.encode()));
            rows
        };
        assert_eq!(sorted(first), sorted(second));
    }
}
