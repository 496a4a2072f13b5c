use serde_json::Value as Json;

use super::Value;

impl From<Json> for Value {
    fn from(json: Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // u64 beyond i64::MAX and fractional numbers land here.
                None => Value::float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::from(s),
            Json::Array(items) => Value::Seq(items.into_iter().map(Value::from).collect()),
            Json::Object(fields) => {
                Value::Record(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{oracle::StructuralHash, Value};

    #[test]
    fn objects_convert_to_records() {
        let a = Value::from(json!({"name": "ada", "tags": [1, 2.5, null]}));
        let b = Value::from(json!({"tags": [1, 2.5, null], "name": "ada"}));
        assert_eq!(a, b);
        assert_eq!(a.hash_key().unwrap(), b.hash_key().unwrap());
        assert_eq!(
            a.field("tags"),
            Some(&Value::seq([Value::Int(1), Value::float(2.5), Value::Null]))
        );
    }
}
