use serde_json::value::Value as JsonValue;
use serde_json::{json, Map};
use stockfs_core_store::{columns, ContentValues, Error, Product, Value};

/// Convert one JSON cell into a column value.
///
/// Arrays and objects are not column values.
pub fn value_from_json(column: &str, json: &JsonValue) -> Result<Value, Error> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Integer(i))
            } else if n.is_u64() {
                Err(Error::invalid_argument(
                    column,
                    format!("{} is out of range", n),
                ))
            } else {
                // Non-integral numbers only come back as f64
                Ok(Value::Float(n.as_f64().unwrap_or(f64::NAN)))
            }
        }
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Array(_) => Err(Error::invalid_argument(
            column,
            "arrays are not column values",
        )),
        JsonValue::Object(_) => Err(Error::invalid_argument(
            column,
            "objects are not column values",
        )),
    }
}

pub fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => json!(b),
        Value::Integer(i) => json!(i),
        Value::Float(x) => json!(x),
        Value::String(s) => json!(s),
    }
}

/// Read a JSON object such as `{"name": "Widget", "price": 500}` as a
/// write payload.
pub fn content_values_from_json(json: &JsonValue) -> Result<ContentValues, Error> {
    let JsonValue::Object(map) = json else {
        return Err(Error::Other {
            message: format!("expected a JSON object of columns, got {}", json),
        });
    };

    map.iter()
        .map(|(column, cell)| Ok::<_, Error>((column.clone(), value_from_json(column, cell)?)))
        .collect()
}

pub fn content_values_to_json(values: &ContentValues) -> JsonValue {
    let map: Map<String, JsonValue> = values
        .iter()
        .map(|(column, value)| (column.clone(), value_to_json(value)))
        .collect();
    JsonValue::Object(map)
}

/// A row in its persisted column layout.
pub fn product_to_json(row: &Product) -> JsonValue {
    let mut map = Map::new();
    map.insert(columns::ID.to_string(), json!(row.id.get()));
    map.insert(columns::NAME.to_string(), json!(row.name));
    map.insert(columns::PRICE.to_string(), json!(row.price));
    map.insert(columns::QUANTITY.to_string(), json!(row.quantity));
    map.insert(columns::IMAGE_URI.to_string(), json!(row.image_ref));
    JsonValue::Object(map)
}
