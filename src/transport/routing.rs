use serde_json::Value;

/// Routing key of the send/lookup payloads. Consumed to pick the endpoint
/// and never forwarded to the API.
pub const SEND_TYPE_FIELD: &str = "sendType";

/// Join an endpoint suffix to the base URL with exactly one separating
/// slash, whether or not the suffix carries a leading one.
pub fn join_endpoint(base: &str, end_point: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        end_point.trim_start_matches('/')
    )
}

/// Split the routing key out of a payload.
///
/// Returns the `sendType` value and the remaining body to forward. The
/// payload is taken by value; the caller's own copy is never mutated.
/// `None` when the payload is not an object or lacks a string `sendType`,
/// which validation rules out before routing.
pub fn split_send_type(payload: Value) -> Option<(String, Value)> {
    let Value::Object(mut map) = payload else {
        return None;
    };
    let send_type = map.remove(SEND_TYPE_FIELD)?.as_str()?.to_owned();
    Some((send_type, Value::Object(map)))
}

/// Flatten a JSON object into query parameters. Strings are passed through
/// verbatim; numbers and booleans use their JSON rendering.
pub fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = params else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}
