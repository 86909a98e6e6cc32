use axum::Json;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Success envelope of a callable endpoint: `{"result": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResult<T: Serialize> {
    pub result: T,
}

impl<T: Serialize> ApiResult<T> {
    pub fn success(data: T) -> Json<Self> {
        Json(Self { result: data })
    }
}

/// Request envelope of a callable endpoint: `{"data": ...}`.
#[derive(Debug, Deserialize)]
pub struct CallableRequest<T> {
    pub data: Option<T>,
}

impl<T: DeserializeOwned> CallableRequest<T> {
    /// Decodes a callable body leniently: an empty or unreadable body yields no data,
    /// leaving the handler to report what is missing.
    pub fn from_body(body: &[u8]) -> Option<T> {
        if body.is_empty() {
            return None;
        }
        serde_json::from_slice::<CallableRequest<T>>(body)
            .ok()
            .and_then(|req| req.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        name: Option<String>,
    }

    #[test]
    fn decodes_data_field() {
        let data = CallableRequest::<Payload>::from_body(br#"{"data":{"name":"x"}}"#);
        assert_eq!(
            data,
            Some(Payload {
                name: Some("x".into())
            })
        );
    }

    #[test]
    fn missing_or_broken_body_yields_none() {
        assert_eq!(CallableRequest::<Payload>::from_body(b""), None);
        assert_eq!(CallableRequest::<Payload>::from_body(b"{}"), None);
        assert_eq!(CallableRequest::<Payload>::from_body(b"not json"), None);
    }

    #[test]
    fn null_data_and_extra_fields_are_tolerated() {
        assert_eq!(
            CallableRequest::<Payload>::from_body(br#"{"data":null}"#),
            None
        );
        assert_eq!(
            CallableRequest::<Payload>::from_body(br#"{"data":{"name":null},"other":1}"#),
            Some(Payload { name: None })
        );
    }

    #[test]
    fn success_wraps_in_result() {
        let Json(body) = ApiResult::success(5);
        assert_eq!(serde_json::to_value(&body).unwrap(), serde_json::json!({"result": 5}));
    }
}
