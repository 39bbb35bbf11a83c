// ./src/http/types.rs
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Outcome code carried in every response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    InvalidRequest,
}

impl ResponseCode {
    pub fn as_u8(self) -> u8 {
        match self {
            ResponseCode::Success => 0,
            ResponseCode::InvalidRequest => 1,
        }
    }
}

impl Serialize for ResponseCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for ResponseCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(ResponseCode::Success),
            1 => Ok(ResponseCode::InvalidRequest),
            other => Err(serde::de::Error::custom(format!("unknown response code {other}"))),
        }
    }
}

/// `{code, data, error}` body returned with HTTP 200 for every request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Envelope<T> {
    pub code: ResponseCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self { Self { code: ResponseCode::Success, data: Some(data), error: None } }

    pub fn invalid(error: impl ToString) -> Self {
        Self { code: ResponseCode::InvalidRequest, data: None, error: Some(error.to_string()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shapes() {
        let ok = serde_json::to_string(&Envelope::ok("pong")).unwrap();
        assert_eq!(ok, r#"{"code":0,"data":"pong"}"#);

        let err = serde_json::to_string(&Envelope::<()>::invalid("proof not found")).unwrap();
        assert_eq!(err, r#"{"code":1,"error":"proof not found"}"#);

        let back: Envelope<String> = serde_json::from_str(r#"{"code":1,"error":"x"}"#).unwrap();
        assert_eq!(back.code, ResponseCode::InvalidRequest);
        assert!(serde_json::from_str::<Envelope<String>>(r#"{"code":7}"#).is_err());
    }
}
