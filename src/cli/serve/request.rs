//! JSON request decoding and validation.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::io::Read;
use thiserror::Error;

/// A decoded request body that failed its field constraints.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Field constraints checked after decoding.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Decode `body` as JSON into `T` and validate it.
///
/// The error is the message sent back to the client: `Invalid request ...`
/// for malformed JSON, the validation message otherwise.
pub fn decode_and_validate<T>(body: impl Read) -> Result<T, String>
where
    T: DeserializeOwned + Validate,
{
    let value: T =
        serde_json::from_reader(body).map_err(|e| format!("Invalid request {e}"))?;
    value.validate().map_err(|e| e.to_string())?;
    Ok(value)
}

/// `POST /todos`
#[derive(Debug, Deserialize)]
pub struct NewTodoRequest {
    #[serde(rename = "newTodo", default)]
    pub text: String,
}

impl Validate for NewTodoRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        let len = self.text.chars().count();
        if len == 0 {
            return Err(ValidationError("newTodo is required".into()));
        }
        if len > 100 {
            return Err(ValidationError(
                "newTodo must be at most 100 characters".into(),
            ));
        }
        Ok(())
    }
}

/// `POST /todos/toggle`, `POST /todos/delete`
#[derive(Debug, Deserialize)]
pub struct TodoIdRequest {
    #[serde(default)]
    pub id: String,
}

impl Validate for TodoIdRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError("id is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode<T: DeserializeOwned + Validate>(body: &str) -> Result<T, String> {
        decode_and_validate(body.as_bytes())
    }

    #[test]
    fn test_new_todo_ok() {
        let req: NewTodoRequest = decode(r#"{"newTodo": "buy milk"}"#).unwrap();
        assert_eq!(req.text, "buy milk");
    }

    #[test]
    fn test_new_todo_length_bounds() {
        let err = decode::<NewTodoRequest>(r#"{"newTodo": ""}"#).unwrap_err();
        assert_eq!(err, "newTodo is required");

        let long = "x".repeat(101);
        let err = decode::<NewTodoRequest>(&format!(r#"{{"newTodo": "{long}"}}"#)).unwrap_err();
        assert_eq!(err, "newTodo must be at most 100 characters");

        let exact = "é".repeat(100);
        assert!(decode::<NewTodoRequest>(&format!(r#"{{"newTodo": "{exact}"}}"#)).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = decode::<NewTodoRequest>("{newTodo").unwrap_err();
        assert!(err.starts_with("Invalid request "));
    }

    #[test]
    fn test_id_required() {
        assert_eq!(decode::<TodoIdRequest>("{}").unwrap_err(), "id is required");
        assert_eq!(decode::<TodoIdRequest>(r#"{"id": "a1"}"#).unwrap().id, "a1");
    }
}
