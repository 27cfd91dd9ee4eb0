//! # Tipos del Sistema de Jobs
//! src/jobs/types.rs
//!
//! Define el job encolado, su resultado y el payload que envía el cliente.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identificador de job, asignado en orden creciente desde 1
pub type JobId = u64;

/// Unidad de trabajo encolada
///
/// Se crea al aceptar un `POST /enqueue`, es inmutable y la consume
/// exactamente un worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// ID único del job
    pub id: JobId,

    /// Datos opacos enviados por el cliente
    pub data: String,
}

impl Job {
    pub fn new(id: JobId, data: String) -> Self {
        Self { id, data }
    }
}

/// Resultado de procesar un job, con el mismo ID que el job de origen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub id: JobId,
    pub processed: String,
}

/// Nombre del campo de datos en el body de `POST /enqueue`
const DATA_FIELD: &str = "Data";

/// Body aceptado por `POST /enqueue`
///
/// El campo `Data` se reconoce sin distinguir mayúsculas (`data`, `DATA`...);
/// si aparece exactamente como `Data`, ese gana. Si falta o es `null`, los
/// datos quedan vacíos en lugar de rechazar el request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnqueuePayload {
    pub data: String,
}

impl EnqueuePayload {
    /// Decodifica el body JSON de un request
    ///
    /// Falla si el body no es JSON, no es un objeto (ni `null`) o si el
    /// campo de datos no es un string.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let fields: Option<Map<String, Value>> = serde_json::from_slice(body)?;

        let mut exact = None;
        let mut folded = None;
        for (key, value) in fields.into_iter().flatten() {
            if key == DATA_FIELD {
                exact = Some(value);
            } else if folded.is_none() && key.eq_ignore_ascii_case(DATA_FIELD) {
                folded = Some(value);
            }
        }

        let data = match exact.or(folded) {
            None | Some(Value::Null) => String::new(),
            Some(value) => serde_json::from_value(value)?,
        };

        Ok(Self { data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_serialization() {
        let job = Job::new(1, "hello".to_string());
        let json = serde_json::to_string(&job).unwrap();
        assert_eq!(json, r#"{"id":1,"data":"hello"}"#);
    }

    #[test]
    fn test_result_serialization() {
        let result = JobResult {
            id: 7,
            processed: "processed: x".to_string(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"id":7,"processed":"processed: x"}"#);
    }

    #[test]
    fn test_payload_field_names() {
        let upper = EnqueuePayload::from_json(br#"{"Data":"a"}"#).unwrap();
        assert_eq!(upper.data, "a");

        let lower = EnqueuePayload::from_json(br#"{"data":"b"}"#).unwrap();
        assert_eq!(lower.data, "b");
    }

    #[test]
    fn test_payload_field_name_ignores_case() {
        let payload = EnqueuePayload::from_json(br#"{"DATA":"x"}"#).unwrap();
        assert_eq!(payload.data, "x");

        let payload = EnqueuePayload::from_json(br#"{"dAtA":"y","other":1}"#).unwrap();
        assert_eq!(payload.data, "y");
    }

    #[test]
    fn test_payload_exact_field_wins() {
        let payload = EnqueuePayload::from_json(br#"{"DATA":"folded","Data":"exact"}"#).unwrap();
        assert_eq!(payload.data, "exact");
    }

    #[test]
    fn test_payload_null_is_empty() {
        assert_eq!(EnqueuePayload::from_json(b"null").unwrap().data, "");
        assert_eq!(EnqueuePayload::from_json(br#"{"Data":null}"#).unwrap().data, "");
    }

    #[test]
    fn test_payload_missing_field_is_empty() {
        let payload = EnqueuePayload::from_json(b"{}").unwrap();
        assert_eq!(payload.data, "");
    }

    #[test]
    fn test_payload_rejects_garbage() {
        assert!(EnqueuePayload::from_json(b"not json").is_err());
        assert!(EnqueuePayload::from_json(b"").is_err());
        assert!(EnqueuePayload::from_json(br#"{"Data":42}"#).is_err());
        assert!(EnqueuePayload::from_json(br#"{"data":["a"]}"#).is_err());
        assert!(EnqueuePayload::from_json(br#"["a"]"#).is_err());
    }
}
