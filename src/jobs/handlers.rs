//! # Handlers HTTP para Jobs
//! src/jobs/handlers.rs
//!
//! Implementa los endpoints de la cola:
//! - `POST /enqueue`
//! - `GET /result?id=N`
//! - `GET /stats`
//!
//! Todo error recuperable se convierte aquí en un código HTTP.

use crate::error::JobError;
use crate::http::{Request, Response, StatusCode};
use crate::jobs::manager::JobManager;
use crate::jobs::types::EnqueuePayload;
use serde_json::json;

/// Segundos sugeridos al cliente cuando la cola está llena
const RETRY_AFTER_SECS: &str = "1";

/// Handler para `POST /enqueue`
///
/// Body: `{"Data": "..."}`. Responde con el job creado.
///
/// # Ejemplo de response
/// ```json
/// {"id": 1, "data": "hello"}
/// ```
pub fn enqueue_handler(req: &Request, job_manager: &JobManager) -> Response {
    // Decodificar antes de asignar ID: un payload inválido no consume IDs
    let payload = match EnqueuePayload::from_json(req.body()) {
        Ok(payload) => payload,
        Err(e) => return error_response(&JobError::InvalidPayload(e)),
    };

    match job_manager.submit_job(payload.data) {
        Ok(job) => Response::json(&job),
        Err(e) => error_response(&e),
    }
}

/// Handler para `GET /result?id=N`
///
/// - 200 con `{"id": N, "processed": "..."}` si el job terminó
/// - 202 con `{"id": N, "status": "not ready"}` si no (o si el ID nunca existió)
/// - 400 si `id` falta o no es entero
pub fn result_handler(req: &Request, job_manager: &JobManager) -> Response {
    let id = match parse_job_id(req.query_param("id")) {
        Ok(id) => id,
        Err(e) => return error_response(&e),
    };

    // Un ID negativo es un entero válido que nunca se emite
    let result = u64::try_from(id)
        .ok()
        .and_then(|id| job_manager.get_result(id));

    match result {
        Some(result) => Response::json(&result),
        None => Response::json_with_status(
            StatusCode::Accepted,
            &json!({ "id": id, "status": "not ready" }),
        ),
    }
}

/// Handler para `GET /stats`
pub fn stats_handler(_req: &Request, job_manager: &JobManager) -> Response {
    Response::json(&job_manager.stats())
}

/// Parsea el parámetro `id` como entero
pub fn parse_job_id(raw: Option<&str>) -> Result<i64, JobError> {
    let raw = raw.ok_or(JobError::MissingId)?;
    raw.parse::<i64>()
        .map_err(|_| JobError::InvalidId(raw.to_string()))
}

/// Traduce un error del sistema de jobs a una respuesta HTTP
fn error_response(error: &JobError) -> Response {
    if error.is_client_error() {
        tracing::debug!(error = %error, "rejected request");
    } else {
        tracing::warn!(error = %error, "job submission failed");
    }

    match error {
        JobError::InvalidPayload(_) => Response::error(StatusCode::BadRequest, "bad payload"),
        JobError::InvalidId(_) | JobError::MissingId => {
            Response::error(StatusCode::BadRequest, "bad id")
        }
        JobError::QueueFull { .. } => {
            let mut response = Response::error(StatusCode::ServiceUnavailable, &error.to_string());
            response.add_header("Retry-After", RETRY_AFTER_SECS);
            response
        }
        JobError::Closed => Response::error(StatusCode::ServiceUnavailable, &error.to_string()),
    }
}
