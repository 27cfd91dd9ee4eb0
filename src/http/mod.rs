//! # Módulo HTTP
//!
//! Implementación mínima de HTTP/1.0 para los endpoints de la cola:
//!
//! - Parsing de requests (request line, query, headers, body)
//! - Construcción de responses
//! - Códigos de estado
//!
//! Cada conexión atiende un solo request y se cierra (`Connection: close`).

pub mod request;
pub mod response;
pub mod status;

pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
