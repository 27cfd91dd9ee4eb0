//! # Logging
//! src/telemetry.rs
//!
//! Inicializa `tracing` con filtro desde `RUST_LOG` (por defecto `info`).

use tracing_subscriber::EnvFilter;

/// Instala el subscriber global
///
/// Con `json = true` cada evento sale como una línea JSON. Llamarla más de
/// una vez no tiene efecto.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "tracing already initialized");
    }
}
