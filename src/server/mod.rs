//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones, una por thread
//! 3. Lee y parsea requests HTTP/1.0
//! 4. Enruta a los handlers de la cola y responde

pub mod tcp;

pub use tcp::Server;
