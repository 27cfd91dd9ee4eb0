//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Mapea `(método, path)` a handlers.
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Si el path no existe retorna 404; si existe pero con otro método, 405.
//! Junto con la respuesta se retorna el path registrado que atendió el
//! request, o `UNMATCHED_ROUTE`; las métricas sólo usan esas claves.

use crate::http::{Method, Request, Response, StatusCode};

/// Clave de métricas para requests que no corresponden a ninguna ruta
pub const UNMATCHED_ROUTE: &str = "<unmatched>";

/// Un handler recibe un Request y retorna una Response.
/// Puede capturar estado compartido (ej: un `Arc<JobManager>`).
pub type Handler = Box<dyn Fn(&Request) -> Response + Send + Sync>;

struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

/// Tabla de rutas
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra una ruta con su handler
    ///
    /// # Ejemplo
    /// ```
    /// use job_queue::http::{Method, Request, Response};
    /// use job_queue::router::Router;
    ///
    /// let mut router = Router::new();
    /// router.register(Method::GET, "/ping", |_req: &Request| {
    ///     Response::json(&serde_json::json!({"pong": true}))
    /// });
    /// ```
    pub fn register<F>(&mut self, method: Method, path: &str, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            handler: Box::new(handler),
        });
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// Retorna la respuesta y el path registrado que la produjo.
    pub fn route(&self, request: &Request) -> (Response, &str) {
        let path = request.path();

        let mut known_path = None;
        for route in self.routes.iter().filter(|r| r.path == path) {
            if route.method == request.method() {
                return ((route.handler)(request), route.path.as_str());
            }
            known_path = Some(route.path.as_str());
        }

        if let Some(known_path) = known_path {
            let allowed: Vec<&str> = self
                .routes
                .iter()
                .filter(|r| r.path == path)
                .map(|r| r.method.as_str())
                .collect();

            let mut response = Response::error(
                StatusCode::MethodNotAllowed,
                &format!("Method {} not allowed on {}", request.method().as_str(), path),
            );
            response.add_header("Allow", &allowed.join(", "));
            return (response, known_path);
        }

        (
            Response::error(StatusCode::NotFound, &format!("Route not found: {}", path)),
            UNMATCHED_ROUTE,
        )
    }
}
