use serde::Serialize;

/// Liveness payload for the public health route.
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub status: &'static str,
}
