use crate::generation::Generator;
use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct ServerState {
    pub start_time: Instant,
    pub generator: Arc<Generator>,
    pub catalog_size: usize,
}

impl FromRef<ServerState> for Arc<Generator> {
    fn from_ref(input: &ServerState) -> Self {
        input.generator.clone()
    }
}
