//! HTTP layer: one POST route that asks the model about an IPC section.

mod config;
mod error;
mod routes;
mod server;

pub use config::{HandlerConfig, ResponseMode};
pub use error::HandlerError;
pub use routes::QueryRequest;
pub use server::{AppState, router, run};
