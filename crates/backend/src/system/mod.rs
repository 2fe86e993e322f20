pub mod middleware;
pub mod refresh_worker;
pub mod tracing;
