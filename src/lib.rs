pub mod config;
pub mod detector;
pub mod extractors;
pub mod frame;
pub mod gesture;
pub mod logging;
pub mod middleware;
pub mod pipeline;
pub mod response;
pub mod routes;
pub mod state;
