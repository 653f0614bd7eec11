//! HTTP - Axum API 层
//!
//! 只做字段绑定与错误映射，编排全部在应用层

mod dto;
mod error;
mod handlers;
mod routes;
mod server;
mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
