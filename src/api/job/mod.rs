pub mod models;
pub mod dto;
pub mod handlers;
pub mod resolver;
pub mod service;

pub use service::JobService;
