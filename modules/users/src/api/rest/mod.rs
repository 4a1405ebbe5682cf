pub mod dto;
pub mod error;
pub mod handlers;
pub mod payload;
pub mod routes;
