//! REST API server: settings, routes, extractors, DTOs and OpenAPI documentation.

pub mod dto;
pub mod error;
pub mod extract;
pub mod openapi;
pub mod routes;
pub mod settings;
pub mod state;
