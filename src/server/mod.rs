//! # Módulo Server
//! src/server/mod.rs
//!
//! Lógica del servidor TCP: el loop de accept que produce tareas para el
//! pool (`tcp`) y el handler que cada worker ejecuta por conexión
//! (`handler`).

pub mod handler;
pub mod tcp;

pub use handler::ServerContext;
pub use tcp::{Server, ServerError};
