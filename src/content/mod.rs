//! # Módulo de Contenido
//! src/content/mod.rs
//!
//! Colaboradores de I/O del servidor: lectura de archivos de disco y
//! resolución de tipos MIME. Sus contratos son deliberadamente simples:
//!
//! - "dado un path, retorna los bytes y su tamaño, o una señal de no
//!   encontrado" (`file`)
//! - "dado un path, retorna un Content-Type" (`mime`)

pub mod file;
pub mod mime;

// Re-exportamos los tipos principales para facilitar su uso
pub use file::{FileData, FileError};
