//! # Módulo de Caché
//! src/cache/mod.rs
//!
//! Caché LRU (Least Recently Used) de capacidad fija para el contenido de
//! archivos ya leídos de disco. Combina dos vistas sobre las mismas entradas:
//!
//! - Un índice hash `path → handle` para búsqueda O(1)
//! - Una lista doblemente enlazada de recencia (head = más reciente,
//!   tail = menos reciente) para relinking O(1)
//!
//! Las entradas viven en una arena de slots y se referencian con handles
//! enteros, no con punteros: mover al head o expulsar el tail es O(1) sin
//! riesgo de referencias colgantes.
//!
//! El caché es dueño de su propia sincronización: todas las operaciones
//! públicas toman una única sección crítica interna que cubre el índice y la
//! lista de recencia juntos. Los callers no pueden romper el contrato de
//! concurrencia desde afuera.

pub mod entry;
pub mod store;

// Re-exportamos los tipos principales para facilitar su uso
pub use entry::CacheEntry;
pub use store::{CacheError, CacheHit, CacheStats, CacheStore};
