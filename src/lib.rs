//! # Static Server
//! src/lib.rs
//!
//! Servidor HTTP/1.0 de archivos estáticos implementado desde cero para
//! demostrar conceptos de sistemas operativos: concurrencia, sincronización,
//! productor/consumidor y manejo de recursos.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing y manejo del protocolo HTTP/1.0
//! - `server`: Lógica del servidor TCP y manejo de conexiones
//! - `cache`: Caché LRU de capacidad fija para contenido ya leído de disco
//! - `workers`: Pool fijo de workers consumiendo una cola FIFO de tareas
//! - `content`: Lectura de archivos de disco y resolución de tipos MIME
//! - `metrics`: Recolección de métricas y observabilidad
//!
//! ## Flujo de una petición
//!
//! ```text
//! accept() → Task → WorkerPool → handler → CacheStore (hit/miss) → socket
//! ```
//!
//! El hilo que acepta conexiones nunca procesa peticiones: solo las envuelve
//! en tareas y las encola. Un worker del pool las desencola en orden FIFO.
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use static_server::server::Server;
//! use static_server::config::Config;
//!
//! let config = Config::default();
//! let mut server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("Error fatal del servidor");
//! ```

pub mod http;
pub mod config;
pub mod server;
pub mod cache;
pub mod workers;
pub mod content;
pub mod metrics;
