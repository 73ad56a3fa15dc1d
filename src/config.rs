//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor de archivos estáticos
//! con soporte completo para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./static_server --port 3490 \
//!   --workers 4 \
//!   --queue-capacity 64 \
//!   --cache-capacity 10
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=3490 HTTP_HOST=0.0.0.0 ./static_server
//! ```

use clap::Parser;

/// Configuración del servidor HTTP/1.0 de archivos estáticos
#[derive(Debug, Clone, Parser)]
#[command(name = "static_server")]
#[command(about = "Servidor HTTP/1.0 de archivos estáticos para Principios de Sistemas Operativos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "3490", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio raíz desde el que se sirven los archivos
    #[arg(long = "root", default_value = "./serverroot", env = "SERVER_ROOT")]
    pub root_dir: String,

    /// Directorio de archivos del sistema (página 404, etc.)
    #[arg(long = "server-files", default_value = "./serverfiles", env = "SERVER_FILES")]
    pub files_dir: String,

    // === Workers ===

    /// Número de workers del pool (fijo durante toda la vida del proceso)
    #[arg(long = "workers", default_value = "4", env = "WORKERS")]
    pub workers: usize,

    /// Capacidad máxima de la cola de tareas
    #[arg(long = "queue-capacity", default_value = "64", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    // === Caché ===

    /// Capacidad del caché LRU (número máximo de entradas, no bytes)
    #[arg(long = "cache-capacity", default_value = "10", env = "CACHE_CAPACITY")]
    pub cache_capacity: usize,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    ///
    /// # Ejemplo
    /// ```rust
    /// use static_server::config::Config;
    ///
    /// let config = Config::new();
    /// println!("Server listening on {}", config.address());
    /// ```
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use static_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:3490");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos. Todos estos errores son
    /// fatales al arranque: ningún componente se construye a medias.
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }

        if self.queue_capacity == 0 {
            return Err("Queue capacity must be >= 1".to_string());
        }

        if self.cache_capacity == 0 {
            return Err("Cache capacity must be >= 1".to_string());
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════╗");
        println!("║        RedUnix Static HTTP/1.0 Server Configuration          ║");
        println!("╚══════════════════════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:      {}", self.address());
        println!("   Root dir:     {}", self.root_dir);
        println!("   Server files: {}", self.files_dir);
        println!();
        println!("👷 Worker Pool:");
        println!("   Workers:      {}", self.workers);
        println!("   Queue cap:    {} tasks", self.queue_capacity);
        println!();
        println!("📦 LRU Cache:");
        println!("   Capacity:     {} entries", self.cache_capacity);
        println!();
        println!("═══════════════════════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 3490,
            host: "127.0.0.1".to_string(),
            root_dir: "./serverroot".to_string(),
            files_dir: "./serverfiles".to_string(),
            workers: 4,
            queue_capacity: 64,
            cache_capacity: 10,
        }
    }
}
