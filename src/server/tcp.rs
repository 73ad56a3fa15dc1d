//! # Servidor TCP con Pool de Workers
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP. El hilo principal solo acepta
//! conexiones: cada una se envuelve en una tarea y se envía al pool. Son
//! los workers quienes leen, despachan y responden.
//!
//! ```text
//! accept() ──▶ submit(task) ──▶ [cola FIFO] ──▶ worker: handle_connection
//! ```
//!
//! Si la cola está llena, la conexión se responde 503 desde el hilo de
//! accept (backpressure); si el pool está en shutdown, se descarta.

use crate::cache::{CacheError, CacheStore};
use crate::config::Config;
use crate::http::{Response, StatusCode};
use crate::metrics::MetricsCollector;
use crate::server::handler::{self, ServerContext};
use crate::workers::{PoolError, SubmitError, WorkerPool};
use std::io::{self, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;

/// Errores al construir el servidor (fatales al arranque)
#[derive(Debug)]
pub enum ServerError {
    /// Configuración inválida
    Config(String),

    /// No se pudo construir el caché
    Cache(CacheError),

    /// No se pudo construir el pool de workers
    Pool(PoolError),

    /// Error de I/O al hacer bind
    Io(io::Error),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            ServerError::Cache(e) => write!(f, "Cache error: {}", e),
            ServerError::Pool(e) => write!(f, "Worker pool error: {}", e),
            ServerError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

/// Servidor HTTP/1.0 de archivos estáticos con caché LRU y pool de workers
pub struct Server {
    config: Config,
    context: Arc<ServerContext>,
    pool: WorkerPool,
    listener: TcpListener,
}

impl Server {
    /// Construye el servidor completo: valida la configuración, crea el
    /// caché y el pool, y hace bind del listener.
    ///
    /// Cualquier fallo aquí es fatal y no deja componentes a medias.
    pub fn bind(config: Config) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::Config)?;

        let cache = CacheStore::new(config.cache_capacity).map_err(ServerError::Cache)?;
        let pool =
            WorkerPool::new(config.workers, config.queue_capacity).map_err(ServerError::Pool)?;

        println!("[*] Iniciando servidor en {}", config.address());
        let listener = TcpListener::bind(config.address()).map_err(ServerError::Io)?;
        println!("[+] Servidor escuchando en {}", config.address());

        let context = Arc::new(ServerContext {
            cache: Arc::new(cache),
            metrics: MetricsCollector::new(),
            root_dir: config.root_dir.clone(),
            files_dir: config.files_dir.clone(),
        });

        Ok(Self {
            config,
            context,
            pool,
            listener,
        })
    }

    /// Dirección real en la que quedó escuchando el listener
    ///
    /// Útil con puerto 0 (el sistema asigna uno efímero).
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop principal: acepta conexiones y las envía al pool.
    ///
    /// Este hilo nunca ejecuta una tarea; solo produce.
    pub fn run(&mut self) -> io::Result<()> {
        println!(
            "[*] Modo pool: {} workers, cola de {} tareas\n",
            self.pool.worker_count(),
            self.config.queue_capacity
        );

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => self.dispatch_connection(stream),
                Err(e) => {
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Envuelve una conexión en una tarea y la envía al pool
    fn dispatch_connection(&self, stream: TcpStream) {
        let peer_addr = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        println!("   ✅ Nueva conexión desde: {}", peer_addr);

        // Clon del socket para poder responder 503 si la cola rechaza
        let fallback = stream.try_clone();

        let ctx = Arc::clone(&self.context);
        let result = self.pool.submit(move || {
            let metrics = ctx.metrics.clone();
            metrics.increment_active_workers();

            if let Err(e) = handler::handle_connection(stream, ctx) {
                eprintln!("   ❌ Error atendiendo conexión: {}", e);
            }

            metrics.decrement_active_workers();
        });

        match result {
            Ok(()) => {}
            Err(SubmitError::QueueFull) => {
                eprintln!(
                    "   ⚠️  Cola llena ({} tareas en espera): respondiendo 503",
                    self.pool.queued_tasks()
                );
                if let Ok(mut stream) = fallback {
                    let response =
                        Response::error(StatusCode::ServiceUnavailable, "Server overloaded");
                    let _ = stream.write_all(&response.to_bytes());
                }
                self.context.metrics.record_request(StatusCode::ServiceUnavailable.as_u16());
            }
            Err(SubmitError::ShuttingDown) => {
                eprintln!("   ⚠️  Shutdown en progreso: conexión descartada");
            }
        }
    }
}
