//! # Handler de Conexiones
//! src/server/handler.rs
//!
//! El cuerpo de cada tarea del pool: lee el request del socket, lo parsea y
//! despacha. Todo path que no sea un endpoint especial se sirve como archivo
//! estático pasando por el caché LRU:
//!
//! ```text
//! path → cache.get → hit: servir desde memoria
//!                  → miss: leer de disco → resolver MIME → cache.put → servir
//! ```
//!
//! Un `put` fallido (sin memoria) degrada esa petición a servir sin caché;
//! nunca tumba el proceso.

use crate::cache::CacheStore;
use crate::content::{file, mime, FileError};
use crate::http::{Method, Request, Response, StatusCode};
use crate::metrics::MetricsCollector;
use rand::Rng;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Estado compartido que cada tarea captura junto a su conexión
pub struct ServerContext {
    /// Caché LRU compartido por todos los workers
    pub cache: Arc<CacheStore>,

    /// Métricas del servidor
    pub metrics: MetricsCollector,

    /// Directorio raíz de los archivos servidos
    pub root_dir: String,

    /// Directorio de archivos del sistema (página 404)
    pub files_dir: String,
}

/// Atiende una conexión completa: leer → parsear → despachar → responder.
///
/// Corre dentro de un worker del pool, de principio a fin, sin estado
/// parcial. Los errores de I/O del socket se propagan al worker, que solo
/// los registra: un cliente que cortó no afecta a nadie más.
pub fn handle_connection(mut stream: TcpStream, ctx: Arc<ServerContext>) -> std::io::Result<()> {
    let start = Instant::now();

    // Generar Request ID único
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    start.elapsed().as_nanos().hash(&mut hasher);
    thread::current().id().hash(&mut hasher);
    let request_id = format!("{:016x}", hasher.finish());
    let thread_id = format!("{:?}", thread::current().id());

    let mut buffer = [0u8; 8192];
    let bytes_read = stream.read(&mut buffer)?;

    if bytes_read == 0 {
        println!("   ✅ Conexión cerrada [req_id: {}]", &request_id[..8]);
        return Ok(());
    }

    let (mut response, is_head) = match Request::parse(&buffer[..bytes_read]) {
        Ok(request) => {
            println!("   ✅ {} {} [req_id: {}]", request.method().as_str(), request.path(), &request_id[..8]);
            let is_head = request.method() == Method::HEAD;
            (dispatch(&request, &ctx), is_head)
        }
        Err(e) => {
            println!("   ❌ Parse error: {}", e);
            (Response::error(StatusCode::BadRequest, &format!("Invalid: {}", e)), false)
        }
    };

    // Agregar headers de observabilidad y comunes
    response.add_header("Server", "RedUnix-Static/1.0");
    response.add_header("Connection", "close");
    response.add_header("X-Request-Id", &request_id);
    response.add_header("X-Worker-Thread", &thread_id);

    let response_bytes = if is_head {
        response.to_bytes_without_body()
    } else {
        response.to_bytes()
    };
    stream.write_all(&response_bytes)?;
    stream.flush()?;

    let latency = start.elapsed();
    ctx.metrics.record_request(response.status().as_u16());

    println!("   ✅ {} ({:.2}ms)\n", response.status(), latency.as_secs_f64() * 1000.0);

    Ok(())
}

/// Despacha el request al endpoint correspondiente
fn dispatch(request: &Request, ctx: &ServerContext) -> Response {
    match request.path() {
        "/d20" => d20_response(),
        "/cache" => cache_response(ctx),
        "/metrics" => metrics_response(ctx),
        path => serve_file(path, ctx),
    }
}

/// Endpoint /d20: un número aleatorio entre 1 y 20 inclusive
fn d20_response() -> Response {
    let roll = rand::thread_rng().gen_range(1..=20);
    Response::new(StatusCode::Ok)
        .with_header("Content-Type", "text/plain")
        .with_body(&roll.to_string())
}

/// Endpoint /cache: estadísticas y orden de recencia del caché
fn cache_response(ctx: &ServerContext) -> Response {
    let body = serde_json::json!({
        "cache": ctx.cache.stats(),
        "recency": ctx.cache.recency_keys(),
    });
    Response::json(&body.to_string())
}

/// Endpoint /metrics: métricas del servidor más estadísticas del caché
fn metrics_response(ctx: &ServerContext) -> Response {
    let snapshot = ctx.metrics.snapshot();
    let body = serde_json::json!({
        "server": {
            "uptime_seconds": snapshot.uptime_secs,
        },
        "requests": {
            "total": snapshot.total_requests,
            "active_workers": snapshot.active_workers,
            "status_codes": snapshot.status_codes,
        },
        "cache": ctx.cache.stats(),
    });
    Response::json(&body.to_string())
}

/// Sirve un archivo estático pasando por el caché
fn serve_file(path: &str, ctx: &ServerContext) -> Response {
    // "/" sirve el índice del sitio
    let resource = if path == "/" { "/index.html" } else { path };

    // 1. Buscar en el caché
    if let Some(hit) = ctx.cache.get(resource) {
        return Response::new(StatusCode::Ok)
            .with_header("Content-Type", &hit.content_type)
            .with_body_bytes(hit.content.to_vec());
    }

    // 2. Miss: leer de disco y poblar el caché
    match file::load(&ctx.root_dir, resource) {
        Ok(data) => {
            let content_type = mime::content_type_for(resource);

            // Un put fallido degrada a servir sin caché, nunca es fatal
            if let Err(e) = ctx.cache.put(resource, &content_type, &data.bytes) {
                eprintln!("   ⚠️  No se pudo cachear {}: {}", resource, e);
            }

            Response::new(StatusCode::Ok)
                .with_header("Content-Type", &content_type)
                .with_body_bytes(data.bytes)
        }
        Err(FileError::NotFound) => not_found_response(ctx),
        Err(FileError::InvalidPath) => {
            Response::error(StatusCode::BadRequest, "Invalid path")
        }
        Err(FileError::Io(e)) => {
            eprintln!("   ❌ Error de I/O leyendo {}: {}", resource, e);
            Response::error(StatusCode::InternalServerError, "I/O error")
        }
    }
}

/// Respuesta 404 con la página del directorio de archivos del sistema.
///
/// Si la página 404 tampoco existe se usa un cuerpo por defecto: perder ese
/// archivo no puede tumbar el servidor.
fn not_found_response(ctx: &ServerContext) -> Response {
    match file::load(&ctx.files_dir, "/404.html") {
        Ok(data) => Response::new(StatusCode::NotFound)
            .with_header("Content-Type", "text/html")
            .with_body_bytes(data.bytes),
        Err(_) => Response::new(StatusCode::NotFound)
            .with_header("Content-Type", "text/html")
            .with_body("<html><body><h1>404 Not Found</h1></body></html>"),
    }
}
