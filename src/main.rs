//! # Static Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor HTTP/1.0 de archivos estáticos.

use static_server::config::Config;
use static_server::server::Server;

fn main() {
    println!("=================================");
    println!("  RedUnix Static HTTP/1.0 Server");
    println!("  Principios de Sistemas Operativos");
    println!("=================================\n");

    // Crear configuración desde CLI args / variables de entorno
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    // Crear el servidor (falla rápido si el bind o el pool no se pueden crear)
    let mut server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("💥 Error al iniciar servidor: {}", e);
            std::process::exit(1);
        }
    };

    // Iniciar el servidor (esto bloqueará el thread)
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
