//! # Resolución de Tipos MIME
//! src/content/mime.rs
//!
//! Mapea la extensión del archivo a su Content-Type usando `mime_guess`.
//! Extensiones desconocidas (o ausentes) caen a `application/octet-stream`.

/// Retorna el Content-Type para un path de recurso.
///
/// # Ejemplo
/// ```
/// use static_server::content::mime;
///
/// assert_eq!(mime::content_type_for("/index.html"), "text/html");
/// assert_eq!(mime::content_type_for("/data.bin"), "application/octet-stream");
/// ```
pub fn content_type_for(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
