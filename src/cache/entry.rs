//! # Entrada del Caché
//! src/cache/entry.rs
//!
//! Una entrada del caché LRU: el path del recurso, su Content-Type y el
//! contenido en bytes, más los enlaces (handles enteros de la arena) que la
//! colocan en la lista de recencia.

use std::sync::Arc;

use super::store::CacheError;

/// Una entrada del caché, dueña exclusiva de su contenido desde la inserción
/// hasta la expulsión o el teardown del store.
///
/// El contenido va detrás de un `Arc` para que un hit pueda devolver una
/// vista de solo lectura sin copiar los bytes dentro de la sección crítica.
#[derive(Debug)]
pub struct CacheEntry {
    /// Path del recurso (clave del caché)
    pub(crate) path: String,

    /// Content-Type resuelto al cargar el archivo
    pub(crate) content_type: String,

    /// Contenido del archivo
    pub(crate) content: Arc<Vec<u8>>,

    /// Handle de la entrada anterior en la lista de recencia (hacia el head)
    pub(crate) prev: Option<usize>,

    /// Handle de la entrada siguiente en la lista de recencia (hacia el tail)
    pub(crate) next: Option<usize>,
}

impl CacheEntry {
    /// Construye una entrada copiando el contenido a un buffer propio.
    ///
    /// La reserva usa `try_reserve_exact`: si no hay memoria disponible la
    /// construcción falla con `CacheError::Alloc` en vez de abortar el
    /// proceso, y el caller degrada la petición a servir sin caché.
    pub(crate) fn new(path: &str, content_type: &str, content: &[u8]) -> Result<Self, CacheError> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(content.len())
            .map_err(|_| CacheError::Alloc)?;
        buffer.extend_from_slice(content);

        Ok(Self {
            path: path.to_string(),
            content_type: content_type.to_string(),
            content: Arc::new(buffer),
            prev: None,
            next: None,
        })
    }

    /// Longitud del contenido en bytes
    pub fn content_length(&self) -> usize {
        self.content.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_owns_a_copy() {
        let original = vec![1u8, 2, 3];
        let entry = CacheEntry::new("/a.bin", "application/octet-stream", &original).unwrap();

        assert_eq!(entry.content_length(), 3);
        assert_eq!(*entry.content, original);
        // La entrada es dueña de su propio buffer, no del slice original
        assert_eq!(Arc::strong_count(&entry.content), 1);
    }

    #[test]
    fn test_entry_starts_unlinked() {
        let entry = CacheEntry::new("/x", "text/plain", b"x").unwrap();
        assert!(entry.prev.is_none());
        assert!(entry.next.is_none());
    }
}
