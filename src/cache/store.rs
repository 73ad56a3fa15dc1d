//! # Store LRU
//! src/cache/store.rs
//!
//! Implementa el caché LRU de capacidad fija sobre una arena de slots:
//!
//! ```text
//! index:  { "/index.html" → 2, "/logo.png" → 0, "/app.css" → 1 }
//!
//! arena:  [ slot 0 ] ← tail (menos reciente)
//!         [ slot 1 ]
//!         [ slot 2 ] ← head (más reciente)
//! ```
//!
//! Ambas estructuras refieren a las mismas entradas por handle entero; la
//! entrada vive una sola vez en la arena. `get` y `put` son O(1) promedio:
//! lookup por hash más relinking de la lista doblemente enlazada.
//!
//! ## Política de recencia
//!
//! - `get` de una clave presente la mueve al head (un hit también "toca")
//! - `put` de una clave presente refresca su contenido y la mueve al head
//! - `put` de una clave nueva con el store lleno expulsa exactamente la
//!   entrada del tail (la menos recientemente usada)
//!
//! ## Sincronización
//!
//! Todo el estado (índice + lista de recencia + contadores) vive bajo un
//! único `Mutex` interno. Un lock de grano grueso alcanza: la latencia de
//! una petición la domina el I/O de disco y de red, no la contabilidad del
//! caché.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::entry::CacheEntry;

/// Errores del caché
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacidad 0 al construir el store (error de configuración)
    ZeroCapacity,

    /// No hay memoria para copiar el contenido de la entrada
    Alloc,
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::ZeroCapacity => write!(f, "Cache capacity must be >= 1"),
            CacheError::Alloc => write!(f, "Cache entry allocation failed"),
        }
    }
}

impl std::error::Error for CacheError {}

/// Vista de solo lectura de una entrada, devuelta en cada hit.
///
/// Los bytes se comparten por `Arc`: no se copian dentro de la sección
/// crítica y siguen siendo válidos aunque la entrada sea expulsada después.
#[derive(Debug, Clone)]
pub struct CacheHit {
    /// Content-Type con el que se cargó el recurso
    pub content_type: String,

    /// Contenido del recurso
    pub content: Arc<Vec<u8>>,
}

impl CacheHit {
    /// Longitud del contenido en bytes
    pub fn content_length(&self) -> usize {
        self.content.len()
    }
}

/// Snapshot de estadísticas del caché (para el endpoint /cache)
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Estado interno: arena de slots + índice + extremos de la lista de recencia
struct StoreInner {
    /// Arena de entradas; un slot `None` está libre
    slots: Vec<Option<CacheEntry>>,

    /// Handles de slots libres, listos para reutilizar
    free: Vec<usize>,

    /// Índice path → handle
    index: HashMap<String, usize>,

    /// Handle de la entrada más recientemente usada
    head: Option<usize>,

    /// Handle de la entrada menos recientemente usada
    tail: Option<usize>,

    /// Contadores de hits y misses
    hits: u64,
    misses: u64,
}

impl StoreInner {
    /// Desengancha una entrada de la lista de recencia, ajustando head/tail
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(entry) = self.slots[p].as_mut() {
                    entry.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(n) => {
                if let Some(entry) = self.slots[n].as_mut() {
                    entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(entry) = self.slots[idx].as_mut() {
            entry.prev = None;
            entry.next = None;
        }
    }

    /// Engancha una entrada (ya desenganchada) como head de la lista
    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;

        if let Some(entry) = self.slots[idx].as_mut() {
            entry.prev = None;
            entry.next = old_head;
        }

        if let Some(h) = old_head {
            if let Some(entry) = self.slots[h].as_mut() {
                entry.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    /// Desengancha y retorna el handle del tail (la entrada LRU)
    fn remove_tail(&mut self) -> Option<usize> {
        let idx = self.tail?;
        self.unlink(idx);
        Some(idx)
    }
}

/// Caché LRU de capacidad fija, thread-safe.
///
/// Se crea una vez al arranque del proceso y lo comparten todos los workers
/// vía `Arc`. Cada operación pública toma la sección crítica completa sobre
/// el par índice + lista de recencia.
///
/// # Ejemplo
/// ```
/// use static_server::cache::CacheStore;
///
/// let cache = CacheStore::new(2).unwrap();
/// cache.put("/index.html", "text/html", b"<h1>hola</h1>").unwrap();
///
/// let hit = cache.get("/index.html").unwrap();
/// assert_eq!(hit.content_type, "text/html");
/// assert_eq!(hit.content_length(), 13);
/// ```
pub struct CacheStore {
    /// Número máximo de entradas (fijo desde la creación)
    capacity: usize,

    inner: Mutex<StoreInner>,
}

impl CacheStore {
    /// Crea un caché con la capacidad dada (en número de entradas).
    ///
    /// Capacidad 0 se rechaza en la construcción: es un error de
    /// configuración, no un modo degenerado en runtime.
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }

        Ok(Self {
            capacity,
            inner: Mutex::new(StoreInner {
                slots: Vec::with_capacity(capacity),
                free: Vec::new(),
                index: HashMap::with_capacity(capacity),
                head: None,
                tail: None,
                hits: 0,
                misses: 0,
            }),
        })
    }

    /// Inserta o refresca una entrada.
    ///
    /// - Clave nueva con el store lleno: expulsa primero la entrada del tail
    ///   (removida del índice y de la lista, su contenido liberado) y después
    ///   inserta la nueva en el head.
    /// - Clave ya presente: reemplaza content-type y contenido, y mueve la
    ///   entrada al head.
    ///
    /// Si falla la reserva de memoria para el contenido, el store queda
    /// exactamente como estaba (invariantes intactos) y se retorna
    /// `CacheError::Alloc`; la petición se sirve sin cachear.
    pub fn put(&self, path: &str, content_type: &str, content: &[u8]) -> Result<(), CacheError> {
        let mut inner = self.inner.lock().unwrap();

        // Clave ya presente: refrescar contenido y recencia
        if let Some(&idx) = inner.index.get(path) {
            let mut buffer = Vec::new();
            buffer
                .try_reserve_exact(content.len())
                .map_err(|_| CacheError::Alloc)?;
            buffer.extend_from_slice(content);

            if let Some(entry) = inner.slots[idx].as_mut() {
                entry.content_type = content_type.to_string();
                entry.content = Arc::new(buffer);
            }
            inner.unlink(idx);
            inner.push_front(idx);
            return Ok(());
        }

        // Construir la entrada ANTES de tocar el estado compartido: si la
        // reserva falla, no se expulsó nada y los invariantes siguen intactos
        let entry = CacheEntry::new(path, content_type, content)?;

        // Al tope de capacidad: expulsar exactamente una entrada, el tail
        if inner.index.len() == self.capacity {
            if let Some(tail_idx) = inner.remove_tail() {
                if let Some(old) = inner.slots[tail_idx].take() {
                    inner.index.remove(&old.path);
                }
                inner.free.push(tail_idx);
            }
        }

        // Ocupar un slot libre o crecer la arena
        let idx = match inner.free.pop() {
            Some(i) => {
                inner.slots[i] = Some(entry);
                i
            }
            None => {
                inner.slots.push(Some(entry));
                inner.slots.len() - 1
            }
        };

        inner.index.insert(path.to_string(), idx);
        inner.push_front(idx);

        Ok(())
    }

    /// Busca una entrada por clave exacta.
    ///
    /// Un hit mueve la entrada al head de la lista de recencia (un acceso
    /// de lectura también cuenta como uso) y devuelve una vista de solo
    /// lectura del contenido. Un miss devuelve `None`.
    pub fn get(&self, path: &str) -> Option<CacheHit> {
        let mut inner = self.inner.lock().unwrap();

        let idx = match inner.index.get(path) {
            Some(&i) => i,
            None => {
                inner.misses += 1;
                return None;
            }
        };

        inner.unlink(idx);
        inner.push_front(idx);
        inner.hits += 1;

        let entry = inner.slots[idx].as_ref()?;
        Some(CacheHit {
            content_type: entry.content_type.clone(),
            content: Arc::clone(&entry.content),
        })
    }

    /// Número actual de entradas
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().index.len()
    }

    /// Verifica si el caché está vacío
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacidad máxima configurada
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Claves en orden de recencia, del head (más reciente) al tail.
    ///
    /// Recorre la lista una sola vez; se usa en el endpoint /cache y en los
    /// tests de consistencia índice ↔ lista.
    pub fn recency_keys(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        let mut keys = Vec::with_capacity(inner.index.len());

        let mut cursor = inner.head;
        while let Some(idx) = cursor {
            match inner.slots[idx].as_ref() {
                Some(entry) => {
                    keys.push(entry.path.clone());
                    cursor = entry.next;
                }
                None => break,
            }
        }

        keys
    }

    /// Snapshot de estadísticas
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().unwrap();
        CacheStats {
            entries: inner.index.len(),
            capacity: self.capacity,
            hits: inner.hits,
            misses: inner.misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    /// Helper: verifica que índice y lista de recencia refieren exactamente
    /// al mismo conjunto de entradas, sin duplicados
    fn assert_consistent(cache: &CacheStore) {
        let keys = cache.recency_keys();
        assert_eq!(keys.len(), cache.len(), "recency walk vs index size");

        let unique: HashSet<&String> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len(), "duplicate entries in recency list");

        for key in &keys {
            assert!(cache.get(key).is_some(), "key {} in list but not in index", key);
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = CacheStore::new(0);
        assert_eq!(result.err(), Some(CacheError::ZeroCapacity));
    }

    #[test]
    fn test_put_and_get() {
        let cache = CacheStore::new(4).unwrap();
        cache.put("/a.html", "text/html", b"<p>a</p>").unwrap();

        let hit = cache.get("/a.html").unwrap();
        assert_eq!(hit.content_type, "text/html");
        assert_eq!(&*hit.content, b"<p>a</p>");
        assert_eq!(hit.content_length(), 8);
    }

    #[test]
    fn test_get_miss() {
        let cache = CacheStore::new(4).unwrap();
        assert!(cache.get("/nope").is_none());
    }

    #[test]
    fn test_len_and_capacity() {
        let cache = CacheStore::new(4).unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 4);

        cache.put("/a", "text/plain", b"a").unwrap();
        cache.put("/b", "text/plain", b"b").unwrap();
        assert_eq!(cache.len(), 2);
    }

    // ==================== Expulsión LRU ====================

    #[test]
    fn test_eviction_at_capacity() {
        // capacity + 1 claves distintas sin toques intermedios:
        // se expulsa exactamente la primera insertada
        let cache = CacheStore::new(3).unwrap();
        cache.put("/1", "text/plain", b"1").unwrap();
        cache.put("/2", "text/plain", b"2").unwrap();
        cache.put("/3", "text/plain", b"3").unwrap();
        cache.put("/4", "text/plain", b"4").unwrap();

        assert_eq!(cache.len(), 3);
        assert!(cache.get("/1").is_none());
        assert!(cache.get("/2").is_some());
        assert!(cache.get("/3").is_some());
        assert!(cache.get("/4").is_some());
    }

    #[test]
    fn test_scenario_three_puts_capacity_two() {
        // capacity = 2; put(a), put(b), put(c) → a miss; b y c hits
        let cache = CacheStore::new(2).unwrap();
        cache.put("/a", "text/plain", b"a").unwrap();
        cache.put("/b", "text/plain", b"b").unwrap();
        cache.put("/c", "text/plain", b"c").unwrap();

        assert!(cache.get("/a").is_none());
        assert!(cache.get("/b").is_some());
        assert!(cache.get("/c").is_some());
    }

    #[test]
    fn test_get_touches_recency() {
        // capacity = 2; put(a), put(b), get(a), put(c) → b miss; a y c hits
        let cache = CacheStore::new(2).unwrap();
        cache.put("/a", "text/plain", b"a").unwrap();
        cache.put("/b", "text/plain", b"b").unwrap();

        assert!(cache.get("/a").is_some()); // toque: a pasa al head

        cache.put("/c", "text/plain", b"c").unwrap(); // expulsa b, no a

        assert!(cache.get("/b").is_none());
        assert!(cache.get("/a").is_some());
        assert!(cache.get("/c").is_some());
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let cache = CacheStore::new(5).unwrap();
        for i in 0..100 {
            let path = format!("/file{}", i);
            cache.put(&path, "text/plain", b"x").unwrap();
            assert!(cache.len() <= 5);
        }
        assert_eq!(cache.len(), 5);
    }

    // ==================== Re-put de clave presente ====================

    #[test]
    fn test_put_existing_refreshes_content() {
        let cache = CacheStore::new(2).unwrap();
        cache.put("/a", "text/plain", b"version 1").unwrap();
        cache.put("/a", "text/html", b"version 2").unwrap();

        // Sigue habiendo una sola entrada, con el contenido nuevo
        assert_eq!(cache.len(), 1);
        let hit = cache.get("/a").unwrap();
        assert_eq!(hit.content_type, "text/html");
        assert_eq!(&*hit.content, b"version 2");
    }

    #[test]
    fn test_put_existing_touches_recency() {
        // capacity = 2; put(a), put(b), put(a de nuevo), put(c) → expulsa b
        let cache = CacheStore::new(2).unwrap();
        cache.put("/a", "text/plain", b"a").unwrap();
        cache.put("/b", "text/plain", b"b").unwrap();
        cache.put("/a", "text/plain", b"a2").unwrap();
        cache.put("/c", "text/plain", b"c").unwrap();

        assert!(cache.get("/b").is_none());
        assert!(cache.get("/a").is_some());
        assert!(cache.get("/c").is_some());
    }

    #[test]
    fn test_get_returns_most_recent_content() {
        // get(k) después de put(k, v) retorna el último v asociado a k
        let cache = CacheStore::new(4).unwrap();
        for version in 0..5 {
            let body = format!("version {}", version);
            cache.put("/k", "text/plain", body.as_bytes()).unwrap();
            let hit = cache.get("/k").unwrap();
            assert_eq!(&*hit.content, body.as_bytes());
        }
    }

    // ==================== Orden de recencia ====================

    #[test]
    fn test_recency_keys_order() {
        let cache = CacheStore::new(4).unwrap();
        cache.put("/a", "text/plain", b"a").unwrap();
        cache.put("/b", "text/plain", b"b").unwrap();
        cache.put("/c", "text/plain", b"c").unwrap();

        // head = más reciente
        assert_eq!(cache.recency_keys(), vec!["/c", "/b", "/a"]);

        cache.get("/a");
        assert_eq!(cache.recency_keys(), vec!["/a", "/c", "/b"]);
    }

    #[test]
    fn test_consistency_after_mixed_operations() {
        let cache = CacheStore::new(3).unwrap();
        cache.put("/a", "text/plain", b"a").unwrap();
        cache.put("/b", "text/plain", b"b").unwrap();
        cache.get("/a");
        cache.put("/c", "text/plain", b"c").unwrap();
        cache.put("/d", "text/plain", b"d").unwrap(); // expulsa /b
        cache.put("/a", "text/plain", b"a2").unwrap(); // refresca /a
        cache.get("/zzz"); // miss

        assert_consistent(&cache);
    }

    #[test]
    fn test_slot_reuse_after_eviction() {
        // La arena no crece más allá de la capacidad: los slots expulsados
        // se reutilizan
        let cache = CacheStore::new(2).unwrap();
        for i in 0..50 {
            cache.put(&format!("/f{}", i), "text/plain", b"x").unwrap();
        }
        assert_eq!(cache.len(), 2);
        assert_consistent(&cache);
    }

    // ==================== Vista de solo lectura ====================

    #[test]
    fn test_hit_survives_eviction() {
        // La vista devuelta por get sigue siendo válida aunque la entrada
        // sea expulsada después (los bytes se comparten por Arc)
        let cache = CacheStore::new(1).unwrap();
        cache.put("/a", "text/plain", b"contenido de a").unwrap();
        let hit = cache.get("/a").unwrap();

        cache.put("/b", "text/plain", b"b").unwrap(); // expulsa /a

        assert!(cache.get("/a").is_none());
        assert_eq!(&*hit.content, b"contenido de a");
    }

    // ==================== Estadísticas ====================

    #[test]
    fn test_stats_counts_hits_and_misses() {
        let cache = CacheStore::new(2).unwrap();
        cache.put("/a", "text/plain", b"a").unwrap();

        cache.get("/a"); // hit
        cache.get("/a"); // hit
        cache.get("/x"); // miss

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.capacity, 2);
    }

    // ==================== Concurrencia ====================

    #[test]
    fn test_concurrent_access_preserves_invariants() {
        let cache = Arc::new(CacheStore::new(8).unwrap());
        let mut handles = Vec::new();

        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..200 {
                    let path = format!("/t{}/f{}", t, i % 12);
                    if i % 3 == 0 {
                        cache.get(&path);
                    } else {
                        cache.put(&path, "text/plain", path.as_bytes()).unwrap();
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // Ningún crash y los invariantes siguen en pie
        assert!(cache.len() <= cache.capacity());
        assert_consistent(&cache);
    }
}
