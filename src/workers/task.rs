//! # Tarea
//! src/workers/task.rs
//!
//! Una tarea es una unidad de trabajo de un solo uso: un closure boxeado que
//! captura todo lo que necesita (el socket de la conexión, los handles
//! compartidos al caché y a las métricas). Se ejecuta exactamente una vez,
//! hasta completarse, sin estado parcial ni reanudación.

/// Tipo de una tarea del pool
///
/// Inmutable una vez enviada: el pool no reintenta ni captura fallos
/// internos de la tarea; cada tarea es responsable de sus propios errores.
pub type Task = Box<dyn FnOnce() + Send + 'static>;
