//! # Sistema de Workers
//! src/workers/mod.rs
//!
//! Pool fijo de workers consumiendo una cola FIFO de tareas, al estilo
//! productor/consumidor:
//!
//! ```text
//! accept loop ──submit──▶ [ TaskQueue (FIFO) ] ──dequeue──▶ worker 0..N
//! ```
//!
//! - El hilo que acepta conexiones solo produce tareas, nunca las ejecuta.
//! - Cada `submit` despierta exactamente un worker (signal, no broadcast).
//! - Un worker bloqueado en la cola está descheduled, no haciendo spin.
//! - `shutdown` despierta a todos: los workers drenan la cola y terminan.

pub mod task;
pub mod queue;
pub mod pool;

// Re-exportamos los tipos principales para facilitar su uso
pub use pool::{PoolError, WorkerPool};
pub use queue::{SubmitError, TaskQueue};
pub use task::Task;
