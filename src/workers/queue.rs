//! # Cola FIFO de Tareas
//! src/workers/queue.rs
//!
//! Implementa la cola thread-safe que comparten el hilo de accept y los
//! workers. El orden de envío se preserva exactamente en el orden de
//! desencolado (FIFO estricto, sin prioridades).
//!
//! La cola es un monitor clásico: un `Mutex` protege el estado y un
//! `Condvar` coordina la espera. `enqueue` señala a exactamente un worker
//! (`notify_one`); `shutdown` los despierta a todos (`notify_all`).

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

use crate::workers::task::Task;

/// Errores al enviar una tarea
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// La cola está a su capacidad máxima
    QueueFull,

    /// El pool ya comenzó el shutdown y no acepta tareas nuevas
    ShuttingDown,
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::QueueFull => write!(f, "Task queue is full"),
            SubmitError::ShuttingDown => write!(f, "Worker pool is shutting down"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Estado interno de la cola, protegido por el mutex del monitor
struct QueueState {
    /// Tareas pendientes en orden de llegada
    tasks: VecDeque<Task>,

    /// Flag de shutdown: una vez en true, no entran tareas nuevas
    shutdown: bool,
}

/// Cola FIFO thread-safe con espera bloqueante
pub struct TaskQueue {
    /// Estado del monitor
    state: Arc<Mutex<QueueState>>,

    /// Condvar para notificar cuando hay tareas (o shutdown)
    ready: Arc<Condvar>,

    /// Capacidad máxima de la cola
    max_capacity: usize,
}

impl TaskQueue {
    /// Crea una nueva cola vacía con capacidad máxima
    pub fn new(max_capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(QueueState {
                tasks: VecDeque::new(),
                shutdown: false,
            })),
            ready: Arc::new(Condvar::new()),
            max_capacity,
        }
    }

    /// Encola una tarea al final y despierta exactamente un worker.
    ///
    /// Retorna `Err(SubmitError::ShuttingDown)` si el shutdown ya comenzó y
    /// `Err(SubmitError::QueueFull)` si la cola está a capacidad.
    pub fn enqueue(&self, task: Task) -> Result<(), SubmitError> {
        let mut state = self.state.lock().unwrap();

        if state.shutdown {
            return Err(SubmitError::ShuttingDown);
        }

        if state.tasks.len() >= self.max_capacity {
            return Err(SubmitError::QueueFull);
        }

        state.tasks.push_back(task);
        drop(state);

        // Señal, no broadcast: una tarea nueva despierta un solo worker
        self.ready.notify_one();

        Ok(())
    }

    /// Desencola la tarea al frente, bloqueando mientras la cola esté vacía
    /// y no haya shutdown.
    ///
    /// Retorna `None` solo cuando el shutdown fue solicitado Y la cola quedó
    /// vacía: las tareas ya aceptadas se drenan antes de que los workers
    /// terminen.
    pub fn dequeue(&self) -> Option<Task> {
        let mut state = self.state.lock().unwrap();

        loop {
            if let Some(task) = state.tasks.pop_front() {
                return Some(task);
            }

            if state.shutdown {
                return None;
            }

            // Esperar (descheduled, sin spin) a que haya tareas o shutdown
            state = self.ready.wait(state).unwrap();
        }
    }

    /// Activa el flag de shutdown y despierta a todos los workers
    pub fn shutdown(&self) {
        let mut state = self.state.lock().unwrap();
        state.shutdown = true;
        drop(state);

        self.ready.notify_all();
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.tasks.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retorna la capacidad máxima
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }
}

impl Clone for TaskQueue {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            ready: Arc::clone(&self.ready),
            max_capacity: self.max_capacity,
        }
    }
}
