//! # Pool de Workers
//! src/workers/pool.rs
//!
//! Pool de tamaño fijo: N threads persistentes creados en la construcción,
//! todos consumiendo la misma cola FIFO.
//!
//! ## Máquina de estados de un worker
//!
//! ```text
//!            cola no vacía
//! Waiting ──────────────────▶ Running ──(tarea termina)──▶ Waiting
//!    │
//!    │ shutdown && cola vacía
//!    ▼
//! Terminated
//! ```
//!
//! El pool no captura ni reintenta fallos internos de una tarea; una tarea
//! que nunca retorna ocupa su worker para siempre (no hay preemption ni
//! timeout — limitación documentada del diseño).

use std::thread;

use crate::workers::queue::{SubmitError, TaskQueue};

/// Errores de construcción del pool (fatales al arranque, nunca en runtime)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Se pidió un pool de 0 workers
    NoWorkers,

    /// Se pidió una cola de capacidad 0
    NoQueueCapacity,
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolError::NoWorkers => write!(f, "Worker count must be >= 1"),
            PoolError::NoQueueCapacity => write!(f, "Queue capacity must be >= 1"),
        }
    }
}

impl std::error::Error for PoolError {}

/// Pool fijo de workers sobre una cola FIFO compartida
pub struct WorkerPool {
    /// Cola compartida con todos los workers
    queue: TaskQueue,

    /// Handles de los threads, para join() en el shutdown
    handles: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    /// Crea el pool y lanza `worker_count` workers persistentes.
    ///
    /// Falla rápido (error de construcción, no fallo de runtime) si el
    /// número de workers o la capacidad de la cola es 0.
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::workers::WorkerPool;
    ///
    /// let pool = WorkerPool::new(4, 64).unwrap();
    /// pool.submit(|| println!("hola desde un worker")).unwrap();
    /// ```
    pub fn new(worker_count: usize, queue_capacity: usize) -> Result<Self, PoolError> {
        if worker_count == 0 {
            return Err(PoolError::NoWorkers);
        }
        if queue_capacity == 0 {
            return Err(PoolError::NoQueueCapacity);
        }

        let queue = TaskQueue::new(queue_capacity);
        let mut handles = Vec::with_capacity(worker_count);

        for id in 0..worker_count {
            let queue = queue.clone();
            handles.push(thread::spawn(move || Self::worker_loop(id, queue)));
        }

        Ok(Self { queue, handles })
    }

    /// Loop principal de un worker
    fn worker_loop(id: usize, queue: TaskQueue) {
        println!("🔧 Worker {} started", id);

        // Waiting → Running → Waiting, hasta shutdown con cola vacía
        while let Some(task) = queue.dequeue() {
            task();
        }

        println!("🔚 Worker {} terminated", id);
    }

    /// Envía una tarea al pool.
    ///
    /// La tarea entra al final de la cola y se despierta exactamente un
    /// worker. Retorna `Err(SubmitError::ShuttingDown)` si el pool ya está
    /// en shutdown, `Err(SubmitError::QueueFull)` si la cola está llena.
    pub fn submit<F>(&self, task: F) -> Result<(), SubmitError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.enqueue(Box::new(task))
    }

    /// Comienza el shutdown: no entran tareas nuevas y se despierta a todos
    /// los workers. Las tareas ya encoladas se drenan a completitud.
    pub fn shutdown(&self) {
        self.queue.shutdown();
    }

    /// Espera a que todos los workers lleguen a Terminated.
    ///
    /// Debe llamarse después de `shutdown()`; de lo contrario bloquea hasta
    /// que alguien lo pida.
    pub fn join(&mut self) {
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }

    /// Número de workers del pool
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Tareas actualmente encoladas (no incluye las que ya corren)
    pub fn queued_tasks(&self) -> usize {
        self.queue.len()
    }
}

impl Drop for WorkerPool {
    /// Shutdown ordenado: drena la cola y espera a los workers, para que el
    /// proceso nunca deje waiters bloqueados.
    fn drop(&mut self) {
        self.queue.shutdown();
        self.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_zero_workers_rejected() {
        let result = WorkerPool::new(0, 16);
        assert!(matches!(result, Err(PoolError::NoWorkers)));
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        let result = WorkerPool::new(4, 0);
        assert!(matches!(result, Err(PoolError::NoQueueCapacity)));
    }

    #[test]
    fn test_pool_executes_submitted_task() {
        let pool = WorkerPool::new(2, 16).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&counter);
        pool.submit(move || {
            c.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        // Drop hace shutdown + join: la tarea ya corrió al salir de scope
        drop(pool);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_single_worker_executes_in_submission_order() {
        // Con exactamente un worker, N tareas corren en orden FIFO estricto
        let pool = WorkerPool::new(1, 64).unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..20 {
            let order = Arc::clone(&order);
            pool.submit(move || order.lock().unwrap().push(i)).unwrap();
        }

        drop(pool);
        let order = order.lock().unwrap();
        assert_eq!(*order, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_shutdown_drains_queued_tasks() {
        // Tareas aceptadas antes del shutdown se ejecutan a completitud
        let pool = WorkerPool::new(1, 64).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        // La primera tarea retiene al único worker para que las demás
        // queden encoladas al momento del shutdown
        let gate = Arc::new(Mutex::new(()));
        let held = gate.lock().unwrap();
        {
            let gate = Arc::clone(&gate);
            pool.submit(move || {
                let _g = gate.lock().unwrap();
            })
            .unwrap();
        }

        for _ in 0..10 {
            let c = Arc::clone(&counter);
            pool.submit(move || {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        pool.shutdown();
        drop(held); // liberar al worker
        drop(pool); // join

        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_submit_after_shutdown_rejected() {
        let pool = WorkerPool::new(2, 16).unwrap();
        pool.shutdown();

        let result = pool.submit(|| {});
        assert_eq!(result.err(), Some(SubmitError::ShuttingDown));
    }

    #[test]
    fn test_queue_full_rejection() {
        // Un worker bloqueado + cola de 1: la segunda tarea encolada llena
        // la cola y la tercera se rechaza
        let pool = WorkerPool::new(1, 1).unwrap();
        let gate = Arc::new(Mutex::new(()));
        let held = gate.lock().unwrap();

        {
            let gate = Arc::clone(&gate);
            pool.submit(move || {
                let _g = gate.lock().unwrap();
            })
            .unwrap();
        }

        // Dar tiempo a que el worker desencole la primera y se bloquee
        thread::sleep(Duration::from_millis(50));

        assert!(pool.submit(|| {}).is_ok());
        assert_eq!(pool.submit(|| {}).err(), Some(SubmitError::QueueFull));

        drop(held);
    }

    #[test]
    fn test_all_workers_terminate_after_shutdown() {
        // join() retorna en tiempo acotado: ningún worker queda bloqueado
        let mut pool = WorkerPool::new(4, 16).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..8 {
            let c = Arc::clone(&counter);
            pool.submit(move || {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        pool.shutdown();
        pool.join();

        assert_eq!(pool.worker_count(), 0); // todos los handles consumidos
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_worker_count() {
        let pool = WorkerPool::new(3, 16).unwrap();
        assert_eq!(pool.worker_count(), 3);
    }

    #[test]
    fn test_tasks_run_concurrently_across_workers() {
        // Dos workers pueden tener dos tareas en vuelo a la vez
        let pool = WorkerPool::new(2, 16).unwrap();
        let barrier = Arc::new(std::sync::Barrier::new(2));

        for _ in 0..2 {
            let barrier = Arc::clone(&barrier);
            pool.submit(move || {
                // Si solo un worker ejecutara, este wait nunca se liberaría
                barrier.wait();
            })
            .unwrap();
        }

        drop(pool); // join: termina solo si ambas tareas corrieron en paralelo
    }
}
