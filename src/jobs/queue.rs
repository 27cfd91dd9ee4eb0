//! # Cola FIFO Acotada para Jobs
//! src/jobs/queue.rs
//!
//! Cola thread-safe de capacidad fija que conecta el endpoint de encolado
//! con los workers. Encolar bloquea mientras la cola está llena
//! (backpressure) y desencolar bloquea mientras está vacía.

use crate::error::JobError;
use crate::jobs::types::Job;
use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Estado protegido por el mutex
struct QueueState {
    jobs: VecDeque<Job>,
    closed: bool,
}

struct Shared {
    state: Mutex<QueueState>,

    /// Notifica a los workers cuando hay nuevos jobs (o la cola se cierra)
    not_empty: Condvar,

    /// Notifica a los productores cuando se libera espacio
    not_full: Condvar,

    capacity: usize,
}

/// Cola FIFO acotada, multi-productor y multi-consumidor
///
/// Los clones comparten la misma cola.
#[derive(Clone)]
pub struct JobQueue {
    shared: Arc<Shared>,
}

impl JobQueue {
    /// Crea una nueva cola con capacidad máxima
    pub fn new(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(QueueState {
                    jobs: VecDeque::with_capacity(capacity),
                    closed: false,
                }),
                not_empty: Condvar::new(),
                not_full: Condvar::new(),
                capacity,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola un job, bloqueando mientras la cola esté llena
    ///
    /// Sólo falla si la cola fue cerrada.
    pub fn enqueue(&self, job: Job) -> Result<(), JobError> {
        let mut state = self.lock();

        while !state.closed && state.jobs.len() >= self.shared.capacity {
            state = self
                .shared
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        self.push_locked(state, job)
    }

    /// Encola un job esperando como máximo `timeout` a que haya espacio
    ///
    /// Retorna `JobError::QueueFull` si la cola sigue llena al vencer el plazo.
    pub fn enqueue_timeout(&self, job: Job, timeout: Duration) -> Result<(), JobError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();

        while !state.closed && state.jobs.len() >= self.shared.capacity {
            let now = Instant::now();
            if now >= deadline {
                return Err(JobError::QueueFull {
                    capacity: self.shared.capacity,
                });
            }

            let (guard, _) = self
                .shared
                .not_full
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }

        self.push_locked(state, job)
    }

    fn push_locked(&self, mut state: MutexGuard<'_, QueueState>, job: Job) -> Result<(), JobError> {
        if state.closed {
            return Err(JobError::Closed);
        }

        state.jobs.push_back(job);
        drop(state);

        // Despertar a un worker esperando
        self.shared.not_empty.notify_one();
        Ok(())
    }

    /// Desencola el job más antiguo
    ///
    /// Bloquea hasta que haya un job disponible. Retorna `None` sólo cuando
    /// la cola está cerrada y ya no quedan jobs pendientes.
    pub fn dequeue(&self) -> Option<Job> {
        let mut state = self.lock();

        loop {
            if let Some(job) = state.jobs.pop_front() {
                drop(state);
                self.shared.not_full.notify_one();
                return Some(job);
            }

            if state.closed {
                return None;
            }

            state = self
                .shared
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Intenta desencolar sin bloquear
    pub fn try_dequeue(&self) -> Option<Job> {
        let job = self.lock().jobs.pop_front();
        if job.is_some() {
            self.shared.not_full.notify_one();
        }
        job
    }

    /// Cierra la cola
    ///
    /// Los jobs pendientes se siguen entregando; después `dequeue` retorna
    /// `None` y cualquier intento de encolar falla con `JobError::Closed`.
    pub fn close(&self) {
        self.lock().closed = true;
        self.shared.not_empty.notify_all();
        self.shared.not_full.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.shared.capacity
    }

    /// Retorna la capacidad máxima
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn job(id: u64) -> Job {
        Job::new(id, format!("data-{}", id))
    }

    #[test]
    fn test_queue_fifo_order() {
        let queue = JobQueue::new(10);

        queue.enqueue(job(1)).unwrap();
        queue.enqueue(job(2)).unwrap();
        queue.enqueue(job(3)).unwrap();

        assert_eq!(queue.dequeue().unwrap().id, 1);
        assert_eq!(queue.dequeue().unwrap().id, 2);
        assert_eq!(queue.dequeue().unwrap().id, 3);
        assert!(queue.try_dequeue().is_none());
    }

    #[test]
    fn test_queue_capacity_with_timeout() {
        let queue = JobQueue::new(2);

        queue.enqueue(job(1)).unwrap();
        queue.enqueue(job(2)).unwrap();
        assert!(queue.is_full());

        let result = queue.enqueue_timeout(job(3), Duration::from_millis(50));
        assert!(matches!(result, Err(JobError::QueueFull { capacity: 2 })));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_enqueue_blocks_until_space() {
        let queue = JobQueue::new(1);
        queue.enqueue(job(1)).unwrap();

        let producer = {
            let queue = queue.clone();
            thread::spawn(move || queue.enqueue(job(2)))
        };

        // El productor sigue bloqueado mientras nadie consuma
        thread::sleep(Duration::from_millis(100));
        assert!(!producer.is_finished());

        assert_eq!(queue.dequeue().unwrap().id, 1);
        producer.join().unwrap().unwrap();
        assert_eq!(queue.dequeue().unwrap().id, 2);
    }

    #[test]
    fn test_enqueue_timeout_succeeds_when_drained() {
        let queue = JobQueue::new(1);
        queue.enqueue(job(1)).unwrap();

        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                queue.dequeue()
            })
        };

        assert!(queue.enqueue_timeout(job(2), Duration::from_secs(5)).is_ok());
        assert_eq!(consumer.join().unwrap().unwrap().id, 1);
    }

    #[test]
    fn test_dequeue_blocks_until_job() {
        let queue = JobQueue::new(4);

        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || queue.dequeue())
        };

        thread::sleep(Duration::from_millis(50));
        queue.enqueue(job(42)).unwrap();

        assert_eq!(consumer.join().unwrap().unwrap().id, 42);
    }

    #[test]
    fn test_each_job_delivered_once() {
        let queue = JobQueue::new(8);
        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let queue = queue.clone();
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    while let Some(job) = queue.dequeue() {
                        seen.push(job.id);
                    }
                    seen
                })
            })
            .collect();

        for id in 1..=200 {
            queue.enqueue(job(id)).unwrap();
        }
        queue.close();

        let mut all: Vec<u64> = consumers
            .into_iter()
            .flat_map(|c| c.join().unwrap())
            .collect();
        all.sort_unstable();

        assert_eq!(all, (1..=200).collect::<Vec<_>>());
    }

    #[test]
    fn test_close_drains_then_stops() {
        let queue = JobQueue::new(4);
        queue.enqueue(job(1)).unwrap();
        queue.close();

        assert!(queue.is_closed());
        assert!(matches!(queue.enqueue(job(2)), Err(JobError::Closed)));
        assert_eq!(queue.dequeue().unwrap().id, 1);
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_close_wakes_blocked_producer() {
        let queue = JobQueue::new(1);
        queue.enqueue(job(1)).unwrap();

        let producer = {
            let queue = queue.clone();
            thread::spawn(move || queue.enqueue(job(2)))
        };

        thread::sleep(Duration::from_millis(50));
        queue.close();

        assert!(matches!(producer.join().unwrap(), Err(JobError::Closed)));
    }
}
