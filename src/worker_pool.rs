use std::sync::{
    atomic::{AtomicUsize, Ordering},
    mpsc, Arc, Mutex,
};
use std::thread;
use tracing::{debug, warn};

use crate::errors::{PiError, PiResult};

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Job),
    Shutdown,
}

struct ThreadPoolInner {
    name: String,
    sender: mpsc::Sender<Message>,
    workers: Mutex<Vec<Option<thread::JoinHandle<()>>>>,
    size: usize,
    active_workers: Arc<AtomicUsize>,
}

/// Fixed-size pool of named worker threads fed from one shared channel.
#[derive(Clone)]
pub struct ThreadPool {
    inner: Arc<ThreadPoolInner>,
}

impl Drop for ThreadPoolInner {
    fn drop(&mut self) {
        for _ in 0..self.size {
            let _ = self.sender.send(Message::Shutdown);
        }

        let mut workers = match self.workers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for handle_opt in workers.iter_mut() {
            if let Some(handle) = handle_opt.take() {
                let _ = handle.join();
            }
        }
        debug!(pool = %self.name, "thread pool shut down");
    }
}

impl ThreadPool {
    pub fn new(name: &str, size: usize) -> PiResult<Self> {
        if size == 0 {
            return Err(PiError::InvalidArgument(format!(
                "thread pool '{}' must have at least one worker",
                name
            )));
        }

        let (tx, rx) = mpsc::channel::<Message>();
        let receiver = Arc::new(Mutex::new(rx));
        let active_workers = Arc::new(AtomicUsize::new(0));

        let mut workers = Vec::with_capacity(size);

        for idx in 0..size {
            let rx = Arc::clone(&receiver);
            let active = Arc::clone(&active_workers);
            let thread_name = format!("{}-worker-{}", name, idx);

            let spawned = thread::Builder::new()
                .name(thread_name.clone())
                .spawn(move || loop {
                    let message = match rx.lock() {
                        Ok(guard) => guard.recv(),
                        Err(_) => break,
                    };

                    match message {
                        Ok(Message::Run(job)) => {
                            active.fetch_add(1, Ordering::SeqCst);
                            job();
                            active.fetch_sub(1, Ordering::SeqCst);
                        }
                        Ok(Message::Shutdown) | Err(_) => break,
                    }
                });

            match spawned {
                Ok(handle) => workers.push(Some(handle)),
                Err(err) => {
                    // Already-spawned workers exit once the sender below is dropped.
                    return Err(PiError::ResourceExhausted(format!(
                        "could not spawn {}: {}",
                        thread_name, err
                    )));
                }
            }
        }

        debug!(pool = name, workers = size, "thread pool started");

        Ok(ThreadPool {
            inner: Arc::new(ThreadPoolInner {
                name: name.to_string(),
                sender: tx,
                workers: Mutex::new(workers),
                size,
                active_workers,
            }),
        })
    }

    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(err) = self.inner.sender.send(Message::Run(Box::new(job))) {
            warn!(pool = %self.inner.name, %err, "worker channel closed, job dropped");
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn total_workers(&self) -> usize {
        self.inner.size
    }

    /// Workers currently running a job.
    pub fn active_workers(&self) -> usize {
        self.inner.active_workers.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_runs_every_job() {
        let pool = ThreadPool::new("unit", 4).unwrap();
        let (tx, rx) = mpsc::channel();
        for i in 0..32u64 {
            let tx = tx.clone();
            pool.execute(move || {
                let _ = tx.send(i * i);
            });
        }
        drop(tx);
        let total: u64 = rx.iter().sum();
        assert_eq!(total, (0..32u64).map(|i| i * i).sum::<u64>());
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        let err = ThreadPool::new("empty", 0).err();
        assert!(matches!(err, Some(PiError::InvalidArgument(_))));
    }

    #[test]
    fn test_reports_active_workers() {
        let pool = ThreadPool::new("busy", 2).unwrap();
        assert_eq!(pool.active_workers(), 0);
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        pool.execute(move || {
            let _ = started_tx.send(());
            let _ = release_rx.recv();
        });
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(pool.active_workers(), 1);
        assert_eq!(pool.total_workers(), 2);
        release_tx.send(()).unwrap();
    }

    #[test]
    fn test_panicking_job_drops_its_sender() {
        let pool = ThreadPool::new("panicky", 1).unwrap();
        let (tx, rx) = mpsc::channel::<u8>();
        pool.execute(move || {
            let _tx = tx;
            panic!("boom");
        });
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_err());
    }
}
