//! Bounded worker pool for background refreshes.
//!
//! A fixed set of worker threads drains a bounded queue. Overflow is
//! reported to the caller instead of blocking; a dropped background refresh
//! is logged, and the next explicit refresh call is the retry mechanism.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

pub struct WorkerPool {
    tx: Option<mpsc::SyncSender<Job>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        let workers = workers.max(1);
        let (tx, rx) = mpsc::sync_channel::<Job>(workers * 2);
        let rx = Arc::new(Mutex::new(rx));
        let handles = (0..workers)
            .map(|_| {
                let rx = Arc::clone(&rx);
                std::thread::spawn(move || loop {
                    let job = match rx.lock() {
                        Ok(guard) => guard.recv(),
                        Err(_) => break,
                    };
                    match job {
                        Ok(job) => job(),
                        Err(_) => break,
                    }
                })
            })
            .collect();
        Self {
            tx: Some(tx),
            handles,
        }
    }

    /// Submits a job; returns false when the queue is full or the pool is
    /// shutting down.
    pub fn submit<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match &self.tx {
            Some(tx) => tx.try_send(Box::new(job)).is_ok(),
            None => false,
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the channel lets workers drain the queue and exit.
        self.tx.take();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[test]
    fn runs_submitted_jobs() {
        let pool = WorkerPool::new(2);
        let counter = Arc::new(AtomicU32::new(0));
        let mut accepted = 0;
        for _ in 0..8 {
            let counter = Arc::clone(&counter);
            if pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }) {
                accepted += 1;
            }
        }
        drop(pool); // joins workers, queue drained
        assert!(accepted > 0);
        assert_eq!(counter.load(Ordering::SeqCst), accepted);
    }

    #[test]
    fn overflow_reports_false() {
        let pool = WorkerPool::new(1);
        let block = Arc::new(AtomicU32::new(0));
        // One long job plus a full queue; further submits must not block.
        let b = Arc::clone(&block);
        pool.submit(move || {
            while b.load(Ordering::SeqCst) == 0 {
                std::thread::sleep(Duration::from_millis(5));
            }
        });
        let mut accepted = 0;
        for _ in 0..16 {
            if pool.submit(|| {}) {
                accepted += 1;
            }
        }
        assert!(accepted < 16);
        block.store(1, Ordering::SeqCst);
    }

    #[test]
    fn drop_joins_cleanly() {
        let pool = WorkerPool::new(3);
        pool.submit(|| {});
        drop(pool);
    }
}
