use crate::error::HealpixResult;

/// Tuning for the array entry points in [`crate::bulk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BulkConfig {
    /// Worker threads; `0` picks `RAYON_NUM_THREADS` when set, otherwise the
    /// number of logical CPUs.
    pub num_threads: usize,
}

impl BulkConfig {
    pub fn with_threads(num_threads: usize) -> Self {
        Self { num_threads }
    }
}

pub fn resolve_threads(threads: usize) -> usize {
    if threads != 0 {
        return threads;
    }
    std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
}

/// Runs bulk work on a dedicated pool sized from a [`BulkConfig`].
///
/// Without the `parallel` feature the work runs on the calling thread.
pub struct Executor {
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl Executor {
    pub fn new(config: &BulkConfig) -> HealpixResult<Self> {
        #[cfg(feature = "parallel")]
        {
            let threads = resolve_threads(config.num_threads);
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| crate::error::HealpixError::thread_pool(e.to_string()))?;
            tracing::debug!(threads, "bulk thread pool ready");
            Ok(Self { pool })
        }
        #[cfg(not(feature = "parallel"))]
        {
            tracing::trace!(requested = config.num_threads, "running bulk work sequentially");
            Ok(Self {})
        }
    }

    pub fn install<R, F>(&self, op: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        #[cfg(feature = "parallel")]
        {
            self.pool.install(op)
        }
        #[cfg(not(feature = "parallel"))]
        {
            op()
        }
    }

    pub fn threads(&self) -> usize {
        #[cfg(feature = "parallel")]
        {
            self.pool.current_num_threads()
        }
        #[cfg(not(feature = "parallel"))]
        {
            1
        }
    }
}
