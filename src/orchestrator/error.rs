// Thu Jan 16 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Scan thread panicked")]
    WorkerPanicked,
}
