pub mod pool;
pub mod scanner;

pub use pool::{extract_batch, BatchConfig, BatchExtractor, MAX_WORKERS};
pub use scanner::collect_images;
