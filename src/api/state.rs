use crate::core::HistoryProvider;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Source dataset, re-read on every request
    pub data_path: Arc<PathBuf>,

    /// Market data lookups for fund history
    pub history: Arc<dyn HistoryProvider + Send + Sync>,
}

impl AppState {
    pub fn new<P: AsRef<Path>>(
        data_path: P,
        history: Arc<dyn HistoryProvider + Send + Sync>,
    ) -> Self {
        Self {
            data_path: Arc::new(data_path.as_ref().to_path_buf()),
            history,
        }
    }
}
