//! Error types for the work pool

/// Result type for work pool operations
pub type Result<T> = std::result::Result<T, ThreadError>;

/// Errors that can occur in the work pool
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ThreadError {
    /// Failed to spawn a worker thread with details
    #[error("Failed to spawn worker thread #{worker_id}: {message}")]
    SpawnError {
        /// ID of the worker that failed to spawn
        worker_id: usize,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: Option<std::io::Error>,
    },

    /// Failed to join a worker thread
    #[error("Failed to join worker thread #{worker_id}: {message}")]
    JoinError {
        /// ID of the worker that failed to join
        worker_id: usize,
        /// Error message
        message: String,
    },

    /// A result-bearing task panicked; surfaced from its handle
    #[error("Task panicked (task_id: {task_id}): {message}")]
    TaskPanicked {
        /// ID of the task
        task_id: u64,
        /// Panic message
        message: String,
    },

    /// A task without a result channel panicked on a worker
    #[error("Task panicked on worker thread #{worker_id}: {message}")]
    WorkerPanic {
        /// ID of the worker that ran the task
        worker_id: usize,
        /// Panic message
        message: String,
    },

    /// The task was discarded unrun because the pool was dropped
    #[error("Task abandoned before execution (task_id: {task_id})")]
    Abandoned {
        /// ID of the abandoned task
        task_id: u64,
    },

    /// The handle already returned this task's outcome
    #[error("Result already taken from handle (task_id: {task_id})")]
    ResultTaken {
        /// ID of the task
        task_id: u64,
    },

    /// Waiting for a task result timed out
    #[error("Timed out after {timeout_ms}ms waiting for task result")]
    WaitTimeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Invalid configuration with parameter
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },
}

impl ThreadError {
    /// Create a spawn error with source
    pub fn spawn_with_source(worker_id: usize, source: std::io::Error) -> Self {
        ThreadError::SpawnError {
            worker_id,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a join error
    pub fn join(worker_id: usize, message: impl Into<String>) -> Self {
        ThreadError::JoinError {
            worker_id,
            message: message.into(),
        }
    }

    /// Create a task panicked error
    pub fn task_panicked(task_id: u64, message: impl Into<String>) -> Self {
        ThreadError::TaskPanicked {
            task_id,
            message: message.into(),
        }
    }

    /// Create a worker panic error
    pub fn worker_panic(worker_id: usize, message: impl Into<String>) -> Self {
        ThreadError::WorkerPanic {
            worker_id,
            message: message.into(),
        }
    }

    /// Create an abandoned error
    pub fn abandoned(task_id: u64) -> Self {
        ThreadError::Abandoned { task_id }
    }

    /// Create a result taken error
    pub fn result_taken(task_id: u64) -> Self {
        ThreadError::ResultTaken { task_id }
    }

    /// Create a wait timeout error
    pub fn wait_timeout(timeout_ms: u64) -> Self {
        ThreadError::WaitTimeout { timeout_ms }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        ThreadError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Whether this error means the task never ran
    pub fn is_abandoned(&self) -> bool {
        matches!(self, ThreadError::Abandoned { .. })
    }
}

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ThreadError::task_panicked(7, "boom");
        assert!(matches!(err, ThreadError::TaskPanicked { task_id: 7, .. }));

        let err = ThreadError::abandoned(3);
        assert!(err.is_abandoned());

        let err = ThreadError::invalid_config("thread_name_prefix", "must not be empty");
        assert!(matches!(err, ThreadError::InvalidConfig { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = ThreadError::worker_panic(2, "index out of bounds");
        assert_eq!(
            err.to_string(),
            "Task panicked on worker thread #2: index out of bounds"
        );

        let err = ThreadError::wait_timeout(250);
        assert_eq!(
            err.to_string(),
            "Timed out after 250ms waiting for task result"
        );

        let err = ThreadError::abandoned(11);
        assert_eq!(
            err.to_string(),
            "Task abandoned before execution (task_id: 11)"
        );

        let err = ThreadError::result_taken(4);
        assert!(!err.is_abandoned());
        assert_eq!(
            err.to_string(),
            "Result already taken from handle (task_id: 4)"
        );
    }

    #[test]
    fn test_spawn_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::WouldBlock, "resource limit");
        let err = ThreadError::spawn_with_source(5, io_err);

        assert!(matches!(err, ThreadError::SpawnError { source: Some(_), .. }));
        assert!(err.to_string().contains("worker thread #5"));
    }

    #[test]
    fn test_panic_message_payloads() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static str");
        assert_eq!(panic_message(&*payload), "static str");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*payload), "owned");

        let payload: Box<dyn std::any::Any + Send> = Box::new(42u32);
        assert_eq!(panic_message(&*payload), "Unknown panic");
    }
}
