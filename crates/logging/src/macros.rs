//! # Logging Macros
//!
//! Convenience macros for structured logging.

/// Log with request ID and target.
///
/// # Example
///
/// ```rust
/// use logging::{info_with_request, RequestId};
///
/// let request_id = RequestId::new();
/// info_with_request!(target: "api", request_id, duration_ms = 42, "Request processed");
/// ```
#[macro_export]
macro_rules! info_with_request {
    (target: $target:expr, $request_id:expr, $($arg:tt)*) => {
        $crate::info!(target: $target, request_id = %$request_id, $($arg)*)
    };
}

/// Log a warning with request ID.
#[macro_export]
macro_rules! warn_with_request {
    (target: $target:expr, $request_id:expr, $($arg:tt)*) => {
        $crate::warn!(target: $target, request_id = %$request_id, $($arg)*)
    };
}

/// Log a remote procedure call against the database.
#[macro_export]
macro_rules! log_db_call {
    ($procedure:expr, $session:expr, $duration_ms:expr) => {
        $crate::debug!(
            target: "database",
            procedure = %$procedure,
            session_id = %$session,
            duration_ms = %$duration_ms,
            "Remote procedure call"
        )
    };
}

/// Measure and log the duration of a block of code.
///
/// # Example
///
/// ```rust
/// use logging::measure_duration;
///
/// let total = measure_duration!("aggregate", "session-1", {
///     (1 ..= 10).sum::<u32>()
/// });
/// assert_eq!(total, 55);
/// ```
#[macro_export]
macro_rules! measure_duration {
    ($target:expr, $context:expr, $block:block) => {{
        let start = std::time::Instant::now();
        let result = $block;
        let duration = start.elapsed();
        $crate::debug!(
            target: $target,
            context = %$context,
            duration_ms = duration.as_secs_f64() * 1000.0,
            "Operation completed"
        );
        result
    }};
}
