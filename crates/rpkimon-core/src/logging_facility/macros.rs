//! Boundary events for analysis operations.
//!
//! Every operation logs one start event and exactly one of end or
//! end_error. Extra `key = value` fields go after the required ones.

/// Start of an operation
///
/// ```
/// # use rpkimon_core::log_op_start;
/// log_op_start!("certificate_analysis");
/// log_op_start!("certificate_analysis", trust_anchor = "rsync://example.net/ta.cer");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        $crate::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::rpkimon_core_types::schema::EVENT_START,
            $($($field)+)?
        )
    };
}

/// Successful end of an operation
///
/// ```
/// # use rpkimon_core::log_op_end;
/// log_op_end!("certificate_analysis", duration_ms = 42, cluster_count = 0);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        $crate::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::rpkimon_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)+)?
        )
    };
}

/// Failed end of an operation, tagged with the error's kind and code
///
/// Accepts anything convertible into `ExError`.
///
/// ```
/// # use rpkimon_core::{log_op_error, errors::AnalysisError};
/// let err = AnalysisError::OverlapBudgetExceeded { total: 70_000, limit: 65_536 };
/// log_op_error!("certificate_analysis", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::rpkimon_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($($field)+)?
        );
    }};
}
