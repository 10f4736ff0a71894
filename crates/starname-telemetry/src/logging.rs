//! Structured logging macros.
//!
//! Every record carries a `subsystem` field so that aggregated logs can be
//! filtered per component. Domain-specific macros add the fields the
//! registry always logs together (domain, account).

/// Helper to create structured log entries with consistent formatting.
#[macro_export]
macro_rules! log_event {
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        $crate::__private::__tracing::info!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        $crate::__private::__tracing::warn!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (error, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        $crate::__private::__tracing::error!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        $crate::__private::__tracing::debug!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a registry event with the standard `domain` and `account` fields.
#[macro_export]
macro_rules! log_registry_event {
    ($level:ident, $msg:expr, $domain:expr, $account:expr $(, $($field:tt)*)?) => {
        $crate::__private::__tracing::$level!(
            subsystem = $crate::REGISTRY_SUBSYSTEM,
            domain = %$domain,
            account = %$account,
            $($($field)*,)?
            $msg
        )
    };
}
