//! Convenience macros over [`crate::performance`].

/// Create a [`crate::performance::PerformanceSpan`], optionally tagging an
/// enclosing span with extra fields.
///
/// ```rust
/// use geodesic_tracing::perf_span;
///
/// {
///     let _span = perf_span!("derivatives_of_basis", dim = 3);
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! perf_span {
    ($name:expr) => {{
        $crate::performance::PerformanceSpan::new($name, None)
    }};
    ($name:expr, $($field:tt = $value:expr),+ $(,)?) => {{
        let _span = tracing::debug_span!(
            "perf",
            name = $name,
            $($field = $value),+
        ).entered();
        $crate::performance::PerformanceSpan::new($name, None)
    }};
}

/// Debug event for a resolved quantity, keyed by `event = $name`. Only
/// emitted while performance tracking is enabled.
///
/// ```rust
/// use geodesic_tracing::perf_event;
///
/// perf_event!("signature_resolved", p = 3, q = 1);
/// ```
#[macro_export]
macro_rules! perf_event {
    ($name:expr, $($field:tt = $value:expr),+ $(,)?) => {
        if $crate::performance::is_enabled() {
            tracing::debug!(event = $name, $($field = $value),+);
        }
    };
}

/// Evaluate `$block` for the tensor stage `$stage` and yield
/// `(value, elapsed_us)`. The block runs in the caller's frame, so `?`
/// inside it returns from the enclosing function.
///
/// ```rust
/// use geodesic_tracing::timed_block;
///
/// let (trace, _us) = timed_block!("trace", { [1, 2, 3].iter().sum::<i32>() });
/// assert_eq!(trace, 6);
/// ```
#[macro_export]
macro_rules! timed_block {
    ($stage:expr, $block:block) => {{
        let started = std::time::Instant::now();
        let value = $block;
        let elapsed_us = started.elapsed().as_micros() as u64;
        tracing::trace!(stage = $stage, elapsed_us, "stage finished");
        (value, elapsed_us)
    }};
}
