//! Timing helpers for the symbolic pipeline.
//!
//! Tensor construction is dominated by symbolic simplification, so the
//! helpers here report how long each stage took and how large its output was.
//!
//! ```rust
//! use geodesic_tracing::performance::{record_tensor_stage, PerformanceSpan};
//!
//! let span = PerformanceSpan::new("christoffel_first", Some(100));
//! // ... compute ...
//! record_tensor_stage("christoffel_first", 3, 27, span.elapsed_us());
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;
use tracing::Level;

static ENABLED: AtomicBool = AtomicBool::new(true);
// u64::MAX means "no default threshold".
static DEFAULT_THRESHOLD_US: AtomicU64 = AtomicU64::new(u64::MAX);

/// Set the process-wide switches read by every [`PerformanceSpan`].
///
/// Called by [`crate::init_global_tracing`]; callers composing their own
/// subscriber can call it directly.
pub fn configure(enabled: bool, default_threshold_us: Option<u64>) {
    ENABLED.store(enabled, Ordering::Relaxed);
    DEFAULT_THRESHOLD_US.store(default_threshold_us.unwrap_or(u64::MAX), Ordering::Relaxed);
}

/// Whether performance spans currently log on drop.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

fn default_threshold() -> Option<u64> {
    match DEFAULT_THRESHOLD_US.load(Ordering::Relaxed) {
        u64::MAX => None,
        t => Some(t),
    }
}

/// RAII guard that times a region and logs its duration when dropped.
///
/// Nothing is logged when the elapsed time is below the threshold. A span
/// created without its own threshold uses the one passed to [`configure`].
pub struct PerformanceSpan {
    name: String,
    threshold_us: Option<u64>,
    start_time: Instant,
    span: tracing::Span,
}

impl PerformanceSpan {
    pub fn new(span_name: impl Into<String>, threshold_us: Option<u64>) -> Self {
        Self::with_level(Level::DEBUG, span_name, threshold_us)
    }

    /// Same as [`PerformanceSpan::new`] but at an explicit tracing level.
    pub fn with_level(level: Level, span_name: impl Into<String>, threshold_us: Option<u64>) -> Self {
        let name = span_name.into();
        let span = match level {
            Level::TRACE => tracing::trace_span!("perf", name = %name),
            Level::DEBUG => tracing::debug_span!("perf", name = %name),
            Level::INFO => tracing::info_span!("perf", name = %name),
            Level::WARN => tracing::warn_span!("perf", name = %name),
            Level::ERROR => tracing::error_span!("perf", name = %name),
        };

        Self {
            name,
            threshold_us: threshold_us.or_else(default_threshold),
            start_time: Instant::now(),
            span,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elapsed_us(&self) -> u64 {
        self.start_time.elapsed().as_micros() as u64
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for PerformanceSpan {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_us = self.elapsed_us();
        if self.threshold_us.is_none_or(|t| elapsed_us >= t) {
            let _entered = self.span.enter();
            tracing::debug!(
                duration_us = elapsed_us,
                duration_ms = elapsed_us as f64 / 1000.0,
                "performance_span_complete"
            );
        }
    }
}

/// Record the completion of one tensor stage (metric, dg, Γ, inverse...).
///
/// `dim` is the basis dimension and `components` the number of entries the
/// stage produced.
pub fn record_tensor_stage(stage: &str, dim: usize, components: usize, duration_us: u64) {
    let components_per_sec = if duration_us > 0 {
        (components as f64 / duration_us as f64) * 1_000_000.0
    } else {
        0.0
    };

    tracing::debug!(
        event = "tensor_stage",
        stage = stage,
        dim = dim,
        components = components,
        duration_us = duration_us,
        duration_ms = duration_us as f64 / 1000.0,
        components_per_sec = components_per_sec,
        "tensor_stage_complete"
    );
}

/// Record how much a simplification pass shrank an expression.
pub fn record_simplification(transform: &str, nodes_before: usize, nodes_after: usize, duration_us: u64) {
    let ratio = if nodes_before > 0 {
        nodes_after as f64 / nodes_before as f64
    } else {
        1.0
    };

    tracing::trace!(
        event = "simplification",
        transform = transform,
        nodes_before = nodes_before,
        nodes_after = nodes_after,
        shrink_ratio = ratio,
        duration_us = duration_us,
        "simplification_complete"
    );
}
