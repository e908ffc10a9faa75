//! Coach-tip metrics for the coaching domain.

use metrics::{counter, gauge};

/// Coach tip metrics recorder
pub struct CoachTipMetrics;

impl CoachTipMetrics {
    /// Record a generated tip
    pub fn record_tip_generated(category: &str, priority: &str) {
        counter!(
            "coach_tips_generated_total",
            "category" => category.to_string(),
            "priority" => priority.to_string()
        )
        .increment(1);
    }

    /// Record a completed cleanup run
    pub fn record_cleanup_completed(cleaned_count: usize) {
        counter!("coach_tips_cleanup_total").increment(cleaned_count as u64);

        tracing::info!(cleaned_count = cleaned_count, "Tip cleanup completed");
    }

    /// Set the current count of active (unexpired) tips
    pub fn set_active_tips_count(count: usize) {
        gauge!("coach_tips_active").set(count as f64);
    }
}
