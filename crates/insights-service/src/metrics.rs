//! Prometheus metrics for cache, sync and summary activity.
//!
//! Recording is a no-op until the server installs a recorder.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Metric names.
pub mod names {
    /// Total HTTP requests served.
    pub const HTTP_REQUESTS_TOTAL: &str = "insights_http_requests_total";
    /// HTTP request duration in seconds.
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "insights_http_request_duration_seconds";

    /// Cache lookups that found a value.
    pub const CACHE_HITS_TOTAL: &str = "insights_cache_hits_total";
    /// Cache lookups that found nothing.
    pub const CACHE_MISSES_TOTAL: &str = "insights_cache_misses_total";

    /// Pages synced from the source API.
    pub const SYNC_PAGES_TOTAL: &str = "insights_sync_pages_total";
    /// Rows upserted by a sync, labelled by entity.
    pub const SYNC_ROWS_TOTAL: &str = "insights_sync_rows_total";
    /// Sync duration in seconds.
    pub const SYNC_DURATION_SECONDS: &str = "insights_sync_duration_seconds";

    /// Summaries generated, labelled by source (`ai` or `fallback`).
    pub const SUMMARIES_TOTAL: &str = "insights_summaries_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
    describe_histogram!(
        names::HTTP_REQUEST_DURATION_SECONDS,
        "HTTP request duration in seconds"
    );

    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of cache hits");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Total number of cache misses");

    describe_counter!(names::SYNC_PAGES_TOTAL, "Total number of pages synced from LinkedIn");
    describe_counter!(names::SYNC_ROWS_TOTAL, "Total number of rows upserted by syncs");
    describe_histogram!(names::SYNC_DURATION_SECONDS, "Page sync duration in seconds");

    describe_counter!(names::SUMMARIES_TOTAL, "Total number of page summaries generated");
}

/// Metrics recorder for the service layer.
#[derive(Clone, Copy, Debug)]
pub struct ServiceMetrics;

impl ServiceMetrics {
    /// Record a served HTTP request.
    pub fn http_request(method: &str, route: &str, status: u16, duration: Duration) {
        counter!(
            names::HTTP_REQUESTS_TOTAL,
            "method" => method.to_string(),
            "route" => route.to_string(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            names::HTTP_REQUEST_DURATION_SECONDS,
            "method" => method.to_string(),
            "route" => route.to_string()
        )
        .record(duration.as_secs_f64());
    }

    /// Record a cache hit.
    pub fn cache_hit() {
        counter!(names::CACHE_HITS_TOTAL).increment(1);
    }

    /// Record a cache miss.
    pub fn cache_miss() {
        counter!(names::CACHE_MISSES_TOTAL).increment(1);
    }

    /// Record a completed page sync.
    pub fn page_synced(posts: u64, comments: u64, employees: u64, duration: Duration) {
        counter!(names::SYNC_PAGES_TOTAL).increment(1);
        counter!(names::SYNC_ROWS_TOTAL, "entity" => "post").increment(posts);
        counter!(names::SYNC_ROWS_TOTAL, "entity" => "comment").increment(comments);
        counter!(names::SYNC_ROWS_TOTAL, "entity" => "employee").increment(employees);
        histogram!(names::SYNC_DURATION_SECONDS).record(duration.as_secs_f64());
    }

    /// Record a generated summary.
    pub fn summary_generated(fallback: bool) {
        let source = if fallback { "fallback" } else { "ai" };
        counter!(names::SUMMARIES_TOTAL, "source" => source).increment(1);
    }
}
