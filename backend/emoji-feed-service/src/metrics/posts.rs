use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec,
};

lazy_static! {
    /// Post mutations by operation (create, delete) and outcome.
    pub static ref POST_MUTATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "post_mutations_total",
        "Post create/delete attempts segmented by outcome",
        &["operation", "result"]
    )
    .expect("failed to register post_mutations_total");

    /// Feed assembly latency, global feed vs single-author feed.
    pub static ref FEED_ASSEMBLY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "feed_assembly_duration_seconds",
        "Time to load posts and resolve their authors",
        &["scope"]
    )
    .expect("failed to register feed_assembly_duration_seconds");

    /// Ranking computations by kind (emojis, emojis_by_user, active_users).
    pub static ref RANKING_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "ranking_requests_total",
        "Top-N ranking computations segmented by kind",
        &["ranking"]
    )
    .expect("failed to register ranking_requests_total");

    /// Posts whose author could not be resolved by the identity directory.
    pub static ref INTEGRITY_FAULTS_TOTAL: IntCounter = register_int_counter!(
        "post_author_integrity_faults_total",
        "Posts referencing an author missing from the identity directory"
    )
    .expect("failed to register post_author_integrity_faults_total");

    /// Identity directory calls by operation and outcome.
    pub static ref DIRECTORY_LOOKUPS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "identity_directory_lookups_total",
        "Identity directory requests segmented by operation and outcome",
        &["operation", "result"]
    )
    .expect("failed to register identity_directory_lookups_total");
}
