use std::time::Duration;

use criterion::Criterion;

/// Configuration for fill benchmarks, whose batches are large enough that
/// a handful of samples is stable.
pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .warm_up_time(Duration::from_secs(2))
        .measurement_time(Duration::from_secs(10))
        .sample_size(10)
}

/// Configuration for structural operations, which are short and noisy.
pub fn structural_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(5))
        .sample_size(50)
        .noise_threshold(0.03)
}
