//! Query modules, one per table family.

pub mod catalog;
pub mod runs;
pub mod vectors;

/// Seconds since the Unix epoch, for `*_at` columns.
pub(crate) fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
