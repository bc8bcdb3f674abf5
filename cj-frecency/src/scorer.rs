use crate::entry::Entry;

/// Ranking mode selecting how candidates are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMethod {
    Recent,
    Frequent,
    Frecent,
}

/// Blend frequency and recency into a single scalar.
///
/// Monotonically decreasing in age and increasing in score, so a very
/// recent low-frequency command can outrank an old high-frequency one.
pub fn frecency(score: f64, last_access: i64, now: i64) -> f64 {
    let dx = (now - last_access) as f64;
    (10000.0 * score * (3.75 / ((0.0001 * dx + 1.0) + 0.25))).floor()
}

/// Rank value of an entry under the given sort method.
///
/// `Recent` yields `last_access - now` (negative age), so larger means
/// more recent.
pub fn rank_value(entry: &Entry, method: SortMethod, now: i64) -> f64 {
    match method {
        SortMethod::Frecent => frecency(entry.score, entry.last_access, now),
        SortMethod::Frequent => entry.score,
        SortMethod::Recent => (entry.last_access - now) as f64,
    }
}
