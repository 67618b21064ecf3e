/// Similarity threshold a pair must strictly exceed to count as a match.
const MATCH_THRESHOLD: f64 = 0.5;

/// Normalized similarity in [0, 1] between two names, case-folded.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(&a.to_lowercase(), &b.to_lowercase())
}

/// Best-matching known name for any of the extracted candidates.
///
/// Every (candidate, known name) pair is scored; a pair only replaces the
/// incumbent when its ratio is strictly higher, so equal-ratio pairs keep
/// the first-encountered winner. Returns `None` when no pair strictly
/// exceeds the 0.5 threshold.
pub fn best_match<C, K>(candidates: &[C], known_names: &[K]) -> Option<String>
where
    C: AsRef<str>,
    K: AsRef<str>,
{
    let mut best: Option<&str> = None;
    let mut best_ratio = MATCH_THRESHOLD;

    for candidate in candidates {
        for name in known_names {
            let ratio = similarity(candidate.as_ref(), name.as_ref());
            if ratio > best_ratio {
                best = Some(name.as_ref());
                best_ratio = ratio;
            }
        }
    }

    if let Some(name) = best {
        log::debug!("best match {name:?} with ratio {best_ratio:.3}");
    }
    best.map(str::to_string)
}
