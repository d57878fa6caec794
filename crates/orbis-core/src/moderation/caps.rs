//! Shouting detection: share of uppercase letters among all letters.

/// Letter counts used by [`is_shouting`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CapsStats {
    /// Alphabetic characters that are uppercase.
    pub caps: usize,
    /// All alphabetic characters.
    pub alpha: usize,
}

impl CapsStats {
    /// Unicode-aware letter count (not ASCII-only).
    pub fn measure(text: &str) -> Self {
        let mut stats = Self::default();
        for c in text.chars().filter(|c| c.is_alphabetic()) {
            stats.alpha += 1;
            if c.is_uppercase() {
                stats.caps += 1;
            }
        }
        stats
    }

    /// Uppercase share of letters, `None` when there are no letters.
    pub fn ratio(&self) -> Option<f64> {
        if self.alpha == 0 {
            return None;
        }
        Some(self.caps as f64 / self.alpha as f64)
    }
}

/// True when `text` has at least `min_alpha` letters and strictly more than
/// `threshold` of them are uppercase.
pub fn is_shouting(text: &str, threshold: f64, min_alpha: usize) -> bool {
    let stats = CapsStats::measure(text);
    if stats.alpha < min_alpha {
        return false;
    }
    match stats.ratio() {
        Some(r) => r > threshold,
        None => false,
    }
}
