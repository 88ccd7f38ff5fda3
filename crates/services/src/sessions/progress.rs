use serde::Serialize;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub total: usize,
    pub current_index: usize,
    /// Share of questions already left behind, `0..=100`.
    pub percent: u32,
}

impl SessionProgress {
    #[must_use]
    pub fn new(total: usize, current_index: usize) -> Self {
        Self {
            total,
            current_index,
            percent: rounded_percent(current_index, total),
        }
    }
}

/// `round(100 * part / whole)` with ties rounding up. Zero when `whole` is zero.
#[must_use]
pub fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part as u128;
    let whole = whole as u128;
    let scaled = (200 * part + whole) / (2 * whole);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(rounded_percent(1, 3), 33);
        assert_eq!(rounded_percent(2, 3), 67);
        assert_eq!(rounded_percent(1, 8), 13);
        assert_eq!(rounded_percent(1, 200), 1);
        assert_eq!(rounded_percent(0, 5), 0);
        assert_eq!(rounded_percent(5, 5), 100);
        assert_eq!(rounded_percent(1, 0), 0);
    }

    #[test]
    fn progress_tracks_index() {
        assert_eq!(SessionProgress::new(4, 1).percent, 25);
        assert_eq!(SessionProgress::new(3, 2).percent, 67);
        assert_eq!(SessionProgress::new(0, 0).percent, 0);
    }
}
