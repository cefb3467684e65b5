//! Random selection that avoids recently shown entries.
//!
//! Used for farming tips and rotating weather. The picker keeps a short
//! history (the exclusion window) of recently chosen indices and draws
//! uniformly from everything outside it. When the catalog is too small to
//! honor the full window, the window shrinks so that at least one candidate
//! always remains.

use std::collections::VecDeque;

use rand::Rng;

/// Repeat-avoiding index picker over a catalog of `len` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentPicker {
    /// Maximum number of recent picks to avoid.
    window: usize,
    /// Most recent picks, oldest first.
    history: VecDeque<usize>,
}

impl RecentPicker {
    /// Create a picker that avoids the last `window` picks.
    pub const fn new(window: usize) -> Self {
        Self {
            window,
            history: VecDeque::new(),
        }
    }

    /// Recent picks, oldest first.
    pub fn history(&self) -> impl Iterator<Item = usize> + '_ {
        self.history.iter().copied()
    }

    /// Mark `index` as shown without drawing.
    pub fn record(&mut self, index: usize) {
        self.history.push_back(index);
        while self.history.len() > self.window {
            self.history.pop_front();
        }
    }

    /// Draw an index in `0..len` outside the exclusion window.
    ///
    /// Returns `None` only for an empty catalog.
    pub fn pick(&mut self, len: usize, rng: &mut impl Rng) -> Option<usize> {
        let max_excluded = len.checked_sub(1)?;
        let excluded_count = self.window.min(max_excluded);
        let skip = self.history.len().saturating_sub(excluded_count);
        let excluded: Vec<usize> = self.history.iter().skip(skip).copied().collect();

        let candidates: Vec<usize> = (0..len).filter(|i| !excluded.contains(i)).collect();
        if candidates.is_empty() {
            return None;
        }
        let choice = candidates.get(rng.random_range(0..candidates.len())).copied()?;

        self.record(choice);
        Some(choice)
    }
}
