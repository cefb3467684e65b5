//! Farming tips shown in the dashboard popup.
//!
//! The rotator draws a random tip, never repeating any of the last few it
//! showed.

use rand::Rng;

use krishi_types::{Tip, TipId};
use krishi_world::RecentPicker;

/// How many recent tips a draw avoids.
pub const DEFAULT_TIP_WINDOW: usize = 4;

/// Random tip selection with an exclusion window.
#[derive(Debug, Clone)]
pub struct TipRotator {
    tips: Vec<Tip>,
    picker: RecentPicker,
    current: Option<usize>,
}

impl TipRotator {
    /// Rotate over `tips`, avoiding the last `window` shown.
    pub const fn new(tips: Vec<Tip>, window: usize) -> Self {
        Self {
            tips,
            picker: RecentPicker::new(window),
            current: None,
        }
    }

    /// The built-in tips with the default window.
    pub fn builtin() -> Self {
        Self::new(builtin_tips(), DEFAULT_TIP_WINDOW)
    }

    /// All tips in the catalog.
    pub fn tips(&self) -> &[Tip] {
        &self.tips
    }

    /// The tip most recently shown.
    pub fn current(&self) -> Option<&Tip> {
        self.current.and_then(|i| self.tips.get(i))
    }

    /// Draw the next tip. `None` only for an empty catalog.
    pub fn next(&mut self, rng: &mut impl Rng) -> Option<&Tip> {
        let index = self.picker.pick(self.tips.len(), rng)?;
        self.current = Some(index);
        self.tips.get(index)
    }
}

/// The eight built-in farming tips.
pub fn builtin_tips() -> Vec<Tip> {
    [
        ("soil-types", "Soil", "Loamy soil is best for wheat, while sandy soil suits groundnut perfectly."),
        ("drip-irrigation", "Water", "Save water with drip irrigation - earn +50 sustainability points!"),
        ("marigold", "Pest Control", "Plant marigold near tomatoes to reduce pests naturally."),
        ("cow-dung-compost", "Organic", "Cow dung compost improves soil fertility and adds yield bonus."),
        ("paddy-sowing", "Timing", "Best time to sow paddy is just after the first monsoon rains."),
        ("crop-rotation", "Rotation", "Rotate crops to break pest cycles and improve soil health."),
        ("mulching", "Soil Care", "Mulching retains soil moisture and reduces weed growth by 70%."),
        (
            "neem-oil",
            "Natural Pest Control",
            "Neem oil is a natural pesticide that protects crops without harming beneficial insects.",
        ),
    ]
    .into_iter()
    .map(|(id, category, text)| Tip {
        id: TipId::from(id),
        category: category.to_owned(),
        text: text.to_owned(),
    })
    .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn builtin_has_eight_tips() {
        assert_eq!(builtin_tips().len(), 8);
    }

    #[test]
    fn no_tip_repeats_within_four_draws() {
        let mut rotator = TipRotator::builtin();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut recent: VecDeque<TipId> = VecDeque::new();
        for _ in 0..200 {
            let tip = rotator.next(&mut rng).unwrap().id.clone();
            assert!(!recent.contains(&tip));
            recent.push_back(tip);
            if recent.len() > DEFAULT_TIP_WINDOW {
                recent.pop_front();
            }
        }
    }

    #[test]
    fn current_tracks_last_draw() {
        let mut rotator = TipRotator::builtin();
        assert!(rotator.current().is_none());
        let mut rng = StdRng::seed_from_u64(5);
        let drawn = rotator.next(&mut rng).unwrap().clone();
        assert_eq!(rotator.current(), Some(&drawn));
    }

    #[test]
    fn empty_catalog_draws_nothing() {
        let mut rotator = TipRotator::new(Vec::new(), 4);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(rotator.next(&mut rng).is_none());
    }
}
