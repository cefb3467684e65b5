//! The built-in crop catalog.
//!
//! Crop types are immutable. A plot refers to its crop by [`CropId`] and
//! the catalog resolves the id when planting.

use krishi_types::{CropCategory, CropId, CropType};

/// Lookup table of plantable crops, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropCatalog {
    crops: Vec<CropType>,
}

impl CropCatalog {
    /// Build a catalog from an explicit list.
    pub const fn new(crops: Vec<CropType>) -> Self {
        Self { crops }
    }

    /// The six crops every farm starts with.
    pub fn builtin() -> Self {
        Self::new(vec![
            crop("wheat", "Wheat", CropCategory::Cereal, 80),
            crop("rice", "Rice", CropCategory::Cereal, 75),
            crop("tomato", "Tomato", CropCategory::Vegetable, 70),
            crop("corn", "Corn", CropCategory::Cereal, 65),
            crop("cotton", "Cotton", CropCategory::Cash, 60),
            crop("pulses", "Pulses", CropCategory::Pulse, 90),
        ])
    }

    /// Resolve a crop by id.
    pub fn get(&self, id: &CropId) -> Option<&CropType> {
        self.crops.iter().find(|c| &c.id == id)
    }

    /// Whether the id names a catalog crop.
    pub fn contains(&self, id: &CropId) -> bool {
        self.get(id).is_some()
    }

    /// All crops, in display order.
    pub fn all(&self) -> &[CropType] {
        &self.crops
    }
}

impl Default for CropCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn crop(id: &str, name: &str, category: CropCategory, base_sustainability: u32) -> CropType {
    CropType {
        id: CropId::from(id),
        name: name.to_owned(),
        category,
        base_sustainability,
    }
}
