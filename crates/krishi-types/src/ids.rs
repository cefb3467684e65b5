//! Type-safe identifier wrappers.
//!
//! Runtime entities (plots, events) carry UUID v7 identifiers so they sort
//! by creation time. Catalog entries (crops, missions, quizzes, achievements,
//! tips) are addressed by stable string slugs such as `"wheat"` or
//! `"crop-rotation"` that the dashboard already knows.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Generates a newtype wrapper around a catalog slug.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create a key from any string-like slug.
            pub fn new(slug: impl Into<String>) -> Self {
                Self(slug.into())
            }

            /// Borrow the slug.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(slug: &str) -> Self {
                Self(slug.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(slug: String) -> Self {
                Self(slug)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a farm plot. Stable for the life of the farm.
    PlotId
}

define_id! {
    /// Unique identifier for an emitted game event.
    EventId
}

define_key! {
    /// Catalog key of a crop type (e.g. `"wheat"`).
    CropId
}

define_key! {
    /// Catalog key of a mission (e.g. `"crop-rotation"`).
    MissionId
}

define_key! {
    /// Catalog key of an achievement (e.g. `"green-thumb"`).
    AchievementId
}

define_key! {
    /// Catalog key of a quiz (e.g. `"organic-fertilizer-quiz"`).
    QuizId
}

define_key! {
    /// Key of a question, unique within its quiz (e.g. `"q1"`).
    QuestionId
}

define_key! {
    /// Catalog key of a farming tip.
    TipId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_ids_are_unique() {
        let a = PlotId::new();
        let b = PlotId::new();
        assert_ne!(a, b);
        assert_ne!(a.into_inner(), Uuid::nil());
    }

    #[test]
    fn uuid_round_trip() {
        let uuid = Uuid::now_v7();
        let plot = PlotId::from(uuid);
        let back: Uuid = plot.into();
        assert_eq!(uuid, back);
    }

    #[test]
    fn keys_serialize_as_plain_strings() {
        let crop = CropId::from("wheat");
        let json = serde_json::to_string(&crop).unwrap_or_default();
        assert_eq!(json, "\"wheat\"");
        assert_eq!(crop.to_string(), "wheat");
        assert_eq!(crop.as_str(), "wheat");
    }
}
