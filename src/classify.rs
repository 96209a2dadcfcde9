use crate::{
    foundation::core::PixelSize,
    foundation::error::VeneerResult,
    tuning,
};

/// Size bucket derived from `min(width, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SizeClass {
    VerySmall,
    Small,
    Medium,
    Large,
}

/// Aspect bucket derived from `max(w/h, h/w)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AspectClass {
    Balanced,
    Unbalanced,
    Extreme,
}

/// Combined classification driving tile recipe selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Classification {
    pub size: SizeClass,
    pub aspect: AspectClass,
}

impl Classification {
    /// Classify validated dimensions. Pure and total: every valid size maps to
    /// exactly one `(SizeClass, AspectClass)` pair.
    pub fn of(dims: PixelSize) -> Self {
        let min_dim = dims.min_dim();
        let size = if min_dim < tuning::SIZE_VERY_SMALL_MAX_PX {
            SizeClass::VerySmall
        } else if min_dim < tuning::SIZE_SMALL_MAX_PX {
            SizeClass::Small
        } else if min_dim < tuning::SIZE_MEDIUM_MAX_PX {
            SizeClass::Medium
        } else {
            SizeClass::Large
        };

        let ratio = dims.aspect_ratio();
        let aspect = if ratio < tuning::ASPECT_BALANCED_MAX {
            AspectClass::Balanced
        } else if ratio < tuning::ASPECT_UNBALANCED_MAX {
            AspectClass::Unbalanced
        } else {
            AspectClass::Extreme
        };

        Self { size, aspect }
    }
}

/// Classify raw dimensions, rejecting zero on either axis.
pub fn classify(width: u32, height: u32) -> VeneerResult<Classification> {
    let dims = PixelSize::new(width, height)?;
    Ok(Classification::of(dims))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(classify(0, 100).is_err());
        assert!(classify(100, 0).is_err());
    }

    #[test]
    fn size_thresholds_are_strict_less_than() {
        assert_eq!(classify(199, 1000).unwrap().size, SizeClass::VerySmall);
        assert_eq!(classify(200, 1000).unwrap().size, SizeClass::Small);
        assert_eq!(classify(499, 1000).unwrap().size, SizeClass::Small);
        assert_eq!(classify(500, 1000).unwrap().size, SizeClass::Medium);
        assert_eq!(classify(799, 1000).unwrap().size, SizeClass::Medium);
        assert_eq!(classify(800, 1000).unwrap().size, SizeClass::Large);
    }

    #[test]
    fn size_uses_min_dimension() {
        assert_eq!(classify(5000, 150).unwrap().size, SizeClass::VerySmall);
        assert_eq!(classify(150, 5000).unwrap().size, SizeClass::VerySmall);
    }

    #[test]
    fn aspect_thresholds() {
        assert_eq!(classify(1000, 600).unwrap().aspect, AspectClass::Balanced);
        assert_eq!(classify(1000, 500).unwrap().aspect, AspectClass::Unbalanced);
        assert_eq!(classify(1000, 400).unwrap().aspect, AspectClass::Unbalanced);
        assert_eq!(classify(1500, 500).unwrap().aspect, AspectClass::Extreme);
        assert_eq!(classify(2000, 50).unwrap().aspect, AspectClass::Extreme);
    }

    #[test]
    fn classification_is_deterministic_and_total() {
        for w in [1u32, 37, 199, 200, 512, 800, 2048, 4000] {
            for h in [1u32, 50, 300, 799, 1000, 3000] {
                let a = classify(w, h).unwrap();
                let b = classify(w, h).unwrap();
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn one_by_one_is_very_small_balanced() {
        let c = classify(1, 1).unwrap();
        assert_eq!(c.size, SizeClass::VerySmall);
        assert_eq!(c.aspect, AspectClass::Balanced);
    }
}
