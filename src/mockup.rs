//! Room mockup model: a photographed base image with named paintable
//! regions, plus the builtin set shipped with the catalog.

use std::collections::HashSet;

use crate::{
    assets::normalize_source,
    foundation::core::{PixelSize, RectPx},
    foundation::error::{VeneerError, VeneerResult},
};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
/// Blend mode used when painting a texture into a region.
pub enum BlendMode {
    /// Texture replaces the base (before the opacity lerp).
    #[default]
    Normal,
    /// Per-channel product; darkens. The stone-on-wall look.
    Multiply,
    /// Multiply below mid-gray, screen above; preserves base contrast.
    Overlay,
    /// Inverse product of inverses; lightens.
    Screen,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One paintable region, in unit fractions of the base image.
pub struct Region {
    /// Region name, unique within a mockup ("wall", "floor").
    pub name: String,
    /// Left edge as a fraction of base width, in `[0, 1]`.
    pub x: f64,
    /// Top edge as a fraction of base height, in `[0, 1]`.
    pub y: f64,
    /// Width as a fraction of base width; region must stay inside the base.
    pub width: f64,
    /// Height as a fraction of base height.
    pub height: f64,
    /// Texture opacity over the base, in `[0, 1]`.
    pub opacity: f32,
    /// Blend applied before the opacity lerp.
    pub blend: BlendMode,
}

impl Region {
    /// Validate geometry and opacity invariants.
    pub fn validate(&self) -> VeneerResult<()> {
        if self.name.trim().is_empty() {
            return Err(VeneerError::validation("region name must be non-empty"));
        }

        for (field, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() {
                return Err(VeneerError::validation(format!(
                    "region '{}' {field} must be finite",
                    self.name
                )));
            }
        }
        if self.x < 0.0 || self.y < 0.0 {
            return Err(VeneerError::validation(format!(
                "region '{}' origin must be >= 0",
                self.name
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(VeneerError::validation(format!(
                "region '{}' width/height must be > 0",
                self.name
            )));
        }
        if self.x + self.width > 1.0 || self.y + self.height > 1.0 {
            return Err(VeneerError::validation(format!(
                "region '{}' must stay within the unit square",
                self.name
            )));
        }

        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(VeneerError::validation(format!(
                "region '{}' opacity must be in [0, 1]",
                self.name
            )));
        }

        Ok(())
    }

    /// Resolve to whole pixels on a base of `dims`.
    ///
    /// Edges round to nearest; the end is computed from `x + width` so
    /// adjacent regions share a boundary with no gap and no overlap.
    pub fn resolve_px(&self, dims: PixelSize) -> RectPx {
        let w = f64::from(dims.width);
        let h = f64::from(dims.height);
        let x0 = (self.x * w).round().clamp(0.0, w) as u32;
        let y0 = (self.y * h).round().clamp(0.0, h) as u32;
        let x1 = ((self.x + self.width) * w).round().clamp(0.0, w) as u32;
        let y1 = ((self.y + self.height) * h).round().clamp(0.0, h) as u32;
        RectPx::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A photographed room with named paintable regions.
pub struct Mockup {
    /// Stable identifier ("bathroom").
    pub id: String,
    /// Display name ("Bathroom Wall").
    pub name: String,
    /// Base image reference, resolved through an image loader.
    pub image_source: String,
    /// Paintable regions; names unique within the mockup.
    pub regions: Vec<Region>,
}

impl Mockup {
    /// Validate mockup invariants and region data.
    pub fn validate(&self) -> VeneerResult<()> {
        if self.id.trim().is_empty() {
            return Err(VeneerError::validation("mockup id must be non-empty"));
        }
        if self.name.trim().is_empty() {
            return Err(VeneerError::validation(format!(
                "mockup '{}' name must be non-empty",
                self.id
            )));
        }
        normalize_source(&self.image_source)?;

        if self.regions.is_empty() {
            return Err(VeneerError::validation(format!(
                "mockup '{}' must define at least one region",
                self.id
            )));
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            region.validate()?;
            if !seen.insert(region.name.as_str()) {
                return Err(VeneerError::validation(format!(
                    "mockup '{}' has duplicate region '{}'",
                    self.id, region.name
                )));
            }
        }

        Ok(())
    }

    /// Region lookup by name.
    pub fn region(&self, name: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.name == name)
    }
}

/// The mockup set shipped with the catalog.
pub fn builtin_mockups() -> Vec<Mockup> {
    vec![
        Mockup {
            id: "bathroom".to_string(),
            name: "Bathroom Wall".to_string(),
            image_source: "mockups/bathroom.png".to_string(),
            regions: vec![
                Region {
                    name: "wall".to_string(),
                    x: 0.0,
                    y: 0.0,
                    width: 1.0,
                    height: 0.6,
                    opacity: 0.5,
                    blend: BlendMode::Multiply,
                },
                Region {
                    name: "floor".to_string(),
                    x: 0.0,
                    y: 0.6,
                    width: 1.0,
                    height: 0.4,
                    opacity: 0.7,
                    blend: BlendMode::Multiply,
                },
            ],
        },
        Mockup {
            id: "living-room".to_string(),
            name: "Living Room".to_string(),
            image_source: "mockups/living-room.jpg".to_string(),
            regions: vec![
                Region {
                    name: "wall".to_string(),
                    x: 0.0,
                    y: 0.0,
                    width: 1.0,
                    height: 0.7,
                    opacity: 0.3,
                    blend: BlendMode::Multiply,
                },
                Region {
                    name: "floor".to_string(),
                    x: 0.0,
                    y: 0.7,
                    width: 1.0,
                    height: 0.3,
                    opacity: 0.7,
                    blend: BlendMode::Multiply,
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Mockup {
        builtin_mockups().remove(0)
    }

    #[test]
    fn json_roundtrip() {
        let mockup = sample();
        let json = serde_json::to_string(&mockup).unwrap();
        let back: Mockup = serde_json::from_str(&json).unwrap();
        assert_eq!(mockup, back);
        back.validate().unwrap();
    }

    #[test]
    fn builtin_mockups_validate() {
        for mockup in builtin_mockups() {
            mockup.validate().unwrap();
        }
    }

    #[test]
    fn validate_rejects_duplicate_region_names() {
        let mut mockup = sample();
        let dup = mockup.regions[0].clone();
        mockup.regions.push(dup);
        let err = mockup.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate region 'wall'"));
    }

    #[test]
    fn validate_rejects_region_outside_the_unit_square() {
        let mut mockup = sample();
        mockup.regions[0].width = 1.2;
        assert!(mockup.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_range_opacity() {
        let mut mockup = sample();
        mockup.regions[0].opacity = 1.5;
        assert!(mockup.validate().is_err());
    }

    #[test]
    fn validate_rejects_traversal_in_image_source() {
        let mut mockup = sample();
        mockup.image_source = "../bathroom.png".to_string();
        assert!(mockup.validate().is_err());
    }

    #[test]
    fn adjacent_regions_resolve_without_gap_or_overlap() {
        let mockup = sample();
        let base = PixelSize::new(1000, 800).unwrap();
        let wall = mockup.region("wall").unwrap().resolve_px(base);
        let floor = mockup.region("floor").unwrap().resolve_px(base);

        assert_eq!(wall, RectPx::new(0, 0, 1000, 480));
        assert_eq!(floor, RectPx::new(0, 480, 1000, 320));
        assert_eq!(wall.bottom(), floor.y);
    }
}
