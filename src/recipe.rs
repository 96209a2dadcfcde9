use crate::{
    classify::{AspectClass, Classification, SizeClass},
    tuning,
};

/// How the repeating texture is synthesized from the source photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TileMethod {
    /// Single 2x2 bookmatch unit. Large, balanced sources only.
    Standard,
    /// The bookmatch unit replicated across an NxN grid.
    Enhanced,
    /// Source is first centered onto a square canvas, then bookmatched and
    /// replicated across a denser grid.
    SuperEnhanced,
}

impl TileMethod {
    /// Whether the source is normalized onto a centered square before
    /// mirroring.
    pub fn pads_to_square(self) -> bool {
        matches!(self, TileMethod::SuperEnhanced)
    }
}

/// Synthesis plan for one classified source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TileRecipe {
    pub method: TileMethod,
    /// Bookmatch units per grid axis; 1 means the bare unit.
    pub repetition: u32,
    /// Display size of one full texture repeat, in CSS pixels.
    pub background_size_px: u32,
}

/// Pure lookup from classification to recipe. Method precedence: the square
/// normalization path wins whenever the source is very small or extreme in
/// aspect; grid densification wins over the plain bookmatch otherwise.
pub fn select_recipe(classification: Classification) -> TileRecipe {
    let Classification { size, aspect } = classification;

    let (method, repetition) = if size == SizeClass::VerySmall || aspect == AspectClass::Extreme {
        let repetition = if aspect == AspectClass::Extreme {
            tuning::REPETITION_EXTREME
        } else {
            tuning::REPETITION_VERY_SMALL
        };
        (TileMethod::SuperEnhanced, repetition)
    } else if size != SizeClass::Large || aspect == AspectClass::Unbalanced {
        let repetition = match size {
            SizeClass::Small => tuning::REPETITION_SMALL,
            SizeClass::Medium => tuning::REPETITION_MEDIUM,
            SizeClass::Large => tuning::REPETITION_UNBALANCED,
            SizeClass::VerySmall => unreachable!("handled by the square path"),
        };
        (TileMethod::Enhanced, repetition)
    } else {
        (TileMethod::Standard, 1)
    };

    TileRecipe {
        method,
        repetition,
        background_size_px: tuning::BACKGROUND_TILE_PX,
    }
}
