//! Graphic override values.
//!
//! [`OverrideSet`] is the model-side view: each field is either absent (no
//! override) or an explicit value. [`OverrideRecord`] mirrors what the
//! rendering target stores, including its "invalid" encodings, and knows how
//! to report the effective value of each field.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::ModelError;
use crate::ids::PatternId;

/// Projection line weight (pen number) in `1..=16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct LineWeight(u8);

impl LineWeight {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 16;
    /// Raw value an edit surface uses to request "clear the weight override".
    pub const CLEAR_SENTINEL: i32 = -1;

    pub fn new(value: i32) -> Result<Self, ModelError> {
        if (i32::from(Self::MIN)..=i32::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ModelError::InvalidLineWeight(value))
        }
    }

    /// Interprets a pen number reported by the target; zero, negative, and
    /// out-of-range values mean "no override".
    pub fn from_pen(pen: i32) -> Option<Self> {
        Self::new(pen).ok()
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i32> for LineWeight {
    type Error = ModelError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LineWeight> for i32 {
    fn from(weight: LineWeight) -> Self {
        i32::from(weight.0)
    }
}

/// Tri-state override fields of a container or sub-item.
///
/// `None` means "no override", which is distinct from "leave unchanged";
/// applying a set with an absent field clears that override on the target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideSet {
    pub color: Option<Rgb>,
    pub line_pattern: Option<String>,
    pub line_weight: Option<LineWeight>,
}

impl OverrideSet {
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.line_pattern.is_none() && self.line_weight.is_none()
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_line_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.line_pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn with_line_weight(mut self, weight: LineWeight) -> Self {
        self.line_weight = Some(weight);
        self
    }
}

/// Line color as the target stores it: channels plus a validity flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub is_valid: bool,
}

impl LineColor {
    pub const INVALID: Self = Self {
        red: 0,
        green: 0,
        blue: 0,
        is_valid: false,
    };

    /// The explicit color, if the record carries a valid non-black value.
    ///
    /// The target reports "no color" as an all-zero value; a black override
    /// therefore reads back as absent.
    pub fn effective(self) -> Option<Rgb> {
        let rgb = Rgb::new(self.red, self.green, self.blue);
        (self.is_valid && !rgb.is_black()).then_some(rgb)
    }
}

impl Default for LineColor {
    fn default() -> Self {
        Self::INVALID
    }
}

impl From<Rgb> for LineColor {
    fn from(rgb: Rgb) -> Self {
        Self {
            red: rgb.red,
            green: rgb.green,
            blue: rgb.blue,
            is_valid: true,
        }
    }
}

/// Override record exchanged with the rendering target.
///
/// `Default` is the empty record (nothing overridden); records written by
/// this crate are always built up from that empty state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverrideRecord {
    pub line_color: LineColor,
    pub line_pattern: Option<PatternId>,
    /// Pen number; values `<= 0` mean no override.
    pub line_weight: i32,
    pub halftone: bool,
}

impl OverrideRecord {
    pub const NO_PEN: i32 = -1;

    pub fn effective_color(&self) -> Option<Rgb> {
        self.line_color.effective()
    }

    pub fn effective_weight(&self) -> Option<LineWeight> {
        LineWeight::from_pen(self.line_weight)
    }

    pub fn has_overrides(&self) -> bool {
        self.effective_color().is_some()
            || self.line_pattern.is_some()
            || self.effective_weight().is_some()
            || self.halftone
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.line_color = color.into();
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: PatternId) -> Self {
        self.line_pattern = Some(pattern);
        self
    }

    #[must_use]
    pub fn with_weight(mut self, weight: LineWeight) -> Self {
        self.line_weight = weight.into();
        self
    }

    #[must_use]
    pub fn with_halftone(mut self, halftone: bool) -> Self {
        self.halftone = halftone;
        self
    }
}

impl Default for OverrideRecord {
    fn default() -> Self {
        Self {
            line_color: LineColor::INVALID,
            line_pattern: None,
            line_weight: Self::NO_PEN,
            halftone: false,
        }
    }
}
