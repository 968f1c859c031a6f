//! Body model: body parts, sides and the segment pairs that form limbs.
//!
//! The motion-capture loader is external; it hands over plain trajectories
//! grouped into [`LimbComponents`]. This module only knows which parts a
//! [`BodyModel`] admits and how heavy each part is.

use crate::error::{PoseError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A body part made of a left and a right rigid segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BodyPart {
    /// Shoulder to elbow.
    UpperArms,
    /// Elbow to wrist.
    ForeArms,
    /// Wrist to finger tip.
    Hands,
    /// Hip to knee.
    Thighs,
    /// Knee to ankle.
    Shanks,
    /// Ankle to toe.
    Feet,
}

impl BodyPart {
    /// All body parts in model order.
    pub const ALL: [Self; 6] = [
        Self::UpperArms,
        Self::ForeArms,
        Self::Hands,
        Self::Thighs,
        Self::Shanks,
        Self::Feet,
    ];

    /// Mass of one segment relative to the full body (= 1.0).
    #[must_use]
    pub const fn mass_fraction(self) -> f64 {
        match self {
            Self::UpperArms => 0.028,
            Self::ForeArms => 0.016,
            Self::Hands => 0.006,
            Self::Thighs => 0.100,
            Self::Shanks => 0.0465,
            Self::Feet => 0.0145,
        }
    }

    /// Mass of this part for the given side(s).
    #[must_use]
    pub fn mass(self, side: Side) -> f64 {
        match side {
            Side::Both => 2.0 * self.mass_fraction(),
            Side::Left | Side::Right => self.mass_fraction(),
        }
    }

    /// Lowercase name used in log output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UpperArms => "upper_arms",
            Self::ForeArms => "fore_arms",
            Self::Hands => "hands",
            Self::Thighs => "thighs",
            Self::Shanks => "shanks",
            Self::Feet => "feet",
        }
    }
}

/// Body side selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Side {
    /// Left side only.
    Left,
    /// Right side only.
    Right,
    /// Both sides.
    #[default]
    Both,
}

/// Segment body model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BodyModel {
    /// Upper arms and thighs.
    Four,
    /// Arms and legs without hands and feet.
    Eight,
    /// Every segment.
    #[default]
    Twelve,
}

impl BodyModel {
    /// Whether this model admits `part`.
    #[must_use]
    pub const fn allows(self, part: BodyPart) -> bool {
        match self {
            Self::Four => matches!(part, BodyPart::UpperArms | BodyPart::Thighs),
            Self::Eight => !matches!(part, BodyPart::Hands | BodyPart::Feet),
            Self::Twelve => true,
        }
    }

    /// Number of segments in the model.
    #[must_use]
    pub const fn segments(self) -> u8 {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
            Self::Twelve => 12,
        }
    }
}

impl TryFrom<u8> for BodyModel {
    type Error = PoseError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            12 => Ok(Self::Twelve),
            other => Err(PoseError::invalid_config(format!(
                "body model must be 4, 8 or 12, got {other}"
            ))),
        }
    }
}

/// Two landmark trajectories forming a rigid segment (e.g. elbow and wrist).
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPair {
    /// Proximal landmark name.
    pub proximal_name: String,
    /// Proximal landmark trajectory.
    pub proximal: Vec<[f64; 3]>,
    /// Distal landmark name.
    pub distal_name: String,
    /// Distal landmark trajectory.
    pub distal: Vec<[f64; 3]>,
}

impl SegmentPair {
    /// Create a segment pair.
    pub fn new(
        proximal_name: impl Into<String>,
        proximal: Vec<[f64; 3]>,
        distal_name: impl Into<String>,
        distal: Vec<[f64; 3]>,
    ) -> Self {
        Self {
            proximal_name: proximal_name.into(),
            proximal,
            distal_name: distal_name.into(),
            distal,
        }
    }

    /// Number of frames, checking both landmarks agree.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::LengthMismatch`] (with the distal name attached)
    /// when the two trajectories differ in length.
    pub fn frames(&self) -> Result<usize> {
        if self.proximal.len() != self.distal.len() {
            return Err(PoseError::length_mismatch(self.proximal.len(), self.distal.len())
                .in_segment(&self.distal_name));
        }
        Ok(self.proximal.len())
    }
}

/// The left and right segments of one body part.
#[derive(Debug, Clone, PartialEq)]
pub struct LimbComponents {
    /// Which body part.
    pub part: BodyPart,
    /// Left segment.
    pub left: SegmentPair,
    /// Right segment.
    pub right: SegmentPair,
}

impl LimbComponents {
    /// Create limb components.
    #[must_use]
    pub fn new(part: BodyPart, left: SegmentPair, right: SegmentPair) -> Self {
        Self { part, left, right }
    }

    /// Segments of the selected side(s).
    #[must_use]
    pub fn segments(&self, side: Side) -> Vec<&SegmentPair> {
        match side {
            Side::Left => vec![&self.left],
            Side::Right => vec![&self.right],
            Side::Both => vec![&self.left, &self.right],
        }
    }
}

/// Total mass of `parts` for `side`.
#[must_use]
pub fn total_mass(parts: &[BodyPart], side: Side) -> f64 {
    parts.iter().map(|part| part.mass(side)).sum()
}
