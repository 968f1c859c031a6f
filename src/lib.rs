//! Turning Poses Library
//!
//! Kinematic key-pose extraction for motion-capture sequences.
//!
//! This library reduces the limb trajectories of a captured performance to a
//! single low-dimensional trajectory and finds the frames where motion
//! concentrates, the *turning poses* of the sequence.
//!
//! # Features
//!
//! - **Closest point of approach**: left and right limb segments are unified
//!   into one trajectory per body part
//! - **Combined PCA**: all body parts are reduced to at most three principal axes
//! - **Windowed kinematics**: velocity, acceleration, power and kinetic energy
//! - **Peak detection**: strict local maxima of `energy * velocity`
//! - **Candidate fusion**: curvature, energy and velocity candidates scored together
//!
//! # Quick Start
//!
//! ```
//! use turning_poses::{
//!     BodyPart, ExtractionConfig, LimbComponents, SegmentPair, Side, TurningPoseExtractor,
//! };
//!
//! let frames = 120;
//! let center = vec![[0.0, 0.0, 1.0]; frames];
//! let elbow: Vec<[f64; 3]> = vec![[0.3, 0.0, 1.2]; frames];
//! let wrist: Vec<[f64; 3]> = (0..frames)
//!     .map(|i| {
//!         let t = i as f64 * 0.2;
//!         [0.3 + 0.2 * t.sin(), 0.25 * t.cos(), 1.2]
//!     })
//!     .collect();
//!
//! let left = SegmentPair::new("lelb", elbow.clone(), "lwra", wrist.clone());
//! let right = SegmentPair::new("relb", elbow, "rwra", wrist);
//! let limbs = vec![LimbComponents::new(BodyPart::ForeArms, left, right)];
//!
//! let extractor = TurningPoseExtractor::new(ExtractionConfig::raw(Side::Left))?;
//! let extraction = extractor.extract(&limbs, &center)?;
//!
//! assert_eq!(extraction.trajectory.len(), frames);
//! assert!(extraction.turning_poses.iter().all(|&f| f < frames));
//! # Ok::<(), turning_poses::PoseError>(())
//! ```
//!
//! # Series Lengths
//!
//! | Series | Length |
//! |--------|--------|
//! | `distances` | `L` |
//! | `velocity`, `acceleration`, `power` | `L - velocity_window` |
//! | `energy` | `L - energy_window` |
//! | `weight` | shorter of `energy` and `velocity` |
//!
//! # Presets
//!
//! ```
//! use turning_poses::{ExtractionConfig, Side};
//!
//! let dance = ExtractionConfig::dance();
//! let raw = ExtractionConfig::raw(Side::Right);
//! let smoothed = ExtractionConfig::smoothed();
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod body;
pub mod config;
pub mod derivative;
pub mod detector;
pub mod error;
pub mod extraction;
pub mod filter;
pub mod kinematics;
pub mod math;

// Re-exports for convenient access
pub use body::{total_mass, BodyModel, BodyPart, LimbComponents, SegmentPair, Side};
pub use config::{
    ComponentMode, ExtractionConfig, FrameRange, SmoothingConfig, DEFAULT_CAPTURE_INTERVAL,
    DEFAULT_DERIVATIVE_STEP,
};
pub use derivative::{derivative, derivative_with_step};
pub use detector::{
    composite_weight, detect_turning_poses, fused_strength, local_maxima, slope_peak_candidates,
    slope_sign_candidates, CandidateSignals,
};
pub use error::{PoseError, Result};
pub use extraction::{Extraction, TurningPoseExtractor};
pub use filter::smooth_trajectory;
pub use kinematics::{acceleration, kinetic_energy, kinetic_energy_with_interval, power, velocity};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
