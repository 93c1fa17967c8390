//! Bias Classifier
//!
//! Maps a validated event onto a signal category by combining its
//! direction, the prevailing bias reading and the technical strength
//! of the setup. Pure function, fully deterministic.

use crate::domain::{BiasLevel, Direction, SignalCategory};

/// ADX above which a setup counts as strong
const STRONG_SETUP_ADX: f64 = 30.0;
/// Line separation above which a setup counts as strong
const STRONG_SETUP_SEPARATION: f64 = 15.0;

/// Classify a signal.
///
/// The premium categories (ApisCall / KodiakCall) require the bias to
/// agree with the trade direction AND either a strong technical setup
/// or a major bias reading. Everything else falls to the plain
/// directional categories.
pub fn classify(
    direction: Direction,
    bias_level: BiasLevel,
    bias_aligned: bool,
    adx: f64,
    line_separation: f64,
) -> SignalCategory {
    let strong_setup = adx > STRONG_SETUP_ADX && line_separation > STRONG_SETUP_SEPARATION;
    let major_bias = bias_level.is_major();
    let premium = bias_aligned && (strong_setup || major_bias);

    match direction {
        Direction::Long if premium => SignalCategory::ApisCall,
        Direction::Long => SignalCategory::BullishTrade,
        Direction::Short if premium => SignalCategory::KodiakCall,
        Direction::Short => SignalCategory::BearCall,
    }
}
