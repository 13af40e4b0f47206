//! Error types for the curve-synthesis core.

use serde::{Deserialize, Serialize};

/// Errors surfaced by the low-level curve builders.
///
/// The high-level property-curve assembly never propagates these: a span that
/// fails to build degrades to "skip + warn" so one malformed key cannot take
/// down a whole property (see `blend`).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CurveError {
    /// Window with non-positive duration
    #[error("degenerate window: start time {start} is not before end time {end}")]
    DegenerateWindow { start: f32, end: f32 },

    /// Too few samples to fit keys over
    #[error("not enough samples to fit a curve: got {count}, need at least 2")]
    NotEnoughSamples { count: usize },

    /// Control polygon below the minimum degree
    #[error("control polygon needs at least 2 points, got {count}")]
    ControlPolygonTooShort { count: usize },
}
