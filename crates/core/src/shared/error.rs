//! Typed errors for session configuration and per-frame processing.

/// Errors the retouch pipeline reports to callers.
///
/// Numeric range violations inside stages are handled by clamping and never
/// surface here; a landmark sub-region with too few points degrades
/// gracefully in the mask builder rather than failing the frame.
#[derive(Debug, thiserror::Error)]
pub enum RetouchError {
    /// A configuration value fell outside its documented range.
    /// Raised once when the session is built, never per frame.
    #[error("configuration `{name}` = {value} is outside {min}..={max}")]
    ConfigOutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    /// A frame's dimensions disagree with the session's established size.
    /// The frame is rejected; it is never silently resampled.
    #[error("frame is {got_width}x{got_height} but the session expects {want_width}x{want_height}")]
    DimensionMismatch {
        want_width: u32,
        want_height: u32,
        got_width: u32,
        got_height: u32,
    },

    /// The region table references a landmark index the configured detector
    /// never produces. Caught when the session is built.
    #[error("region `{region}` references landmark {index} but the detector provides {available}")]
    RegionIndexOutOfBounds {
        region: &'static str,
        index: usize,
        available: usize,
    },
}
