use std::ops::RangeInclusive;

use serde::Deserialize;

use crate::shared::error::RetouchError;

pub const SMOOTHNESS_RADIUS_RANGE: RangeInclusive<u32> = 20..=40;
pub const TEXTURE_PRESERVE_RANGE: RangeInclusive<u32> = 40..=70;
pub const SHINE_REDUCTION_RANGE: RangeInclusive<u32> = 15..=35;
pub const TONE_EVENNESS_RANGE: RangeInclusive<u32> = 10..=25;
pub const EYE_LIP_PROTECT_RANGE: RangeInclusive<u32> = 70..=95;
pub const AMOUNT_RANGE: RangeInclusive<u32> = 45..=75;
/// 6..=16 is the usable band; 0 disables grain entirely.
pub const GRAIN_RANGE: RangeInclusive<u32> = 0..=16;

/// Session-wide retouch parameters, fixed for the life of a session.
///
/// Values use the integer scales exposed to users; each stage derives its own
/// floating-point coefficients from them. Validation happens once, when the
/// session is built, so per-frame code never revisits ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetouchConfig {
    /// Edge-aware smoothing strength. Capped so oversized kernels cannot
    /// push the result into the out-of-focus look.
    pub smoothness_radius: u32,
    /// High-pass detail gain: higher keeps more pore-level texture.
    pub texture_preserve: u32,
    /// Specular highlight compression strength.
    pub shine_reduction: u32,
    /// Local tonal-variance pull strength.
    pub tone_evenness: u32,
    /// How strongly retouching is suppressed over eyes and lips.
    pub eye_lip_protect: u32,
    /// Global wet/dry mix toward the processed result.
    pub amount: u32,
    /// Synthetic grain strength inside skin regions.
    pub grain: u32,
}

impl Default for RetouchConfig {
    fn default() -> Self {
        Self {
            smoothness_radius: 30,
            texture_preserve: 60,
            shine_reduction: 25,
            tone_evenness: 15,
            eye_lip_protect: 85,
            amount: 60,
            grain: 10,
        }
    }
}

impl RetouchConfig {
    /// Checks every parameter against its documented range.
    pub fn validate(&self) -> Result<(), RetouchError> {
        check("smoothness_radius", self.smoothness_radius, SMOOTHNESS_RADIUS_RANGE)?;
        check("texture_preserve", self.texture_preserve, TEXTURE_PRESERVE_RANGE)?;
        check("shine_reduction", self.shine_reduction, SHINE_REDUCTION_RANGE)?;
        check("tone_evenness", self.tone_evenness, TONE_EVENNESS_RANGE)?;
        check("eye_lip_protect", self.eye_lip_protect, EYE_LIP_PROTECT_RANGE)?;
        check("amount", self.amount, AMOUNT_RANGE)?;
        check("grain", self.grain, GRAIN_RANGE)?;
        Ok(())
    }
}

fn check(
    name: &'static str,
    value: u32,
    range: RangeInclusive<u32>,
) -> Result<(), RetouchError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(RetouchError::ConfigOutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}
