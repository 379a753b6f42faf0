//! Invariant-output tracking across a processor chain.
//!
//! Before a draw is compiled, the pipeline folds each fragment processor's
//! effect on the statically-known output color into an accumulator. Whatever
//! knowledge survives the whole chain (a known alpha, a constant channel)
//! unlocks blend and coverage shortcuts downstream.

use std::ops::BitOr;

/// Names the color channels whose values are statically known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMask(u8);

impl ChannelMask {
    pub const NONE: Self = Self(0);
    pub const R: Self = Self(1 << 0);
    pub const G: Self = Self(1 << 1);
    pub const B: Self = Self(1 << 2);
    pub const A: Self = Self(1 << 3);
    pub const RGBA: Self = Self(0b1111);

    /// Mask for channel `index`, with 0..=3 mapping to R, G, B, A.
    pub fn channel(index: usize) -> Self {
        Self(1 << index)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ChannelMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Accumulator for what is statically known about a draw's output color.
///
/// Processors only ever weaken the accumulated knowledge; a channel that
/// becomes unknown never becomes known again further down the chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvariantOutput {
    color: [f32; 4],
    valid: ChannelMask,
}

impl InvariantOutput {
    /// Starts the analysis from a color whose `valid` channels are known.
    pub fn new(color: [f32; 4], valid: ChannelMask) -> Self {
        Self { color, valid }
    }

    /// Starts with nothing known about the output.
    pub fn unknown() -> Self {
        Self::new([0.0; 4], ChannelMask::NONE)
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn valid_channels(&self) -> ChannelMask {
        self.valid
    }

    /// The processor output is an unknown linear combination of up to four
    /// components of its input. Nothing remains known.
    pub fn mul_by_unknown_four_components(&mut self) {
        self.valid = ChannelMask::NONE;
    }

    /// The output is the input scaled by one unknown factor in `[0, 1]`.
    /// A channel stays known only when its known value is zero.
    pub fn mul_by_unknown_single_component(&mut self) {
        let mut valid = ChannelMask::NONE;
        for (index, value) in self.color.iter().enumerate() {
            let channel = ChannelMask::channel(index);
            if self.valid.contains(channel) && *value == 0.0 {
                valid = valid | channel;
            }
        }
        self.valid = valid;
    }

    /// The output is the input scaled by a known factor. Known channels stay
    /// known with their values scaled.
    pub fn mul_by_known_single_component(&mut self, factor: f32) {
        for value in &mut self.color {
            *value *= factor;
        }
    }

    /// True when the alpha channel is known to be fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.valid.contains(ChannelMask::A) && self.color[3] >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::{ChannelMask, InvariantOutput};

    #[test]
    fn unknown_four_component_mul_clears_all_knowledge() {
        let mut inout = InvariantOutput::new([1.0, 1.0, 1.0, 1.0], ChannelMask::RGBA);
        assert!(inout.is_opaque());

        inout.mul_by_unknown_four_components();
        assert_eq!(inout.valid_channels(), ChannelMask::NONE);
        assert!(!inout.is_opaque());
    }

    #[test]
    fn unknown_single_component_mul_keeps_only_known_zero_channels() {
        let mut inout = InvariantOutput::new([0.0, 0.5, 0.0, 1.0], ChannelMask::RGBA);
        inout.mul_by_unknown_single_component();

        let valid = inout.valid_channels();
        assert!(valid.contains(ChannelMask::R));
        assert!(valid.contains(ChannelMask::B));
        assert!(!valid.contains(ChannelMask::G));
        assert!(!valid.contains(ChannelMask::A));
    }

    #[test]
    fn known_single_component_mul_scales_the_color_in_place() {
        let mut inout = InvariantOutput::new([0.5, 1.0, 0.25, 1.0], ChannelMask::RGBA);
        inout.mul_by_known_single_component(0.5);

        assert_eq!(inout.color(), [0.25, 0.5, 0.125, 0.5]);
        assert_eq!(inout.valid_channels(), ChannelMask::RGBA);
        assert!(!inout.is_opaque());
    }

    #[test]
    fn channel_masks_compose_with_bitor() {
        let mask = ChannelMask::R | ChannelMask::A;
        assert!(mask.contains(ChannelMask::R));
        assert!(mask.contains(ChannelMask::A));
        assert!(!mask.contains(ChannelMask::G));
        assert!(ChannelMask::NONE.is_empty());
    }
}
