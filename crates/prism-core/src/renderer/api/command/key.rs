// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Ready-made sort keys for [`CommandBucket`](super::CommandBucket).

/// A plain pass priority. Lower values are submitted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PassKey(pub u32);

const DEPTH_BITS: u32 = 24;
const DEPTH_MASK: u64 = (1 << DEPTH_BITS) - 1;
const LAYER_SHIFT: u32 = 56;

/// A packed 64-bit draw key.
///
/// The layer always occupies the top byte, so layers are submitted in ascending order.
/// Below it, [`opaque`](Self::opaque) keys sort by pipeline, then material, then
/// front-to-back depth, which minimises state changes. [`translucent`](Self::translucent)
/// keys sort back-to-front by depth first, which blending requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DrawKey(u64);

impl DrawKey {
    /// The largest depth value a key can hold.
    pub const MAX_DEPTH: u32 = DEPTH_MASK as u32;

    /// `layer | pipeline | material | depth`. Depth is truncated to 24 bits.
    pub const fn opaque(layer: u8, pipeline: u16, material: u16, depth: u32) -> Self {
        Self(
            (layer as u64) << LAYER_SHIFT
                | (pipeline as u64) << 40
                | (material as u64) << 24
                | (depth as u64 & DEPTH_MASK),
        )
    }

    /// `layer | inverted depth | pipeline | material`. Depth is truncated to 24 bits; the
    /// farthest draw gets the smallest key.
    pub const fn translucent(layer: u8, pipeline: u16, material: u16, depth: u32) -> Self {
        let inverted = DEPTH_MASK - (depth as u64 & DEPTH_MASK);
        Self(
            (layer as u64) << LAYER_SHIFT
                | inverted << 32
                | (pipeline as u64) << 16
                | material as u64,
        )
    }

    /// Maps a normalized depth in `[0, 1]` onto the 24 bits a key holds. Values outside
    /// the range are clamped; NaN maps to 0.
    pub fn quantize_depth(depth: f32) -> u32 {
        let clamped = if depth.is_nan() { 0.0 } else { depth.clamp(0.0, 1.0) };
        (clamped as f64 * Self::MAX_DEPTH as f64).round() as u32
    }

    /// The packed value.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The layer in the top byte.
    pub const fn layer(self) -> u8 {
        (self.0 >> LAYER_SHIFT) as u8
    }
}

impl From<DrawKey> for u64 {
    fn from(key: DrawKey) -> Self {
        key.0
    }
}
