//! Pixel depths
//!
//! The sample types an [`Img`](super::Img) can hold. Region detection reads
//! pixel values generically and reports them as `f64`, so every depth must
//! convert losslessly into `f64`.

use std::fmt::Debug;

/// Sample type of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Depth {
    /// 8-bit unsigned
    Depth8u,
    /// 16-bit signed
    Depth16s,
    /// 32-bit signed
    Depth32s,
    /// 32-bit float
    Depth32f,
    /// 64-bit float
    Depth64f,
}

impl Depth {
    /// Size of one sample in bytes.
    pub fn bytes(self) -> usize {
        match self {
            Depth::Depth8u => 1,
            Depth::Depth16s => 2,
            Depth::Depth32s | Depth::Depth32f => 4,
            Depth::Depth64f => 8,
        }
    }
}

/// A scalar pixel value.
pub trait Pixel: Copy + PartialEq + PartialOrd + Default + Debug + Into<f64> + 'static {
    /// Depth tag of this sample type
    const DEPTH: Depth;
}

impl Pixel for u8 {
    const DEPTH: Depth = Depth::Depth8u;
}

impl Pixel for i16 {
    const DEPTH: Depth = Depth::Depth16s;
}

impl Pixel for i32 {
    const DEPTH: Depth = Depth::Depth32s;
}

impl Pixel for f32 {
    const DEPTH: Depth = Depth::Depth32f;
}

impl Pixel for f64 {
    const DEPTH: Depth = Depth::Depth64f;
}
