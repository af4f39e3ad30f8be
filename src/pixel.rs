//! HD108 pixel descriptor and its wire encoding.
//!
//! One LED takes four big-endian 16-bit words on the wire:
//!
//! ```text
//! word0: 1 | red current (5) | green current (5) | blue current (5)
//! word1: red intensity
//! word2: green intensity
//! word3: blue intensity
//! ```
//!
//! The leading bit is the per-pixel start marker and is always set by the
//! encoder.

use smart_leds::RGB;

/// Bytes of one encoded pixel.
pub const FRAME_LEN: usize = 8;

/// Highest driving current level.
pub const MAX_CURRENT: u8 = 0x1F;

/// Start marker in the first word.
pub const START_BIT: u16 = 1 << 15;

const CURRENT_MASK: u16 = MAX_CURRENT as u16;
const RED_CURRENT_SHIFT: u16 = 10;
const GREEN_CURRENT_SHIFT: u16 = 5;

/// 16-bit RGB intensity.
pub type Rgb16 = RGB<u16>;

/// Per-channel driving current, 5 bits per channel.
pub type Current = RGB<u8>;

/// State of one LED.
///
/// Current levels above [`MAX_CURRENT`] are truncated to their low five bits
/// when encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub current: Current,
    pub color: Rgb16,
}

impl Pixel {
    pub const OFF: Self = Self::new(Current { r: 0, g: 0, b: 0 }, Rgb16 { r: 0, g: 0, b: 0 });

    pub const fn new(current: Current, color: Rgb16) -> Self {
        Self { current, color }
    }

    /// Pixel at full driving current on every channel.
    pub const fn from_rgb16(color: Rgb16) -> Self {
        let current = Current {
            r: MAX_CURRENT,
            g: MAX_CURRENT,
            b: MAX_CURRENT,
        };
        Self::new(current, color)
    }

    /// First wire word: start bit and the three current levels.
    pub const fn header(&self) -> u16 {
        START_BIT
            | (self.current.r as u16 & CURRENT_MASK) << RED_CURRENT_SHIFT
            | (self.current.g as u16 & CURRENT_MASK) << GREEN_CURRENT_SHIFT
            | (self.current.b as u16 & CURRENT_MASK)
    }

    /// Encode into the 8-byte wire frame.
    pub const fn encode(&self) -> [u8; FRAME_LEN] {
        let header = self.header().to_be_bytes();
        let red = self.color.r.to_be_bytes();
        let green = self.color.g.to_be_bytes();
        let blue = self.color.b.to_be_bytes();
        [
            header[0], header[1], red[0], red[1], green[0], green[1], blue[0], blue[1],
        ]
    }
}

impl From<Rgb16> for Pixel {
    fn from(color: Rgb16) -> Self {
        Self::from_rgb16(color)
    }
}

/// One encoded pixel as found in the transmit buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireFrame(pub [u8; FRAME_LEN]);

impl WireFrame {
    /// Read a frame from the start of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let frame: [u8; FRAME_LEN] = bytes.get(..FRAME_LEN)?.try_into().ok()?;
        Some(Self(frame))
    }

    fn word(&self, index: usize) -> u16 {
        u16::from_be_bytes([self.0[index * 2], self.0[index * 2 + 1]])
    }

    /// Whether the start marker is set.
    pub fn start_bit(&self) -> bool {
        self.word(0) & START_BIT != 0
    }

    /// Decode back into a descriptor, dropping the start marker.
    pub fn pixel(&self) -> Pixel {
        let header = self.word(0);
        let current = Current::new(
            ((header >> RED_CURRENT_SHIFT) & CURRENT_MASK) as u8,
            ((header >> GREEN_CURRENT_SHIFT) & CURRENT_MASK) as u8,
            (header & CURRENT_MASK) as u8,
        );
        Pixel::new(current, Rgb16::new(self.word(1), self.word(2), self.word(3)))
    }
}

impl From<&Pixel> for WireFrame {
    fn from(pixel: &Pixel) -> Self {
        Self(pixel.encode())
    }
}
