//! Transmit buffer and the DMA memory it lives in.
//!
//! The buffer is a zero preamble followed by one [`FRAME_LEN`] slot per LED.
//! It is sized once at creation and never resized; the preamble is only ever
//! written with zeros.

use heapless::Vec;

use crate::error::{Error, Result};
use crate::pixel::{FRAME_LEN, Pixel, WireFrame};
use crate::{MAX_STRIP_LENGTH, MIN_STRIP_LENGTH};

/// Zero bytes sent ahead of the first pixel on every refresh.
pub const PREAMBLE_LEN: usize = 16;

/// Buffer size needed for the longest supported strip.
pub const MAX_BUFFER_LEN: usize = buffer_len(MAX_STRIP_LENGTH);

/// Transmit buffer size for a strip of `length` LEDs.
pub const fn buffer_len(length: u16) -> usize {
    PREAMBLE_LEN + length as usize * FRAME_LEN
}

/// Allocation failure reported by a [`DmaAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl From<AllocError> for Error {
    fn from(_: AllocError) -> Self {
        Error::OutOfMemory
    }
}

/// Source of DMA-capable memory for the transmit buffer.
///
/// Memory is returned to the allocator when the buffer value is dropped.
pub trait DmaAllocator {
    type Buffer: AsRef<[u8]> + AsMut<[u8]>;

    /// Allocate `len` zeroed bytes.
    fn allocate_zeroed(&mut self, len: usize) -> core::result::Result<Self::Buffer, AllocError>;
}

/// Allocator backed by a fixed-capacity [`heapless::Vec`].
///
/// The caller is responsible for placing the resulting buffer in
/// DMA-reachable memory (e.g. a `static` in internal RAM).
#[derive(Debug, Default, Clone, Copy)]
pub struct HeaplessAllocator<const CAP: usize>;

/// Allocator able to hold any supported strip.
pub type StaticAllocator = HeaplessAllocator<MAX_BUFFER_LEN>;

impl<const CAP: usize> DmaAllocator for HeaplessAllocator<CAP> {
    type Buffer = Vec<u8, CAP>;

    fn allocate_zeroed(&mut self, len: usize) -> core::result::Result<Self::Buffer, AllocError> {
        let mut buffer = Vec::new();
        buffer.resize(len, 0).map_err(|()| AllocError)?;
        Ok(buffer)
    }
}

/// Owned transmit buffer for one strip.
pub struct TxBuffer<B> {
    memory: B,
    strip_length: u16,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> TxBuffer<B> {
    /// Wrap allocated memory for a strip of `strip_length` LEDs.
    ///
    /// The memory must be exactly [`buffer_len`] bytes long. It is zeroed here
    /// regardless of what the allocator promised.
    pub fn new(mut memory: B, strip_length: u16) -> Result<Self> {
        if !(MIN_STRIP_LENGTH..=MAX_STRIP_LENGTH).contains(&strip_length) {
            return Err(Error::LengthOutOfRange);
        }
        if memory.as_ref().len() != buffer_len(strip_length) {
            return Err(Error::InvalidParameter);
        }
        memory.as_mut().fill(0);
        Ok(Self {
            memory,
            strip_length,
        })
    }

    /// Number of LEDs.
    pub fn strip_length(&self) -> u16 {
        self.strip_length
    }

    /// Whole buffer as transmitted: preamble then every pixel frame.
    pub fn as_bytes(&self) -> &[u8] {
        self.memory.as_ref()
    }

    /// The zero prefix.
    pub fn preamble(&self) -> &[u8] {
        &self.as_bytes()[..PREAMBLE_LEN]
    }

    /// Encoded frame of the pixel at `index`.
    pub fn frame(&self, index: u16) -> Option<WireFrame> {
        if index >= self.strip_length {
            return None;
        }
        let offset = PREAMBLE_LEN + usize::from(index) * FRAME_LEN;
        WireFrame::from_slice(&self.as_bytes()[offset..])
    }

    /// Write access to the pixel area only.
    pub fn writer(&mut self) -> FrameWriter<'_> {
        FrameWriter {
            frames: &mut self.memory.as_mut()[PREAMBLE_LEN..],
        }
    }

    /// See [`FrameWriter::set_pixel`].
    pub fn set_pixel(&mut self, index: u16, pixel: &Pixel) -> Result<()> {
        self.writer().set_pixel(index, pixel)
    }

    /// Give the memory back to its owner.
    pub fn into_inner(self) -> B {
        self.memory
    }
}

/// Staging view over the pixel frames of a transmit buffer.
///
/// Handed to the refresh handler after each transmission. It cannot reach the
/// preamble, so the zero prefix stays intact whatever the handler does.
pub struct FrameWriter<'a> {
    frames: &'a mut [u8],
}

impl FrameWriter<'_> {
    /// Number of LEDs in the strip.
    pub fn len(&self) -> u16 {
        // The pixel area holds at most MAX_STRIP_LENGTH frames.
        (self.frames.len() / FRAME_LEN) as u16
    }

    /// Always false for a validated strip.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Encode `pixel` into slot `index`.
    ///
    /// Out-of-range indices leave the buffer untouched.
    pub fn set_pixel(&mut self, index: u16, pixel: &Pixel) -> Result<()> {
        if index >= self.len() {
            return Err(Error::IndexOutOfRange);
        }
        let offset = usize::from(index) * FRAME_LEN;
        self.frames[offset..offset + FRAME_LEN].copy_from_slice(&pixel.encode());
        Ok(())
    }

    /// Decoded pixel currently staged at `index`.
    pub fn pixel(&self, index: u16) -> Option<Pixel> {
        if index >= self.len() {
            return None;
        }
        let offset = usize::from(index) * FRAME_LEN;
        WireFrame::from_slice(&self.frames[offset..]).map(|frame| frame.pixel())
    }

    /// Set every LED to `pixel`.
    pub fn fill(&mut self, pixel: &Pixel) {
        let encoded = pixel.encode();
        for slot in self.frames.chunks_exact_mut(FRAME_LEN) {
            slot.copy_from_slice(&encoded);
        }
    }

    /// Turn every LED off. Frames keep their start marker.
    pub fn clear(&mut self) {
        self.fill(&Pixel::OFF);
    }

    /// Write consecutive pixels starting at index 0.
    ///
    /// Fails with [`Error::IndexOutOfRange`] once the iterator runs past the
    /// end of the strip; pixels written before that stay written.
    pub fn write_iter<I>(&mut self, pixels: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Pixel>,
    {
        let mut slots = self.frames.chunks_exact_mut(FRAME_LEN);
        for pixel in pixels {
            let slot = slots.next().ok_or(Error::IndexOutOfRange)?;
            slot.copy_from_slice(&pixel.into().encode());
        }
        Ok(())
    }
}
