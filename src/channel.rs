//! Pixel update queue shared between execution contexts.
//!
//! Code running outside the refresh tick must not touch the transmit buffer.
//! It posts [`PixelUpdate`]s here instead; the queue is drained inside the
//! tick, after the transfer has completed. Interrupt safe via critical
//! sections, backed by a fixed-size `heapless::Deque`.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::pixel::Pixel;

/// Request to set one LED in the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelUpdate {
    pub index: u16,
    pub pixel: Pixel,
}

impl PixelUpdate {
    /// Update for the LED at `index`.
    pub const fn new(index: u16, pixel: Pixel) -> Self {
        Self { index, pixel }
    }
}

/// Returned when the queue is full; carries the rejected update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull(pub PixelUpdate);

/// Bounded pixel update queue, usually placed in a `static`.
pub struct PixelChannel<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<PixelUpdate, SIZE>>>,
}

impl<const SIZE: usize> PixelChannel<SIZE> {
    /// Create an empty channel.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Handle for producers. Any number may coexist.
    pub const fn sender(&self) -> PixelSender<'_, SIZE> {
        PixelSender { channel: self }
    }

    /// Handle for the refresh side.
    pub const fn receiver(&self) -> PixelReceiver<'_, SIZE> {
        PixelReceiver { channel: self }
    }

    /// Queue `update` for the next refresh.
    ///
    /// Returns `Err(QueueFull(update))` if the channel is full.
    pub fn try_send(&self, update: PixelUpdate) -> Result<(), QueueFull> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(update).map_err(QueueFull)
        })
    }

    /// Take the oldest queued update, if any.
    pub fn try_receive(&self) -> Option<PixelUpdate> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    /// Number of updates waiting.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    /// Whether no update is waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for PixelChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle for a [`PixelChannel`].
///
/// A plain reference; copy it into every context that sets pixels.
#[derive(Clone, Copy)]
pub struct PixelSender<'a, const SIZE: usize> {
    channel: &'a PixelChannel<SIZE>,
}

impl<const SIZE: usize> PixelSender<'_, SIZE> {
    /// See [`PixelChannel::try_send`].
    pub fn try_send(&self, update: PixelUpdate) -> Result<(), QueueFull> {
        self.channel.try_send(update)
    }

    /// Shorthand for sending a [`PixelUpdate`].
    pub fn set_pixel(&self, index: u16, pixel: Pixel) -> Result<(), QueueFull> {
        self.try_send(PixelUpdate::new(index, pixel))
    }
}

/// Consumer handle for a [`PixelChannel`], normally owned by a
/// [`StagingHandler`](crate::StagingHandler).
#[derive(Clone, Copy)]
pub struct PixelReceiver<'a, const SIZE: usize> {
    channel: &'a PixelChannel<SIZE>,
}

impl<const SIZE: usize> PixelReceiver<'_, SIZE> {
    /// See [`PixelChannel::try_receive`].
    pub fn try_receive(&self) -> Option<PixelUpdate> {
        self.channel.try_receive()
    }
}
