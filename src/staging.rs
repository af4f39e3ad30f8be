//! Applies queued pixel updates inside the refresh window.
//!
//! [`StagingHandler`] is a ready-made [`RefreshHandler`] for setups where
//! pixels are produced outside the tick (another task, an interrupt). Updates
//! sent through a [`PixelChannel`](crate::PixelChannel) are written to the
//! buffer only once the current transfer has completed, so they show up in
//! the next transmission and never tear the one in flight.

use crate::buffer::FrameWriter;
use crate::channel::PixelReceiver;
use crate::error::Error;
use crate::frame_scheduler::RefreshHandler;

/// What one drain did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StagingReport {
    /// Updates written to the buffer.
    pub applied: u16,
    /// Updates dropped because their index was past the end of the strip.
    pub rejected: u16,
}

/// Drains a pixel channel into the frame on every refresh.
pub struct StagingHandler<'a, const SIZE: usize> {
    updates: PixelReceiver<'a, SIZE>,
    last: StagingReport,
    faults: u32,
}

impl<'a, const SIZE: usize> StagingHandler<'a, SIZE> {
    pub const fn new(updates: PixelReceiver<'a, SIZE>) -> Self {
        Self {
            updates,
            last: StagingReport {
                applied: 0,
                rejected: 0,
            },
            faults: 0,
        }
    }

    /// Apply every queued update to `frame` (non-blocking).
    ///
    /// Updates for the same index are applied in order, so the latest wins.
    pub fn process_pending(&mut self, frame: &mut FrameWriter<'_>) -> StagingReport {
        let mut report = StagingReport::default();

        while let Some(update) = self.updates.try_receive() {
            match frame.set_pixel(update.index, &update.pixel) {
                Ok(()) => report.applied = report.applied.saturating_add(1),
                Err(_) => report.rejected = report.rejected.saturating_add(1),
            }
        }

        report
    }

    /// Result of the most recent refresh.
    pub fn last_report(&self) -> StagingReport {
        self.last
    }

    /// Transmission faults reported to this handler.
    pub fn faults(&self) -> u32 {
        self.faults
    }
}

impl<const SIZE: usize> RefreshHandler for StagingHandler<'_, SIZE> {
    fn on_refresh(&mut self, frame: &mut FrameWriter<'_>) {
        self.last = self.process_pending(frame);
    }

    fn on_fault(&mut self, _fault: Error) {
        self.faults = self.faults.saturating_add(1);
    }
}
