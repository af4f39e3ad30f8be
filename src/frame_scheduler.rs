//! Refresh tick: transmit, wait, then let the handler stage the next frame.
//!
//! The scheduler does not own a timer. Each call to
//! [`RefreshScheduler::tick`] is one refresh, fired either by the platform
//! timer dispatch or by a poll loop that sleeps for
//! [`TickReport::sleep_duration`] between calls.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::buffer::FrameWriter;
use crate::error::Error;
use crate::strip::StripContext;
use crate::transport::{TransferError, Transport, WaitPolicy};

/// User code run after every transmission.
///
/// Closures taking a [`FrameWriter`] implement this trait.
pub trait RefreshHandler {
    /// Stage the next frame. Runs on the tick context, keep it short.
    fn on_refresh(&mut self, frame: &mut FrameWriter<'_>);

    /// A transmission failed. Ticking continues regardless.
    fn on_fault(&mut self, _fault: Error) {}
}

impl<F> RefreshHandler for F
where
    F: FnMut(&mut FrameWriter<'_>),
{
    fn on_refresh(&mut self, frame: &mut FrameWriter<'_>) {
        self(frame);
    }
}

/// Transfer state between ticks.
///
/// A tick holds `&mut` on the scheduler, so from the outside the state only
/// stays [`SchedulerState::Transmitting`] when the last transfer timed out and
/// may still be reading the buffer. Writes made in that state can tear the
/// frame on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No transfer in flight, the buffer is free to stage.
    Idle,
    /// Buffer handed to the transport and not known to be released.
    Transmitting,
}

/// Transmission failures seen since start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultStats {
    pub count: u32,
    pub last: Option<Error>,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickReport {
    /// Sequence number of the transmitted frame, starting at 0.
    pub frame: u32,
    /// Transmission failure of this tick, if any.
    pub fault: Option<Error>,
    /// When the next tick is due.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (zero if behind schedule).
    pub sleep_duration: Duration,
}

/// Periodic transmit driver for one strip.
pub struct RefreshScheduler<H> {
    handler: H,
    period: Duration,
    wait: WaitPolicy,
    state: SchedulerState,
    frame: u32,
    faults: FaultStats,
    next_frame: Instant,
}

impl<H: RefreshHandler> RefreshScheduler<H> {
    pub fn new(handler: H, period: Duration, wait: WaitPolicy) -> Self {
        Self {
            handler,
            period,
            wait,
            state: SchedulerState::Idle,
            frame: 0,
            faults: FaultStats::default(),
            next_frame: Instant::from_ticks(0),
        }
    }

    /// Run one refresh against `strip`.
    ///
    /// 1. Submits the whole transmit buffer and waits per the [`WaitPolicy`].
    /// 2. Calls the handler so it can stage the next frame. Skipped after
    ///    [`TransferError::Timeout`], since the transfer may still be reading
    ///    the buffer. A completed but late transfer
    ///    ([`TransferError::Overrun`]) is reported and the handler still runs.
    /// 3. Returns timing for the next tick.
    pub fn tick<B, T>(&mut self, strip: &mut StripContext<B, T>, now: Instant) -> TickReport
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
        T: Transport,
    {
        // More than two periods late: drop the backlog instead of bursting.
        if now > self.next_frame + self.period * 2 {
            self.next_frame = now;
        }

        self.state = SchedulerState::Transmitting;
        let (buffer, transport) = strip.split();
        let result = transport.submit_and_wait(buffer.as_bytes(), self.wait);
        let in_flight = result == Err(TransferError::Timeout);
        if !in_flight {
            self.state = SchedulerState::Idle;
        }

        let fault = result.err().map(Error::from);
        if let Some(fault) = fault {
            #[cfg(feature = "esp32-log")]
            println!("[RefreshScheduler.tick] frame {} failed: {}", self.frame, fault);
            self.faults.count = self.faults.count.saturating_add(1);
            self.faults.last = Some(fault);
            self.handler.on_fault(fault);
        }

        if !in_flight {
            self.handler.on_refresh(&mut buffer.writer());
        }

        let frame = self.frame;
        self.frame = self.frame.wrapping_add(1);
        self.next_frame += self.period;

        TickReport {
            frame,
            fault,
            next_deadline: self.next_frame,
            sleep_duration: self.next_frame.saturating_duration_since(now),
        }
    }

    /// See [`SchedulerState`].
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Refresh period.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Transmission faults since start.
    pub fn faults(&self) -> FaultStats {
        self.faults
    }

    /// Number of ticks run so far.
    pub fn frames(&self) -> u32 {
        self.frame
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the scheduler, keeping the handler.
    pub fn into_handler(self) -> H {
        self.handler
    }
}
