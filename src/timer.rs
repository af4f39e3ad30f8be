//! Periodic timer seam.

use embassy_time::Duration;

use crate::error::HostError;

/// Platform timer that paces refresh ticks.
///
/// [`Driver::init`](crate::Driver::init) starts the timer before the driver
/// value exists, so the timer cannot call into the driver itself. Its
/// dispatch should only signal that a refresh is due; whoever owns the
/// [`Driver`](crate::Driver) then calls [`Driver::tick`](crate::Driver::tick).
///
/// ```no_run
/// use core::sync::atomic::{AtomicBool, Ordering};
///
/// use hd108_driver::{
///     BusConfig, Driver, Duration, FrameWriter, HostError, PeriodicTimer, Pixel, RefreshRate,
///     StaticAllocator, StripConfig, TransportBus,
/// };
///
/// static REFRESH_DUE: AtomicBool = AtomicBool::new(false);
///
/// /// Hardware timer whose interrupt stores `true` into `REFRESH_DUE`.
/// struct FlagTimer;
///
/// impl PeriodicTimer for FlagTimer {
///     fn start_periodic(&mut self, _period: Duration) -> Result<(), HostError> {
///         // Arm the alarm here.
///         Ok(())
///     }
///
///     fn stop(&mut self) {}
/// }
///
/// fn run<Bus: TransportBus>(bus: &mut Bus) -> hd108_driver::Result<()> {
///     let wiring = BusConfig {
///         bus: 2,
///         clock_speed_hz: 20_000_000,
///         data_pin: 23,
///         clock_pin: 18,
///     };
///     let config = StripConfig::new(wiring, 60, RefreshRate::Hz60, |frame: &mut FrameWriter<'_>| {
///         frame.fill(&Pixel::OFF);
///     });
///     let mut allocator = StaticAllocator::default();
///     let mut driver = Driver::init(config, &mut allocator, bus, FlagTimer)?;
///
///     loop {
///         if REFRESH_DUE.swap(false, Ordering::AcqRel) {
///             driver.tick();
///         }
///     }
/// }
/// ```
pub trait PeriodicTimer {
    /// Create and arm the timer.
    fn start_periodic(&mut self, period: Duration) -> Result<(), HostError>;

    /// Disarm the timer. Must be safe to call on a stopped timer.
    fn stop(&mut self);
}

/// Running timer, stopped when dropped.
pub(crate) struct TimerGuard<T: PeriodicTimer> {
    timer: T,
}

impl<T: PeriodicTimer> TimerGuard<T> {
    pub(crate) fn start(mut timer: T, period: Duration) -> Result<Self, HostError> {
        timer.start_periodic(period)?;
        Ok(Self { timer })
    }
}

impl<T: PeriodicTimer> Drop for TimerGuard<T> {
    fn drop(&mut self) {
        self.timer.stop();
    }
}
