//! Driver facade: bring-up, pixel updates, refresh and teardown.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::buffer::{DmaAllocator, TxBuffer};
use crate::config::StripConfig;
use crate::error::{Error, Result, SetupStage, map_host_error};
use crate::frame_scheduler::{FaultStats, RefreshHandler, RefreshScheduler, SchedulerState, TickReport};
use crate::pixel::Pixel;
use crate::strip::StripContext;
use crate::timer::{PeriodicTimer, TimerGuard};
use crate::transport::{Transport, TransportBus};

/// A running HD108 strip.
///
/// Created by [`Driver::init`]. The platform timer dispatch (or a poll loop)
/// calls [`Driver::tick`] once per refresh period.
pub struct Driver<B, T, Tm, H>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
    T: Transport,
    Tm: PeriodicTimer,
    H: RefreshHandler,
{
    // Field order is drop order: timer, then transport, then buffer.
    timer: TimerGuard<Tm>,
    strip: StripContext<B, T>,
    scheduler: RefreshScheduler<H>,
}

/// Resources handed back by [`Driver::shutdown`].
pub struct Released<B, T, H> {
    pub transport: T,
    pub buffer: B,
    pub handler: H,
}

impl<B, T, Tm, H> Driver<B, T, Tm, H>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
    T: Transport,
    Tm: PeriodicTimer,
    H: RefreshHandler,
{
    /// Validate `config`, allocate the buffer, open the bus and start the
    /// refresh timer.
    ///
    /// Validation failures return before anything is acquired. A failure in a
    /// later step releases what was acquired so far, most recent first.
    pub fn init<A, Bus>(
        config: StripConfig<H>,
        allocator: &mut A,
        bus: &mut Bus,
        timer: Tm,
    ) -> Result<Self>
    where
        A: DmaAllocator<Buffer = B>,
        Bus: TransportBus<Transport = T>,
    {
        config.validate()?;
        let StripConfig {
            bus: bus_config,
            length,
            refresh,
            wait,
            handler,
        } = config;
        let handler = handler.ok_or(Error::InvalidParameter)?;

        let strip = StripContext::create(length, allocator, bus, &bus_config)?;

        let period = refresh.period();
        let timer = match TimerGuard::start(timer, period) {
            Ok(timer) => timer,
            Err(code) => {
                #[cfg(feature = "esp32-log")]
                println!("[Driver.init] refresh timer failed: {:?}, rolling back", code);
                let (transport, buffer) = strip.into_parts();
                drop(transport);
                drop(buffer);
                return Err(map_host_error(SetupStage::Timer, code));
            }
        };

        #[cfg(feature = "esp32-log")]
        println!(
            "[Driver.init] {} LEDs on bus {} at {} Hz",
            length,
            bus_config.bus,
            refresh.hz()
        );

        Ok(Self {
            timer,
            strip,
            scheduler: RefreshScheduler::new(handler, period, wait),
        })
    }

    /// Stage `pixel` at `index` for the next transmission.
    ///
    /// Takes `&mut self`, so it cannot overlap a tick. Code without access to
    /// the driver should go through a [`PixelChannel`](crate::PixelChannel).
    pub fn set_pixel(&mut self, index: u16, pixel: &Pixel) -> Result<()> {
        self.strip.set_pixel(index, pixel)
    }

    /// Run one refresh now.
    pub fn tick(&mut self) -> TickReport {
        self.tick_at(Instant::now())
    }

    /// Run one refresh, taking `now` as the current time.
    pub fn tick_at(&mut self, now: Instant) -> TickReport {
        self.scheduler.tick(&mut self.strip, now)
    }

    /// Number of LEDs.
    pub fn strip_length(&self) -> u16 {
        self.strip.strip_length()
    }

    /// Transmit buffer as it will go out on the next tick.
    pub fn buffer(&self) -> &TxBuffer<B> {
        self.strip.buffer()
    }

    /// Refresh period.
    pub fn period(&self) -> Duration {
        self.scheduler.period()
    }

    /// See [`SchedulerState`].
    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Transmission faults since init.
    pub fn faults(&self) -> FaultStats {
        self.scheduler.faults()
    }

    /// The refresh handler.
    pub fn handler(&self) -> &H {
        self.scheduler.handler()
    }

    /// Mutable access to the refresh handler between ticks.
    pub fn handler_mut(&mut self) -> &mut H {
        self.scheduler.handler_mut()
    }

    /// Stop the refresh timer and hand back the transport, the buffer memory
    /// and the handler.
    pub fn shutdown(self) -> Released<B, T, H> {
        let Self {
            timer,
            strip,
            scheduler,
        } = self;
        drop(timer);
        let (transport, buffer) = strip.into_parts();

        #[cfg(feature = "esp32-log")]
        println!("[Driver.shutdown] refresh stopped after {} frames", scheduler.frames());

        Released {
            transport,
            buffer,
            handler: scheduler.into_handler(),
        }
    }
}
