//! Strip configuration and its validation.

use embassy_time::Duration;

use crate::buffer::buffer_len;
use crate::error::{Error, Result};
use crate::transport::WaitPolicy;
use crate::{MAX_CLOCK_SPEED_HZ, MAX_STRIP_LENGTH, MIN_STRIP_LENGTH};

/// Headroom required between the raw bit rate of a refresh and the bus clock.
const DATA_RATE_MARGIN: u64 = 2;

/// Supported refresh frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RefreshRate {
    Hz1 = 1,
    Hz2 = 2,
    Hz5 = 5,
    Hz10 = 10,
    Hz20 = 20,
    Hz24 = 24,
    Hz25 = 25,
    Hz30 = 30,
    Hz50 = 50,
    Hz60 = 60,
    Hz100 = 100,
    Hz120 = 120,
}

impl RefreshRate {
    pub const ALL: [Self; 12] = [
        Self::Hz1,
        Self::Hz2,
        Self::Hz5,
        Self::Hz10,
        Self::Hz20,
        Self::Hz24,
        Self::Hz25,
        Self::Hz30,
        Self::Hz50,
        Self::Hz60,
        Self::Hz100,
        Self::Hz120,
    ];

    pub const fn hz(self) -> u32 {
        self as u32
    }

    /// Timer period, truncated to whole microseconds.
    pub const fn period(self) -> Duration {
        Duration::from_micros(1_000_000 / self.hz() as u64)
    }

    pub fn from_hz(hz: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|rate| rate.hz() == hz)
            .ok_or(Error::InvalidParameter)
    }
}

impl TryFrom<u32> for RefreshRate {
    type Error = Error;

    fn try_from(hz: u32) -> Result<Self> {
        Self::from_hz(hz)
    }
}

/// Serial bus wiring for the strip.
///
/// The bus always runs in SPI mode 3 with no chip select; those are protocol
/// facts and not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Platform identifier of the serial host.
    pub bus: u8,
    /// Bus clock, at most [`MAX_CLOCK_SPEED_HZ`].
    pub clock_speed_hz: u32,
    pub data_pin: u8,
    pub clock_pin: u8,
}

/// Everything needed to bring up a strip.
#[derive(Debug, Clone)]
pub struct StripConfig<H> {
    pub bus: BusConfig,
    /// Number of LEDs, `1..=1024`.
    pub length: u16,
    pub refresh: RefreshRate,
    pub wait: WaitPolicy,
    /// Called after every transmission to stage the next frame.
    pub handler: Option<H>,
}

impl<H> StripConfig<H> {
    pub const fn new(bus: BusConfig, length: u16, refresh: RefreshRate, handler: H) -> Self {
        Self {
            bus,
            length,
            refresh,
            wait: WaitPolicy::Forever,
            handler: Some(handler),
        }
    }

    #[must_use]
    pub const fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    /// Check the configuration without touching any resource.
    ///
    /// Checks run in a fixed order and the first failure wins: length, clock
    /// ceiling, handler presence, data rate.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_STRIP_LENGTH..=MAX_STRIP_LENGTH).contains(&self.length) {
            return Err(Error::LengthOutOfRange);
        }
        if self.bus.clock_speed_hz > MAX_CLOCK_SPEED_HZ {
            return Err(Error::InvalidParameter);
        }
        if self.handler.is_none() {
            return Err(Error::InvalidParameter);
        }
        if required_data_rate(self.length, self.refresh) > u64::from(self.bus.clock_speed_hz) {
            return Err(Error::InsufficientDataRate);
        }
        Ok(())
    }
}

/// Bus clock (bits per second) needed to refresh `length` LEDs at `refresh`,
/// including the fixed safety margin.
pub const fn required_data_rate(length: u16, refresh: RefreshRate) -> u64 {
    buffer_len(length) as u64 * 8 * refresh.hz() as u64 * DATA_RATE_MARGIN
}
