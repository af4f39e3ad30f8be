//! [`Transport`] over any blocking `embedded-hal` SPI bus.
//!
//! The HAL owns pin routing, clock and DMA setup; this adapter only clocks
//! the transmit buffer out. Configure the bus in [`SPI_MODE`] at the clock
//! given in [`BusConfig::clock_speed_hz`].

use embassy_time::Instant;
use embedded_hal::spi::{MODE_3, Mode, SpiBus};

use crate::config::BusConfig;
use crate::error::{HostError, OpenError, SetupStage};
use crate::transport::{TransferError, Transport, TransportBus, WaitPolicy};

/// Clock idles high, data sampled on the rising edge.
pub const SPI_MODE: Mode = MODE_3;

/// Hands out its SPI bus to exactly one strip.
pub struct SpiBusOpener<S> {
    spi: Option<S>,
}

impl<S: SpiBus<u8>> SpiBusOpener<S> {
    pub const fn new(spi: S) -> Self {
        Self { spi: Some(spi) }
    }
}

impl<S: SpiBus<u8>> TransportBus for SpiBusOpener<S> {
    type Transport = SpiBusTransport<S>;

    fn open(
        &mut self,
        _config: &BusConfig,
        _max_transfer_len: usize,
    ) -> Result<Self::Transport, OpenError> {
        self.spi
            .take()
            .map(|spi| SpiBusTransport { spi })
            .ok_or(OpenError::new(SetupStage::Bus, HostError::InvalidState))
    }
}

/// Opened SPI transport.
pub struct SpiBusTransport<S> {
    spi: S,
}

impl<S> SpiBusTransport<S> {
    pub fn release(self) -> S {
        self.spi
    }
}

impl<S: SpiBus<u8>> Transport for SpiBusTransport<S> {
    /// Blocking write followed by a flush.
    ///
    /// A blocking bus cannot be interrupted, so a bounded wait only detects
    /// overruns: a transfer that took longer than the bound is reported as
    /// [`TransferError::Overrun`] after it completes.
    fn submit_and_wait(&mut self, bytes: &[u8], wait: WaitPolicy) -> Result<(), TransferError> {
        let started = Instant::now();
        self.spi.write(bytes).map_err(|_| TransferError::Bus)?;
        self.spi.flush().map_err(|_| TransferError::Bus)?;

        match wait {
            WaitPolicy::Bounded(limit) if started.elapsed() > limit => Err(TransferError::Overrun),
            _ => Ok(()),
        }
    }
}
