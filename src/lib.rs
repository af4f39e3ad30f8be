#![no_std]

//! Low level driver for HD108 LED strips on a DMA-backed serial bus.
//!
//! The driver keeps one transmit buffer per strip (a zero preamble followed by
//! an 8-byte frame per LED), sends it once per refresh period, and then hands
//! it to a [`RefreshHandler`] to stage the next frame.

pub mod buffer;
pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod frame_scheduler;
pub mod pixel;
pub mod spi;
pub mod staging;
pub mod strip;
pub mod timer;
pub mod transport;

pub use buffer::{
    DmaAllocator, FrameWriter, HeaplessAllocator, PREAMBLE_LEN, StaticAllocator, TxBuffer,
    buffer_len,
};
pub use channel::{PixelChannel, PixelReceiver, PixelSender, PixelUpdate, QueueFull};
pub use config::{BusConfig, RefreshRate, StripConfig, required_data_rate};
pub use driver::{Driver, Released};
pub use error::{Error, HostError, OpenError, Result, SetupStage};
pub use frame_scheduler::{FaultStats, RefreshHandler, RefreshScheduler, SchedulerState, TickReport};
pub use pixel::{Current, FRAME_LEN, MAX_CURRENT, Pixel, Rgb16, WireFrame};
pub use spi::{SPI_MODE, SpiBusOpener, SpiBusTransport};
pub use staging::{StagingHandler, StagingReport};
pub use strip::StripContext;
pub use timer::PeriodicTimer;
pub use transport::{TransferError, Transport, TransportBus, WaitPolicy};

pub use embassy_time::{Duration, Instant};

/// Shortest supported strip.
pub const MIN_STRIP_LENGTH: u16 = 1;

/// Longest supported strip, per the HD108 data sheet.
pub const MAX_STRIP_LENGTH: u16 = 1024;

/// Fastest bus clock the strip accepts (40 MHz).
pub const MAX_CLOCK_SPEED_HZ: u32 = 40_000_000;
