//! Serial transport seam.
//!
//! The driver needs two things from the platform: a way to open the bus for
//! the strip, and a blocking "send this buffer and wait" call. Closing the
//! transport is dropping its handle.

use embassy_time::Duration;

use crate::config::BusConfig;
use crate::error::{Error, OpenError};

/// How long a refresh may wait for its transfer to finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitPolicy {
    /// Block until the transport reports completion.
    #[default]
    Forever,
    /// Give up after the given time and report [`TransferError::Timeout`],
    /// or [`TransferError::Overrun`] if the transport can only tell after
    /// completion.
    Bounded(Duration),
}

/// Failure of a single transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferError {
    /// The transfer did not complete within [`WaitPolicy::Bounded`].
    ///
    /// It may still be in progress.
    Timeout,
    /// The transfer completed, but later than [`WaitPolicy::Bounded`]
    /// allows.
    Overrun,
    /// The transport completed the call but reported a failure.
    Bus,
}

impl From<TransferError> for Error {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Timeout | TransferError::Overrun => Error::Timeout,
            TransferError::Bus => Error::TransferFailed,
        }
    }
}

/// An opened bus, ready to clock out transmit buffers.
pub trait Transport {
    /// Send `bytes` as one transfer and wait for it to complete.
    fn submit_and_wait(&mut self, bytes: &[u8], wait: WaitPolicy) -> Result<(), TransferError>;
}

/// Opens a [`Transport`] for a strip.
pub trait TransportBus {
    type Transport: Transport;

    /// Bring up the bus and attach the strip to it.
    ///
    /// `max_transfer_len` is the size of the transmit buffer; the platform
    /// sizes its DMA descriptors from it.
    fn open(
        &mut self,
        config: &BusConfig,
        max_transfer_len: usize,
    ) -> Result<Self::Transport, OpenError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn submit_and_wait(&mut self, bytes: &[u8], wait: WaitPolicy) -> Result<(), TransferError> {
        (**self).submit_and_wait(bytes, wait)
    }
}
