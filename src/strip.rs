//! Strip context: the transmit buffer and the transport that clocks it out.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::buffer::{DmaAllocator, TxBuffer, buffer_len};
use crate::config::BusConfig;
use crate::error::{Error, Result};
use crate::pixel::Pixel;
use crate::transport::{Transport, TransportBus, WaitPolicy};

/// One strip on one bus.
///
/// Owns its buffer and transport exclusively. Neither can be resized or
/// swapped after creation. Dropping the context closes the transport before
/// the buffer is released.
pub struct StripContext<B, T> {
    transport: T,
    buffer: TxBuffer<B>,
}

impl<B, T> StripContext<B, T>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
    T: Transport,
{
    /// Allocate the transmit buffer and open the transport.
    ///
    /// If the transport cannot be opened the buffer is released before the
    /// error is returned.
    pub fn create<A, Bus>(
        length: u16,
        allocator: &mut A,
        bus: &mut Bus,
        bus_config: &BusConfig,
    ) -> Result<Self>
    where
        A: DmaAllocator<Buffer = B>,
        Bus: TransportBus<Transport = T>,
    {
        let len = buffer_len(length);
        let buffer = TxBuffer::new(allocator.allocate_zeroed(len)?, length)?;

        let transport = match bus.open(bus_config, len) {
            Ok(transport) => transport,
            Err(err) => {
                #[cfg(feature = "esp32-log")]
                println!("[StripContext.create] opening bus {} failed: {:?}", bus_config.bus, err);
                drop(buffer);
                return Err(Error::from(err));
            }
        };

        Ok(Self { transport, buffer })
    }

    /// Number of LEDs.
    pub fn strip_length(&self) -> u16 {
        self.buffer.strip_length()
    }

    /// The transmit buffer.
    pub fn buffer(&self) -> &TxBuffer<B> {
        &self.buffer
    }

    /// Stage `pixel` at `index`. Must not be called while a transfer is in flight.
    pub fn set_pixel(&mut self, index: u16, pixel: &Pixel) -> Result<()> {
        self.buffer.set_pixel(index, pixel)
    }

    /// Send the current buffer outside of the refresh schedule.
    pub fn transmit(&mut self, wait: WaitPolicy) -> Result<()> {
        self.transport
            .submit_and_wait(self.buffer.as_bytes(), wait)
            .map_err(Error::from)
    }

    /// Borrow the buffer and the transport at the same time.
    pub(crate) fn split(&mut self) -> (&mut TxBuffer<B>, &mut T) {
        (&mut self.buffer, &mut self.transport)
    }

    /// Take the context apart for teardown: the transport first, then the
    /// buffer memory, which is the order they should be released in.
    pub fn into_parts(self) -> (T, B) {
        (self.transport, self.buffer.into_inner())
    }
}
