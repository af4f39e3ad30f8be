#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use hd108_driver::{
    BusConfig, DmaAllocator, Duration, Error, FrameWriter, HostError, OpenError, PeriodicTimer,
    Pixel, RefreshHandler, TransferError, Transport, TransportBus, WaitPolicy,
    buffer::AllocError,
};

/// Observable side effects of the mock collaborators, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Allocated(usize),
    BufferReleased,
    Opened { max_transfer_len: usize },
    TransportClosed,
    TimerStarted(Duration),
    TimerStopped,
    Transmitted(Vec<u8>),
    Refreshed,
    Fault(Error),
}

#[derive(Clone, Default)]
pub(crate) struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub(crate) fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub(crate) fn transmissions(&self) -> Vec<Vec<u8>> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Transmitted(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

pub(crate) struct TrackedBuffer {
    bytes: Vec<u8>,
    live: Rc<Cell<usize>>,
    log: Log,
}

impl AsRef<[u8]> for TrackedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsMut<[u8]> for TrackedBuffer {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Drop for TrackedBuffer {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
        self.log.push(Event::BufferReleased);
    }
}

/// Allocator counting live buffers.
pub(crate) struct CountingAllocator {
    pub(crate) live: Rc<Cell<usize>>,
    pub(crate) allocations: usize,
    pub(crate) fail: bool,
    log: Log,
}

impl CountingAllocator {
    pub(crate) fn new(log: &Log) -> Self {
        Self {
            live: Rc::default(),
            allocations: 0,
            fail: false,
            log: log.clone(),
        }
    }

    pub(crate) fn live(&self) -> usize {
        self.live.get()
    }
}

impl DmaAllocator for CountingAllocator {
    type Buffer = TrackedBuffer;

    fn allocate_zeroed(&mut self, len: usize) -> Result<Self::Buffer, AllocError> {
        if self.fail {
            return Err(AllocError);
        }
        self.allocations += 1;
        self.live.set(self.live.get() + 1);
        self.log.push(Event::Allocated(len));
        Ok(TrackedBuffer {
            bytes: vec![0; len],
            live: self.live.clone(),
            log: self.log.clone(),
        })
    }
}

/// Transport replaying scripted transfer results (default `Ok`).
pub(crate) struct MockTransport {
    script: Rc<RefCell<VecDeque<Result<(), TransferError>>>>,
    pub(crate) waits: Rc<RefCell<Vec<WaitPolicy>>>,
    log: Log,
}

impl Transport for MockTransport {
    fn submit_and_wait(&mut self, bytes: &[u8], wait: WaitPolicy) -> Result<(), TransferError> {
        self.log.push(Event::Transmitted(bytes.to_vec()));
        self.waits.borrow_mut().push(wait);
        self.script.borrow_mut().pop_front().unwrap_or(Ok(()))
    }
}

impl Drop for MockTransport {
    fn drop(&mut self) {
        self.log.push(Event::TransportClosed);
    }
}

pub(crate) struct MockBus {
    pub(crate) fail: Option<OpenError>,
    pub(crate) script: Rc<RefCell<VecDeque<Result<(), TransferError>>>>,
    pub(crate) waits: Rc<RefCell<Vec<WaitPolicy>>>,
    pub(crate) opened_with: Option<BusConfig>,
    log: Log,
}

impl MockBus {
    pub(crate) fn new(log: &Log) -> Self {
        Self {
            fail: None,
            script: Rc::default(),
            waits: Rc::default(),
            opened_with: None,
            log: log.clone(),
        }
    }

    pub(crate) fn failing(log: &Log, err: OpenError) -> Self {
        let mut bus = Self::new(log);
        bus.fail = Some(err);
        bus
    }

    pub(crate) fn queue_result(&self, result: Result<(), TransferError>) {
        self.script.borrow_mut().push_back(result);
    }
}

impl TransportBus for MockBus {
    type Transport = MockTransport;

    fn open(
        &mut self,
        config: &BusConfig,
        max_transfer_len: usize,
    ) -> Result<Self::Transport, OpenError> {
        if let Some(err) = self.fail {
            return Err(err);
        }
        self.opened_with = Some(*config);
        self.log.push(Event::Opened { max_transfer_len });
        Ok(MockTransport {
            script: self.script.clone(),
            waits: self.waits.clone(),
            log: self.log.clone(),
        })
    }
}

pub(crate) struct MockTimer {
    pub(crate) fail: Option<HostError>,
    log: Log,
}

impl MockTimer {
    pub(crate) fn new(log: &Log) -> Self {
        Self {
            fail: None,
            log: log.clone(),
        }
    }

    pub(crate) fn failing(log: &Log, code: HostError) -> Self {
        Self {
            fail: Some(code),
            log: log.clone(),
        }
    }
}

impl PeriodicTimer for MockTimer {
    fn start_periodic(&mut self, period: Duration) -> Result<(), HostError> {
        if let Some(code) = self.fail {
            return Err(code);
        }
        self.log.push(Event::TimerStarted(period));
        Ok(())
    }

    fn stop(&mut self) {
        self.log.push(Event::TimerStopped);
    }
}

/// Handler logging every call and staging queued writes on refresh.
pub(crate) struct Recorder {
    pub(crate) pending: Rc<RefCell<Vec<(u16, Pixel)>>>,
    pub(crate) faults: Vec<Error>,
    log: Log,
}

impl Recorder {
    pub(crate) fn new(log: &Log) -> Self {
        Self {
            pending: Rc::default(),
            faults: Vec::new(),
            log: log.clone(),
        }
    }
}

impl RefreshHandler for Recorder {
    fn on_refresh(&mut self, frame: &mut FrameWriter<'_>) {
        self.log.push(Event::Refreshed);
        for (index, pixel) in self.pending.borrow_mut().drain(..) {
            frame.set_pixel(index, &pixel).unwrap();
        }
    }

    fn on_fault(&mut self, fault: Error) {
        self.log.push(Event::Fault(fault));
        self.faults.push(fault);
    }
}

pub(crate) const fn bus_config(clock_speed_hz: u32) -> BusConfig {
    BusConfig {
        bus: 2,
        clock_speed_hz,
        data_pin: 23,
        clock_pin: 18,
    }
}

/// Force closure signatures to be generic over the writer lifetime.
pub(crate) fn handler<F: FnMut(&mut FrameWriter<'_>)>(f: F) -> F {
    f
}

pub(crate) type NoHandler = fn(&mut FrameWriter<'_>);

pub(crate) fn noop(_frame: &mut FrameWriter<'_>) {}
