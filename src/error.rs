//! Driver errors and the mapping from collaborator errors.
//!
//! Setup failures reported by the transport and the timer service arrive as a
//! [`HostError`] tagged with the [`SetupStage`] that produced it. The driver
//! translates them through [`SETUP_ERROR_TABLE`] instead of hand-written
//! matches, so the mapping can be inspected and tested as data.

use derive_more::{Display, Error};

/// Crate-wide result type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything the driver can report.
///
/// `Ok` of the status taxonomy is `Result::Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum Error {
    /// The collaborator reported something the table does not classify.
    #[display("unknown error")]
    Unknown,
    /// A configuration value is invalid or the refresh handler is missing.
    #[display("invalid parameter")]
    InvalidParameter,
    /// The serial host is already in use.
    #[display("transport already in use")]
    TransportInUse,
    /// No DMA channel left for the serial host.
    #[display("no DMA channel available")]
    NoDmaChannel,
    /// Buffer or collaborator memory could not be allocated.
    #[display("out of memory")]
    OutOfMemory,
    /// The serial host has no free device slot.
    #[display("no free device slot on the bus")]
    NoAvailableSlot,
    /// Strip length outside `1..=1024`.
    #[display("strip length out of range")]
    LengthOutOfRange,
    /// Pixel index past the end of the strip.
    #[display("pixel index out of range")]
    IndexOutOfRange,
    /// The clock is too slow for the strip length at the requested refresh rate.
    #[display("clock speed too low for the refresh rate")]
    InsufficientDataRate,
    /// The periodic timer could not be created or armed.
    #[display("refresh timer could not be started")]
    TimerCreateFailed,
    /// A transfer did not complete within the configured bound.
    #[display("transfer timed out")]
    Timeout,
    /// The transport reported a failed transfer.
    #[display("transfer failed")]
    TransferFailed,
}

impl Error {
    /// Numeric status code, `0` being reserved for success.
    ///
    /// Codes `1..=9` follow the HD108 low level driver status enumeration.
    pub const fn code(self) -> u8 {
        match self {
            Self::Unknown => 1,
            Self::InvalidParameter => 2,
            Self::TransportInUse => 3,
            Self::NoDmaChannel => 4,
            Self::OutOfMemory => 5,
            Self::NoAvailableSlot => 6,
            Self::LengthOutOfRange => 7,
            Self::IndexOutOfRange => 8,
            Self::InsufficientDataRate => 9,
            Self::TimerCreateFailed => 10,
            Self::Timeout => 11,
            Self::TransferFailed => 12,
        }
    }
}

/// Error codes returned by the transport and timer collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// A parameter passed to the collaborator was rejected.
    InvalidArgument,
    /// The collaborator is not in a state to serve the request (e.g. host busy).
    InvalidState,
    /// A hardware resource (DMA channel, device slot) was not found.
    NotFound,
    /// The collaborator ran out of memory.
    NoMemory,
    /// Any other raw code.
    Other(i32),
}

impl HostError {
    /// Every classified code, plus one representative unclassified code.
    pub const ALL: [Self; 5] = [
        Self::InvalidArgument,
        Self::InvalidState,
        Self::NotFound,
        Self::NoMemory,
        Self::Other(-1),
    ];
}

/// Setup step that produced a [`HostError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    /// Initialising the serial bus (pins, DMA channel).
    Bus,
    /// Attaching the strip as a device on the bus.
    Device,
    /// Creating or arming the periodic refresh timer.
    Timer,
}

impl SetupStage {
    pub const ALL: [Self; 3] = [Self::Bus, Self::Device, Self::Timer];

    /// Error used when the table has no entry for a code at this stage.
    const fn fallback(self) -> Error {
        match self {
            Self::Bus | Self::Device => Error::Unknown,
            Self::Timer => Error::TimerCreateFailed,
        }
    }
}

/// Collaborator error tagged with the stage it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenError {
    pub stage: SetupStage,
    pub code: HostError,
}

impl OpenError {
    pub const fn new(stage: SetupStage, code: HostError) -> Self {
        Self { stage, code }
    }
}

impl From<OpenError> for Error {
    fn from(err: OpenError) -> Self {
        map_host_error(err.stage, err.code)
    }
}

/// Classified `(stage, code) -> error` pairs. Anything missing maps to the
/// stage fallback.
pub const SETUP_ERROR_TABLE: [(SetupStage, HostError, Error); 7] = [
    (SetupStage::Bus, HostError::InvalidArgument, Error::InvalidParameter),
    (SetupStage::Bus, HostError::InvalidState, Error::TransportInUse),
    (SetupStage::Bus, HostError::NotFound, Error::NoDmaChannel),
    (SetupStage::Bus, HostError::NoMemory, Error::OutOfMemory),
    (SetupStage::Device, HostError::InvalidArgument, Error::InvalidParameter),
    (SetupStage::Device, HostError::NotFound, Error::NoAvailableSlot),
    (SetupStage::Device, HostError::NoMemory, Error::OutOfMemory),
];

/// Translate a collaborator error into a driver error.
pub fn map_host_error(stage: SetupStage, code: HostError) -> Error {
    SETUP_ERROR_TABLE
        .iter()
        .find(|(s, c, _)| *s == stage && *c == code)
        .map(|(_, _, err)| *err)
        .unwrap_or(stage.fallback())
}
