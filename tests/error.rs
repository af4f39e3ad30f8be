mod tests {
    use hd108_driver::error::{SETUP_ERROR_TABLE, map_host_error};
    use hd108_driver::{Error, HostError, OpenError, SetupStage};

    fn expected(stage: SetupStage, code: HostError) -> Error {
        match (stage, code) {
            (SetupStage::Bus, HostError::InvalidArgument) => Error::InvalidParameter,
            (SetupStage::Bus, HostError::InvalidState) => Error::TransportInUse,
            (SetupStage::Bus, HostError::NotFound) => Error::NoDmaChannel,
            (SetupStage::Bus, HostError::NoMemory) => Error::OutOfMemory,
            (SetupStage::Bus, HostError::Other(_)) => Error::Unknown,
            (SetupStage::Device, HostError::InvalidArgument) => Error::InvalidParameter,
            (SetupStage::Device, HostError::InvalidState) => Error::Unknown,
            (SetupStage::Device, HostError::NotFound) => Error::NoAvailableSlot,
            (SetupStage::Device, HostError::NoMemory) => Error::OutOfMemory,
            (SetupStage::Device, HostError::Other(_)) => Error::Unknown,
            (SetupStage::Timer, _) => Error::TimerCreateFailed,
        }
    }

    #[test]
    fn test_every_host_error_is_mapped() {
        for stage in SetupStage::ALL {
            for code in HostError::ALL {
                assert_eq!(
                    map_host_error(stage, code),
                    expected(stage, code),
                    "{stage:?} {code:?}"
                );
                assert_eq!(Error::from(OpenError::new(stage, code)), expected(stage, code));
            }
        }
    }

    #[test]
    fn test_unclassified_codes() {
        for raw in [i32::MIN, -1, 0, 0x103, i32::MAX] {
            assert_eq!(map_host_error(SetupStage::Bus, HostError::Other(raw)), Error::Unknown);
            assert_eq!(
                map_host_error(SetupStage::Timer, HostError::Other(raw)),
                Error::TimerCreateFailed
            );
        }
    }

    #[test]
    fn test_table_has_no_duplicate_keys() {
        for (i, (stage, code, _)) in SETUP_ERROR_TABLE.iter().enumerate() {
            let duplicates = SETUP_ERROR_TABLE[i + 1..]
                .iter()
                .filter(|(s, c, _)| s == stage && c == code)
                .count();
            assert_eq!(duplicates, 0, "{stage:?} {code:?}");
        }
    }

    #[test]
    fn test_status_codes() {
        let all = [
            Error::Unknown,
            Error::InvalidParameter,
            Error::TransportInUse,
            Error::NoDmaChannel,
            Error::OutOfMemory,
            Error::NoAvailableSlot,
            Error::LengthOutOfRange,
            Error::IndexOutOfRange,
            Error::InsufficientDataRate,
            Error::TimerCreateFailed,
            Error::Timeout,
            Error::TransferFailed,
        ];
        for (expected, err) in (1u8..).zip(all) {
            assert_eq!(err.code(), expected);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Error::IndexOutOfRange.to_string(), "pixel index out of range");
        assert_eq!(
            Error::InsufficientDataRate.to_string(),
            "clock speed too low for the refresh rate"
        );
    }
}
