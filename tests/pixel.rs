mod tests {
    use hd108_driver::{Current, MAX_CURRENT, Pixel, Rgb16, WireFrame};

    #[test]
    fn test_encode_layout() {
        let pixel = Pixel::new(Current::new(31, 31, 31), Rgb16::new(0xFFFF, 0x0000, 0x0000));
        assert_eq!(pixel.encode(), [0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00]);

        let pixel = Pixel::new(Current::new(1, 2, 3), Rgb16::new(0x1234, 0x5678, 0x9ABC));
        // 1 | 00001 | 00010 | 00011
        assert_eq!(pixel.header(), 0b1_00001_00010_00011);
        assert_eq!(pixel.encode(), [0x84, 0x43, 0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC]);
    }

    #[test]
    fn test_round_trip() {
        let pixel = Pixel::new(Current::new(31, 31, 31), Rgb16::new(0xFFFF, 0x0000, 0x0000));
        let frame = WireFrame(pixel.encode());
        assert!(frame.start_bit());
        assert_eq!(frame.pixel(), pixel);
    }

    #[test]
    fn test_start_bit_always_set() {
        assert!(WireFrame(Pixel::OFF.encode()).start_bit());
        assert_eq!(Pixel::OFF.encode(), [0x80, 0, 0, 0, 0, 0, 0, 0]);
        assert!(WireFrame(Pixel::default().encode()).start_bit());
    }

    #[test]
    fn test_current_is_masked_to_five_bits() {
        let pixel = Pixel::new(Current::new(0xFF, 0, 0xFF), Rgb16::new(0, 0, 0));
        let decoded = WireFrame(pixel.encode()).pixel();
        assert_eq!(decoded.current, Current::new(MAX_CURRENT, 0, MAX_CURRENT));
        // Green stays untouched by the neighbouring fields.
        assert_eq!(pixel.header() >> 5 & 0x1F, 0);
    }

    #[test]
    fn test_from_rgb16_uses_full_current() {
        let pixel = Pixel::from(Rgb16::new(1, 2, 3));
        assert_eq!(pixel.current, Current::new(MAX_CURRENT, MAX_CURRENT, MAX_CURRENT));
        assert_eq!(pixel.color, Rgb16::new(1, 2, 3));
    }

    #[test]
    fn test_wire_frame_from_short_slice() {
        assert_eq!(WireFrame::from_slice(&[0x80, 0, 0]), None);
        assert!(WireFrame::from_slice(&[0x80, 0, 0, 0, 0, 0, 0, 0, 0xAA]).is_some());
    }
}
