mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use embedded_hal::delay::DelayNs;
    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
    use lcd_text_composer::{Align, Lcd};

    const ENABLE_BIT: u8 = 0b0000_0100;
    const BACKLIGHT_BIT: u8 = 0b0000_1000;
    const RS_BIT: u8 = 0b0000_0001;

    #[derive(Debug)]
    struct MockError;

    impl embedded_hal::i2c::Error for MockError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    /// Records every byte written to the expander. Clones share the log, so
    /// tests can inspect traffic while the driver owns the bus.
    #[derive(Clone, Default)]
    struct MockBus {
        writes: Rc<RefCell<Vec<(u8, u8)>>>,
    }

    impl MockBus {
        fn len(&self) -> usize {
            self.writes.borrow().len()
        }

        fn writes_from(&self, start: usize) -> Vec<(u8, u8)> {
            self.writes.borrow()[start..].to_vec()
        }
    }

    impl ErrorType for MockBus {
        type Error = MockError;
    }

    impl I2c for MockBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            for operation in operations {
                if let Operation::Write(bytes) = operation {
                    for &byte in bytes.iter() {
                        self.writes.borrow_mut().push((address, byte));
                    }
                }
            }
            Ok(())
        }
    }

    struct NoopDelay;

    impl DelayNs for NoopDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Reassemble the 8-bit bytes sent over the 4-bit interface.
    ///
    /// Every nibble goes out as three expander writes (set, enable high,
    /// enable low); two nibbles make one byte. Returns `(byte, is_data)`.
    fn decode(writes: &[(u8, u8)]) -> Vec<(u8, bool)> {
        assert_eq!(writes.len() % 6, 0, "writes come in whole bytes");
        writes
            .chunks(6)
            .map(|chunk| {
                let high = chunk[0].1;
                let low = chunk[3].1;
                assert_eq!(chunk[1].1, high | ENABLE_BIT);
                assert_eq!(chunk[2].1, high & !ENABLE_BIT);
                let byte = (high & 0xF0) | (low >> 4);
                (byte, high & RS_BIT != 0)
            })
            .collect()
    }

    fn data_bytes(decoded: &[(u8, bool)]) -> Vec<u8> {
        decoded
            .iter()
            .filter_map(|&(byte, is_data)| is_data.then_some(byte))
            .collect()
    }

    #[test]
    fn test_init_sequence() {
        let bus = MockBus::default();
        let _lcd = Lcd::new(bus.clone(), NoopDelay).init().unwrap();

        let decoded = decode(&bus.writes_from(0));
        let commands: Vec<u8> = decoded.iter().map(|&(byte, _)| byte).collect();
        // 4-bit handshake, function set, entry mode, display on, clear.
        assert_eq!(commands, vec![0x33, 0x32, 0x28, 0x06, 0x0C, 0x01]);
        assert!(decoded.iter().all(|&(_, is_data)| !is_data));
    }

    #[test]
    fn test_init_addresses_the_configured_device() {
        let bus = MockBus::default();
        let _lcd = Lcd::new(bus.clone(), NoopDelay).address(0x3F).init().unwrap();
        assert!(bus.writes_from(0).iter().all(|&(address, _)| address == 0x3F));
    }

    #[test]
    fn test_backlight_bit_rides_every_transfer() {
        let bus = MockBus::default();
        let _lcd = Lcd::new(bus.clone(), NoopDelay).init().unwrap();
        assert!(bus.writes_from(0).iter().all(|&(_, byte)| byte & BACKLIGHT_BIT != 0));

        let dark_bus = MockBus::default();
        let _lcd = Lcd::new(dark_bus.clone(), NoopDelay)
            .backlight(false)
            .init()
            .unwrap();
        assert!(dark_bus.writes_from(0).iter().all(|&(_, byte)| byte & BACKLIGHT_BIT == 0));
    }

    #[test]
    fn test_set_backlight_latches_new_state() {
        let bus = MockBus::default();
        let mut lcd = Lcd::new(bus.clone(), NoopDelay).init().unwrap();
        let before = bus.len();
        lcd.set_backlight(false).unwrap();

        // The toggle re-sends display control with the backlight bit low.
        let tail = bus.writes_from(before);
        assert!(tail.iter().all(|&(_, byte)| byte & BACKLIGHT_BIT == 0));
        assert_eq!(decode(&tail), vec![(0x0C, false)]);
    }

    #[test]
    fn test_text_pads_line_to_full_width() {
        let bus = MockBus::default();
        let mut lcd = Lcd::new(bus.clone(), NoopDelay).init().unwrap();
        let before = bus.len();
        lcd.text("AB", 1, Align::Left).unwrap();

        let decoded = decode(&bus.writes_from(before));
        // Cursor to line 1, then 16 data bytes.
        assert_eq!(decoded[0], (0x80, false));
        assert_eq!(data_bytes(&decoded), b"AB              ".to_vec());
    }

    #[test]
    fn test_text_alignment() {
        let bus = MockBus::default();
        let mut lcd = Lcd::new(bus.clone(), NoopDelay).init().unwrap();
        let before = bus.len();
        lcd.text("AB", 1, Align::Right).unwrap();
        let mid = bus.len();
        lcd.text("AB", 2, Align::Center).unwrap();

        let right = bus.writes_from(before);
        assert_eq!(
            data_bytes(&decode(&right[..mid - before])),
            b"              AB".to_vec()
        );
        assert_eq!(
            data_bytes(&decode(&bus.writes_from(mid))),
            b"       AB       ".to_vec()
        );
    }

    #[test]
    fn test_text_wraps_to_next_line_at_word_boundary() {
        let bus = MockBus::default();
        let mut lcd = Lcd::new(bus.clone(), NoopDelay).geometry(8, 2).init().unwrap();
        let before = bus.len();
        lcd.text("HELLO WORLD", 1, Align::Left).unwrap();

        let decoded = decode(&bus.writes_from(before));
        assert_eq!(decoded[0], (0x80, false));
        assert_eq!(decoded[9], (0xC0, false), "second chunk goes to line 2");
        assert_eq!(data_bytes(&decoded), b"HELLO   WORLD   ".to_vec());
    }

    #[test]
    fn test_wrap_stops_at_last_row() {
        let bus = MockBus::default();
        let mut lcd = Lcd::new(bus.clone(), NoopDelay).geometry(8, 1).init().unwrap();
        let before = bus.len();
        lcd.text("HELLO WORLD", 1, Align::Left).unwrap();

        // Only the first chunk fits; the rest is dropped.
        assert_eq!(
            data_bytes(&decode(&bus.writes_from(before))),
            b"HELLO   ".to_vec()
        );
    }

    #[test]
    fn test_clear_line_writes_spaces_and_returns_cursor() {
        let bus = MockBus::default();
        let mut lcd = Lcd::new(bus.clone(), NoopDelay).init().unwrap();
        let before = bus.len();
        lcd.clear_line(2).unwrap();

        let decoded = decode(&bus.writes_from(before));
        assert_eq!(decoded[0], (0xC0, false));
        assert_eq!(decoded[17], (0xC0, false), "cursor returns to line start");
        assert_eq!(data_bytes(&decoded), vec![b' '; 16]);
    }

    #[test]
    fn test_clear_line_ignores_invalid_line() {
        let bus = MockBus::default();
        let mut lcd = Lcd::new(bus.clone(), NoopDelay).init().unwrap();
        let before = bus.len();
        lcd.clear_line(3).unwrap();
        assert_eq!(bus.len(), before);
    }
}
