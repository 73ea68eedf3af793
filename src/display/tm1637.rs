//! Bit-banged TM1637 driver.
//!
//! The TM1637 speaks a two-wire, I²C-like protocol without addressing:
//!
//! ```text
//! start : CLK high, DIO high→low, CLK low
//! byte  : 8 × (CLK low, DIO = bit, CLK high), LSB first
//! ack   : CLK low, DIO high, CLK high, DIO released; controller pulls DIO low
//! stop  : CLK low, DIO low, CLK high, DIO high
//! ```
//!
//! Every display update is three framed commands: data command,
//! address + segment bytes, display control (on/off + brightness).
//! Each command runs inside a critical section so the tick interrupt
//! cannot split it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use super::segments::{Frame, DIGIT_COUNT};
use super::SegmentDisplay;
use crate::config::BIT_DELAY_US;
use crate::error::Error;

/// Data command: write, auto-increment address.
const CMD_ADDR_AUTO: u8 = 0x40;
/// Data command: write, fixed address.
const CMD_ADDR_FIXED: u8 = 0x44;
/// Address command for digit 0.
const CMD_START_ADDR: u8 = 0xC0;
/// Display control command; low 3 bits carry the brightness.
const CMD_DISPLAY_CTRL: u8 = 0x80;
/// Display-on bit of the control command.
const DISPLAY_ON: u8 = 0x08;

/// Highest brightness level the controller accepts.
pub const MAX_BRIGHTNESS: u8 = 7;

/// Bidirectional data line.
///
/// Driven as an output while writing, released to an input while the
/// controller acknowledges a byte.
pub trait DataPin: OutputPin + InputPin {
    /// Release the line so the controller can drive it.
    fn set_as_input(&mut self) -> Result<(), Self::Error>;

    /// Drive the line from the output latch again.
    fn set_as_output(&mut self) -> Result<(), Self::Error>;
}

/// TM1637 on two GPIO lines.
pub struct Tm1637<CLK, DIO, D> {
    clk: CLK,
    dio: DIO,
    delay: D,
    brightness: u8,
    enabled: bool,
}

impl<CLK, DIO, D, E> Tm1637<CLK, DIO, D>
where
    CLK: OutputPin<Error = E>,
    DIO: DataPin<Error = E>,
    D: DelayNs,
{
    /// Create the driver. Brightness above [`MAX_BRIGHTNESS`] is clamped.
    pub fn new(clk: CLK, dio: DIO, delay: D, brightness: u8) -> Self {
        Self {
            clk,
            dio,
            delay,
            brightness: brightness.min(MAX_BRIGHTNESS),
            enabled: true,
        }
    }

    /// Put both lines in the idle (high) state.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        self.dio.set_as_output()?;
        self.clk.set_high()?;
        self.dio.set_high()?;
        Ok(())
    }

    /// Current brightness level (0-7).
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Whether the display-on bit is sent with the next update.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Give back the lines and the delay provider.
    pub fn release(self) -> (CLK, DIO, D) {
        (self.clk, self.dio, self.delay)
    }

    fn bit_delay(&mut self) {
        self.delay.delay_us(BIT_DELAY_US);
    }

    fn start(&mut self) -> Result<(), E> {
        self.clk.set_high()?;
        self.dio.set_high()?;
        self.dio.set_low()?;
        self.clk.set_low()
    }

    fn stop(&mut self) -> Result<(), E> {
        self.clk.set_low()?;
        self.dio.set_low()?;
        self.clk.set_high()?;
        self.dio.set_high()
    }

    /// Shift out one byte and sample the acknowledgment.
    ///
    /// Returns `true` if the controller pulled DIO low.
    fn write_byte(&mut self, mut byte: u8) -> Result<bool, E> {
        for _ in 0..8 {
            self.clk.set_low()?;
            if byte & 0x01 != 0 {
                self.dio.set_high()?;
            } else {
                self.dio.set_low()?;
            }
            byte >>= 1;
            self.clk.set_high()?;
        }

        // Ninth clock: release DIO and let the controller answer.
        self.clk.set_low()?;
        self.dio.set_high()?;
        self.clk.set_high()?;
        self.dio.set_as_input()?;
        self.bit_delay();

        let ack = self.dio.is_low()?;
        self.dio.set_low()?;
        if ack {
            self.dio.set_as_output()?;
        }
        self.bit_delay();
        self.dio.set_as_output()?;
        self.bit_delay();

        Ok(ack)
    }

    /// One framed command: start, bytes, stop.
    fn command(&mut self, bytes: &[u8]) -> Result<(), E> {
        critical_section::with(|_| {
            self.start()?;
            for &byte in bytes {
                if !self.write_byte(byte)? {
                    warn!("TM1637: no ack for {=u8:#x}", byte);
                }
            }
            self.stop()
        })
    }

    fn write_control(&mut self) -> Result<(), E> {
        let on = if self.enabled { DISPLAY_ON } else { 0 };
        self.command(&[CMD_DISPLAY_CTRL | on | self.brightness])
    }
}

impl<CLK, DIO, D, E> SegmentDisplay for Tm1637<CLK, DIO, D>
where
    CLK: OutputPin<Error = E>,
    DIO: DataPin<Error = E>,
    D: DelayNs,
{
    type Error = Error<E>;

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level.min(MAX_BRIGHTNESS);
    }

    fn set_enabled(&mut self, on: bool) {
        self.enabled = on;
    }

    fn display_raw(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        let mut data = [CMD_START_ADDR; DIGIT_COUNT + 1];
        data[1..].copy_from_slice(frame);

        self.command(&[CMD_ADDR_AUTO])?;
        self.command(&data)?;
        self.write_control()?;
        Ok(())
    }

    fn display_at(&mut self, position: u8, segments: u8) -> Result<(), Self::Error> {
        if position as usize >= DIGIT_COUNT {
            return Err(Error::InvalidPosition(position));
        }

        self.command(&[CMD_ADDR_FIXED])?;
        self.command(&[CMD_START_ADDR + position, segments])?;
        self.write_control()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::segments::{number_frame, DIGITS, DOT, MINUS, OVERFLOW};
    use core::cell::RefCell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;
    use std::rc::Rc;
    use std::vec::Vec;

    /// Simulated two-wire bus with a TM1637 on the other end.
    ///
    /// Decodes start / stop / bytes from the line transitions the driver
    /// produces, the way a logic analyser would.
    #[derive(Default)]
    struct Bus {
        clk: bool,
        dio: bool,
        dio_input: bool,
        device_acks: bool,
        bits: u8,
        shift: u8,
        current: Option<Vec<u8>>,
        commands: Vec<Vec<u8>>,
        acks_sampled: usize,
        clocks_while_released: usize,
    }

    impl Bus {
        fn new(device_acks: bool) -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Self {
                clk: true,
                dio: true,
                device_acks,
                ..Default::default()
            }))
        }

        fn set_clk(&mut self, high: bool) {
            let rising = high && !self.clk;
            self.clk = high;
            if !rising {
                return;
            }
            if self.dio_input {
                self.clocks_while_released += 1;
                return;
            }
            if self.bits < 8 {
                if self.dio {
                    self.shift |= 1 << self.bits;
                }
                self.bits += 1;
            } else {
                // Ninth clock is the acknowledgment slot.
                if let Some(cmd) = self.current.as_mut() {
                    cmd.push(self.shift);
                }
                self.bits = 0;
                self.shift = 0;
            }
        }

        fn set_dio(&mut self, high: bool) {
            let was = self.dio;
            self.dio = high;
            if self.dio_input || !self.clk || was == high {
                return;
            }
            if high {
                if let Some(cmd) = self.current.take() {
                    self.commands.push(cmd);
                }
            } else {
                self.current = Some(Vec::new());
                self.bits = 0;
                self.shift = 0;
            }
        }
    }

    struct Clk(Rc<RefCell<Bus>>);
    struct Dio(Rc<RefCell<Bus>>);

    impl ErrorType for Clk {
        type Error = Infallible;
    }

    impl OutputPin for Clk {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().set_clk(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().set_clk(true);
            Ok(())
        }
    }

    impl ErrorType for Dio {
        type Error = Infallible;
    }

    impl OutputPin for Dio {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().set_dio(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().set_dio(true);
            Ok(())
        }
    }

    impl InputPin for Dio {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            let mut bus = self.0.borrow_mut();
            bus.acks_sampled += 1;
            Ok(!(bus.dio_input && bus.device_acks))
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.is_high()?)
        }
    }

    impl DataPin for Dio {
        fn set_as_input(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().dio_input = true;
            Ok(())
        }

        fn set_as_output(&mut self) -> Result<(), Infallible> {
            self.0.borrow_mut().dio_input = false;
            Ok(())
        }
    }

    /// Records requested delays instead of waiting.
    #[derive(Default)]
    struct Delay {
        total_ns: u64,
        shortest_ns: Option<u32>,
    }

    impl DelayNs for Delay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
            self.shortest_ns = Some(self.shortest_ns.map_or(ns, |s| s.min(ns)));
        }
    }

    fn driver(device_acks: bool) -> (Tm1637<Clk, Dio, Delay>, Rc<RefCell<Bus>>) {
        let bus = Bus::new(device_acks);
        let mut tm = Tm1637::new(Clk(bus.clone()), Dio(bus.clone()), Delay::default(), 4);
        tm.init().unwrap();
        (tm, bus)
    }

    #[test]
    fn frame_is_sent_as_three_commands() {
        let (mut tm, bus) = driver(true);
        let frame = [DIGITS[1], DIGITS[2] | DOT, MINUS, 0x00];
        tm.display_raw(&frame).unwrap();

        let bus = bus.borrow();
        assert_eq!(
            bus.commands,
            [
                vec![0x40],
                vec![0xC0, DIGITS[1], DIGITS[2] | DOT, MINUS, 0x00],
                vec![0x8C],
            ]
        );
    }

    #[test]
    fn bytes_are_sent_lsb_first() {
        let (mut tm, bus) = driver(true);
        tm.display_raw(&[0x01, 0x80, 0xA5, 0x5A]).unwrap();
        assert_eq!(bus.borrow().commands[1], vec![0xC0, 0x01, 0x80, 0xA5, 0x5A]);
    }

    #[test]
    fn single_digit_uses_fixed_address() {
        let (mut tm, bus) = driver(true);
        tm.display_at(2, DIGITS[7]).unwrap();

        assert_eq!(
            bus.borrow().commands,
            [vec![0x44], vec![0xC2, DIGITS[7]], vec![0x8C]]
        );
    }

    #[test]
    fn single_digit_rejects_bad_position() {
        let (mut tm, bus) = driver(true);
        assert_eq!(tm.display_at(4, DIGITS[1]), Err(Error::InvalidPosition(4)));
        assert!(bus.borrow().commands.is_empty());
    }

    #[test]
    fn brightness_is_clamped_and_applied() {
        let (mut tm, bus) = driver(true);
        tm.set_brightness(12);
        assert_eq!(tm.brightness(), MAX_BRIGHTNESS);
        tm.clear().unwrap();
        assert_eq!(bus.borrow().commands[2], vec![0x8F]);

        tm.set_brightness(2);
        tm.clear().unwrap();
        assert_eq!(bus.borrow().commands[5], vec![0x8A]);
    }

    #[test]
    fn disabled_display_clears_on_bit() {
        let (mut tm, bus) = driver(true);
        tm.set_enabled(false);
        tm.clear().unwrap();
        assert!(!tm.is_enabled());
        assert_eq!(bus.borrow().commands[2], vec![0x84]);
    }

    #[test]
    fn clear_blanks_all_digits() {
        let (mut tm, bus) = driver(true);
        tm.clear().unwrap();
        assert_eq!(bus.borrow().commands[1], vec![0xC0, 0, 0, 0, 0]);
    }

    #[test]
    fn number_goes_through_formatter() {
        let (mut tm, bus) = driver(true);
        tm.display_number(42, false).unwrap();
        tm.display_number(10000, false).unwrap();

        let bus = bus.borrow();
        let mut expected = vec![0xC0];
        expected.extend_from_slice(&number_frame(42, false));
        assert_eq!(bus.commands[1], expected);

        let mut expected = vec![0xC0];
        expected.extend_from_slice(&OVERFLOW);
        assert_eq!(bus.commands[4], expected);
    }

    #[test]
    fn every_byte_samples_ack_after_settle_delay() {
        let (mut tm, bus) = driver(true);
        tm.display_raw(&[0; 4]).unwrap();

        // 1 + 5 + 1 bytes, one ack sample and one released clock each.
        let bus = bus.borrow();
        assert_eq!(bus.acks_sampled, 7);
        assert_eq!(bus.clocks_while_released, 0);
        assert!(!bus.dio_input);

        let (_, _, delay) = tm.release();
        assert!(delay.shortest_ns.unwrap() >= 50_000);
        assert_eq!(delay.total_ns, 7 * 3 * 50_000);
    }

    #[test]
    fn missing_ack_does_not_abort_transfer() {
        let (mut tm, bus) = driver(false);
        tm.display_raw(&[DIGITS[3]; 4]).unwrap();

        let bus = bus.borrow();
        assert_eq!(bus.commands.len(), 3);
        assert_eq!(bus.commands[1], vec![0xC0, DIGITS[3], DIGITS[3], DIGITS[3], DIGITS[3]]);
        assert!(!bus.dio_input);
    }

    #[test]
    fn bus_idles_high_after_transfer() {
        let (mut tm, bus) = driver(true);
        tm.display_at(0, MINUS).unwrap();
        let bus = bus.borrow();
        assert!(bus.clk);
        assert!(bus.dio);
        assert!(bus.current.is_none());
    }
}
