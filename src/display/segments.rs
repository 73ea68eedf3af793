//! 7-segment encoding.
//!
//! Segment byte layout (TM1637 / common 4-digit modules):
//! ```text
//!       A            bit 0 = A   bit 4 = E
//!      ---           bit 1 = B   bit 5 = F
//!   F |   | B        bit 2 = C   bit 6 = G
//!      -G-           bit 3 = D   bit 7 = decimal point
//!   E |   | C
//!      ---  .DP
//!       D
//! ```

/// Number of digit positions on the display.
pub const DIGIT_COUNT: usize = 4;

/// One byte per digit position, left to right.
pub type Frame = [u8; DIGIT_COUNT];

/// All segments off.
pub const BLANK: u8 = 0b0000_0000;

/// Middle segment only ("-").
pub const MINUS: u8 = 0b0100_0000;

/// Decimal point bit, OR it into any segment byte.
pub const DOT: u8 = 0b1000_0000;

/// Segment patterns for the decimal digits 0-9.
pub const DIGITS: [u8; 10] = [
    0b0011_1111, // 0
    0b0000_0110, // 1
    0b0101_1011, // 2
    0b0100_1111, // 3
    0b0110_0110, // 4
    0b0110_1101, // 5
    0b0111_1101, // 6
    0b0000_0111, // 7
    0b0111_1111, // 8
    0b0110_1111, // 9
];

/// "OuEr" - shown when a number does not fit the display.
pub const OVERFLOW: Frame = [0x3F, 0x1C, 0x79, 0x50];

/// Smallest value [`number_frame`] can show.
pub const NUMBER_MIN: i16 = -999;

/// Largest value [`number_frame`] can show.
pub const NUMBER_MAX: i16 = 9999;

/// Segment pattern for a decimal digit; anything outside 0-9 is a minus.
pub const fn digit_to_segments(digit: i8) -> u8 {
    if digit >= 0 && digit <= 9 {
        DIGITS[digit as usize]
    } else {
        MINUS
    }
}

/// Lay out `value` right-aligned over the four positions.
///
/// Leading zeros are blank unless `leading_zero` is set; the units digit
/// is always drawn. A negative value takes the leftmost position for its
/// sign, leaving three digits for the magnitude. Values outside
/// [`NUMBER_MIN`]..=[`NUMBER_MAX`] render as [`OVERFLOW`].
pub fn number_frame(value: i16, leading_zero: bool) -> Frame {
    if !(NUMBER_MIN..=NUMBER_MAX).contains(&value) {
        return OVERFLOW;
    }

    let negative = value < 0;
    let mut rest = value.unsigned_abs();
    let mut frame = [BLANK; DIGIT_COUNT];

    for (i, slot) in frame.iter_mut().rev().enumerate() {
        if i == DIGIT_COUNT - 1 && negative {
            *slot = MINUS;
            break;
        }
        if i == 0 || leading_zero || rest != 0 {
            *slot = DIGITS[(rest % 10) as usize];
        }
        rest /= 10;
    }

    frame
}
