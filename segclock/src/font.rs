//! Segment patterns for the common-anode 7-segment digits on the board.
//!
//! Every pattern is active-low: a `0` bit lights the segment.  Bits 0 through 6 are segments `a`
//! through `g`, and bit 7 is the extra indicator segment, which is wired to the colon on digit 1
//! and to the decimal point on digit 0.

/// Segment patterns for the digits 0 through 9
pub const DIGIT_SEGMENTS: [u8; 10] = [
    0xC0, /* 0 */
    0xF9, /* 1 */
    0xA4, /* 2 */
    0xB0, /* 3 */
    0x99, /* 4 */
    0x92, /* 5 */
    0x82, /* 6 */
    0xF8, /* 7 */
    0x80, /* 8 */
    0x90, /* 9 */
];

/// All segments off, including the indicator
pub const BLANK: u8 = 0xFF;

/// Bit 7 drives the colon or decimal point, depending on where the digit sits
pub const INDICATOR_BIT: u8 = 0b1000_0000;

/// Look up the segment pattern for a single decimal digit.
///
/// `digit` must be in `0..=9`; callers derive it with `/` and `%` so this always holds.  Anything
/// larger is a bug in the caller and panics on the table lookup.
pub const fn encode(digit: u8) -> u8 {
    DIGIT_SEGMENTS[digit as usize]
}

/// Light the colon on top of an existing pattern
pub const fn with_colon(pattern: u8) -> u8 {
    pattern & !INDICATOR_BIT
}

/// Light the decimal point on top of an existing pattern.
///
/// Electrically this is the same segment as the colon; only the digit position differs.
pub const fn with_decimal(pattern: u8) -> u8 {
    pattern & !INDICATOR_BIT
}
