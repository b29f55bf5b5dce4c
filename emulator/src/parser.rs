//! Parse LS-8 program sources.
//!
//! A program source is a text stream with one instruction byte per line,
//! written as a base-2 literal (e.g. `10000010`), optionally followed by a
//! `#` comment. Lines that do not hold exactly one literal fitting in a byte
//! (blank lines, pure comments, malformed lines) are skipped: the format is
//! lenient by contract, so parsing a source never fails.

use nom::{
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{char, space0},
    combinator::{eof, map_res, opt, rest},
    sequence::preceded,
    IResult,
};
use tracing::debug;

use crate::constants::Byte;

/// A program image: the ordered instruction bytes to load at address 0.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    bytes: Vec<Byte>,
}

impl Program {
    #[must_use]
    pub fn bytes(&self) -> &[Byte] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<Byte>> for Program {
    fn from(bytes: Vec<Byte>) -> Self {
        Self { bytes }
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.bytes {
            writeln!(f, "{byte:08b}")?;
        }
        Ok(())
    }
}

/// Parse a binary number
fn from_binary(input: &str) -> Result<Byte, std::num::ParseIntError> {
    Byte::from_str_radix(input, 2)
}

/// Check if character is a binary digit
fn is_bin_digit(c: char) -> bool {
    c.is_digit(2)
}

/// Extract a binary literal, with an optional `0b` prefix
fn take_binary_literal(input: &str) -> IResult<&str, &str> {
    let (input, _) = opt(tag_no_case("0b"))(input)?;
    take_while1(is_bin_digit)(input)
}

/// Parse a whole source line: an optional byte literal and an optional comment.
///
/// Fails if anything other than whitespace, one literal and a `#` comment is
/// on the line, or if the literal does not fit in a byte.
fn parse_line(input: &str) -> IResult<&str, Option<Byte>> {
    let (input, _) = space0(input)?;
    let (input, byte) = opt(map_res(take_binary_literal, from_binary))(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = opt(preceded(char('#'), rest))(input)?;
    let (input, _) = eof(input)?;
    Ok((input, byte))
}

/// Parse a program source into its [`Program`] image.
#[must_use]
pub fn parse(source: &str) -> Program {
    let bytes = source
        .lines()
        .filter_map(|line| match parse_line(line) {
            Ok((_, byte)) => byte,
            Err(_) => {
                debug!(line, "skipping malformed line");
                None
            }
        })
        .collect();

    Program { bytes }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn from_binary_test() {
        assert_eq!(from_binary("10"), Ok(0b10));
        assert_eq!(from_binary("11111111"), Ok(0xFF)); // Upper boundary
        assert!(from_binary("100000000").is_err()); // Out of bounds
        assert!(from_binary("98").is_err());
        assert!(from_binary("foo").is_err());
    }

    #[test]
    fn is_bin_digit_test() {
        assert!(is_bin_digit('0'));
        assert!(is_bin_digit('1'));

        for c in ('2'..='9').chain('a'..='z').chain('A'..='Z') {
            assert!(!is_bin_digit(c));
        }
    }

    #[test]
    fn take_binary_literal_test() {
        assert_eq!(take_binary_literal("10000010"), Ok(("", "10000010")));
        assert_eq!(take_binary_literal("0b101"), Ok(("", "101")));
        assert_eq!(take_binary_literal("101 # x"), Ok((" # x", "101")));
        assert!(take_binary_literal("# x").is_err()); // No digits
    }

    #[test]
    fn parse_line_test() {
        assert_eq!(parse_line("10000010"), Ok(("", Some(0b1000_0010))));
        assert_eq!(parse_line("  00000001  "), Ok(("", Some(0b0000_0001))));
        assert_eq!(parse_line("00101010 # the answer"), Ok(("", Some(42))));
        assert_eq!(parse_line(""), Ok(("", None)));
        assert_eq!(parse_line("   "), Ok(("", None)));
        assert_eq!(parse_line("# pure comment"), Ok(("", None)));

        assert!(parse_line("123").is_err()); // Not base-2
        assert!(parse_line("10000010 junk").is_err()); // Trailing garbage
        assert!(parse_line("100000000").is_err()); // Does not fit in a byte
    }

    #[test]
    fn parse_test() {
        let source = indoc! {"
            # mult.ls8: print 6 * 7
            10000010 # LDI r0, 6
            00000000
            00000110

            10000010 # LDI r1, 7
            00000001
            00000111

            10100010 # MUL r0, r1
            00000000
            00000001
            this line is not a number
            01000111 # PRN r0
            00000000
            00000001 # HLT
        "};

        let program = parse(source);
        assert_eq!(
            program.bytes(),
            &[
                0b1000_0010,
                0b0000_0000,
                0b0000_0110,
                0b1000_0010,
                0b0000_0001,
                0b0000_0111,
                0b1010_0010,
                0b0000_0000,
                0b0000_0001,
                0b0100_0111,
                0b0000_0000,
                0b0000_0001,
            ]
        );
    }

    #[test]
    fn display_test() {
        let program = Program::from(vec![0b0100_0111, 0, 1]);
        assert_eq!(program.to_string(), "01000111\n00000000\n00000001\n");
    }
}
