use std::fmt;

use log::{debug, warn};

use crate::ParseError;

/// Parsing MIDI System Exclusive data.
pub trait SystemExclusiveData: Sized {
    fn from_bytes(data: &[u8]) -> Result<Self, ParseError>;

    const DATA_SIZE: usize;

    fn check_size(data: &[u8]) -> Result<(), ParseError> {
        if data.len() == Self::DATA_SIZE {
            Ok(())
        }
        else {
            Err(ParseError::SizeMismatch(data.len(), Self::DATA_SIZE))
        }
    }
}

pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;
pub const YAMAHA: u8 = 0x43;
pub const FORMAT_CARTRIDGE: u8 = 0x09;  // 32 voices, packed

pub const HEADER_SIZE: usize = 6;
pub const PAYLOAD_SIZE: usize = 4096;
pub const DUMP_SIZE: usize = HEADER_SIZE + PAYLOAD_SIZE + 2;

/// Offset of the checksum byte, right before the terminator.
pub const CHECKSUM_OFFSET: usize = DUMP_SIZE - 2;

/// The header check that failed in a malformed dump.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum HeaderCheck {
    SysExStart,
    Manufacturer,
    SubStatus,
    Format,
    ByteCount,
    SysExEnd,
}

impl fmt::Display for HeaderCheck {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "{}",
            match *self {
                HeaderCheck::SysExStart => "Did not find sysex start 0xF0.",
                HeaderCheck::Manufacturer => "Did not find Yamaha 0x43.",
                HeaderCheck::SubStatus => "Did not find substatus 0 and channel 1.",
                HeaderCheck::Format => "Did not find format 9 (32 voices).",
                HeaderCheck::ByteCount => "Did not find size 4096.",
                HeaderCheck::SysExEnd => "Did not find sysex end 0xF7.",
            })
    }
}

/// The six bytes that open a bulk dump.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Header {
    pub sub_status: u8,  // 0=voice/cartridge, 1=parameter
    pub channel: u8,  // 1...16
    pub format: u8,
    pub byte_count: u16,  // 14-bit number distributed evenly over two bytes
    // cartridge=4096 (01000000000000 = 0x1000, appears as "20 00")
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Format = {}, channel = {}, length = {} bytes",
            self.format, self.channel, self.byte_count)
    }
}

impl Header {
    fn from_bytes(data: &[u8]) -> Self {
        Header {
            sub_status: (data[2] >> 4) & 0b0000_0111,
            channel: (data[2] & 0b0000_1111) + 1,
            format: data[3],
            byte_count: ((data[4] as u16) << 7) | data[5] as u16,
        }
    }
}

/// Computes the checksum over the packed voice data:
/// the seven-bit two's complement of the sum of the seven-bit bytes.
pub fn checksum(payload: &[u8]) -> u8 {
    let sum = payload.iter()
        .fold(0u8, |acc, b| acc.wrapping_add(b & 0x7f));
    (!sum).wrapping_add(1) & 0x7f
}

/// Checks the framing, the declared size and the checksum of a
/// 32-voice bulk dump. Returns the header if the dump is well formed.
pub fn validate(data: &[u8]) -> Result<Header, ParseError> {
    if data.len() != DUMP_SIZE {
        warn!("Dump is {} bytes, expected {}", data.len(), DUMP_SIZE);
        return Err(ParseError::SizeMismatch(data.len(), DUMP_SIZE));
    }

    let checks = [
        (data[0] == SYSEX_START, HeaderCheck::SysExStart),
        (data[1] == YAMAHA, HeaderCheck::Manufacturer),
        (data[2] == 0x00, HeaderCheck::SubStatus),
        (data[3] == FORMAT_CARTRIDGE, HeaderCheck::Format),
        (data[4] == 0x20 && data[5] == 0x00, HeaderCheck::ByteCount),
        (data[DUMP_SIZE - 1] == SYSEX_END, HeaderCheck::SysExEnd),
    ];

    if let Some((_, check)) = checks.iter().find(|(passed, _)| !passed) {
        warn!("Malformed header: {:?}", check);
        return Err(ParseError::MalformedHeader(*check));
    }

    let payload = &data[HEADER_SIZE..HEADER_SIZE + PAYLOAD_SIZE];
    let expected = checksum(payload);
    let stored = data[CHECKSUM_OFFSET];
    debug!("Checksum: stored = {:#04x}, computed = {:#04x}", stored, expected);
    if stored != expected {
        return Err(ParseError::ChecksumMismatch(stored, expected));
    }

    Ok(Header::from_bytes(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dx7::make_dump;

    #[test]
    fn test_checksum_of_zeros() {
        assert_eq!(checksum(&[0u8; PAYLOAD_SIZE]), 0);
    }

    #[test]
    fn test_checksum_masks_high_bit() {
        // 0x81 counts as 0x01
        assert_eq!(checksum(&[0x81]), checksum(&[0x01]));
        assert_eq!(checksum(&[0x01]), 0x7f);
    }

    #[test]
    fn test_checksum_wraps() {
        // 3 * 0x7f = 0x17d, wraps to 0x7d; -0x7d & 0x7f = 0x03
        assert_eq!(checksum(&[0x7f, 0x7f, 0x7f]), 0x03);
    }

    #[test]
    fn test_valid_dump() {
        let dump = make_dump(&[0x11u8; PAYLOAD_SIZE]);
        let header = validate(&dump).expect("valid dump");
        assert_eq!(header.sub_status, 0);
        assert_eq!(header.channel, 1);
        assert_eq!(header.format, 9);
        assert_eq!(header.byte_count, 4096);
    }

    #[test]
    fn test_size_mismatch() {
        let dump = make_dump(&[0u8; PAYLOAD_SIZE]);
        assert_eq!(validate(&dump[..4103]), Err(ParseError::SizeMismatch(4103, 4104)));

        let mut longer = dump.clone();
        longer.push(0xF7);
        assert_eq!(validate(&longer), Err(ParseError::SizeMismatch(4105, 4104)));

        assert_eq!(validate(&[]), Err(ParseError::SizeMismatch(0, 4104)));
    }

    #[test]
    fn test_each_header_byte() {
        let dump = make_dump(&[0u8; PAYLOAD_SIZE]);
        let cases = [
            (0, HeaderCheck::SysExStart),
            (1, HeaderCheck::Manufacturer),
            (2, HeaderCheck::SubStatus),
            (3, HeaderCheck::Format),
            (4, HeaderCheck::ByteCount),
            (5, HeaderCheck::ByteCount),
            (DUMP_SIZE - 1, HeaderCheck::SysExEnd),
        ];

        for (offset, check) in cases {
            let mut bad = dump.clone();
            bad[offset] ^= 0x01;
            assert_eq!(validate(&bad), Err(ParseError::MalformedHeader(check)), "offset {}", offset);
        }
    }

    #[test]
    fn test_checks_run_in_order() {
        let mut dump = make_dump(&[0u8; PAYLOAD_SIZE]);
        dump[3] = 0x00;  // single voice format
        dump[DUMP_SIZE - 1] = 0x00;
        assert_eq!(validate(&dump), Err(ParseError::MalformedHeader(HeaderCheck::Format)));
    }

    #[test]
    fn test_checksum_mismatch_reports_expected() {
        let mut dump = make_dump(&[0u8; PAYLOAD_SIZE]);
        dump[HEADER_SIZE + 200] = 0x05;
        let expected = checksum(&dump[HEADER_SIZE..HEADER_SIZE + PAYLOAD_SIZE]);
        assert_eq!(expected, 0x7b);
        assert_eq!(validate(&dump), Err(ParseError::ChecksumMismatch(0x00, 0x7b)));
    }

    #[test]
    fn test_header_check_messages() {
        assert_eq!(HeaderCheck::SysExStart.to_string(), "Did not find sysex start 0xF0.");
        assert_eq!(HeaderCheck::ByteCount.to_string(), "Did not find size 4096.");
    }
}
