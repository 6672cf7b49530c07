pub mod voice;
pub mod cartridge;
pub mod operator;
pub mod lfo;
pub mod envelope;
pub mod label;
pub mod sysex;

pub const VOICE_COUNT: usize = 32;
pub const OPERATOR_COUNT: usize = 6;

/// Packed voice size in a cartridge.
pub const VOICE_SIZE: usize = 128;

/// Length of the voice name at the end of each packed voice.
pub const NAME_SIZE: usize = 10;

// Finds the first offset where the two slices differ.
// Returns None if the slices are identical. If one slice is a prefix
// of the other, the offset is the length of the shorter one.
pub fn first_different_offset(v1: &[u8], v2: &[u8]) -> Option<usize> {
    v1.iter()
        .zip(v2)
        .position(|(a, b)| a != b)
        .or_else(|| if v1.len() != v2.len() { Some(v1.len().min(v2.len())) } else { None })
}

// Prefixes every line of `text` with `width` spaces.
pub(crate) fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| format!("{}{}\n", pad, line))
        .collect()
}

/// Frames a 4096-byte payload into a complete bulk dump
/// with a correct checksum.
#[cfg(test)]
pub(crate) fn make_dump(payload: &[u8]) -> Vec<u8> {
    assert_eq!(payload.len(), sysex::PAYLOAD_SIZE);
    let mut data = vec![sysex::SYSEX_START, sysex::YAMAHA, 0x00, sysex::FORMAT_CARTRIDGE, 0x20, 0x00];
    data.extend_from_slice(payload);
    data.push(sysex::checksum(payload));
    data.push(sysex::SYSEX_END);
    data
}

/// "BRASS   1" from the DX7 ROM1A cartridge, as packed in a bulk dump.
#[cfg(test)]
pub(crate) const BRASS1: [u8; VOICE_SIZE] = [
    // OP6
    0x31, 0x63, 0x1c, 0x44, 0x62, 0x62, 0x5b, 0x00,
    0x27, 0x36, 0x32, 0x05, 0x3c, 0x08, 0x52, 0x02, 0x00,
    // OP5
    0x4d, 0x24, 0x29, 0x47, 0x63, 0x62, 0x62, 0x00,
    0x27, 0x00, 0x00, 0x0f, 0x40, 0x08, 0x62, 0x02, 0x00,
    // OP4
    0x4d, 0x24, 0x29, 0x47, 0x63, 0x62, 0x62, 0x00,
    0x27, 0x00, 0x00, 0x0f, 0x38, 0x08, 0x63, 0x02, 0x00,
    // OP3
    0x4d, 0x4c, 0x52, 0x47, 0x63, 0x62, 0x62, 0x00,
    0x27, 0x00, 0x00, 0x0f, 0x28, 0x08, 0x63, 0x02, 0x00,
    // OP2
    0x3e, 0x33, 0x1d, 0x47, 0x52, 0x5f, 0x60, 0x00,
    0x1b, 0x00, 0x07, 0x07, 0x70, 0x00, 0x56, 0x00, 0x00,
    // OP1
    0x48, 0x4c, 0x63, 0x47, 0x63, 0x58, 0x60, 0x00,
    0x27, 0x00, 0x0e, 0x0f, 0x70, 0x00, 0x62, 0x00, 0x00,
    // PEG
    0x54, 0x5f, 0x5f, 0x3c, 0x32, 0x32, 0x32, 0x32,
    0x15,  // algorithm 22
    0x0f,  // feedback 7, osc sync on
    0x25, 0x00, 0x05, 0x00,  // LFO speed, delay, PMD, AMD
    0x38,  // LFO sync off, sine, PMS 3
    0x18,  // transpose C3
    b'B', b'R', b'A', b'S', b'S', b' ', b' ', b' ', b'1', b' ',
];
