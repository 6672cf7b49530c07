use std::fmt;

use log::debug;

use crate::ParseError;
use crate::dx7::{
    first_different_offset,
    NAME_SIZE,
    VOICE_SIZE,
};
use crate::dx7::voice::Voice;
use crate::dx7::sysex::{
    self,
    Header,
    SystemExclusiveData,
    HEADER_SIZE,
    PAYLOAD_SIZE,
};

/// A pair of voices with identical parameters, apart from the name.
/// The voice numbers are 1-based, and `first` < `second`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Duplicate {
    pub first: usize,
    pub second: usize,
}

impl fmt::Display for Duplicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Voice {} and voice {}", self.first, self.second)
    }
}

/// Finds all pairs of packed voices in `payload` whose data is the same
/// when the name at the end of each voice is left out.
/// Every matching pair is reported, so three equal voices give three pairs.
pub fn find_duplicates(payload: &[u8]) -> Vec<Duplicate> {
    let voices: Vec<&[u8]> = payload
        .chunks_exact(VOICE_SIZE)
        .map(|voice| &voice[..VOICE_SIZE - NAME_SIZE])
        .collect();

    let mut result = Vec::new();
    for (i, a) in voices.iter().enumerate() {
        for (j, b) in voices.iter().enumerate().skip(i + 1) {
            if first_different_offset(a, b).is_none() {
                debug!("Voices {} and {} are duplicates", i + 1, j + 1);
                result.push(Duplicate { first: i + 1, second: j + 1 });
            }
        }
    }
    result
}

/// A DX7 cartridge with 32 voices, decoded from a bulk dump.
#[derive(Debug, Clone)]
pub struct Cartridge {
    pub header: Header,
    pub voices: Vec<Voice>,
    data: Vec<u8>,  // packed voices as found in the dump
}

impl Cartridge {
    /// Gets a voice by its 1-based number.
    pub fn voice(&self, number: usize) -> Option<&Voice> {
        number.checked_sub(1).and_then(|index| self.voices.get(index))
    }

    pub fn find_duplicates(&self) -> Vec<Duplicate> {
        find_duplicates(&self.data)
    }

    /// Lists the voices one per line, with their 1-based numbers.
    pub fn listing(&self) -> String {
        self.voices.iter()
            .enumerate()
            .map(|(index, voice)| format!("{:02}: {}\n", index + 1, voice.name()))
            .collect()
    }
}

impl SystemExclusiveData for Cartridge {
    /// Validates a complete bulk dump and decodes its voices.
    fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        let header = sysex::validate(data)?;
        debug!("{}", header);

        let payload = &data[HEADER_SIZE..HEADER_SIZE + PAYLOAD_SIZE];
        let voices = payload
            .chunks_exact(VOICE_SIZE)
            .map(Voice::from_bytes)
            .collect::<Result<Vec<Voice>, ParseError>>()?;
        debug!("Decoded {} voices", voices.len());

        Ok(Cartridge {
            header,
            voices,
            data: payload.to_vec(),
        })
    }

    const DATA_SIZE: usize = sysex::DUMP_SIZE;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dx7::{make_dump, BRASS1, VOICE_COUNT};
    use crate::dx7::sysex::HeaderCheck;

    fn bank_of(voice: &[u8; VOICE_SIZE]) -> Vec<u8> {
        voice.repeat(VOICE_COUNT)
    }

    // A bank where every voice differs from the others
    // in its first EG rate.
    fn distinct_bank() -> Vec<u8> {
        let mut payload = bank_of(&BRASS1);
        for (index, voice) in payload.chunks_exact_mut(VOICE_SIZE).enumerate() {
            voice[0] = index as u8;
        }
        payload
    }

    #[test]
    fn test_cartridge_voice_count() {
        let cartridge = Cartridge::from_bytes(&make_dump(&bank_of(&BRASS1))).expect("valid cartridge");
        assert_eq!(cartridge.voices.len(), VOICE_COUNT);
        assert_eq!(cartridge.header.byte_count, 4096);
        assert!(cartridge.voices.iter().all(|v| v.name() == "BRASS   1 "));
    }

    #[test]
    fn test_no_voices_on_bad_dump() {
        let mut dump = make_dump(&bank_of(&BRASS1));
        dump[1] = 0x42;
        let result = Cartridge::from_bytes(&dump);
        assert_eq!(result.err(), Some(ParseError::MalformedHeader(HeaderCheck::Manufacturer)));
    }

    #[test]
    fn test_voice_by_number() {
        let cartridge = Cartridge::from_bytes(&make_dump(&distinct_bank())).unwrap();
        assert!(cartridge.voice(0).is_none());
        assert_eq!(cartridge.voice(1).map(|v| v.operators[5].eg.rates[0]), Some(0));
        assert_eq!(cartridge.voice(32).map(|v| v.operators[5].eg.rates[0]), Some(31));
        assert!(cartridge.voice(33).is_none());
    }

    #[test]
    fn test_duplicates_use_stored_voices() {
        let mut payload = distinct_bank();
        payload[2 * VOICE_SIZE] = 0;
        let cartridge = Cartridge::from_bytes(&make_dump(&payload)).unwrap();
        assert_eq!(cartridge.find_duplicates(), vec![Duplicate { first: 1, second: 3 }]);
    }

    #[test]
    fn test_no_duplicates() {
        assert!(find_duplicates(&distinct_bank()).is_empty());
    }

    #[test]
    fn test_duplicates_ignore_name() {
        let mut payload = distinct_bank();
        let (first, rest) = payload.split_at_mut(VOICE_SIZE);
        rest[4 * VOICE_SIZE..5 * VOICE_SIZE].copy_from_slice(first);
        rest[5 * VOICE_SIZE - NAME_SIZE..5 * VOICE_SIZE].copy_from_slice(b"OTHER NAME");

        // voice 1 and voice 6
        assert_eq!(find_duplicates(&payload), vec![Duplicate { first: 1, second: 6 }]);
    }

    #[test]
    fn test_one_bit_difference_is_not_duplicate() {
        let mut payload = distinct_bank();
        payload[..VOICE_SIZE].copy_from_slice(&BRASS1);
        payload[VOICE_SIZE..2 * VOICE_SIZE].copy_from_slice(&BRASS1);
        assert_eq!(find_duplicates(&payload).len(), 1);

        // unused top bit of the algorithm byte
        payload[VOICE_SIZE + 110] |= 0x80;
        assert!(find_duplicates(&payload).is_empty());
    }

    #[test]
    fn test_duplicate_chain_reports_every_pair() {
        let mut payload = distinct_bank();
        for index in [2, 9, 20] {
            payload[index * VOICE_SIZE] = 0x55;
        }
        assert_eq!(
            find_duplicates(&payload),
            vec![
                Duplicate { first: 3, second: 10 },
                Duplicate { first: 3, second: 21 },
                Duplicate { first: 10, second: 21 },
            ]);
    }

    #[test]
    fn test_all_same() {
        let duplicates = find_duplicates(&bank_of(&BRASS1));
        assert_eq!(duplicates.len(), VOICE_COUNT * (VOICE_COUNT - 1) / 2);
        assert_eq!(duplicates[0], Duplicate { first: 1, second: 2 });
        assert_eq!(duplicates[duplicates.len() - 1], Duplicate { first: 31, second: 32 });
    }

    #[test]
    fn test_listing() {
        let mut payload = bank_of(&BRASS1);
        payload[VOICE_SIZE - NAME_SIZE..VOICE_SIZE].copy_from_slice(b"E.PIANO 1 ");
        let cartridge = Cartridge::from_bytes(&make_dump(&payload)).unwrap();
        let listing = cartridge.listing();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), VOICE_COUNT);
        assert_eq!(lines[0], "01: E.PIANO 1 ");
        assert_eq!(lines[31], "32: BRASS   1 ");
    }

    #[test]
    fn test_listing_with_padded_names() {
        let mut payload = bank_of(&BRASS1);
        payload[VOICE_SIZE - NAME_SIZE..VOICE_SIZE].copy_from_slice(b"PIANO\0\0\0\0\0");
        payload[2 * VOICE_SIZE - NAME_SIZE..2 * VOICE_SIZE].copy_from_slice(&[0xa5; NAME_SIZE]);
        let cartridge = Cartridge::from_bytes(&make_dump(&payload)).unwrap();
        let listing = cartridge.listing();
        assert!(!listing.contains('\0'));
        assert!(listing.starts_with("01: PIANO\n02: ??????????\n03: BRASS   1 \n"));
    }

    #[test]
    fn test_duplicate_display() {
        assert_eq!(Duplicate { first: 4, second: 17 }.to_string(), "Voice 4 and voice 17");
    }
}
