use std::fmt;

use crate::ParseError;
use crate::dx7::sysex::SystemExclusiveData;

pub type Rates = [u8; 4];
pub type Levels = [u8; 4];

/// Envelope generator, used both for the operators and for pitch.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Envelope {
    pub rates: Rates,  // 0 ~ 99
    pub levels: Levels,  // 0 ~ 99
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, rate) in self.rates.iter().enumerate() {
            writeln!(f, "Rate {}: {:02}", i + 1, rate)?;
        }
        for (i, level) in self.levels.iter().enumerate() {
            writeln!(f, "Level {}: {:02}", i + 1, level)?;
        }
        Ok(())
    }
}

impl SystemExclusiveData for Envelope {
    /// Makes an envelope generator from the four rate bytes
    /// followed by the four level bytes.
    fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        Self::check_size(data)?;
        Ok(Envelope {
            rates: [data[0], data[1], data[2], data[3]],
            levels: [data[4], data[5], data[6], data[7]],
        })
    }

    const DATA_SIZE: usize = 8;
}
