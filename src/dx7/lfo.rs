use std::fmt;
use bit::BitIndex;

use crate::ParseError;
use crate::dx7::label::{self, Mapped, LfoWaveform, Switch};
use crate::dx7::sysex::SystemExclusiveData;

/// LFO.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Lfo {
    pub speed: u8,  // 0 ~ 99
    pub delay: u8,  // 0 ~ 99
    pub pmd: u8,    // 0 ~ 99
    pub amd: u8,    // 0 ~ 99
    pub sync: u8,   // 1 bit
    pub waveform: u8,  // 3 bits, 0 ~ 5
}

impl Lfo {
    pub fn sync_label(&self) -> Mapped<Switch> {
        label::on_off(self.sync)
    }

    pub fn waveform_label(&self) -> Mapped<LfoWaveform> {
        label::lfo_wave(self.waveform)
    }
}

impl fmt::Display for Lfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Rate: {:02}", self.speed)?;
        writeln!(f, "Delay: {:02}", self.delay)?;
        writeln!(f, "Amp Mod Depth: {:02}", self.amd)?;
        writeln!(f, "Pitch Mod Depth: {:02}", self.pmd)?;
        writeln!(f, "Key Sync: {:02} ({})", self.sync, self.sync_label())?;
        writeln!(f, "Wave: {:02} ({})", self.waveform, self.waveform_label())
    }
}

impl SystemExclusiveData for Lfo {
    /// Makes an LFO from the packed cartridge bytes: speed, delay,
    /// PMD, AMD, and one byte with the sync bit and waveform.
    /// The upper bits of the last byte belong to the voice.
    fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        Self::check_size(data)?;
        Ok(Lfo {
            speed: data[0],
            delay: data[1],
            pmd: data[2],
            amd: data[3],
            sync: data[4].bit_range(0..1),
            waveform: data[4].bit_range(1..4),
        })
    }

    const DATA_SIZE: usize = 5;
}
