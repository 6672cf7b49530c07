use std::fmt;
use bit::BitIndex;
use log::debug;

use crate::ParseError;

use crate::dx7::{
    indent,
    NAME_SIZE,
    OPERATOR_COUNT,
};

use crate::dx7::sysex::SystemExclusiveData;
use crate::dx7::operator::Operator;
use crate::dx7::lfo::Lfo;
use crate::dx7::envelope::Envelope;
use crate::dx7::label::{self, Mapped, NoteLabel, Switch};

// Packed size of one operator.
const OPERATOR_SIZE: usize = 17;

/// A DX7 voice.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Voice {
    pub operators: [Operator; OPERATOR_COUNT],  // OP1 first
    pub peg: Envelope,  // pitch env
    pub alg: u8,  // 0 ~ 31 as stored
    pub feedback: u8,  // 0 ~ 7
    pub osc_sync: u8,
    pub lfo: Lfo,
    pub pitch_mod_sens: u8,  // 0 ~ 15, four bits as stored
    pub transpose: u8,  // 0 ~ 48, 24 = C3
    pub name: [u8; NAME_SIZE],
}

impl Voice {
    /// Algorithm number as shown on the synth (1...32).
    pub fn algorithm(&self) -> u8 {
        self.alg + 1
    }

    pub fn osc_sync_label(&self) -> Mapped<Switch> {
        label::on_off(self.osc_sync)
    }

    pub fn transpose_label(&self) -> Mapped<NoteLabel> {
        label::transpose(self.transpose)
    }

    /// Gets the voice name as text, up to the first NUL byte if any.
    /// Each byte becomes one character, and anything that is not
    /// printable ASCII is shown as '?'.
    pub fn name(&self) -> String {
        self.name.iter()
            .take_while(|&&b| b != 0)
            .map(|&b| if (0x20..0x7f).contains(&b) { b as char } else { '?' })
            .collect()
    }
}

impl SystemExclusiveData for Voice {
    /// Makes a voice from its 128 packed bytes in a cartridge.
    fn from_bytes(data: &[u8]) -> Result<Voice, ParseError> {
        Self::check_size(data)?;

        // Note that the operator data is in reverse order:
        // OP6 is first, OP1 is last.
        let mut operators = [Operator::default(); OPERATOR_COUNT];
        let operator_data = &data[..OPERATOR_COUNT * OPERATOR_SIZE];
        for (slot, op_data) in operator_data.chunks_exact(OPERATOR_SIZE).enumerate() {
            operators[OPERATOR_COUNT - 1 - slot] = Operator::from_bytes(op_data)?;
        }

        // Now we should be at the start of the pitch EG.
        let offset = OPERATOR_COUNT * OPERATOR_SIZE;
        let peg = Envelope::from_bytes(&data[offset..offset + 8])?;

        let mut name = [0u8; NAME_SIZE];
        name.copy_from_slice(&data[118..128]);

        let voice = Voice {
            operators,
            peg,
            alg: data[110].bit_range(0..5),
            feedback: data[111].bit_range(0..3),
            osc_sync: data[111].bit_range(3..4),
            lfo: Lfo::from_bytes(&data[112..117])?,
            pitch_mod_sens: data[116].bit_range(4..8),
            transpose: data[117],
            name,
        };
        debug!("Decoded voice '{}', algorithm {}", voice.name(), voice.algorithm());

        Ok(voice)
    }

    const DATA_SIZE: usize = 128;
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Name: {}", self.name())?;
        writeln!(f)?;
        writeln!(f, "Algorithm: {:02}", self.algorithm())?;
        writeln!(f, "Pitch Envelope Generator:")?;
        write!(f, "{}", indent(&self.peg.to_string(), 2))?;
        writeln!(f, "Feedback: {:02}", self.feedback)?;
        writeln!(f, "Oscillator Key Sync: {:02} ({})", self.osc_sync, self.osc_sync_label())?;
        writeln!(f, "LFO:")?;
        write!(f, "{}", indent(&self.lfo.to_string(), 2))?;
        writeln!(f, "Pitch Mod Sense: {:02}", self.pitch_mod_sens)?;
        writeln!(f, "Transpose: {:02} ({})", self.transpose, self.transpose_label())?;

        for (i, op) in self.operators.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Operator {:02}: ", i + 1)?;
            write!(f, "{}", indent(&op.to_string(), 2))?;
        }

        Ok(())
    }
}
