use std::fmt;
use bit::BitIndex;

use crate::ParseError;
use crate::dx7::indent;
use crate::dx7::envelope::Envelope;
use crate::dx7::label::{
    self,
    Frequency,
    Mapped,
    NoteLabel,
    OperatorMode,
    ScalingCurve,
};
use crate::dx7::sysex::SystemExclusiveData;

/// One side of the keyboard level scaling.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Scaling {
    pub depth: u8,  // 0 ~ 99
    pub curve: u8,  // 2 bits
}

impl Scaling {
    pub fn curve_label(&self) -> Mapped<ScalingCurve> {
        label::curve(self.curve)
    }
}

/// Keyboard level scaling.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct KeyboardLevelScaling {
    pub breakpoint: u8, // 0 ~ 99 (A-1 ~ C8)
    pub left: Scaling,
    pub right: Scaling,
}

impl KeyboardLevelScaling {
    pub fn breakpoint_label(&self) -> Mapped<NoteLabel> {
        label::break_point(self.breakpoint)
    }
}

impl fmt::Display for KeyboardLevelScaling {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Break Point: {:02} ({})", self.breakpoint, self.breakpoint_label())?;
        writeln!(f, "Left Depth: {:02}", self.left.depth)?;
        writeln!(f, "Right Depth: {:02}", self.right.depth)?;
        writeln!(f, "Left Curve: {:02} ({})", self.left.curve, self.left.curve_label())?;
        writeln!(f, "Right Curve: {:02} ({})", self.right.curve, self.right.curve_label())
    }
}

/// Operator, with every parameter as its raw code.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Operator {
    pub eg: Envelope,
    pub kbd_level_scaling: KeyboardLevelScaling,
    pub kbd_rate_scaling: u8, // 0 ~ 7
    pub detune: u8,   // 0 ~ 14, 7 is no detune
    pub amp_mod_sens: u8,  // 0 ~ 3
    pub key_vel_sens: u8,  // 0 ~ 7
    pub output_level: u8,  // 0 ~ 99
    pub mode: u8,  // 0 = ratio, 1 = fixed
    pub coarse: u8,  // 0 ~ 31
    pub fine: u8,  // 0 ~ 99
}

impl Operator {
    pub fn mode_label(&self) -> Mapped<OperatorMode> {
        label::oscillator_mode(self.mode)
    }

    /// Gets the oscillator frequency: the raw coarse value in ratio mode,
    /// or the frequency in hertz in fixed mode.
    pub fn frequency(&self) -> Mapped<Frequency> {
        match self.mode_label() {
            Mapped::Known(OperatorMode::Ratio) =>
                Mapped::Known(Frequency::Ratio(self.coarse)),
            Mapped::Known(OperatorMode::Fixed) =>
                Mapped::Known(Frequency::Fixed(label::fixed_frequency(self.coarse, self.fine))),
            Mapped::OutOfRange(code) => Mapped::OutOfRange(code),
        }
    }
}

impl SystemExclusiveData for Operator {
    /// Makes a new operator from packed cartridge bytes.
    fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        Self::check_size(data)?;

        let eg = Envelope::from_bytes(&data[0..8])?;

        let kbd_level_scaling = KeyboardLevelScaling {
            breakpoint: data[8],
            left: Scaling { depth: data[9], curve: data[11].bit_range(0..2) },
            right: Scaling { depth: data[10], curve: data[11].bit_range(2..4) },
        };

        Ok(Self {
            eg,
            kbd_level_scaling,
            kbd_rate_scaling: data[12].bit_range(0..3),
            detune: data[12].bit_range(3..7),
            amp_mod_sens: data[13].bit_range(0..2),
            key_vel_sens: data[13].bit_range(2..5),
            output_level: data[14],
            mode: data[15].bit_range(0..1),
            coarse: data[15].bit_range(1..6),
            fine: data[16],
        })
    }

    const DATA_SIZE: usize = 17;
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Envelope Generator:")?;
        write!(f, "{}", indent(&self.eg.to_string(), 2))?;
        writeln!(f, "Level Scale:")?;
        write!(f, "{}", indent(&self.kbd_level_scaling.to_string(), 2))?;
        writeln!(f, "Oscillator Rate Scale: {:02}", self.kbd_rate_scaling)?;
        writeln!(f, "Amp Mod Sense: {:02}", self.amp_mod_sens)?;
        writeln!(f, "Key Velocity Sense: {:02}", self.key_vel_sens)?;
        writeln!(f, "Output Level: {:02}", self.output_level)?;
        writeln!(f, "Oscillator Mode: {:02} ({})", self.mode, self.mode_label())?;
        writeln!(f, "Frequency Coarse: {}", self.frequency())?;
        writeln!(f, "Frequency Fine: {:02}", self.fine)?;
        writeln!(f, "Detune: {:02}", self.detune)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dx7::BRASS1;

    #[test]
    fn test_from_packed_bytes() {
        // The data for OP6 of "BRASS 1" is first.
        let op = Operator::from_bytes(&BRASS1[..17]).expect("valid operator");

        // KLS: 27 36 32 05
        // - breakpoint = 27H = 39 = C3
        // - left depth = 36H = 54
        // - right depth = 32H = 50
        // - left curve and right curve packed = 05H, both -EXP
        assert_eq!(op.eg.rates, [49, 99, 28, 68]);
        assert_eq!(op.eg.levels, [98, 98, 91, 0]);
        assert_eq!(op.kbd_level_scaling.breakpoint, 39);
        assert_eq!(op.kbd_level_scaling.breakpoint_label().to_string(), "C3");
        assert_eq!(op.kbd_level_scaling.left.depth, 54);
        assert_eq!(op.kbd_level_scaling.right.depth, 50);
        assert_eq!(op.kbd_level_scaling.left.curve_label().to_string(), "-EXP");
        assert_eq!(op.kbd_level_scaling.right.curve_label().to_string(), "-EXP");

        // Byte #12: osc detune and rate scaling 3CH = 0111_100B
        // Detune = 0111B = 7
        // rate scaling = 100B = 4
        assert_eq!(op.detune, 7);
        assert_eq!(op.kbd_rate_scaling, 4);

        assert_eq!(op.amp_mod_sens, 0);
        assert_eq!(op.key_vel_sens, 2);
        assert_eq!(op.output_level, 82);
        assert_eq!(op.mode, 0);
        assert_eq!(op.coarse, 1);
        assert_eq!(op.fine, 0);
    }

    #[test]
    fn test_all_bits_set() {
        let mut data = [0u8; 17];
        data[11] = 0xff;
        data[12] = 0xff;
        data[13] = 0xff;
        data[15] = 0xff;
        let op = Operator::from_bytes(&data).unwrap();
        assert_eq!(op.kbd_level_scaling.left.curve, 3);
        assert_eq!(op.kbd_level_scaling.right.curve, 3);
        assert_eq!(op.kbd_rate_scaling, 7);
        assert_eq!(op.detune, 15);
        assert_eq!(op.amp_mod_sens, 3);
        assert_eq!(op.key_vel_sens, 7);
        assert_eq!(op.mode, 1);
        assert_eq!(op.coarse, 31);
    }

    #[test]
    fn test_wrong_size() {
        assert_eq!(Operator::from_bytes(&BRASS1[..16]), Err(ParseError::SizeMismatch(16, 17)));
    }

    #[test]
    fn test_ratio_frequency_is_raw_coarse() {
        let op = Operator { mode: 0, coarse: 7, fine: 50, ..Default::default() };
        assert_eq!(op.frequency(), Mapped::Known(Frequency::Ratio(7)));
        assert_eq!(op.frequency().to_string(), "07");
    }

    #[test]
    fn test_fixed_frequency() {
        let op = Operator { mode: 1, coarse: 5, fine: 50, ..Default::default() };
        match op.frequency() {
            Mapped::Known(Frequency::Fixed(hz)) => assert!((hz - 31.62).abs() < 0.01),
            other => panic!("expected fixed frequency, got {:?}", other),
        }
        assert_eq!(op.frequency().to_string(), "31.6228 Hz");
    }

    #[test]
    fn test_bad_mode_frequency() {
        let op = Operator { mode: 2, ..Default::default() };
        assert_eq!(op.frequency(), Mapped::OutOfRange(2));
        assert_eq!(op.frequency().to_string(), "*out of range*");
    }

    #[test]
    fn test_display() {
        let op = Operator::from_bytes(&BRASS1[..17]).unwrap();
        let text = op.to_string();
        let expected = "\
Envelope Generator:
  Rate 1: 49
  Rate 2: 99
  Rate 3: 28
  Rate 4: 68
  Level 1: 98
  Level 2: 98
  Level 3: 91
  Level 4: 00
Level Scale:
  Break Point: 39 (C3)
  Left Depth: 54
  Right Depth: 50
  Left Curve: 01 (-EXP)
  Right Curve: 01 (-EXP)
Oscillator Rate Scale: 04
Amp Mod Sense: 00
Key Velocity Sense: 02
Output Level: 82
Oscillator Mode: 00 (Ratio)
Frequency Coarse: 01
Frequency Fine: 00
Detune: 07
";
        assert_eq!(text, expected);
    }
}
