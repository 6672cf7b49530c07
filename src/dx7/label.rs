//! Mapping raw parameter codes to the labels a DX7 programmer
//! expects to see.

use std::fmt;

use log::warn;

const OUT_OF_RANGE: &str = "*out of range*";

static NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"
];

/// The result of mapping a raw code: either a known value,
/// or the code itself if it falls outside the domain of the mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mapped<T> {
    Known(T),
    OutOfRange(u8),
}

impl<T> Mapped<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Mapped::Known(_))
    }

    pub fn known(self) -> Option<T> {
        match self {
            Mapped::Known(value) => Some(value),
            Mapped::OutOfRange(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Mapped<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mapped::Known(value) => write!(f, "{}", value),
            Mapped::OutOfRange(_) => write!(f, "{}", OUT_OF_RANGE),
        }
    }
}

fn map<T: TryFrom<u8>>(code: u8, what: &str) -> Mapped<T> {
    match T::try_from(code) {
        Ok(value) => Mapped::Known(value),
        Err(_) => {
            warn!("{} code out of range: {}", what, code);
            Mapped::OutOfRange(code)
        }
    }
}

/// Switch setting.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Switch {
    Off,
    On,
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", if *self == Switch::On { "On" } else { "Off" })
    }
}

impl TryFrom<u8> for Switch {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Switch::Off),
            1 => Ok(Switch::On),
            _ => Err("bad switch value")
        }
    }
}

/// Scaling curve style.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CurveStyle {
    Linear,
    Exponential
}

impl fmt::Display for CurveStyle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CurveStyle::Linear => write!(f, "LIN"),
            CurveStyle::Exponential => write!(f, "EXP"),
        }
    }
}

/// Scaling curve sign.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CurveSign {
    Negative,
    Positive,
}

impl fmt::Display for CurveSign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", if *self == CurveSign::Positive { "+" } else { "-" })
    }
}

/// Keyboard level scaling curve.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ScalingCurve {
    pub style: CurveStyle,
    pub sign: CurveSign,
}

impl fmt::Display for ScalingCurve {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.sign, self.style)
    }
}

impl TryFrom<u8> for ScalingCurve {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let (style, sign) = match value {
            0 => (CurveStyle::Linear, CurveSign::Negative),
            1 => (CurveStyle::Exponential, CurveSign::Negative),
            2 => (CurveStyle::Exponential, CurveSign::Positive),
            3 => (CurveStyle::Linear, CurveSign::Positive),
            _ => return Err("bad scaling curve value"),
        };
        Ok(ScalingCurve { style, sign })
    }
}

/// LFO waveform.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum LfoWaveform {
    Triangle,
    SawDown,
    SawUp,
    Square,
    Sine,
    SampleAndHold,
}

impl fmt::Display for LfoWaveform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "{}",
            match *self {
                LfoWaveform::Triangle => "Triangle",
                LfoWaveform::SawDown => "Sawtooth Down",
                LfoWaveform::SawUp => "Sawtooth Up",
                LfoWaveform::Square => "Square",
                LfoWaveform::Sine => "Sine",
                LfoWaveform::SampleAndHold => "Sample and Hold",
            })
    }
}

impl TryFrom<u8> for LfoWaveform {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LfoWaveform::Triangle),
            1 => Ok(LfoWaveform::SawDown),
            2 => Ok(LfoWaveform::SawUp),
            3 => Ok(LfoWaveform::Square),
            4 => Ok(LfoWaveform::Sine),
            5 => Ok(LfoWaveform::SampleAndHold),
            _ => Err("bad LFO waveform value")
        }
    }
}

/// Operator oscillator mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OperatorMode {
    Ratio,
    Fixed,
}

impl fmt::Display for OperatorMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            OperatorMode::Ratio => write!(f, "Ratio"),
            OperatorMode::Fixed => write!(f, "Fixed"),
        }
    }
}

impl TryFrom<u8> for OperatorMode {
    type Error = &'static str;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OperatorMode::Ratio),
            1 => Ok(OperatorMode::Fixed),
            _ => Err("bad operator mode value")
        }
    }
}

/// A note name with an octave number, like "C3" or "A-1".
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct NoteLabel {
    pub name: &'static str,
    pub octave: i32,
}

impl fmt::Display for NoteLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

/// Key transpose as stored in SysEx (0...48, 24 = no transpose).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Transpose(u8);

crate::ranged_impl!(Transpose, 0, 48);

impl Transpose {
    /// The note the middle C key plays with this transpose,
    /// 0 is C1 and 48 is C5.
    pub fn note(&self) -> NoteLabel {
        NoteLabel {
            name: note_name(self.0),
            octave: (self.0 / 12 + 1) as i32,
        }
    }
}

impl fmt::Display for Transpose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.note())
    }
}

/// Keyboard level scaling breakpoint key (0...99, A-1...C8).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Key(u8);

crate::ranged_impl!(Key, 0, 99);

impl Key {
    pub fn note(&self) -> NoteLabel {
        // Shift up an octave before dividing and take it back after,
        // so that codes 0...2 land in octave -1 instead of 0.
        let octave = (self.0 as i32 - 3 + 12) / 12 - 1;
        NoteLabel {
            name: note_name(self.0 + 9),
            octave,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.note())
    }
}

/// Operator frequency, either a raw coarse ratio code or a fixed frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frequency {
    Ratio(u8),
    Fixed(f64),  // Hz
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Frequency::Ratio(coarse) => write!(f, "{:02}", coarse),
            Frequency::Fixed(hz) => write!(f, "{} Hz", significant(hz, 6)),
        }
    }
}

// Formats a positive value with the given number of significant digits,
// dropping trailing zeros.
fn significant(value: f64, digits: i32) -> String {
    let magnitude = if value > 0.0 { value.log10().floor() as i32 } else { 0 };
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
    else {
        text
    }
}

/// Maps 0/1 to Off/On.
pub fn on_off(x: u8) -> Mapped<Switch> {
    map(x, "switch")
}

/// Maps a scaling curve code 0...3 to -LIN, -EXP, +EXP or +LIN.
pub fn curve(x: u8) -> Mapped<ScalingCurve> {
    map(x, "curve")
}

/// Maps an LFO waveform code 0...5.
pub fn lfo_wave(x: u8) -> Mapped<LfoWaveform> {
    map(x, "LFO waveform")
}

/// Maps 0/1 to Ratio/Fixed.
pub fn oscillator_mode(x: u8) -> Mapped<OperatorMode> {
    map(x, "oscillator mode")
}

/// Gets the chromatic note name for any code, using sharps.
pub fn note_name(x: u8) -> &'static str {
    NOTE_NAMES[(x % 12) as usize]
}

/// Maps a transpose code 0...48 to a note label.
pub fn transpose(x: u8) -> Mapped<NoteLabel> {
    match map::<Transpose>(x, "transpose") {
        Mapped::Known(t) => Mapped::Known(t.note()),
        Mapped::OutOfRange(code) => Mapped::OutOfRange(code),
    }
}

/// Maps a level scaling breakpoint code 0...99 to a note label.
pub fn break_point(x: u8) -> Mapped<NoteLabel> {
    match map::<Key>(x, "breakpoint") {
        Mapped::Known(key) => Mapped::Known(key.note()),
        Mapped::OutOfRange(code) => Mapped::OutOfRange(code),
    }
}

/// Computes the frequency of an operator in fixed mode.
pub fn fixed_frequency(coarse: u8, fine: u8) -> f64 {
    let power = (coarse % 4) as f64 + fine as f64 / 100.0;
    10f64.powf(power)
}
