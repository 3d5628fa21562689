use crate::tables::{
    EG_RATE_SELECT, EG_RATE_SHIFT, KSL_SHIFT, MUL_TAB, RATE_INDEX_INSTANT, RATE_STEPS, SL_TAB,
};

/// Key source of a normal note on (register 0xB0-0xB8 bit 5).
pub const KEY_NOTE: u8 = 0x01;
/// Key source of a rhythm instrument (register 0xBD bits 0-4).
pub const KEY_RHYTHM: u8 = 0x02;

const MASK_AM: u8 = 0x80;
const MASK_VIBRATO: u8 = 0x40;
const MASK_EG_TYPE: u8 = 0x20;
const MASK_KSR: u8 = 0x10;

/// Envelope generator phase. Ordered by loudness, a key off only ever moves
/// a phase above `RELEASE` down to `RELEASE`.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone, Default)]
pub enum EnvelopePhase {
    #[default]
    OFF,
    RELEASE,
    SUSTAIN,
    DECAY,
    ATTACK,
}

/// Where an operator's output sample is accumulated.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Default)]
pub enum Destination {
    /// Phase modulation input of the next operator.
    #[default]
    PhaseModA,
    /// Second phase modulation accumulator, only used by 4-op channels.
    PhaseModB,
    /// Output accumulator of the given channel (0-17).
    ChannelOutput(usize),
}

/// Envelope rate, precomputed as a counter shift and an offset into the
/// synthesis stage's envelope increment table.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Default)]
pub struct EnvelopeRate {
    pub shift: u8,
    pub select: u8,
}

impl EnvelopeRate {
    fn from_index(index: u8) -> EnvelopeRate {
        EnvelopeRate {
            shift: EG_RATE_SHIFT[index as usize],
            select: EG_RATE_SELECT[index as usize],
        }
    }

    // all 15 x attack rates take "zero" time (verified on a real YMF262)
    fn attack_from_index(index: u8) -> EnvelopeRate {
        if index < RATE_INDEX_INSTANT {
            EnvelopeRate::from_index(index)
        } else {
            EnvelopeRate {
                shift: 0,
                select: 13 * RATE_STEPS,
            }
        }
    }
}

/// AM enable (bit 15) packed with the total level plus key scale
/// attenuation (bits 0-14), as read by the synthesis stage per sample.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Default)]
pub struct AmAttenuation(u16);

impl AmAttenuation {
    const AM_BIT: u16 = 0x8000;

    fn new(am: bool, attenuation: u16) -> AmAttenuation {
        AmAttenuation((attenuation & !Self::AM_BIT) | if am { Self::AM_BIT } else { 0 })
    }

    pub fn am(self) -> bool {
        (self.0 & Self::AM_BIT) != 0
    }

    pub fn attenuation(self) -> u16 {
        self.0 & !Self::AM_BIT
    }

    pub fn bits(self) -> u16 {
        self.0
    }
}

/// Frequency related values of the channel an operator takes its pitch
/// from. For the second half of a 4-op channel this is the first half.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Default)]
pub struct FrequencyData {
    pub block_fnum: u16,
    pub key_code: u8,
    pub ksl_base: u8,
}

/// One FM operator (slot).
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Operator {
    // tone
    mul: u32,
    ksr_shift: u8,
    eg_type: bool,
    vibrato: bool,
    feedback: u8,
    connection: bool,
    waveform_number: u8,
    waveform: u8,

    // envelope
    ar: u8,
    dr: u8,
    rr: u8,
    sustain_level: u16,
    ksr: u8,
    attack: EnvelopeRate,
    decay: EnvelopeRate,
    release: EnvelopeRate,

    // attenuation
    total_level: u16,
    ksl_shift: u8,
    am_attenuation: AmAttenuation,

    // phase
    phase: u32,
    increment: u32,
    key: u8,
    envelope: EnvelopePhase,
    volume: u16,

    destination: Destination,
}

impl Operator {
    pub fn new() -> Operator {
        Operator::default()
    }

    /// Frequency multiple, pre-scaled by the pitch coefficient.
    pub fn multiple(&self) -> u32 {
        self.mul
    }

    /// Key scale rate shift: 0 if KSR is enabled, 2 otherwise.
    pub fn ksr_shift(&self) -> u8 {
        self.ksr_shift
    }

    /// `true` for a sustained envelope, `false` for a percussive one.
    pub fn eg_type(&self) -> bool {
        self.eg_type
    }

    pub fn vibrato(&self) -> bool {
        self.vibrato
    }

    /// Feedback shift of the channel, only meaningful on operator 0.
    pub fn feedback(&self) -> u8 {
        self.feedback
    }

    /// Connection bit, only meaningful on operator 0.
    pub fn connection(&self) -> bool {
        self.connection
    }

    /// The 3 bit waveform as written.
    pub fn waveform_number(&self) -> u8 {
        self.waveform_number
    }

    /// The waveform the synthesis stage uses (0-3 outside OPL3 mode).
    pub fn waveform(&self) -> u8 {
        self.waveform
    }

    pub fn attack_rate(&self) -> u8 {
        self.ar
    }

    pub fn decay_rate(&self) -> u8 {
        self.dr
    }

    pub fn release_rate(&self) -> u8 {
        self.rr
    }

    pub fn sustain_level(&self) -> u16 {
        self.sustain_level
    }

    /// Cached key scale rate value (key code >> ksr shift).
    pub fn ksr(&self) -> u8 {
        self.ksr
    }

    pub fn attack(&self) -> EnvelopeRate {
        self.attack
    }

    pub fn decay(&self) -> EnvelopeRate {
        self.decay
    }

    pub fn release(&self) -> EnvelopeRate {
        self.release
    }

    pub fn total_level(&self) -> u16 {
        self.total_level
    }

    pub fn ksl_shift(&self) -> u8 {
        self.ksl_shift
    }

    pub fn am_attenuation(&self) -> AmAttenuation {
        self.am_attenuation
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn increment(&self) -> u32 {
        self.increment
    }

    /// Bitmask of active key sources (`KEY_NOTE`, `KEY_RHYTHM`).
    pub fn key(&self) -> u8 {
        self.key
    }

    pub fn envelope(&self) -> EnvelopePhase {
        self.envelope
    }

    /// Envelope volume, owned by the synthesis stage.
    pub fn volume(&self) -> u16 {
        self.volume
    }

    pub fn destination(&self) -> Destination {
        self.destination
    }

    pub fn set_phase(&mut self, phase: u32) {
        self.phase = phase;
    }

    pub fn set_envelope(&mut self, envelope: EnvelopePhase) {
        self.envelope = envelope;
    }

    pub fn set_volume(&mut self, volume: u16) {
        self.volume = volume;
    }

    pub(crate) fn key_on(&mut self, mask: u8) {
        if self.key == 0 {
            //restart phase generator
            self.phase = 0;
            self.envelope = EnvelopePhase::ATTACK;
        }
        self.key |= mask;
    }

    pub(crate) fn key_off(&mut self, mask: u8) {
        if self.key == 0 {
            return;
        }
        self.key &= !mask;
        if self.key == 0 && self.envelope > EnvelopePhase::RELEASE {
            self.envelope = EnvelopePhase::RELEASE;
        }
    }

    pub(crate) fn set_key(&mut self, mask: u8, on: bool) {
        if on {
            self.key_on(mask);
        } else {
            self.key_off(mask);
        }
    }

    /// Register 0x20: AM, VIB, EG-TYP, KSR, MULT. The caller re-derives the
    /// frequency afterwards.
    pub(crate) fn write_20(&mut self, pitch_coef: u32, val: u8) {
        self.mul = pitch_coef.wrapping_mul(MUL_TAB[(val & 0x0f) as usize] as u32);
        self.ksr_shift = if (val & MASK_KSR) != 0 { 0 } else { 2 };
        self.eg_type = (val & MASK_EG_TYPE) != 0;
        self.vibrato = (val & MASK_VIBRATO) != 0;
        self.am_attenuation =
            AmAttenuation::new((val & MASK_AM) != 0, self.am_attenuation.attenuation());
    }

    /// Register 0x40: KSL, TL. The caller re-derives the attenuation.
    pub(crate) fn write_40(&mut self, val: u8) {
        self.ksl_shift = KSL_SHIFT[(val >> 6) as usize];
        //7 bit TL (bit 6 = always 0)
        self.total_level = ((val & 0x3f) as u16) << 2;
    }

    /// Register 0x60: AR, DR.
    pub(crate) fn write_60(&mut self, val: u8) {
        self.ar = rate_code(val >> 4);
        self.attack = EnvelopeRate::attack_from_index(self.ar + self.ksr);
        self.dr = rate_code(val & 0x0f);
        self.decay = EnvelopeRate::from_index(self.dr + self.ksr);
    }

    /// Register 0x80: SL, RR.
    pub(crate) fn write_80(&mut self, val: u8) {
        self.sustain_level = (SL_TAB[(val >> 4) as usize] as u16) << 1;
        self.rr = rate_code(val & 0x0f);
        self.release = EnvelopeRate::from_index(self.rr + self.ksr);
    }

    /// Register 0xC0: feedback and connection, stored on operator 0.
    pub(crate) fn write_c0(&mut self, val: u8) {
        let fb = (val & 0x0e) >> 1;
        self.feedback = if fb != 0 { 9 - fb } else { 0 };
        self.connection = (val & 0x01) != 0;
    }

    /// Register 0xE0: waveform select. The 3 bit value is stored regardless
    /// of the mode (verified on a real YMF262), only 0-3 are used in OPL2
    /// mode.
    pub(crate) fn write_e0(&mut self, opl3_mode: bool, val: u8) {
        self.waveform_number = val & 0x07;
        self.update_waveform(opl3_mode);
    }

    pub(crate) fn update_waveform(&mut self, opl3_mode: bool) {
        self.waveform = if opl3_mode {
            self.waveform_number
        } else {
            self.waveform_number & 0x03
        };
    }

    /// Updates the phase increment and, if the key scale rate changed, the
    /// envelope rates.
    pub(crate) fn update_frequency(&mut self, freq: FrequencyData) {
        let shift = 7 - (freq.block_fnum >> 10) as u32;
        self.increment = (((freq.block_fnum & 0x03ff) as u32).wrapping_mul(self.mul) << 2) >> shift;

        let ksr = freq.key_code >> self.ksr_shift;
        if self.ksr != ksr {
            self.ksr = ksr;
            self.attack = EnvelopeRate::attack_from_index(self.ar + ksr);
            self.decay = EnvelopeRate::from_index(self.dr + ksr);
            self.release = EnvelopeRate::from_index(self.rr + ksr);
        }
    }

    pub(crate) fn update_attenuation(&mut self, ksl_base: u8) {
        let ksl = (ksl_base as u32 >> self.ksl_shift) as u16;
        self.am_attenuation = AmAttenuation::new(self.am_attenuation.am(), self.total_level + ksl);
    }

    pub(crate) fn set_destination(&mut self, destination: Destination) {
        self.destination = destination;
    }

    /// Puts the operator in the idle state a reset leaves it in.
    pub(crate) fn silence(&mut self, volume: u16) {
        self.envelope = EnvelopePhase::OFF;
        self.volume = volume;
    }
}

fn rate_code(nibble: u8) -> u8 {
    if nibble != 0 { 16 + (nibble << 2) } else { 0 }
}
