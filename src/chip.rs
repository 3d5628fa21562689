use core::array::from_fn;

use crate::OPL3Settings;
use crate::channel::{Channel, ChannelPair, NUM_CHANNELS, PairRole};
use crate::operator::{Destination, Operator};
use crate::tables::MAX_ATT_INDEX;

pub const NUM_OPERATORS: usize = NUM_CHANNELS * 2;

/// Register state of one YMF262 and everything derived from it.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Chip {
    pub(crate) channels: [Channel; NUM_CHANNELS],

    pub(crate) phase_modulation: i32,
    pub(crate) phase_modulation2: i32,

    pub(crate) pan_a: u32,
    pub(crate) pan_b: u32,

    pub(crate) opl3_mode: bool,
    pub(crate) rhythm: bool,
    pub(crate) am_depth: bool,
    pub(crate) vibrato_depth: u8,
    pub(crate) reg_08: u8,

    address: u16,

    pub(crate) settings: OPL3Settings,
}

impl Chip {
    /// Creates a chip in the state a hardware reset leaves it in.
    pub fn new(settings: OPL3Settings) -> Chip {
        let mut chip = Chip::zeroed(settings);
        chip.reset();
        chip
    }

    fn zeroed(settings: OPL3Settings) -> Chip {
        Chip {
            channels: from_fn(|_| Channel::new()),
            phase_modulation: 0,
            phase_modulation2: 0,
            pan_a: 0,
            pan_b: 0,
            opl3_mode: false,
            rhythm: false,
            am_depth: false,
            vibrato_depth: 0,
            reg_08: 0,
            address: 0,
            settings,
        }
    }

    /// Clears all state, then writes 0 to every register of both banks
    /// (highest first) so that all derived values are consistent, and
    /// finally silences every operator.
    pub fn reset(&mut self) {
        log::debug!("reset chip");
        *self = Chip::zeroed(self.settings.clone());
        for reg in (0x20..=0xff).rev() {
            self.write_reg(reg, 0);
        }
        for reg in (0x120..=0x1ff).rev() {
            self.write_reg(reg, 0);
        }
        for channel in self.channels.iter_mut() {
            channel.op[0].silence(MAX_ATT_INDEX);
            channel.op[1].silence(MAX_ATT_INDEX);
        }
    }

    /// Bus interface of the chip: port 0 and 2 latch a register address of
    /// bank 0 and 1, port 1 and 3 write data to the latched register.
    pub fn write(&mut self, port: u8, val: u8) {
        match port & 3 {
            0 => self.address = val as u16,
            1 | 3 => self.write_reg(self.address, val),
            _ => {
                self.address = if self.opl3_mode || val == 0x05 {
                    val as u16 | 0x100
                } else {
                    //in OPL2 mode bank 1 aliases bank 0, except for register 0x105
                    val as u16
                };
            }
        }
    }

    /// Currently latched register address (bit 8 = bank).
    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn settings(&self) -> &OPL3Settings {
        &self.settings
    }

    pub fn channel(&self, channel: usize) -> &Channel {
        &self.channels[channel]
    }

    pub fn channels(&self) -> &[Channel; NUM_CHANNELS] {
        &self.channels
    }

    /// Operator `slot` (0-35), operator `slot % 2` of channel `slot / 2`.
    pub fn operator(&self, slot: usize) -> &Operator {
        &self.channels[slot >> 1].op[slot & 1]
    }

    /// Mutable access for the synthesis stage, which advances phase and
    /// envelope of the operator.
    pub fn operator_mut(&mut self, slot: usize) -> &mut Operator {
        self.channels[slot >> 1].op_mut(slot & 1)
    }

    pub fn opl3_mode(&self) -> bool {
        self.opl3_mode
    }

    pub fn rhythm_mode(&self) -> bool {
        self.rhythm
    }

    /// AM depth select (`true` = 4.8dB, `false` = 1dB).
    pub fn am_depth(&self) -> bool {
        self.am_depth
    }

    /// Vibrato depth range offset (8 = 14 cent, 0 = 7 cent).
    pub fn vibrato_depth(&self) -> u8 {
        self.vibrato_depth
    }

    /// Note select (NTS) bit of register 0x08.
    pub fn note_select(&self) -> bool {
        (self.reg_08 & 0x40) != 0
    }

    pub fn pan_left(&self, channel: usize) -> bool {
        pan_bit(self.pan_a, channel)
    }

    pub fn pan_right(&self, channel: usize) -> bool {
        pan_bit(self.pan_b, channel)
    }

    /// The 4-op channel `channel` is currently part of, if any.
    pub fn active_pair(&self, channel: usize) -> Option<ChannelPair> {
        if !self.opl3_mode {
            return None;
        }
        let pair = ChannelPair::containing(channel)?;
        if self.channels[pair.primary()].extended() {
            Some(pair)
        } else {
            None
        }
    }

    /// Like `active_pair`, but only if `channel` is the second half.
    pub(crate) fn active_primary_of(&self, channel: usize) -> Option<usize> {
        if PairRole::of(channel) != PairRole::Secondary {
            return None;
        }
        self.active_pair(channel).map(|pair| pair.primary())
    }

    /// Resolves an operator destination to its accumulator.
    pub fn accumulator_mut(&mut self, destination: Destination) -> &mut i32 {
        match destination {
            Destination::PhaseModA => &mut self.phase_modulation,
            Destination::PhaseModB => &mut self.phase_modulation2,
            Destination::ChannelOutput(ch) => self.channels[ch].output_mut(),
        }
    }

    pub fn accumulator(&self, destination: Destination) -> i32 {
        match destination {
            Destination::PhaseModA => self.phase_modulation,
            Destination::PhaseModB => self.phase_modulation2,
            Destination::ChannelOutput(ch) => self.channels[ch].output(),
        }
    }

    /// Zeroes every accumulator, done by the synthesis stage before each
    /// sample.
    pub fn clear_accumulators(&mut self) {
        self.phase_modulation = 0;
        self.phase_modulation2 = 0;
        for channel in self.channels.iter_mut() {
            *channel.output_mut() = 0;
        }
    }
}

fn pan_bit(pan: u32, channel: usize) -> bool {
    assert!(channel < NUM_CHANNELS, "channel {} out of range", channel);
    (pan >> channel) & 1 != 0
}

impl Default for Chip {
    fn default() -> Self {
        Chip::new(OPL3Settings::default())
    }
}
