#[cfg(test)]
#[path = "./channel_test.rs"]
mod channel_test;

use crate::error::Error;
use crate::operator::{FrequencyData, Operator};
use crate::tables::KSL_TAB;

pub const NUM_CHANNELS: usize = 18;

pub const NUM_PAIRS: usize = 6;

/// Channels that can be the first half of a 4-op channel, in the order of
/// their enable bits in register 0x104.
pub const PAIR_PRIMARIES: [usize; NUM_PAIRS] = [0, 1, 2, 9, 10, 11];

/// Distance between the two halves of a 4-op channel.
const PAIR_DISTANCE: usize = 3;

/// The part a channel can play in a 4-op channel.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum PairRole {
    Primary,
    Secondary,
    /// Channel can never be part of a 4-op channel.
    Single,
}

impl PairRole {
    pub fn of(channel: usize) -> PairRole {
        match channel {
            0..=2 | 9..=11 => PairRole::Primary,
            3..=5 | 12..=14 => PairRole::Secondary,
            _ => PairRole::Single,
        }
    }
}

/// Two channels that form a 4-op channel when the primary's 4-op bit is set
/// in OPL3 mode.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct ChannelPair {
    primary: usize,
    secondary: usize,
}

impl ChannelPair {
    pub fn new(primary: usize) -> Result<ChannelPair, Error> {
        if PairRole::of(primary) != PairRole::Primary {
            return Err(Error::InvalidPair { channel: primary });
        }
        Ok(ChannelPair {
            primary,
            secondary: primary + PAIR_DISTANCE,
        })
    }

    /// The pair the given channel could be part of, regardless of whether it
    /// is enabled.
    pub fn containing(channel: usize) -> Option<ChannelPair> {
        match PairRole::of(channel) {
            PairRole::Primary => ChannelPair::new(channel).ok(),
            PairRole::Secondary => ChannelPair::new(channel - PAIR_DISTANCE).ok(),
            PairRole::Single => None,
        }
    }

    pub fn primary(&self) -> usize {
        self.primary
    }

    pub fn secondary(&self) -> usize {
        self.secondary
    }
}

/// A channel (voice): two operators sharing frequency and block.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Channel {
    pub(crate) op: [Operator; 2],
    block_fnum: u16,
    key_code: u8,
    ksl_base: u8,
    extended: bool,
    output: i32,
}

impl Channel {
    pub fn new() -> Channel {
        Channel::default()
    }

    pub fn op(&self, ix: usize) -> &Operator {
        &self.op[ix]
    }

    pub(crate) fn op_mut(&mut self, ix: usize) -> &mut Operator {
        &mut self.op[ix]
    }

    /// Block (bits 12-10) and F-number (bits 9-0).
    pub fn block_fnum(&self) -> u16 {
        self.block_fnum
    }

    pub fn key_code(&self) -> u8 {
        self.key_code
    }

    pub fn ksl_base(&self) -> u8 {
        self.ksl_base
    }

    /// The 4-op enable bit from register 0x104. Only takes effect in OPL3 mode.
    pub fn extended(&self) -> bool {
        self.extended
    }

    /// Output accumulator the synthesis stage mixes from.
    pub fn output(&self) -> i32 {
        self.output
    }

    pub(crate) fn output_mut(&mut self) -> &mut i32 {
        &mut self.output
    }

    pub(crate) fn set_extended(&mut self, extended: bool) {
        self.extended = extended;
    }

    pub fn frequency(&self) -> FrequencyData {
        FrequencyData {
            block_fnum: self.block_fnum,
            key_code: self.key_code,
            ksl_base: self.ksl_base,
        }
    }

    /// Stores a new block/fnum and derives key scale base and key code.
    /// Returns `false` if the value did not change.
    pub(crate) fn set_block_fnum(&mut self, block_fnum: u16, note_select: bool) -> bool {
        if self.block_fnum == block_fnum {
            return false;
        }
        self.block_fnum = block_fnum;
        self.ksl_base = KSL_TAB[(block_fnum >> 6) as usize];

        //BLK 2,1,0 bits -> bits 3,2,1 of key code
        let mut key_code = ((block_fnum & 0x1c00) >> 9) as u8;
        //opposite to what the manuals state (verified on a real YMF262):
        //NTS=1 takes fnum bit 8 (MSB-1), NTS=0 fnum bit 9 (MSB)
        if note_select {
            key_code |= ((block_fnum >> 8) & 1) as u8;
        } else {
            key_code |= ((block_fnum >> 9) & 1) as u8;
        }
        self.key_code = key_code;
        true
    }

    /// Re-derives attenuation and frequency of both operators from `freq`.
    pub(crate) fn refresh_operators(&mut self, freq: FrequencyData) {
        for op in self.op.iter_mut() {
            op.update_attenuation(freq.ksl_base);
            op.update_frequency(freq);
        }
    }

    pub(crate) fn set_key(&mut self, mask: u8, on: bool) {
        self.op[0].set_key(mask, on);
        self.op[1].set_key(mask, on);
    }
}
