//! Register handlers that update the model and re-derive the cached values
//! depending on it.

use crate::channel::{ChannelPair, NUM_PAIRS, PAIR_PRIMARIES};
use crate::chip::Chip;
use crate::operator::{KEY_NOTE, KEY_RHYTHM};
use crate::topology::{connection_code, four_op_routing, two_op_routing};

const RHYTHM_BD: u8 = 0x10;
const RHYTHM_SD: u8 = 0x08;
const RHYTHM_TOM: u8 = 0x04;
const RHYTHM_TC: u8 = 0x02;
const RHYTHM_HH: u8 = 0x01;

impl Chip {
    /// The channel whose frequency data drives `channel`: the primary if
    /// `channel` is the second half of an active 4-op channel.
    fn frequency_source(&self, channel: usize) -> usize {
        self.active_primary_of(channel).unwrap_or(channel)
    }

    pub(crate) fn set_mul(&mut self, slot: usize, val: u8) {
        let pitch_coef = self.settings.pitch_coef;
        let freq = self.channels[self.frequency_source(slot >> 1)].frequency();
        let op = self.operator_mut(slot);
        op.write_20(pitch_coef, val);
        op.update_frequency(freq);
    }

    pub(crate) fn set_ksl_tl(&mut self, slot: usize, val: u8) {
        let ksl_base = self.channels[self.frequency_source(slot >> 1)].ksl_base();
        let op = self.operator_mut(slot);
        op.write_40(val);
        op.update_attenuation(ksl_base);
    }

    pub(crate) fn set_ar_dr(&mut self, slot: usize, val: u8) {
        self.operator_mut(slot).write_60(val);
    }

    pub(crate) fn set_sl_rr(&mut self, slot: usize, val: u8) {
        self.operator_mut(slot).write_80(val);
    }

    pub(crate) fn set_waveform(&mut self, slot: usize, val: u8) {
        let opl3_mode = self.opl3_mode;
        self.operator_mut(slot).write_e0(opl3_mode, val);
    }

    pub(crate) fn set_four_op_enable(&mut self, val: u8) {
        let before = self.pairs_active();
        for (bit, &ch) in PAIR_PRIMARIES.iter().enumerate() {
            self.channels[ch].set_extended((val >> bit) & 1 != 0);
        }
        log::debug!("4-op enable {:06b}", val & 0x3f);
        self.update_toggled_pairs(before);
    }

    pub(crate) fn set_opl3_mode(&mut self, opl3_mode: bool) {
        if self.opl3_mode == opl3_mode {
            return;
        }
        let before = self.pairs_active();
        self.opl3_mode = opl3_mode;
        for channel in self.channels.iter_mut() {
            channel.op[0].update_waveform(opl3_mode);
            channel.op[1].update_waveform(opl3_mode);
        }
        log::debug!("OPL3 mode {}", if opl3_mode { "on" } else { "off" });
        self.update_toggled_pairs(before);
    }

    fn pairs_active(&self) -> [bool; NUM_PAIRS] {
        PAIR_PRIMARIES.map(|ch| self.active_pair(ch).is_some())
    }

    /// Re-derives routing of both halves and the frequency dependent values
    /// of the secondary for every pair that was joined or split since
    /// `before`.
    fn update_toggled_pairs(&mut self, before: [bool; NUM_PAIRS]) {
        for (&primary, was_active) in PAIR_PRIMARIES.iter().zip(before) {
            let Some(pair) = ChannelPair::containing(primary) else {
                continue;
            };
            let active = self.active_pair(primary).is_some();
            if active == was_active {
                continue;
            }

            if active {
                self.route_four_op(pair);
            } else {
                self.route_two_op(pair.primary());
                self.route_two_op(pair.secondary());
            }
            let freq = self.channels[self.frequency_source(pair.secondary())].frequency();
            self.channels[pair.secondary()].refresh_operators(freq);
        }
    }

    /// Register 0xBD: AM depth, vibrato depth, rhythm mode and the keys of
    /// the five rhythm instruments.
    pub(crate) fn write_bd(&mut self, val: u8) {
        self.am_depth = (val & 0x80) != 0;
        self.vibrato_depth = if (val & 0x40) != 0 { 8 } else { 0 };
        let rhythm = (val & 0x20) != 0;
        if rhythm != self.rhythm {
            log::debug!("rhythm mode {}", if rhythm { "on" } else { "off" });
        }
        self.rhythm = rhythm;

        //with rhythm mode off all percussion keys are released
        let keys = if rhythm { val } else { 0 };
        self.channels[6].set_key(KEY_RHYTHM, (keys & RHYTHM_BD) != 0);
        self.channels[7].op[0].set_key(KEY_RHYTHM, (keys & RHYTHM_HH) != 0);
        self.channels[7].op[1].set_key(KEY_RHYTHM, (keys & RHYTHM_SD) != 0);
        self.channels[8].op[0].set_key(KEY_RHYTHM, (keys & RHYTHM_TOM) != 0);
        self.channels[8].op[1].set_key(KEY_RHYTHM, (keys & RHYTHM_TC) != 0);
    }

    /// Registers 0xA0-0xA8: F-number low 8 bits.
    pub(crate) fn write_fnum_low(&mut self, channel: usize, val: u8) {
        let block_fnum = (self.channels[channel].block_fnum() & 0x1f00) | val as u16;
        self.update_block_fnum(channel, block_fnum);
    }

    /// Registers 0xB0-0xB8: key on, block, F-number high 2 bits.
    pub(crate) fn write_key_block_fnum(&mut self, channel: usize, val: u8) {
        let block_fnum =
            (((val & 0x1f) as u16) << 8) | (self.channels[channel].block_fnum() & 0xff);
        let key_on = (val & 0x20) != 0;

        match self.active_pair(channel) {
            Some(pair) if pair.primary() == channel => {
                //keys all four operators of the 4-op channel
                self.channels[pair.primary()].set_key(KEY_NOTE, key_on);
                self.channels[pair.secondary()].set_key(KEY_NOTE, key_on);
            }
            //second half of a 4-op channel, keyed by its primary
            Some(_) => {}
            None => self.channels[channel].set_key(KEY_NOTE, key_on),
        }

        self.update_block_fnum(channel, block_fnum);
    }

    fn update_block_fnum(&mut self, channel: usize, block_fnum: u16) {
        let note_select = self.note_select();
        if !self.channels[channel].set_block_fnum(block_fnum, note_select) {
            return;
        }
        let freq = self.channels[channel].frequency();

        if let Some(pair) = self.active_pair(channel) {
            if pair.primary() == channel {
                //the secondary's operators follow this channel's frequency
                self.channels[pair.secondary()].refresh_operators(freq);
            } else {
                //frequency stored, but the operators keep the primary's data
                return;
            }
        }
        self.channels[channel].refresh_operators(freq);
    }

    /// Registers 0xC0-0xC8: panning, feedback, connection. Re-derives the
    /// routing of the channel and, for a 4-op channel, of its other half.
    pub(crate) fn write_connection(&mut self, channel: usize, val: u8) {
        let mask = 1u32 << channel;
        if self.opl3_mode {
            self.pan_a = (self.pan_a & !mask) | ((((val & 0x10) >> 4) as u32) << channel);
            self.pan_b = (self.pan_b & !mask) | ((((val & 0x20) >> 5) as u32) << channel);
        } else {
            //always both channels in OPL2 mode
            self.pan_a |= mask;
            self.pan_b |= mask;
        }
        self.channels[channel].op[0].write_c0(val);

        match self.active_pair(channel) {
            Some(pair) => self.route_four_op(pair),
            None => self.route_two_op(channel),
        }
    }

    fn route_two_op(&mut self, channel: usize) {
        let ch = &mut self.channels[channel];
        let routing = two_op_routing(channel, ch.op[0].connection());
        ch.op[0].set_destination(routing[0]);
        ch.op[1].set_destination(routing[1]);
    }

    fn route_four_op(&mut self, pair: ChannelPair) {
        let code = connection_code(
            self.channels[pair.primary()].op[0].connection(),
            self.channels[pair.secondary()].op[0].connection(),
        );
        let routing = four_op_routing(pair, code);
        log::trace!(
            "4-op channel {}/{} connection {}",
            pair.primary(),
            pair.secondary(),
            code
        );

        let primary = &mut self.channels[pair.primary()];
        primary.op[0].set_destination(routing[0]);
        primary.op[1].set_destination(routing[1]);
        let secondary = &mut self.channels[pair.secondary()];
        secondary.op[0].set_destination(routing[2]);
        secondary.op[1].set_destination(routing[3]);
    }
}
