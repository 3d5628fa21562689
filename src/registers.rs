//! Register map and dispatch of register writes.

#[cfg(test)]
#[path = "./registers_test.rs"]
mod registers_test;

use crate::chip::Chip;
use crate::error::Error;
use crate::tables::slot_for_offset;

/// Selects the second register bank.
pub const BANK_1: u16 = 0x100;

pub const TEST: u8 = 0x01;
pub const TIMER_1: u8 = 0x02;
pub const TIMER_2: u8 = 0x03;
pub const TIMER_CONTROL: u8 = 0x04;
/// CSM / note select
pub const NOTE_SELECT: u8 = 0x08;

/// AM / VIB / EG-TYP / KSR / MULT
pub const AM_VIB_EG_KSR_MULT: u8 = 0x20;
/// KSL / TL
pub const KSL_TL: u8 = 0x40;
/// AR / DR
pub const ATTACK_DECAY: u8 = 0x60;
/// SL / RR
pub const SUSTAIN_RELEASE: u8 = 0x80;
/// F-number low 8 bits
pub const FNUM_LOW: u8 = 0xa0;
/// Key on / block / F-number high 2 bits
pub const KEY_BLOCK_FNUM: u8 = 0xb0;
/// AM depth / vibrato depth / rhythm (bank 0 only)
pub const AM_VIB_RHYTHM: u8 = 0xbd;
/// Panning / feedback / connection
pub const PAN_FB_CONNECTION: u8 = 0xc0;
/// Waveform select
pub const WAVE_SELECT: u8 = 0xe0;

/// Bank 1 test register.
pub const TEST_OPL3: u16 = 0x101;
/// 4-op enable of channels 0, 1, 2, 9, 10, 11.
pub const FOUR_OP_ENABLE: u16 = 0x104;
/// OPL3 mode enable.
pub const OPL3_ENABLE: u16 = 0x105;

impl Chip {
    /// Writes `val` to the register `reg` (bit 8 selects the bank).
    ///
    /// Unknown registers are ignored, as on the real chip.
    pub fn write_reg(&mut self, reg: u16, val: u8) {
        log::trace!("write_reg {:03x} = {:02x}", reg, val);

        let mut ch_offset = 0;
        if (reg & BANK_1) != 0 {
            match reg {
                TEST_OPL3 => return,
                FOUR_OP_ENABLE => {
                    self.set_four_op_enable(val);
                    return;
                }
                OPL3_ENABLE => {
                    self.set_opl3_mode((val & 0x01) != 0);
                    return;
                }
                _ => {}
            }
            //bank 1 starts at channel 9
            ch_offset = 9;
        }

        let reg = (reg & 0xff) as u8;
        match reg & 0xe0 {
            0x00 => match reg & 0x1f {
                NOTE_SELECT => self.reg_08 = val,
                TEST | TIMER_1 | TIMER_2 | TIMER_CONTROL => {}
                _ => {}
            },
            AM_VIB_EG_KSR_MULT => {
                if let Some(slot) = slot_for_offset(reg) {
                    self.set_mul(slot + ch_offset * 2, val);
                }
            }
            KSL_TL => {
                if let Some(slot) = slot_for_offset(reg) {
                    self.set_ksl_tl(slot + ch_offset * 2, val);
                }
            }
            ATTACK_DECAY => {
                if let Some(slot) = slot_for_offset(reg) {
                    self.set_ar_dr(slot + ch_offset * 2, val);
                }
            }
            SUSTAIN_RELEASE => {
                if let Some(slot) = slot_for_offset(reg) {
                    self.set_sl_rr(slot + ch_offset * 2, val);
                }
            }
            FNUM_LOW => {
                if reg == AM_VIB_RHYTHM {
                    //only present in bank 0
                    if ch_offset == 0 {
                        self.write_bd(val);
                    }
                } else if (reg & 0x0f) <= 8 {
                    let channel = (reg & 0x0f) as usize + ch_offset;
                    if (reg & 0xf0) == KEY_BLOCK_FNUM {
                        self.write_key_block_fnum(channel, val);
                    } else {
                        self.write_fnum_low(channel, val);
                    }
                }
            }
            PAN_FB_CONNECTION => {
                if (reg & 0x0f) <= 8 {
                    self.write_connection((reg & 0x0f) as usize + ch_offset, val);
                }
            }
            WAVE_SELECT => {
                if let Some(slot) = slot_for_offset(reg) {
                    self.set_waveform(slot + ch_offset * 2, val);
                }
            }
            _ => {}
        }
    }
}

/// Parses a register write given as `ADDR=VALUE`, both in hex with an
/// optional `0x` prefix (e.g. `0x1b0=0x31` or `b0=31`).
pub fn parse_write(s: &str) -> Result<(u16, u8), Error> {
    let (addr, val) = s
        .split_once('=')
        .ok_or_else(|| Error::InvalidWrite(format!("'{}' is not ADDR=VALUE", s)))?;
    let reg = parse_hex(addr)
        .filter(|&reg| reg <= 0x1ff)
        .ok_or_else(|| Error::InvalidWrite(format!("bad register '{}'", addr.trim())))?;
    let val = parse_hex(val)
        .and_then(|v| u8::try_from(v).ok())
        .ok_or_else(|| Error::InvalidWrite(format!("bad value '{}'", val.trim())))?;
    Ok((reg, val))
}

fn parse_hex(s: &str) -> Option<u16> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).ok()
}
