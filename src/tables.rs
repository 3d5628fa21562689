//! Static lookup tables of the YMF262 register engine.

/// Default frequency pre-scale applied to the multiple table so that the
/// phase increment lands in the synthesis stage's fixed-point domain.
pub const PITCH_COEF: u32 = 1154;

pub const ENV_BITS: u32 = 10;
/// Fully attenuated envelope volume.
pub const MAX_ATT_INDEX: u16 = (1 << (ENV_BITS - 1)) - 1;

/// Stride of one rate step in the envelope rate-select table.
pub const RATE_STEPS: u8 = 8;

/// Rate indices at or above this value are only reachable by attack rate 15
/// and take zero time on the YMF262.
pub const RATE_INDEX_INSTANT: u8 = 16 + 60;

//mapping of register offset (low 5 bits) to slot number, -1 = no operator
pub static SLOT_ARRAY: [i8; 32] = [
    0, 2, 4, 1, 3, 5, -1, -1, 6, 8, 10, 7, 9, 11, -1, -1, 12, 14, 16, 13, 15, 17, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1,
];

//key scale level base, indexed by block_fnum >> 6 (block * 16 + upper 4 fnum bits)
#[rustfmt::skip]
pub static KSL_TAB: [u8; 8 * 16] = [
    // block 0
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // block 1
    0, 0, 0, 0, 0, 0, 0, 0, 0, 8, 12, 16, 20, 24, 28, 32,
    // block 2
    0, 0, 0, 0, 0, 12, 20, 28, 32, 40, 44, 48, 52, 56, 60, 64,
    // block 3
    0, 0, 0, 20, 32, 44, 52, 60, 64, 72, 76, 80, 84, 88, 92, 96,
    // block 4
    0, 0, 32, 52, 64, 76, 84, 92, 96, 104, 108, 112, 116, 120, 124, 128,
    // block 5
    0, 32, 64, 84, 96, 108, 116, 124, 128, 136, 140, 144, 148, 152, 156, 160,
    // block 6
    0, 64, 96, 116, 128, 140, 148, 156, 160, 168, 172, 176, 180, 184, 188, 192,
    // block 7
    0, 96, 128, 148, 160, 172, 180, 188, 192, 200, 204, 208, 212, 216, 220, 224,
];

//0 / 3.0 / 1.5 / 6.0 dB/OCT; 31 shifts the base out entirely
pub static KSL_SHIFT: [u8; 4] = [31, 1, 2, 0];

//sustain level, 3dB steps with SL=15 mapped to 93dB
pub static SL_TAB: [u8; 16] = [
    0, 8, 16, 24, 32, 40, 48, 56, 64, 72, 80, 88, 96, 104, 112, 248,
];

#[rustfmt::skip]
pub static EG_RATE_SELECT: [u8; 16 + 64 + 16] = [
    // 16 infinite time rates
    112, 112, 112, 112, 112, 112, 112, 112, 112, 112, 112, 112, 112, 112, 112, 112,
    // rates 00-11
    0, 8, 16, 24, 0, 8, 16, 24, 0, 8, 16, 24, 0, 8, 16, 24,
    0, 8, 16, 24, 0, 8, 16, 24, 0, 8, 16, 24, 0, 8, 16, 24,
    0, 8, 16, 24, 0, 8, 16, 24, 0, 8, 16, 24, 0, 8, 16, 24,
    // rate 12
    0, 8, 16, 24,
    // rate 13
    32, 40, 48, 56,
    // rate 14
    64, 72, 80, 88,
    // rate 15
    96, 96, 96, 96,
    // 16 dummy rates (same as 15 3)
    96, 96, 96, 96, 96, 96, 96, 96, 96, 96, 96, 96, 96, 96, 96, 96,
];

#[rustfmt::skip]
pub static EG_RATE_SHIFT: [u8; 16 + 64 + 16] = [
    // 16 infinite time rates
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // rates 00-11
    12, 12, 12, 12, 11, 11, 11, 11, 10, 10, 10, 10, 9, 9, 9, 9,
    8, 8, 8, 8, 7, 7, 7, 7, 6, 6, 6, 6, 5, 5, 5, 5,
    4, 4, 4, 4, 3, 3, 3, 3, 2, 2, 2, 2, 1, 1, 1, 1,
    // rates 12-15
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    // 16 dummy rates
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
];

//frequency multiple, doubled so that MULT=0 (x0.5) stays integral
pub static MUL_TAB: [u8; 16] = [1, 2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 20, 24, 24, 30, 30];

/// Resolves the low five bits of an operator register to a slot within one
/// register bank (0-17).
pub fn slot_for_offset(offset: u8) -> Option<usize> {
    let slot = SLOT_ARRAY[(offset & 0x1f) as usize];
    if slot < 0 { None } else { Some(slot as usize) }
}
