//! Register engine of the Yamaha YMF262 (OPL3) FM synthesizer.
//!
//! The [`Chip`] takes register writes, either through [`Chip::write_reg`] or
//! the four-port bus interface [`Chip::write`], and keeps every value a
//! sample synthesis stage needs per tick precomputed: phase increments,
//! envelope rates, total level and key scale attenuation, key on state and
//! the output routing of all operators, including 4-op channels and rhythm
//! mode.
//!
//! ```
//! use opl::{Chip, EnvelopePhase, OPL3Settings};
//!
//! let mut chip = Chip::new(OPL3Settings::default());
//! chip.write_reg(0x20, 0x01);
//! chip.write_reg(0xa0, 0x98);
//! chip.write_reg(0xb0, 0x31);
//! assert_eq!(chip.operator(0).envelope(), EnvelopePhase::ATTACK);
//! ```


pub mod channel;
pub mod chip;
mod derive;
pub mod error;
pub mod imf;
pub mod operator;
pub mod registers;
pub mod tables;
pub mod topology;

pub use channel::{Channel, ChannelPair, NUM_CHANNELS, PairRole};
pub use chip::{Chip, NUM_OPERATORS};
pub use error::Error;
pub use operator::{AmAttenuation, Destination, EnvelopePhase, EnvelopeRate, Operator};

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct OPL3Settings {
    /// Scale of the frequency multiple table, 1024 leaves the multiples
    /// unscaled.
    pub pitch_coef: u32,
}

impl Default for OPL3Settings {
    fn default() -> Self {
        OPL3Settings {
            pitch_coef: tables::PITCH_COEF,
        }
    }
}
