//! Operator interconnection of 2-op and 4-op channels.

#[cfg(test)]
#[path = "./topology_test.rs"]
mod topology_test;

use crate::channel::ChannelPair;
use crate::operator::Destination;

/// Destinations of operator 0 and 1 of an independent channel.
pub fn two_op_routing(channel: usize, connection: bool) -> [Destination; 2] {
    let op0 = if connection {
        Destination::ChannelOutput(channel)
    } else {
        Destination::PhaseModA
    };
    [op0, Destination::ChannelOutput(channel)]
}

/// Destinations of the four operators of an active 4-op channel, in the
/// order primary op 0, primary op 1, secondary op 0, secondary op 1.
///
/// `code` is the primary's connection bit shifted left by one, or'ed with
/// the secondary's connection bit.
pub fn four_op_routing(pair: ChannelPair, code: u8) -> [Destination; 4] {
    let primary_out = Destination::ChannelOutput(pair.primary());
    let secondary_out = Destination::ChannelOutput(pair.secondary());
    match code & 3 {
        // 1 -> 2 -> 3 -> 4 -> out
        0 => [
            Destination::PhaseModA,
            Destination::PhaseModB,
            Destination::PhaseModA,
            secondary_out,
        ],
        // 1 -> 2 -\
        // 3 -> 4 -+- out
        1 => [
            Destination::PhaseModA,
            primary_out,
            Destination::PhaseModA,
            secondary_out,
        ],
        // 1 -----------\
        // 2 -> 3 -> 4 -+- out
        2 => [
            primary_out,
            Destination::PhaseModB,
            Destination::PhaseModA,
            secondary_out,
        ],
        // 1 ------\
        // 2 -> 3 -+- out
        // 4 ------/
        _ => [
            primary_out,
            Destination::PhaseModB,
            secondary_out,
            secondary_out,
        ],
    }
}

/// Combined 2 bit connection code of a 4-op channel.
pub fn connection_code(primary_connection: bool, secondary_connection: bool) -> u8 {
    ((primary_connection as u8) << 1) | secondary_connection as u8
}
