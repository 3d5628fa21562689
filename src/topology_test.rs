use super::*;

use crate::operator::Destination::*;

#[test]
fn test_two_op_routing() {
    assert_eq!(two_op_routing(4, false), [PhaseModA, ChannelOutput(4)]);
    assert_eq!(two_op_routing(4, true), [ChannelOutput(4), ChannelOutput(4)]);
}

#[test]
fn test_connection_code() {
    assert_eq!(connection_code(false, false), 0);
    assert_eq!(connection_code(false, true), 1);
    assert_eq!(connection_code(true, false), 2);
    assert_eq!(connection_code(true, true), 3);
}

#[test]
fn test_four_op_routing() {
    let pair = ChannelPair::new(1).expect("valid pair");
    assert_eq!(
        four_op_routing(pair, 0),
        [PhaseModA, PhaseModB, PhaseModA, ChannelOutput(4)]
    );
    assert_eq!(
        four_op_routing(pair, 1),
        [PhaseModA, ChannelOutput(1), PhaseModA, ChannelOutput(4)]
    );
    assert_eq!(
        four_op_routing(pair, 2),
        [ChannelOutput(1), PhaseModB, PhaseModA, ChannelOutput(4)]
    );
    assert_eq!(
        four_op_routing(pair, 3),
        [ChannelOutput(1), PhaseModB, ChannelOutput(4), ChannelOutput(4)]
    );
}

#[test]
fn test_four_op_last_operator_always_outputs() {
    let pair = ChannelPair::new(11).expect("valid pair");
    for code in 0..4 {
        assert_eq!(four_op_routing(pair, code)[3], ChannelOutput(14));
    }
}
