use super::*;

#[test]
fn test_parse_write() {
    assert_eq!(parse_write("0x1b0=0x31").expect("write"), (0x1b0, 0x31));
    assert_eq!(parse_write("bd=E0").expect("write"), (0xbd, 0xe0));
    assert_eq!(parse_write(" 0X105 = 1 ").expect("write"), (0x105, 0x01));
}

#[test]
fn test_parse_write_invalid() {
    for s in ["", "0x20", "0x200=1", "0x20=0x100", "zz=1", "0x20=", "=1"] {
        assert!(
            matches!(parse_write(s), Err(Error::InvalidWrite(_))),
            "accepted '{}'",
            s
        );
    }
}

#[test]
fn test_timer_registers_ignored() {
    let mut chip = Chip::default();
    let before = chip.clone();
    for reg in [TEST, TIMER_1, TIMER_2, TIMER_CONTROL] {
        chip.write_reg(reg as u16, 0xff);
    }
    chip.write_reg(TEST_OPL3, 0xff);
    assert_eq!(chip, before);
}

#[test]
fn test_bank_1_channel_offset() {
    let mut chip = Chip::default();
    chip.write_reg(BANK_1 | FNUM_LOW as u16 | 2, 0x44);
    chip.write_reg(BANK_1 | PAN_FB_CONNECTION as u16 | 2, 0x01);
    assert_eq!(chip.channel(11).block_fnum(), 0x44);
    assert!(chip.channel(11).op(0).connection());
    assert_eq!(chip.channel(2).block_fnum(), 0);
}
