use super::*;

use crate::OPL3Settings;
use crate::operator::EnvelopePhase;

fn record_bytes(records: &[(u8, u8, u16)]) -> Vec<u8> {
    let mut data = Vec::new();
    for &(register, value, delay) in records {
        data.push(register);
        data.push(value);
        data.extend_from_slice(&delay.to_le_bytes());
    }
    data
}

#[test]
fn test_parse_raw() {
    let data = record_bytes(&[(0x20, 0x01, 0), (0xb0, 0x31, 300)]);
    let records = parse(&data, ImfFormat::Raw).expect("records");
    assert_eq!(
        records,
        vec![
            ImfRecord {
                register: 0x20,
                value: 0x01,
                delay: 0
            },
            ImfRecord {
                register: 0xb0,
                value: 0x31,
                delay: 300
            },
        ]
    );
}

#[test]
fn test_parse_chunk() {
    let body = record_bytes(&[(0xa0, 0x98, 2), (0xb0, 0x11, 0)]);
    let mut data = (body.len() as u16).to_le_bytes().to_vec();
    data.extend_from_slice(&body);
    //trailing bytes after the chunk (tags) are ignored
    data.extend_from_slice(b"tag");

    let records = parse(&data, ImfFormat::Chunk).expect("records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].register, 0xa0);
    assert_eq!(records[0].delay, 2);
    assert_eq!(records[1].value, 0x11);
}

#[test]
fn test_parse_empty() {
    assert!(parse(&[], ImfFormat::Raw).expect("records").is_empty());
    assert!(parse(&[0, 0], ImfFormat::Chunk).expect("records").is_empty());
    assert!(matches!(
        parse(&[], ImfFormat::Chunk),
        Err(Error::TruncatedRecord { offset: 0 })
    ));
}

#[test]
fn test_parse_truncated() {
    let mut data = record_bytes(&[(0x20, 0x01, 0)]);
    data.extend_from_slice(&[0x40, 0x10]);
    assert!(matches!(
        parse(&data, ImfFormat::Raw),
        Err(Error::TruncatedRecord { offset: 4 })
    ));
}

#[test]
fn test_parse_length_mismatch() {
    let mut data = 16u16.to_le_bytes().to_vec();
    data.extend_from_slice(&record_bytes(&[(0x20, 0x01, 0)]));
    assert!(matches!(
        parse(&data, ImfFormat::Chunk),
        Err(Error::LengthMismatch {
            declared: 16,
            available: 4
        })
    ));
}

#[test]
fn test_player_timing() {
    let records = parse(
        &record_bytes(&[(0x20, 0x01, 0), (0xa0, 0x98, 3), (0xb0, 0x31, 0)]),
        ImfFormat::Raw,
    )
    .expect("records");
    let mut chip = Chip::new(OPL3Settings::default());
    let mut player = ImfPlayer::new(records);

    //first two records are written on tick 0, the key on three ticks later
    assert!(player.tick(&mut chip));
    assert_eq!(player.position(), 2);
    assert_eq!(chip.channel(0).block_fnum(), 0x98);
    assert_eq!(chip.operator(0).envelope(), EnvelopePhase::OFF);

    assert!(player.tick(&mut chip));
    assert!(player.tick(&mut chip));
    assert_eq!(player.position(), 2);

    assert!(!player.tick(&mut chip));
    assert!(player.finished());
    assert_eq!(player.time(), 4);
    assert_eq!(chip.operator(0).envelope(), EnvelopePhase::ATTACK);
    assert_eq!(chip.operator(1).envelope(), EnvelopePhase::ATTACK);
}

#[test]
fn test_player_rewind() {
    let records = parse(&record_bytes(&[(0xbd, 0xe0, 1)]), ImfFormat::Raw).expect("records");
    let mut player = ImfPlayer::new(records);
    let mut chip = Chip::default();

    assert!(!player.tick(&mut chip));
    assert!(chip.rhythm_mode());

    player.rewind();
    chip.reset();
    assert!(!player.finished());
    assert_eq!(player.time(), 0);
    assert_eq!(player.position(), 0);
    assert!(!chip.rhythm_mode());

    player.tick(&mut chip);
    assert!(chip.rhythm_mode());
    assert_eq!(player.records().len(), 1);
}

#[test]
fn test_load_missing_file() {
    let path = std::path::Path::new("/nonexistent/track.imf");
    assert!(matches!(load(path, ImfFormat::Raw), Err(Error::Io(_))));
}
