use clap::Parser;
use opl::{
    Chip, NUM_CHANNELS, OPL3Settings,
    imf::{self, ImfFormat, ImfPlayer},
    registers::parse_write,
};
use simplelog::TermLogger;
use std::path::PathBuf;

/// Replays register writes into the register engine and prints the
/// resulting channel and operator state.
#[derive(Parser)]
struct Cli {
    /// IMF register log to replay.
    file: Option<PathBuf>,
    /// The IMF file starts with a 2 byte length (type 1 IMF).
    #[arg(short, long)]
    chunk: bool,
    /// Stop the replay after this many ticks.
    #[arg(short, long)]
    ticks: Option<u32>,
    /// Register write ADDR=VALUE (hex) applied before the replay, e.g.
    /// 0x105=1 to enable OPL3 mode.
    #[arg(short, long = "write")]
    writes: Vec<String>,
    /// Show all channels, not only the keyed ones.
    #[arg(short, long)]
    all: bool,
    /// Log level, repeat for more output.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

pub fn main() -> Result<(), String> {
    let args = Cli::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .map_err(|e| e.to_string())?;

    let writes = args
        .writes
        .iter()
        .map(|w| parse_write(w))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let mut chip = Chip::new(OPL3Settings::default());
    for (reg, val) in writes {
        chip.write_reg(reg, val);
    }

    if let Some(path) = &args.file {
        let format = if args.chunk {
            ImfFormat::Chunk
        } else {
            ImfFormat::Raw
        };
        let records = imf::load(path, format).map_err(|e| e.to_string())?;
        let mut player = ImfPlayer::new(records);
        while player.tick(&mut chip) {
            if args.ticks.is_some_and(|t| player.time() >= t) {
                break;
            }
        }
        println!(
            "replayed {}/{} writes in {} ticks",
            player.position(),
            player.records().len(),
            player.time()
        );
    }

    print_chip(&chip, args.all);
    Ok(())
}

fn print_chip(chip: &Chip, all: bool) {
    println!(
        "OPL3 {} rhythm {} AM depth {} vibrato depth {} NTS {}",
        on_off(chip.opl3_mode()),
        on_off(chip.rhythm_mode()),
        if chip.am_depth() { "4.8dB" } else { "1dB" },
        if chip.vibrato_depth() != 0 { "14c" } else { "7c" },
        on_off(chip.note_select()),
    );

    for ch in 0..NUM_CHANNELS {
        let channel = chip.channel(ch);
        let keyed = channel.op(0).key() != 0 || channel.op(1).key() != 0;
        if !all && !keyed {
            continue;
        }

        let pair = match chip.active_pair(ch) {
            Some(pair) => format!(" 4-op {}/{}", pair.primary(), pair.secondary()),
            None => String::new(),
        };
        println!(
            "ch {:2} block {} fnum {:3x} kc {:2} pan {}{}{}",
            ch,
            channel.block_fnum() >> 10,
            channel.block_fnum() & 0x3ff,
            channel.key_code(),
            if chip.pan_left(ch) { "L" } else { "-" },
            if chip.pan_right(ch) { "R" } else { "-" },
            pair,
        );
        for ix in 0..2 {
            let op = channel.op(ix);
            println!(
                "    op {:2} key {:02b} {:7} vol {:3} inc {:6} mul {:5} ar {:3} dr {:3} sl {:3} rr {:3} att {:3}{} wave {} fb {} -> {:?}",
                ch * 2 + ix,
                op.key(),
                format!("{:?}", op.envelope()),
                op.volume(),
                op.increment(),
                op.multiple(),
                op.attack_rate(),
                op.decay_rate(),
                op.sustain_level(),
                op.release_rate(),
                op.am_attenuation().attenuation(),
                if op.am_attenuation().am() { " AM" } else { "" },
                op.waveform(),
                op.feedback(),
                op.destination(),
            );
        }
    }
}

fn on_off(b: bool) -> &'static str {
    if b { "on" } else { "off" }
}
