use clap::Parser;
use opl::{
    Chip, EnvelopePhase, NUM_CHANNELS, OPL3Settings,
    imf::{self, ImfFormat, ImfPlayer},
};
use ratatui::{
    DefaultTerminal, Frame,
    crossterm::event::{self, Event, KeyCode, KeyEventKind},
    layout::{Constraint, Layout},
    style::{Color, Style, Stylize},
    widgets::{Block, Borders, Paragraph, Row, Table},
};
use simplelog::WriteLogger;
use std::{fs::File, path::PathBuf};

/// Steps through an IMF register log and shows the channel state after
/// every tick.
#[derive(Parser)]
struct Cli {
    /// IMF register log to step through.
    file: PathBuf,
    /// The IMF file starts with a 2 byte length (type 1 IMF).
    #[arg(short, long)]
    chunk: bool,
    /// Ticks to advance per step.
    #[arg(short, long, default_value_t = 1)]
    step: u32,
    /// Write a trace log of all register writes to this file.
    #[arg(short, long)]
    log_file: Option<PathBuf>,
}

struct Monitor {
    chip: Chip,
    player: ImfPlayer,
    step: u32,
}

impl Monitor {
    fn advance(&mut self) {
        for _ in 0..self.step {
            if !self.player.tick(&mut self.chip) {
                break;
            }
        }
    }

    fn restart(&mut self) {
        self.player.rewind();
        self.chip.reset();
    }
}

pub fn main() -> Result<(), String> {
    let args = Cli::parse();

    if let Some(path) = &args.log_file {
        let file = File::create(path).map_err(|e| e.to_string())?;
        WriteLogger::init(log::LevelFilter::Trace, simplelog::Config::default(), file)
            .map_err(|e| e.to_string())?;
    }

    let format = if args.chunk {
        ImfFormat::Chunk
    } else {
        ImfFormat::Raw
    };
    let records = imf::load(&args.file, format).map_err(|e| e.to_string())?;

    let mut monitor = Monitor {
        chip: Chip::new(OPL3Settings::default()),
        player: ImfPlayer::new(records),
        step: args.step.max(1),
    };

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut monitor);
    ratatui::restore();
    result
}

fn run(terminal: &mut DefaultTerminal, monitor: &mut Monitor) -> Result<(), String> {
    loop {
        terminal
            .draw(|frame| draw(frame, monitor))
            .map_err(|e| e.to_string())?;

        if let Event::Key(key) = event::read().map_err(|e| e.to_string())? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') | KeyCode::Char('n') => monitor.advance(),
                    KeyCode::Char('r') => monitor.restart(),
                    _ => { /* ignore */ }
                }
            }
        }
    }
}

fn draw(frame: &mut Frame, monitor: &Monitor) {
    let [status_area, table_area, help_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(NUM_CHANNELS as u16 + 3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let chip = &monitor.chip;
    let player = &monitor.player;
    let status = format!(
        "tick {}  write {}/{}{}  OPL3 {}  rhythm {}",
        player.time(),
        player.position(),
        player.records().len(),
        if player.finished() { " (end)" } else { "" },
        on_off(chip.opl3_mode()),
        on_off(chip.rhythm_mode()),
    );
    frame.render_widget(
        Paragraph::new(status).block(Block::default().borders(Borders::ALL).title("opl3-monitor")),
        status_area,
    );

    let rows = (0..NUM_CHANNELS).map(|ch| {
        let channel = chip.channel(ch);
        let op0 = channel.op(0);
        let op1 = channel.op(1);
        let role = match chip.active_pair(ch) {
            Some(pair) if pair.primary() == ch => "4op",
            Some(_) => "4op+",
            None => "",
        };
        let style = if op0.envelope() == EnvelopePhase::ATTACK
            || op1.envelope() == EnvelopePhase::ATTACK
        {
            Style::default().fg(Color::Yellow)
        } else if op0.key() != 0 || op1.key() != 0 {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        Row::new(vec![
            format!("{}", ch),
            format!("{}", channel.block_fnum() >> 10),
            format!("{:03x}", channel.block_fnum() & 0x3ff),
            format!("{}", channel.key_code()),
            format!("{:?}", op0.envelope()),
            format!("{:?}", op1.envelope()),
            format!("{}", op0.am_attenuation().attenuation()),
            format!("{}", op1.am_attenuation().attenuation()),
            format!("{}", op0.feedback()),
            role.to_string(),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Length(5),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![
                "ch", "block", "fnum", "kc", "env 0", "env 1", "att 0", "att 1", "fb", "pair",
            ])
            .bold(),
        )
        .block(Block::default().borders(Borders::ALL).title("channels"));
    frame.render_widget(table, table_area);

    frame.render_widget(
        Paragraph::new("space/n: step  r: restart  q: quit").dim(),
        help_area,
    );
}

fn on_off(b: bool) -> &'static str {
    if b { "on" } else { "off" }
}
