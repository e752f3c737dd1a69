//! Headless runner.
//!
//! Commands are produced on a separate thread (stdin lines or a scripted
//! list) and delivered over a channel. Only the loop that owns the
//! [`GameState`] drains that channel, so game state is never touched from
//! another thread.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use crate::core::{EngineConfig, GameState, Session};
use crate::types::{Command, GameEvent};

/// Default frame length (~60 FPS)
pub const DEFAULT_FRAME_MS: u32 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub seed: Option<u32>,
    pub config_path: Option<PathBuf>,
    pub frame_ms: u32,
    pub max_frames: Option<u64>,
    /// Comma or whitespace separated commands, one per frame
    pub script: Option<String>,
    pub games: u32,
    pub json: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: None,
            config_path: None,
            frame_ms: DEFAULT_FRAME_MS,
            max_frames: None,
            script: None,
            games: 1,
            json: false,
        }
    }
}

/// Messages from an input producer to the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Quit,
}

pub fn parse_args(args: &[String]) -> Result<RunOptions> {
    let mut options = RunOptions::default();
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || {
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| anyhow!("missing value for {}", flag))
        };
        match flag {
            "--seed" => {
                let v = value()?;
                options.seed = Some(v.parse().map_err(|_| anyhow!("invalid --seed value: {}", v))?);
            }
            "--config" => options.config_path = Some(PathBuf::from(value()?)),
            "--frame-ms" => {
                let v = value()?;
                options.frame_ms = v
                    .parse()
                    .ok()
                    .filter(|&ms: &u32| ms > 0)
                    .ok_or_else(|| anyhow!("invalid --frame-ms value: {}", v))?;
            }
            "--max-frames" => {
                let v = value()?;
                options.max_frames =
                    Some(v.parse().map_err(|_| anyhow!("invalid --max-frames value: {}", v))?);
            }
            "--games" => {
                let v = value()?;
                options.games = v
                    .parse()
                    .ok()
                    .filter(|&n: &u32| n > 0)
                    .ok_or_else(|| anyhow!("invalid --games value: {}", v))?;
            }
            "--script" => options.script = Some(value()?),
            "--json" => options.json = true,
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(options)
}

/// Parse one token of user input
pub fn parse_input(token: &str) -> Option<Input> {
    match token.trim().to_lowercase().as_str() {
        "quit" | "q" | "exit" => Some(Input::Quit),
        other => Command::from_str(other).map(Input::Command),
    }
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

/// Send each scripted command on its own frame, then hang up
pub fn spawn_script_source(script: String, frame: Duration, tx: Sender<Input>) {
    thread::spawn(move || {
        for token in tokens(&script) {
            match parse_input(token) {
                Some(input) => {
                    if tx.send(input).is_err() {
                        return;
                    }
                }
                None => warn!(token, "ignoring unknown scripted command"),
            }
            thread::sleep(frame);
        }
    });
}

/// Forward commands typed on stdin, one or more per line
pub fn spawn_stdin_source(tx: Sender<Input>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                return;
            };
            for token in tokens(&line) {
                match parse_input(token) {
                    Some(input) => {
                        if tx.send(input).is_err() {
                            return;
                        }
                    }
                    None => warn!(token, "ignoring unknown command"),
                }
            }
        }
        let _ = tx.send(Input::Quit);
    });
}

/// Commands waiting in the channel, in arrival order, plus whether to quit
///
/// A hung-up producer is not a quit: the game keeps falling without input.
pub fn drain_inputs(rx: &Receiver<Input>) -> (Vec<Command>, bool) {
    let mut commands = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(Input::Command(command)) => commands.push(command),
            Ok(Input::Quit) => return (commands, true),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                return (commands, false)
            }
        }
    }
}

fn load_config(options: &RunOptions) -> Result<EngineConfig> {
    let mut config = match &options.config_path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if options.seed.is_some() {
        config.seed = options.seed;
    }
    config.validate().context("validating config")?;
    Ok(config)
}

/// How a single game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    GameOver,
    FrameLimit,
    Quit,
}

/// Drive one game until it ends, pacing frames in real time
pub fn play(
    game: &mut GameState,
    rx: &Receiver<Input>,
    frame_ms: u32,
    max_frames: Option<u64>,
) -> GameEnd {
    let frame = Duration::from_millis(frame_ms as u64);
    let mut frames: u64 = 0;

    loop {
        let started = Instant::now();
        let (commands, quit) = drain_inputs(rx);
        if !commands.is_empty() {
            debug!(?commands, "applying commands");
        }

        for event in game.step(frame_ms, &commands) {
            match event {
                GameEvent::RowsCleared { rows } => {
                    info!(rows, score = game.score(), "cleared")
                }
                GameEvent::GameOver { final_score } => info!(final_score, "game over"),
            }
        }

        if game.is_terminal() {
            return GameEnd::GameOver;
        }
        if quit {
            return GameEnd::Quit;
        }
        frames += 1;
        if max_frames.is_some_and(|max| frames >= max) {
            return GameEnd::FrameLimit;
        }

        if let Some(rest) = frame.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
}

fn print_game(out: &mut impl Write, game: &GameState, json: bool) -> Result<()> {
    let snapshot = game.snapshot();
    if json {
        serde_json::to_writer_pretty(&mut *out, &snapshot)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", snapshot)?;
    }
    Ok(())
}

pub fn run(options: RunOptions) -> Result<Session> {
    let config = load_config(&options)?;
    let (tx, rx) = mpsc::channel::<Input>();
    match options.script.clone() {
        Some(script) => {
            spawn_script_source(script, Duration::from_millis(options.frame_ms as u64), tx)
        }
        None => spawn_stdin_source(tx),
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut session = Session::new(config);

    for _ in 0..options.games {
        let game = session.start_game();
        info!(seed = game.seed(), "starting game");
        let end = play(game, &rx, options.frame_ms, options.max_frames);
        print_game(&mut out, game, options.json)?;
        session.finish_game();
        if end == GameEnd::Quit {
            break;
        }
    }

    writeln!(
        out,
        "games {}  last {}  best {}",
        session.games_played(),
        session.last_score().unwrap_or(0),
        session.best_score()
    )?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_defaults() {
        assert_eq!(parse_args(&[]).unwrap(), RunOptions::default());
    }

    #[test]
    fn parse_all_flags() {
        let options = parse_args(&args(&[
            "--seed",
            "9",
            "--frame-ms",
            "20",
            "--max-frames",
            "100",
            "--games",
            "3",
            "--script",
            "left,drop",
            "--json",
        ]))
        .unwrap();
        assert_eq!(options.seed, Some(9));
        assert_eq!(options.frame_ms, 20);
        assert_eq!(options.max_frames, Some(100));
        assert_eq!(options.games, 3);
        assert_eq!(options.script.as_deref(), Some("left,drop"));
        assert!(options.json);
    }

    #[test]
    fn parse_rejects_bad_values() {
        assert!(parse_args(&args(&["--seed"])).is_err());
        assert!(parse_args(&args(&["--seed", "x"])).is_err());
        assert!(parse_args(&args(&["--frame-ms", "0"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn input_tokens() {
        assert_eq!(parse_input("LEFT"), Some(Input::Command(Command::MoveLeft)));
        assert_eq!(parse_input("q"), Some(Input::Quit));
        assert_eq!(parse_input("hold"), None);
    }

    #[test]
    fn drain_keeps_order_and_stops_at_quit() {
        let (tx, rx) = mpsc::channel();
        tx.send(Input::Command(Command::MoveLeft)).unwrap();
        tx.send(Input::Command(Command::Rotate)).unwrap();
        tx.send(Input::Quit).unwrap();
        tx.send(Input::Command(Command::HardDrop)).unwrap();

        let (commands, quit) = drain_inputs(&rx);
        assert_eq!(commands, vec![Command::MoveLeft, Command::Rotate]);
        assert!(quit);

        drop(tx);
        let (commands, quit) = drain_inputs(&rx);
        assert_eq!(commands, vec![Command::HardDrop]);
        assert!(!quit);
    }

    #[test]
    fn play_stops_at_frame_limit() {
        let (_tx, rx) = mpsc::channel();
        let mut game = GameState::new(3);
        let end = play(&mut game, &rx, 1, Some(5));
        assert_eq!(end, GameEnd::FrameLimit);
        assert!(!game.is_terminal());
    }

    #[test]
    fn play_reports_quit() {
        let (tx, rx) = mpsc::channel();
        tx.send(Input::Quit).unwrap();
        let mut game = GameState::new(3);
        assert_eq!(play(&mut game, &rx, 1, None), GameEnd::Quit);
    }

    #[test]
    fn play_runs_until_game_over() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..200 {
            tx.send(Input::Command(Command::HardDrop)).unwrap();
        }
        drop(tx);
        let mut game = GameState::new(11);
        assert_eq!(play(&mut game, &rx, 1, Some(10_000)), GameEnd::GameOver);
        assert!(game.is_terminal());
    }
}
