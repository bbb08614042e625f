//! go-match: play or evaluate capture-game matches.
//!
//! ## Usage
//!
//! - `go-match play` - Greedy agent (Black) against you (White) in the terminal
//! - `go-match play --black human --white random` - Choose who plays each color
//! - `go-match eval -n 100 --white random` - Run 100 agent matches and report rates

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use go_match::agent::{GreedyAgent, RandomAgent};
use go_match::batch::{BatchEvaluator, Verdict};
use go_match::board::Board;
use go_match::constants::N;
use go_match::game::{Match, MatchConfig, MatchOutcome};
use go_match::input::{CancelToken, HumanInput};
use go_match::player::PlayerSource;
use go_match::render::Renderer;
use go_match::rules::Color;
use go_match::terminal::{TerminalEvents, TerminalRenderer, terminal_transform};

/// go-match: orchestrate capture-game matches between agents and humans
#[derive(Parser)]
#[command(name = "go-match")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single match in the terminal
    Play(MatchArgs),
    /// Run repeated matches and report win and draw rates
    Eval {
        /// Number of matches to run
        #[arg(short = 'n', long, default_value_t = 10)]
        games: usize,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        args: MatchArgs,
    },
}

#[derive(Args, Clone)]
struct MatchArgs {
    /// Who plays Black
    #[arg(long, value_enum, default_value_t = PlayerKind::Greedy)]
    black: PlayerKind,
    /// Who plays White
    #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
    white: PlayerKind,
    /// Render agent-only matches in the terminal
    #[arg(long)]
    render: bool,
    /// Save a snapshot of the final board into this directory
    #[arg(long)]
    save_dir: Option<PathBuf>,
    /// Seed for agent randomness
    #[arg(long)]
    seed: Option<u64>,
    /// Pause before each agent move when rendering, in milliseconds
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,
    /// Print per-match details
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PlayerKind {
    Human,
    Random,
    Greedy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let res = match cli.command {
        Some(Commands::Play(args)) => run_play(&args),
        Some(Commands::Eval { games, json, args }) => run_eval(games, json, &args),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    match res {
        Err(e) if matches!(e.downcast_ref::<go_match::Error>(), Some(go_match::Error::Aborted)) => {
            eprintln!("Quit requested, stopping.");
            Ok(())
        }
        other => other,
    }
}

fn player(kind: PlayerKind, seed: Option<u64>, cancel: &CancelToken) -> PlayerSource<Board> {
    match kind {
        PlayerKind::Human => PlayerSource::Human(HumanInput::new(
            Box::new(TerminalEvents),
            terminal_transform(N),
            cancel.clone(),
        )),
        PlayerKind::Random => {
            PlayerSource::agent(seed.map_or_else(RandomAgent::new, RandomAgent::with_seed))
        }
        PlayerKind::Greedy => {
            PlayerSource::agent(seed.map_or_else(GreedyAgent::new, GreedyAgent::with_seed))
        }
    }
}

fn build_match(args: &MatchArgs, index: usize, cancel: &CancelToken) -> go_match::Result<Match<Board>> {
    let seed = |offset: u64| {
        args.seed
            .map(|s| s.wrapping_add(2 * index as u64 + offset))
    };
    let black = player(args.black, seed(0), cancel);
    let white = player(args.white, seed(1), cancel);

    let renderer: Option<Box<dyn Renderer>> = if is_rendered(args) {
        Some(Box::new(TerminalRenderer::new()))
    } else {
        None
    };

    let mut config = MatchConfig::default().with_agent_delay(Duration::from_millis(args.delay_ms));
    if let Some(dir) = &args.save_dir {
        config = config.with_dir_save(dir);
    }
    let game = Match::new(black, white, Board::new(), renderer, config)?;
    Ok(if is_rendered(args) {
        game.with_events(Box::new(TerminalEvents), cancel.clone())
    } else {
        game
    })
}

fn is_rendered(args: &MatchArgs) -> bool {
    args.render || args.black == PlayerKind::Human || args.white == PlayerKind::Human
}

fn ensure_save_dir(args: &MatchArgs) -> Result<()> {
    if let Some(dir) = &args.save_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create snapshot directory {}", dir.display()))?;
    }
    Ok(())
}

fn run_play(args: &MatchArgs) -> Result<()> {
    ensure_save_dir(args)?;
    let cancel = CancelToken::new();
    let mut game = build_match(args, 0, &cancel).context("failed to set up match")?;
    let players = format!(
        "BLACK ({}) vs WHITE ({})",
        game.player(Color::Black).name(),
        game.player(Color::White).name()
    );
    let res = game.start();
    // restore the terminal before printing anything
    drop(game);
    let outcome = res?;

    println!("{players}");
    for notice in &outcome.notices {
        println!("{notice}");
    }
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &MatchOutcome) {
    println!("{}", describe(outcome));
    println!("Match ends in {:.3} seconds", outcome.elapsed.as_secs_f64());
    println!("Match ends in {} moves", outcome.moves);
}

fn run_eval(games: usize, json: bool, args: &MatchArgs) -> Result<()> {
    ensure_save_dir(args)?;
    let cancel = CancelToken::new();
    let rendered = is_rendered(args);

    let pb = if rendered {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("Progress: [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} matches ({msg})")
                .context("invalid progress bar template")?
                .progress_chars("=>-"),
        );
        pb
    };

    let mut eval = BatchEvaluator::new();
    let (mut black, mut white, mut draws) = (0, 0, 0);
    let report = eval.run(
        games,
        |i| build_match(args, i, &cancel),
        |i, outcome, verdict| {
            match verdict {
                Verdict::BlackWin => black += 1,
                Verdict::WhiteWin => white += 1,
                Verdict::Draw => draws += 1,
            }
            // a hidden bar drops println, and the terminal is restored by now
            let say = |line: String| {
                if pb.is_hidden() {
                    println!("{line}");
                } else {
                    pb.println(line);
                }
            };
            for notice in &outcome.notices {
                say(format!("match {}: {notice}", i + 1));
            }
            if rendered || args.verbose {
                say(match_line(i, outcome));
            }
            pb.set_message(format!("B:{black} W:{white} D:{draws}"));
            pb.inc(1);
        },
    )?;
    pb.finish_and_clear();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        );
    } else {
        println!("{report}");
        if args.verbose {
            println!("Mean match length: {:.1} moves", report.mean_moves());
            println!("Mean match time: {:.3} seconds", report.mean_seconds());
        }
    }
    Ok(())
}

fn match_line(index: usize, outcome: &MatchOutcome) -> String {
    format!(
        "match {}: {} in {} moves, {:.3}s",
        index + 1,
        describe(outcome),
        outcome.moves,
        outcome.elapsed.as_secs_f64()
    )
}

fn describe(outcome: &MatchOutcome) -> &'static str {
    match Verdict::classify(outcome) {
        Verdict::BlackWin => "BLACK wins",
        Verdict::WhiteWin => "WHITE wins",
        Verdict::Draw if outcome.early_termination => "draw (no legal action)",
        Verdict::Draw => "draw",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(winner: Option<Color>, early: bool) -> MatchOutcome {
        MatchOutcome {
            winner,
            early_termination: early,
            moves: 42,
            elapsed: Duration::from_millis(1250),
            snapshot: None,
            notices: Vec::new(),
        }
    }

    #[test]
    fn test_match_line() {
        assert_eq!(
            match_line(0, &outcome(Some(Color::White), false)),
            "match 1: WHITE wins in 42 moves, 1.250s"
        );
        assert_eq!(
            match_line(4, &outcome(Some(Color::White), true)),
            "match 5: draw (no legal action) in 42 moves, 1.250s"
        );
    }

    #[test]
    fn test_rendered_when_human_plays() {
        let args = Cli::parse_from(["go-match", "eval", "--white", "random"]);
        let Some(Commands::Eval { args, .. }) = args.command else {
            panic!("expected eval");
        };
        assert!(!is_rendered(&args));
        let args = MatchArgs { black: PlayerKind::Human, ..args };
        assert!(is_rendered(&args));
    }
}
