//! The match controller: runs one game from the opening move to a winner.
//!
//! A match runs in one of two modes, fixed at construction:
//!
//! - **Rendered**: a [`Renderer`] is attached. Every candidate move is
//!   checked against the legal-action set; illegal candidates are dropped
//!   and the same side is asked again. After each accepted move the old
//!   candidate markers are erased, the stone is drawn, and either the new
//!   candidates or the captured groups are updated.
//! - **Headless**: no renderer, both sides are agents. Agent moves are
//!   applied directly. Debug builds still check each move and fail with
//!   [`Error::ContractViolation`]; release builds trust the agent.
//!
//! Both modes stop exactly when the rules engine reports a winner.
//!
//! While an agent moves in rendered mode, pending input attached with
//! [`Match::with_events`] is drained: stray presses are dropped so they
//! cannot become the next human move, and a quit aborts the match.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::constants::{AGENT_DELAY, CANDIDATE_SIZE, center};
use crate::error::{Error, Result};
use crate::input::{CancelToken, EventSource, drain_events};
use crate::player::PlayerSource;
use crate::render::{Marker, Renderer};
use crate::rules::{Color, Point, RulesEngine};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    Rendered,
    Headless,
}

#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Pause before polling an agent in rendered mode.
    pub agent_delay: Duration,
    /// Directory for the final board snapshot (rendered mode only).
    pub dir_save: Option<PathBuf>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            agent_delay: AGENT_DELAY,
            dir_save: None,
        }
    }
}

impl MatchConfig {
    pub fn with_agent_delay(mut self, delay: Duration) -> Self {
        self.agent_delay = delay;
        self
    }

    pub fn with_dir_save(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir_save = Some(dir.into());
        self
    }
}

/// Result of a finished match.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchOutcome {
    pub winner: Option<Color>,
    /// The game ended because the side to move had no legal action.
    pub early_termination: bool,
    pub moves: usize,
    pub elapsed: Duration,
    pub snapshot: Option<PathBuf>,
    /// Informational messages produced while playing, in order.
    pub notices: Vec<String>,
}

pub struct Match<R: RulesEngine> {
    rules: R,
    black: PlayerSource<R>,
    white: PlayerSource<R>,
    renderer: Option<Box<dyn Renderer>>,
    config: MatchConfig,
    events: Option<(Box<dyn EventSource>, CancelToken)>,
    time_elapsed: Option<Duration>,
    snapshot: Option<PathBuf>,
    notices: Vec<String>,
}

impl<R: RulesEngine> Match<R> {
    /// Bind both colors to their move sources.
    ///
    /// A human side needs a renderer; without one the match would be headless,
    /// which is reserved for agent-only games.
    pub fn new(
        black: PlayerSource<R>,
        white: PlayerSource<R>,
        rules: R,
        renderer: Option<Box<dyn Renderer>>,
        config: MatchConfig,
    ) -> Result<Self> {
        if renderer.is_none() && (black.is_human() || white.is_human()) {
            return Err(Error::Config("a human player requires a renderer"));
        }
        Ok(Self {
            rules,
            black,
            white,
            renderer,
            config,
            events: None,
            time_elapsed: None,
            snapshot: None,
            notices: Vec::new(),
        })
    }

    /// Drain `events` before each agent move while rendering.
    pub fn with_events(mut self, events: Box<dyn EventSource>, cancel: CancelToken) -> Self {
        self.events = Some((events, cancel));
        self
    }

    pub fn mode(&self) -> Mode {
        if self.renderer.is_some() {
            Mode::Rendered
        } else {
            Mode::Headless
        }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn winner(&self) -> Option<Color> {
        self.rules.winner()
    }

    /// Informational messages produced while playing.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn player(&self, color: Color) -> &PlayerSource<R> {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    /// Play the game to completion.
    pub fn start(&mut self) -> Result<MatchOutcome> {
        if self.time_elapsed.is_some() || self.rules.counter_move() > 0 {
            return Err(Error::GameOver);
        }
        match self.renderer.take() {
            Some(mut ui) => {
                let res = self.start_with_ui(ui.as_mut());
                self.renderer = Some(ui);
                res?;
            }
            None => self.start_without_ui()?,
        }
        Ok(self.outcome())
    }

    fn outcome(&self) -> MatchOutcome {
        MatchOutcome {
            winner: self.rules.winner(),
            early_termination: self.rules.end_by_no_legal_actions(),
            moves: self.rules.counter_move(),
            elapsed: self.time_elapsed.unwrap_or_default(),
            snapshot: self.snapshot.clone(),
            notices: self.notices.clone(),
        }
    }

    fn start_with_ui(&mut self, ui: &mut dyn Renderer) -> Result<()> {
        ui.initialize(self.rules.size())?;
        let started = Instant::now();

        let first_move = center(self.rules.size());
        self.rules.put_stone(first_move, false)?;
        ui.draw(first_move, Marker::stone(self.rules.next().opponent()))?;
        if self.rules.winner().is_none() {
            self.draw_candidates(ui)?;
        }
        ui.present()?;

        while self.rules.winner().is_none() {
            let point = self.perform_one_move(Some(&mut *ui))?;
            if !self.rules.is_legal(point) {
                continue;
            }

            let prev_legal_actions = self.rules.legal_actions().to_vec();
            self.rules.put_stone(point, false)?;
            for &action in &prev_legal_actions {
                ui.erase(action)?;
            }
            ui.draw(point, Marker::stone(self.rules.next().opponent()))?;

            if self.rules.winner().is_some() {
                for group in self.rules.removed_groups() {
                    for &p in &group.points {
                        ui.erase(p)?;
                    }
                }
                if self.rules.end_by_no_legal_actions() {
                    self.report_early_end();
                }
            } else {
                self.draw_candidates(ui)?;
            }
            ui.present()?;
        }

        self.time_elapsed = Some(started.elapsed());
        if let Some(dir) = &self.config.dir_save {
            let path = dir.join(format!("go_{}.ppm", timestamp()));
            ui.save_snapshot(&path)?;
            self.notices
                .push(format!("Board image saved in file {}", path.display()));
            self.snapshot = Some(path);
        }
        Ok(())
    }

    fn start_without_ui(&mut self) -> Result<()> {
        let started = Instant::now();
        let first_move = center(self.rules.size());
        self.rules.put_stone(first_move, false)?;

        while self.rules.winner().is_none() {
            let point = self.perform_one_move(None)?;
            if cfg!(debug_assertions) && !self.rules.is_legal(point) {
                return Err(Error::ContractViolation(point));
            }
            self.rules.put_stone(point, false)?;
        }

        if self.rules.end_by_no_legal_actions() {
            self.report_early_end();
        }
        self.time_elapsed = Some(started.elapsed());
        Ok(())
    }

    fn perform_one_move(&mut self, ui: Option<&mut dyn Renderer>) -> Result<Point> {
        let source = match self.rules.next() {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        };
        if let (PlayerSource::Agent(_), Some(ui)) = (&*source, ui) {
            thread::sleep(self.config.agent_delay);
            if let Some((events, cancel)) = &mut self.events {
                drain_events(events.as_mut(), cancel)?;
            }
            ui.present()?;
        }
        source.next_move(&self.rules)
    }

    fn draw_candidates(&self, ui: &mut dyn Renderer) -> Result<()> {
        for &action in self.rules.legal_actions() {
            ui.draw(action, Marker::candidate(CANDIDATE_SIZE))?;
        }
        Ok(())
    }

    fn report_early_end(&mut self) {
        self.notices.push(format!(
            "Game ends early (no legal action is available for {})",
            self.rules.next()
        ));
    }
}

/// Seconds since the epoch with microsecond precision, for snapshot names.
fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}
