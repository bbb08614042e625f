//! Repeated matches and aggregate win/draw statistics.
//!
//! Matches run one after another. A match that ended because the side to
//! move had no legal action counts as a draw, whatever winner the rules
//! engine cached; every other match is a win for the reported winner.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::error::Result;
use crate::game::{Match, MatchOutcome};
use crate::rules::{Color, RulesEngine};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    BlackWin,
    WhiteWin,
    Draw,
}

impl Verdict {
    pub fn classify(outcome: &MatchOutcome) -> Self {
        if outcome.early_termination {
            return Verdict::Draw;
        }
        match outcome.winner {
            Some(Color::Black) => Verdict::BlackWin,
            Some(Color::White) => Verdict::WhiteWin,
            None => Verdict::Draw,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeTally {
    pub black_wins: usize,
    pub white_wins: usize,
    pub draws: usize,
}

impl OutcomeTally {
    pub fn record(&mut self, outcome: &MatchOutcome) -> Verdict {
        let verdict = Verdict::classify(outcome);
        match verdict {
            Verdict::BlackWin => self.black_wins += 1,
            Verdict::WhiteWin => self.white_wins += 1,
            Verdict::Draw => self.draws += 1,
        }
        verdict
    }

    pub fn total(&self) -> usize {
        self.black_wins + self.white_wins + self.draws
    }
}

/// Aggregate result of a batch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchReport {
    pub games: usize,
    pub tally: OutcomeTally,
    pub total_moves: usize,
    pub total_seconds: f64,
}

impl BatchReport {
    fn percent(&self, count: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 / self.games as f64 * 100.0
        }
    }

    pub fn black_rate(&self) -> f64 {
        self.percent(self.tally.black_wins)
    }

    pub fn white_rate(&self) -> f64 {
        self.percent(self.tally.white_wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.percent(self.tally.draws)
    }

    pub fn mean_moves(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.games as f64
        }
    }

    pub fn mean_seconds(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_seconds / self.games as f64
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Black win rate: {:.1}%", self.black_rate())?;
        writeln!(f, "White win rate: {:.1}%", self.white_rate())?;
        write!(f, "Draw rate: {:.1}%", self.draw_rate())
    }
}

/// Runs matches back to back and owns the tally.
#[derive(Debug, Default)]
pub struct BatchEvaluator {
    tally: OutcomeTally,
    total_moves: usize,
    total_elapsed: Duration,
}

impl BatchEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally(&self) -> OutcomeTally {
        self.tally
    }

    /// Fold one finished match into the statistics.
    pub fn record(&mut self, outcome: &MatchOutcome) -> Verdict {
        self.total_moves += outcome.moves;
        self.total_elapsed += outcome.elapsed;
        self.tally.record(outcome)
    }

    pub fn report(&self) -> BatchReport {
        BatchReport {
            games: self.tally.total(),
            tally: self.tally,
            total_moves: self.total_moves,
            total_seconds: self.total_elapsed.as_secs_f64(),
        }
    }

    /// Run `n` matches built by `make_match`, in order.
    ///
    /// `on_match_end` is called after each match with its index and outcome,
    /// once the match (and any renderer it owns) has been dropped. The first
    /// error from building or playing a match aborts the batch.
    pub fn run<R, F, G>(&mut self, n: usize, mut make_match: F, mut on_match_end: G) -> Result<BatchReport>
    where
        R: RulesEngine,
        F: FnMut(usize) -> Result<Match<R>>,
        G: FnMut(usize, &MatchOutcome, Verdict),
    {
        for i in 0..n {
            let outcome = make_match(i)?.start()?;
            let verdict = self.record(&outcome);
            on_match_end(i, &outcome, verdict);
        }
        Ok(self.report())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(winner: Option<Color>, early: bool) -> MatchOutcome {
        MatchOutcome {
            winner,
            early_termination: early,
            moves: 10,
            elapsed: Duration::from_millis(500),
            snapshot: None,
            notices: Vec::new(),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(Verdict::classify(&outcome(Some(Color::Black), false)), Verdict::BlackWin);
        assert_eq!(Verdict::classify(&outcome(Some(Color::White), false)), Verdict::WhiteWin);
        assert_eq!(Verdict::classify(&outcome(Some(Color::White), true)), Verdict::Draw);
        assert_eq!(Verdict::classify(&outcome(Some(Color::Black), true)), Verdict::Draw);
    }

    #[test]
    fn test_report_rates() {
        let mut eval = BatchEvaluator::new();
        eval.record(&outcome(Some(Color::Black), false));
        eval.record(&outcome(Some(Color::Black), false));
        eval.record(&outcome(Some(Color::White), false));
        eval.record(&outcome(Some(Color::White), true));
        let report = eval.report();
        assert_eq!(report.games, 4);
        assert_eq!(report.tally.total(), 4);
        assert_eq!(report.black_rate(), 50.0);
        assert_eq!(report.white_rate(), 25.0);
        assert_eq!(report.draw_rate(), 25.0);
        assert_eq!(report.mean_moves(), 10.0);
        assert!((report.mean_seconds() - 0.5).abs() < 1e-9);
        assert_eq!(
            report.to_string(),
            "Black win rate: 50.0%\nWhite win rate: 25.0%\nDraw rate: 25.0%"
        );
    }

    #[test]
    fn test_empty_report() {
        let report = BatchEvaluator::new().report();
        assert_eq!(report.games, 0);
        assert_eq!(report.black_rate(), 0.0);
        assert_eq!(report.mean_seconds(), 0.0);
    }

    #[test]
    fn test_report_serializes() {
        let mut eval = BatchEvaluator::new();
        eval.record(&outcome(Some(Color::Black), false));
        let json = serde_json::to_value(eval.report()).unwrap();
        assert_eq!(json["games"], 1);
        assert_eq!(json["tally"]["black_wins"], 1);
        assert_eq!(json["tally"]["draws"], 0);
    }
}
