//! Human input adapter.
//!
//! A human move is read from an [`EventSource`] with an explicit poll
//! interval. Pointer presses are mapped to grid points through a
//! [`GridTransform`]; the first press on an empty point is returned. A quit
//! event, or cancellation through the shared [`CancelToken`], aborts the
//! wait with [`Error::Aborted`].
//!
//! [`drain_events`] empties the queue without blocking. The match controller
//! calls it while an agent is moving, so presses made during that turn are
//! dropped and a quit is still noticed.
//!
//! Only occupancy is checked here. Full legality (suicide and so on) is left
//! to the match controller, which discards illegal points and asks again.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::constants::POLL_INTERVAL;
use crate::error::{Error, Result};
use crate::render::GridTransform;
use crate::rules::{Point, RulesEngine};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerPress { button: PointerButton, x: f64, y: f64 },
    Quit,
}

/// A queue of platform input events.
pub trait EventSource {
    /// Wait up to `timeout` for the next event.
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>>;

    /// The next event that is already queued, without waiting.
    fn pending(&mut self) -> Result<Option<InputEvent>> {
        self.poll_event(Duration::ZERO)
    }
}

/// Discard queued events. A queued quit cancels `cancel` and aborts.
pub fn drain_events(events: &mut dyn EventSource, cancel: &CancelToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Error::Aborted);
    }
    while let Some(event) = events.pending()? {
        if event == InputEvent::Quit {
            cancel.cancel();
            return Err(Error::Aborted);
        }
    }
    Ok(())
}

/// Shared flag used to stop all input loops.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Replays a fixed list of events, then reports `Quit` like a closed window.
///
/// Clones share one queue, the way every reader of a terminal sees the
/// same input. An [`idle`](Self::idle) entry is a quiet moment: a blocking
/// poll times out on it, and [`drain_events`] stops there.
#[derive(Clone, Debug, Default)]
pub struct ScriptedEvents {
    events: Rc<RefCell<VecDeque<Option<InputEvent>>>>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: Rc::new(RefCell::new(events.into_iter().map(Some).collect())),
        }
    }

    /// Queue a poll that times out without an event.
    pub fn idle(self) -> Self {
        self.events.borrow_mut().push_back(None);
        self
    }

    pub fn then(self, event: InputEvent) -> Self {
        self.events.borrow_mut().push_back(Some(event));
        self
    }

    /// Convenience for a primary press at a surface position.
    pub fn click(self, x: f64, y: f64) -> Self {
        self.then(InputEvent::PointerPress {
            button: PointerButton::Primary,
            x,
            y,
        })
    }

    pub fn remaining(&self) -> usize {
        self.events.borrow().len()
    }
}

impl EventSource for ScriptedEvents {
    fn poll_event(&mut self, _timeout: Duration) -> Result<Option<InputEvent>> {
        Ok(self
            .events
            .borrow_mut()
            .pop_front()
            .unwrap_or(Some(InputEvent::Quit)))
    }

    fn pending(&mut self) -> Result<Option<InputEvent>> {
        Ok(self.events.borrow_mut().pop_front().flatten())
    }
}

/// Reads one move from a human.
pub struct HumanInput {
    events: Box<dyn EventSource>,
    transform: GridTransform,
    cancel: CancelToken,
    poll_interval: Duration,
}

impl HumanInput {
    pub fn new(events: Box<dyn EventSource>, transform: GridTransform, cancel: CancelToken) -> Self {
        Self {
            events,
            transform,
            cancel,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Block until the human presses an empty point, or abort on quit.
    pub fn next_move<R: RulesEngine>(&mut self, rules: &R) -> Result<Point> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Aborted);
            }
            match self.events.poll_event(self.poll_interval)? {
                Some(InputEvent::Quit) => {
                    self.cancel.cancel();
                    return Err(Error::Aborted);
                }
                Some(InputEvent::PointerPress {
                    button: PointerButton::Primary,
                    x,
                    y,
                }) => {
                    if let Some(pt) = self.transform.to_grid(x, y) {
                        if rules.exist_stone(pt).is_none() {
                            return Ok(pt);
                        }
                    }
                }
                Some(InputEvent::PointerPress { .. }) | None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn human(events: ScriptedEvents) -> HumanInput {
        HumanInput::new(Box::new(events), GridTransform::pixels(19), CancelToken::new())
    }

    #[test]
    fn test_click_maps_to_grid() {
        let board = Board::new();
        let mut h = human(ScriptedEvents::default().idle().click(125.0, 205.0));
        assert_eq!(h.next_move(&board).unwrap(), (3, 5));
    }

    #[test]
    fn test_ignores_occupied_outside_and_secondary() {
        let mut board = Board::new();
        board.put_stone((10, 10), false).unwrap();
        let events = ScriptedEvents::default()
            .click(405.0, 405.0)
            .click(1.0, 1.0)
            .then(InputEvent::PointerPress {
                button: PointerButton::Secondary,
                x: 45.0,
                y: 45.0,
            })
            .click(45.0, 45.0);
        let mut h = human(events);
        assert_eq!(h.next_move(&board).unwrap(), (1, 1));
    }

    #[test]
    fn test_quit_aborts_and_cancels() {
        let board = Board::new();
        let mut h = human(ScriptedEvents::new([InputEvent::Quit]).click(45.0, 45.0));
        assert!(matches!(h.next_move(&board), Err(Error::Aborted)));
        assert!(h.cancel_token().is_cancelled());
        // stays aborted without consuming further input
        assert!(matches!(h.next_move(&board), Err(Error::Aborted)));
    }

    #[test]
    fn test_cancelled_token_stops_polling() {
        let board = Board::new();
        let token = CancelToken::new();
        token.cancel();
        let mut h = HumanInput::new(
            Box::new(ScriptedEvents::default().click(45.0, 45.0)),
            GridTransform::pixels(19),
            token,
        );
        assert!(matches!(h.next_move(&board), Err(Error::Aborted)));
    }

    #[test]
    fn test_drain_drops_presses_up_to_idle() {
        let events = ScriptedEvents::default()
            .click(45.0, 45.0)
            .click(85.0, 85.0)
            .idle()
            .click(125.0, 125.0);
        let mut source = events.clone();
        let cancel = CancelToken::new();
        drain_events(&mut source, &cancel).unwrap();
        assert_eq!(events.remaining(), 1);
        assert!(!cancel.is_cancelled());

        let mut h = human(events);
        assert_eq!(h.next_move(&Board::new()).unwrap(), (3, 3));
    }

    #[test]
    fn test_drain_sees_quit() {
        let mut source = ScriptedEvents::default().click(45.0, 45.0).then(InputEvent::Quit);
        let cancel = CancelToken::new();
        assert!(matches!(drain_events(&mut source, &cancel), Err(Error::Aborted)));
        assert!(cancel.is_cancelled());
        // cancelled tokens abort before touching the queue
        let mut empty = ScriptedEvents::default();
        assert!(matches!(drain_events(&mut empty, &cancel), Err(Error::Aborted)));
    }

    #[test]
    fn test_drain_on_empty_script_does_not_quit() {
        let mut source = ScriptedEvents::default();
        let cancel = CancelToken::new();
        drain_events(&mut source, &cancel).unwrap();
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn test_exhausted_script_quits() {
        let board = Board::new();
        let mut h = human(ScriptedEvents::default());
        assert!(matches!(h.next_move(&board), Err(Error::Aborted)));
    }
}
