//! Game modal controller
//!
//! Owns a `CardGame`, renders it into the modal and paces the opponent
//! reveal. Every delayed step is tracked so close, restart and drop can
//! cancel it; a step that outlives the table finds its `Weak` dead and
//! does nothing.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::cards::{Card, Deck};
use super::engine::{CardGame, GameError, GamePhase, INTRO_MESSAGE, Outcome};
use crate::platform::{Dom, KeyInput, Scheduler, TimerId};
use crate::settings::Settings;
use crate::ui::{KeyOutcome, Modal};

/// Status colour while a round is in play
const NEUTRAL_STATUS_COLOR: &str = "var(--text-secondary)";

/// Elements inside the game modal
#[derive(Debug, Clone)]
pub struct TableNodes<N> {
    pub hand: N,
    pub score: N,
    pub opponent: N,
    pub status: N,
    pub hit: N,
    pub stay: N,
    pub restart: N,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableTiming {
    pub deal_stagger_ms: u32,
    pub reveal_delay_ms: u32,
    pub resolve_delay_ms: u32,
}

impl TableTiming {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            deal_stagger_ms: settings.deal_stagger_ms,
            reveal_delay_ms: settings.reveal_delay_ms,
            resolve_delay_ms: settings.resolve_delay_ms,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Reveal,
    Resolve,
}

struct TableInner<D: Dom> {
    modal: Modal<D>,
    nodes: TableNodes<D::Node>,
    game: CardGame,
    timing: TableTiming,
    timers: Vec<TimerId>,
}

type Shared<D> = Rc<RefCell<TableInner<D>>>;

pub struct GameTable<D: Dom + 'static> {
    inner: Shared<D>,
    scheduler: Rc<dyn Scheduler>,
}

impl<D: Dom + 'static> GameTable<D> {
    pub fn new(
        modal: Modal<D>,
        nodes: TableNodes<D::Node>,
        scheduler: Rc<dyn Scheduler>,
        timing: TableTiming,
        seed: u64,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TableInner {
                modal,
                nodes,
                game: CardGame::new(seed),
                timing,
                timers: Vec::new(),
            })),
            scheduler,
        }
    }

    /// Show the modal with a fresh game
    pub fn open(&self) {
        self.cancel_timers();
        let mut inner = self.inner.borrow_mut();
        inner.modal.open();
        inner.game.start();
        inner.render_round();
    }

    pub fn close(&self) {
        self.cancel_timers();
        self.inner.borrow_mut().modal.close();
    }

    /// Deal a fresh game from a stacked deck
    pub fn start_with(&self, deck: Deck, opponent: u8) -> Result<(), GameError> {
        self.cancel_timers();
        let mut inner = self.inner.borrow_mut();
        inner.game.start_with(deck, opponent)?;
        inner.render_round();
        Ok(())
    }

    pub fn restart(&self) -> Result<(), GameError> {
        let mut inner = self.inner.borrow_mut();
        inner.game.restart()?;
        let stale = std::mem::take(&mut inner.timers);
        for id in stale {
            self.scheduler.cancel(id);
        }
        inner.render_round();
        Ok(())
    }

    pub fn hit(&self) -> Result<Card, GameError> {
        let mut inner = self.inner.borrow_mut();
        let card = inner.game.hit()?;
        let index = inner.game.hand().cards().len() - 1;
        inner.render_card(card, index, false);
        inner.render_score();
        if let Some(outcome) = inner.game.outcome() {
            inner.render_outcome(outcome);
        }
        Ok(card)
    }

    /// End the player's turn; the reveal and the result follow on timers
    pub fn stay(&self) -> Result<(), GameError> {
        let delay = {
            let mut inner = self.inner.borrow_mut();
            inner.game.stay()?;
            inner.render_waiting();
            inner.timing.reveal_delay_ms
        };
        track(&self.inner, &self.scheduler, delay, Step::Reveal);
        Ok(())
    }

    /// Escape goes through `close` so pending steps are cancelled too
    pub fn handle_key(&self, key: &KeyInput) -> KeyOutcome {
        if key.is_escape() && self.is_open() {
            self.close();
            return KeyOutcome::Closed;
        }
        self.inner.borrow_mut().modal.handle_key(key)
    }

    pub fn is_open(&self) -> bool {
        self.inner.borrow().modal.is_active()
    }

    pub fn phase(&self) -> GamePhase {
        self.inner.borrow().game.phase()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.inner.borrow().game.outcome()
    }

    pub fn player_score(&self) -> u8 {
        self.inner.borrow().game.hand().score()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    fn cancel_timers(&self) {
        let stale = std::mem::take(&mut self.inner.borrow_mut().timers);
        for id in stale {
            self.scheduler.cancel(id);
        }
    }
}

impl<D: Dom + 'static> Drop for GameTable<D> {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}

/// Schedule `step` and remember its id until it fires or is cancelled
fn track<D: Dom + 'static>(
    inner: &Shared<D>,
    scheduler: &Rc<dyn Scheduler>,
    delay_ms: u32,
    step: Step,
) {
    let weak: Weak<RefCell<TableInner<D>>> = Rc::downgrade(inner);
    let sched = scheduler.clone();
    let slot: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
    let own = slot.clone();
    let id = scheduler.schedule(
        delay_ms,
        Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Some(id) = own.get() {
                inner.borrow_mut().timers.retain(|t| *t != id);
            }
            run_step(&inner, &sched, step);
        }),
    );
    match id {
        Some(id) => {
            slot.set(Some(id));
            inner.borrow_mut().timers.push(id);
        }
        None => log::warn!("Game timer refused; {:?} will not run", step),
    }
}

fn run_step<D: Dom + 'static>(inner: &Shared<D>, scheduler: &Rc<dyn Scheduler>, step: Step) {
    match step {
        Step::Reveal => {
            let next = {
                let mut guard = inner.borrow_mut();
                match guard.game.reveal() {
                    Ok(score) => {
                        guard.render_opponent(&score.to_string());
                        Some(guard.timing.resolve_delay_ms)
                    }
                    Err(err) => {
                        log::debug!("Reveal skipped: {}", err);
                        None
                    }
                }
            };
            if let Some(delay) = next {
                track(inner, scheduler, delay, Step::Resolve);
            }
        }
        Step::Resolve => {
            let mut guard = inner.borrow_mut();
            match guard.game.resolve() {
                Ok(outcome) => guard.render_outcome(outcome),
                Err(err) => log::debug!("Resolve skipped: {}", err),
            }
        }
    }
}

impl<D: Dom> TableInner<D> {
    fn dom(&self) -> Rc<D> {
        self.modal.dom().clone()
    }

    /// Fresh round: both opening cards, concealed opponent, play buttons
    fn render_round(&self) {
        let dom = self.dom();
        let n = &self.nodes;
        dom.clear_children(&n.hand);
        for (index, card) in self.game.hand().cards().iter().enumerate() {
            self.render_card(*card, index, true);
        }
        self.render_score();

        dom.set_text(&n.opponent, &self.game.opponent_display());
        dom.set_style(&n.opponent, "opacity", "");
        dom.set_class(&n.opponent, "hidden", true);

        dom.set_text(&n.status, INTRO_MESSAGE);
        dom.set_style(&n.status, "color", NEUTRAL_STATUS_COLOR);

        for button in [&n.hit, &n.stay] {
            dom.set_disabled(button, false);
            dom.set_class(button, "hidden", false);
        }
        dom.set_class(&n.restart, "hidden", true);
    }

    fn render_card(&self, card: Card, index: usize, opening: bool) {
        let dom = self.dom();
        let Some(el) = dom.append_element(&self.nodes.hand, "div") else {
            return;
        };
        dom.set_class(&el, "game-card", true);
        dom.set_class(&el, "red", card.suit.is_red());
        dom.set_attribute(&el, "data-value", &card.rank.label());
        if let Some(pip) = dom.append_element(&el, "span") {
            dom.set_text(&pip, card.suit.symbol());
        }
        if opening && index > 0 {
            let delay = self.timing.deal_stagger_ms as usize * index;
            dom.set_style(&el, "animation-delay", &format!("{}ms", delay));
        }
    }

    fn render_score(&self) {
        let score = self.game.hand().score().to_string();
        self.dom().set_text(&self.nodes.score, &score);
    }

    /// Player stayed: lock the buttons and show the thinking dots
    fn render_waiting(&self) {
        let dom = self.dom();
        let n = &self.nodes;
        dom.set_disabled(&n.hit, true);
        dom.set_disabled(&n.stay, true);
        dom.set_class(&n.opponent, "hidden", false);
        dom.clear_children(&n.opponent);
        if let Some(dots) = dom.append_element(&n.opponent, "div") {
            dom.set_class(&dots, "loading-dots", true);
            for _ in 0..3 {
                dom.append_element(&dots, "span");
            }
        }
    }

    fn render_opponent(&self, text: &str) {
        let dom = self.dom();
        dom.set_text(&self.nodes.opponent, text);
        dom.set_style(&self.nodes.opponent, "opacity", "1");
    }

    fn render_outcome(&self, outcome: Outcome) {
        let dom = self.dom();
        let n = &self.nodes;
        dom.set_text(&n.status, outcome.message());
        dom.set_style(&n.status, "color", outcome.tone().color());
        for button in [&n.hit, &n.stay] {
            dom.set_class(button, "hidden", true);
            dom.set_disabled(button, true);
        }
        dom.set_class(&n.restart, "hidden", false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{REVEAL_DELAY_MS, RESOLVE_DELAY_MS};
    use crate::game::cards::{Rank, Suit};
    use crate::platform::{ManualScheduler, MemoryDom, NodeId};
    use crate::ui::ModalParts;

    struct Rig {
        dom: Rc<MemoryDom>,
        sched: Rc<ManualScheduler>,
        nodes: TableNodes<NodeId>,
        table: GameTable<MemoryDom>,
    }

    fn rig() -> Rig {
        let dom = Rc::new(MemoryDom::new());
        let body = dom.body();
        let root = dom.create(body, "div");
        let dialog = dom.create(root, "div");
        let close = dom.create(dialog, "button");
        let nodes = TableNodes {
            hand: dom.create(dialog, "div"),
            score: dom.create(dialog, "span"),
            opponent: dom.create(dialog, "span"),
            status: dom.create(dialog, "p"),
            hit: dom.create(dialog, "button"),
            stay: dom.create(dialog, "button"),
            restart: dom.create(dialog, "button"),
        };
        let modal = Modal::new(
            "game",
            dom.clone(),
            ModalParts {
                root,
                dialog,
                close: Some(close),
            },
        );
        let sched = Rc::new(ManualScheduler::new());
        let table = GameTable::new(
            modal,
            nodes.clone(),
            sched.clone(),
            TableTiming::from_settings(&Settings::default()),
            5,
        );
        Rig {
            dom,
            sched,
            nodes,
            table,
        }
    }

    fn deck(ranks: &[Rank]) -> Deck {
        let cards: Vec<Card> = ranks.iter().map(|&r| Card::new(r, Suit::Hearts)).collect();
        Deck::from_draw_order(&cards)
    }

    #[test]
    fn test_open_renders_fresh_round() {
        let r = rig();
        r.table.open();
        assert!(r.table.is_open());
        assert_eq!(r.table.phase(), GamePhase::PlayerTurn);
        assert_eq!(r.dom.children(r.nodes.hand).len(), 2);

        r.table
            .start_with(deck(&[Rank::Ace, Rank::Num(7)]), 18)
            .unwrap();
        let cards = r.dom.children(r.nodes.hand);
        assert_eq!(cards.len(), 2);
        assert_eq!(r.dom.attribute(&cards[0], "data-value").as_deref(), Some("A"));
        assert!(r.dom.has_class(&cards[0], "game-card"));
        assert!(r.dom.has_class(&cards[0], "red"));
        assert_eq!(r.dom.style(cards[0], "animation-delay"), None);
        assert_eq!(r.dom.style(cards[1], "animation-delay").as_deref(), Some("200ms"));

        assert_eq!(r.dom.text(r.nodes.opponent), "??");
        assert!(r.dom.has_class(&r.nodes.opponent, "hidden"));
        assert_eq!(r.dom.text(r.nodes.status), INTRO_MESSAGE);
        assert!(r.dom.has_class(&r.nodes.restart, "hidden"));
        assert_eq!(r.dom.text(r.nodes.score), r.table.player_score().to_string());
    }

    #[test]
    fn test_stay_reveals_then_resolves() {
        let r = rig();
        r.table.open();
        r.table
            .start_with(deck(&[Rank::King, Rank::Queen]), 19)
            .unwrap();
        r.table.stay().unwrap();

        assert!(r.dom.attribute(&r.nodes.hit, "disabled").is_some());
        assert!(!r.dom.has_class(&r.nodes.opponent, "hidden"));
        let dots = r.dom.children(r.nodes.opponent);
        assert_eq!(dots.len(), 1);
        assert!(r.dom.has_class(&dots[0], "loading-dots"));
        assert_eq!(r.table.pending_timers(), 1);

        r.sched.advance(REVEAL_DELAY_MS);
        assert_eq!(r.dom.text(r.nodes.opponent), "19");
        assert_eq!(r.table.phase(), GamePhase::Resolving);
        assert_eq!(r.table.pending_timers(), 1);

        r.sched.advance(RESOLVE_DELAY_MS);
        assert_eq!(r.table.phase(), GamePhase::Finished);
        assert_eq!(r.dom.text(r.nodes.status), "You Win!");
        assert_eq!(r.dom.style(r.nodes.status, "color").as_deref(), Some("#48bb78"));
        assert!(!r.dom.has_class(&r.nodes.restart, "hidden"));
        assert!(r.dom.has_class(&r.nodes.hit, "hidden"));
        assert_eq!(r.table.pending_timers(), 0);
    }

    #[test]
    fn test_close_right_after_stay_cancels_reveal() {
        let r = rig();
        r.table.open();
        r.table
            .start_with(deck(&[Rank::Num(10), Rank::Num(10)]), 22)
            .unwrap();
        r.table.stay().unwrap();
        r.table.close();

        assert_eq!(r.table.pending_timers(), 0);
        assert_eq!(r.sched.pending_timers(), 0);
        r.sched.advance(10_000);
        assert_eq!(r.table.phase(), GamePhase::Resolving);
        assert_eq!(r.table.outcome(), None);
        assert_eq!(r.dom.text(r.nodes.status), INTRO_MESSAGE);
    }

    #[test]
    fn test_escape_cancels_pending_steps() {
        let r = rig();
        r.table.open();
        r.table.stay().unwrap();
        assert_eq!(
            r.table.handle_key(&KeyInput::new("Escape")),
            KeyOutcome::Closed
        );
        assert!(!r.table.is_open());
        assert_eq!(r.sched.pending_timers(), 0);
    }

    #[test]
    fn test_hit_to_bust_shows_restart() {
        let r = rig();
        r.table.open();
        r.table
            .start_with(deck(&[Rank::Num(10), Rank::Num(9), Rank::Num(5)]), 18)
            .unwrap();
        r.table.hit().unwrap();
        assert_eq!(r.dom.children(r.nodes.hand).len(), 3);
        assert_eq!(r.dom.text(r.nodes.score), "24");
        assert_eq!(r.dom.text(r.nodes.status), "Bust! You went over 21.");
        assert_eq!(r.dom.style(r.nodes.status, "color").as_deref(), Some("#e53e3e"));
        assert!(r.table.hit().is_err());

        r.table.restart().unwrap();
        assert_eq!(r.table.phase(), GamePhase::PlayerTurn);
        assert_eq!(r.dom.children(r.nodes.hand).len(), 2);
        assert!(r.dom.has_class(&r.nodes.restart, "hidden"));
    }

    #[test]
    fn test_restart_rejected_mid_round() {
        let r = rig();
        r.table.open();
        assert!(r.table.restart().is_err());
        assert_eq!(r.dom.children(r.nodes.hand).len(), 2);
    }

    #[test]
    fn test_drop_cancels_timers() {
        let r = rig();
        r.table.open();
        r.table.stay().unwrap();
        let Rig { sched, table, .. } = r;
        drop(table);
        assert_eq!(sched.pending_timers(), 0);
        sched.advance(5_000);
    }
}
