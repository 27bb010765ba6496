//! # Optimistic Transitions
//!
//! Applies an action to the visible state before the server confirms it,
//! and takes it back if the server refuses.
//!
//! ## Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   committed ──► pending[0] ──► pending[1] ──► ... ──►  view()           │
//! │   (server        (begin)        (begin)                (what the UI     │
//! │    confirmed)                                           renders)        │
//! │                                                                         │
//! │   commit(id)    folds that pending action into `committed`              │
//! │   rollback(id)  drops it; the other pending actions are replayed        │
//! │   dispatch(a)   server facts go straight into `committed`               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Because `view()` is recomputed from `committed` plus whatever is still
//! pending, a rollback never has to know what the state looked like before
//! the transition began. A server fact arriving in between (a reload, say)
//! is kept, and still-pending guesses are replayed on top of it.
//!
//! ## Example
//! ```rust
//! use grocer_core::optimistic::Optimistic;
//! use grocer_core::store::{AppState, OrderAction};
//! use grocer_core::types::Order;
//!
//! let mut state = Optimistic::new(AppState::default());
//! state.dispatch(OrderAction::Loaded(vec![Order::bare("o1")]).into());
//!
//! let id = state.begin(
//!     OrderAction::StatusChanged { order_id: "o1".into(), status: "Shipped".into() }.into(),
//! );
//! assert_eq!(state.view().orders.orders[0].order_status.as_deref(), Some("Shipped"));
//!
//! state.rollback(id).unwrap();
//! assert_eq!(state.view().orders.orders[0].order_status, None);
//! ```

use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::store::Reducer;

/// Handle for one in-flight optimistic transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(u64);

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Committed state plus an ordered list of unconfirmed actions.
#[derive(Debug, Clone)]
pub struct Optimistic<S: Reducer> {
    committed: S,
    pending: Vec<(TransitionId, S::Action)>,
    next_id: u64,
}

impl<S: Reducer + Default> Default for Optimistic<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Reducer> Optimistic<S> {
    pub fn new(committed: S) -> Self {
        Self {
            committed,
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// Server-confirmed state, without pending guesses.
    pub fn committed(&self) -> &S {
        &self.committed
    }

    /// State to render: committed state with every pending action replayed in order.
    pub fn view(&self) -> S {
        self.pending
            .iter()
            .fold(self.committed.clone(), |state, (_, action)| {
                state.reduce(action.clone())
            })
    }

    /// Applies a confirmed action.
    pub fn dispatch(&mut self, action: S::Action) {
        let committed = self.committed.clone();
        self.committed = committed.reduce(action);
    }

    /// Starts an optimistic transition.
    pub fn begin(&mut self, action: S::Action) -> TransitionId {
        let id = TransitionId(self.next_id);
        self.next_id += 1;
        self.pending.push((id, action));
        id
    }

    /// The server accepted the transition: fold it into the committed state.
    pub fn commit(&mut self, id: TransitionId) -> CoreResult<()> {
        let action = self.take(id)?;
        self.dispatch(action);
        Ok(())
    }

    /// The server refused the transition: drop it, keep the others.
    pub fn rollback(&mut self, id: TransitionId) -> CoreResult<()> {
        self.take(id).map(|_| ())
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Replaces the committed state and drops every pending transition.
    pub fn reset(&mut self, committed: S) {
        self.committed = committed;
        self.pending.clear();
    }

    fn take(&mut self, id: TransitionId) -> CoreResult<S::Action> {
        let index = self
            .pending
            .iter()
            .position(|(pending_id, _)| *pending_id == id)
            .ok_or_else(|| CoreError::UnknownTransition(id.to_string()))?;
        Ok(self.pending.remove(index).1)
    }
}
