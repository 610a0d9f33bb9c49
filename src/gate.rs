//! One-shot loading gate for registry-backed data.
//!
//! A gate remembers which key (e.g. the configured device id) its data was
//! requested for. The first poll for a key hands out a [`FetchTicket`] and
//! reports `Pending`; the host runs the fetch whenever it likes and returns the
//! result through [`LoadGate::complete`]. Results for a key that is no longer
//! current are dropped, so a slow response can never land on a newer device.
//! Failures are final for that key; there is no retry.

use crate::error::RegistryError;

/// Data-free view of a [`LoadState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    NotRequested,
    Loading,
    Loaded,
    Failed,
}

/// Lifecycle of the data behind a gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    NotRequested,
    Loading,
    Loaded(T),
    /// The fetch failed; callers treat this as empty data.
    Failed,
}

impl<T> LoadState<T> {
    pub fn phase(&self) -> LoadPhase {
        match self {
            LoadState::NotRequested => LoadPhase::NotRequested,
            LoadState::Loading => LoadPhase::Loading,
            LoadState::Loaded(_) => LoadPhase::Loaded,
            LoadState::Failed => LoadPhase::Failed,
        }
    }
}

/// Permission to run one fetch for `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a ticket must be fetched and completed or the gate stays Loading"]
pub struct FetchTicket<K> {
    pub key: K,
}

/// Outcome of polling a gate.
#[derive(Debug, PartialEq, Eq)]
pub enum GatePoll<'a, T, K> {
    /// Data is not available yet. Carries a ticket on the transition out of
    /// `NotRequested`, `None` while a fetch is already in flight.
    Pending(Option<FetchTicket<K>>),
    Loaded(&'a T),
    Failed,
}

#[derive(Debug, Clone)]
pub struct LoadGate<K, T> {
    key: Option<K>,
    state: LoadState<T>,
}

impl<K, T> Default for LoadGate<K, T> {
    fn default() -> Self {
        LoadGate { key: None, state: LoadState::NotRequested }
    }
}

impl<K: Clone + PartialEq + std::fmt::Debug, T> LoadGate<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// The loaded data for the current key, if any.
    pub fn value(&self) -> Option<&T> {
        match &self.state {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Whether a fetch for the current key has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self.state, LoadState::Loaded(_) | LoadState::Failed)
    }

    /// Forgets the key and any data.
    pub fn reset(&mut self) {
        self.key = None;
        self.state = LoadState::NotRequested;
    }

    /// Points the gate at `key`. A different key discards the current data and
    /// starts a new cycle from `NotRequested`.
    pub fn rekey(&mut self, key: &K) {
        if self.key.as_ref() != Some(key) {
            tracing::debug!(?key, "Load gate re-keyed");
            self.key = Some(key.clone());
            self.state = LoadState::NotRequested;
        }
    }

    /// Reads the gate for `key`, requesting a fetch on first use.
    pub fn poll(&mut self, key: &K) -> GatePoll<'_, T, K> {
        self.rekey(key);
        if self.state.phase() == LoadPhase::NotRequested {
            tracing::debug!(?key, "Load gate requesting fetch");
            self.state = LoadState::Loading;
            return GatePoll::Pending(Some(FetchTicket { key: key.clone() }));
        }
        match &self.state {
            LoadState::NotRequested | LoadState::Loading => GatePoll::Pending(None),
            LoadState::Loaded(value) => GatePoll::Loaded(value),
            LoadState::Failed => GatePoll::Failed,
        }
    }

    /// Applies the result of a fetch. Returns `true` if the gate changed and
    /// the consumer should recompute.
    pub fn complete(&mut self, ticket: FetchTicket<K>, result: Result<T, RegistryError>) -> bool {
        if self.key.as_ref() != Some(&ticket.key) || self.state.phase() != LoadPhase::Loading {
            tracing::debug!(key = ?ticket.key, current = ?self.key, "Discarding stale fetch result");
            return false;
        }

        self.state = match result {
            Ok(value) => {
                tracing::debug!(key = ?ticket.key, "Load gate loaded");
                LoadState::Loaded(value)
            }
            Err(error) => {
                tracing::warn!(key = ?ticket.key, %error, "Registry fetch failed; treating as empty");
                LoadState::Failed
            }
        };
        true
    }
}
