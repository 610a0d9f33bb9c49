//!
//! The departure-board card.
//!
//! `RailCard` holds the latest configuration and state snapshot pushed by the
//! host and recomputes the whole view from them on every [`RailCard::render`].
//! Nothing survives between passes except the inputs and, for registry-scoped
//! configurations, the device scope behind its loading gate.
//!
//! The registry fetch is the only asynchronous step. A render that needs the
//! scope returns a [`ScopeTicket`]; the host runs the fetch in the background
//! and passes the result to [`RailCard::complete_scope`], then renders again.

use std::sync::Arc;

use crate::addressing::AddressingMode;
use crate::assembler::{assemble_rows, last_updated};
use crate::config::{CardConfig, CARD_SIZE};
use crate::error::{CardError, RegistryError};
use crate::gate::{FetchTicket, GatePoll, LoadGate, LoadPhase};
use crate::primitives::StateSnapshot;
use crate::registry::{DeviceScope, EntityRegistryEntry, RegistryService};
use crate::resolver::{Resolver, ScopeView};
use crate::types::DeviceId;
use crate::view::CardView;

/// Request to fetch the entity registry for a device.
pub type ScopeTicket = FetchTicket<DeviceId>;

/// Result of one recomputation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub view: CardView,
    /// Set when this pass started a registry fetch the host must run.
    pub fetch: Option<ScopeTicket>,
}

impl Rendered {
    pub fn to_html(&self) -> String {
        self.view.to_html()
    }
}

#[derive(Debug, Default)]
pub struct RailCard {
    config: Option<CardConfig>,
    mode: Option<AddressingMode>,
    snapshot: Option<Arc<StateSnapshot>>,
    scope: LoadGate<DeviceId, DeviceScope>,
}

impl RailCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stub_config() -> CardConfig {
        CardConfig::stub()
    }

    pub fn card_size(&self) -> u32 {
        CARD_SIZE
    }

    pub fn config(&self) -> Option<&CardConfig> {
        self.config.as_ref()
    }

    pub fn mode(&self) -> Option<&AddressingMode> {
        self.mode.as_ref()
    }

    pub fn scope_phase(&self) -> LoadPhase {
        self.scope.state().phase()
    }

    /// Accepts a new configuration, or rejects it outright and keeps the
    /// previous one.
    pub fn set_config(&mut self, config: CardConfig) -> Result<(), CardError> {
        let mode = config.addressing()?;
        match mode.device_id() {
            Some(device_id) => self.scope.rekey(device_id),
            None => self.scope.reset(),
        }
        tracing::info!(?mode, "Card configuration accepted");
        self.config = Some(config);
        self.mode = Some(mode);
        Ok(())
    }

    /// Replaces the state snapshot wholesale.
    pub fn set_states(&mut self, snapshot: impl Into<Arc<StateSnapshot>>) {
        self.snapshot = Some(snapshot.into());
    }

    /// Recomputes the view. `None` until both a configuration and a snapshot
    /// have been provided.
    pub fn render(&mut self) -> Option<Rendered> {
        let (Some(config), Some(mode), Some(snapshot)) = (&self.config, &self.mode, &self.snapshot) else {
            return None;
        };

        let mut fetch = None;
        // Legacy modes never read the scope view.
        let scope = match mode.device_id() {
            Some(device_id) => match self.scope.poll(device_id) {
                GatePoll::Pending(ticket) => {
                    fetch = ticket;
                    ScopeView::Pending
                }
                GatePoll::Loaded(scope) => ScopeView::Ready(scope),
                GatePoll::Failed => ScopeView::Failed,
            },
            None => ScopeView::Failed,
        };
        let resolver = Resolver::for_mode(snapshot, mode, scope);

        let rows = assemble_rows(&resolver);
        let view = CardView::new(
            config.display_title().map(str::to_string),
            rows,
            last_updated(&resolver),
            resolver.is_pending(),
        );
        Some(Rendered { view, fetch })
    }

    /// Hands back the entity registry fetched for `ticket`. Returns `true` when
    /// the scope changed and the card should render again.
    pub fn complete_scope(
        &mut self,
        ticket: ScopeTicket,
        entries: Result<Vec<EntityRegistryEntry>, RegistryError>,
    ) -> bool {
        let scope = entries.map(|entries| DeviceScope::for_device(&entries, &ticket.key));
        self.scope.complete(ticket, scope)
    }

    /// Runs the fetch for `ticket` against `registry` right away.
    pub fn load_scope<R: RegistryService + ?Sized>(&mut self, ticket: ScopeTicket, registry: &R) -> bool {
        let entries = registry.list_entities();
        self.complete_scope(ticket, entries)
    }
}
