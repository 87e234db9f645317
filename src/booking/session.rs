//! Booking session driver.
//!
//! Owns the state machine plus the remote cart transport and executes
//! the effects the reducer emits. One remote call at a time: the only
//! suspension point is awaiting the cart service's response, after which
//! the completion event re-enters the reducer.

use std::sync::Arc;

use crate::{
    booking::{BookingState, Effect, Event},
    catalog::{CartSnapshot, Catalog},
    policy::BookingPolicy,
    sync::{CartApi, CartApiError, CartRequest},
};

/// What the host should do after an event has been fully handled.
#[derive(Debug)]
pub enum SessionOutcome {
    /// Nothing beyond re-rendering the view.
    Idle,

    /// Leave for the remote cart page; the widget's life ends here.
    NavigateToCart,

    /// Reload the page so externally rendered cart indicators re-read
    /// the remote state.
    ReloadPage,

    /// The remote call failed; the selection is kept so the visitor can
    /// retry.
    RemoteFailed(CartApiError),
}

/// The widget's in-memory lifetime: state machine plus transport.
pub struct BookingSession {
    state: BookingState,
    catalog: Catalog,
    policy: BookingPolicy,
    api: Arc<dyn CartApi>,
}

impl std::fmt::Debug for BookingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingSession")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl BookingSession {
    /// Start a session, issuing the init-time clear when the remote cart
    /// snapshot is non-empty.
    pub async fn start(
        catalog: Catalog,
        policy: BookingPolicy,
        snapshot: &CartSnapshot,
        api: Arc<dyn CartApi>,
    ) -> (Self, SessionOutcome) {
        let (state, effect) = BookingState::initialise(snapshot);

        let mut session = Self {
            state,
            catalog,
            policy,
            api,
        };

        let outcome = session.run_effect(effect).await;

        (session, outcome)
    }

    /// Feed one event through the reducer and execute its effect.
    pub async fn handle(&mut self, event: Event) -> SessionOutcome {
        let (state, effect) = self.state.apply(event, &self.catalog, &self.policy);
        self.state = state;

        self.run_effect(effect).await
    }

    /// The current model, for rendering.
    #[must_use]
    pub fn state(&self) -> &BookingState {
        &self.state
    }

    /// The loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The active policy.
    #[must_use]
    pub fn policy(&self) -> &BookingPolicy {
        &self.policy
    }

    async fn run_effect(&mut self, effect: Option<Effect>) -> SessionOutcome {
        match effect {
            None => SessionOutcome::Idle,
            Some(Effect::NavigateToCart) => SessionOutcome::NavigateToCart,
            Some(Effect::ReloadPage) => SessionOutcome::ReloadPage,
            Some(Effect::Sync(request)) => self.sync(request).await,
        }
    }

    async fn sync(&mut self, request: CartRequest) -> SessionOutcome {
        let kind = request.kind();

        let result = match request {
            CartRequest::Add(body) => self.api.add(body).await,
            CartRequest::Update(body) => self.api.update(body).await,
            CartRequest::Clear => self.api.clear().await,
        };

        match result {
            Ok(()) => {
                let (state, effect) =
                    self.state
                        .apply(Event::CartSynced(kind), &self.catalog, &self.policy);
                self.state = state;

                // Completion events only ever produce terminal effects.
                match effect {
                    Some(Effect::NavigateToCart) => SessionOutcome::NavigateToCart,
                    Some(Effect::ReloadPage) => SessionOutcome::ReloadPage,
                    Some(Effect::Sync(_)) | None => SessionOutcome::Idle,
                }
            }
            Err(error) => {
                let (state, _) =
                    self.state
                        .apply(Event::CartSyncFailed, &self.catalog, &self.policy);
                self.state = state;

                SessionOutcome::RemoteFailed(error)
            }
        }
    }
}
