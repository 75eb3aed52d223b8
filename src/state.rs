//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Every component shares one `LocalStore` handle. The profile view-model
//! sits behind a mutex so there is exactly one form buffer per process.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::routes::guard::RoutePolicy;
use crate::services::pet::PetRepository;
use crate::services::profile::ProfileViewModel;
use crate::services::session::AuthContext;
use crate::store::LocalStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub pets: Arc<PetRepository>,
    pub auth: Arc<AuthContext>,
    pub profile: Arc<Mutex<ProfileViewModel>>,
    pub policy: RoutePolicy,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>, clock: Arc<dyn Clock>, profile_pet_id: &str) -> Self {
        Self {
            pets: Arc::new(PetRepository::new(store.clone())),
            auth: Arc::new(AuthContext::new(store)),
            profile: Arc::new(Mutex::new(ProfileViewModel::new(profile_pet_id))),
            policy: RoutePolicy::default(),
            clock,
        }
    }

    /// Calendar date used for validation and labels.
    #[must_use]
    pub fn today(&self) -> time::Date {
        self.clock.today()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
