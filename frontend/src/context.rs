use std::rc::Rc;

use crate::services::{ApiService, LocalTokenStorage};
use crate::session::SessionManager;

pub type WebSession = SessionManager<LocalTokenStorage, ApiService>;

/// Shared through a `ContextProvider`. `authenticated` mirrors the manager's
/// flag so consumers re-render when it flips.
#[derive(Clone)]
pub struct SessionContext {
    pub manager: Rc<WebSession>,
    pub authenticated: bool,
}

impl PartialEq for SessionContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.manager, &other.manager) && self.authenticated == other.authenticated
    }
}
