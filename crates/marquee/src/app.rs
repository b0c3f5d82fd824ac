//! Wiring of gateway, session, notices and controllers.

use std::sync::Arc;

use crate::Result;
use crate::auth::Authenticator;
use crate::catalog::{CatalogList, FormController};
use crate::gateway::{CatalogApi, HttpGateway};
use crate::notice::Notices;
use crate::route::Route;
use crate::session::SessionStore;
use crate::types::ApiUrl;

/// One client application: every controller shares the same gateway,
/// session store and notice board.
#[derive(Clone, Debug)]
pub struct App {
    auth: Authenticator,
    list: CatalogList,
    notices: Notices,
}

impl App {
    /// Build an app talking to the service at `api`.
    pub fn connect(api: ApiUrl, session: SessionStore, page_size: u32) -> Result<Self> {
        let gateway = HttpGateway::new(api)?;
        Ok(Self::with_gateway(Arc::new(gateway), session, page_size))
    }

    /// Build an app over any gateway implementation.
    pub fn with_gateway(api: Arc<dyn CatalogApi>, session: SessionStore, page_size: u32) -> Self {
        let notices = Notices::new();
        let auth = Authenticator::new(api.clone(), session.clone(), notices.clone());
        let list = CatalogList::new(api, session, notices.clone(), page_size);
        Self {
            auth,
            list,
            notices,
        }
    }

    pub fn auth(&self) -> &Authenticator {
        &self.auth
    }

    pub fn list(&self) -> &CatalogList {
        &self.list
    }

    /// A fresh form bound to this app's list.
    pub fn form(&self) -> FormController {
        FormController::new(self.list.clone())
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn session(&self) -> &SessionStore {
        self.auth.session()
    }

    /// The route to show for `requested` in the current session.
    pub fn route(&self, requested: Route) -> Route {
        requested.resolve(&self.session().state())
    }
}
