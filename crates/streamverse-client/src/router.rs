//! Routes, authentication gating and page loading.

use std::fmt;

use streamverse_shared::{Favorite, PaymentRecord, TitleId};
use tracing::{debug, warn};

use crate::commands::catalog::{HomeFeed, MovieScreen, SearchResults};
use crate::commands::subscription::SubscribeScreen;
use crate::commands::{billing, catalog, favorites, subscription};
use crate::error::Result;
use crate::events::Notice;
use crate::state::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    ForgotPassword,
    Home,
    Search,
    Favorites,
    Subscribe,
    Billing,
    Movie(TitleId),
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Route::Landing,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/forgot-password" => Route::ForgotPassword,
            "/home" => Route::Home,
            "/search" => Route::Search,
            "/favorites" => Route::Favorites,
            "/subscribe" => Route::Subscribe,
            "/billing" => Route::Billing,
            other => {
                let id = other.strip_prefix("/movie/")?;
                Route::Movie(id.parse().ok()?)
            }
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".into(),
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::ForgotPassword => "/forgot-password".into(),
            Route::Home => "/home".into(),
            Route::Search => "/search".into(),
            Route::Favorites => "/favorites".into(),
            Route::Subscribe => "/subscribe".into(),
            Route::Billing => "/billing".into(),
            Route::Movie(id) => format!("/movie/{id}"),
        }
    }

    /// Requires a signed-in session.
    pub fn is_protected(&self) -> bool {
        !matches!(
            self,
            Route::Landing | Route::Login | Route::Register | Route::ForgotPassword
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where a request for `route` lands.
pub fn gate(route: Route, signed_in: bool) -> Route {
    match route {
        r if r.is_protected() && !signed_in => Route::Login,
        Route::Login | Route::Register if signed_in => Route::Home,
        r => r,
    }
}

/// Where selecting a title from a listing leads.
pub fn title_destination(id: TitleId, has_active_access: bool) -> Route {
    if has_active_access {
        Route::Movie(id)
    } else {
        Route::Subscribe
    }
}

/// Page model for a resolved route.
#[derive(Debug, Clone)]
pub enum Screen {
    Landing,
    Login,
    Register,
    ForgotPassword,
    Home(HomeFeed),
    Search(SearchResults),
    Favorites(Vec<Favorite>),
    Subscribe(SubscribeScreen),
    Billing(Vec<PaymentRecord>),
    Movie(Box<MovieScreen>),
}

#[derive(Debug, Clone)]
pub struct Navigation {
    pub requested: Route,
    pub route: Route,
    pub notice: Option<Notice>,
    pub screen: Screen,
}

impl Navigation {
    pub fn redirected(&self) -> bool {
        self.requested != self.route
    }
}

impl App {
    /// Resolve `path`, apply gating and load the page.  Gating happens
    /// before any document is read.
    pub async fn navigate(&self, path: &str) -> Result<Navigation> {
        let requested = Route::parse(path).unwrap_or_else(|| {
            debug!(path, "unknown path");
            Route::Landing
        });
        let route = gate(requested, self.session().is_some());

        let notice = (route != requested && route == Route::Home).then(|| {
            Notice::info("You're already logged in!", "Redirecting to the main page...")
        });
        if route != requested {
            debug!(from = %requested, to = %route, "redirected");
        }

        self.set_hero_active(route == Route::Home);
        let screen = self.load_screen(route).await;

        Ok(Navigation {
            requested,
            route,
            notice,
            screen,
        })
    }

    /// Selecting a title from a home listing.
    pub fn select_title(&self, id: TitleId) -> Route {
        title_destination(id, self.view().has_active_access())
    }

    async fn load_screen(&self, route: Route) -> Screen {
        match route {
            Route::Landing => Screen::Landing,
            Route::Login => Screen::Login,
            Route::Register => Screen::Register,
            Route::ForgotPassword => Screen::ForgotPassword,
            Route::Home => Screen::Home(catalog::home_feed(self.catalog()).await),
            Route::Search => Screen::Search(SearchResults::default()),
            Route::Favorites => Screen::Favorites(favorites::list(self).await.unwrap_or_else(|e| {
                warn!(error = %e, "favorites unavailable");
                Vec::new()
            })),
            Route::Subscribe => Screen::Subscribe(subscription::screen(self)),
            Route::Billing => Screen::Billing(billing::history(self).await.unwrap_or_else(|e| {
                warn!(error = %e, "billing history unavailable");
                Vec::new()
            })),
            Route::Movie(id) => Screen::Movie(Box::new(catalog::movie_screen(self, id).await)),
        }
    }
}
