//! HTTP client for the panel's administrative endpoints.
//!
//! All requests share the [`Session`] cookie jar, so the `_xsrf` token the
//! panel hands out on `GET /login` and the `player` cookie from a
//! successful login ride along automatically.

use log::{debug, info, warn};
use reqwest::Response;

use super::error::AdminError;
use super::types::{ActionRequest, ActionResponse, PlayerAction, PlayerList, ServerAction};
use crate::session::{LOGIN_COOKIE, Session, XSRF_COOKIE};

const LOGIN_PATH: &str = "/login";
const LOGOUT_PATH: &str = "/logout";
const PLAYER_ACTION_PATH: &str = "ajax/playeraction";
const QUICK_MENU_PATH: &str = "ajax/playerquickmenu.html";

pub struct AdminClient {
    session: Session,
    http: reqwest::Client,
}

impl AdminClient {
    pub fn new(session: Session) -> Result<Self, AdminError> {
        let http = reqwest::Client::builder()
            .cookie_provider(session.jar())
            .build()
            .map_err(|e| AdminError::Config(e.to_string()))?;
        Ok(Self { session, http })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Logs in with the owner credentials.
    ///
    /// Fetches the login page first so the panel issues an `_xsrf` cookie,
    /// then posts the form. The panel re-renders the form on bad
    /// credentials, so success is judged by the login cookie appearing.
    pub async fn login(&self, name: &str, password: &str) -> Result<(), AdminError> {
        let url = self.session.join(LOGIN_PATH)?;
        info!("Logging in to {} as {}", url, name);

        let page = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AdminError::Network(e.to_string()))?;
        ensure_success(page).await?;

        let xsrf = self.xsrf_token();
        let response = self
            .http
            .post(url)
            .form(&[("name", name), ("password", password), ("_xsrf", xsrf.as_str())])
            .send()
            .await
            .map_err(|e| AdminError::Network(e.to_string()))?;
        ensure_success(response).await?;

        if self.session.cookie(LOGIN_COOKIE).is_none() {
            warn!("Login as {} rejected by the panel", name);
            return Err(AdminError::LoginRejected);
        }
        info!("Logged in as {}", name);
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), AdminError> {
        let url = self.session.join(LOGOUT_PATH)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AdminError::Network(e.to_string()))?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Hits a server-level action URL. The returned page is not inspected
    /// beyond making sure it isn't the login form.
    pub async fn server_action(&self, action: ServerAction) -> Result<(), AdminError> {
        info!("Server action: {}", action.description());
        self.get_page(action.path(), &[]).await?;
        Ok(())
    }

    /// Posts one player action and returns the panel's verdict.
    ///
    /// A missing `_xsrf` cookie is sent as an empty token; the panel is the
    /// one to refuse it.
    pub async fn player_action(
        &self,
        player: &str,
        action: PlayerAction,
    ) -> Result<ActionResponse, AdminError> {
        let url = self.session.join(PLAYER_ACTION_PATH)?;
        let request = ActionRequest::new(player, action, self.xsrf_token());
        info!("Player action: {} {}", action, player);

        let response = self
            .http
            .post(url)
            .form(&request)
            .send()
            .await
            .map_err(|e| AdminError::Network(e.to_string()))?;
        let response = ensure_logged_in(ensure_success(response).await?)?;

        let body = response
            .text()
            .await
            .map_err(|e| AdminError::Network(e.to_string()))?;
        debug!("Player action response: {}", body);
        serde_json::from_str(&body).map_err(|e| AdminError::Parse(e.to_string()))
    }

    /// Fetches the pre-rendered quick menu for a player, verbatim.
    pub async fn quick_menu(&self, player: &str) -> Result<String, AdminError> {
        self.get_page(QUICK_MENU_PATH, &[("playername", player)]).await
    }

    /// Fetches one of the player listings, verbatim.
    pub async fn player_list(&self, list: PlayerList) -> Result<String, AdminError> {
        self.get_page(list.path(), &[]).await
    }

    /// GET on a page behind the panel's login, returning the body.
    async fn get_page(&self, path: &str, query: &[(&str, &str)]) -> Result<String, AdminError> {
        let url = self.session.join(path)?;
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AdminError::Network(e.to_string()))?;
        let response = ensure_logged_in(ensure_success(response).await?)?;
        response
            .text()
            .await
            .map_err(|e| AdminError::Network(e.to_string()))
    }

    fn xsrf_token(&self) -> String {
        self.session.cookie(XSRF_COOKIE).unwrap_or_else(|| {
            warn!("No {} cookie in session, sending empty token", XSRF_COOKIE);
            String::new()
        })
    }
}

async fn ensure_success(response: Response) -> Result<Response, AdminError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    warn!("Panel error: {} - {}", status, message);
    Err(AdminError::Api { status, message })
}

/// Unauthenticated requests are redirected to the login form, which the
/// client follows and gets back as a 200.
fn ensure_logged_in(response: Response) -> Result<Response, AdminError> {
    if response.url().path() == LOGIN_PATH {
        warn!("Panel redirected to its login page");
        return Err(AdminError::NotLoggedIn);
    }
    Ok(response)
}
