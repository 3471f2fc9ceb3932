//! Buff163 market HTTP client

use std::time::Duration;

use reqwest::header::{ ACCEPT, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue };

use super::error::{ MarketError, MarketResult };
use super::models::MarketItem;
use super::parser::parse_listings;
use crate::config::{
    BuffSettings,
    DEFAULT_BUFF_BASE_URL,
    DEFAULT_GAME,
    DEFAULT_LOCALE,
    DEFAULT_USER_AGENT,
    MARKET_GOODS_PATH,
    SESSION_COOKIE_NAME,
};
use crate::log_debug;

/// Everything the client sends besides the search text
#[derive(Clone)]
pub struct BuffClientOptions {
    pub base_url: String,
    pub session_cookie: String,
    pub game: String,
    pub locale: String,
    pub user_agent: String,
    pub request_timeout: Option<Duration>,
}

impl BuffClientOptions {
    pub fn new(session_cookie: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BUFF_BASE_URL.to_string(),
            session_cookie: session_cookie.into(),
            game: DEFAULT_GAME.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: None,
        }
    }

    /// `None` when no session cookie is configured
    pub fn from_settings(settings: &BuffSettings) -> Option<Self> {
        let cookie = settings.session_cookie()?;

        Some(Self {
            base_url: settings.base_url.clone(),
            session_cookie: cookie.to_string(),
            game: settings.game.clone(),
            locale: settings.locale.clone(),
            user_agent: settings.user_agent.clone(),
            request_timeout: settings.request_timeout(),
        })
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

// Keeps the cookie out of debug output
impl std::fmt::Debug for BuffClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuffClientOptions")
            .field("base_url", &self.base_url)
            .field("session_cookie", &"<redacted>")
            .field("game", &self.game)
            .field("locale", &self.locale)
            .field("user_agent", &self.user_agent)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

pub struct BuffClient {
    client: reqwest::Client,
    goods_url: String,
    game: String,
}

impl BuffClient {
    /// Build a client whose every request carries the session cookie and locale
    pub fn new(options: BuffClientOptions) -> MarketResult<Self> {
        let mut headers = HeaderMap::new();

        let mut cookie = HeaderValue::from_str(
            &format!("{}={}", SESSION_COOKIE_NAME, options.session_cookie)
        ).map_err(|_| MarketError::InvalidSetting("session_cookie".to_string()))?;
        cookie.set_sensitive(true);
        headers.insert(COOKIE, cookie);

        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&options.locale).map_err(|_|
                MarketError::InvalidSetting("locale".to_string())
            )?
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client
            ::builder()
            .default_headers(headers)
            .user_agent(options.user_agent.as_str());
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            goods_url: format!("{}{}", options.base_url.trim_end_matches('/'), MARKET_GOODS_PATH),
            game: options.game,
        })
    }

    /// Search the goods listings for `text`
    ///
    /// Returns the first page as sent by the market, in source order.
    pub async fn search_goods(&self, text: &str) -> MarketResult<Vec<MarketItem>> {
        log_debug!("Searching Buff163 goods for: {}", text);

        let response = self.client
            .get(&self.goods_url)
            .query(&[("game", self.game.as_str()), ("page_num", "1"), ("search", text)])
            .send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Http(status));
        }

        let body = response.text().await?;
        let items = parse_listings(&body)?;

        log_debug!("Buff163 returned {} goods for: {}", items.len(), text);
        Ok(items)
    }
}
