//! Browser fingerprint for provider requests
//!
//! The CinemaOS API only answers requests that look like its own web
//! player running in desktop Chrome, so every provider call carries the
//! same fixed header set.

use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER, USER_AGENT,
};

/// Browser profile with a fixed fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserProfile {
    pub user_agent: &'static str,
    pub accept: &'static str,
    pub accept_language: &'static str,
    pub content_type: &'static str,
    pub sec_ch_ua: &'static str,
    pub sec_ch_ua_mobile: &'static str,
    pub sec_ch_ua_platform: &'static str,
    pub sec_fetch_dest: &'static str,
    pub sec_fetch_mode: &'static str,
    pub sec_fetch_site: &'static str,
}

/// Chrome 139 on Windows, as the CinemaOS web player sends it.
pub const CHROME_WINDOWS: BrowserProfile = BrowserProfile {
    user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36",
    accept: "*/*",
    accept_language: "en-US,en;q=0.9",
    content_type: "application/json",
    sec_ch_ua: "\"Not;A=Brand\";v=\"99\", \"Google Chrome\";v=\"139\", \"Chromium\";v=\"139\"",
    sec_ch_ua_mobile: "?0",
    sec_ch_ua_platform: "\"Windows\"",
    sec_fetch_dest: "empty",
    sec_fetch_mode: "cors",
    sec_fetch_site: "same-origin",
};

/// Shorter UA used for metadata lookups.
pub const METADATA_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

impl BrowserProfile {
    /// Convert profile to HTTP headers, with `referer` as the page origin.
    pub fn to_headers(&self, referer: HeaderValue) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent));
        headers.insert(ACCEPT, HeaderValue::from_static(self.accept));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(self.accept_language));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        headers.insert(REFERER, referer);

        headers.insert("Sec-CH-UA", HeaderValue::from_static(self.sec_ch_ua));
        headers.insert("Sec-CH-UA-Mobile", HeaderValue::from_static(self.sec_ch_ua_mobile));
        headers.insert("Sec-CH-UA-Platform", HeaderValue::from_static(self.sec_ch_ua_platform));

        headers.insert("Sec-Fetch-Dest", HeaderValue::from_static(self.sec_fetch_dest));
        headers.insert("Sec-Fetch-Mode", HeaderValue::from_static(self.sec_fetch_mode));
        headers.insert("Sec-Fetch-Site", HeaderValue::from_static(self.sec_fetch_site));

        headers
    }
}

impl Default for BrowserProfile {
    fn default() -> Self {
        CHROME_WINDOWS
    }
}
