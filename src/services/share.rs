use crate::models::MediaItem;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const MESSENGER_APP_ID: &str = "123456789";

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct SharePlatform {
    pub name: &'static str,
    pub url: String,
    /// Deep link preferred on mobile devices.
    pub mobile_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareLinks {
    pub url: String,
    pub text: String,
    pub file_name: String,
    pub platforms: Vec<SharePlatform>,
}

pub fn share_text(item: &MediaItem) -> String {
    format!("Check out this {}: {}", item.media_type, item.title)
}

/// File name offered to native share sheets.
pub fn share_file_name(item: &MediaItem) -> String {
    let stem = if item.title.trim().is_empty() {
        "media-file"
    } else {
        item.title.as_str()
    };
    format!("{}{}", stem, item.media_type.share_extension())
}

pub fn share_links(item: &MediaItem) -> ShareLinks {
    let text = share_text(item);
    let url = encode_component(&item.url);
    let encoded_text = encode_component(&text);

    let platforms = vec![
        SharePlatform {
            name: "WhatsApp",
            url: format!("https://wa.me/?text={}%20{}", encoded_text, url),
            mobile_url: None,
        },
        SharePlatform {
            name: "Telegram",
            url: format!("https://t.me/share/url?url={}&text={}", url, encoded_text),
            mobile_url: None,
        },
        SharePlatform {
            name: "Messenger",
            url: format!(
                "https://www.facebook.com/dialog/send?app_id={}&link={}&redirect_uri={}",
                MESSENGER_APP_ID, url, url
            ),
            mobile_url: Some(format!("fb-messenger://share/?link={}", url)),
        },
    ];

    ShareLinks {
        url: item.url.clone(),
        text,
        file_name: share_file_name(item),
        platforms,
    }
}

/// Picks the link to open for a platform given the caller's user agent.
pub fn link_for_agent<'a>(platform: &'a SharePlatform, user_agent: &str) -> &'a str {
    let ua = user_agent.to_ascii_lowercase();
    let mobile = ["iphone", "ipad", "ipod", "android"]
        .iter()
        .any(|m| ua.contains(m));
    match (&platform.mobile_url, mobile) {
        (Some(deep), true) => deep,
        _ => &platform.url,
    }
}
