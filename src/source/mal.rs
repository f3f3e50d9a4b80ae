//! MyAnimeList list pages.
//!
//! The public list page embeds the whole list as HTML-escaped JSON in a
//! `data-items` attribute; no API key is needed as long as the list is public.

use std::time::Duration;

use serde_json::Value;

use super::{ListSource, SourceError};
use crate::entry::{Entry, MediaKind, Status};

const BASE_URL: &str = "https://myanimelist.net";
const CDN_URL: &str = "https://cdn.myanimelist.net";
const PLACEHOLDER_COVER: &str = "https://cdn.myanimelist.net/images/qm_50.gif";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Scrapes public MyAnimeList anime/manga lists
#[derive(Debug, Default, Clone)]
pub struct MalListSource;

impl MalListSource {
    pub fn new() -> Self {
        Self
    }

    fn fetch_page(&self, url: &str) -> Result<String, SourceError> {
        // Built per request: the worker thread that calls this owns it start to end
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client.get(url).send()?;
        if !response.status().is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }
        Ok(response.text()?)
    }
}

impl ListSource for MalListSource {
    fn fetch(
        &self,
        username: &str,
        status: Status,
        kind: MediaKind,
    ) -> Result<Vec<Entry>, SourceError> {
        let url = list_url(username, status, kind);
        log::info!("Fetching MAL list: {}", url);

        let html = self.fetch_page(&url)?;
        let data = extract_data_items(&html).ok_or_else(|| SourceError::MissingDataItems(url))?;
        let entries = parse_items(&unescape_html(data), status, kind)?;

        log::info!("Fetched {} {} entries ({})", entries.len(), kind, status);
        Ok(entries)
    }
}

/// Numeric status code the list page filters by
pub fn status_code(status: Status) -> &'static str {
    match status {
        Status::Reading | Status::Watching => "1",
        Status::Completed => "2",
        Status::Paused => "3",
        Status::Dropped => "4",
        Status::Planning => "6",
    }
}

pub fn list_url(username: &str, status: Status, kind: MediaKind) -> String {
    format!(
        "{}/{}list/{}?status={}",
        BASE_URL,
        kind.as_str(),
        username,
        status_code(status)
    )
}

/// Value of the first `data-items=` attribute, either quote style
pub fn extract_data_items(html: &str) -> Option<&str> {
    const KEY: &str = "data-items=";
    let after_key = html.find(KEY)? + KEY.len();
    let quote_offset = html[after_key..].find(['"', '\''])?;
    let value_start = after_key + quote_offset + 1;
    let quote = html[after_key + quote_offset..].chars().next()?;
    let value_len = html[value_start..].find(quote)?;
    if value_len == 0 {
        return None;
    }
    Some(&html[value_start..value_start + value_len])
}

pub fn unescape_html(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Full-size, absolute cover URL for a list thumbnail path
pub fn normalize_image_url(url: &str) -> String {
    if url.is_empty() {
        return PLACEHOLDER_COVER.to_string();
    }

    let mut normalized = url.replacen("/r/96x136", "", 1).replacen("/r/50x70", "", 1);

    if normalized.starts_with("//") {
        normalized = format!("https:{}", normalized);
    } else if normalized.starts_with('/') {
        normalized = format!("{}{}", CDN_URL, normalized);
    }

    normalized
}

/// Titles made only of digits come back as JSON numbers
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Turn the decoded `data-items` JSON into entries tagged with `status`
pub fn parse_items(json: &str, status: Status, kind: MediaKind) -> Result<Vec<Entry>, SourceError> {
    let items: Vec<Value> = serde_json::from_str(json)?;

    let prefix = kind.as_str();
    let id_key = format!("{}_id", prefix);
    let title_key = format!("{}_title", prefix);
    let image_key = format!("{}_image_path", prefix);
    let progress_key = match kind {
        MediaKind::Manga => "num_read_chapters",
        MediaKind::Anime => "num_watched_episodes",
    };

    let entries = items
        .iter()
        .filter_map(|item| {
            let (Some(id), Some(title)) = (
                item.get(&id_key).and_then(value_to_string),
                item.get(&title_key).and_then(value_to_string),
            ) else {
                log::debug!("Skipping list item without id/title: {}", item);
                return None;
            };
            let cover = item.get(&image_key).and_then(Value::as_str).unwrap_or("");
            let progress = item
                .get(progress_key)
                .and_then(Value::as_u64)
                .unwrap_or(0)
                .min(u32::MAX as u64) as u32;

            Some(Entry {
                id,
                title,
                cover_url: normalize_image_url(cover),
                status,
                progress,
                media: kind,
            })
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_url() {
        assert_eq!(
            list_url("someone", Status::Reading, MediaKind::Manga),
            "https://myanimelist.net/mangalist/someone?status=1"
        );
        assert_eq!(
            list_url("someone", Status::Planning, MediaKind::Anime),
            "https://myanimelist.net/animelist/someone?status=6"
        );
    }

    #[test]
    fn test_extract_data_items_quote_styles() {
        let html = r#"<table class="list-table" data-items="[1,2]">"#;
        assert_eq!(extract_data_items(html), Some("[1,2]"));

        let html = "<table data-items='[{&quot;a&quot;:1}]'>";
        assert_eq!(extract_data_items(html), Some("[{&quot;a&quot;:1}]"));
    }

    #[test]
    fn test_extract_data_items_missing() {
        assert_eq!(extract_data_items("<html></html>"), None);
        assert_eq!(extract_data_items(r#"<table data-items="">"#), None);
        assert_eq!(extract_data_items(r#"<table data-items="[1"#), None);
    }

    #[test]
    fn test_unescape_html() {
        assert_eq!(
            unescape_html("&quot;Fate&#039;s &amp; &lt;Zero&gt;&quot;"),
            "\"Fate's & <Zero>\""
        );
        // &amp; is decoded last so escaped entities survive
        assert_eq!(unescape_html("&amp;quot;"), "&quot;");
    }

    #[test]
    fn test_normalize_image_url() {
        assert_eq!(normalize_image_url(""), PLACEHOLDER_COVER);
        assert_eq!(
            normalize_image_url("https://cdn.myanimelist.net/r/96x136/images/manga/3/1.jpg?s=x"),
            "https://cdn.myanimelist.net/images/manga/3/1.jpg?s=x"
        );
        assert_eq!(
            normalize_image_url("//cdn.myanimelist.net/r/50x70/images/anime/1.jpg"),
            "https://cdn.myanimelist.net/images/anime/1.jpg"
        );
        assert_eq!(
            normalize_image_url("/images/anime/2.jpg"),
            "https://cdn.myanimelist.net/images/anime/2.jpg"
        );
    }

    #[test]
    fn test_parse_manga_items() {
        let json = r#"[
            {"manga_id": 2, "manga_title": "Berserk", "manga_image_path": "/r/96x136/images/manga/1/157897.jpg", "num_read_chapters": 374},
            {"manga_id": 13, "manga_title": 86, "manga_image_path": ""},
            {"manga_title": "no id"}
        ]"#;

        let entries = parse_items(json, Status::Reading, MediaKind::Manga).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "2");
        assert_eq!(entries[0].title, "Berserk");
        assert_eq!(entries[0].progress, 374);
        assert_eq!(
            entries[0].cover_url,
            "https://cdn.myanimelist.net/images/manga/1/157897.jpg"
        );
        assert_eq!(entries[0].status, Status::Reading);
        assert_eq!(entries[0].media, MediaKind::Manga);
        assert_eq!(entries[1].title, "86");
        assert_eq!(entries[1].progress, 0);
        assert_eq!(entries[1].cover_url, PLACEHOLDER_COVER);
    }

    #[test]
    fn test_parse_anime_items() {
        let json = r#"[{"anime_id": 1, "anime_title": "Cowboy Bebop", "anime_image_path": "//x/a.jpg", "num_watched_episodes": 26}]"#;
        let entries = parse_items(json, Status::Completed, MediaKind::Anime).unwrap();
        assert_eq!(entries[0].progress, 26);
        assert_eq!(entries[0].cover_url, "https://x/a.jpg");
        assert_eq!(entries[0].status, Status::Completed);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            parse_items("not json", Status::Reading, MediaKind::Manga),
            Err(SourceError::Json(_))
        ));
    }
}
