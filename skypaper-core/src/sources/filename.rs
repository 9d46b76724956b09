use chrono::{DateTime, Local};

use crate::models::FetchMeta;

const PREFIX_FORMAT: &str = "%Y%m%d-%H%M%S";

pub fn timestamp_prefix(now: &DateTime<Local>) -> String {
    now.format(PREFIX_FORMAT).to_string()
}

/// Default naming: `YYYYMMDD-HHMMSS_<name>`, where the name comes from the
/// `Content-Disposition` filename, else the last URL path segment, else the
/// unix timestamp.
pub fn derive_filename(meta: Option<&FetchMeta>, endpoint: &str, now: DateTime<Local>) -> String {
    let source_url = meta.map(|m| m.source_url.as_str()).unwrap_or(endpoint);

    let name = meta
        .and_then(|m| m.content_disposition.as_deref())
        .and_then(disposition_filename)
        .or_else(|| url_basename(source_url))
        .or_else(|| url_basename(endpoint))
        .unwrap_or_else(|| now.timestamp().to_string());

    format!("{}_{name}", timestamp_prefix(&now))
}

/// Pull the `filename=` parameter out of a `Content-Disposition` value.
pub fn disposition_filename(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for param in value.split(';').skip(1) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename" => plain = Some(raw),
            // RFC 5987: charset'lang'value
            "filename*" => extended = Some(raw.rsplit('\'').next().unwrap_or(raw)),
            _ => {}
        }
    }

    plain.or(extended).and_then(clean_name)
}

fn url_basename(url: &str) -> Option<String> {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let segment = path.rsplit('/').next()?;
    sanitize(segment)
}

fn clean_name(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode(raw.trim())
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.trim().to_string());
    sanitize(&decoded)
}

/// Drop quotes and any directory part so the name stays inside the save dir.
pub fn sanitize(name: &str) -> Option<String> {
    let unquoted = name.replace('"', "");
    let base = unquoted
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    Some(base.to_string())
}
