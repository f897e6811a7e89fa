//! Converts YouTube watch/share/embed links into embeddable player URLs.

use url::Url;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// YouTube start offsets: `90`, `90s`, `1m30s` and `1h2m3s` all count seconds.
pub(crate) fn start_to_seconds(value: &str) -> Option<u64> {
    let mut total = 0u64;
    let mut digits = String::new();
    let mut saw_unit = false;

    for ch in value.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let multiplier = match ch {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => {
                digits.clear();
                continue;
            }
        };
        if let Ok(amount) = digits.parse::<u64>() {
            total += amount * multiplier;
            saw_unit = true;
        }
        digits.clear();
    }

    if saw_unit {
        return Some(total);
    }

    let leading: String = value.chars().take_while(char::is_ascii_digit).collect();
    leading.parse().ok()
}

/// Returns `None` for anything that is not a recognizable YouTube video link.
pub(crate) fn to_embed_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let host = url.host_str()?;

    let (video_id, start) = if host == "youtu.be" {
        (url.path().trim_start_matches('/').to_string(), query_param(&url, "t"))
    } else if host.contains("youtube.com") {
        if let Some((_, id)) = url.path().split_once("/embed/") {
            (id.to_string(), query_param(&url, "start"))
        } else if url.path().contains("/watch") {
            (query_param(&url, "v")?, query_param(&url, "t"))
        } else {
            return None;
        }
    } else {
        tracing::debug!(url = raw, "Unsupported video host");
        return None;
    };

    let video_id = video_id.trim_end_matches('/');
    if video_id.is_empty() {
        return None;
    }

    match start.as_deref().and_then(start_to_seconds) {
        Some(seconds) => Some(format!("{EMBED_BASE}{video_id}?start={seconds}")),
        None => Some(format!("{EMBED_BASE}{video_id}")),
    }
}
