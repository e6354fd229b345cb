use std::{collections::HashMap, hash::Hash, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::types::CountryCode;

pub fn parse_country_code(s: &str) -> Result<CountryCode, String> {
    CountryCode::new(s)
}

/// Name the exported table is stored under, e.g. `spotify_GB_tracks`.
pub fn dataset_name(country: &CountryCode) -> String {
    format!("spotify_{}_tracks", country)
}

/// Expands `{country}` in each search template.
pub fn search_queries(templates: &[String], country: &CountryCode) -> Vec<String> {
    templates
        .iter()
        .map(|t| t.replace("{country}", country.as_str()))
        .collect()
}

/// Deduplicates by key keeping the position of the first occurrence and the
/// value of the last one. Items whose key is `None` are dropped.
pub fn dedupe_last_wins<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> Option<K>,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut unique: Vec<T> = Vec::new();

    for item in items {
        let Some(k) = key(&item) else {
            continue;
        };

        match positions.get(&k) {
            Some(&idx) => unique[idx] = item,
            None => {
                positions.insert(k, unique.len());
                unique.push(item);
            }
        }
    }

    unique
}

/// Number of calls needed to send `total` items in batches of `batch_size`.
pub fn batch_count(total: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    total.div_ceil(batch_size)
}

pub fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} [{bar:30.blue}] {pos}/{len} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏").progress_chars("=> "));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn spinner(message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Formats a track length as `m:ss`.
pub fn format_duration_ms(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
