//! Score leaderboard
//!
//! Every finished run is kept, best first. Stored in the player data file as
//! `timestamp|score` pairs joined by `;`.

use chrono::{DateTime, Utc};

use crate::persistence::PlayerData;

/// Player data key holding the leaderboard
pub const STORAGE_KEY: &str = "LeaderBoard";

/// A single leaderboard entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// Unix timestamp (seconds) when the run ended
    pub timestamp: u64,
    pub score: u64,
}

/// One rendered leaderboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardLine {
    pub text: String,
    /// Entry of the run that just ended
    pub latest: bool,
    /// Best entry or latest entry
    pub bold: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Parse the stored form, skipping malformed entries
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<LeaderboardEntry> = text
            .split(';')
            .filter_map(|entry| {
                let (timestamp, score) = entry.split_once('|')?;
                Some(LeaderboardEntry {
                    timestamp: timestamp.trim().parse().ok()?,
                    score: score.trim().parse().ok()?,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        Self { entries }
    }

    /// Stored form, best score first
    pub fn serialize(&self) -> String {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries
            .iter()
            .map(|e| format!("{}|{}", e.timestamp, e.score))
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn load(data: &mut PlayerData) -> Self {
        match data.get_string(STORAGE_KEY) {
            Some(text) => {
                let board = Self::parse(&text);
                log::info!("Loaded {} leaderboard entries", board.entries.len());
                board
            }
            None => {
                log::info!("No leaderboard found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, data: &mut PlayerData) {
        data.set_string(STORAGE_KEY, &self.serialize());
        data.save();
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
    }

    /// Insert a finished run, keeping the list sorted by score (descending).
    /// Returns the rank achieved (1-indexed); ties keep older entries first.
    pub fn add_score(&mut self, score: u64, timestamp: u64) -> usize {
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, LeaderboardEntry { timestamp, score });
        pos + 1
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Display rows for the first `count` entries, marking the one recorded at
    /// `latest`
    pub fn lines(&self, count: usize, latest: Option<u64>) -> Vec<LeaderboardLine> {
        self.entries
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, e)| {
                let is_latest = latest == Some(e.timestamp);
                LeaderboardLine {
                    text: format!("{}  -  {}", format_timestamp(e.timestamp), e.score),
                    latest: is_latest,
                    bold: i == 0 || is_latest,
                }
            })
            .collect()
    }
}

/// Seconds since the epoch, for stamping new entries
pub fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

fn to_datetime(timestamp: u64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(i64::try_from(timestamp).ok()?, 0)
}

/// `dd/mm/yy hh:mm` (UTC)
pub fn format_timestamp(timestamp: u64) -> String {
    to_datetime(timestamp)
        .map(|dt| dt.format("%d/%m/%y %H:%M").to_string())
        .unwrap_or_default()
}

/// Format a timestamp relative to `now` (both in seconds)
pub fn format_date(timestamp: u64, now: u64) -> String {
    let diff_secs = now.saturating_sub(timestamp);
    let diff_mins = diff_secs / 60;
    let diff_hours = diff_mins / 60;
    let diff_days = diff_hours / 24;

    if diff_days >= 1 {
        if diff_days == 1 {
            "Yesterday".to_string()
        } else if diff_days < 7 {
            format!("{} days ago", diff_days)
        } else {
            // Format as date
            to_datetime(timestamp)
                .map(|dt| dt.format("%-d/%-m/%y").to_string())
                .unwrap_or_default()
        }
    } else if diff_hours >= 1 {
        if diff_hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", diff_hours)
        }
    } else if diff_mins >= 1 {
        if diff_mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", diff_mins)
        }
    } else {
        "Just now".to_string()
    }
}
