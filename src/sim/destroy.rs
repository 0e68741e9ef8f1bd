//! The destroy set: ids of ground tiles doomed to crumble

use rand::Rng;

/// Append-only history of doomed tile ids for the current run.
///
/// `None` entries are warm-up no-ops; they keep the history length equal to the
/// number of mutations performed.
#[derive(Debug, Clone, Default)]
pub struct DestroySet {
    entries: Vec<Option<u8>>,
    /// Set once a draw found every id taken
    exhausted: bool,
}

impl DestroySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mutations recorded (sentinels included)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once a draw has run out of fresh ids
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Whether a real id is present
    pub fn contains(&self, id: u8) -> bool {
        self.entries.contains(&Some(id))
    }

    /// Real ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.iter().flatten().copied()
    }

    pub fn push(&mut self, id: u8) {
        self.entries.push(Some(id));
    }

    pub fn push_sentinel(&mut self) {
        self.entries.push(None);
    }

    /// Append a uniformly drawn id in `[0, range)` that isn't present yet.
    ///
    /// Once every id is taken a sentinel is appended instead and `None` is
    /// returned, so the draw always terminates.
    pub fn push_random<R: Rng + ?Sized>(&mut self, rng: &mut R, range: u8) -> Option<u8> {
        if range == 0 || self.ids().filter(|&id| id < range).count() >= range as usize {
            if !self.exhausted {
                log::warn!("Destroy set exhausted all {} ids", range);
                self.exhausted = true;
            }
            self.push_sentinel();
            return None;
        }
        loop {
            let id = rng.random_range(0..range);
            if !self.contains(id) {
                self.push(id);
                return Some(id);
            }
        }
    }
}
