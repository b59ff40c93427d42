//! Entity identifiers
//!
//! Every user, article, and comment is addressed by one 64-bit integer id.
//! Ids arriving from the outside (path segments, JSON bodies, token
//! subjects) are parsed through [`EntityId::parse`] exactly once, so the
//! rest of the system never compares a string id against an integer one.
//!
//! Layout of generated ids:
//! - Bits 63-22: milliseconds since [`EntityId::EPOCH`]
//! - Bits 21-12: worker id (0-1023)
//! - Bits 11-0:  per-millisecond sequence (0-4095)

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier shared by every entity in the blog domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Custom epoch: 2024-01-01 00:00:00 UTC (milliseconds)
    pub const EPOCH: i64 = 1_704_067_200_000;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Ids are strictly positive once validated
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 > 0
    }

    /// Parse and validate an id received at the boundary
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| IdParseError::InvalidFormat)?;
        Self::try_from_raw(raw)
    }

    /// Validate a raw integer id received at the boundary
    pub fn try_from_raw(raw: i64) -> Result<Self, IdParseError> {
        if raw <= 0 {
            return Err(IdParseError::NotPositive(raw));
        }
        Ok(Self(raw))
    }

    /// Worker that generated this id
    #[inline]
    pub fn worker_id(self) -> u16 {
        ((self.0 >> 12) & 0x3FF) as u16
    }

    /// Milliseconds since the Unix epoch at which this id was generated
    #[inline]
    pub fn timestamp_millis(self) -> i64 {
        (self.0 >> 22) + Self::EPOCH
    }
}

/// Rejected id input
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdParseError {
    #[error("id is not an integer")]
    InvalidFormat,

    #[error("id must be positive, got {0}")]
    NotPositive(i64),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl std::str::FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Clients send ids either as JSON numbers or as numeric strings
impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        let parsed = match RawId::deserialize(deserializer)? {
            RawId::Number(n) => EntityId::try_from_raw(n),
            RawId::Text(s) => EntityId::parse(&s),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}

/// Monotonic id generator, safe to share between tasks
pub struct IdGenerator {
    worker_id: u16,
    // (last timestamp, sequence within that millisecond)
    state: Mutex<(i64, i64)>,
}

impl IdGenerator {
    /// # Panics
    /// Panics if worker_id >= 1024
    pub fn new(worker_id: u16) -> Self {
        assert!(worker_id < 1024, "Worker ID must be < 1024");
        Self {
            worker_id,
            state: Mutex::new((0, 0)),
        }
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }

    /// Produce the next id
    pub fn next_id(&self) -> EntityId {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let (last, seq) = *state;

        let mut now = Self::now_millis().max(last);
        let sequence = if now == last {
            let next = (seq + 1) & 0xFFF;
            if next == 0 {
                // Sequence exhausted for this millisecond, borrow the next one
                now = last + 1;
            }
            next
        } else {
            0
        };
        *state = (now, sequence);

        EntityId::new(((now - EntityId::EPOCH) << 22) | (i64::from(self.worker_id) << 12) | sequence)
    }

    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(EntityId::EPOCH)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}
