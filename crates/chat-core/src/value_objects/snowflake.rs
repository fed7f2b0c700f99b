//! Ids for users, chats, messages and reactions
//!
//! A `Snowflake` is a 64-bit integer that grows with issue time, so the
//! id doubles as the tie-breaker in the `(created_at, id)` ordering key
//! of message listings and cursors. On the wire it is always a decimal
//! string; numbers are still accepted on input.
//!
//! Layout: millisecond clock since 2024-01-01 UTC in the high 42 bits,
//! a 10-bit worker id, then a 12-bit per-millisecond counter.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const ID_EPOCH_MS: i64 = 1_704_067_200_000;
const WORKER_BITS: u32 = 10;
const COUNTER_BITS: u32 = 12;
const WORKER_MASK: i64 = (1 << WORKER_BITS) - 1;
const COUNTER_MASK: i64 = (1 << COUNTER_BITS) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Snowflake(i64);

impl Snowflake {
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw value as stored in BIGINT columns
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.trim()
            .parse::<i64>()
            .map(Snowflake)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("id is not a decimal integer")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Text(String),
            Number(i64),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Number(n) => Ok(Snowflake(n)),
            Wire::Text(s) => Snowflake::parse(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Issues strictly increasing ids for one worker
///
/// When more than 4096 ids are requested within one millisecond the
/// counter rolls into the next millisecond instead of waiting for it.
pub struct SnowflakeGenerator {
    worker_id: u16,
    last: AtomicI64,
}

impl SnowflakeGenerator {
    /// Only the low 10 bits of `worker_id` are used
    pub fn new(worker_id: u16) -> Self {
        Self {
            worker_id: (i64::from(worker_id) & WORKER_MASK) as u16,
            last: AtomicI64::new(0),
        }
    }

    pub fn generate(&self) -> Snowflake {
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let next = self.next_after(last, now_ms() - ID_EPOCH_MS);
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Snowflake(next),
                Err(current) => last = current,
            }
        }
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }

    fn next_after(&self, last: i64, clock: i64) -> i64 {
        let last_clock = last >> (WORKER_BITS + COUNTER_BITS);
        let counter = last & COUNTER_MASK;
        let (clock, counter) = if clock > last_clock {
            (clock, 0)
        } else if counter < COUNTER_MASK {
            (last_clock, counter + 1)
        } else {
            (last_clock + 1, 0)
        };
        (clock << (WORKER_BITS + COUNTER_BITS)) | (i64::from(self.worker_id) << COUNTER_BITS) | counter
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(ID_EPOCH_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_accepts_decimal_only() {
        assert_eq!(Snowflake::parse("123456789").unwrap().into_inner(), 123456789);
        assert_eq!(" 42 ".parse::<Snowflake>().unwrap(), Snowflake::new(42));
        assert_eq!(Snowflake::parse("abc"), Err(SnowflakeParseError::InvalidFormat));
        assert!(Snowflake::parse("").is_err());
    }

    #[test]
    fn test_json_form_is_a_string() {
        let id = Snowflake::new(123456789012345678);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"123456789012345678\"");
    }

    #[test]
    fn test_json_accepts_string_or_number() {
        let from_text: Snowflake = serde_json::from_str("\"123456789012345678\"").unwrap();
        assert_eq!(from_text.into_inner(), 123456789012345678);

        let from_number: Snowflake = serde_json::from_str("12345").unwrap();
        assert_eq!(from_number, Snowflake::new(12345));

        assert!(serde_json::from_str::<Snowflake>("\"12x\"").is_err());
        assert!(serde_json::from_str::<Snowflake>("true").is_err());
    }

    #[test]
    fn test_generated_ids_are_unique_and_increasing() {
        let gen = SnowflakeGenerator::new(1);
        let mut seen = HashSet::new();
        let mut last = Snowflake::new(0);

        for _ in 0..10_000 {
            let id = gen.generate();
            assert!(id > last);
            assert!(seen.insert(id));
            last = id;
        }
    }

    #[test]
    fn test_counter_rollover_moves_to_next_millisecond() {
        let gen = SnowflakeGenerator::new(3);
        let full = (7 << (WORKER_BITS + COUNTER_BITS)) | (3 << COUNTER_BITS) | COUNTER_MASK;

        let next = gen.next_after(full, 7);
        assert!(next > full);
        assert_eq!(next >> (WORKER_BITS + COUNTER_BITS), 8);
        assert_eq!(next & COUNTER_MASK, 0);
        assert_eq!((next >> COUNTER_BITS) & WORKER_MASK, 3);
    }

    #[test]
    fn test_clock_going_backwards_keeps_order() {
        let gen = SnowflakeGenerator::new(0);
        let last = gen.next_after(0, 1_000);
        assert!(gen.next_after(last, 900) > last);
    }

    #[test]
    fn test_worker_id_is_masked_to_ten_bits() {
        assert_eq!(SnowflakeGenerator::new(42).worker_id(), 42);
        assert_eq!(SnowflakeGenerator::new(1024 + 5).worker_id(), 5);
    }

    #[test]
    fn test_concurrent_generators_never_collide() {
        let gen = std::sync::Arc::new(SnowflakeGenerator::new(9));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gen = gen.clone();
                std::thread::spawn(move || (0..2_000).map(|_| gen.generate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), 8_000);
    }
}
