//! Time-sortable 26-character identifiers.
//!
//! Layout: 10 base-32 characters of millisecond timestamp (48 bits used)
//! followed by 16 base-32 characters of randomness (80 bits). Lexicographic
//! order of the strings equals chronological order of the timestamps.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;
use rand::rngs::OsRng;

use crate::foundation::error::{ClipdeckError, ClipdeckResult};

/// Base-32 symbols: digits and uppercase letters without `I`, `L`, `O`, `U`.
pub const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
/// Total identifier length in characters.
pub const ID_LEN: usize = 26;
/// Largest timestamp representable in the 48-bit time component.
pub const MAX_TIME_MS: u64 = (1 << 48) - 1;

const TIME_LEN: usize = 10;
const RANDOM_LEN: usize = 16;

type RandomDigits = [u8; RANDOM_LEN];

/// A validated, immutable timeline element identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Parse and validate an identifier string.
    pub fn parse(s: &str) -> ClipdeckResult<Self> {
        if !is_valid(s) {
            return Err(ClipdeckError::invalid_identifier(format!(
                "'{s}' is not {ID_LEN} base-32 characters"
            )));
        }
        Ok(Self(s.to_owned()))
    }

    /// Identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Millisecond timestamp encoded in the time component, saturating at
    /// [`MAX_TIME_MS`].
    pub fn timestamp_ms(&self) -> u64 {
        decode_time_digits(&self.0.as_bytes()[..TIME_LEN])
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Identifier {
    type Err = ClipdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = ClipdeckError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if !is_valid(&value) {
            return Err(ClipdeckError::invalid_identifier(format!(
                "'{value}' is not {ID_LEN} base-32 characters"
            )));
        }
        Ok(Self(value))
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

/// Source of wall-clock milliseconds for identifier generation.
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// [`Clock`] backed by [`SystemTime`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// Whether `s` is exactly 26 characters drawn from [`ALPHABET`].
pub fn is_valid(s: &str) -> bool {
    s.len() == ID_LEN && s.bytes().all(|b| ALPHABET.contains(&b))
}

/// Decode the millisecond timestamp of an identifier string.
///
/// A leading digit above `7` encodes more than 48 bits; such times saturate
/// at [`MAX_TIME_MS`].
pub fn decode_time(s: &str) -> ClipdeckResult<u64> {
    if !is_valid(s) {
        return Err(ClipdeckError::invalid_identifier(format!(
            "cannot decode time of '{s}'"
        )));
    }
    Ok(decode_time_digits(&s.as_bytes()[..TIME_LEN]))
}

/// Plain (non-monotonic) identifier at `timestamp_ms`, or now when `None`.
///
/// Randomness comes from the operating system CSPRNG.
pub fn new_id(timestamp_ms: Option<u64>) -> Identifier {
    let ts = timestamp_ms.unwrap_or_else(|| SystemClock.now_ms());
    new_id_with(ts, &mut OsRng)
}

/// Plain identifier at `timestamp_ms` using the given randomness source.
pub fn new_id_with<R: RngCore + ?Sized>(timestamp_ms: u64, rng: &mut R) -> Identifier {
    assemble(timestamp_ms, &random_digits(rng))
}

/// Generator whose output never sorts before its previous output while the
/// clock does not move backwards.
///
/// State is `(last time, last random digits)`. Within one millisecond the
/// random component is incremented as a 16-digit base-32 counter; on counter
/// overflow the time advances by one millisecond and randomness is reseeded.
/// Later calls at or after the millisecond that overflowed keep counting from
/// the advanced time until the clock catches up. Any other clock regression
/// resets the state to the earlier time.
///
/// Generation takes `&mut self`; share one generator across threads behind a
/// `Mutex`, or give each thread its own generator.
pub struct MonotonicGenerator<C = SystemClock, R = OsRng> {
    clock: C,
    rng: R,
    last: Option<(u64, RandomDigits)>,
    /// Clock time whose counter overflow pushed `last` ahead of the clock.
    carried_from: Option<u64>,
}

impl MonotonicGenerator {
    /// Generator on the system clock and OS randomness.
    pub fn new() -> Self {
        Self::with_sources(SystemClock, OsRng)
    }
}

impl Default for MonotonicGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, R: RngCore> MonotonicGenerator<C, R> {
    /// Generator with injected clock and randomness sources.
    pub fn with_sources(clock: C, rng: R) -> Self {
        Self {
            clock,
            rng,
            last: None,
            carried_from: None,
        }
    }

    /// Next identifier at the clock's current time.
    pub fn next_id(&mut self) -> Identifier {
        let now = self.clock.now_ms();
        self.next_id_at(now)
    }

    /// Next identifier at `timestamp_ms`, or the clock's time when `None`.
    pub fn new_monotonic_id(&mut self, timestamp_ms: Option<u64>) -> Identifier {
        match timestamp_ms {
            Some(ts) => self.next_id_at(ts),
            None => self.next_id(),
        }
    }

    /// Next identifier at an explicit timestamp.
    pub fn next_id_at(&mut self, timestamp_ms: u64) -> Identifier {
        let requested = timestamp_ms.min(MAX_TIME_MS);
        let carried = match (self.last, self.carried_from) {
            (Some((last_time, _)), Some(from)) => from <= requested && requested < last_time,
            _ => false,
        };
        if !carried {
            self.carried_from = None;
        }
        let now = match self.last {
            Some((last_time, _)) if carried => last_time,
            _ => requested,
        };

        let (time, digits) = match self.last {
            Some((last_time, mut digits)) if now == last_time => {
                if increment_digits(&mut digits) {
                    (now, digits)
                } else {
                    tracing::debug!(time_ms = now, "random component exhausted, advancing 1ms");
                    if self.carried_from.is_none() {
                        self.carried_from = Some(requested);
                    }
                    ((now + 1).min(MAX_TIME_MS), random_digits(&mut self.rng))
                }
            }
            Some((last_time, _)) if now < last_time => {
                tracing::debug!(
                    time_ms = now,
                    last_time_ms = last_time,
                    "clock regression, resetting monotonic state"
                );
                (now, random_digits(&mut self.rng))
            }
            _ => (now, random_digits(&mut self.rng)),
        };
        self.last = Some((time, digits));
        assemble(time, &digits)
    }
}

/// Source of fresh identifiers for edit operations.
pub trait IdSource {
    fn next_id(&mut self) -> Identifier;
}

impl<C: Clock, R: RngCore> IdSource for MonotonicGenerator<C, R> {
    fn next_id(&mut self) -> Identifier {
        MonotonicGenerator::next_id(self)
    }
}

fn random_digits<R: RngCore + ?Sized>(rng: &mut R) -> RandomDigits {
    let mut digits = [0u8; RANDOM_LEN];
    for d in &mut digits {
        // 32 divides 2^32, so masking keeps the distribution uniform.
        *d = (rng.next_u32() & 31) as u8;
    }
    digits
}

/// Increment a base-32 digit counter in place; `false` on overflow.
fn increment_digits(digits: &mut RandomDigits) -> bool {
    for d in digits.iter_mut().rev() {
        if *d < 31 {
            *d += 1;
            return true;
        }
        *d = 0;
    }
    false
}

fn assemble(timestamp_ms: u64, digits: &RandomDigits) -> Identifier {
    let mut out = String::with_capacity(ID_LEN);
    let mut t = timestamp_ms.min(MAX_TIME_MS);
    let mut time = [0u8; TIME_LEN];
    for slot in time.iter_mut().rev() {
        *slot = ALPHABET[(t % 32) as usize];
        t /= 32;
    }
    out.extend(time.iter().map(|&b| char::from(b)));
    out.extend(digits.iter().map(|&d| char::from(ALPHABET[usize::from(d)])));
    Identifier(out)
}

/// Ten base-32 digits hold 50 bits; values past the 48-bit range saturate.
fn decode_time_digits(time: &[u8]) -> u64 {
    time.iter()
        .fold(0u64, |acc, b| {
            let v = ALPHABET.iter().position(|a| a == b).unwrap_or(0) as u64;
            acc * 32 + v
        })
        .min(MAX_TIME_MS)
}

#[cfg(test)]
#[path = "../../tests/unit/ids/ulid.rs"]
mod tests;
