//! Capabilities the path engine borrows from its surroundings: the operating
//! system's own path resolution, a clock, and a source of randomness.

use std::{
    env, fs, io, path,
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant, SystemTime},
};

use crate::SystemError;

/// Operating-system path services.
pub trait SystemResolver {
    fn current_dir(&self) -> Result<String, SystemError>;

    /// Resolves a non-verbatim Windows path the way the OS does, honouring
    /// per-drive current directories, device names and trailing-dot rules.
    fn full_path(&self, path: &str) -> Result<String, SystemError>;

    /// Resolves symbolic links against the real filesystem.
    fn canonicalize(&self, path: &str) -> Result<String, SystemError>;
}

/// [`SystemResolver`] backed by the host through `std`.
///
/// `full_path` follows the host's rules, so it only gives Windows semantics
/// on a Windows host.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsResolver;

fn into_string(path: path::PathBuf) -> Result<String, SystemError> {
    path.into_os_string().into_string().map_err(|raw| {
        SystemError::from(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("path is not valid UTF-8: {raw:?}"),
        ))
    })
}

impl SystemResolver for OsResolver {
    fn current_dir(&self) -> Result<String, SystemError> {
        into_string(env::current_dir()?)
    }

    fn full_path(&self, path: &str) -> Result<String, SystemError> {
        into_string(path::absolute(path)?)
    }

    fn canonicalize(&self, path: &str) -> Result<String, SystemError> {
        into_string(fs::canonicalize(path)?)
    }
}

pub trait Clock {
    /// Time elapsed since the clock's own baseline.
    fn monotonic(&self) -> Duration;

    fn system_time(&self) -> SystemTime;
}

/// Wall and monotonic time from the host. The monotonic baseline is taken
/// when the clock is created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> SystemClock {
        SystemClock {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn monotonic(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Non-cryptographic randomness.
pub trait RandomSource {
    fn next_u64(&self) -> u64;

    /// A value in `0..bound`. `bound` must be non-zero.
    fn next_below(&self, bound: u64) -> u64 {
        self.next_u64() % bound
    }
}

/// xorshift64* over an atomic state, safe to share between threads.
#[derive(Debug)]
pub struct XorShiftRandom {
    state: AtomicU64,
}

impl XorShiftRandom {
    pub fn new(seed: u64) -> XorShiftRandom {
        // zero is a fixed point of xorshift
        let seed = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        XorShiftRandom {
            state: AtomicU64::new(seed),
        }
    }

    /// Seeds from both of the clock's readings.
    pub fn from_clock(clock: &dyn Clock) -> XorShiftRandom {
        let wall = clock
            .system_time()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        let ticks = clock.monotonic().as_nanos() as u64;
        let mut bits = wall.wrapping_mul(65537).wrapping_add(ticks);
        bits ^= bits.rotate_left(31);
        XorShiftRandom::new(bits)
    }

    fn step(mut x: u64) -> u64 {
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        x
    }
}

impl RandomSource for XorShiftRandom {
    fn next_u64(&self) -> u64 {
        let previous = self
            .state
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |x| {
                Some(XorShiftRandom::step(x))
            })
            .unwrap_or_else(|x| x);
        XorShiftRandom::step(previous).wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}
