//! Colour policy.
//!
//! Phases get a colour derived from a hash of their name, so the same phase
//! looks the same in every image. States use a fixed table.

use fomtrace_canvas::Rgb;
use fomtrace_state::TaskState;
use sha2::{Digest, Sha256};

pub const AXIS: Rgb = Rgb::BLACK;
pub const QUEUE_WAIT: Rgb = Rgb::percent(80, 10, 10);
pub const IO_BAR: Rgb = Rgb::percent(30, 30, 30);

pub fn phase_colour(phase: &str) -> Rgb {
    let seed = format!("{phase}^{phase}");
    Rgb::percent(channel(&seed, "r"), channel(&seed, "g"), channel(&seed, "b"))
}

pub fn state_colour(state: &TaskState) -> Rgb {
    match state {
        TaskState::Init => Rgb::percent(100, 100, 0),
        TaskState::Ready => Rgb::percent(100, 0, 0),
        TaskState::Running => Rgb::percent(0, 100, 0),
        TaskState::Waiting => Rgb::percent(0, 0, 100),
        TaskState::Finished | TaskState::Other(_) => Rgb::percent(10, 10, 10),
    }
}

/// 0..100 from the first eight bytes of SHA-256(seed || suffix).
fn channel(seed: &str, suffix: &str) -> u8 {
    let mut hasher = Sha256::new();
    hasher.update(seed.as_bytes());
    hasher.update(suffix.as_bytes());
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % 100) as u8
}
