//! Room code generation.

use atoll_protocol::RoomId;
use rand::Rng;

/// Produces human-shareable room codes: a run of random digits followed by
/// a run of random uppercase letters (`123AB` with the defaults).
///
/// Lengths are a tunable convention. The default 3+2 gives a ~36^5-sized
/// space, so collisions against the live registry are rare; the registry
/// simply regenerates when one occurs.
#[derive(Debug, Clone)]
pub struct RoomIdGenerator {
    digits: usize,
    letters: usize,
}

impl RoomIdGenerator {
    /// A generator with explicit segment lengths.
    pub fn new(digits: usize, letters: usize) -> Self {
        Self { digits, letters }
    }

    /// Generates one code. Uniqueness is the caller's concern.
    pub fn generate(&self) -> RoomId {
        let mut rng = rand::rng();
        let mut code = String::with_capacity(self.digits + self.letters);
        for _ in 0..self.digits {
            code.push(char::from(b'0' + rng.random_range(0u8..10)));
        }
        for _ in 0..self.letters {
            code.push(char::from(b'A' + rng.random_range(0u8..26)));
        }
        RoomId::new(code)
    }
}

impl Default for RoomIdGenerator {
    fn default() -> Self {
        Self::new(3, 2)
    }
}
