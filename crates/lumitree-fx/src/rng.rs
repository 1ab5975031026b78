use std::f32::consts::TAU;

/// Small deterministic PRNG used for particle and panel placement.
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        // A zero state would stay zero forever.
        Self {
            state: if seed == 0 { 0xDEAD_BEEF } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() & 0x7F_FFFF) as f32 / 0x80_0000 as f32
    }

    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    pub fn angle(&mut self) -> f32 {
        self.next_f32() * TAU
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_u32() as usize % items.len())
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(0xDEAD_BEEF)
    }
}
