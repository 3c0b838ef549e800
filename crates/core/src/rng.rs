//! RNG module - seeded randomness for pieces and tiles
//!
//! All randomness in the game flows through one injected [`SimpleRng`], so a
//! seed fully determines a session: piece kinds, tile values, everything.
//!
//! Piece kinds are drawn uniformly from the seven tetrominoes (no 7-bag).
//! The queue always keeps one fully built piece ready so the side panel can
//! preview its numbers before it enters the grid.

use crate::pieces::Tetromino;
use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Maps the full 32-bit output onto the range (multiply-shift), so the
    /// result depends on the high bits. The low bits of a power-of-two LCG are
    /// periodic (bit 0 simply alternates), which `% max` would expose.
    pub fn next_range(&mut self, max: u32) -> u32 {
        assert!(max > 0, "next_range needs a non-empty range");
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Current generator state (a seed that reproduces the rest of the stream)
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Uniform piece generator with a one-piece preview
#[derive(Debug, Clone)]
pub struct PieceQueue {
    next: Tetromino,
    rng: SimpleRng,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let next = Self::build(&mut rng);
        Self { next, rng }
    }

    fn build(rng: &mut SimpleRng) -> Tetromino {
        let kind = PieceKind::ALL[rng.next_range(PieceKind::ALL.len() as u32) as usize];
        Tetromino::new(kind, rng)
    }

    /// The piece the next `draw` will return
    pub fn peek(&self) -> &Tetromino {
        &self.next
    }

    /// Take the previewed piece and prepare a new one
    pub fn draw(&mut self) -> Tetromino {
        let fresh = Self::build(&mut self.rng);
        std::mem::replace(&mut self.next, fresh)
    }

    /// Get the current RNG state (for restarting with a continued sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}
