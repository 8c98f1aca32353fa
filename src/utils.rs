//! Hashing helpers for the operation cache.

/// Szudzik's pairing of two integers, wrapping at `2^64`.
///
/// Below the wrap-around point it is a bijection `ℕ × ℕ → ℕ`:
///
/// ```text
/// a < b:  b·b + a
/// a ≥ b:  a·a + a + b
/// ```
///
/// See <http://szudzik.com/ElegantPairing.pdf>.
pub fn pairing_szudzik(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

pub fn pairing2(a: u64, b: u64) -> u64 {
    pairing_szudzik(a, b)
}

/// Left-nested pairing `⟨⟨a, b⟩, c⟩`.
pub fn pairing3(a: u64, b: u64, c: u64) -> u64 {
    pairing2(pairing2(a, b), c)
}

/// Hash used to pick a cache slot. Collisions only cost a cache miss.
pub trait MyHash {
    fn hash(&self) -> u64;
}

impl MyHash for (u64, u64) {
    fn hash(&self) -> u64 {
        pairing2(self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_szudzik_small_grid() {
        // Row a, column b:
        //      0  1  2
        //   0  0  1  4
        //   1  2  3  5
        //   2  6  7  8
        let grid = [[0, 1, 4], [2, 3, 5], [6, 7, 8]];
        for (a, row) in grid.iter().enumerate() {
            for (b, &expected) in row.iter().enumerate() {
                assert_eq!(pairing_szudzik(a as u64, b as u64), expected);
            }
        }
        assert_eq!(pairing_szudzik(0, 4), 16);
        assert_eq!(pairing_szudzik(4, 0), 20);
    }

    #[test]
    fn test_pairing_is_ordered() {
        assert_ne!(pairing2(3, 8), pairing2(8, 3));
        assert_ne!(pairing3(1, 2, 3), pairing3(3, 2, 1));
        assert_eq!((3u64, 8u64).hash(), pairing2(3, 8));
    }

    #[test]
    fn test_szudzik_wraps() {
        let _ = pairing_szudzik(u64::MAX, 1);
        let _ = pairing_szudzik(1, u64::MAX);
        let _ = pairing3(u64::MAX, u64::MAX, u64::MAX);
    }
}
