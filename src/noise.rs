//! Seeded 3D simplex noise.
//!
//! [`NoiseField`] is the scalar field every curl computation is built on. Each
//! instance owns its own permutation and gradient tables, derived once from a
//! numeric seed, so two fields built from the same seed agree bit for bit.
//!
//! # Seeds
//!
//! Seeds are plain `f64` values so that both integer seeds (`42.0`) and the
//! fractional seeds produced by a "reseed" button (`0.7312...`) work:
//!
//! - a seed strictly between 0 and 1 is scaled by 65536 first
//! - the result is floored and wrapped to a 32-bit integer
//! - integers below 256 are widened with `seed | seed << 8` so both bytes vary
//!
//! Only the low 16 bits reach the tables, which means many seeds alias. That
//! is expected: see [`NoiseField::folded_seed`].
//!
//! # Example
//!
//! ```ignore
//! use curl_swarm::NoiseField;
//!
//! let noise = NoiseField::new(42.0);
//! let v = noise.sample(0.3, -1.2, 4.0);
//! assert!(v.abs() <= 1.0);
//! ```

/// The twelve gradient directions: midpoints of the edges of a cube.
const GRAD3: [[f64; 3]; 12] = [
    [1.0, 1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, -1.0, 0.0],
    [1.0, 0.0, 1.0],
    [-1.0, 0.0, 1.0],
    [1.0, 0.0, -1.0],
    [-1.0, 0.0, -1.0],
    [0.0, 1.0, 1.0],
    [0.0, -1.0, 1.0],
    [0.0, 1.0, -1.0],
    [0.0, -1.0, -1.0],
];

/// Base permutation, XORed with the seed bytes to build each instance's table.
#[rustfmt::skip]
const BASE_PERMUTATION: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225,
    140, 36, 103, 30, 69, 142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148,
    247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219, 203, 117, 35, 11, 32,
    57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122,
    60, 211, 133, 230, 220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54,
    65, 25, 63, 161, 1, 216, 80, 73, 209, 76, 132, 187, 208, 89, 18, 169,
    200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173, 186, 3, 64,
    52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212,
    207, 206, 59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213,
    119, 248, 152, 2, 44, 154, 163, 70, 221, 153, 101, 155, 167, 43, 172, 9,
    129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232, 178, 185, 112, 104,
    218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162, 241,
    81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157,
    184, 84, 204, 176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93,
    222, 114, 67, 29, 24, 72, 243, 141, 128, 195, 78, 66, 215, 61, 156, 180,
];

/// Skew factor for 3D: (sqrt(4) - 1) / 3.
const F3: f64 = 1.0 / 3.0;
/// Unskew factor for 3D: (1 - 1/sqrt(4)) / 3.
const G3: f64 = 1.0 / 6.0;

/// A deterministic 3D simplex noise field.
///
/// Immutable after construction. Cloning copies the tables (about 13 KiB),
/// so share by reference when possible.
#[derive(Clone)]
pub struct NoiseField {
    seed: i32,
    perm: [u8; 512],
    grad: [u8; 512],
}

impl NoiseField {
    /// Build the tables for `seed`.
    pub fn new(seed: f64) -> Self {
        Self::from_folded(fold_seed(seed))
    }

    /// Build the tables from an already-folded integer seed.
    pub(crate) fn from_folded(seed: i32) -> Self {
        let low = (seed & 255) as u8;
        let high = ((seed >> 8) & 255) as u8;

        let mut perm = [0u8; 512];
        let mut grad = [0u8; 512];

        for (i, &base) in BASE_PERMUTATION.iter().enumerate() {
            let v = if i & 1 == 1 { base ^ low } else { base ^ high };
            perm[i] = v;
            perm[i + 256] = v;
            grad[i] = v % 12;
            grad[i + 256] = v % 12;
        }

        Self { seed, perm, grad }
    }

    /// The integer the seed folded to. Equal folded seeds mean equal fields.
    pub fn folded_seed(&self) -> i32 {
        self.seed
    }

    /// The 512-entry permutation table (first half duplicated).
    pub fn permutation(&self) -> &[u8; 512] {
        &self.perm
    }

    #[inline]
    fn gradient(&self, index: usize) -> &[f64; 3] {
        &GRAD3[self.grad[index] as usize]
    }

    /// Evaluate the field at `(x, y, z)`.
    ///
    /// Returns a value in roughly `[-1, 1]`. NaN inputs give a NaN output;
    /// no input panics.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        // Skew into simplex space to find the containing cell
        let s = (x + y + z) * F3;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let k = (z + s).floor();

        // Unskew the cell origin back and get the offset from it
        let t = (i + j + k) * G3;
        let x0 = x - (i - t);
        let y0 = y - (j - t);
        let z0 = z - (k - t);

        // Which of the six tetrahedra are we in?
        let (i1, j1, k1, i2, j2, k2) = if x0 >= y0 {
            if y0 >= z0 {
                (1, 0, 0, 1, 1, 0)
            } else if x0 >= z0 {
                (1, 0, 0, 1, 0, 1)
            } else {
                (0, 0, 1, 1, 0, 1)
            }
        } else if y0 < z0 {
            (0, 0, 1, 0, 1, 1)
        } else if x0 < z0 {
            (0, 1, 0, 0, 1, 1)
        } else {
            (0, 1, 0, 1, 1, 0)
        };

        let x1 = x0 - i1 as f64 + G3;
        let y1 = y0 - j1 as f64 + G3;
        let z1 = z0 - k1 as f64 + G3;
        let x2 = x0 - i2 as f64 + 2.0 * G3;
        let y2 = y0 - j2 as f64 + 2.0 * G3;
        let z2 = z0 - k2 as f64 + 2.0 * G3;
        let x3 = x0 - 1.0 + 3.0 * G3;
        let y3 = y0 - 1.0 + 3.0 * G3;
        let z3 = z0 - 1.0 + 3.0 * G3;

        // Saturating casts keep non-finite inputs in range
        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;
        let kk = (k as i64 & 255) as usize;

        let perm = &self.perm;
        let gi0 = ii + perm[jj + perm[kk] as usize] as usize;
        let gi1 = ii + i1 + perm[jj + j1 + perm[kk + k1] as usize] as usize;
        let gi2 = ii + i2 + perm[jj + j2 + perm[kk + k2] as usize] as usize;
        let gi3 = ii + 1 + perm[jj + 1 + perm[kk + 1] as usize] as usize;

        let n0 = self.corner(gi0, x0, y0, z0);
        let n1 = self.corner(gi1, x1, y1, z1);
        let n2 = self.corner(gi2, x2, y2, z2);
        let n3 = self.corner(gi3, x3, y3, z3);

        32.0 * (n0 + n1 + n2 + n3)
    }

    #[inline]
    fn corner(&self, index: usize, x: f64, y: f64, z: f64) -> f64 {
        let t = 0.5 - x * x - y * y - z * z;
        if t < 0.0 {
            0.0
        } else {
            let t2 = t * t;
            let g = self.gradient(index);
            t2 * t2 * (g[0] * x + g[1] * y + g[2] * z)
        }
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// Fold a real-valued seed into the integer whose low two bytes key the tables.
pub fn fold_seed(seed: f64) -> i32 {
    let scaled = if seed > 0.0 && seed < 1.0 {
        seed * 65536.0
    } else {
        seed
    };

    let floored = scaled.floor();
    let mut bits = wrap_i32(floored);
    if floored < 256.0 {
        bits |= bits << 8;
    }
    bits
}

/// Wrap an integral float to 32 bits the way a two's complement cast would.
fn wrap_i32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(4_294_967_296.0) as u32 as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_small_integer_widens() {
        assert_eq!(fold_seed(1.0), 1 | (1 << 8));
        assert_eq!(fold_seed(42.0), 42 | (42 << 8));
    }

    #[test]
    fn test_fold_fraction_scales() {
        assert_eq!(fold_seed(0.5), 32768);
        assert_eq!(fold_seed(0.5), fold_seed(32768.9));
    }

    #[test]
    fn test_fold_nan_is_zero() {
        assert_eq!(fold_seed(f64::NAN), 0);
        assert_eq!(fold_seed(f64::INFINITY), 0);
    }

    #[test]
    fn test_fold_negative_wraps() {
        // -5 floors to -5, widens with its own shifted copy
        assert_eq!(fold_seed(-5.0), -5 | (-5 << 8));
    }

    #[test]
    fn test_permutation_is_duplicated() {
        let noise = NoiseField::new(1234.0);
        let perm = noise.permutation();
        for i in 0..256 {
            assert_eq!(perm[i], perm[i + 256]);
        }
    }

    #[test]
    fn test_tables_xor_alternating_seed_bytes() {
        // 0.731 folds to 47906: low byte 0x22, high byte 0xBB
        let noise = NoiseField::new(0.731);
        assert_eq!(noise.folded_seed(), 47906);
        for i in 0..256 {
            let byte = if i & 1 == 1 { 0x22 } else { 0xBB };
            let v = BASE_PERMUTATION[i] ^ byte;
            assert_eq!(noise.perm[i], v);
            assert_eq!(noise.grad[i], v % 12);
        }
    }

    #[test]
    fn test_equal_seed_bytes_keep_permutation() {
        // Small seeds mirror their low byte, so every entry is XORed alike
        let noise = NoiseField::new(42.0);
        let mut seen = [false; 256];
        for &v in &noise.permutation()[..256] {
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_zero_at_lattice_origin() {
        // Every corner offset dotted with its gradient vanishes at the origin
        let noise = NoiseField::new(7.0);
        assert_eq!(noise.sample(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_sample_range() {
        let noise = NoiseField::new(99.0);
        for i in 0..2000 {
            let f = i as f64 * 0.173;
            let v = noise.sample(f, f * 0.37 - 3.0, 11.0 - f * 0.91);
            assert!(v.is_finite());
            assert!(v.abs() <= 1.05, "sample out of range: {}", v);
        }
    }

    #[test]
    fn test_nan_propagates() {
        let noise = NoiseField::new(3.0);
        assert!(noise.sample(f64::NAN, 0.0, 0.0).is_nan());
    }

    #[test]
    fn test_infinite_input_does_not_panic() {
        let noise = NoiseField::new(3.0);
        let _ = noise.sample(f64::INFINITY, f64::NEG_INFINITY, 1.0);
        let _ = noise.sample(1e300, -1e300, 0.0);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseField::new(1.0);
        let b = NoiseField::new(2.0);
        let differs = (0..64).any(|i| {
            let f = i as f64 * 0.31 + 0.05;
            a.sample(f, f * 0.5, -f) != b.sample(f, f * 0.5, -f)
        });
        assert!(differs);
    }
}
