use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// [Szudzik pairing function][szudzik-pairing], with wrapping arithmetic.
///
/// ```text
/// (a, b) -> if (a<b) then (b^2 + a) else (a^2 + a + b)
/// ```
///
/// Exact (and bijective) while the result fits into `u64`; beyond that it degrades into a mixer.
///
/// [szudzik-pairing]: http://szudzik.com/ElegantPairing.pdf
pub fn pairing_szudzik(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

/// Finalizer of [SplitMix64][splitmix], spreading entropy over all bits.
///
/// [splitmix]: https://prng.di.unimi.it/splitmix64.c
pub fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

/// Order-sensitive combination of two hashes.
pub fn pairing2(a: u64, b: u64) -> u64 {
    mix64(pairing_szudzik(a, b))
}

/// Order-insensitive combination of many hashes.
///
/// Independent of the order of `hashes`.
pub fn unordered_sum<I>(hashes: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    hashes.into_iter().fold(0u64, |acc, h| acc.wrapping_add(h))
}

/// Deterministic hash of any `Hash` value.
pub fn hash_value<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
