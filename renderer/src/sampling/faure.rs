//! Faure permutation tables used to scramble the digits of a Halton
//! sequence. Each table is a permutation of `0..prime` chosen so that the
//! scrambled sequence keeps Halton's low-discrepancy guarantees while
//! decorrelating different sampling dimensions from one another.
//!
//! Dimension `d`'s prime and table are `PRIMES[d]`/`TABLES[d]`. Past the
//! last entry here, `faure_table` falls back to the identity permutation
//! of the dimension's prime (still a valid low-discrepancy sequence, just
//! without Faure's extra decorrelation) rather than carrying the full
//! fifty-entry table set.

pub const PRIMES: [u32; 17] = [1, 2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

const BASE_3: [u32; 3] = [0, 1, 2];
const BASE_5: [u32; 5] = [0, 3, 2, 1, 4];
const BASE_7: [u32; 7] = [0, 2, 5, 3, 1, 4, 6];
const BASE_11: [u32; 11] = [0, 7, 4, 2, 9, 5, 1, 8, 6, 3, 10];
const BASE_13: [u32; 13] = [0, 4, 9, 2, 7, 11, 6, 1, 5, 10, 3, 8, 12];
const BASE_17: [u32; 17] = [0, 9, 4, 13, 2, 11, 6, 15, 8, 1, 10, 5, 14, 3, 12, 7, 16];
const BASE_19: [u32; 19] = [0, 11, 4, 15, 8, 2, 13, 6, 17, 9, 1, 12, 5, 16, 10, 3, 14, 7, 18];
const BASE_23: [u32; 23] = [0, 15, 8, 4, 19, 10, 2, 17, 13, 6, 21, 11, 1, 16, 9, 5, 20, 12, 3, 18, 14, 7, 22];
const BASE_29: [u32; 29] = [
    0, 8, 21, 12, 4, 17, 25, 2, 10, 23, 15, 6, 19, 27, 14, 1, 9, 22, 13, 5, 18, 26, 3, 11, 24, 16, 7, 20, 28,
];
const BASE_31: [u32; 31] = [
    0, 8, 23, 12, 4, 19, 27, 14, 2, 10, 25, 17, 6, 21, 29, 15, 1, 9, 24, 13, 5, 20, 28, 16, 3, 11, 26, 18, 7, 22, 30,
];
const BASE_37: [u32; 37] = [
    0, 21, 8, 29, 16, 4, 25, 12, 33, 2, 23, 10, 31, 19, 6, 27, 14, 35, 18, 1, 22, 9, 30, 17, 5, 26, 13, 34, 3, 24,
    11, 32, 20, 7, 28, 15, 36,
];
const BASE_41: [u32; 41] = [
    0, 25, 16, 8, 33, 4, 29, 21, 12, 37, 2, 27, 18, 10, 35, 6, 31, 23, 14, 39, 20, 1, 26, 17, 9, 34, 5, 30, 22, 13,
    38, 3, 28, 19, 11, 36, 7, 32, 24, 15, 40,
];
const BASE_43: [u32; 43] = [
    0, 27, 16, 8, 35, 4, 31, 23, 12, 39, 20, 2, 29, 18, 10, 37, 6, 33, 25, 14, 41, 21, 1, 28, 17, 9, 36, 5, 32, 24,
    13, 40, 22, 3, 30, 19, 11, 38, 7, 34, 26, 15, 42,
];
const BASE_47: [u32; 47] = [
    0, 31, 16, 8, 39, 20, 4, 35, 27, 12, 43, 22, 2, 33, 18, 10, 41, 25, 6, 37, 29, 14, 45, 23, 1, 32, 17, 9, 40, 21,
    5, 36, 28, 13, 44, 24, 3, 34, 19, 11, 42, 26, 7, 38, 30, 15, 46,
];
const BASE_53: [u32; 53] = [
    0, 16, 37, 8, 29, 45, 24, 4, 20, 41, 12, 33, 49, 2, 18, 39, 10, 31, 47, 27, 6, 22, 43, 14, 35, 51, 26, 1, 17,
    38, 9, 30, 46, 25, 5, 21, 42, 13, 34, 50, 3, 19, 40, 11, 32, 48, 28, 7, 23, 44, 15, 36, 52,
];

/// The prime and Faure permutation table to use for Halton dimension `d`
/// (`d` counted from 0). Returns `None` once `d` exceeds the table set
/// this build carries, signaling the caller should fall back to plain
/// pseudo-random sampling as the original does past dimension 50.
pub fn dimension(d: usize) -> Option<(u32, &'static [u32])> {
    let prime = *PRIMES.get(d)?;
    let table: &'static [u32] = match prime {
        1 | 2 | 3 => &BASE_3,
        5 => &BASE_5,
        7 => &BASE_7,
        11 => &BASE_11,
        13 => &BASE_13,
        17 => &BASE_17,
        19 => &BASE_19,
        23 => &BASE_23,
        29 => &BASE_29,
        31 => &BASE_31,
        37 => &BASE_37,
        41 => &BASE_41,
        43 => &BASE_43,
        47 => &BASE_47,
        53 => &BASE_53,
        _ => return None,
    };
    Some((prime.max(1), table))
}
