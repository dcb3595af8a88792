use lazy_static::lazy_static;
use num_bigint::BigInt;
use num_traits::One;
use std::sync::mpsc;
use tracing::debug;

use crate::errors::{PiError, PiResult};
use crate::worker_pool::ThreadPool;

pub const C: u64 = 640320;
pub const A: u64 = 13591409;
pub const B: u64 = 545140134;
pub const C3_OVER_24_U64: u64 = C * C * C / 24;

lazy_static! {
    /// C^3 / 24, the constant part of every leaf Q.
    pub static ref C3_OVER_24: BigInt = BigInt::from(C3_OVER_24_U64);
}

/// P(a,b), Q(a,b) and T(a,b) for the Chudnovsky terms in `[a, b)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Triple {
    pub p: BigInt,
    pub q: BigInt,
    pub t: BigInt,
}

impl Triple {
    fn leaf(a: u64) -> Self {
        let (p, q) = if a == 0 {
            (BigInt::one(), BigInt::one())
        } else {
            let p = BigInt::from(6 * a - 5) * (2 * a - 1) * (6 * a - 1);
            let q = BigInt::from(a).pow(3) * &*C3_OVER_24;
            (p, q)
        };
        let mut t = &p * (BigInt::from(B) * a + A);
        if a & 1 == 1 {
            t = -t;
        }
        Triple { p, q, t }
    }

    /// Merge `self` over `[a, m)` with `right` over `[m, b)` into `[a, b)`.
    pub fn combine(self, right: Triple) -> Triple {
        let t = &right.q * self.t + &self.p * right.t;
        Triple {
            p: self.p * right.p,
            q: self.q * right.q,
            t,
        }
    }
}

pub fn binary_split(a: u64, b: u64) -> Triple {
    assert!(a < b, "binary_split called with empty range [{}, {})", a, b);
    if b - a == 1 {
        return Triple::leaf(a);
    }
    let m = a + (b - a) / 2;
    let left = binary_split(a, m);
    let right = binary_split(m, b);
    left.combine(right)
}

/// Splits `[a, b)` into at most `chunks` contiguous, non-empty ranges of near-equal length.
pub fn partition(a: u64, b: u64, chunks: usize) -> Vec<(u64, u64)> {
    assert!(a < b, "partition called with empty range [{}, {})", a, b);
    let len = b - a;
    let n = (chunks.max(1) as u64).min(len);
    let base = len / n;
    let extra = len % n;

    let mut ranges = Vec::with_capacity(n as usize);
    let mut lo = a;
    for i in 0..n {
        let hi = lo + base + u64::from(i < extra);
        ranges.push((lo, hi));
        lo = hi;
    }
    ranges
}

/// Combines adjacent parts level by level so operand sizes stay balanced.
pub fn combine_all(mut parts: Vec<Triple>) -> Option<Triple> {
    while parts.len() > 1 {
        let mut next = Vec::with_capacity((parts.len() + 1) / 2);
        let mut iter = parts.into_iter();
        while let Some(left) = iter.next() {
            match iter.next() {
                Some(right) => next.push(left.combine(right)),
                None => next.push(left),
            }
        }
        parts = next;
    }
    parts.pop()
}

/// Evaluates `[a, b)` by farming sub-ranges out to `pool`; identical to `binary_split(a, b)`.
pub fn parallel_split(pool: &ThreadPool, a: u64, b: u64, chunks: usize) -> PiResult<Triple> {
    let ranges = partition(a, b, chunks);
    let count = ranges.len();
    debug!(
        pool = pool.name(),
        a,
        b,
        chunks = count,
        workers = pool.total_workers(),
        busy = pool.active_workers(),
        "dispatching binary splitting chunks"
    );

    let (tx, rx) = mpsc::channel::<(usize, Triple)>();
    for (idx, (lo, hi)) in ranges.into_iter().enumerate() {
        let tx = tx.clone();
        pool.execute(move || {
            let _ = tx.send((idx, binary_split(lo, hi)));
        });
    }
    drop(tx);

    let mut parts: Vec<Option<Triple>> = (0..count).map(|_| None).collect();
    for received in 0..count {
        let (idx, triple) = rx.recv().map_err(|_| {
            PiError::Worker(format!(
                "pool '{}' lost a chunk ({} of {} received)",
                pool.name(),
                received,
                count
            ))
        })?;
        parts[idx] = Some(triple);
    }

    let parts = parts
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| PiError::Worker("duplicate chunk index from worker".into()))?;
    combine_all(parts).ok_or_else(|| PiError::Worker("no chunks were evaluated".into()))
}
