//! Kronecker delta, Levi-Civita symbol and index identities between them.
//!
//! Indices are 1-based as in tensor notation.
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_vectors::ExprMatrix;
use itertools::Itertools;
use log::debug;

/// δij: 1 if the indices are equal, 0 otherwise
pub fn kronecker_delta(i: usize, j: usize) -> i64 {
    if i == j { 1 } else { 0 }
}

/// Levi-Civita symbol of any number of indices: the sign of the permutation, 0 when an index
/// repeats
pub fn levi_civita(indices: &[usize]) -> i64 {
    let mut sign = 1;
    for (a, b) in indices.iter().tuple_combinations() {
        if a == b {
            return 0;
        }
        if a > b {
            sign = -sign;
        }
    }
    sign
}

/// All n-tuples over 1..=n in lexicographic order
pub fn generate_tuples(n: usize) -> Vec<Vec<usize>> {
    (0..n).map(|_| 1..=n).multi_cartesian_product().collect()
}

/// Determinant of the 3x3 matrix of deltas
/// ```text
/// | δil δim δin |
/// | δjl δjm δjn |
/// | δkl δkm δkn |
/// ```
/// which equals εijk·εlmn
pub fn kronecker_delta_matrix(i: usize, j: usize, k: usize, l: usize, m: usize, n: usize) -> Expr {
    let delta = |a: usize, b: usize| Expr::Const(kronecker_delta(a, b) as f64);
    let matrix = ExprMatrix::new(
        [i, j, k]
            .iter()
            .map(|&row| [l, m, n].iter().map(|&col| delta(row, col)).collect())
            .collect(),
    );
    matrix.determinant()
}

/// Pairs (δik, Σj δij·δjk) for i, k in 1..=n, row by row
pub fn kronecker_product(n: usize) -> impl Iterator<Item = (i64, i64)> {
    (1..=n).cartesian_product(1..=n).map(move |(i, k)| {
        let sigma = (1..=n)
            .map(|j| kronecker_delta(i, j) * kronecker_delta(j, k))
            .sum();
        (kronecker_delta(i, k), sigma)
    })
}

/// δij·δjk = δik for every i, k in 1..=n
pub fn kronecker_contraction_holds(n: usize) -> bool {
    kronecker_product(n).all(|(delta_ik, sigma)| delta_ik == sigma)
}

/// det[δ..] = εijk·εlmn for every pair of index triples over 1..=3
pub fn levi_civita_identity_holds() -> bool {
    let triples = generate_tuples(3);
    let mut checked = 0;
    for ijk in &triples {
        for lmn in &triples {
            let det = kronecker_delta_matrix(ijk[0], ijk[1], ijk[2], lmn[0], lmn[1], lmn[2]);
            let expected = (levi_civita(ijk) * levi_civita(lmn)) as f64;
            if det.as_const() != Some(expected) {
                debug!("identity fails for {:?} {:?}: {}", ijk, lmn, det);
                return false;
            }
            checked += 1;
        }
    }
    debug!("epsilon-delta determinant identity checked for {} index pairs", checked);
    true
}

/// εijk·εimn = δjm·δkn - δjn·δkm summed over i, for all j, k, m, n in 1..=3
pub fn epsilon_contraction_holds() -> bool {
    (0..4).map(|_| 1..=3usize).multi_cartesian_product().all(|idx| {
        let (j, k, m, n) = (idx[0], idx[1], idx[2], idx[3]);
        let lhs: i64 = (1..=3)
            .map(|i| levi_civita(&[i, j, k]) * levi_civita(&[i, m, n]))
            .sum();
        lhs == kronecker_delta(j, m) * kronecker_delta(k, n)
            - kronecker_delta(j, n) * kronecker_delta(k, m)
    })
}
