//! Ranking and unranking of combinations.

use super::binomial::ncr_big;
use crate::error::{invalid, Result};
use crate::model::FieldRule;
use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

/// Returns the `rank`-th (0-based) way to pick `size` of `elements` indices.
///
/// Combinations are ordered by their largest index first (combinadic order),
/// so for 4 elements and size 2 the ranks map to
/// `[0,1] [0,2] [1,2] [0,3] [1,3] [2,3]`.
///
/// Returns `None` when `size > elements` or `rank >= C(elements, size)`.
///
/// # Examples
///
/// ```
/// use num_bigint::BigUint;
/// use u_fieldprob::combinatorics::index_combinations;
///
/// let picked = index_combinations(&BigUint::from(3u32), 2, 4);
/// assert_eq!(picked, Some(vec![0, 3]));
/// ```
pub fn index_combinations(rank: &BigUint, size: usize, elements: usize) -> Option<Vec<usize>> {
    if size > elements || *rank >= ncr_big(elements as i64, size as i64) {
        return None;
    }
    let mut remaining = rank.clone();
    let mut size = size;
    let mut elements = elements;
    // collected largest index first
    let mut picked = Vec::with_capacity(size);
    while size > 0 {
        if size == elements {
            picked.extend((0..elements).rev());
            break;
        }
        let without_last = ncr_big(elements as i64 - 1, size as i64);
        if remaining >= without_last {
            remaining -= without_last;
            picked.push(elements - 1);
            size -= 1;
        }
        elements -= 1;
    }
    picked.reverse();
    Some(picked)
}

/// Picks the `rank`-th combination of `size` items from `elements`.
///
/// Uses the same order as [`index_combinations`].
pub fn list_combination<T: Clone>(rank: &BigUint, size: usize, elements: &[T]) -> Option<Vec<T>> {
    let indices = index_combinations(rank, size, elements.len())?;
    Some(indices.into_iter().map(|i| elements[i].clone()).collect())
}

/// Returns the `rank`-th (1-based) lexicographic combination of `size` out
/// of `elements` indices.
///
/// For 5 elements and size 3 the order is
/// `012, 013, 014, 023, 024, 034, 123, 124, 134, 234`, so rank 4 is
/// `[0, 2, 3]`. Exact for any input size; a higher rank always gives a
/// lexicographically greater result.
///
/// # Errors
///
/// `InvalidArgument` when `rank <= 0`, `rank > C(elements, size)`,
/// `size < 0`, `elements < 0` or `size > elements`.
///
/// # Examples
///
/// ```
/// use num_bigint::BigInt;
/// use u_fieldprob::combinatorics::specific_combination;
///
/// let picked = specific_combination(5, 3, &BigInt::from(4)).unwrap();
/// assert_eq!(picked, vec![0, 2, 3]);
/// ```
pub fn specific_combination(elements: i64, size: i64, rank: &BigInt) -> Result<Vec<usize>> {
    if elements < 0 || size < 0 {
        return Err(invalid(format!(
            "elements ({elements}) and size ({size}) cannot be negative"
        )));
    }
    if size > elements {
        return Err(invalid(format!(
            "cannot pick {size} out of {elements} elements"
        )));
    }
    let mut remaining = match rank.to_biguint() {
        Some(r) if !r.is_zero() => r,
        _ => return Err(invalid(format!("rank must be positive, was {rank}"))),
    };
    let count = ncr_big(elements, size);
    if remaining > count {
        return Err(invalid(format!(
            "rank {rank} out of range: {elements} elements with size {size} have {count} combinations"
        )));
    }

    let mut remaining_size = size as u64;
    let mut remaining_elements = elements as u64;
    let mut result = Vec::with_capacity(remaining_size as usize);
    let mut next = 0usize;
    // combinations whose smallest member is `next`
    let mut starting_here = ncr_big(elements - 1, size - 1);
    while remaining_size > 0 {
        debug_assert!(
            !starting_here.is_zero(),
            "combination counter underflow at element {next}"
        );
        if remaining <= starting_here {
            result.push(next);
            if remaining_elements > 1 {
                starting_here = starting_here * (remaining_size - 1) / (remaining_elements - 1);
            }
            remaining_size -= 1;
        } else {
            remaining -= &starting_here;
            starting_here =
                starting_here * (remaining_elements - remaining_size) / (remaining_elements - 1);
        }
        remaining_elements -= 1;
        next += 1;
    }
    Ok(result)
}

/// Decodes `rank` as a mixed-radix number over several rules.
///
/// Each rule contributes a digit with radix `C(field_count, target)`; the
/// first rule is the least significant digit. The selected fields of every
/// rule, picked with [`list_combination`], are concatenated.
///
/// # Errors
///
/// `InvalidArgument` when `rank` is not below the product of the radices.
pub fn multi_list_combination<T: Clone>(rules: &[FieldRule<T>], rank: &BigUint) -> Result<Vec<T>> {
    let radices: Vec<BigUint> = rules.iter().map(FieldRule::combinations_exact).collect();
    let capacity = radices.iter().fold(BigUint::one(), |acc, r| acc * r);
    if *rank >= capacity {
        return Err(invalid(format!(
            "not enough combinations: rank {rank}, maximum is {capacity}"
        )));
    }

    let mut remaining = rank.clone();
    let mut picked = Vec::new();
    for (rule, radix) in rules.iter().zip(&radices) {
        let digit = &remaining % radix;
        remaining /= radix;
        let selection = list_combination(&digit, rule.target(), rule.fields())
            .ok_or_else(|| invalid(format!("rule cannot select {} fields", rule.target())))?;
        picked.extend(selection);
    }
    Ok(picked)
}
