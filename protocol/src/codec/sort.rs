//! Canonical ordering checks.
//!
//! Transactions list inputs, outputs and operations in a canonical order so
//! that every encoding of the same logical transaction is byte-identical
//! (and therefore has the same id). These helpers check and establish that
//! order.

use std::cmp::Ordering;

use super::packable::{packed_bytes, Packable};

/// Strictly increasing under `Ord`: sorted with no duplicates.
pub fn is_sorted_and_unique<T: Ord>(items: &[T]) -> bool {
    items.windows(2).all(|w| w[0] < w[1])
}

/// Non-decreasing by canonical encoding.
pub fn is_sorted_packed<T: Packable>(items: &[T]) -> bool {
    let encoded: Vec<Vec<u8>> = items.iter().map(packed_bytes).collect();
    encoded.windows(2).all(|w| w[0] <= w[1])
}

/// Strictly increasing by canonical encoding.
pub fn is_sorted_and_unique_packed<T: Packable>(items: &[T]) -> bool {
    let encoded: Vec<Vec<u8>> = items.iter().map(packed_bytes).collect();
    is_sorted_and_unique(&encoded)
}

/// Compare two values by canonical encoding.
pub fn compare_packed<T: Packable>(a: &T, b: &T) -> Ordering {
    packed_bytes(a).cmp(&packed_bytes(b))
}

/// Sort in place by canonical encoding.
pub fn sort_packed<T: Packable>(items: &mut [T]) {
    items.sort_by_cached_key(packed_bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_and_unique() {
        assert!(is_sorted_and_unique::<u8>(&[]));
        assert!(is_sorted_and_unique(&[1]));
        assert!(is_sorted_and_unique(&[1, 2, 3]));
        assert!(!is_sorted_and_unique(&[1, 1]));
        assert!(!is_sorted_and_unique(&[2, 1]));
    }

    #[test]
    fn packed_order_is_big_endian_lexicographic() {
        // 0x0100 > 0x00ff numerically and bytewise.
        assert!(is_sorted_packed(&[0x00ffu16, 0x0100]));
        assert!(is_sorted_packed(&[5u32, 5]));
        assert!(!is_sorted_and_unique_packed(&[5u32, 5]));
        assert_eq!(compare_packed(&1u64, &2u64), Ordering::Less);
    }

    #[test]
    fn vec_order_compares_count_first() {
        // [9] packs as 00000001 09; [1, 1] as 00000002 01 01.
        let short = vec![9u8];
        let long = vec![1u8, 1];
        assert_eq!(compare_packed(&short, &long), Ordering::Less);
    }

    #[test]
    fn sort_packed_establishes_order() {
        let mut items = vec![3u16, 1, 2];
        sort_packed(&mut items);
        assert_eq!(items, vec![1, 2, 3]);
        assert!(is_sorted_and_unique_packed(&items));
    }
}
