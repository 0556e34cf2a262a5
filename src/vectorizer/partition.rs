use super::features::SparseVector;

/// Split a posting list into consecutive fixed-size partitions.
///
/// Policy:
/// - `size == 0` or `size >= items.len()`: one partition holding the whole
///   list (the unpartitioned "full centroid" case).
/// - otherwise: partitions of exactly `size`, plus one final undersized
///   partition for any remainder. No element is dropped or duplicated.
pub fn partitions<T>(items: &[T], size: usize) -> Vec<&[T]> {
    if size == 0 || size >= items.len() {
        return vec![items];
    }
    items.chunks(size).collect()
}

/// Collapse one partition into its centroid: each feature averaged over the
/// partition size, not over the full posting list.
pub fn centroid(partition: &[SparseVector<f64>]) -> SparseVector<f64> {
    SparseVector::mean_of(partition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_or_oversized_partition_size_keeps_the_list_whole() {
        let items = [1, 2, 3];
        assert_eq!(partitions(&items, 0), vec![&items[..]]);
        assert_eq!(partitions(&items, 3), vec![&items[..]]);
        assert_eq!(partitions(&items, 10), vec![&items[..]]);
    }

    #[test]
    fn remainder_becomes_a_final_undersized_partition() {
        let items = [1, 2, 3, 4, 5, 6, 7];
        let parts = partitions(&items, 3);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], &[1, 2, 3]);
        assert_eq!(parts[1], &[4, 5, 6]);
        assert_eq!(parts[2], &[7]);
    }

    #[test]
    fn partitions_cover_every_element_exactly_once() {
        let items: Vec<u32> = (0..23).collect();
        for size in 1..25 {
            let parts = partitions(&items, size);
            let flat: Vec<u32> = parts.iter().flat_map(|p| p.iter().copied()).collect();
            assert_eq!(flat, items, "coverage broken for size {size}");
            for (i, part) in parts.iter().enumerate() {
                if i + 1 < parts.len() {
                    assert_eq!(part.len(), size.min(items.len()), "size {size} part {i}");
                }
            }
        }
    }

    #[test]
    fn centroid_averages_over_partition_size() {
        let mut a = SparseVector::new();
        a.add("WORD-x", 2.0);
        let mut b = SparseVector::new();
        b.add("WORD-x", 4.0).add("WORD-y", 3.0);
        let c = centroid(&[a, b]);
        assert_eq!(c.get("WORD-x"), Some(3.0));
        assert_eq!(c.get("WORD-y"), Some(1.5));
    }

    #[test]
    fn empty_partition_has_empty_centroid() {
        assert!(centroid(&[]).is_empty());
    }
}
