use std::collections::{HashSet, VecDeque};
use std::hash::Hash;

/// Interleave ranked lists round-robin, dropping duplicates, until
/// `limit` items are collected or every list is exhausted.
///
/// Each round scans the lists in their given order and pops one head
/// from every non-empty list, so the top results of every list are
/// represented before any list's tail. A popped item whose key was
/// already emitted is discarded; the list still advances.
pub fn round_robin_merge<T, K, F>(lists: Vec<Vec<T>>, limit: usize, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut queues: Vec<VecDeque<T>> = lists.into_iter().map(VecDeque::from).collect();
    let mut seen: HashSet<K> = HashSet::new();
    let mut merged = Vec::new();

    'rounds: while merged.len() < limit && queues.iter().any(|queue| !queue.is_empty()) {
        for queue in &mut queues {
            let Some(item) = queue.pop_front() else {
                continue;
            };
            if seen.insert(key(&item)) {
                merged.push(item);
                if merged.len() >= limit {
                    break 'rounds;
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge(lists: Vec<Vec<&str>>, limit: usize) -> Vec<&str> {
        round_robin_merge(lists, limit, |item| item.to_string())
    }

    #[test]
    fn test_interleaves_and_dedups() {
        let merged = merge(vec![vec!["A", "B", "C"], vec!["A"], vec!["E"]], 4);
        assert_eq!(merged, vec!["A", "E", "B", "C"]);
    }

    #[test]
    fn test_duplicate_does_not_stall_its_list() {
        // List 2 still holds D after its duplicate head A is dropped.
        let merged = merge(vec![vec!["A", "B", "C"], vec!["A", "D"], vec!["E"]], 4);
        assert_eq!(merged, vec!["A", "E", "B", "D"]);
    }

    #[test]
    fn test_stops_at_limit_mid_round() {
        let merged = merge(vec![vec!["A", "C"], vec!["B", "D"]], 3);
        assert_eq!(merged, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_exhaustion_below_limit() {
        let merged = merge(vec![vec!["A"], vec!["A"], vec!["B"]], 10);
        assert_eq!(merged, vec!["A", "B"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(merge(vec![], 5).is_empty());
        assert!(merge(vec![vec![], vec![]], 5).is_empty());
        assert!(merge(vec![vec!["A"]], 0).is_empty());
    }
}
