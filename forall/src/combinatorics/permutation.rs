/// All orderings of a list, in lexicographic order of element positions.
///
/// The first permutation is the input order. Positions rather than values are
/// permuted, so duplicate values produce repeated orderings. An empty input
/// yields nothing.
pub struct PermutationIterator<T> {
    values: Vec<T>,
    positions: Vec<usize>,
    started: bool,
    done: bool,
}

impl<T: Clone> PermutationIterator<T> {
    pub fn new(values: Vec<T>) -> Self {
        let done = values.is_empty();
        Self {
            positions: (0..values.len()).collect(),
            values,
            started: false,
            done,
        }
    }

    fn current(&self) -> Vec<T> {
        self.positions
            .iter()
            .map(|&position| self.values[position].clone())
            .collect()
    }
}

/// Rearrange `positions` into the next permutation; `false` if it was the last
fn next_permutation(positions: &mut [usize]) -> bool {
    let Some(ascent) = positions.windows(2).rposition(|pair| pair[0] < pair[1]) else {
        return false;
    };
    let pivot = positions[ascent];
    let Some(successor) = positions.iter().rposition(|&p| p > pivot) else {
        return false;
    };
    positions.swap(ascent, successor);
    positions[ascent + 1..].reverse();
    true
}

impl<T: Clone> Iterator for PermutationIterator<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current());
        }
        if next_permutation(&mut self.positions) {
            Some(self.current())
        } else {
            self.done = true;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_permutations_of_three() {
        let permutations: Vec<Vec<i32>> = PermutationIterator::new(vec![1, 2, 3]).collect();
        assert_eq!(permutations.len(), 6);
        let distinct: HashSet<Vec<i32>> = permutations.iter().cloned().collect();
        assert_eq!(distinct.len(), 6);
        for permutation in &permutations {
            let mut sorted = permutation.clone();
            sorted.sort();
            assert_eq!(sorted, vec![1, 2, 3]);
        }
        assert_eq!(permutations[0], vec![1, 2, 3]);
        assert_eq!(permutations[5], vec![3, 2, 1]);
    }

    #[test]
    fn test_input_order_comes_first() {
        let first = PermutationIterator::new(vec!['c', 'a', 'b']).next();
        assert_eq!(first, Some(vec!['c', 'a', 'b']));
    }

    #[test]
    fn test_empty_and_singleton() {
        assert_eq!(PermutationIterator::<i32>::new(Vec::new()).count(), 0);
        let single: Vec<Vec<i32>> = PermutationIterator::new(vec![7]).collect();
        assert_eq!(single, vec![vec![7]]);
    }

    #[test]
    fn test_next_permutation_steps() {
        let mut positions = vec![0, 2, 1];
        assert!(next_permutation(&mut positions));
        assert_eq!(positions, vec![1, 0, 2]);
        let mut last = vec![2, 1, 0];
        assert!(!next_permutation(&mut last));
    }
}
