/// Several iterators chained into one stream, skipping exhausted ones
pub struct ConcatIterator<T> {
    iterators: Vec<Box<dyn Iterator<Item = T>>>,
    position: usize,
}

impl<T> ConcatIterator<T> {
    pub fn new(iterators: Vec<Box<dyn Iterator<Item = T>>>) -> Self {
        Self {
            iterators,
            position: 0,
        }
    }
}

impl<T> Iterator for ConcatIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while let Some(iterator) = self.iterators.get_mut(self.position) {
            if let Some(value) = iterator.next() {
                return Some(value);
            }
            self.position += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenates_in_order_skipping_empty() {
        let iterators: Vec<Box<dyn Iterator<Item = i32>>> = vec![
            Box::new(vec![1, 2].into_iter()),
            Box::new(std::iter::empty()),
            Box::new(vec![3].into_iter()),
        ];
        let concat = ConcatIterator::new(iterators);
        assert_eq!(concat.collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_no_iterators() {
        assert_eq!(ConcatIterator::<u8>::new(Vec::new()).next(), None);
    }
}
