use super::Iterable;

/// Cartesian product of several iterables.
///
/// Works like an odometer with mixed radixes: the last position advances on
/// every step, and when it runs out it restarts and carries into the position
/// before it. The product is empty as soon as one iterable is empty; zero
/// iterables yield exactly one empty combination.
pub struct CombinedIterator<T> {
    iterables: Vec<Iterable<T>>,
    iterators: Vec<Box<dyn Iterator<Item = T>>>,
    current: Vec<T>,
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NotStarted,
    Running,
    Done,
}

impl<T: Clone> CombinedIterator<T> {
    pub fn new(iterables: Vec<Iterable<T>>) -> Self {
        Self {
            iterables,
            iterators: Vec::new(),
            current: Vec::new(),
            state: State::NotStarted,
        }
    }

    fn start(&mut self) -> Option<Vec<T>> {
        for iterable in &self.iterables {
            let mut iterator = iterable();
            let first = iterator.next()?;
            self.iterators.push(iterator);
            self.current.push(first);
        }
        self.state = State::Running;
        Some(self.current.clone())
    }

    fn advance(&mut self) -> Option<Vec<T>> {
        for position in (0..self.iterators.len()).rev() {
            if let Some(value) = self.iterators[position].next() {
                self.current[position] = value;
                return Some(self.current.clone());
            }
            let mut restarted = (self.iterables[position])();
            self.current[position] = restarted.next()?;
            self.iterators[position] = restarted;
        }
        None
    }
}

impl<T: Clone> Iterator for CombinedIterator<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = match self.state {
            State::NotStarted => self.start(),
            State::Running => self.advance(),
            State::Done => None,
        };
        if next.is_none() {
            self.state = State::Done;
        }
        next
    }
}
