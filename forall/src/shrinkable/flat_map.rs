use std::rc::Rc;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{Candidates, RcShrinkable, Shrinkable};
use crate::distance::ShrinkingDistance;
use crate::generator::RandomGenerator;

/// Generator factory used by flat-mapped values
pub type GeneratorMapper<T, U> = Arc<dyn Fn(T) -> RandomGenerator<U> + Send + Sync>;

/// A value produced by a generator that itself depends on a base value.
///
/// The inner value is drawn from a generator seeded with `seed`, so a shrunk
/// base value regenerates its inner value deterministically.
pub struct FlatMappedShrinkable<T, U> {
    base: RcShrinkable<T>,
    mapper: GeneratorMapper<T, U>,
    seed: u64,
    inner: RcShrinkable<U>,
}

impl<T: Clone + 'static, U: Clone + 'static> FlatMappedShrinkable<T, U> {
    /// Generate the inner value for `base`; `None` if that generation fails
    pub fn generate(
        base: RcShrinkable<T>,
        mapper: GeneratorMapper<T, U>,
        seed: u64,
    ) -> Option<RcShrinkable<U>> {
        let generator = mapper(base.value());
        let mut rng = StdRng::seed_from_u64(seed);
        let inner = match generator.next(&mut rng) {
            Ok(inner) => inner,
            Err(err) => {
                log::trace!("regenerating flat-mapped value failed: {}", err);
                return None;
            }
        };
        Some(Rc::new(FlatMappedShrinkable {
            base,
            mapper,
            seed,
            inner,
        }))
    }
}

impl<T: Clone + 'static, U: Clone + 'static> Shrinkable<U> for FlatMappedShrinkable<T, U> {
    fn value(&self) -> U {
        self.inner.value()
    }

    fn distance(&self) -> ShrinkingDistance {
        self.base.distance().append(&self.inner.distance())
    }

    fn shrink_candidates(&self) -> Candidates<U> {
        let (base, mapper, seed) = (self.base.clone(), self.mapper.clone(), self.seed);
        let shrink_inner = self.inner.shrink_candidates().map(move |inner| {
            Rc::new(FlatMappedShrinkable {
                base: base.clone(),
                mapper: mapper.clone(),
                seed,
                inner,
            }) as RcShrinkable<U>
        });

        let mapper = self.mapper.clone();
        let shrink_base = self
            .base
            .shrink_candidates()
            .filter_map(move |base| FlatMappedShrinkable::generate(base, mapper.clone(), seed));

        Box::new(shrink_inner.chain(shrink_base))
    }
}
