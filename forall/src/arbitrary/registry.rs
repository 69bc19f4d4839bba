use std::any::{Any, TypeId, type_name};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use std::sync::Arc;

use num_bigint::BigInt;

use super::{
    ArbitraryExt, BoxedArbitrary, ListArbitrary, SetArbitrary, big_integers, bools, chars,
    decimals, doubles, integers, strings,
};
use crate::decimal::Decimal;
use crate::error::PropertyError;

/// Types with a canonical arbitrary
pub trait DefaultArbitrary: Clone + Debug + Send + Sync + Sized + 'static {
    fn default_arbitrary() -> BoxedArbitrary<Self>;
}

/// The default arbitrary of `T`
pub fn any<T: DefaultArbitrary>() -> BoxedArbitrary<T> {
    T::default_arbitrary()
}

macro_rules! impl_default_integral {
    ($($t:ty),* $(,)?) => {
        $(
            impl DefaultArbitrary for $t {
                fn default_arbitrary() -> BoxedArbitrary<Self> {
                    integers::<$t>().boxed()
                }
            }
        )*
    };
}

impl_default_integral!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl DefaultArbitrary for BigInt {
    fn default_arbitrary() -> BoxedArbitrary<Self> {
        big_integers().boxed()
    }
}

impl DefaultArbitrary for bool {
    fn default_arbitrary() -> BoxedArbitrary<Self> {
        bools().boxed()
    }
}

impl DefaultArbitrary for char {
    fn default_arbitrary() -> BoxedArbitrary<Self> {
        chars().boxed()
    }
}

impl DefaultArbitrary for String {
    fn default_arbitrary() -> BoxedArbitrary<Self> {
        strings().boxed()
    }
}

impl DefaultArbitrary for Decimal {
    fn default_arbitrary() -> BoxedArbitrary<Self> {
        decimals().boxed()
    }
}

impl DefaultArbitrary for f64 {
    fn default_arbitrary() -> BoxedArbitrary<Self> {
        doubles().boxed()
    }
}

impl<T: DefaultArbitrary + PartialEq> DefaultArbitrary for Vec<T> {
    fn default_arbitrary() -> BoxedArbitrary<Self> {
        ListArbitrary::new(T::default_arbitrary()).boxed()
    }
}

impl<T: DefaultArbitrary + Ord> DefaultArbitrary for BTreeSet<T> {
    fn default_arbitrary() -> BoxedArbitrary<Self> {
        SetArbitrary::new(T::default_arbitrary()).boxed()
    }
}

type Constructor<T> = Arc<dyn Fn() -> BoxedArbitrary<T> + Send + Sync>;

/// Arbitrary constructors by type.
///
/// Every [`resolve`](ArbitraryRegistry::resolve) builds a fresh arbitrary, so
/// two parameters of the same type get distinct identities.
pub struct ArbitraryRegistry {
    constructors: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ArbitraryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A registry knowing the primitive types, `String`, `BigInt` and `Decimal`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_default::<i8>();
        registry.register_default::<i16>();
        registry.register_default::<i32>();
        registry.register_default::<i64>();
        registry.register_default::<i128>();
        registry.register_default::<isize>();
        registry.register_default::<u8>();
        registry.register_default::<u16>();
        registry.register_default::<u32>();
        registry.register_default::<u64>();
        registry.register_default::<u128>();
        registry.register_default::<usize>();
        registry.register_default::<BigInt>();
        registry.register_default::<bool>();
        registry.register_default::<char>();
        registry.register_default::<String>();
        registry.register_default::<Decimal>();
        registry.register_default::<f64>();
        registry
    }

    /// Register a constructor for `T`, replacing any previous one
    pub fn register<T, F>(&mut self, constructor: F)
    where
        T: 'static,
        F: Fn() -> BoxedArbitrary<T> + Send + Sync + 'static,
    {
        let constructor: Constructor<T> = Arc::new(constructor);
        self.constructors
            .insert(TypeId::of::<T>(), Box::new(constructor));
    }

    /// Register the default arbitrary of `T`
    pub fn register_default<T: DefaultArbitrary>(&mut self) {
        self.register::<T, _>(T::default_arbitrary);
    }

    /// Build the arbitrary registered for `T`
    pub fn resolve<T: 'static>(&self) -> Result<BoxedArbitrary<T>, PropertyError> {
        self.constructors
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<Constructor<T>>())
            .map(|constructor| constructor())
            .ok_or_else(|| PropertyError::cannot_find_arbitrary(type_name::<T>()))
    }

    /// Check if a constructor is registered for `T`
    pub fn contains<T: 'static>(&self) -> bool {
        self.constructors.contains_key(&TypeId::of::<T>())
    }

    /// Remove the constructor for `T`
    pub fn remove<T: 'static>(&mut self) -> bool {
        self.constructors.remove(&TypeId::of::<T>()).is_some()
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl Default for ArbitraryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::Arbitrary;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_registry_operations() {
        let mut registry = ArbitraryRegistry::new();
        assert!(registry.is_empty());
        registry.register_default::<i32>();
        assert!(registry.contains::<i32>());
        assert_eq!(registry.len(), 1);
        assert!(registry.remove::<i32>());
        assert!(!registry.remove::<i32>());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_missing_type_is_reported() {
        let registry = ArbitraryRegistry::with_defaults();
        match registry.resolve::<Point>() {
            Err(PropertyError::CannotFindArbitrary { type_name }) => {
                assert!(type_name.ends_with("Point"));
            }
            other => panic!("expected a missing arbitrary, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = ArbitraryRegistry::with_defaults();
        registry.register::<Point, _>(|| {
            let coordinate = || integers::<i32>().between(-10, 10).unwrap_or_else(|_| integers());
            (coordinate(), coordinate())
                .map(|(x, y)| Point { x, y })
                .boxed()
        });

        let mut rng = StdRng::seed_from_u64(12);
        let generator = registry.resolve::<Point>().unwrap().generator(100).unwrap();
        for _ in 0..50 {
            let point = generator.next(&mut rng).unwrap().value();
            assert!((-10..=10).contains(&point.x));
            assert!((-10..=10).contains(&point.y));
        }
    }

    #[test]
    fn test_each_resolve_is_a_new_arbitrary() {
        let registry = ArbitraryRegistry::with_defaults();
        let first = registry.resolve::<u8>().unwrap();
        let second = registry.resolve::<u8>().unwrap();
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_container_defaults() {
        let mut rng = StdRng::seed_from_u64(12);
        let generator = any::<Vec<bool>>().generator(20).unwrap();
        let list = generator.next(&mut rng).unwrap().value();
        assert!(list.len() <= 20);
        let sets = any::<BTreeSet<u8>>().generator(20).unwrap();
        assert!(sets.next(&mut rng).unwrap().value().len() <= 20);
    }
}
