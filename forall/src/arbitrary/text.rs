use std::rc::Rc;
use std::sync::Arc;

use super::{Arbitrary, ArbitraryExt, BoxedArbitrary};
use crate::error::PropertyError;
use crate::exhaustive::{self, ExhaustiveGenerator};
use crate::generator::{
    DEFAULT_COLLECTION_SIZE, EdgeCase, RandomGenerator, container_generator, default_max_size,
    edge_case,
};
use crate::shrinkable::{Collector, ContainerShrinkable, RcShrinkable};

const SURROGATES: (u32, u32) = (0xD800, 0xDFFF);

/// Characters from a list of code point ranges.
///
/// Characters are indexed across all ranges in order and shrink toward the
/// first character of the first range.
#[derive(Debug, Clone)]
pub struct CharArbitrary {
    ranges: Vec<(u32, u32)>,
}

/// Any character except surrogates; printable ASCII comes first
pub fn chars() -> CharArbitrary {
    CharArbitrary {
        ranges: vec![
            (0x20, 0x7E),
            (0x00, 0x1F),
            (0x7F, SURROGATES.0 - 1),
            (SURROGATES.1 + 1, char::MAX as u32),
        ],
    }
}

impl CharArbitrary {
    fn empty() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Printable ASCII characters
    pub fn ascii() -> Self {
        Self::empty().with_range_unchecked(' ', '~')
    }

    /// ASCII letters, lower case first
    pub fn alpha() -> Self {
        Self::empty()
            .with_range_unchecked('a', 'z')
            .with_range_unchecked('A', 'Z')
    }

    /// ASCII digits
    pub fn numeric() -> Self {
        Self::empty().with_range_unchecked('0', '9')
    }

    /// Only characters from `min` to `max`
    pub fn range(min: char, max: char) -> Result<Self, PropertyError> {
        Self::empty().with_range(min, max)
    }

    /// Also allow characters from `min` to `max`
    pub fn with_range(self, min: char, max: char) -> Result<Self, PropertyError> {
        if min > max {
            return Err(PropertyError::invalid_range(min, max));
        }
        Ok(self.with_range_unchecked(min, max))
    }

    /// Also allow each of `chars`
    pub fn with_chars(self, chars: &[char]) -> Self {
        chars
            .iter()
            .fold(self, |this, &c| this.with_range_unchecked(c, c))
    }

    fn with_range_unchecked(mut self, min: char, max: char) -> Self {
        let (min, max) = (min as u32, max as u32);
        if min < SURROGATES.0 && max > SURROGATES.1 {
            self.ranges.push((min, SURROGATES.0 - 1));
            self.ranges.push((SURROGATES.1 + 1, max));
        } else {
            self.ranges.push((min, max));
        }
        self
    }

    fn count(&self) -> u64 {
        self.ranges
            .iter()
            .map(|(min, max)| u64::from(max - min) + 1)
            .sum()
    }

    fn char_at(&self, mut index: u64) -> char {
        for &(min, max) in &self.ranges {
            let size = u64::from(max - min) + 1;
            if index < size {
                let code = min + index as u32;
                return char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
            }
            index -= size;
        }
        char::REPLACEMENT_CHARACTER
    }

    fn indices(&self) -> Result<super::IntegralArbitrary<u64>, PropertyError> {
        let count = self.count();
        if count == 0 {
            return Err(PropertyError::generation_failed_with_context(
                "no characters to choose from",
                None::<String>,
            ));
        }
        super::integers::<u64>().between(0, count - 1)
    }
}

impl Arbitrary for CharArbitrary {
    type Value = char;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<char>, PropertyError> {
        let this = self.clone();
        Ok(self
            .indices()?
            .generator(gen_size)?
            .map(move |index| this.char_at(index)))
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<char>> {
        let this = self.clone();
        Some(
            self.indices()
                .ok()?
                .exhaustive(max_samples)?
                .map(move |index| this.char_at(index)),
        )
    }

    /// The first and the last character
    fn edge_cases(&self) -> Vec<EdgeCase<char>> {
        let Ok(indices) = self.indices() else {
            return Vec::new();
        };
        let this = self.clone();
        indices
            .include_only_edge_cases(vec![0, self.count() - 1])
            .map(move |index| this.char_at(index))
            .edge_cases()
    }
}

/// Strings built from a [`CharArbitrary`]
#[derive(Debug, Clone)]
pub struct StringArbitrary {
    chars: CharArbitrary,
    min_length: usize,
    max_length: Option<usize>,
    unique_chars: bool,
}

/// Strings of any characters
pub fn strings() -> StringArbitrary {
    StringArbitrary {
        chars: chars(),
        min_length: 0,
        max_length: None,
        unique_chars: false,
    }
}

fn collect_string() -> Collector<char, String> {
    Arc::new(|chars: Vec<char>| chars.into_iter().collect())
}

impl StringArbitrary {
    pub fn with_chars(self, chars: CharArbitrary) -> Self {
        Self { chars, ..self }
    }

    pub fn ascii(self) -> Self {
        self.with_chars(CharArbitrary::ascii())
    }

    pub fn alpha(self) -> Self {
        self.with_chars(CharArbitrary::alpha())
    }

    pub fn numeric(self) -> Self {
        self.with_chars(CharArbitrary::numeric())
    }

    pub fn of_min_length(self, min_length: usize) -> Self {
        Self { min_length, ..self }
    }

    pub fn of_max_length(self, max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..self
        }
    }

    pub fn of_length(self, length: usize) -> Self {
        self.of_min_length(length).of_max_length(length)
    }

    /// No character appears twice
    pub fn unique_chars(self) -> Self {
        Self {
            unique_chars: true,
            ..self
        }
    }

    fn max_length_for(&self, gen_size: usize) -> usize {
        self.max_length
            .unwrap_or_else(|| default_max_size(self.min_length, gen_size))
    }
}

impl Arbitrary for StringArbitrary {
    type Value = String;

    fn generator(&self, gen_size: usize) -> Result<RandomGenerator<String>, PropertyError> {
        let chars = self
            .chars
            .generator_with_embedded_edge_cases(gen_size)?;
        container_generator(
            chars,
            self.min_length,
            self.max_length_for(gen_size),
            self.unique_chars,
            collect_string(),
        )
    }

    fn exhaustive(&self, max_samples: u64) -> Option<ExhaustiveGenerator<String>> {
        let chars = self.chars.exhaustive(max_samples)?;
        let max_length = self.max_length.unwrap_or(DEFAULT_COLLECTION_SIZE);
        let lists = exhaustive::list(&chars, self.min_length, max_length, max_samples)?;
        let collect = collect_string();
        if self.unique_chars {
            let unique = lists.filter(|chars| !has_duplicates(chars));
            Some(unique.map(move |chars| collect(chars)))
        } else {
            Some(lists.map(move |chars| collect(chars)))
        }
    }

    /// The empty string and single characters, where the length bounds allow
    fn edge_cases(&self) -> Vec<EdgeCase<String>> {
        let mut edge_cases = Vec::new();
        let max_length = self.max_length.unwrap_or(usize::MAX);
        if self.min_length == 0 {
            edge_cases.push(single_chars(Vec::new(), 0, self.unique_chars));
        }
        if self.min_length <= 1 && max_length >= 1 {
            for char_edge in self.chars.edge_cases() {
                let single = single_chars(vec![char_edge], self.min_length, self.unique_chars);
                edge_cases.push(single);
            }
        }
        edge_cases
    }
}

fn single_chars(chars: Vec<EdgeCase<char>>, min_length: usize, unique: bool) -> EdgeCase<String> {
    edge_case(move || {
        let elements = chars.iter().map(|c| c()).collect();
        Rc::new(ContainerShrinkable::new(elements, min_length, unique, collect_string()))
            as RcShrinkable<String>
    })
}

fn has_duplicates(chars: &[char]) -> bool {
    chars
        .iter()
        .enumerate()
        .any(|(i, c)| chars[i + 1..].contains(c))
}

impl From<CharArbitrary> for BoxedArbitrary<char> {
    fn from(chars: CharArbitrary) -> Self {
        chars.boxed()
    }
}
