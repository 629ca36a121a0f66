use std::collections::HashMap;
use std::hash::Hash;

use crate::variable::Variable;

/// Turns an index element into the suffix of a generated variable name.
pub trait IndexLabel {
    fn label(&self) -> String;
}

macro_rules! display_label {
    ($($t:ty),*) => {
        $(
            impl IndexLabel for $t {
                fn label(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_label!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, char, String);

impl IndexLabel for &str {
    fn label(&self) -> String {
        (*self).to_string()
    }
}

impl<A: IndexLabel, B: IndexLabel> IndexLabel for (A, B) {
    fn label(&self) -> String {
        format!("{}_{}", self.0.label(), self.1.label())
    }
}

impl<A: IndexLabel, B: IndexLabel, C: IndexLabel> IndexLabel for (A, B, C) {
    fn label(&self) -> String {
        format!("{}_{}_{}", self.0.label(), self.1.label(), self.2.label())
    }
}

/// Variables created together over an index set, kept in index-set order.
#[derive(Debug, Clone)]
pub struct VariableFamily<K> {
    entries: Vec<(K, Variable)>,
    positions: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> VariableFamily<K> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, key: K, var: Variable) {
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push((key, var));
    }

    pub fn get(&self, key: &K) -> Option<&Variable> {
        self.positions.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Variable)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(3u32.label(), "3");
        assert_eq!("fridge".label(), "fridge");
        assert_eq!(("dryer", 7).label(), "dryer_7");
        assert_eq!((1, 'a', String::from("z")).label(), "1_a_z");
    }
}
