use serde::Serialize;

/// Domain restriction of a decision variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Continuous,
    Integer,
    /// Integer restricted to {0, 1}
    Binary,
}

impl Category {
    pub fn is_integer(self) -> bool {
        !matches!(self, Category::Continuous)
    }
}

/// Identifies a variable inside the [`Problem`](crate::Problem) that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId {
    pub(crate) problem: u64,
    pub(crate) index: usize,
}

impl VariableId {
    /// Position of the variable in creation order
    pub fn index(self) -> usize {
        self.index
    }
}

/// Handle to a decision variable.
///
/// Handles are only created by [`Problem::add_variable`](crate::Problem::add_variable)
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub(crate) id: VariableId,
    pub(crate) name: String,
    pub(crate) lower: Option<f64>,
    pub(crate) upper: Option<f64>,
    pub(crate) category: Category,
}

impl Variable {
    pub fn id(&self) -> VariableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lower_bound(&self) -> Option<f64> {
        self.lower
    }

    pub fn upper_bound(&self) -> Option<f64> {
        self.upper
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Replaces characters that LP file readers reject with `_`
pub(crate) fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if "-+[] ->/".contains(c) { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("x"), "x");
        assert_eq!(sanitize_name("run[fridge] -> 3/4"), "run_fridge_____3_4");
    }

    #[test]
    fn test_category_is_integer() {
        assert!(!Category::Continuous.is_integer());
        assert!(Category::Integer.is_integer());
        assert!(Category::Binary.is_integer());
    }
}
