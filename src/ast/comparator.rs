/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,
}

impl Comparator {
    /// Accepts both the symbol (`<=`) and the short name (`lte`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "==" | "eq" => Some(Comparator::Equal),
            "!=" | "ne" => Some(Comparator::NotEqual),
            "<" | "lt" => Some(Comparator::LessThan),
            "<=" | "lte" => Some(Comparator::LessEqual),
            ">" | "gt" => Some(Comparator::GreaterThan),
            ">=" | "gte" => Some(Comparator::GreaterEqual),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::Equal => "==",
            Comparator::NotEqual => "!=",
            Comparator::LessThan => "<",
            Comparator::LessEqual => "<=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterEqual => ">=",
        }
    }

    /// True for `<`, `<=`, `>`, `>=`
    pub fn is_ordering(&self) -> bool {
        !matches!(self, Comparator::Equal | Comparator::NotEqual)
    }

    /// Applies an ordering operator to two integers.
    pub fn compare_ints(&self, a: i64, b: i64) -> bool {
        match self {
            Comparator::Equal => a == b,
            Comparator::NotEqual => a != b,
            Comparator::LessThan => a < b,
            Comparator::LessEqual => a <= b,
            Comparator::GreaterThan => a > b,
            Comparator::GreaterEqual => a >= b,
        }
    }
}
