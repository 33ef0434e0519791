use std::cmp::Ordering;

/// The six string relations compiled code can ask for.
///
/// All of them order byte-wise: the first mismatching pair of (unsigned)
/// bytes decides, and a string that runs out first orders before the longer
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Comparison {
    pub const ALL: [Comparison; 6] = [
        Comparison::Equal,
        Comparison::NotEqual,
        Comparison::Less,
        Comparison::LessOrEqual,
        Comparison::Greater,
        Comparison::GreaterOrEqual,
    ];

    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Comparison::Equal => ordering.is_eq(),
            Comparison::NotEqual => ordering.is_ne(),
            Comparison::Less => ordering.is_lt(),
            Comparison::LessOrEqual => ordering.is_le(),
            Comparison::Greater => ordering.is_gt(),
            Comparison::GreaterOrEqual => ordering.is_ge(),
        }
    }

    pub fn evaluate(self, lhs: &[u8], rhs: &[u8]) -> bool {
        match self {
            // Unequal lengths settle it without scanning.
            Comparison::Equal => lhs == rhs,
            Comparison::NotEqual => lhs != rhs,
            _ => self.holds(lhs.cmp(rhs)),
        }
    }

    /// Primary entry-point symbol for this relation.
    pub fn symbol(self) -> &'static str {
        use crate::abi::symbols;

        match self {
            Comparison::Equal => symbols::STRING_EQUAL,
            Comparison::NotEqual => symbols::STRING_NEQ,
            Comparison::Less => symbols::STRING_LESS,
            Comparison::LessOrEqual => symbols::STRING_LEQ,
            Comparison::Greater => symbols::STRING_GREATER,
            Comparison::GreaterOrEqual => symbols::STRING_GEQ,
        }
    }
}
