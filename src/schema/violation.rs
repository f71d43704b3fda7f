use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One constraint violated by a payload.
pub struct Violation {
    /// Path to the offending field, e.g. `recipientList[3].recipientNo`.
    /// Empty when the payload as a whole is at fault.
    pub path: String,
    pub reason: Reason,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.reason)
        } else {
            write!(f, "{}: {}", self.path, self.reason)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    MissingProperty,
    WrongType { expected: &'static str },
    NotInEnum { allowed: &'static [&'static str] },
    PatternMismatch { pattern: &'static str },
    TooFewItems { min: usize, actual: usize },
    TooManyItems { max: usize, actual: usize },
    UnknownProperty,
    NoAlternativeMatched { alternatives: Vec<String> },
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingProperty => write!(f, "required property is missing"),
            Self::WrongType { expected } => write!(f, "expected {expected}"),
            Self::NotInEnum { allowed } => {
                write!(f, "value must be one of {}", allowed.join(", "))
            }
            Self::PatternMismatch { pattern } => {
                write!(f, "value does not match pattern {pattern}")
            }
            Self::TooFewItems { min, actual } => {
                write!(f, "too few items: {actual} (min {min})")
            }
            Self::TooManyItems { max, actual } => {
                write!(f, "too many items: {actual} (max {max})")
            }
            Self::UnknownProperty => write!(f, "property is not allowed"),
            Self::NoAlternativeMatched { alternatives } => {
                write!(
                    f,
                    "none of the alternative requirement sets is satisfied: {}",
                    alternatives.join(" | ")
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A payload failed its schema contract.
///
/// Carries every violated constraint, not just the first one found, so a
/// caller can report all problems in one pass.
pub struct ValidationError {
    schema: &'static str,
    violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(schema: &'static str, violations: Vec<Violation>) -> Self {
        Self { schema, violations }
    }

    /// Name of the schema the payload was checked against.
    pub fn schema(&self) -> &'static str {
        self.schema
    }

    /// All violated constraints, in declaration order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "payload does not match the {} schema ({} violation{}): ",
            self.schema,
            self.violations.len(),
            if self.violations.len() == 1 { "" } else { "s" }
        )?;
        for (idx, violation) in self.violations.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
