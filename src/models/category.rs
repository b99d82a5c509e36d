use crate::errors::AppError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The fixed set of study categories a session can be timed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cs,        // cs
    Algorithm, // algorithm
    Silmu,     // silmu (practical, on-the-job study)
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Cs, Category::Algorithm, Category::Silmu];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Category::Cs => "cs",
            Category::Algorithm => "algorithm",
            Category::Silmu => "silmu",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "cs" => Some(Category::Cs),
            "algorithm" => Some(Category::Algorithm),
            "silmu" => Some(Category::Silmu),
            _ => None,
        }
    }

    /// Human readable label for tables and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Cs => "CS study",
            Category::Algorithm => "Algorithms",
            Category::Silmu => "Practical study",
        }
    }

    /// Position in `Category::ALL`.
    pub fn index(self) -> usize {
        match self {
            Category::Cs => 0,
            Category::Algorithm => 1,
            Category::Silmu => 2,
        }
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_db_str(&s.trim().to_lowercase())
            .ok_or_else(|| AppError::InvalidCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("CS".parse::<Category>().unwrap(), Category::Cs);
        assert_eq!(" silmu ".parse::<Category>().unwrap(), Category::Silmu);
        assert!(matches!(
            "math".parse::<Category>(),
            Err(AppError::InvalidCategory(_))
        ));
    }

    #[test]
    fn indexes_match_all() {
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(Category::from_db_str(c.to_db_str()), Some(*c));
        }
    }
}
