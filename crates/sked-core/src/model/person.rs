use serde::{Deserialize, Serialize};

/// An event attender.
///
/// Equality and ordering compare `(name, last_name, email)` lexicographically,
/// in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Person {
    name: String,
    last_name: String,
    email: String,
}

impl Person {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl std::fmt::Display for Person {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} <{}>", self.name, self.last_name, self.email)
    }
}
