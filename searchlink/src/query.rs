//! Boolean clause sets.

use serde_json::{Map, Value};

/// Ordered must / must-not / should clause lists.
///
/// Clauses are opaque JSON values passed to the service as written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolClauses {
    /// Must match (AND).
    pub must: Vec<Value>,
    /// Must not match (NOT).
    pub must_not: Vec<Value>,
    /// Should match (OR).
    pub should: Vec<Value>,
}

impl BoolClauses {
    /// Create an empty clause set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a must clause.
    pub fn must(mut self, clause: impl Into<Value>) -> Self {
        self.must.push(clause.into());
        self
    }

    /// Append a must_not clause.
    pub fn must_not(mut self, clause: impl Into<Value>) -> Self {
        self.must_not.push(clause.into());
        self
    }

    /// Append a should clause.
    pub fn should(mut self, clause: impl Into<Value>) -> Self {
        self.should.push(clause.into());
        self
    }

    /// True when no list holds a clause.
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.must_not.is_empty() && self.should.is_empty()
    }

    /// Convert to JSON, leaving out empty lists.
    pub fn to_json(&self) -> Value {
        let mut clauses = Map::new();

        if !self.must.is_empty() {
            clauses.insert("must".to_string(), Value::Array(self.must.clone()));
        }
        if !self.must_not.is_empty() {
            clauses.insert("must_not".to_string(), Value::Array(self.must_not.clone()));
        }
        if !self.should.is_empty() {
            clauses.insert("should".to_string(), Value::Array(self.should.clone()));
        }

        Value::Object(clauses)
    }
}
