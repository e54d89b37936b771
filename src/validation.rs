//! Input validation for scheduling rounds.
//!
//! The codec assumes names are free of separator characters and the
//! formula builder assumes test names are unique. This module checks
//! those preconditions up front. Detects:
//! - Duplicate test names and duplicate worker identities
//! - Reserved separator characters inside names and labels
//! - Parent / parallel references to unknown tests
//! - Circular parent chains
//! - Tests no worker can satisfy
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::codec::RESERVED;
use crate::models::{TestCollection, WorkerCollection};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Two tests share a name, or two workers share name and instance.
    DuplicateId,
    /// A name or label contains a codec separator.
    ReservedCharacter,
    /// A parent or parallel reference names an unknown test.
    InvalidReference,
    /// Parent links form a cycle.
    CyclicDependency,
    /// No worker offers any capability the test requires.
    NoCapableWorker,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the collections of a scheduling round.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(workers: &WorkerCollection, tests: &TestCollection) -> ValidationResult {
    let mut errors = Vec::new();

    let mut worker_ids = HashSet::new();
    for w in workers.iter() {
        if !worker_ids.insert((w.name.as_str(), w.instance)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate worker: {}:{}", w.name, w.instance),
            ));
        }
        check_reserved(&mut errors, "worker name", &w.name);
        for c in &w.capabilities {
            check_reserved(&mut errors, "worker capability", c);
        }
    }

    let mut test_names = HashSet::new();
    for t in tests.iter() {
        if !test_names.insert(t.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate test name: {}", t.name),
            ));
        }
        check_reserved(&mut errors, "test name", &t.name);
        for c in &t.required_capabilities {
            check_reserved(&mut errors, "test capability", c);
        }
        if let Some(parent) = &t.parent {
            check_reserved(&mut errors, "test parent", parent);
        }
        for p in &t.parallel {
            check_reserved(&mut errors, "parallel test", p);
        }
    }

    // Check references
    for t in tests.iter() {
        if let Some(parent) = &t.parent {
            if !test_names.contains(parent.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidReference,
                    format!("Test '{}' references unknown parent '{}'", t.name, parent),
                ));
            }
        }
        for p in &t.parallel {
            if !test_names.contains(p.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidReference,
                    format!("Test '{}' references unknown parallel test '{}'", t.name, p),
                ));
            }
        }
    }

    for t in tests.iter() {
        if !workers.iter().any(|w| w.satisfies(t)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoCapableWorker,
                format!("No worker satisfies test '{}'", t.name),
            ));
        }
    }

    if let Some(cycle_err) = detect_cycles(tests) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_reserved(errors: &mut Vec<ValidationError>, what: &str, value: &str) {
    if let Some(c) = value.chars().find(|c| RESERVED.contains(c)) {
        errors.push(ValidationError::new(
            ValidationErrorKind::ReservedCharacter,
            format!("{what} '{value}' contains reserved character '{c}'"),
        ));
    }
}

/// Detects cycles in the parent graph using DFS.
fn detect_cycles(tests: &TestCollection) -> Option<ValidationError> {
    // parent → children
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for t in tests.iter() {
        if let Some(parent) = &t.parent {
            adj.entry(parent.as_str()).or_default().push(t.name.as_str());
        }
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for t in tests.iter() {
        let node = t.name.as_str();
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular parent chain involving test '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(children) = adj.get(node) {
        for &next in children {
            if in_stack.contains(next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}
