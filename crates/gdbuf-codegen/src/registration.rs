//! Registration Table Builder.
//!
//! Flattens the generated class set into the order the host must register
//! it in: every class after the classes its properties reference. The order
//! is a depth-first topological sort over the reference graph that visits
//! classes in emission order, so unrelated classes keep their emission order.
//!
//! Cycles are broken with header-first registration:
//!
//! ```text
//! A.b: B, B.a: A   →   [header A] B A
//! ```
//!
//! the class that closes the cycle is declared to the host by name before
//! the classes that reference it are registered. Self references need no
//! header; the host already knows the class it is registering.

use crate::ir::GeneratedClass;
use gdbuf_core::{InitializationLevel, Location, SchemaError, SchemaResult};
use std::collections::HashMap;

/// One registration step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationEntry {
    /// Index into the generated class list
    pub class: usize,
    /// `namespace::Name`
    pub qualified_name: String,
    /// Declared to the host before any class is registered
    pub header_first: bool,
    /// Header-first classes this class references before they are registered
    pub forward_refs: Vec<String>,
}

/// Ordered registration manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationTable {
    level: InitializationLevel,
    entries: Vec<RegistrationEntry>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

impl RegistrationTable {
    /// Order `classes` for registration at `level`
    ///
    /// Fails with [`SchemaError::UnresolvedTypeReference`] when a property
    /// references a schema type with no generated class.
    pub fn build(classes: &[GeneratedClass], level: InitializationLevel) -> SchemaResult<Self> {
        let by_schema_name: HashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_message())
            .map(|(i, c)| (c.schema_name.as_str(), i))
            .collect();

        // Resolve every edge up front so the walk itself cannot fail.
        let mut edges: Vec<Vec<usize>> = Vec::with_capacity(classes.len());
        for class in classes {
            let mut targets = Vec::new();
            for reference in class.references() {
                let target = by_schema_name.get(reference.target).copied().ok_or_else(|| {
                    SchemaError::UnresolvedTypeReference {
                        location: Location::field(
                            &class.source_file,
                            class.schema_name.as_str(),
                            reference.property,
                        ),
                        type_name: reference.target.to_string(),
                    }
                })?;
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
            edges.push(targets);
        }

        let mut marks = vec![Mark::Unvisited; classes.len()];
        let mut header_first = vec![false; classes.len()];
        let mut forward_refs: Vec<Vec<usize>> = vec![Vec::new(); classes.len()];
        let mut order = Vec::with_capacity(classes.len());

        for root in 0..classes.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            // (class, next edge to follow)
            let mut stack = vec![(root, 0usize)];
            marks[root] = Mark::Visiting;

            while let Some(top) = stack.last_mut() {
                let node = top.0;
                let Some(&target) = edges[node].get(top.1) else {
                    marks[node] = Mark::Done;
                    order.push(node);
                    stack.pop();
                    continue;
                };
                top.1 += 1;

                match marks[target] {
                    Mark::Unvisited => {
                        marks[target] = Mark::Visiting;
                        stack.push((target, 0));
                    }
                    Mark::Visiting if target != node => {
                        header_first[target] = true;
                        forward_refs[node].push(target);
                    }
                    Mark::Visiting | Mark::Done => {}
                }
            }
        }

        let entries = order
            .into_iter()
            .map(|i| RegistrationEntry {
                class: i,
                qualified_name: classes[i].qualified_name(),
                header_first: header_first[i],
                forward_refs: forward_refs[i]
                    .iter()
                    .map(|&t| classes[t].qualified_name())
                    .collect(),
            })
            .collect::<Vec<_>>();

        let headers = entries.iter().filter(|e| e.header_first).count();
        tracing::debug!(
            "Registration table: {} classes, {} header-first",
            entries.len(),
            headers
        );

        Ok(Self { level, entries })
    }

    pub fn level(&self) -> InitializationLevel {
        self.level
    }

    pub fn entries(&self) -> &[RegistrationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Qualified class names in registration order
    pub fn order(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.qualified_name.as_str())
            .collect()
    }

    /// Entries that must be declared before registration starts
    pub fn header_first(&self) -> impl Iterator<Item = &RegistrationEntry> {
        self.entries.iter().filter(|e| e.header_first)
    }

    /// Registration position of a class
    pub fn position(&self, qualified_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.qualified_name == qualified_name)
    }
}

#[cfg(test)]
#[path = "registration/registration_tests.rs"]
mod registration_tests;
