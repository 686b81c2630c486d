//! Global presentation scope: the root class list and inline style variables.
//!
//! Only the theme applier mutates this scope.

use std::collections::{BTreeMap, BTreeSet};

/// Root presentation scope a theme is applied to.
pub trait Presentation: Send {
    fn add_class(&mut self, class: &str);
    fn remove_class(&mut self, class: &str);
    fn has_class(&self, class: &str) -> bool;
    fn set_variable(&mut self, name: &str, value: &str);
    fn remove_variable(&mut self, name: &str);
    fn variable(&self, name: &str) -> Option<String>;
}

/// In-memory root scope that can render itself as a CSS rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentRoot {
    classes: BTreeSet<String>,
    variables: BTreeMap<String, String>,
}

impl DocumentRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// `:root.<classes> { --var: value; ... }`.
    pub fn to_css(&self) -> String {
        let mut selector = String::from(":root");
        for class in &self.classes {
            selector.push('.');
            selector.push_str(class);
        }
        let mut css = format!("{selector} {{\n");
        for (name, value) in &self.variables {
            css.push_str(&format!("  {name}: {value};\n"));
        }
        css.push_str("}\n");
        css
    }
}

impl Presentation for DocumentRoot {
    fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn set_variable(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_string(), value.to_string());
    }

    fn remove_variable(&mut self, name: &str) {
        self.variables.remove(name);
    }

    fn variable(&self, name: &str) -> Option<String> {
        self.variables.get(name).cloned()
    }
}
