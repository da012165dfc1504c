//! Schema definition blocks and their textual rendering

use std::fmt;

const INDENT: &str = "    ";

/// One line inside a `definition` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionItem {
    /// `relation <name>: <subject_type>`
    Relation { name: String, subject_type: String },
    /// `permission <name> = <a> + <b> ...`
    Permission { name: String, operands: Vec<String> },
    /// `// <text>`
    Comment(String),
}

impl fmt::Display for DefinitionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relation { name, subject_type } => write!(f, "relation {name}: {subject_type}"),
            Self::Permission { name, operands } => {
                write!(f, "permission {name} = {}", operands.join(" + "))
            }
            Self::Comment(text) => write!(f, "// {text}"),
        }
    }
}

/// A SpiceDB object type definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub items: Vec<DefinitionItem>,
}

impl Definition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn add_relation(&mut self, name: impl Into<String>, subject_type: impl Into<String>) {
        self.items.push(DefinitionItem::Relation {
            name: name.into(),
            subject_type: subject_type.into(),
        });
    }

    pub fn add_permission(&mut self, name: impl Into<String>, operands: Vec<String>) {
        self.items.push(DefinitionItem::Permission {
            name: name.into(),
            operands,
        });
    }

    pub fn add_comment(&mut self, text: impl Into<String>) {
        self.items.push(DefinitionItem::Comment(text.into()));
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return write!(f, "definition {} {{}}", self.name);
        }

        writeln!(f, "definition {} {{", self.name)?;
        for item in &self.items {
            writeln!(f, "{INDENT}{item}")?;
        }
        write!(f, "}}")
    }
}
