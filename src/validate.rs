//! Example validation
//!
//! Classes may carry example instances; each one is validated against the
//! class's generated schema so a lexicon edit that breaks its own examples
//! fails the build before anything is published.

use jsonschema::{Draft, JSONSchema};
use tracing::debug;

use crate::error::{LexiconError, Result};
use crate::generator::generate_schema_for_class;
use crate::lexicon::LexiconClass;

/// One failed example instance
#[derive(Debug, Clone)]
pub struct ExampleViolation {
    /// Index of the example in the class's `examples` list
    pub example_index: usize,
    /// Validator messages for this example
    pub errors: Vec<String>,
}

/// Validation outcome for one class
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub class_name: String,
    pub examples_checked: usize,
    pub violations: Vec<ExampleViolation>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Validate a class's examples against its generated schema.
///
/// A class without examples yields an empty, clean report. A generated
/// schema the validator refuses to compile is a hard error; that means the
/// generator itself produced a malformed document.
pub fn validate_class_examples(class: &LexiconClass) -> Result<ValidationReport> {
    let mut report = ValidationReport {
        class_name: class.type_name.clone(),
        ..Default::default()
    };
    if class.examples.is_empty() {
        return Ok(report);
    }

    let schema = generate_schema_for_class(class)?;
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|err| LexiconError::InvalidSchema {
            class: class.type_name.clone(),
            detail: err.to_string(),
        })?;

    for (index, example) in class.examples.iter().enumerate() {
        report.examples_checked += 1;
        if let Err(errors) = compiled.validate(example) {
            let errors: Vec<String> = errors.map(|e| e.to_string()).collect();
            debug!(
                class = %class.type_name,
                example = index,
                count = errors.len(),
                "example failed validation"
            );
            report.violations.push(ExampleViolation {
                example_index: index,
                errors,
            });
        }
    }

    Ok(report)
}
