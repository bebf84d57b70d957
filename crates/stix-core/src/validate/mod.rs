//! Structural validation for STIX objects.
//!
//! Validation is purely local: it looks only at the object's own fields and
//! never consults a registry of objects that exist elsewhere. Rules run in a
//! fixed order:
//!
//! 1. Base identity (id well-formed, id kind matches the object kind)
//! 2. Shared block (spec_version, lang, timestamps, markings, references)
//! 3. Type-specific rules (required fields, ranges, time windows)
//! 4. Field walk (every identifier in every own field, nested records)
//!
//! [`Validator::validate`] accumulates every violation; [`is_valid`] stops
//! at the first one.

mod objects;
mod rules;

use std::collections::BTreeMap;

use crate::error::{ValidationError, ValidationErrors, ValidationRule};
use crate::model::{
    ExternalReference, GranularMarking, Identifier, KillChainPhase, StixObject, Timestamp,
    WindowsRegistryValue,
};

/// Validation configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    fail_fast: bool,
}

impl Validator {
    /// Creates a validator that collects every violation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops at the first violation when set.
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Validates an object.
    pub fn validate(&self, object: &StixObject) -> Result<(), ValidationErrors> {
        let mut checker = Checker::new(self.fail_fast);

        rules::check_base(object, &mut checker);
        if !checker.is_done() {
            rules::check_block(object.block(), &mut checker);
        }
        if !checker.is_done() {
            objects::check_object(object, &mut checker);
        }
        if !checker.is_done() {
            object.check_fields(&mut checker);
        }

        checker.finish()
    }
}

/// Validates an object, collecting every violation.
pub fn validate(object: &StixObject) -> Result<(), ValidationErrors> {
    Validator::new().validate(object)
}

/// Returns true if the object passes every rule.
pub fn is_valid(object: &StixObject) -> bool {
    Validator::new().fail_fast(true).validate(object).is_ok()
}

/// Collects violations during one validation pass.
#[derive(Debug)]
pub struct Checker {
    errors: Vec<ValidationError>,
    fail_fast: bool,
}

impl Checker {
    fn new(fail_fast: bool) -> Self {
        Self {
            errors: Vec::new(),
            fail_fast,
        }
    }

    /// Records a violation on `field`.
    pub fn fail(
        &mut self,
        field: impl Into<String>,
        rule: ValidationRule,
        detail: impl Into<String>,
    ) {
        if self.is_done() {
            return;
        }
        let field = field.into();
        let detail = detail.into();
        tracing::trace!(field = %field, rule = rule.code(), "validation rule failed: {detail}");
        self.errors.push(ValidationError { field, rule, detail });
    }

    /// Returns true once nothing more needs to be checked.
    pub fn is_done(&self) -> bool {
        self.fail_fast && !self.errors.is_empty()
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::from_vec(self.errors))
        }
    }
}

/// Walks an object's own fields.
pub trait CheckFields {
    fn check_fields(&self, checker: &mut Checker);
}

/// Checks one field value found at `path`.
pub trait FieldCheck {
    fn check_field(&self, path: &str, checker: &mut Checker);
}

macro_rules! unchecked_fields {
    ($($t:ty),* $(,)?) => {
        $(
            impl FieldCheck for $t {
                fn check_field(&self, _path: &str, _checker: &mut Checker) {}
            }
        )*
    };
}

unchecked_fields! {
    String,
    bool,
    i64,
    f64,
    Timestamp,
    serde_json::Value,
    BTreeMap<String, String>,
    BTreeMap<String, serde_json::Value>,
    WindowsRegistryValue,
}

impl<T: FieldCheck> FieldCheck for Option<T> {
    fn check_field(&self, path: &str, checker: &mut Checker) {
        if let Some(value) = self {
            value.check_field(path, checker);
        }
    }
}

impl<T: FieldCheck> FieldCheck for Vec<T> {
    fn check_field(&self, path: &str, checker: &mut Checker) {
        for (i, item) in self.iter().enumerate() {
            if checker.is_done() {
                return;
            }
            item.check_field(&format!("{path}[{i}]"), checker);
        }
    }
}

/// Empty identifiers are skipped; required-ness is a type-specific rule.
impl FieldCheck for Identifier {
    fn check_field(&self, path: &str, checker: &mut Checker) {
        if self.is_empty() {
            return;
        }
        match self.check() {
            Ok(kind) => rules::check_reference_kind(path, kind, checker),
            Err(e) => checker.fail(path, ValidationRule::MalformedIdentifier, e.to_string()),
        }
    }
}

impl FieldCheck for ExternalReference {
    fn check_field(&self, path: &str, checker: &mut Checker) {
        if self.is_empty() {
            checker.fail(
                path,
                ValidationRule::ExternalReferenceEmpty,
                "one of source_name, url, hashes or external_id is required",
            );
        }
    }
}

impl FieldCheck for GranularMarking {
    fn check_field(&self, path: &str, checker: &mut Checker) {
        let marking_path = format!("{path}.marking_ref");
        if self.marking_ref.is_empty() {
            checker.fail(marking_path, ValidationRule::RequiredField, "marking_ref is required");
        } else {
            self.marking_ref.check_field(&marking_path, checker);
        }

        if !self.lang.is_empty() {
            rules::check_lang(&format!("{path}.lang"), &self.lang, checker);
        }

        if self.selectors.is_empty() {
            checker.fail(
                format!("{path}.selectors"),
                ValidationRule::SelectorFormat,
                "at least one selector is required",
            );
        }
        for (i, selector) in self.selectors.iter().enumerate() {
            rules::check_selector(&format!("{path}.selectors[{i}]"), selector, checker);
        }
    }
}

impl FieldCheck for KillChainPhase {
    fn check_field(&self, path: &str, checker: &mut Checker) {
        if self.kill_chain_name.is_empty() {
            checker.fail(
                format!("{path}.kill_chain_name"),
                ValidationRule::RequiredField,
                "kill_chain_name is required",
            );
        }
        if self.phase_name.is_empty() {
            checker.fail(
                format!("{path}.phase_name"),
                ValidationRule::RequiredField,
                "phase_name is required",
            );
        }
    }
}
