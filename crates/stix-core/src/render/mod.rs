//! Human-readable rendering of objects.
//!
//! Output is indented `key: value` text for inspection only; it is not meant
//! to be parsed back. Fields appear in declaration order with the identity
//! envelope and the shared block first. Empty values are omitted.
//!
//! ```text
//! type: relationship
//! id: relationship--44af6c39-c09b-49c5-9de2-394224b04982
//! spec_version: 2.1
//! created: 2016-04-06T20:06:37Z
//! relationship_type: uses
//! ```

use std::collections::BTreeMap;
use std::fmt::{Display, Write};

use serde_json::Value;

use crate::model::{
    BaseIdentity, Blank, DomainCommon, ExternalReference, GranularMarking, Identifier,
    KillChainPhase, ObservableCommon, RelationshipCommon, StixObject, Timestamp,
    WindowsRegistryValue,
};
use crate::util::indent;

/// Renders `object` starting at `indent_level`.
pub fn render(object: &StixObject, indent_level: usize) -> String {
    let mut out = Renderer::new(indent_level);
    object.render_fields(&mut out);
    out.finish()
}

/// Accumulates indented output.
#[derive(Debug)]
pub struct Renderer {
    out: String,
    level: usize,
}

impl Renderer {
    pub fn new(level: usize) -> Self {
        Self {
            out: String::new(),
            level,
        }
    }

    /// Writes `key: value` at the current level.
    pub fn line(&mut self, key: &str, value: impl Display) {
        // Writing into a String cannot fail.
        let _ = writeln!(self.out, "{}{key}: {value}", indent(self.level));
    }

    /// Writes a `- value` list item at the current level.
    pub fn item(&mut self, value: impl Display) {
        let _ = writeln!(self.out, "{}- {value}", indent(self.level));
    }

    /// Writes `key:` and renders `body` one level deeper.
    pub fn section(&mut self, key: &str, body: impl FnOnce(&mut Renderer)) {
        let _ = writeln!(self.out, "{}{key}:", indent(self.level));
        self.level += 1;
        body(self);
        self.level -= 1;
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// A record rendered as a sequence of fields.
pub trait Render {
    fn render(&self, out: &mut Renderer);
}

/// A field value rendered under `key`.
pub trait RenderField {
    fn render_field(&self, key: &str, out: &mut Renderer);
}

/// An element of a list field.
pub trait RenderItem {
    fn render_item(&self, index: usize, out: &mut Renderer);
}

macro_rules! scalar_fields {
    ($($t:ty),* $(,)?) => {
        $(
            impl RenderField for $t {
                fn render_field(&self, key: &str, out: &mut Renderer) {
                    if !self.is_blank() {
                        out.line(key, self);
                    }
                }
            }
        )*
    };
}

scalar_fields! {
    String,
    bool,
    i64,
    Identifier,
    Timestamp,
}

/// Present optional values are rendered even when zero.
impl<T: Display> RenderField for Option<T> {
    fn render_field(&self, key: &str, out: &mut Renderer) {
        if let Some(value) = self {
            out.line(key, value);
        }
    }
}

impl<T: RenderItem> RenderField for Vec<T> {
    fn render_field(&self, key: &str, out: &mut Renderer) {
        if self.is_empty() {
            return;
        }
        out.section(key, |out| {
            for (i, item) in self.iter().enumerate() {
                item.render_item(i, out);
            }
        });
    }
}

impl RenderField for BTreeMap<String, String> {
    fn render_field(&self, key: &str, out: &mut Renderer) {
        if self.is_empty() {
            return;
        }
        out.section(key, |out| {
            for (k, v) in self {
                out.line(k, v);
            }
        });
    }
}

impl RenderField for BTreeMap<String, Value> {
    fn render_field(&self, key: &str, out: &mut Renderer) {
        if self.is_empty() {
            return;
        }
        out.section(key, |out| {
            for (k, v) in self {
                v.render_field(k, out);
            }
        });
    }
}

impl RenderField for Value {
    fn render_field(&self, key: &str, out: &mut Renderer) {
        match self {
            Value::Null => {}
            Value::String(s) => out.line(key, s),
            Value::Bool(_) | Value::Number(_) => out.line(key, self),
            Value::Array(items) => out.section(key, |out| {
                for (i, item) in items.iter().enumerate() {
                    item.render_item(i, out);
                }
            }),
            Value::Object(map) => out.section(key, |out| {
                for (k, v) in map {
                    v.render_field(k, out);
                }
            }),
        }
    }
}

impl RenderItem for String {
    fn render_item(&self, _index: usize, out: &mut Renderer) {
        out.item(self);
    }
}

impl RenderItem for Identifier {
    fn render_item(&self, _index: usize, out: &mut Renderer) {
        out.item(self);
    }
}

impl RenderItem for Value {
    fn render_item(&self, index: usize, out: &mut Renderer) {
        match self {
            Value::String(s) => out.item(s),
            Value::Array(_) | Value::Object(_) => self.render_field(&format!("[{index}]"), out),
            _ => out.item(self),
        }
    }
}

macro_rules! record_items {
    ($($t:ty),* $(,)?) => {
        $(
            impl RenderItem for $t {
                fn render_item(&self, index: usize, out: &mut Renderer) {
                    out.section(&format!("[{index}]"), |out| self.render(out));
                }
            }
        )*
    };
}

record_items! {
    ExternalReference,
    GranularMarking,
    KillChainPhase,
    WindowsRegistryValue,
}

impl Render for BaseIdentity {
    fn render(&self, out: &mut Renderer) {
        out.line("type", self.kind());
        self.id().render_field("id", out);
    }
}

impl Render for DomainCommon {
    fn render(&self, out: &mut Renderer) {
        out.line("spec_version", &self.spec_version);
        self.created.render_field("created", out);
        self.modified.render_field("modified", out);
        self.created_by_ref.render_field("created_by_ref", out);
        self.revoked.render_field("revoked", out);
        self.labels.render_field("labels", out);
        self.confidence.render_field("confidence", out);
        self.lang.render_field("lang", out);
        self.external_references.render_field("external_references", out);
        self.object_marking_refs.render_field("object_marking_refs", out);
        self.granular_markings.render_field("granular_markings", out);
        self.extensions.render_field("extensions", out);
        self.defanged.render_field("defanged", out);
    }
}

impl Render for ObservableCommon {
    fn render(&self, out: &mut Renderer) {
        out.line("spec_version", &self.spec_version);
        self.object_marking_refs.render_field("object_marking_refs", out);
        self.granular_markings.render_field("granular_markings", out);
        self.defanged.render_field("defanged", out);
        self.extensions.render_field("extensions", out);
    }
}

impl Render for RelationshipCommon {
    fn render(&self, out: &mut Renderer) {
        out.line("spec_version", &self.spec_version);
        self.created.render_field("created", out);
        self.modified.render_field("modified", out);
    }
}

impl Render for ExternalReference {
    fn render(&self, out: &mut Renderer) {
        self.source_name.render_field("source_name", out);
        self.description.render_field("description", out);
        self.url.render_field("url", out);
        self.hashes.render_field("hashes", out);
        self.external_id.render_field("external_id", out);
    }
}

impl Render for GranularMarking {
    fn render(&self, out: &mut Renderer) {
        self.lang.render_field("lang", out);
        self.marking_ref.render_field("marking_ref", out);
        self.selectors.render_field("selectors", out);
    }
}

impl Render for KillChainPhase {
    fn render(&self, out: &mut Renderer) {
        self.kill_chain_name.render_field("kill_chain_name", out);
        self.phase_name.render_field("phase_name", out);
    }
}

impl Render for WindowsRegistryValue {
    fn render(&self, out: &mut Renderer) {
        self.name.render_field("name", out);
        self.data.render_field("data", out);
        self.data_type.render_field("data_type", out);
    }
}
