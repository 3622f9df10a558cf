//! Output templates with named slots.
//!
//! Every piece of generated text goes through a [`Template`], so the exact
//! shape of the emitted C and `.def` files is defined in one place. Slots
//! are written `{name}`; `{{` and `}}` produce literal braces. Slot names
//! are checked when a template is parsed and every slot must be filled when
//! it is rendered.

use super::errors::{BridgeError, Result};

const WRAPPER: &str = "{export} {return_type} {declarator}({params}) {{{body}}}";
const SOURCE_HEADER: &str = "#include <{umbrella}>\n\n";
const DEF_HEADER: &str = "LIBRARY {library}\nEXPORTS\n";
const DEF_ENTRY: &str = "    {original} = {bridge}\n";

/// Supplies values for a template's slots.
pub trait SlotValues {
    fn get(&self, slot: &str) -> Option<&str>;
}

impl SlotValues for [(&str, &str)] {
    fn get(&self, slot: &str) -> Option<&str> {
        self.iter().find(|(name, _)| *name == slot).map(|(_, value)| *value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(String),
}

/// A parsed template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `text`, accepting only the slot names in `allowed`.
    pub fn parse(name: &str, text: &str, allowed: &[&str]) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut slot = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => slot.push(c),
                            None => {
                                return Err(BridgeError::template(name, "unterminated slot"))
                            }
                        }
                    }
                    if !allowed.contains(&slot.as_str()) {
                        return Err(BridgeError::template(
                            name,
                            format!("unknown slot `{}`", slot),
                        ));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(slot));
                }
                '}' => return Err(BridgeError::template(name, "unmatched `}`")),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Template {
            name: name.to_string(),
            segments,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fill every slot from `values`.
    pub fn render<V: SlotValues + ?Sized>(&self, values: &V) -> Result<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(slot) => {
                    let value = values.get(slot).ok_or_else(|| {
                        BridgeError::template(&self.name, format!("missing value for `{}`", slot))
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// Slots of a single wrapper definition.
#[derive(Debug, Clone, Copy)]
pub struct WrapperSlots<'a> {
    pub return_type: &'a str,
    /// Wrapper name including any pointer marker (`*vips_foo_bridge`)
    pub declarator: &'a str,
    pub params: &'a str,
    pub body: &'a str,
}

/// The full set of templates used to emit a bridge module.
#[derive(Debug, Clone)]
pub struct BridgeTemplates {
    export_marker: String,
    wrapper: Template,
    source_header: Template,
    def_header: Template,
    def_entry: Template,
}

impl BridgeTemplates {
    /// Stock templates with the given platform export marker.
    pub fn new(export_marker: impl Into<String>) -> Result<Self> {
        Ok(BridgeTemplates {
            export_marker: export_marker.into(),
            wrapper: Template::parse(
                "wrapper",
                WRAPPER,
                &["export", "return_type", "declarator", "params", "body"],
            )?,
            source_header: Template::parse("source_header", SOURCE_HEADER, &["umbrella"])?,
            def_header: Template::parse("def_header", DEF_HEADER, &["library"])?,
            def_entry: Template::parse("def_entry", DEF_ENTRY, &["original", "bridge"])?,
        })
    }

    /// `__declspec(dllexport) int vips_init_bridge(...) {return vips_init(...);}`
    pub fn wrapper(&self, slots: WrapperSlots<'_>) -> Result<String> {
        self.wrapper.render(&[
            ("export", self.export_marker.as_str()),
            ("return_type", slots.return_type),
            ("declarator", slots.declarator),
            ("params", slots.params),
            ("body", slots.body),
        ][..])
    }

    /// `#include <vips/vips.h>` followed by a blank line.
    pub fn source_header(&self, umbrella: &str) -> Result<String> {
        self.source_header.render(&[("umbrella", umbrella)][..])
    }

    /// `LIBRARY` and `EXPORTS` lines of the definition file.
    pub fn def_header(&self, library: &str) -> Result<String> {
        self.def_header.render(&[("library", library)][..])
    }

    /// One `original = bridge` export line.
    pub fn def_entry(&self, original: &str, bridge: &str) -> Result<String> {
        self.def_entry
            .render(&[("original", original), ("bridge", bridge)][..])
    }
}
