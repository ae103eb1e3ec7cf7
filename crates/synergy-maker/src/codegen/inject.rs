//! Marker-based injection of a merge plan into file text.

use tracing::trace;

use crate::diagnostic::{GeneratorError, Span};
use crate::merge::{MergePlan, Placement, Slot};
use super::members::{render_header, render_import, render_member};

/// File text with the three insertion slots.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn has_marker(&self, slot: Slot) -> bool {
        self.text.split('\n').any(|line| line.contains(slot.marker()))
    }

    /// Fails on the first slot in `slots` without a marker line.
    pub fn require_markers(&self, slots: impl IntoIterator<Item = Slot>) -> Result<(), GeneratorError> {
        for slot in slots {
            if !self.has_marker(slot) {
                return Err(GeneratorError::MarkerMissing {
                    marker: slot.marker().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Applies span replacements, last span first so earlier offsets stay valid.
    pub fn replace_spans(&mut self, mut replacements: Vec<(Span, String)>) {
        replacements.sort_by(|a, b| b.0.start.cmp(&a.0.start));
        for (span, text) in replacements {
            trace!("replacing bytes {}..{}", span.start, span.end);
            self.text.replace_range(span.range(), &text);
        }
    }

    /// Inserts `lines` right above the first line carrying the slot marker,
    /// indented for the slot and ended the way the marker line is.
    pub fn insert_before_marker(&mut self, slot: Slot, lines: &[String]) -> Result<(), GeneratorError> {
        if lines.is_empty() {
            return Ok(());
        }

        let mut file_lines: Vec<&str> = self.text.split('\n').collect();
        let index = file_lines
            .iter()
            .position(|line| line.contains(slot.marker()))
            .ok_or_else(|| GeneratorError::MarkerMissing {
                marker: slot.marker().to_string(),
            })?;

        let cr = if file_lines[index].ends_with('\r') { "\r" } else { "" };
        let indented: Vec<String> = lines
            .iter()
            .map(|line| {
                if line.is_empty() {
                    cr.to_string()
                } else {
                    format!("{}{}{}", slot.indent(), line, cr)
                }
            })
            .collect();

        file_lines.splice(index..index, indented.iter().map(String::as_str));
        self.text = file_lines.join("\n");
        Ok(())
    }
}

/// Applies `plan` to `source`.
///
/// Every marker the plan needs is checked before anything is touched, so a
/// missing marker leaves the text as it was.
pub fn inject(source: &str, plan: &MergePlan) -> Result<String, GeneratorError> {
    if plan.is_empty() {
        return Ok(source.to_string());
    }

    let mut buffer = TextBuffer::new(source);
    buffer.require_markers(plan.required_slots())?;

    let mut replacements = Vec::new();
    if let Some(header) = &plan.header {
        replacements.push((header.span, render_header(header)));
    }
    for change in &plan.imports {
        if let Placement::Replace(span) = change.placement {
            replacements.push((span, render_import(&change.path, &change.entry)));
        }
    }
    for planned in &plan.members {
        if let Placement::Replace(span) = planned.placement {
            replacements.push((span, render_member(&planned.member).join("\n")));
        }
    }
    buffer.replace_spans(replacements);

    let import_lines: Vec<String> = plan
        .imports
        .iter()
        .filter(|change| change.placement == Placement::Slot)
        .map(|change| render_import(&change.path, &change.entry))
        .collect();
    buffer.insert_before_marker(Slot::Imports, &import_lines)?;

    for slot in [Slot::Properties, Slot::Methods] {
        let lines: Vec<String> = plan
            .members
            .iter()
            .filter(|planned| planned.placement == Placement::Slot && planned.member.slot() == slot)
            .flat_map(|planned| render_member(&planned.member))
            .collect();
        buffer.insert_before_marker(slot, &lines)?;
    }

    Ok(buffer.into_string())
}
