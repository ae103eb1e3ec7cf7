//! TypeScript structural parser using tree-sitter.

use std::path::Path;
use tree_sitter::{Node, Parser};
use tracing::debug;

use crate::diagnostic::{GeneratorError, Span};
use super::model::*;

/// TypeScript parser producing a [`StructuralModel`].
pub struct TypeScriptParser {
    parser: Parser,
}

impl TypeScriptParser {
    /// Creates a new TypeScript parser.
    pub fn new() -> Result<Self, GeneratorError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
            .map_err(|_| GeneratorError::ParserInitFailed)?;
        Ok(Self { parser })
    }

    /// Parses a generated file.
    ///
    /// tree-sitter recovers from syntax errors; declarations it loses inside a
    /// broken region are picked up again by [`scan_lines`].
    pub fn parse(&mut self, source: &str, path: &Path) -> Result<StructuralModel, GeneratorError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| GeneratorError::ParseFailed { path: path.to_path_buf() })?;

        let mut visitor = Visitor::new(source);
        visitor.visit(tree.root_node());
        let mut model = visitor.model;

        // A half-commented member (say, only the first line of a getter) can
        // close the class body early and push later members into ERROR nodes.
        if tree.root_node().has_error() {
            debug!("syntax errors in {}, scanning lines", path.display());
            scan_lines(source, &mut model);
        }
        Ok(model)
    }
}

/// Line-anchored pass: a member counts when its declaration starts a line
/// that is not a comment. Adds to what the tree walk found, never removes.
fn scan_lines(source: &str, model: &mut StructuralModel) {
    let mut offset = 0;
    for (row, line) in source.split_inclusive('\n').enumerate() {
        let start = offset;
        offset += line.len();

        let content = line.trim_end_matches(['\r', '\n']);
        let body = content.trim_start();
        if body.starts_with("//") || body.starts_with("/*") || body.starts_with('*') {
            continue;
        }
        let body_start = start + (content.len() - body.len());

        let (visibility, rest) = split_visibility(body);
        let rest = rest.strip_prefix("static ").map(str::trim_start).unwrap_or(rest);

        if let Some((accessor, rest)) = rest.split_once(char::is_whitespace) {
            if matches!(accessor, "get" | "set") {
                let name = leading_identifier(rest.trim_start());
                if !name.is_empty() && rest.trim_start()[name.len()..].trim_start().starts_with('(') {
                    let set = if accessor == "get" { &mut model.getters } else { &mut model.setters };
                    if set.insert(name.to_string()) {
                        debug!("{}ter found on line {} : {}", accessor, row + 1, name);
                    }
                    continue;
                }
            }
        }

        let Some(visibility) = visibility else {
            continue;
        };
        let rest = rest.strip_prefix("readonly ").map(str::trim_start).unwrap_or(rest);
        let name = leading_identifier(rest);
        let after = rest[name.len()..].trim_start();
        if name.is_empty() || !after.starts_with([':', '=', ';', '?', '!']) {
            continue;
        }

        let end = match body.find(';') {
            Some(semicolon) => body_start + semicolon + 1,
            None => body_start + body.len(),
        };
        model.properties.entry(name.to_string()).or_insert(PropertyDecl {
            name: name.to_string(),
            visibility,
            span: Span::new(body_start, end, row),
        });
    }
}

fn split_visibility(body: &str) -> (Option<Visibility>, &str) {
    match body.split_once(char::is_whitespace) {
        Some((word, rest)) => match Visibility::parse(word) {
            Some(visibility) => (Some(visibility), rest.trim_start()),
            None => (None, body),
        },
        None => (None, body),
    }
}

fn leading_identifier(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_' || *c == '$'))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[..end]
}

/// Walks the whole tree, recording declarations wherever they appear.
struct Visitor<'a> {
    source: &'a str,
    model: StructuralModel,
}

impl<'a> Visitor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            model: StructuralModel::default(),
        }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn visit(&mut self, node: Node) {
        match node.kind() {
            "comment" => return,
            "import_statement" => {
                self.visit_import(node);
                return;
            }
            "public_field_definition" | "field_definition" => self.visit_property(node),
            "method_definition" => self.visit_method(node),
            "class_declaration" | "abstract_class_declaration" => self.visit_class(node),
            "class" if node.is_named() => self.visit_class(node),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(child);
        }
    }

    fn visit_property(&mut self, node: Node) {
        let mut visibility = None;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "accessibility_modifier" {
                visibility = Visibility::parse(self.node_text(child));
            }
        }

        // Only visibility-qualified declarations count.
        let Some(visibility) = visibility else {
            return;
        };
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.node_text(name_node).to_string();

        // The terminating `;` is a sibling in the class body.
        let end = match node.next_sibling() {
            Some(next) if next.kind() == ";" => next.end_byte(),
            _ => node.end_byte(),
        };

        self.model.properties.entry(name.clone()).or_insert(PropertyDecl {
            name,
            visibility,
            span: Span::new(node.start_byte(), end, node.start_position().row),
        });
    }

    fn visit_method(&mut self, node: Node) {
        let mut accessor = None;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if !child.is_named() && matches!(child.kind(), "get" | "set") {
                accessor = Some(child.kind());
            }
        }

        let Some(accessor) = accessor else {
            return;
        };
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.node_text(name_node).to_string();

        if accessor == "get" {
            self.model.getters.insert(name);
        } else {
            self.model.setters.insert(name);
        }
    }

    fn visit_import(&mut self, node: Node) {
        let Some(source_node) = node.child_by_field_name("source") else {
            return;
        };
        let path = self
            .node_text(source_node)
            .trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .to_string();

        let mut entry = ImportEntry::default();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "type" if !child.is_named() => entry.type_only = true,
                "import_clause" => self.visit_import_clause(child, &mut entry),
                _ => {}
            }
        }

        self.model.imports.entry(path.clone()).or_insert(ImportDecl {
            path,
            entry,
            span: Span::new(node.start_byte(), node.end_byte(), node.start_position().row),
        });
    }

    fn visit_import_clause(&self, node: Node, entry: &mut ImportEntry) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "identifier" => {
                    entry.default = Some(self.node_text(child).to_string());
                }
                "namespace_import" => {
                    let mut inner_cursor = child.walk();
                    for inner in child.children(&mut inner_cursor) {
                        if inner.kind() == "identifier" {
                            entry.namespace = Some(self.node_text(inner).to_string());
                        }
                    }
                }
                "named_imports" => {
                    let mut inner_cursor = child.walk();
                    for spec in child.children(&mut inner_cursor) {
                        if spec.kind() == "import_specifier" {
                            let text = self.node_text(spec).split_whitespace().collect::<Vec<_>>().join(" ");
                            if !entry.named.contains(&text) {
                                entry.named.push(text);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_class(&mut self, node: Node) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let name = self.node_text(name_node).to_string();

        let mut extends = None;
        let mut implements = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "class_heritage" => self.visit_heritage(child, &mut extends, &mut implements),
                _ => {}
            }
        }

        // Everything up to the name and its type parameters stays as written.
        let kept = node.child_by_field_name("type_parameters").unwrap_or(name_node);
        let header = ClassHeader {
            name: name.clone(),
            extends,
            implements,
            span: Span::new(kept.end_byte(), body.start_byte() + 1, kept.end_position().row),
        };
        self.model.classes.entry(name).or_insert(header);
    }

    fn visit_heritage(&self, node: Node, extends: &mut Option<String>, implements: &mut Vec<String>) {
        let mut saw_extends_keyword = false;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "extends_clause" => {
                    if let Some(value) = child.child_by_field_name("value") {
                        let text = &self.source[value.start_byte()..child.end_byte()];
                        *extends = Some(text.trim().to_string());
                    }
                }
                "implements_clause" => {
                    let mut inner_cursor = child.walk();
                    for ty in child.named_children(&mut inner_cursor) {
                        let text = self.node_text(ty).trim().to_string();
                        if !text.is_empty() && !implements.contains(&text) {
                            implements.push(text);
                        }
                    }
                }
                "extends" if !child.is_named() => saw_extends_keyword = true,
                _ if saw_extends_keyword && child.is_named() && extends.is_none() => {
                    // Plain JavaScript heritage: `extends <expression>`.
                    *extends = Some(self.node_text(child).trim().to_string());
                }
                _ => {}
            }
        }
    }
}
