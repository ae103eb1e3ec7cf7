//! TypeScript text for synthesized members, imports and class headers.

use crate::extract::ImportEntry;
use crate::merge::{HeaderRewrite, SynthesizedMember};

/// Renders a member as lines relative to its slot indentation.
///
/// Properties are a single line. Accessors are a block followed by an empty
/// line so consecutive blocks stay separated.
pub fn render_member(member: &SynthesizedMember) -> Vec<String> {
    match member {
        SynthesizedMember::ScalarProperty {
            name,
            ts_type,
            nullable,
            default_literal,
        } => {
            let ts_type = if *nullable {
                format!("{} | null", ts_type)
            } else {
                ts_type.clone()
            };
            vec![format!("public {}: {} = {};", name, ts_type, default_literal)]
        }
        SynthesizedMember::RelationIdProperty { name, .. } => {
            vec![format!("public {}: string | null = null;", name)]
        }
        SynthesizedMember::BackingField { name, target_type } => {
            vec![format!("private {}: {} | null = null;", name, target_type)]
        }
        SynthesizedMember::RelationAccessor {
            name,
            backing_private_name,
            target_type,
            id_property,
        } => vec![
            format!("public get {}(): {} | null {{", name, target_type),
            format!(
                "    return this.{} ??= this.getRelation({}, this.{});",
                backing_private_name, target_type, id_property
            ),
            "}".to_string(),
            String::new(),
        ],
        SynthesizedMember::Setter {
            name,
            backing_private_name,
            target_type,
            additional_resets,
        } => {
            let mut lines = vec![format!("public set {}(value: {} | null) {{", name, target_type)];
            for (property, expression) in additional_resets {
                lines.push(format!("    this.{} = {};", property, expression));
            }
            lines.push(format!("    this.{} = null;", backing_private_name));
            lines.push("}".to_string());
            lines.push(String::new());
            lines
        }
    }
}

/// `import [type] Default, { a, b } from "path";`
pub fn render_import(path: &str, entry: &ImportEntry) -> String {
    let mut clause = Vec::new();
    if let Some(default) = &entry.default {
        clause.push(default.clone());
    }
    if let Some(namespace) = &entry.namespace {
        clause.push(format!("* as {}", namespace));
    } else if !entry.named.is_empty() {
        clause.push(format!("{{ {} }}", entry.named.join(", ")));
    }

    let keyword = if entry.type_only { "import type" } else { "import" };
    if clause.is_empty() {
        format!("{} \"{}\";", keyword, path)
    } else {
        format!("{} {} from \"{}\";", keyword, clause.join(", "), path)
    }
}

/// ` extends Base implements A, B {`, the part of the header after the class
/// name and its type parameters.
pub fn render_header(header: &HeaderRewrite) -> String {
    let mut out = String::new();
    if let Some(extends) = &header.extends {
        out.push_str(&format!(" extends {}", extends));
    }
    if !header.implements.is_empty() {
        out.push_str(&format!(" implements {}", header.implements.join(", ")));
    }
    out.push_str(" {");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Span;

    #[test]
    fn test_properties() {
        let member = SynthesizedMember::ScalarProperty {
            name: "amount".to_string(),
            ts_type: "number".to_string(),
            nullable: false,
            default_literal: "0".to_string(),
        };
        assert_eq!(render_member(&member), vec!["public amount: number = 0;"]);

        let member = SynthesizedMember::ScalarProperty {
            name: "note".to_string(),
            ts_type: "string".to_string(),
            nullable: true,
            default_literal: "null".to_string(),
        };
        assert_eq!(render_member(&member), vec!["public note: string | null = null;"]);

        let member = SynthesizedMember::BackingField {
            name: "_customer".to_string(),
            target_type: "Customer".to_string(),
        };
        assert_eq!(render_member(&member), vec!["private _customer: Customer | null = null;"]);
    }

    #[test]
    fn test_accessors() {
        let getter = SynthesizedMember::RelationAccessor {
            name: "customer".to_string(),
            backing_private_name: "_customer".to_string(),
            target_type: "Customer".to_string(),
            id_property: "customerId".to_string(),
        };
        assert_eq!(
            render_member(&getter).join("\n"),
            "public get customer(): Customer | null {\n    return this._customer ??= this.getRelation(Customer, this.customerId);\n}\n"
        );

        let setter = SynthesizedMember::Setter {
            name: "customer".to_string(),
            backing_private_name: "_customer".to_string(),
            target_type: "Customer".to_string(),
            additional_resets: vec![("customerId".to_string(), "value?.id ?? null".to_string())],
        };
        assert_eq!(
            render_member(&setter).join("\n"),
            "public set customer(value: Customer | null) {\n    this.customerId = value?.id ?? null;\n    this._customer = null;\n}\n"
        );
    }

    #[test]
    fn test_imports() {
        assert_eq!(
            render_import("./Customer", &ImportEntry::default_import("Customer")),
            "import Customer from \"./Customer\";"
        );

        let mut entry = ImportEntry::named(["Repository", "Finder as Find"]);
        entry.default = Some("Manager".to_string());
        entry.type_only = true;
        assert_eq!(
            render_import("../repository", &entry),
            "import type Manager, { Repository, Finder as Find } from \"../repository\";"
        );

        let entry = ImportEntry {
            namespace: Some("Mixins".to_string()),
            ..ImportEntry::default()
        };
        assert_eq!(render_import("../mixins", &entry), "import * as Mixins from \"../mixins\";");
    }

    #[test]
    fn test_header() {
        let header = HeaderRewrite {
            class_name: "Invoice".to_string(),
            extends: Some("ScheduledEventEntity".to_string()),
            implements: vec!["Auditable".to_string(), "Printable".to_string()],
            span: Span::new(0, 0, 0),
        };
        assert_eq!(
            render_header(&header),
            " extends ScheduledEventEntity implements Auditable, Printable {"
        );

        let bare = HeaderRewrite {
            extends: None,
            implements: Vec::new(),
            ..header
        };
        assert_eq!(render_header(&bare), " {");
    }
}
