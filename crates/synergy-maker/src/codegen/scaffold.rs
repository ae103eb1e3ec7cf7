//! Initial content of a generated file.

use crate::config::GeneratorConfig;

/// Inputs available to a scaffold template.
#[derive(Debug, Clone, Copy)]
pub struct ScaffoldContext<'a> {
    /// Fully-qualified entity type.
    pub class_name: &'a str,
    pub short_name: &'a str,
    pub config: &'a GeneratorConfig,
}

/// Renders the first version of an entity file.
///
/// The output must contain the three slot markers and a class declaration
/// named after `short_name`.
pub trait ScaffoldTemplate {
    fn render(&self, ctx: &ScaffoldContext<'_>) -> String;
}

/// Entity class extending the runtime `Entity` base.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultScaffold;

impl ScaffoldTemplate for DefaultScaffold {
    fn render(&self, ctx: &ScaffoldContext<'_>) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "import Entity from \"{}/entity/Entity\";\n",
            ctx.config.bundle_name.trim_end_matches('/')
        ));
        out.push_str("// --imports--\n\n");

        out.push_str("/**\n");
        out.push_str(&format!(" * {}\n", ctx.class_name));
        out.push_str(" *\n");
        out.push_str(" * Members are added above the markers by synergy-maker. Everything else\n");
        out.push_str(" * in this file is yours; comment a generated member out to have it\n");
        out.push_str(" * regenerated on the next run.\n");
        out.push_str(" */\n");

        out.push_str(&format!("export default class {} extends Entity {{\n", ctx.short_name));
        out.push_str("    // ---properties---\n\n");
        out.push_str("    // ---methods---\n");
        out.push_str("}\n");

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::extract::Extractor;
    use crate::merge::Slot;

    #[test]
    fn test_default_scaffold() {
        let config = GeneratorConfig::default();
        let ctx = ScaffoldContext {
            class_name: "App\\Entity\\Invoice",
            short_name: "Invoice",
            config: &config,
        };
        let text = DefaultScaffold.render(&ctx);

        for slot in Slot::ALL {
            assert_eq!(text.matches(slot.marker()).count(), 1, "{}", slot.marker());
        }
        assert!(text.contains("import Entity from \"@synergy/runtime/entity/Entity\";"));

        let model = Extractor::new().unwrap().extract(&text, Path::new("Invoice.ts")).unwrap();
        let header = model.class("Invoice").unwrap();
        assert_eq!(header.extends.as_deref(), Some("Entity"));
        assert!(model.properties.is_empty());
    }
}
