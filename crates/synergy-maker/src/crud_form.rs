//! Vue edit forms projected from entity metadata.
//!
//! Unlike entity classes, forms are written once and never merged: an
//! existing form is either overwritten or left alone with a `-generated`
//! copy next to it.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;

use crate::codegen::naming::{lcfirst, to_kebab_case, ucfirst};
use crate::config::GeneratorConfig;
use crate::diagnostic::GeneratorError;
use crate::metadata::{short_class_name, BuiltinType, FieldDescriptor, MetadataSource};

/// `(field, ignore, disabled)` for fields owned by the base entity.
const PREDEFINED_ATTRIBUTES: &[(&str, bool, bool)] = &[
    ("id", true, true),
    ("createdAt", true, false),
    ("updatedAt", true, false),
    ("createdBy", true, false),
    ("updatedBy", true, false),
    ("entityName", true, false),
];

/// Everything the form template needs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrudFormData {
    /// `invoice`
    pub entity_name: String,
    /// `Invoice`
    pub entity_class: String,
    pub form_fields: Vec<FormField>,
    pub relations: Vec<FormRelation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub field_name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub field_class_name: Option<String>,
    pub translation_label: String,
    /// HTML input type, when the default text input does not fit.
    pub form_type: Option<String>,
    pub disabled: bool,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormRelation {
    pub field_name: String,
    /// `customer`
    pub entity_name: String,
    /// `Customer`
    pub entity_class: String,
    /// `sales-customer`
    pub field_name_kebab: String,
    /// `customerRepository`
    pub repository: String,
    /// `SpCustomerEditForm`
    pub edit_form_file: String,
    pub translation_label: String,
}

/// Where a form was written.
#[derive(Debug, Clone)]
pub struct FormReport {
    pub entity_type: String,
    pub path: PathBuf,
    /// An existing form was kept and the output went to a `-generated` file.
    pub redirected: bool,
}

pub struct CrudFormGenerator<'a> {
    config: &'a GeneratorConfig,
    metadata: &'a dyn MetadataSource,
    overwrite: bool,
}

impl<'a> CrudFormGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig, metadata: &'a dyn MetadataSource) -> Self {
        Self {
            config,
            metadata,
            overwrite: config.overwrite_forms,
        }
    }

    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }

    /// `SpInvoiceEditForm`
    pub fn edit_form_name(&self, short_name: &str) -> String {
        format!("{}{}EditForm", self.config.edit_form_prefix, ucfirst(short_name))
    }

    fn display_name(&self, entity_type: &str) -> String {
        self.metadata
            .display_name(entity_type)
            .unwrap_or_else(|| short_class_name(entity_type).to_string())
    }

    fn translation_label(&self, entity_class: &str, field: &str) -> String {
        format!("{}.entities.{}.fields.{}", self.config.translation_prefix, entity_class, field)
    }

    /// Projects the fields of `entity_type` into template data.
    pub fn data(&self, entity_type: &str) -> Result<CrudFormData, GeneratorError> {
        let entity_class = self.display_name(entity_type);
        let fields = self.metadata.describe_fields(entity_type)?;

        let mut form_fields = Vec::new();
        let mut relations = Vec::new();

        for field in &fields {
            if field.ignore || field.is_collection || field.builtin_type == BuiltinType::Array {
                continue;
            }
            let predefined = PREDEFINED_ATTRIBUTES.iter().find(|(name, _, _)| *name == field.name);
            if matches!(predefined, Some((_, true, _))) {
                continue;
            }
            let disabled = matches!(predefined, Some((_, _, true)));
            let translation_label = self.translation_label(&entity_class, &field.name);

            match field.relation_target_type.as_deref().map(str::trim) {
                Some(target) if !target.is_empty() => {
                    let related = self
                        .metadata
                        .display_name(target)
                        .ok_or_else(|| GeneratorError::UnresolvedDisplayName {
                            entity_type: target.to_string(),
                        })?;
                    relations.push(FormRelation {
                        field_name: field.name.clone(),
                        entity_name: lcfirst(&related),
                        entity_class: ucfirst(&related),
                        field_name_kebab: to_kebab_case(&related),
                        repository: format!("{}Repository", lcfirst(&related)),
                        edit_form_file: self.edit_form_name(&related),
                        translation_label,
                    });
                }
                _ => form_fields.push(FormField {
                    field_name: field.name.clone(),
                    field_type: field.builtin_type.to_string(),
                    field_class_name: field.class_name.clone(),
                    translation_label,
                    form_type: self.form_type(field).map(String::from),
                    disabled,
                    required: !field.is_nullable,
                }),
            }
        }

        Ok(CrudFormData {
            entity_name: lcfirst(&entity_class),
            entity_class,
            form_fields,
            relations,
        })
    }

    fn form_type(&self, field: &FieldDescriptor) -> Option<&'static str> {
        if let Some(class) = &field.class_name {
            if self.config.policy.is_date_class(class) {
                return Some("datetime-local");
            }
        }
        match field.builtin_type {
            BuiltinType::Int | BuiltinType::Float => Some("number"),
            BuiltinType::Date => Some("date"),
            BuiltinType::Bool => Some("checkbox"),
            _ => None,
        }
    }

    /// Import path of the entity classes as seen from the forms directory.
    fn entity_import_dir(&self) -> String {
        pathdiff::diff_paths(&self.config.out_dir, &self.config.forms_dir)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.config.out_dir.to_string_lossy().replace('\\', "/"))
    }

    /// Renders the Vue single-file component.
    pub fn render(&self, data: &CrudFormData) -> String {
        let entity_dir = self.entity_import_dir();
        let prefix = &self.config.snippet_prefix;
        let var = &data.entity_name;
        let mut out = String::new();

        // Script
        out.push_str("<script setup lang=\"ts\">\n");
        out.push_str("import { ref } from \"vue\";\n");
        if !data.relations.is_empty() {
            out.push_str(&format!(
                "import {{ useRepository }} from \"{}/repository\";\n",
                self.config.bundle_name.trim_end_matches('/')
            ));
        }
        out.push_str(&format!("import {} from \"{}/{}\";\n", data.entity_class, entity_dir, data.entity_class));
        let mut imported = vec![data.entity_class.clone()];
        for relation in &data.relations {
            if !imported.contains(&relation.entity_class) {
                out.push_str(&format!(
                    "import {} from \"{}/{}\";\n",
                    relation.entity_class, entity_dir, relation.entity_class
                ));
                imported.push(relation.entity_class.clone());
            }
            if !imported.contains(&relation.edit_form_file) {
                out.push_str(&format!(
                    "import {} from \"./{}.vue\";\n",
                    relation.edit_form_file, relation.edit_form_file
                ));
                imported.push(relation.edit_form_file.clone());
            }
        }
        out.push('\n');
        out.push_str(&format!("const props = defineProps<{{ entity: {} }}>();\n", data.entity_class));
        out.push_str(&format!(
            "const emit = defineEmits<{{ (e: \"save\", entity: {}): void; (e: \"cancel\"): void }}>();\n",
            data.entity_class
        ));
        out.push('\n');
        out.push_str(&format!("const {} = ref(props.entity);\n", var));
        let mut repositories = Vec::new();
        for relation in &data.relations {
            if !repositories.contains(&relation.repository) {
                out.push_str(&format!(
                    "const {} = useRepository({});\n",
                    relation.repository, relation.entity_class
                ));
                repositories.push(relation.repository.clone());
            }
        }
        out.push_str("</script>\n\n");

        // Template
        out.push_str("<template>\n");
        out.push_str(&format!("    <v-form @submit.prevent=\"emit('save', {})\">\n", var));
        for field in &data.form_fields {
            out.push_str(&render_field(var, field));
        }
        for relation in &data.relations {
            out.push_str(&format!("        <{}-entity-select\n", prefix));
            out.push_str(&format!("            v-model=\"{}.{}\"\n", var, relation.field_name));
            out.push_str(&format!("            entity-name=\"{}\"\n", relation.field_name_kebab));
            out.push_str(&format!("            :repository=\"{}\"\n", relation.repository));
            out.push_str(&format!("            :edit-form=\"{}\"\n", relation.edit_form_file));
            out.push_str(&format!("            :label=\"$t('{}')\"\n", relation.translation_label));
            out.push_str("        />\n");
        }
        out.push_str("        <v-btn type=\"submit\">{{ $t('");
        out.push_str(&self.config.translation_prefix);
        out.push_str(".actions.save') }}</v-btn>\n");
        out.push_str("        <v-btn variant=\"text\" @click=\"emit('cancel')\">{{ $t('");
        out.push_str(&self.config.translation_prefix);
        out.push_str(".actions.cancel') }}</v-btn>\n");
        out.push_str("    </v-form>\n");
        out.push_str("</template>\n");

        out
    }

    /// Writes the form of `entity_type` into the forms directory.
    pub fn generate(&self, entity_type: &str) -> Result<FormReport, GeneratorError> {
        let forms_dir = &self.config.forms_dir;
        std::fs::create_dir_all(forms_dir).map_err(|e| GeneratorError::io(forms_dir, e.to_string()))?;

        let data = self.data(entity_type)?;
        let mut path = forms_dir.join(format!("{}.vue", self.edit_form_name(&data.entity_class)));
        let mut redirected = false;
        if path.exists() {
            warn!("file already exists: {}", path.display());
            if !self.overwrite {
                path = generated_copy(&path);
                redirected = true;
                warn!("writing to {} instead", path.display());
            }
        }

        let content = self.render(&data);
        std::fs::write(&path, content).map_err(|e| GeneratorError::io(&path, e.to_string()))?;

        Ok(FormReport {
            entity_type: entity_type.to_string(),
            path,
            redirected,
        })
    }
}

/// `Form.vue` -> `Form.vue-generated`
fn generated_copy(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push("-generated");
    PathBuf::from(name)
}

fn render_field(var: &str, field: &FormField) -> String {
    let component = match field.form_type.as_deref() {
        Some("checkbox") => "v-checkbox",
        _ => "v-text-field",
    };
    let mut out = format!("        <{}\n", component);
    out.push_str(&format!("            v-model=\"{}.{}\"\n", var, field.field_name));
    out.push_str(&format!("            :label=\"$t('{}')\"\n", field.translation_label));
    if let Some(form_type) = field.form_type.as_deref().filter(|t| *t != "checkbox") {
        out.push_str(&format!("            type=\"{}\"\n", form_type));
    }
    if field.disabled {
        out.push_str("            disabled\n");
    }
    if field.required {
        out.push_str("            required\n");
    }
    out.push_str("        />\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::JsonMetadataSource;

    const EXPORT: &str = r#"{
        "entities": [
            {
                "class": "App\\Entity\\Invoice",
                "fields": [
                    { "name": "id", "type": "string" },
                    { "name": "createdAt", "type": "object", "className": "DateTimeImmutable" },
                    { "name": "amount", "type": "float" },
                    { "name": "paid", "type": "bool" },
                    { "name": "issuedAt", "type": "object", "className": "DateTimeImmutable" },
                    { "name": "note", "type": "string", "nullable": true },
                    { "name": "lines", "type": "object", "target": "App\\Entity\\Line", "collection": true },
                    { "name": "customer", "type": "object", "target": "App\\Entity\\SalesCustomer", "nullable": true }
                ]
            },
            { "class": "App\\Entity\\SalesCustomer", "fields": [] },
            { "class": "App\\Entity\\Line", "fields": [] }
        ]
    }"#;

    fn setup(dir: &tempfile::TempDir) -> (GeneratorConfig, JsonMetadataSource) {
        let config = GeneratorConfig {
            out_dir: dir.path().join("assets/entity"),
            forms_dir: dir.path().join("assets/components/form"),
            ..GeneratorConfig::default()
        };
        (config, JsonMetadataSource::from_json(EXPORT).unwrap())
    }

    #[test]
    fn test_form_data() {
        let dir = tempfile::tempdir().unwrap();
        let (config, metadata) = setup(&dir);
        let generator = CrudFormGenerator::new(&config, &metadata);

        let data = generator.data("App\\Entity\\Invoice").unwrap();
        assert_eq!(data.entity_name, "invoice");

        let names: Vec<_> = data.form_fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, vec!["amount", "paid", "issuedAt", "note"]);

        let types: Vec<_> = data.form_fields.iter().map(|f| f.form_type.as_deref()).collect();
        assert_eq!(types, vec![Some("number"), Some("checkbox"), Some("datetime-local"), None]);
        assert!(!data.form_fields[3].required);
        assert_eq!(data.form_fields[0].translation_label, "synergy.entities.Invoice.fields.amount");

        assert_eq!(data.relations.len(), 1);
        let relation = &data.relations[0];
        assert_eq!(relation.entity_name, "salesCustomer");
        assert_eq!(relation.field_name_kebab, "sales-customer");
        assert_eq!(relation.repository, "salesCustomerRepository");
        assert_eq!(relation.edit_form_file, "SpSalesCustomerEditForm");
    }

    #[test]
    fn test_render_imports_entities_relative_to_forms() {
        let dir = tempfile::tempdir().unwrap();
        let (config, metadata) = setup(&dir);
        let generator = CrudFormGenerator::new(&config, &metadata);

        let content = generator.render(&generator.data("App\\Entity\\Invoice").unwrap());
        assert!(content.contains("import Invoice from \"../../entity/Invoice\";"));
        assert!(content.contains("import SpSalesCustomerEditForm from \"./SpSalesCustomerEditForm.vue\";"));
        assert!(content.contains("<synergy-entity-select"));
        assert!(content.contains("v-model=\"invoice.amount\""));
    }

    #[test]
    fn test_existing_form_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let (config, metadata) = setup(&dir);
        let generator = CrudFormGenerator::new(&config, &metadata);

        let first = generator.generate("App\\Entity\\Invoice").unwrap();
        assert!(!first.redirected);
        assert!(first.path.ends_with("SpInvoiceEditForm.vue"));
        std::fs::write(&first.path, "custom").unwrap();

        let second = generator.generate("App\\Entity\\Invoice").unwrap();
        assert!(second.redirected);
        assert!(second.path.to_string_lossy().ends_with("SpInvoiceEditForm.vue-generated"));
        assert_eq!(std::fs::read_to_string(&first.path).unwrap(), "custom");
    }

    #[test]
    fn test_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let (config, metadata) = setup(&dir);
        let mut generator = CrudFormGenerator::new(&config, &metadata);
        generator.set_overwrite(true);

        let first = generator.generate("App\\Entity\\Invoice").unwrap();
        std::fs::write(&first.path, "custom").unwrap();
        let second = generator.generate("App\\Entity\\Invoice").unwrap();
        assert!(!second.redirected);
        assert_ne!(std::fs::read_to_string(&second.path).unwrap(), "custom");
    }
}
