//! Handler scaffolds rendered from a user template

use handlebars::Handlebars;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::output::writer::{backup_path, module_name};
use crate::utils::naming::{receiver_name, table_kebab};

/// Values available to a scaffold template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldContext {
    pub project: String,
    pub package: String,
    pub struct_name: String,
    pub receiver: String,
    pub table_name: String,
    pub table_kebab: String,
    pub table_note: String,
}

impl ScaffoldContext {
    pub fn new(project: &str, package: &str, struct_name: &str, table: &str, note: &str) -> Self {
        Self {
            project: project.to_string(),
            package: package.to_string(),
            struct_name: struct_name.to_string(),
            receiver: receiver_name(struct_name),
            table_name: table.to_string(),
            table_kebab: table_kebab(table),
            table_note: note.to_string(),
        }
    }
}

/// Render template text. Unknown slots are an error.
pub fn render_scaffold(template: &str, context: &ScaffoldContext) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars.set_strict_mode(true);

    Ok(handlebars.render_template(template, context)?)
}

/// `<target>/<project>/handler/<table>_handler.rs`
pub fn scaffold_path(target: &Path, project: &str, table: &str) -> PathBuf {
    target
        .join(project)
        .join("handler")
        .join(format!("{}_handler.rs", module_name(table)))
}

/// Render the template file and write the handler, keeping a `.bak` of
/// the previous one
pub fn write_scaffold(template_path: &Path, target: &Path, context: &ScaffoldContext) -> Result<PathBuf> {
    let template = fs::read_to_string(template_path)?;
    let text = render_scaffold(&template, context)?;

    let path = scaffold_path(target, &context.project, &context.table_name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    if path.exists() {
        fs::copy(&path, backup_path(&path))?;
    }
    fs::write(&path, text)?;

    tracing::info!(path = %path.display(), "wrote scaffold");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context() -> ScaffoldContext {
        ScaffoldContext::new("shop", "models", "UserRoles", "user_roles", "Role grants")
    }

    #[test]
    fn test_context_slots() {
        let ctx = context();
        assert_eq!(ctx.receiver, "u");
        assert_eq!(ctx.table_kebab, "user-roles");
    }

    #[test]
    fn test_render() {
        let text = render_scaffold(
            "// {{table_note}}\nuse {{project}}::{{package}}::{{struct_name}};\n\
             pub fn route() -> &'static str { \"/{{table_kebab}}\" }\n\
             impl Handler for {{struct_name}} { fn table(&self) -> &str { let {{receiver}} = self; \"{{table_name}}\" } }\n",
            &context(),
        )
        .unwrap();

        assert_eq!(
            text,
            "// Role grants\nuse shop::models::UserRoles;\n\
             pub fn route() -> &'static str { \"/user-roles\" }\n\
             impl Handler for UserRoles { fn table(&self) -> &str { let u = self; \"user_roles\" } }\n"
        );
    }

    #[test]
    fn test_unknown_slot_fails() {
        assert!(render_scaffold("{{nope}}", &context()).is_err());
    }

    #[test]
    fn test_write_keeps_backup() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("handler.hbs");
        fs::write(&template, "// {{struct_name}} v1\n").unwrap();

        let path = write_scaffold(&template, dir.path(), &context()).unwrap();
        assert_eq!(
            path,
            dir.path().join("shop").join("handler").join("user_roles_handler.rs")
        );

        fs::write(&template, "// {{struct_name}} v2\n").unwrap();
        write_scaffold(&template, dir.path(), &context()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "// UserRoles v2\n");
        assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), "// UserRoles v1\n");
    }
}
