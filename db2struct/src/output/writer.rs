//! Writing generated units to disk
//!
//! Each table gets `<target>/<package>/<module>.rs`. Anything below the
//! custom-code marker of an existing file survives regeneration.

use std::fs;
use std::path::{Path, PathBuf};

use crate::codegen::fields::rust_ident;
use crate::codegen::format::format_source;
use crate::codegen::GeneratedUnit;
use crate::error::Result;
use crate::utils::naming::{field_ident_name, normalize_field_name};

/// Everything from this line on belongs to the user
pub const CUSTOM_CODE_MARKER: &str = "// ----------custom-code----------";

/// First line of every generated file
pub const GENERATED_HEADER: &str =
    "// This file was automatically generated by db2struct. Do not edit above the custom-code marker.";

/// Module (and file stem) for a table
pub fn module_name(table: &str) -> String {
    field_ident_name(&normalize_field_name(table))
}

/// The user section of an existing file, marker line included
pub fn extract_custom_code(existing: &str) -> Option<String> {
    let start = existing
        .lines()
        .position(|line| line.contains(CUSTOM_CODE_MARKER))?;

    let mut custom = existing.lines().skip(start).collect::<Vec<_>>().join("\n");
    custom.push('\n');
    Some(custom)
}

/// Header, generated source, then the user section (a bare marker for new
/// files)
pub fn render_file(source: &str, custom: Option<&str>) -> String {
    let custom = match custom {
        Some(custom) => custom.to_string(),
        None => format!("{}\n", CUSTOM_CODE_MARKER),
    };
    format!("{}\n\n{}\n\n{}", GENERATED_HEADER, source.trim_end(), custom)
}

/// Writes units below `<target>/<package>`
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    backup: bool,
}

impl OutputWriter {
    pub fn new(target: &Path, package: &str, backup: bool) -> Self {
        Self {
            dir: target.join(package),
            backup,
        }
    }

    /// Directory the files go to
    pub fn package_dir(&self) -> &Path {
        &self.dir
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.rs", module_name(table)))
    }

    /// Write one table's unit, keeping the custom section of the old file
    pub fn write_unit(&self, unit: &GeneratedUnit) -> Result<PathBuf> {
        let path = self.table_path(&unit.table_name);
        self.write_generated(&path, &unit.source)?;
        Ok(path)
    }

    /// Write `mod.rs` declaring every table module and re-exporting its
    /// structs
    pub fn write_aggregate(&self, units: &[GeneratedUnit]) -> Result<PathBuf> {
        let mut src = String::new();
        for unit in units {
            let module = rust_ident(&module_name(&unit.table_name))?;
            src.push_str(&format!("pub mod {};\n", module));
            src.push_str(&format!("pub use {}::{};\n", module, rust_ident(&unit.struct_name)?));
            if let Some(object_name) = &unit.object_name {
                src.push_str(&format!("pub use {}::{};\n", module, rust_ident(object_name)?));
            }
        }

        let path = self.dir.join("mod.rs");
        self.write_generated(&path, &format_source(&src)?)?;
        Ok(path)
    }

    fn write_generated(&self, path: &Path, source: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let existing = match fs::read_to_string(path) {
            Ok(existing) => Some(existing),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        if let Some(existing) = &existing {
            if self.backup {
                let backup = backup_path(path);
                fs::write(&backup, existing)?;
                tracing::debug!(path = %backup.display(), "Backed up previous file");
            }
        }

        let custom = existing.as_deref().and_then(extract_custom_code);
        let contents = render_file(source, custom.as_deref());
        fs::write(path, &contents)?;

        tracing::info!(path = %path.display(), bytes = contents.len(), "wrote file");
        Ok(())
    }
}

/// `users.rs` -> `users.rs.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}
