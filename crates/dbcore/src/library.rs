//! A directory of DBC files paired with a binding registry.

use std::path::{Path, PathBuf};

use dbcore_binding::BindingRegistry;
use dbcore_dbc::DbcFile;
use tracing::debug;

use crate::{Error, Result};

/// File extension of DBC tables.
pub const DBC_EXTENSION: &str = "dbc";

/// DBC files on disk, decoded with bindings named after the file stem.
#[derive(Debug, Clone)]
pub struct DbcLibrary {
    dir: PathBuf,
    bindings: BindingRegistry,
}

impl DbcLibrary {
    /// Pair a DBC directory with an existing registry.
    pub fn new(dir: impl Into<PathBuf>, bindings: BindingRegistry) -> Self {
        Self {
            dir: dir.into(),
            bindings,
        }
    }

    /// Pair a DBC directory with every binding file in `bindings_dir`.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(dir: P, bindings_dir: Q) -> Result<Self> {
        let bindings = BindingRegistry::from_dir(bindings_dir)?;
        Ok(Self::new(dir.as_ref(), bindings))
    }

    /// The DBC directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The binding registry.
    pub fn bindings(&self) -> &BindingRegistry {
        &self.bindings
    }

    /// Path of the table `name` inside the DBC directory.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, DBC_EXTENSION))
    }

    /// Decode the table `name` with the binding of the same name.
    pub fn load(&self, name: &str) -> Result<DbcFile> {
        let path = self.path_of(name);
        Ok(dbcore_dbc::decode(path, &self.bindings, name)?)
    }

    /// Decode an arbitrary file, with `binding` or else the file stem as the binding name.
    pub fn load_file(&self, path: &Path, binding: Option<&str>) -> Result<DbcFile> {
        let name = match binding {
            Some(name) => name.to_string(),
            None => binding_name(path)?,
        };
        Ok(dbcore_dbc::decode(path, &self.bindings, &name)?)
    }

    /// Resolve a table argument: an existing file path, or a table name in the DBC directory.
    pub fn resolve(&self, name_or_path: &str) -> PathBuf {
        let path = Path::new(name_or_path);
        if path.extension().is_some() || path.is_file() {
            path.to_path_buf()
        } else {
            self.path_of(name_or_path)
        }
    }

    /// List the `*.dbc` files in the DBC directory, sorted by path.
    ///
    /// `filter` is a glob matched case-insensitively against the file name.
    pub fn files(&self, filter: Option<&str>) -> Result<Vec<PathBuf>> {
        let pattern = format!(
            "{}/*.{}",
            glob::Pattern::escape(&self.dir.to_string_lossy()),
            DBC_EXTENSION
        );
        let filter = filter.map(glob::Pattern::new).transpose()?;
        let options = glob::MatchOptions {
            case_sensitive: false,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };

        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            let path = entry?;
            let keep = match (&filter, path.file_name()) {
                (Some(filter), Some(file_name)) => {
                    filter.matches_with(&file_name.to_string_lossy(), options)
                }
                (None, _) => true,
                (Some(_), None) => false,
            };
            if keep {
                files.push(path);
            }
        }
        files.sort();

        debug!(dir = %self.dir.display(), files = files.len(), "listed DBC files");
        Ok(files)
    }
}

/// The binding name for a DBC path: its file stem.
pub fn binding_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| Error::NoBindingName(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_dbc(dir: &Path, name: &str, rows: &[(u32, u32)], pool: &[u8]) {
        let mut bytes = Vec::new();
        for value in [
            u32::from_le_bytes(*b"WDBC"),
            rows.len() as u32,
            2,
            8,
            pool.len() as u32,
        ] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        for (id, offset) in rows {
            bytes.extend_from_slice(&id.to_le_bytes());
            bytes.extend_from_slice(&offset.to_le_bytes());
        }
        bytes.extend_from_slice(pool);
        std::fs::write(dir.join(format!("{}.dbc", name)), bytes).unwrap();
    }

    fn library() -> (tempfile::TempDir, DbcLibrary) {
        let dir = tempfile::tempdir().unwrap();
        let bindings = dir.path().join("Bindings");
        std::fs::create_dir(&bindings).unwrap();
        std::fs::write(bindings.join("SpellIcon.txt"), "uint ID\nstring_offset Name\n").unwrap();

        write_dbc(dir.path(), "SpellIcon", &[(1, 1), (2, 0)], b"\0Spell_Fire\0");
        write_dbc(dir.path(), "Other", &[], b"");

        let library = DbcLibrary::open(dir.path(), &bindings).unwrap();
        (dir, library)
    }

    #[test]
    fn test_load_by_name() {
        let (_dir, library) = library();

        let dbc = library.load("SpellIcon").unwrap();
        let icon = dbc.records.find_by_id(1).unwrap();
        assert_eq!(dbc.strings.get_or_empty(icon.get_u32("Name").unwrap()), "Spell_Fire");
    }

    #[test]
    fn test_load_without_binding() {
        let (_dir, library) = library();

        assert!(matches!(
            library.load("Other"),
            Err(Error::Dbc(dbcore_dbc::Error::Binding(
                dbcore_binding::Error::SchemaNotFound(_)
            )))
        ));
    }

    #[test]
    fn test_load_file_with_explicit_binding() {
        let (dir, library) = library();
        let copy = dir.path().join("copy.bin");
        std::fs::copy(library.path_of("SpellIcon"), &copy).unwrap();

        assert!(matches!(
            library.load_file(&copy, None),
            Err(Error::Dbc(dbcore_dbc::Error::Binding(
                dbcore_binding::Error::SchemaNotFound(ref name)
            ))) if name == "copy"
        ));
        assert_eq!(library.load_file(&copy, Some("SpellIcon")).unwrap().records.len(), 2);
    }

    #[test]
    fn test_files_and_filter() {
        let (_dir, library) = library();

        let names = |files: Vec<PathBuf>| -> Vec<String> {
            files
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        };
        assert_eq!(names(library.files(None).unwrap()), ["Other.dbc", "SpellIcon.dbc"]);
        assert_eq!(names(library.files(Some("spell*")).unwrap()), ["SpellIcon.dbc"]);
    }

    #[test]
    fn test_resolve() {
        let (_dir, library) = library();

        assert_eq!(library.resolve("SpellIcon"), library.path_of("SpellIcon"));
        assert_eq!(library.resolve("some/file.dbc"), PathBuf::from("some/file.dbc"));
    }
}
