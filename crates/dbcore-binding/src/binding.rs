//! Binding definitions.

use std::hash::BuildHasherDefault;
use std::path::{Path, PathBuf};

use hashbrown::HashSet as FastHashSet;
use rustc_hash::FxHasher;

use crate::{Error, Result};

type FxHashSet<T> = FastHashSet<T, BuildHasherDefault<FxHasher>>;

/// Wire type of a single binding column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingType {
    /// Signed 32-bit integer.
    Int,
    /// Unsigned 32-bit integer.
    UInt,
    /// Unsigned 8-bit integer.
    UInt8,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    /// Unsigned 32-bit byte offset into the string pool.
    StringOffset,
    /// A type keyword this crate does not know.
    ///
    /// Kept so the failure can be reported against the file that uses the
    /// binding, with the offending column named.
    Unknown(String),
}

impl BindingType {
    /// Parse a type keyword. Keywords are case-insensitive.
    pub fn parse(keyword: &str) -> Self {
        match keyword.to_ascii_lowercase().as_str() {
            "int" | "int32" => BindingType::Int,
            "uint" | "uint32" => BindingType::UInt,
            "uint8" | "byte" => BindingType::UInt8,
            "float" => BindingType::Float,
            "double" => BindingType::Double,
            "string_offset" | "string" => BindingType::StringOffset,
            _ => BindingType::Unknown(keyword.to_string()),
        }
    }

    /// Size of this type on the wire, or `None` for unknown types.
    #[inline]
    pub fn wire_size(&self) -> Option<u32> {
        match self {
            BindingType::Int | BindingType::UInt | BindingType::Float | BindingType::StringOffset => Some(4),
            BindingType::UInt8 => Some(1),
            BindingType::Double => Some(8),
            BindingType::Unknown(_) => None,
        }
    }

    /// The canonical keyword for this type.
    pub fn keyword(&self) -> &str {
        match self {
            BindingType::Int => "int",
            BindingType::UInt => "uint",
            BindingType::UInt8 => "uint8",
            BindingType::Float => "float",
            BindingType::Double => "double",
            BindingType::StringOffset => "string_offset",
            BindingType::Unknown(keyword) => keyword,
        }
    }
}

impl std::fmt::Display for BindingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A named, typed column of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingField {
    /// Column name, unique within its binding.
    pub name: String,
    /// Wire type.
    pub ty: BindingType,
}

impl BindingField {
    /// Create a new field.
    pub fn new(name: impl Into<String>, ty: BindingType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Row layout of one DBC table.
///
/// Columns are stored in the order they appear on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    name: String,
    fields: Vec<BindingField>,
}

impl Binding {
    /// Create a binding from an ordered list of fields.
    ///
    /// Fails if two fields share a name.
    pub fn new(name: impl Into<String>, fields: Vec<BindingField>) -> Result<Self> {
        let name = name.into();
        {
            let mut seen = FxHashSet::with_capacity_and_hasher(fields.len(), Default::default());
            for field in &fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(Error::DuplicateField {
                        binding: name,
                        field: field.name.clone(),
                    });
                }
            }
        }
        Ok(Self { name, fields })
    }

    /// Parse a binding from its text form.
    ///
    /// Each non-empty line that does not start with `#` declares one column
    /// as `<type> <name>`.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self> {
        let name = name.into();
        let path = PathBuf::from(&name);
        Self::parse_at(name, text, &path)
    }

    /// Load a binding file. The binding is named after the file stem.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Parse {
                path: path.to_path_buf(),
                line: 0,
                message: "binding file has no name".to_string(),
            })?;
        let text = std::fs::read_to_string(path)?;
        Self::parse_at(name, &text, path)
    }

    fn parse_at(name: String, text: &str, path: &Path) -> Result<Self> {
        let mut fields = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(ty), Some(field), None) => {
                    fields.push(BindingField::new(field, BindingType::parse(ty)));
                }
                _ => {
                    return Err(Error::Parse {
                        path: path.to_path_buf(),
                        line: index + 1,
                        message: format!("expected `<type> <name>`, got `{}`", line),
                    });
                }
            }
        }

        Self::new(name, fields)
    }

    /// The binding name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The columns in on-disk order.
    #[inline]
    pub fn fields(&self) -> &[BindingField] {
        &self.fields
    }

    /// Find a column by name.
    pub fn field(&self, name: &str) -> Option<&BindingField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of columns.
    #[inline]
    pub fn field_count(&self) -> u32 {
        self.fields.len() as u32
    }

    /// Byte width of one row, summed over the known column types.
    pub fn record_size(&self) -> u32 {
        self.fields.iter().filter_map(|f| f.ty.wire_size()).sum()
    }

    /// Columns whose type keyword was not recognized.
    pub fn unknown_fields(&self) -> impl Iterator<Item = &BindingField> {
        self.fields
            .iter()
            .filter(|f| matches!(f.ty, BindingType::Unknown(_)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(BindingType::parse("INT"), BindingType::Int);
        assert_eq!(BindingType::parse("uint"), BindingType::UInt);
        assert_eq!(BindingType::parse("UInt8"), BindingType::UInt8);
        assert_eq!(BindingType::parse("float"), BindingType::Float);
        assert_eq!(BindingType::parse("double"), BindingType::Double);
        assert_eq!(BindingType::parse("string"), BindingType::StringOffset);
        assert_eq!(
            BindingType::parse("int64"),
            BindingType::Unknown("int64".to_string())
        );
    }

    #[test]
    fn test_record_size_and_field_count() {
        let binding = Binding::parse(
            "Mixed",
            "# header comment\nuint ID\n\nint Delta\nuint8 Flag\nfloat Scale\ndouble Ratio\nstring_offset Name\n",
        )
        .unwrap();

        assert_eq!(binding.name(), "Mixed");
        assert_eq!(binding.field_count(), 6);
        assert_eq!(binding.record_size(), 4 + 4 + 1 + 4 + 8 + 4);
        assert_eq!(binding.field("Flag").unwrap().ty, BindingType::UInt8);
        assert!(binding.field("Missing").is_none());
    }

    #[test]
    fn test_unknown_type_is_kept() {
        let binding = Binding::parse("Odd", "uint ID\nquad Huge\n").unwrap();

        assert_eq!(binding.field_count(), 2);
        assert_eq!(binding.record_size(), 4);
        let unknown: Vec<_> = binding.unknown_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(unknown, ["Huge"]);
    }

    #[test]
    fn test_malformed_line() {
        match Binding::parse("Bad", "uint ID\nuint\n") {
            Err(Error::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(Binding::parse("Bad", "uint ID extra\n").is_err());
    }

    #[test]
    fn test_duplicate_field() {
        assert!(matches!(
            Binding::parse("Dup", "uint ID\nint ID\n"),
            Err(Error::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_new_keeps_field_order() {
        let binding = Binding::new(
            "Ordered",
            vec![
                BindingField::new("ID", BindingType::UInt),
                BindingField::new("Name", BindingType::StringOffset),
            ],
        )
        .unwrap();

        let names: Vec<_> = binding.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["ID", "Name"]);
    }

    #[test]
    fn test_from_file_uses_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ItemSubClass.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "uint Class\nuint subClass\nstring_offset displayName").unwrap();

        let binding = Binding::from_file(&path).unwrap();
        assert_eq!(binding.name(), "ItemSubClass");
        assert_eq!(binding.field_count(), 3);
    }
}
