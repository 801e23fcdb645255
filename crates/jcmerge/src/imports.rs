//! Import collection across the merged files.
//!
//! Imports are gathered textually: every line that looks like an import
//! declaration contributes its trimmed text, identical lines collapse, and
//! specific imports made redundant by a wildcard import of the same package
//! are dropped.

use std::fmt;

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{source::SourceFile, types::FxIndexSet};

static IMPORT_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*import\s+(?P<static>static\s+)?(?P<path>[\w$]+(?:\s*\.\s*[\w$]+)*)(?P<wildcard>\s*\.\s*\*)?\s*;")
        .expect("import pattern is valid")
});

/// Whether `line` is an import declaration
pub fn is_import_declaration(line: &str) -> bool {
    IMPORT_DECLARATION.is_match(line)
}

/// A single import line, compared and ordered by its text
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportStatement {
    text: String,
    package: String,
    wildcard: bool,
    is_static: bool,
}

impl ImportStatement {
    /// Classify an import line, returning `None` for anything else
    pub fn parse(line: &str) -> Option<Self> {
        let captures = IMPORT_DECLARATION.captures(line)?;
        let path: String = captures["path"]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let wildcard = captures.name("wildcard").is_some();
        let package = if wildcard {
            path
        } else {
            path.rsplit_once('.')
                .map_or_else(String::new, |(package, _)| package.to_owned())
        };

        Some(Self {
            text: line.trim().to_owned(),
            package,
            wildcard,
            is_static: captures.name("static").is_some(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// `import a.b.*;`
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Package the import draws from: `a.b` for both `a.b.C` and `a.b.*`
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Whether this wildcard import already brings `other` into scope
    pub fn subsumes(&self, other: &Self) -> bool {
        self.wildcard
            && !other.wildcard
            && self.is_static == other.is_static
            && self.package == other.package
    }
}

impl fmt::Display for ImportStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Deduplicated imports of every merged file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    imports: FxIndexSet<ImportStatement>,
}

impl ImportSet {
    /// Build a resolved set from raw statements
    pub fn from_statements(statements: impl IntoIterator<Item = ImportStatement>) -> Self {
        let mut set = Self {
            imports: statements.into_iter().collect(),
        };
        set.remove_subsumed();
        set
    }

    fn remove_subsumed(&mut self) {
        let wildcards: Vec<ImportStatement> = self
            .imports
            .iter()
            .filter(|import| import.is_wildcard())
            .cloned()
            .collect();
        if wildcards.is_empty() {
            return;
        }

        self.imports.retain(|import| {
            let covering = wildcards.iter().find(|wildcard| wildcard.subsumes(import));
            if let Some(wildcard) = covering {
                debug!("Dropping `{import}`, covered by `{wildcard}`");
            }
            covering.is_none()
        });
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.imports.iter().any(|import| import.as_str() == text)
    }

    /// Statements in lexicographic order of their text
    pub fn sorted(&self) -> Vec<&ImportStatement> {
        let mut sorted: Vec<_> = self.imports.iter().collect();
        sorted.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        sorted
    }
}

/// Collect and resolve the imports of every file
pub fn collect(files: &[SourceFile]) -> ImportSet {
    let statements = files.iter().flat_map(|file| {
        file.lines().filter_map(move |line| {
            let statement = ImportStatement::parse(line)?;
            trace!("{}: {statement}", file.name());
            Some(statement)
        })
    });
    ImportSet::from_statements(statements)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn texts(set: &ImportSet) -> Vec<&str> {
        set.sorted().into_iter().map(ImportStatement::as_str).collect()
    }

    #[test]
    fn test_parse_classifies_imports() {
        let specific = ImportStatement::parse("import javacard.framework.JCSystem;").unwrap();
        assert!(!specific.is_wildcard());
        assert_eq!(specific.package(), "javacard.framework");

        let wildcard = ImportStatement::parse("  import javacard.security.*;  ").unwrap();
        assert!(wildcard.is_wildcard());
        assert_eq!(wildcard.package(), "javacard.security");
        assert_eq!(wildcard.as_str(), "import javacard.security.*;");

        let static_import = ImportStatement::parse("import static a.b.C.max;").unwrap();
        assert!(static_import.is_static());
        assert_eq!(static_import.package(), "a.b.C");
    }

    #[test]
    fn test_parse_rejects_non_imports() {
        assert!(ImportStatement::parse("package opencrypto.jcmathlib;").is_none());
        assert!(ImportStatement::parse("// import a.b.C;").is_none());
        assert!(ImportStatement::parse(" * import the helper;").is_none());
        assert!(ImportStatement::parse("importantValue = 1;").is_none());
    }

    #[test]
    fn test_first_line_import_after_byte_order_mark() {
        let files = vec![SourceFile::new(
            "Bom.java",
            "\u{feff}import javacard.framework.Util;\nimport javacard.security.KeyPair;\n",
        )];
        assert_eq!(
            texts(&collect(&files)),
            vec!["import javacard.framework.Util;", "import javacard.security.KeyPair;"]
        );
    }

    #[test]
    fn test_wildcard_subsumes_same_package_only() {
        let files = vec![SourceFile::new(
            "A.java",
            "import a.b.*;\nimport a.b.C;\nimport x.Y;\n",
        )];
        assert_eq!(texts(&collect(&files)), vec!["import a.b.*;", "import x.Y;"]);
    }

    #[test]
    fn test_subsumption_requires_exact_package() {
        let files = vec![SourceFile::new(
            "A.java",
            "import a.b.*;\nimport a.bc.D;\nimport a.b.c.E;\nimport a.b.c.*;\nimport a.F;\n",
        )];
        assert_eq!(
            texts(&collect(&files)),
            vec![
                "import a.F;",
                "import a.b.*;",
                "import a.b.c.*;",
                "import a.bc.D;",
            ]
        );
    }

    #[test]
    fn test_static_imports_are_not_covered_by_type_wildcards() {
        let files = vec![SourceFile::new(
            "A.java",
            "import a.b.*;\nimport static a.b.max;\nimport static a.c.*;\nimport static a.c.min;\n",
        )];
        assert_eq!(
            texts(&collect(&files)),
            vec!["import a.b.*;", "import static a.b.max;", "import static a.c.*;"]
        );
    }

    #[test]
    fn test_duplicates_across_files_collapse() {
        let files = vec![
            SourceFile::new("A.java", "import javacard.framework.Util;\n"),
            SourceFile::new("B.java", "    import javacard.framework.Util;\nclass B {}\n"),
        ];
        let set = collect(&files);
        assert_eq!(set.len(), 1);
        assert!(set.contains("import javacard.framework.Util;"));
    }

    #[test]
    fn test_empty_input_yields_empty_set() {
        assert!(collect(&[]).is_empty());
    }
}
