//! Assembly of the merged Java file.
//!
//! Layout, top to bottom: the package declaration, a blank line, the sorted
//! imports, a blank line, the library doc comment, the wrapper class opening,
//! every transformed body separated by one blank line, and the closing brace.
//! Bodies are written in the order given; nothing here reorders them.

use crate::{
    imports::ImportSet,
    transformer::TransformedBody,
    types::LineEnding,
};

/// Text of the doc comment placed above the wrapper class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryHeader {
    pub name: String,
    pub version: Option<String>,
    pub url: Option<String>,
}

impl LibraryHeader {
    /// `Packaged JCMathLib v2.0 (https://...).`
    pub fn summary(&self) -> String {
        let mut summary = format!("Packaged {}", self.name);
        if let Some(version) = &self.version {
            summary.push_str(&format!(" v{version}"));
        }
        if let Some(url) = &self.url {
            summary.push_str(&format!(" ({url})"));
        }
        summary.push('.');
        summary
    }
}

/// Everything that goes into the merged file
#[derive(Debug, Clone)]
pub struct AssembledOutput {
    pub package: String,
    pub imports: ImportSet,
    pub header: Option<LibraryHeader>,
    /// Nested class bodies in selection order
    pub bodies: Vec<TransformedBody>,
    pub wrapper_class: String,
    pub line_ending: LineEnding,
}

impl AssembledOutput {
    /// Render the merged file
    pub fn render(&self) -> String {
        let mut out = OutputWriter::new(self.line_ending);

        out.line(&format!("package {};", self.package));
        out.blank();
        for import in self.imports.sorted() {
            out.line(import.as_str());
        }
        out.blank();

        if let Some(header) = &self.header {
            out.line("/**");
            out.line(&format!(" * {}", header.summary()));
            out.line(" */");
        }

        out.line(&format!("public class {} {{", self.wrapper_class));
        let mut bodies = self.bodies.iter().filter(|body| !body.is_empty());
        if let Some(first) = bodies.next() {
            out.lines(first.lines());
            for body in bodies {
                out.blank();
                out.lines(body.lines());
            }
        }
        out.line("}");

        out.finish()
    }
}

/// Render a merged file from its parts
pub fn assemble(
    package: &str,
    imports: &ImportSet,
    header: Option<&LibraryHeader>,
    bodies: &[TransformedBody],
    wrapper_class: &str,
    line_ending: LineEnding,
) -> String {
    AssembledOutput {
        package: package.to_owned(),
        imports: imports.clone(),
        header: header.cloned(),
        bodies: bodies.to_vec(),
        wrapper_class: wrapper_class.to_owned(),
        line_ending,
    }
    .render()
}

struct OutputWriter {
    buffer: String,
    newline: &'static str,
}

impl OutputWriter {
    fn new(line_ending: LineEnding) -> Self {
        Self {
            buffer: String::new(),
            newline: line_ending.as_str(),
        }
    }

    fn line(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push_str(self.newline);
    }

    fn lines(&mut self, lines: &[String]) {
        for line in lines {
            self.line(line);
        }
    }

    fn blank(&mut self) {
        self.buffer.push_str(self.newline);
    }

    fn finish(self) -> String {
        self.buffer
    }
}
