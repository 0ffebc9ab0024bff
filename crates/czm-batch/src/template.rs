//! Template ingress and transformation
//!
//! A [`Template`] is the line sequence of the reference input deck, line
//! terminators included. [`Template::substitute`] produces a derived copy in
//! which the line following each marker line is replaced by a rendered
//! [`ParameterTriple`].

use std::path::Path;

use crate::error::{BatchError, Result};
use crate::sampler::ParameterTriple;

/// Read-only template, loaded once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    lines: Vec<String>,
}

/// Derived copy of a template plus the number of lines replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Output lines, same count as the template
    pub lines: Vec<String>,
    /// Number of replaced lines
    pub replacements: usize,
}

impl Substitution {
    /// Concatenated output text
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

impl Template {
    /// Split text into lines, keeping every terminator
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_owned).collect(),
        }
    }

    /// Create template from pre-split lines
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Load template file
    ///
    /// # Errors
    /// - `BatchError::MissingTemplate` if the file is absent or unreadable
    /// - `BatchError::TemplateEncoding` if it is not valid UTF-8 text
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| BatchError::missing_template(path, e))?;
        let text = String::from_utf8(bytes).map_err(|source| BatchError::TemplateEncoding {
            path: path.to_path_buf(),
            source,
        })?;
        let template = Self::parse(&text);
        tracing::debug!(
            path = %path.display(),
            lines = template.len(),
            "loaded template"
        );
        Ok(template)
    }

    /// Template lines
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the template has no lines
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of lines containing `marker`
    #[must_use]
    pub fn marker_count(&self, marker: &str) -> usize {
        self.lines.iter().filter(|line| line.contains(marker)).count()
    }

    /// Replace the line following each `marker` line with `triple`
    ///
    /// A marker line is always copied verbatim and arms the replacement;
    /// the next non-marker line is swapped for `"<knn>, <kss>, <ktt>\n"`.
    /// Consecutive marker lines keep the replacement armed. A marker on
    /// the last line replaces nothing. Without a marker the output equals
    /// the template.
    #[must_use]
    pub fn substitute(&self, marker: &str, triple: &ParameterTriple) -> Substitution {
        let mut lines = Vec::with_capacity(self.lines.len());
        let mut replace_next = false;
        let mut replacements = 0;

        for line in &self.lines {
            if line.contains(marker) {
                replace_next = true;
                lines.push(line.clone());
            } else if replace_next {
                lines.push(format!("{triple}\n"));
                replacements += 1;
                replace_next = false;
            } else {
                lines.push(line.clone());
            }
        }

        Substitution {
            lines,
            replacements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "*Cohesive Behavior";

    fn cohesive_template() -> Template {
        Template::from_lines([
            "Header\n",
            "*Cohesive Behavior\n",
            "1.0, 1.0, 1.0\n",
            "Footer\n",
        ])
    }

    #[test]
    fn parse_keeps_terminators() {
        let template = Template::parse("a\r\nb\nc");
        assert_eq!(template.lines(), &["a\r\n", "b\n", "c"]);
    }

    #[test]
    fn parse_empty_text() {
        assert!(Template::parse("").is_empty());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Template::load(dir.path().join("absent.inp")).unwrap_err();
        assert!(matches!(err, BatchError::MissingTemplate { .. }));
    }

    #[test]
    fn load_non_utf8_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.inp");
        std::fs::write(&path, b"*Heading\n\xe9l\xe9ment\n").unwrap();

        let err = Template::load(&path).unwrap_err();
        assert!(matches!(err, BatchError::TemplateEncoding { .. }));
        assert!(err.to_string().contains("not valid UTF-8"));
        assert!(err.is_pre_output());
    }

    #[test]
    fn replaces_line_after_marker() {
        let out = cohesive_template().substitute(MARKER, &ParameterTriple::new(1.0, 0.1, 0.1));
        assert_eq!(out.replacements, 1);
        assert_eq!(
            out.lines,
            vec!["Header\n", "*Cohesive Behavior\n", "1, 0.1, 0.1\n", "Footer\n"]
        );
    }

    #[test]
    fn marker_matches_as_substring() {
        let template = Template::from_lines(["** *Cohesive Behavior, eligibility=ALL\n", "old\n"]);
        let out = template.substitute(MARKER, &ParameterTriple::new(2.0, 0.2, 0.2));
        assert_eq!(out.lines[1], "2, 0.2, 0.2\n");
    }

    #[test]
    fn missing_marker_is_noop() {
        let template = Template::from_lines(["a\n", "b\n"]);
        let out = template.substitute(MARKER, &ParameterTriple::new(1.0, 1.0, 1.0));
        assert_eq!(out.replacements, 0);
        assert_eq!(out.lines, template.lines());
    }

    #[test]
    fn marker_on_last_line_replaces_nothing() {
        let template = Template::from_lines(["a\n", "*Cohesive Behavior\n"]);
        let out = template.substitute(MARKER, &ParameterTriple::new(1.0, 1.0, 1.0));
        assert_eq!(out.replacements, 0);
        assert_eq!(out.lines, template.lines());
    }

    #[test]
    fn consecutive_markers_replace_once() {
        let template = Template::from_lines([
            "*Cohesive Behavior\n",
            "*Cohesive Behavior\n",
            "old\n",
            "tail\n",
        ]);
        let out = template.substitute(MARKER, &ParameterTriple::new(1.0, 1.0, 1.0));
        assert_eq!(out.replacements, 1);
        assert_eq!(out.lines[2], "1, 1, 1\n");
        assert_eq!(out.lines[3], "tail\n");
    }

    #[test]
    fn every_marker_block_is_replaced() {
        let template = Template::from_lines([
            "*Cohesive Behavior\n",
            "old\n",
            "mid\n",
            "*Cohesive Behavior\n",
            "old\n",
        ]);
        assert_eq!(template.marker_count(MARKER), 2);
        let out = template.substitute(MARKER, &ParameterTriple::new(3.0, 1.5, 1.5));
        assert_eq!(out.replacements, 2);
        assert_eq!(out.lines[1], "3, 1.5, 1.5\n");
        assert_eq!(out.lines[2], "mid\n");
        assert_eq!(out.lines[4], "3, 1.5, 1.5\n");
    }

    #[test]
    fn template_is_not_mutated() {
        let template = cohesive_template();
        let before = template.clone();
        let _ = template.substitute(MARKER, &ParameterTriple::new(9.0, 9.0, 9.0));
        assert_eq!(template, before);
    }
}
