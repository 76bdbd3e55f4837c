use serde::Serialize;

///
/// SourceMap
///
/// Position of a token in the concatenated source stream.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SourceMap {
    pub line: u32,
    pub column: u32,
    pub token_text: String,
}

impl SourceMap {
    #[must_use]
    pub fn new(line: u32, column: u32, token_text: impl Into<String>) -> Self {
        Self {
            line,
            column,
            token_text: token_text.into(),
        }
    }
}

///
/// FileMap
///
/// A concatenated line translated back to its originating file.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FileMap {
    pub file_path: String,
    pub line: u32,
}

///
/// FileSegment
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSegment {
    pub file_path: String,
    pub namespace_name: String,
    pub start_line: u32,
    pub line_count: u32,
}

impl FileSegment {
    const fn end_line(&self) -> u32 {
        self.start_line + self.line_count
    }
}

///
/// FileIndex
///
/// Files are concatenated in load order; line numbers are 1-based and the
/// first file begins at line 1.
///

#[derive(Clone, Debug, Default)]
pub struct FileIndex {
    segments: Vec<FileSegment>,
}

impl FileIndex {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Append the next file in load order.
    pub fn push(
        &mut self,
        file_path: impl Into<String>,
        namespace_name: impl Into<String>,
        line_count: u32,
    ) {
        let start_line = self.segments.last().map_or(1, FileSegment::end_line);

        self.segments.push(FileSegment {
            file_path: file_path.into(),
            namespace_name: namespace_name.into(),
            start_line,
            line_count,
        });
    }

    #[must_use]
    pub fn segments(&self) -> &[FileSegment] {
        &self.segments
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Translate a concatenated line into file path and file-local line.
    #[must_use]
    pub fn lookup(&self, line: u32) -> Option<FileMap> {
        let pos = self.segments.partition_point(|s| s.end_line() <= line);
        let segment = self.segments.get(pos)?;

        (line >= segment.start_line).then(|| FileMap {
            file_path: segment.file_path.clone(),
            line: line - segment.start_line + 1,
        })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> FileIndex {
        let mut index = FileIndex::new();
        index.push("EdFi/Student.metaed", "EdFi", 10);
        index.push("EdFi/School.metaed", "EdFi", 5);
        index.push("Sample/Student.metaed", "Sample", 3);
        index
    }

    #[test]
    fn lines_map_to_the_owning_file() {
        let index = index();

        assert_eq!(
            index.lookup(1),
            Some(FileMap {
                file_path: "EdFi/Student.metaed".into(),
                line: 1
            })
        );
        assert_eq!(index.lookup(10).map(|m| m.line), Some(10));
        assert_eq!(
            index.lookup(11),
            Some(FileMap {
                file_path: "EdFi/School.metaed".into(),
                line: 1
            })
        );
        assert_eq!(
            index.lookup(18).map(|m| m.file_path),
            Some("Sample/Student.metaed".into())
        );
    }

    #[test]
    fn lines_outside_any_file_are_unmapped() {
        let index = index();

        assert_eq!(index.lookup(0), None);
        assert_eq!(index.lookup(19), None);
        assert_eq!(FileIndex::new().lookup(1), None);
    }

    #[test]
    fn empty_files_are_skipped() {
        let mut index = FileIndex::new();
        index.push("a.metaed", "EdFi", 0);
        index.push("b.metaed", "EdFi", 2);

        assert_eq!(index.lookup(1).map(|m| m.file_path), Some("b.metaed".into()));
    }
}
