//! Where workflow progress lines go

use navigator_client::EntityRecord;

/// Line reported when a query matched nothing
pub const NO_ELEMENTS_FOUND: &str = "no elements found";

/// Sink for the human-readable progress of a workflow
pub trait Reporter {
    fn report(&mut self, line: &str);
}

/// Writes every line to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Keeps lines in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    lines: Vec<String>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// One-line summary of the fields a consumer looks at
pub fn describe_record(record: &EntityRecord) -> String {
    fn or_dash(value: Option<&str>) -> &str {
        value.unwrap_or("-")
    }

    format!(
        "source: {}  type: {}  originalName: {}  fileSystemPath: {}  parentPath: {}",
        or_dash(record.source_type.as_ref().map(|t| t.as_str())),
        or_dash(record.entity_type.as_ref().map(|t| t.as_str())),
        or_dash(record.original_name.as_deref()),
        or_dash(record.file_system_path.as_deref()),
        or_dash(record.parent_path.as_deref()),
    )
}
