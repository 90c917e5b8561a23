/*!
 * Reporting functionality for onefile
 *
 * Console summaries of pack and unpack runs, rendered with the tabled crate.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::{ProjectDocument, UnpackResult};
use crate::utils::{format_file_size, format_number, truncate_path};

/// Per-file figures of a pack run
#[derive(Debug, Clone, Default)]
pub struct FileReportInfo {
    /// Number of lines embedded
    pub lines: usize,
    /// Number of characters embedded
    pub chars: usize,
}

/// Statistics of a pack run
#[derive(Debug, Clone)]
pub struct PackReport {
    /// Output file path, or `-` for stdout
    pub output_file: String,
    /// Time taken to walk, render and write
    pub duration: Duration,
    /// Number of files embedded
    pub files_processed: usize,
    /// Total number of lines
    pub total_lines: usize,
    /// Total number of characters
    pub total_chars: usize,
    /// Size of the document in bytes
    pub document_size: u64,
    /// Figures for each file, in document order
    pub file_details: Vec<(String, FileReportInfo)>,
}

impl PackReport {
    /// Collect the figures of a packed document
    pub fn from_document(
        document: &ProjectDocument,
        output_file: String,
        duration: Duration,
        document_size: u64,
    ) -> Self {
        let file_details: Vec<(String, FileReportInfo)> = document
            .files
            .iter()
            .map(|f| {
                (
                    f.relative_path.clone(),
                    FileReportInfo {
                        lines: f.line_count(),
                        chars: f.char_count(),
                    },
                )
            })
            .collect();

        Self {
            output_file,
            duration,
            files_processed: file_details.len(),
            total_lines: file_details.iter().map(|(_, i)| i.lines).sum(),
            total_chars: file_details.iter().map(|(_, i)| i.chars).sum(),
            document_size,
            file_details,
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Metric")]
    key: String,

    #[tabled(rename = "Value")]
    value: String,
}

/// Report generator for pack and unpack runs
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string for a pack run
    pub fn generate_pack_report(&self, report: &PackReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => {
                let files_title = if report.file_details.len() > 15 {
                    "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT"
                } else {
                    "📋  PACKED FILES"
                };
                format!(
                    "{}\n{}\n\n{}\n{}",
                    files_title,
                    self.create_files_table(report),
                    "✅  PACK COMPLETE",
                    self.create_pack_summary(report)
                )
            }
        }
    }

    /// Generate a report string for an unpack run
    pub fn generate_unpack_report(&self, result: &UnpackResult, target: &str) -> String {
        match self.format {
            ReportFormat::ConsoleTable => {
                let summary = styled(Table::new(vec![
                    SummaryRow {
                        key: "📂 Target".to_string(),
                        value: target.to_string(),
                    },
                    SummaryRow {
                        key: "🏷️ Root Name".to_string(),
                        value: result.root_name.clone(),
                    },
                    SummaryRow {
                        key: "📄 Files Written".to_string(),
                        value: format_number(result.written.len()),
                    },
                    SummaryRow {
                        key: "⚠️ Warnings".to_string(),
                        value: format_number(result.warnings.len()),
                    },
                ]));

                if result.is_clean() {
                    return format!("✅  UNPACK COMPLETE\n{}", summary);
                }

                #[derive(Tabled)]
                struct WarningRow {
                    #[tabled(rename = "File Path")]
                    path: String,
                    #[tabled(rename = "Reason")]
                    reason: String,
                }

                let warnings = styled(Table::new(result.warnings.iter().map(|w| WarningRow {
                    path: truncate_path(&w.path, 60),
                    reason: w.reason.clone(),
                })));
                format!(
                    "⚠️  FILES NOT CREATED\n{}\n\n✅  UNPACK COMPLETE\n{}",
                    warnings, summary
                )
            }
        }
    }

    /// Print a pack report to stderr
    pub fn print_pack_report(&self, report: &PackReport) {
        eprintln!("\n{}", self.generate_pack_report(report));
    }

    /// Print an unpack report to stderr
    pub fn print_unpack_report(&self, result: &UnpackResult, target: &str) {
        eprintln!("\n{}", self.generate_unpack_report(result, target));
    }

    fn create_pack_summary(&self, report: &PackReport) -> String {
        let rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Processed".to_string(),
                value: format_number(report.files_processed),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: format_number(report.total_lines),
            },
            SummaryRow {
                key: "🔤 Total Characters".to_string(),
                value: format_number(report.total_chars),
            },
            SummaryRow {
                key: "📦 Document Size".to_string(),
                value: format_file_size(report.document_size),
            },
        ];
        styled(Table::new(rows))
    }

    fn create_files_table(&self, report: &PackReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Chars")]
            chars: String,
        }

        let mut files: Vec<_> = report.file_details.iter().collect();
        if files.len() > 15 {
            files.sort_by(|(_, a), (_, b)| b.chars.cmp(&a.chars));
            files.truncate(10);
        }

        let rows: Vec<FileRow> = files
            .iter()
            .map(|(path, info)| FileRow {
                path: truncate_path(path, 60),
                lines: format_number(info.lines),
                chars: format_number(info.chars),
            })
            .collect();

        styled(Table::new(rows))
    }
}

fn styled(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Padding::new(1, 1, 0, 0))
        .with(Modify::new(Columns::new(..)).with(Alignment::left()));
    table.to_string()
}
