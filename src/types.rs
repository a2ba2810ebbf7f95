use serde::{Deserialize, Serialize};
use std::time::SystemTime;

pub const REPORT_FILE_NAME: &str = "FileCreationTime_Report.csv";
pub const REPORT_HEADER: [&str; 2] = ["FileName", "CreationTime (with ms)"];

/// A regular file found directly inside the scanned directory.
#[derive(Debug, Clone)]
pub struct ListedFile {
    pub name: String,
    pub created: SystemTime,
}

/// One row of the report. Field names double as the CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReportEntry {
    #[serde(rename = "FileName")]
    pub file_name: String,
    #[serde(rename = "CreationTime (with ms)")]
    pub creation_time: String,
}
