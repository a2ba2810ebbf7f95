use crate::types::{FileReportEntry, ListedFile};
use chrono::{DateTime, Local, TimeZone};
use comfy_table::{Attribute, Cell, Table};
use std::fmt::Display;

/// `yyyy-MM-dd HH:mm:ss.fff`, 24-hour clock, fraction truncated to milliseconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[must_use]
pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// One entry per listed file, in listing order, with creation times in local time.
#[must_use]
pub fn build_report(files: &[ListedFile]) -> Vec<FileReportEntry> {
    files
        .iter()
        .map(|f| {
            let created: DateTime<Local> = f.created.into();
            FileReportEntry {
                file_name: f.name.clone(),
                creation_time: format_timestamp(&created),
            }
        })
        .collect()
}

#[must_use]
pub fn report_table(entries: &[FileReportEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_HORIZONTAL_ONLY);
    table.set_header(vec![
        Cell::new("FileName").add_attribute(Attribute::Bold),
        Cell::new("CreationTime (with ms)").add_attribute(Attribute::Bold),
    ]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(&entry.file_name),
            Cell::new(&entry.creation_time),
        ]);
    }

    table
}

pub fn print_report_table(entries: &[FileReportEntry]) {
    if entries.is_empty() {
        return;
    }
    println!("{}", report_table(entries));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, NaiveDate, Utc};
    use std::time::SystemTime;

    fn local_time(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: i64) -> SystemTime {
        let base = Local.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap();
        (base + Duration::milliseconds(ms)).into()
    }

    #[test]
    fn test_format_timestamp_pads_fields() {
        let t = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_milli_opt(7, 4, 9, 5)
            .unwrap()
            .and_utc();
        assert_eq!(format_timestamp(&t), "2024-03-05 07:04:09.005");
    }

    #[test]
    fn test_format_timestamp_truncates_sub_millisecond() {
        let t = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .unwrap()
            .and_utc();
        assert_eq!(format_timestamp(&t), "2024-01-01 23:59:59.999");
    }

    #[test]
    fn test_format_timestamp_keeps_given_offset() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let t = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap()
            .with_timezone(&offset);
        assert_eq!(format_timestamp(&t), "2024-01-01 09:00:00.000");
    }

    #[test]
    fn test_build_report_formats_in_listing_order() {
        let files = vec![
            ListedFile {
                name: "b.txt".to_string(),
                created: local_time(2024, 1, 2, 9, 30, 0, 5),
            },
            ListedFile {
                name: "a.txt".to_string(),
                created: local_time(2024, 1, 1, 10, 0, 0, 123),
            },
        ];

        let report = build_report(&files);
        assert_eq!(
            report,
            vec![
                FileReportEntry {
                    file_name: "b.txt".to_string(),
                    creation_time: "2024-01-02 09:30:00.005".to_string(),
                },
                FileReportEntry {
                    file_name: "a.txt".to_string(),
                    creation_time: "2024-01-01 10:00:00.123".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_build_report_keeps_duplicate_timestamps() {
        let t = local_time(2024, 6, 1, 12, 0, 0, 0);
        let files = vec![
            ListedFile { name: "x".to_string(), created: t },
            ListedFile { name: "y".to_string(), created: t },
        ];

        let report = build_report(&files);
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].creation_time, report[1].creation_time);
    }

    #[test]
    fn test_report_table_has_one_row_per_entry() {
        let entries = vec![
            FileReportEntry {
                file_name: "a.txt".to_string(),
                creation_time: "2024-01-01 10:00:00.123".to_string(),
            },
            FileReportEntry {
                file_name: "report,final.txt".to_string(),
                creation_time: "2024-01-02 09:30:00.005".to_string(),
            },
        ];

        let table = report_table(&entries);
        assert_eq!(table.row_iter().count(), 2);

        let rendered = table.to_string();
        assert!(rendered.contains("FileName"));
        assert!(rendered.contains("CreationTime (with ms)"));
        assert!(rendered.contains("report,final.txt"));
        assert!(rendered.contains("2024-01-02 09:30:00.005"));
    }
}
