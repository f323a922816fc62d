//! CSV 解析与表头匹配

use std::collections::HashMap;

use csv::ReaderBuilder;

use crate::errors::{Result, TutorHubError};

/// 导入列定义：表头可以是 key 或任一别名，比较时忽略大小写
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub key: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
    /// 模板示例行中的取值
    pub example: &'static str,
}

impl ColumnSpec {
    pub const fn required(
        key: &'static str,
        aliases: &'static [&'static str],
        example: &'static str,
    ) -> Self {
        Self {
            key,
            aliases,
            required: true,
            example,
        }
    }

    pub const fn optional(
        key: &'static str,
        aliases: &'static [&'static str],
        example: &'static str,
    ) -> Self {
        Self {
            key,
            aliases,
            required: false,
            example,
        }
    }

    fn matches(&self, header: &str) -> bool {
        let header = header.trim().to_lowercase();
        header == self.key
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_lowercase() == header)
    }
}

/// 一条数据记录，只保存非空的列值
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRecord {
    /// 物理记录号，表头为第 1 行
    pub row: u64,
    values: HashMap<&'static str, String>,
}

impl CsvRecord {
    pub fn new(row: u64) -> Self {
        Self {
            row,
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    fn insert(&mut self, key: &'static str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.values.insert(key, value.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 解析 CSV 文本，返回按表头映射后的记录
///
/// 空行与全部为空的记录被跳过，但仍占用记录号。
pub fn parse_csv(text: &str, columns: &[ColumnSpec]) -> Result<Vec<CsvRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(TutorHubError::import_format("CSV file has no header row"));
    }

    let mapping: Vec<Option<&'static str>> = headers
        .iter()
        .map(|header| {
            columns
                .iter()
                .find(|column| column.matches(header))
                .map(|column| column.key)
        })
        .collect();

    let missing: Vec<&str> = columns
        .iter()
        .filter(|column| column.required && !mapping.contains(&Some(column.key)))
        .map(|column| column.key)
        .collect();
    if !missing.is_empty() {
        return Err(TutorHubError::import_format(format!(
            "Missing required column(s): {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    let mut row = 1;
    for result in reader.records() {
        let raw = result?;
        row += 1;

        let mut record = CsvRecord::new(row);
        for (index, value) in raw.iter().enumerate() {
            if let Some(Some(key)) = mapping.get(index) {
                record.insert(key, value);
            }
        }
        if !record.is_empty() {
            records.push(record);
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnSpec] = &[
        ColumnSpec::required("name", &["Name", "名前", "氏名"], "田中"),
        ColumnSpec::optional("notes", &["備考", "Memo"], ""),
    ];

    #[test]
    fn test_quoted_fields_and_row_numbers() {
        let text = "name,notes\n\"Tanaka, Ken\",\"says \"\"hi\"\"\"\n\"佐藤\",\"line one\nline two\"\n鈴木,\n";
        let records = parse_csv(text, COLUMNS).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].row, 2);
        assert_eq!(records[0].get("name"), Some("Tanaka, Ken"));
        assert_eq!(records[0].get("notes"), Some("says \"hi\""));

        assert_eq!(records[1].row, 3);
        assert_eq!(records[1].get("notes"), Some("line one\nline two"));

        // 嵌入换行的记录只占一个记录号
        assert_eq!(records[2].row, 4);
        assert_eq!(records[2].get("name"), Some("鈴木"));
        assert_eq!(records[2].get("notes"), None);
    }

    #[test]
    fn test_header_aliases_are_case_insensitive() {
        let text = "氏名,MEMO,unknown\n田中,first,ignored\n";
        let records = parse_csv(text, COLUMNS).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name"), Some("田中"));
        assert_eq!(records[0].get("notes"), Some("first"));
        assert_eq!(records[0].get("unknown"), None);

        let records = parse_csv(" NAME \nx\n", COLUMNS).unwrap();
        assert_eq!(records[0].get("name"), Some("x"));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = "name\n田中\n\n\n鈴木\n,\n";
        let records = parse_csv(text, COLUMNS).unwrap();
        let names: Vec<_> = records.iter().filter_map(|r| r.get("name")).collect();
        assert_eq!(names, vec!["田中", "鈴木"]);
        assert_eq!(records[0].row, 2);
        assert_eq!(records[1].row, 3);
    }

    #[test]
    fn test_missing_required_column() {
        let err = parse_csv("notes\nhello\n", COLUMNS).unwrap_err();
        assert!(matches!(err, TutorHubError::ImportFormat(_)));
        assert!(err.message().contains("name"));

        let err = parse_csv("", COLUMNS).unwrap_err();
        assert!(matches!(err, TutorHubError::ImportFormat(_)));
    }

    #[test]
    fn test_short_rows_are_allowed() {
        let text = "name,notes\n田中\n";
        let records = parse_csv(text, COLUMNS).unwrap();
        assert_eq!(records[0].get("name"), Some("田中"));
        assert_eq!(records[0].get("notes"), None);
    }
}
