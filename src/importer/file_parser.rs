// ==========================================
// 社員名簿管理 - 文件解析器实现
// ==========================================
// 职责: 文件读取与解析 → 表头 + RawRow（含文件行号）
// 支持: CSV (.csv) / Excel (.xlsx/.xls)
// ==========================================

use crate::domain::{columns, RawRow, FIRST_DATA_ROW_NUMBER};
use crate::importer::employee_importer_trait::FileParser;
use crate::importer::error::{ImportError, ParseResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const UTF8_BOM: char = '\u{feff}';

// ==========================================
// ParsedTable - 解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl ParsedTable {
    /// 校验表头是否恰好为模板列集合（顺序不限）
    pub fn check_headers(&self) -> ParseResult<()> {
        check_headers(&self.headers)
    }
}

/// 校验表头
///
/// # 规则
/// - 模板列必须全部存在
/// - 不允许模板以外的列，不允许重复列
/// - 空白表头单元格（行尾多余逗号）忽略
pub fn check_headers(headers: &[String]) -> ParseResult<()> {
    let mut seen = HashSet::new();
    let mut unexpected = Vec::new();

    for header in headers.iter().filter(|h| !h.is_empty()) {
        if !columns::EXPECTED.contains(&header.as_str()) || !seen.insert(header.as_str()) {
            unexpected.push(header.clone());
        }
    }

    let missing: Vec<String> = columns::EXPECTED
        .iter()
        .filter(|c| !seen.contains(**c))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() && unexpected.is_empty() {
        Ok(())
    } else {
        Err(ImportError::HeaderMismatch {
            missing,
            unexpected,
        })
    }
}

fn clean_header(raw: &str) -> String {
    raw.trim_start_matches(UTF8_BOM).trim().to_string()
}

fn check_file_exists(path: &Path) -> ParseResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 从任意 Reader 解析 CSV（UTF-8）
    pub fn parse_reader<R: Read>(&self, mut source: R) -> ParseResult<ParsedTable> {
        let mut content = String::new();
        source.read_to_string(&mut content)?;
        self.parse_str(&content)
    }

    /// 从字符串解析 CSV
    ///
    /// 行号按记录实际起始字节之前的换行数计算（csv 的 line() 不计入被跳过的空行）
    pub fn parse_str(&self, content: &str) -> ParseResult<ParsedTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致，缺失列按空值处理
            .from_reader(content.as_bytes());

        // 读取表头
        let headers: Vec<String> = reader.headers()?.iter().map(clean_header).collect();

        // 读取所有行
        let mut lines = LineCounter::new(content.as_bytes());
        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row_number = record
                .position()
                .map(|p| lines.line_at(p.byte()))
                .unwrap_or(idx + FIRST_DATA_ROW_NUMBER);

            let mut fields = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    fields.insert(header.clone(), value.trim().to_string());
                }
            }

            let row = RawRow::new(row_number, fields);

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }

            rows.push(row);
        }

        Ok(ParsedTable { headers, rows })
    }
}

/// 字节偏移 → 文件行号（偏移单调递增，增量计数）
struct LineCounter<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, byte: u64) -> usize {
        let mut end = (byte as usize).min(self.bytes.len());
        // csv 记录的起始偏移位于被跳过的空行之前
        while end < self.bytes.len() && matches!(self.bytes[end], b'\r' | b'\n') {
            end += 1;
        }
        if end > self.offset {
            self.line += self.bytes[self.offset..end]
                .iter()
                .filter(|b| **b == b'\n')
                .count();
            self.offset = end;
        }
        self.line
    }
}

impl FileParser for CsvParser {
    fn parse(&self, file_path: &Path) -> ParseResult<ParsedTable> {
        check_file_exists(file_path)?;

        // 检查扩展名
        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        self.parse_reader(file)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
// 只读取第一个工作表
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse(&self, file_path: &Path) -> ParseResult<ParsedTable> {
        check_file_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 表头所在的文件行号（calamine 行索引从 0 开始）
        let header_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无表头行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| clean_header(&cell.to_string()))
            .collect();

        let mut rows = Vec::new();
        for (idx, data_row) in sheet_rows.enumerate() {
            let mut fields = HashMap::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    fields.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }

            let row = RawRow::new(header_line + 1 + idx, fields);
            if row.is_blank() {
                continue;
            }

            rows.push(row);
        }

        Ok(ParsedTable { headers, rows })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 是否为支持的扩展名
    pub fn is_supported(path: &Path) -> bool {
        matches!(extension_of(path).as_str(), "csv" | "xlsx" | "xls")
    }
}

impl FileParser for UniversalFileParser {
    fn parse(&self, file_path: &Path) -> ParseResult<ParsedTable> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse(file_path),
            "xlsx" | "xls" => ExcelParser.parse(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const HEADER: &str = "会社名,姓,名,メールアドレス,部署,役職";

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_csv_rows_carry_file_line_numbers() {
        let file = csv_file(&[
            HEADER,
            "A社,山田,太郎,taro@example.com,営業部,部長",
            "A社,佐藤,花子,hanako@example.com,,課長",
        ]);

        let table = CsvParser.parse(file.path()).unwrap();

        assert!(table.check_headers().is_ok());
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].row_number, 2);
        assert_eq!(table.rows[1].row_number, 3);
        assert_eq!(table.rows[1].get(columns::DEPARTMENT), "");
        assert_eq!(table.rows[0].get(columns::EMAIL), "taro@example.com");
    }

    #[test]
    fn test_csv_values_are_trimmed_and_bom_stripped() {
        let table = CsvParser
            .parse_str("\u{feff}会社名,姓,名,メールアドレス,部署,役職\n A社 , 山田 ,太郎,t@example.com,,部長\n")
            .unwrap();

        assert_eq!(table.headers[0], "会社名");
        assert_eq!(table.rows[0].get(columns::COMPANY_NAME), "A社");
        assert_eq!(table.rows[0].get(columns::LAST_NAME), "山田");
    }

    #[test]
    fn test_csv_skips_blank_rows() {
        let table = CsvParser
            .parse_str("会社名,姓,名,メールアドレス,部署,役職\nA社,山田,太郎,t@example.com,,部長\n,,,,,\nB社,佐藤,花子,h@example.com,,課長\n")
            .unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].row_number, 4);
    }

    #[test]
    fn test_csv_line_numbers_count_empty_lines() {
        let table = CsvParser
            .parse_str("会社名,姓,名,メールアドレス,部署,役職\nA社,山田,太郎,t@example.com,,部長\n\nB社,佐藤,,h@example.com,,課長\n\n\nC社,鈴木,一郎,i@example.com,,主任\n")
            .unwrap();

        let numbers: Vec<usize> = table.rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![2, 4, 7]);
    }

    #[test]
    fn test_csv_line_numbers_with_crlf_and_quoted_newline() {
        let table = CsvParser
            .parse_str("会社名,姓,名,メールアドレス,部署,役職\r\n\"A社\n本社\",山田,太郎,t@example.com,,部長\r\n\r\nB社,佐藤,花子,h@example.com,,課長\r\n")
            .unwrap();

        let numbers: Vec<usize> = table.rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![2, 5]);
    }

    #[test]
    fn test_excel_first_sheet_rows_carry_sheet_row_numbers() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/employees.xlsx");

        let table = UniversalFileParser.parse(&path).unwrap();

        // 表头在第 2 行，第 4 行为空行，第 5 行缺少邮箱
        assert!(table.check_headers().is_ok());
        let numbers: Vec<usize> = table.rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![3, 5]);
        assert_eq!(table.rows[0].get(columns::COMPANY_NAME), "A社");
        assert_eq!(table.rows[0].get(columns::EMAIL), "taro@example.com");
        assert_eq!(table.rows[1].get(columns::EMAIL), "");
        assert_eq!(table.rows[1].get(columns::POSITION), "課長");
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let result = UniversalFileParser.parse(Path::new("employees.txt"));
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
        assert!(UniversalFileParser::is_supported(Path::new("名簿.CSV")));
    }

    #[test]
    fn test_check_headers_reports_missing_and_unexpected() {
        let headers: Vec<String> = ["会社名", "姓", "名", "メールアドレス", "部署", "備考", "姓"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        match check_headers(&headers) {
            Err(ImportError::HeaderMismatch {
                missing,
                unexpected,
            }) => {
                assert_eq!(missing, vec!["役職".to_string()]);
                assert_eq!(unexpected, vec!["備考".to_string(), "姓".to_string()]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_check_headers_accepts_any_order_and_trailing_blank() {
        let headers: Vec<String> = ["役職", "部署", "メールアドレス", "名", "姓", "会社名", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert!(check_headers(&headers).is_ok());
    }
}
