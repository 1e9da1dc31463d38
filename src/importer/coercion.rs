// ==========================================
// 保险业务数据导入 - 字段转换规则
// ==========================================
// 职责: 七类构建器共享的单元格 → 类型化字段转换
// 规则:
// - 主键: 提供则 trim 后原样使用，否则合成 PREFIX-XXXXXXXX（批内唯一）
// - 数值: 必填缺省 0，可选缺省 None，非数值文本报错
// - 时间: 多格式宽松解析，必填缺省为本次导入时间戳
// - 布尔: 出现真值即 true，缺失为 false
// ==========================================

use crate::domain::import::RawRow;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

// 带时间部分的格式
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y%m%d%H%M%S",
];

// 仅日期的格式（时间取 00:00:00）
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%Y%m%d",
    "%d %B %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d-%b-%Y",
];

const FALSY_WORDS: &[&str] = &["false", "no", "n", "f", "off"];

// ==========================================
// ValidationError - 行内字段错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ==========================================
// IdentifierSource - 主键合成器
// ==========================================
// 记录本次导入已出现的主键，碰撞时重新生成
#[derive(Debug, Default)]
pub struct IdentifierSource {
    issued: HashSet<String>,
}

impl IdentifierSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 随机十六进制串（大写）
    pub fn upper_hex(len: usize) -> String {
        random_hex(len).to_uppercase()
    }

    /// 随机十六进制串（小写）
    pub fn lower_hex(len: usize) -> String {
        random_hex(len)
    }

    /// 合成 PREFIX-XXXXXXXX，保证批内不重复
    pub fn synthesize(&mut self, prefix: &str) -> String {
        loop {
            let candidate = format!("{}-{}", prefix, Self::upper_hex(8));
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// 登记文件中提供的主键（避免与合成值撞号）
    pub fn observe(&mut self, identifier: &str) {
        self.issued.insert(identifier.to_string());
    }

    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

fn random_hex(len: usize) -> String {
    let mut hex = String::with_capacity(len);
    while hex.len() < len {
        hex.push_str(&Uuid::new_v4().simple().to_string());
    }
    hex.truncate(len);
    hex
}

// ==========================================
// BuildContext - 单次导入共享的构建上下文
// ==========================================
#[derive(Debug)]
pub struct BuildContext {
    pub import_ts: NaiveDateTime, // 本次导入时间戳（必填时间缺省值）
    pub ids: IdentifierSource,
}

impl BuildContext {
    pub fn new(import_ts: NaiveDateTime) -> Self {
        Self {
            import_ts,
            ids: IdentifierSource::new(),
        }
    }
}

// ==========================================
// FieldReader - 按字段读取并转换
// ==========================================
pub struct FieldReader<'a> {
    row: &'a RawRow,
    ctx: &'a mut BuildContext,
}

impl<'a> FieldReader<'a> {
    pub fn new(row: &'a RawRow, ctx: &'a mut BuildContext) -> Self {
        Self { row, ctx }
    }

    fn raw(&self, field: &str) -> Option<&'a str> {
        let row: &'a RawRow = self.row;
        row.get(field).map(str::trim).filter(|v| !v.is_empty())
    }

    /// 业务主键
    pub fn identifier(&mut self, field: &str, prefix: &str) -> String {
        match self.raw(field) {
            Some(value) => {
                self.ctx.ids.observe(value);
                value.to_string()
            }
            None => self.ctx.ids.synthesize(prefix),
        }
    }

    /// 可选文本
    pub fn optional_text(&self, field: &str) -> Option<String> {
        self.raw(field).map(str::to_string)
    }

    /// 必填文本（固定缺省值）
    pub fn text_or(&self, field: &str, default: &str) -> String {
        self.optional_text(field)
            .unwrap_or_else(|| default.to_string())
    }

    /// 必填文本（缺省为合成引用 PREFIX-HEX）
    pub fn text_or_reference(&self, field: &str, prefix: &str, hex_len: usize) -> String {
        self.optional_text(field)
            .unwrap_or_else(|| format!("{}-{}", prefix, IdentifierSource::upper_hex(hex_len)))
    }

    /// 必填邮箱（缺省为 <local>XXXXXXXX@example.com）
    pub fn email_or_placeholder(&self, field: &str, local_prefix: &str) -> String {
        self.optional_text(field).unwrap_or_else(|| {
            format!(
                "{}{}@example.com",
                local_prefix,
                IdentifierSource::lower_hex(8)
            )
        })
    }

    /// 必填数值（缺省 0）
    pub fn amount(&self, field: &str) -> Result<f64, ValidationError> {
        Ok(self.optional_number(field)?.unwrap_or(0.0))
    }

    /// 可选数值
    pub fn optional_number(&self, field: &str) -> Result<Option<f64>, ValidationError> {
        self.raw(field)
            .map(|value| parse_number(value).ok_or_else(|| not_a_number(field, value)))
            .transpose()
    }

    /// 必填整数（缺省 0）
    pub fn count(&self, field: &str) -> Result<i64, ValidationError> {
        Ok(self.optional_integer(field)?.unwrap_or(0))
    }

    /// 可选整数（接受 700.0 这类整数值小数）
    pub fn optional_integer(&self, field: &str) -> Result<Option<i64>, ValidationError> {
        self.raw(field)
            .map(|value| {
                parse_integer(value).ok_or_else(|| {
                    ValidationError::new(
                        field,
                        format!("unable to parse '{}' as a whole number", value),
                    )
                })
            })
            .transpose()
    }

    /// 必填时间（缺省为导入时间戳）
    pub fn timestamp(&self, field: &str) -> Result<NaiveDateTime, ValidationError> {
        Ok(self.optional_timestamp(field)?.unwrap_or(self.ctx.import_ts))
    }

    /// 可选时间
    pub fn optional_timestamp(&self, field: &str) -> Result<Option<NaiveDateTime>, ValidationError> {
        self.raw(field)
            .map(|value| {
                parse_timestamp(value).ok_or_else(|| {
                    ValidationError::new(field, format!("unable to parse '{}' as a date", value))
                })
            })
            .transpose()
    }

    /// 布尔标记
    pub fn flag(&self, field: &str) -> bool {
        self.raw(field).map(is_truthy).unwrap_or(false)
    }
}

fn not_a_number(field: &str, value: &str) -> ValidationError {
    ValidationError::new(field, format!("unable to parse '{}' as a number", value))
}

/// 解析有限浮点数（拒绝 NaN / inf）
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// 解析整数（允许整数值小数）
pub fn parse_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(n) = value.parse::<i64>() {
        return Some(n);
    }

    parse_number(value)
        .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
        .map(|n| n as i64)
}

/// 宽松解析时间
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// 真值判定: 数值非零为真；文本除 false/no/n/f/off 外为真
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    if let Some(n) = parse_number(value) {
        return n != 0.0;
    }

    let lowered = value.to_lowercase();
    !FALSY_WORDS.contains(&lowered.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn row(cells: &[(&str, &str)]) -> RawRow {
        let mut row = RawRow::new(1);
        for (column, value) in cells {
            row.push(*column, Some(value.to_string()));
        }
        row
    }

    #[test]
    fn test_identifier_passthrough_is_trimmed() {
        let row = row(&[("payment_id", "  PAY-CUSTOM-1  ")]);
        let mut ctx = BuildContext::new(ts());
        let mut reader = FieldReader::new(&row, &mut ctx);

        assert_eq!(reader.identifier("payment_id", "PAY"), "PAY-CUSTOM-1");
    }

    #[test]
    fn test_identifier_synthesized_shape() {
        let row = row(&[]);
        let mut ctx = BuildContext::new(ts());
        let mut reader = FieldReader::new(&row, &mut ctx);

        let id = reader.identifier("claim_number", "CLM");
        assert_eq!(id.len(), "CLM-".len() + 8);
        assert!(id.starts_with("CLM-"));
        assert!(id[4..]
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_synthesized_identifiers_unique_in_batch() {
        let mut ids = IdentifierSource::new();
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            assert!(seen.insert(ids.synthesize("AGT")));
        }
        assert_eq!(ids.issued_count(), 2000);
    }

    #[test]
    fn test_amount_defaults_and_errors() {
        let row = row(&[("amount", "12.50"), ("processing_fee", "abc")]);
        let mut ctx = BuildContext::new(ts());
        let reader = FieldReader::new(&row, &mut ctx);

        assert_eq!(reader.amount("amount").unwrap(), 12.5);
        assert_eq!(reader.amount("deductible").unwrap(), 0.0);
        assert_eq!(reader.optional_number("approved_amount").unwrap(), None);

        let err = reader.amount("processing_fee").unwrap_err();
        assert_eq!(err.field, "processing_fee");
        assert_eq!(err.to_string(), "processing_fee: unable to parse 'abc' as a number");
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(" -4.5 "), Some(-4.5));
    }

    #[test]
    fn test_integer_accepts_whole_decimals() {
        assert_eq!(parse_integer("700"), Some(700));
        assert_eq!(parse_integer("700.0"), Some(700));
        assert_eq!(parse_integer("700.5"), None);
        assert_eq!(parse_integer("seven"), None);
    }

    #[test]
    fn test_timestamp_formats() {
        let expected_date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let midnight = expected_date.and_time(NaiveTime::MIN);

        for input in [
            "2024-03-09",
            "2024/03/09",
            "03/09/2024",
            "09.03.2024",
            "20240309",
            "9 March 2024",
            "March 9, 2024",
            "Mar 9, 2024",
            "09-Mar-2024",
        ] {
            assert_eq!(parse_timestamp(input), Some(midnight), "input {}", input);
        }

        let with_time = expected_date.and_hms_opt(14, 5, 30).unwrap();
        for input in [
            "2024-03-09 14:05:30",
            "2024-03-09T14:05:30",
            "2024-03-09T14:05:30Z",
            "2024-03-09T16:05:30+02:00",
            "2024/03/09 14:05:30",
            "03/09/2024 14:05:30",
            "20240309140530",
        ] {
            assert_eq!(parse_timestamp(input), Some(with_time), "input {}", input);
        }

        assert_eq!(parse_timestamp("not-a-date"), None);
        assert_eq!(parse_timestamp("2024-13-45"), None);
    }

    #[test]
    fn test_required_timestamp_defaults_to_import_time() {
        let row = row(&[("due_date", "someday")]);
        let mut ctx = BuildContext::new(ts());
        let reader = FieldReader::new(&row, &mut ctx);

        assert_eq!(reader.timestamp("payment_date").unwrap(), ts());
        assert_eq!(reader.optional_timestamp("renewal_date").unwrap(), None);
        assert!(reader.optional_timestamp("due_date").is_err());
    }

    #[test]
    fn test_truthiness() {
        for value in ["true", "TRUE", "yes", "Y", "1", "2.5", "x"] {
            assert!(is_truthy(value), "{} should be true", value);
        }
        for value in ["false", "No", "n", "F", "off", "0", "0.0"] {
            assert!(!is_truthy(value), "{} should be false", value);
        }
    }

    #[test]
    fn test_placeholders() {
        let row = row(&[]);
        let mut ctx = BuildContext::new(ts());
        let reader = FieldReader::new(&row, &mut ctx);

        let email = reader.email_or_placeholder("email", "customer");
        assert!(email.starts_with("customer"));
        assert!(email.ends_with("@example.com"));
        assert_eq!(email.len(), "customer".len() + 8 + "@example.com".len());

        let txn = reader.text_or_reference("transaction_reference", "TXN", 12);
        assert!(txn.starts_with("TXN-"));
        assert_eq!(txn.len(), 16);
        assert_eq!(reader.text_or("currency", "USD"), "USD");
    }
}
