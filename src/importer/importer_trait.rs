// ==========================================
// 保险业务数据导入 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// ==========================================

use crate::domain::field_table::FieldSpec;
use crate::domain::import::{FileFormat, RawRow};
use crate::domain::records::TypedRecord;
use crate::domain::types::DataType;
use crate::importer::coercion::{BuildContext, ValidationError};
use crate::importer::error::ImporterResult;

// ==========================================
// SpreadsheetReader Trait
// ==========================================
// 用途: 文件字节 → 原始行（阶段 0）
// 实现者: ExcelReader, CsvReader, UniversalReader
pub trait SpreadsheetReader: Send + Sync {
    /// 解析文件内容为原始行
    ///
    /// # 参数
    /// - content: 文件字节（整体加载）
    /// - hint: 由文件名推断的格式提示
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 按源文件顺序的数据行（不含表头）
    /// - Err(ImportError::Format): 内容不是可解析的表格
    fn read(&self, content: &[u8], hint: Option<FileFormat>) -> ImporterResult<Vec<RawRow>>;
}

// ==========================================
// RecordBuilder Trait
// ==========================================
// 用途: 单行 → 强类型记录（阶段 2）
// 实现者: PaymentBuilder / ReceiptBuilder / ... / AuditLogBuilder
pub trait RecordBuilder: Send + Sync {
    /// 构建器对应的数据类型
    fn data_type(&self) -> DataType;

    /// 实体字段表
    fn fields(&self) -> &'static [FieldSpec];

    /// 将归一化后的行构建为记录
    ///
    /// # 参数
    /// - row: 归一化后的行
    /// - ctx: 本次导入共享的构建上下文（导入时间戳 + 主键合成器）
    ///
    /// # 返回
    /// - Ok(TypedRecord): 构建成功
    /// - Err(ValidationError): 某字段无法转换（仅影响本行）
    fn build(&self, row: &RawRow, ctx: &mut BuildContext) -> Result<TypedRecord, ValidationError>;
}
