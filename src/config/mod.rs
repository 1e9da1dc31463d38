// ==========================================
// 保险业务数据导入 - 配置层
// ==========================================
// 职责: 系统配置读取（带默认值）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::ImportConfigReader;
