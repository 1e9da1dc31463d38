// ==========================================
// 保险业务数据导入 - 命令行入口
// ==========================================
// 用法:
//   insurance-import import <data_type> <file>
//   insurance-import list <data_type> [page] [size]
//   insurance-import get <data_type> <business_id>
//   insurance-import uploads
// ==========================================

use anyhow::{bail, Context};
use insurance_import::app::{get_default_db_path, AppState};
use insurance_import::{logging, ImportRequest};
use std::collections::BTreeMap;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", insurance_import::APP_NAME, insurance_import::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);
    let state = AppState::new(db_path).await.map_err(anyhow::Error::msg)?;

    let output = match (command.as_str(), &args[1..]) {
        ("import", [data_type, file]) => {
            let content = tokio::fs::read(file)
                .await
                .with_context(|| format!("无法读取文件: {}", file))?;
            let request = ImportRequest::new(data_type.as_str(), content).with_file_name(file.clone());
            let result = state.orchestrator.process(&request).await?;
            serde_json::to_string_pretty(&result)?
        }
        ("list", [data_type, rest @ ..]) => {
            let page = rest.first().map(|p| p.parse::<usize>()).transpose()?;
            let size = rest.get(1).map(|s| s.parse::<usize>()).transpose()?;
            let page = state
                .import_api
                .list_records(data_type, page, size, BTreeMap::new())
                .await?;
            serde_json::to_string_pretty(&page)?
        }
        ("get", [data_type, business_id]) => {
            let record = state.import_api.get_record(data_type, business_id).await?;
            serde_json::to_string_pretty(&record)?
        }
        ("uploads", []) => {
            let uploads = state.import_api.list_all_uploads().await?;
            serde_json::to_string_pretty(&uploads)?
        }
        _ => {
            print_usage();
            bail!("无效命令: {}", args.join(" "));
        }
    };

    println!("{}", output);
    Ok(())
}

fn print_usage() {
    println!("用法:");
    println!("  insurance-import import <data_type> <file>");
    println!("  insurance-import list <data_type> [page] [size]");
    println!("  insurance-import get <data_type> <business_id>");
    println!("  insurance-import uploads");
    println!();
    println!("data_type: {}", insurance_import::DataType::allowed_tags());
}
