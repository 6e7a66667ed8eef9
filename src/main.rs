// ==========================================
// 库存资产管理系统 - 命令行入口
// ==========================================
// 子命令: init-db / seed-demo / import / export / template
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};

use inventory_hub::app::{get_default_db_path, Anonymous, AppState, CurrentUserProvider, FixedUser};
use inventory_hub::db::{init_schema, open_sqlite_connection, read_schema_version};
use inventory_hub::exporter::DirectorySink;
use inventory_hub::repository::{TaxonomyRepository, UserRepository};
use inventory_hub::{logging, ExportFormat, ExportSelection};

#[derive(Parser)]
#[command(name = "inventory-hub", version, about = "库存资产管理系统 - 导入/导出")]
struct Cli {
    /// 数据库文件路径（默认: 用户数据目录,可用 INVENTORY_HUB_DB_PATH 覆盖）
    #[arg(long, global = true)]
    db: Option<String>,

    /// 以 JSON 行输出日志
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 建表（幂等）
    InitDb,

    /// 写入演示用户与分类树
    SeedDemo {
        #[arg(long, default_value = "demo@inventory.local")]
        email: String,
        #[arg(long, default_value = "Demo User")]
        name: String,
    },

    /// 导入物品表格（.xlsx / .csv）
    Import {
        #[command(flatten)]
        user: UserArg,
        file: PathBuf,
    },

    /// 导出所选行动/包裹
    Export {
        #[command(flatten)]
        user: UserArg,
        /// 行动 id（可重复）
        #[arg(long = "operation", value_name = "ID")]
        operations: Vec<i64>,
        /// 包裹 id（可重复）
        #[arg(long = "package", value_name = "ID")]
        packages: Vec<i64>,
        #[arg(long, default_value = "xlsx", value_parser = parse_format)]
        format: ExportFormat,
        /// 包含明细（缺省读配置 export.include_details）
        #[arg(long, conflicts_with = "summary_only")]
        details: bool,
        /// 仅导出表头
        #[arg(long)]
        summary_only: bool,
        /// 输出目录
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// 生成导入模板
    Template {
        #[arg(long, default_value = "xlsx", value_parser = parse_format)]
        format: ExportFormat,
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct UserArg {
    /// 当前用户 id
    #[arg(long = "user", value_name = "USER_ID")]
    user_id: i64,
}

fn parse_format(value: &str) -> Result<ExportFormat, String> {
    ExportFormat::parse(value).ok_or_else(|| format!("不支持的格式: {}（xlsx / csv）", value))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn open_state(db_path: String, user: Arc<dyn CurrentUserProvider>) -> anyhow::Result<AppState> {
    AppState::new(db_path, user).map_err(|e| anyhow!(e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("系统版本: {}", inventory_hub::VERSION);
    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    match cli.command {
        Command::InitDb => {
            let conn = open_sqlite_connection(&db_path).context("无法打开数据库")?;
            init_schema(&conn)?;
            println!("schema_version = {:?}", read_schema_version(&conn)?);
        }

        Command::SeedDemo { email, name } => {
            let state = open_state(db_path, Arc::new(Anonymous))?;
            let users = UserRepository::from_connection(state.conn.clone());
            let user = match users.find_by_email(&email)? {
                Some(user) => user,
                None => users.create(&email, &name)?,
            };

            let taxonomy = TaxonomyRepository::from_connection(state.conn.clone());
            if taxonomy.find_categories()?.is_empty() {
                for (category, family, sub_family) in [
                    ("Audio", "Microphones", "Wireless"),
                    ("Audio", "Speakers", "Active"),
                    ("Lighting", "Spots", "LED"),
                ] {
                    let category_id = match taxonomy
                        .find_categories()?
                        .into_iter()
                        .find(|c| c.name == category)
                    {
                        Some(existing) => existing.id,
                        None => taxonomy.create_category(category)?.id,
                    };
                    let family_id = taxonomy.create_family(category_id, family)?.id;
                    taxonomy.create_sub_family(family_id, sub_family)?;
                }
            }
            print_json(&user)?;
        }

        Command::Import { user, file } => {
            let state = open_state(db_path, Arc::new(FixedUser(user.user_id)))?;
            let user_id = state.require_user()?;
            let path = file.to_string_lossy().to_string();
            let response = state.import_api.import_items(user_id, &path).await?;
            print_json(&response)?;
        }

        Command::Export {
            user,
            operations,
            packages,
            format,
            details,
            summary_only,
            out,
        } => {
            let state = open_state(db_path, Arc::new(FixedUser(user.user_id)))?;
            let user_id = state.require_user()?;
            let selection = ExportSelection::new(operations, packages);
            let include_details = match (details, summary_only) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let sink = DirectorySink::new(out);
            let response = state
                .export_api
                .export_inventory(user_id, &selection, format, include_details, &sink)
                .await?;
            print_json(&response)?;
        }

        Command::Template { format, out } => {
            let state = open_state(db_path, Arc::new(Anonymous))?;
            let sink = DirectorySink::new(out);
            let saved = state.export_api.download_template(format, &sink).await?;
            print_json(&saved)?;
        }
    }

    Ok(())
}
