// ==========================================
// 人事后台 - 命令行入口
// ==========================================
// 子命令: init-db / template / import / list
// 导入退出码: 0 = 全部成功(201)，2 = 部分失败(207)，1 = 文件无效或系统错误
// ==========================================

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hr_backoffice::api::{ApiError, ImportStatus};
use hr_backoffice::app::{get_default_db_path, AppState};
use hr_backoffice::logging;

#[derive(Parser)]
#[command(name = "hr-backoffice")]
#[command(version, about = "HR back office: employee records and CSV bulk import")]
struct Cli {
    /// Path to the SQLite database (defaults to BACKOFFICE_DB_PATH or the user data dir)
    #[arg(long, global = true)]
    db: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database schema
    InitDb,
    /// Print the CSV import template
    Template,
    /// Import employees from a CSV file
    Import {
        /// CSV file to import
        file: PathBuf,
    },
    /// List employees, newest first
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!(version = hr_backoffice::VERSION, "{}", hr_backoffice::APP_NAME);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "命令执行失败");
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "使用数据库");

    let state = AppState::new(db_path).await.map_err(anyhow::Error::msg)?;

    match cli.command {
        Command::InitDb => {
            println!("database ready: {}", state.db_path);
            Ok(ExitCode::SUCCESS)
        }
        Command::Template => {
            print!("{}", state.import_api.get_import_template());
            Ok(ExitCode::SUCCESS)
        }
        Command::Import { file } => {
            match state.import_api.import_employees_from_file(&file).await {
                Ok(response) => {
                    println!("{}", serde_json::to_string_pretty(&response.result)?);
                    Ok(match response.status {
                        ImportStatus::Created => ExitCode::SUCCESS,
                        ImportStatus::MultiStatus => ExitCode::from(2),
                    })
                }
                Err(ApiError::InvalidImportFile(message)) => {
                    eprintln!("{}", message);
                    Ok(ExitCode::from(1))
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::List => {
            let employees = state.employee_api.list_employees()?;
            println!("{}", serde_json::to_string_pretty(&employees)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
