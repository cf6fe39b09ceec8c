//! 薯条启动套件命令行工具
//!
//! 提供配置检查与版本查询等辅助命令。

use clap::{Parser, Subcommand};
use fries_web::{App, AppPaths, Logger, LoggerConfig, Result, VERSION};
use std::path::PathBuf;
use std::process;

/// 命令行参数定义
#[derive(Parser)]
#[command(name = "fries-web")]
#[command(about = "薯条 Web 启动套件内核", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// 应用根目录
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// 日志级别
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// 子命令
    #[command(subcommand)]
    command: Commands,
}

/// 支持的子命令
#[derive(Subcommand)]
enum Commands {
    /// 显示版本信息
    Version,
    /// 检查应用配置是否可加载
    CheckConfig {
        /// 额外检查的配置域
        #[arg(short, long)]
        domain: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let logger_config = LoggerConfig::builder().level(&cli.log_level).build();
    let _guard = Logger::try_init(logger_config);

    let result = match cli.command {
        Commands::Version => {
            print_version();
            Ok(())
        }
        Commands::CheckConfig { domain } => check_config(&cli.root, &domain),
    };

    if let Err(e) = result {
        eprintln!("错误: {}", e);
        process::exit(1);
    }
}

/// 打印版本信息
fn print_version() {
    println!("┌─────────────────────────────────────┐");
    println!("│  Fries Web - 薯条启动套件内核       │");
    println!("└─────────────────────────────────────┘");
    println!("版本: {}", VERSION);
}

/// 检查应用配置
///
/// 加载 `app` 配置域并入应用设置，再逐个加载指定的附加配置域。
fn check_config(root: &PathBuf, domains: &[String]) -> Result<()> {
    let app = App::new(AppPaths::new(root));

    println!("检查配置目录: {}", app.paths.config_path().display());

    app.config.borrow_mut().load_file("app", "")?;
    println!("✓ 应用设置配置有效（{} 项）", app.settings.borrow().len());

    for domain in domains {
        let value = app.config.borrow_mut().get(domain)?;
        let kind = match value {
            serde_json::Value::Object(ref map) => format!("映射（{} 项）", map.len()),
            serde_json::Value::Array(ref seq) => format!("序列（{} 项）", seq.len()),
            _ => "标量".to_string(),
        };
        println!("✓ 配置域 '{}' 有效: {}", domain, kind);
    }

    println!("配置检查通过");
    Ok(())
}
