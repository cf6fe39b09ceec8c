//! 基本使用示例
//!
//! 本示例展示了薯条启动套件内核的基本使用方法，包括：
//!
//! - 搭建应用目录与模块目录
//! - 执行启动序列
//! - 读取模块配置
//! - 发布模块资源
//!
//! # 运行示例
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use fries_web::{
    boot, App, AppPaths, BootOptions, ModuleProvider, ModuleRegistry, ResourceManifest,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

/// 示例博客模块
struct BlogModule {
    root: PathBuf,
}

impl ModuleProvider for BlogModule {
    fn accessor(&self) -> &str {
        "blog"
    }

    fn resources(&self) -> ResourceManifest {
        ResourceManifest::new()
            .with_config("config")
            .with_routes("routes.yaml")
            .with_assets("assets")
    }

    fn root(&self) -> PathBuf {
        self.root.clone()
    }

    fn register(&self, app: &App) -> anyhow::Result<()> {
        app.config.borrow_mut().set("blog.cache_ttl", json!(60));
        Ok(())
    }
}

/// 搭建演示用的应用目录结构
fn scaffold(base: &Path) -> std::io::Result<()> {
    let config_dir = base.join("app/config");
    fs::create_dir_all(&config_dir)?;
    fs::write(
        config_dir.join("app.yaml"),
        "debug: true\nenable_module: true\n",
    )?;
    fs::write(base.join("app/routes.yaml"), "# 应用路由\n")?;

    let blog = base.join("modules/blog");
    fs::create_dir_all(blog.join("config"))?;
    fs::create_dir_all(blog.join("assets/css"))?;
    fs::write(blog.join("config/blog.yaml"), "posts_per_page: 10\n")?;
    fs::write(blog.join("routes.yaml"), "# blog 路由\n")?;
    fs::write(blog.join("assets/css/blog.css"), ".post {}\n")?;

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== 薯条启动套件基本使用示例 ===\n");

    // -------------------------------------------------------------------------
    // 1. 搭建演示目录
    // -------------------------------------------------------------------------
    println!("1. 搭建演示目录...");

    let workdir = tempfile::TempDir::new()?;
    scaffold(workdir.path())?;
    println!("   应用根目录: {}", workdir.path().display());
    println!("   ✅ 目录搭建完成\n");

    // -------------------------------------------------------------------------
    // 2. 执行启动序列
    // -------------------------------------------------------------------------
    println!("2. 执行启动序列...");

    let app = App::new(AppPaths::new(workdir.path()));
    let mut registry = ModuleRegistry::new();

    let blog_root = workdir.path().join("modules/blog");
    let options = BootOptions::new()
        .routes_file(workdir.path().join("app/routes.yaml"))
        .module(Box::new(move |_app: &App| {
            Box::new(BlogModule {
                root: blog_root.clone(),
            }) as Box<dyn ModuleProvider>
        }));

    let plan = boot(&app, &mut registry, options)?;
    println!("   已注册模块: {:?}", registry.accessors());
    println!("   装载计划（路由文件，模块在前应用在后）:");
    for file in &plan.route_files {
        println!("   - {}", file.display());
    }
    println!("   ✅ 启动序列完成\n");

    // -------------------------------------------------------------------------
    // 3. 读取模块配置
    // -------------------------------------------------------------------------
    println!("3. 读取模块配置...");

    let posts_per_page: u32 = app.config.borrow_mut().get_as("blog.posts_per_page")?;
    let cache_ttl: u32 = app.config.borrow_mut().get_as("blog.cache_ttl")?;
    println!("   blog.posts_per_page = {}", posts_per_page);
    println!("   blog.cache_ttl      = {}（注册钩子写入）", cache_ttl);
    println!("   ✅ 配置读取成功\n");

    // -------------------------------------------------------------------------
    // 4. 发布模块资源
    // -------------------------------------------------------------------------
    println!("4. 发布模块资源...");

    registry.publish_asset(&app, "blog")?;
    let published = app.paths.public_assets_path().join("blog/css/blog.css");
    println!("   已发布: {}", published.display());
    println!("   ✅ 资源发布成功\n");

    println!("=== 示例结束 ===");
    Ok(())
}
