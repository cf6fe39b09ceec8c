//! 配置容器集成测试
//!
//! 测试配置容器跨命名空间的完整工作流程。

use fries_web::{shared, AppSettings, ConfigContainer, CoreError};
use serde_json::json;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

/// 完整的多目录解析工作流程
#[test]
fn test_full_resolution_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().join("app/config");
    let vendor = temp_dir.path().join("vendor/config");
    let module_dir = temp_dir.path().join("modules/shop/config");

    write_file(&base, "database.yaml", "host: base-db\nport: 5432\n");
    write_file(&vendor, "database.yaml", "host: vendor-db\n");
    write_file(&vendor, "queue.yaml", "driver: redis\nworkers: 4\n");
    write_file(&module_dir, "shop.yaml", "currency: CNY\ntax:\n  rate: 0.13\n");

    let settings = shared(AppSettings::default());
    let mut config = ConfigContainer::new(&base, Rc::clone(&settings));
    config.add_directory(&vendor, "");
    config.add_directory(&module_dir, "shop");

    // 主目录优先于无名搜索目录
    assert_eq!(config.get("database.host").unwrap(), json!("base-db"));
    // 主目录未命中时走无名搜索目录
    assert_eq!(config.get("queue.driver").unwrap(), json!("redis"));
    assert_eq!(config.get_as::<u8>("queue.workers").unwrap(), 4);
    // 命名空间目录经裸域名寻址
    assert_eq!(config.get("shop.currency").unwrap(), json!("CNY"));
    assert_eq!(config.get_as::<f64>("shop.tax.rate").unwrap(), 0.13);
    // 显式命名空间寻址
    let path = config.resolve_path("shop::shop").unwrap();
    assert_eq!(path, module_dir.join("shop.yaml"));
}

/// 惰性加载与缓存幂等
#[test]
fn test_lazy_load_and_idempotence() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "cache.yaml", "driver: memory\n");

    let settings = shared(AppSettings::default());
    let mut config = ConfigContainer::new(temp_dir.path(), settings);

    assert!(!config.exists("cache"));
    assert_eq!(config.get("cache.driver").unwrap(), json!("memory"));
    assert!(config.exists("cache"));

    // 缓存后修改磁盘文件不会被观察到
    write_file(temp_dir.path(), "cache.yaml", "driver: redis\n");
    assert_eq!(config.get("cache.driver").unwrap(), json!("memory"));
    config.load("cache", "").unwrap();
    assert_eq!(config.get("cache.driver").unwrap(), json!("memory"));

    // 移除域后重新加载才能看到新内容
    config.unset("cache");
    assert_eq!(config.get("cache.driver").unwrap(), json!("redis"));
}

/// 应用设置域的并入工作流程
#[test]
fn test_app_settings_merge_workflow() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        temp_dir.path(),
        "app.yaml",
        "debug: true\ntimezone: Asia/Shanghai\nenable_module: true\n",
    );

    let settings = shared(AppSettings::default());
    let mut config = ConfigContainer::new(temp_dir.path(), Rc::clone(&settings));

    config.load("app", "").unwrap();

    assert_eq!(settings.borrow().len(), 3);
    assert!(settings.borrow().flag("debug"));
    assert!(settings.borrow().flag("enable_module"));
    assert_eq!(
        settings.borrow().get("timezone"),
        Some(&json!("Asia/Shanghai"))
    );

    // 并入后不可通过容器读取
    assert!(!config.exists("app"));
    assert!(matches!(
        config.get("app.timezone"),
        Err(CoreError::InvalidConfigKey(_))
    ));
}

/// 写入、自动创建中间映射与读取的往返
#[test]
fn test_set_get_round_trip_workflow() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "mail.yaml", "driver: smtp\n");

    let settings = shared(AppSettings::default());
    let mut config = ConfigContainer::new(temp_dir.path(), settings);

    // 根域有文件：先加载再写入
    config.set("mail.from.address", json!("ops@example.com"));
    assert_eq!(config.get("mail.driver").unwrap(), json!("smtp"));
    assert_eq!(
        config.get("mail.from.address").unwrap(),
        json!("ops@example.com")
    );

    // 根域无文件：初始化为空映射后写入
    config.set("feature.flags.beta", json!(true));
    assert_eq!(config.get("feature.flags.beta").unwrap(), json!(true));
    assert!(config.get("feature.flags").unwrap().is_object());

    // 深层嵌套
    config.set("a.b.c.d.e", json!(1));
    config.set("a.b.c.d.f", json!(2));
    assert_eq!(config.get("a.b.c.d.e").unwrap(), json!(1));
    let node = config.get("a.b.c.d").unwrap();
    assert_eq!(node["f"], json!(2));
}

/// 混合 YAML 与 JSON 格式
#[test]
fn test_mixed_formats() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "service.yaml", "name: api\n");
    write_file(
        temp_dir.path(),
        "limits.json",
        r#"{"max_connections": 100, "timeouts": {"read": 30}}"#,
    );

    let settings = shared(AppSettings::default());
    let mut config = ConfigContainer::new(temp_dir.path(), settings);

    assert_eq!(config.get("service.name").unwrap(), json!("api"));
    assert_eq!(config.get_as::<u32>("limits.max_connections").unwrap(), 100);
    assert_eq!(config.get("limits.timeouts.read").unwrap(), json!(30));
}

/// 错误路径：缺失域、缺失子配置、空键
#[test]
fn test_error_paths() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "database.yaml", "host: localhost\n");

    let settings = shared(AppSettings::default());
    let mut config = ConfigContainer::new(temp_dir.path(), settings);

    assert!(matches!(
        config.get("ghost.key"),
        Err(CoreError::ConfigFileNotFound(_))
    ));
    assert!(matches!(
        config.get("database.replica.host"),
        Err(CoreError::MissingSubconfig { .. })
    ));
    assert!(matches!(
        config.load("ghost", ""),
        Err(CoreError::InvalidConfigKey(_))
    ));
    assert!(matches!(
        config.load(json!([1, 2]), ""),
        Err(CoreError::InvalidConfigKey(_))
    ));
}
