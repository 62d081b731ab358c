// ==========================================
// 工位轮岗系统 - 演示入口
// ==========================================
// 用法: workstation-rotation [--json-logs] [config.json]
// 流程: 加载配置 -> 构建演示数据 -> 生成两轮 -> 输出 JSON
// ==========================================

use anyhow::Context;
use std::sync::Arc;
use workstation_rotation::config::ConfigManager;
use workstation_rotation::domain::{Capability, LeadershipType, Worker, Workstation};
use workstation_rotation::{logging, InMemoryRotationStore, RotationApi, APP_NAME, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--json-logs") {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", APP_NAME, VERSION);
    tracing::info!("==================================================");

    let config_manager = match args.iter().find(|a| !a.starts_with("--")) {
        Some(path) => ConfigManager::from_path(path).with_context(|| format!("无法加载配置文件: {}", path))?,
        None => ConfigManager::from_env_or_default().context("无法加载配置")?,
    };
    tracing::info!(snapshot = %config_manager.get_config_snapshot()?, "配置快照");

    let (workers, workstations, capabilities) = demo_data();
    let store = Arc::new(InMemoryRotationStore::with_data(workers, workstations, capabilities));
    let api = RotationApi::new(store, config_manager.config());

    let session = api.start_session("演示班次", 240).await?;

    for round in 1..=2 {
        let report = api
            .generate(&session.id)
            .await
            .with_context(|| format!("第{}轮生成失败", round))?;
        tracing::info!(
            round = round,
            revision = report.committed_revision,
            overall_score = report.quality.overall_score,
            "演示轮次完成"
        );
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let latest = api.evaluate_latest(&session.id).await?;
    println!("{}", serde_json::to_string_pretty(&latest)?);

    Ok(())
}

/// 演示数据: 3 个工位, 7 名员工（含一对带教、一名前半段组长）
fn demo_data() -> (Vec<Worker>, Vec<Workstation>, Vec<Capability>) {
    let workstations = vec![
        Workstation::new(1, "总装", 3).priority(),
        Workstation::new(2, "焊接", 2),
        Workstation::new(3, "质检", 2),
    ];

    let mut workers: Vec<Worker> = ["张伟", "王芳", "李娜", "刘洋", "陈静", "杨磊", "赵敏"]
        .iter()
        .zip(1..)
        .map(|(name, id)| Worker::new(id, name))
        .collect();

    // 带教: 1 带 2, 在焊接
    workers[0].is_trainer = true;
    workers[1].is_trainee = true;
    workers[1].trainer_id = Some(1);
    workers[1].training_workstation_id = Some(2);

    // 组长: 3 前半段固定质检
    workers[2].is_leader = true;
    workers[2].leadership_type = LeadershipType::FirstPart;
    workers[2].leadership_workstation_id = Some(3);

    workers[5].availability_percentage = 80;
    workers[6].availability_percentage = 60;

    let mut capabilities = vec![Capability::new(1, 2, 4).certified(), Capability::new(2, 2, 2).certified()];
    for worker_id in 3..=7 {
        capabilities.push(Capability::new(worker_id, 1, 3));
        capabilities.push(Capability::new(worker_id, 3, 3).certified());
    }
    capabilities.push(Capability::new(6, 2, 4));

    (workers, workstations, capabilities)
}
