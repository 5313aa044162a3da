//! Gate Server - 会员设施 NFC 门禁节点
//!
//! # 架构概述
//!
//! 本模块是 Gate Server 的主入口，提供以下核心功能：
//!
//! - **门禁引擎** (`gate`): token 解析、准入决策、在场状态切换、欺诈告警
//! - **余额账本** (`ledger`): 会籍续费和商品购买的原子扣款
//! - **配对流程** (`pairing`): TTL 一次性配对码绑定 NFC 卡
//! - **记录存储** (`db`): keyed-document 适配器 + 类型化仓库
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! gate-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 存储适配器 + 仓库
//! ├── gate/          # 门禁决策 + 在场状态机
//! ├── ledger/        # 余额账本
//! ├── pairing/       # NFC 配对
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod gate;
pub mod ledger;
pub mod pairing;
pub mod utils;

// Re-export 公共类型
pub use self::core::{Config, Server, ServerState};
pub use gate::{AccessOutcome, GateService};
pub use ledger::{LedgerService, PaymentReceipt};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置进程环境 (dotenv + 日志)
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(None, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
   ______      __
  / ____/___ _/ /____
 / / __/ __ `/ __/ _ \
/ /_/ / /_/ / /_/  __/
\____/\__,_/\__/\___/
   _____
  / ___/___  ______   _____  _____
  \__ \/ _ \/ ___/ | / / _ \/ ___/
 ___/ /  __/ /   | |/ /  __/ /
/____/\___/_/    |___/\___/_/
    "#
    );
}
