use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::store::{MemoryStore, RecordStore};
use crate::gate::{GateService, StatsRefreshScheduler};
use crate::ledger::LedgerService;
use crate::pairing::PairingService;

/// Per-member 锁表
///
/// presence toggle 和 balance debit 都是对共享状态的 read-check-write，
/// 记录存储只承诺单文档原子更新，没有条件写；两条路径共用这张表按
/// member id 串行化，同一会员的并发请求排队执行。
///
/// 锁从不回收：会员数量有限，空 Mutex 的内存成本可以忽略。
#[derive(Debug, Default)]
pub struct MemberLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl MemberLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取得（必要时创建）该会员的锁
    pub fn acquire(&self, member_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(member_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// 数据完整性计数器
///
/// 使用 DashMap 实现无锁并发计数。记录不致命但需要运维跟进的
/// 数据缺陷（如一个会员出现多条 active 会籍），在 detailed health
/// 里暴露。
#[derive(Debug, Default)]
pub struct IntegrityCounters {
    counters: DashMap<&'static str, u64>,
}

impl IntegrityCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// 递增指定缺陷计数并返回新值
    pub fn increment(&self, kind: &'static str) -> u64 {
        let mut entry = self.counters.entry(kind).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定缺陷的当前计数
    pub fn get(&self, kind: &str) -> u64 {
        self.counters.get(kind).map(|v| *v).unwrap_or(0)
    }

    /// 全量快照（health 接口用）
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counters
            .iter()
            .map(|entry| (entry.key().to_string(), *entry.value()))
            .collect()
    }
}

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是门禁节点的核心数据结构，使用 Arc 实现浅拷贝，
/// 所有权成本极低。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<dyn RecordStore> | 记录存储适配器 |
/// | gate | GateService | 门禁决策 + 在场切换 |
/// | ledger | LedgerService | 余额账本（支付） |
/// | pairing | PairingService | NFC 配对流程 |
/// | integrity | Arc<IntegrityCounters> | 数据完整性计数 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 记录存储适配器
    pub store: Arc<dyn RecordStore>,
    /// 门禁服务
    pub gate: GateService,
    /// 余额账本
    pub ledger: LedgerService,
    /// 配对服务
    pub pairing: PairingService,
    /// 数据完整性计数器
    pub integrity: Arc<IntegrityCounters>,
}

impl ServerState {
    /// 在给定的记录存储上构建全部服务
    ///
    /// 测试和自定义后端部署使用这个入口。
    pub fn with_store(config: Config, store: Arc<dyn RecordStore>) -> Self {
        let locks = Arc::new(MemberLocks::new());
        let integrity = Arc::new(IntegrityCounters::new());

        let gate = GateService::new(
            store.clone(),
            locks.clone(),
            integrity.clone(),
            config.timezone,
            config.gate_location.clone(),
        );
        let ledger = LedgerService::new(
            store.clone(),
            locks,
            integrity.clone(),
            config.timezone,
        );
        let pairing = PairingService::new(store.clone(), config.pairing_ttl_minutes);

        Self {
            config,
            store,
            gate,
            ledger,
            pairing,
            integrity,
        }
    }

    /// 初始化服务器状态（默认单机部署：内存存储）
    pub fn initialize(config: &Config) -> Self {
        Self::with_store(config.clone(), Arc::new(MemoryStore::new()))
    }

    /// 注册后台任务
    ///
    /// 必须在 `Server::run()` 进入 serve 之前调用
    ///
    /// 启动的任务：
    /// - 午夜统计刷新 (StatsRefreshScheduler)
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let scheduler = StatsRefreshScheduler::new(
            self.gate.stats().clone(),
            self.config.timezone,
            tasks.shutdown_token(),
        );
        tasks.spawn("stats_refresh", TaskKind::Periodic, scheduler.run());
    }
}
