//! Database Module
//!
//! 记录存储层：外部 keyed-document 服务的抽象 + 类型化仓库。
//! 适配器只承诺单文档原子更新，没有跨文档事务；所有需要
//! read-check-write 的路径由服务层按 member 串行化。

pub mod repository;
pub mod store;

/// Collection names, shared by repositories and seeds
pub mod collections {
    pub const MEMBERS: &str = "members";
    pub const MEMBERSHIPS: &str = "user_memberships";
    pub const PLANS: &str = "membership_plans";
    pub const PRODUCTS: &str = "products";
    pub const ACCESS_LOGS: &str = "access_logs";
    pub const ALERTS: &str = "access_alerts";
    pub const PAYMENT_LOGS: &str = "payment_logs";
    pub const DASHBOARD: &str = "dashboard";
    pub const PENDING_LINKS: &str = "pending_nfc_links";
}

/// The single dashboard aggregate document id
pub const DASHBOARD_DOC: &str = "main";
