//! 统计刷新调度器
//!
//! 在设施本地午夜重算 dashboard 统计，使 daily_activity 和
//! activity_per_day 在没有刷卡流量时也能翻到新的一天。
//!
//! 注册为 `TaskKind::Periodic`，在 `start_background_tasks()` 中启动。

use chrono::Duration;
use chrono_tz::Tz;
use tokio_util::sync::CancellationToken;

use crate::gate::stats::StatsAggregator;
use crate::utils::time;

/// Seconds past midnight before the refresh fires (clock-skew buffer)
const MIDNIGHT_OFFSET_SECS: i64 = 30;

pub struct StatsRefreshScheduler {
    stats: StatsAggregator,
    tz: Tz,
    shutdown: CancellationToken,
}

impl StatsRefreshScheduler {
    pub fn new(stats: StatsAggregator, tz: Tz, shutdown: CancellationToken) -> Self {
        Self {
            stats,
            tz,
            shutdown,
        }
    }

    /// 主循环：启动刷新一次 + 每日午夜定点触发
    pub async fn run(self) {
        tracing::info!("Dashboard stats refresher started");

        // 启动时立即重算一次
        self.stats.recompute_best_effort().await;

        loop {
            let sleep_duration = Self::duration_until_next_midnight(self.tz);
            tracing::debug!(
                "Next stats refresh in {} minutes",
                sleep_duration.as_secs() / 60
            );

            tokio::select! {
                _ = tokio::time::sleep(sleep_duration) => {
                    self.stats.recompute_best_effort().await;
                }
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Stats refresher received shutdown signal");
                    return;
                }
            }
        }
    }

    /// 距下一个本地午夜 (+offset) 的时长
    ///
    /// DST gap fallback: 如果本地午夜不存在，fallback 到 UTC 解释。
    fn duration_until_next_midnight(tz: Tz) -> std::time::Duration {
        let now = time::local_now(tz);
        let next_date = now.date_naive() + Duration::days(1);
        let naive = next_date
            .and_hms_opt(0, 0, 0)
            .unwrap_or_else(|| next_date.and_time(chrono::NaiveTime::MIN));
        let next = naive
            .and_local_timezone(tz)
            .latest()
            .map(|dt| dt.timestamp())
            .unwrap_or_else(|| naive.and_utc().timestamp())
            + MIDNIGHT_OFFSET_SECS;

        let secs = (next - now.timestamp()).max(60);
        std::time::Duration::from_secs(secs as u64)
    }
}
