//! 并发请求去陈旧模块
//!
//! 页面在 key 变化时（切换项目、路由参数更新）会重新发起请求，
//! 多个在途请求可能乱序完成。`FetchGuard` 用单调递增的代号标记
//! 每次发起，完成时只有代号仍是最新的那次才允许写入状态，
//! 迟到的旧响应直接丢弃。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 请求代号守卫
///
/// 克隆共享同一个计数器；原子计数仅为满足信号存储的 Sync 约束，
/// WASM 事件循环本身是单线程的。
#[derive(Clone, Default)]
pub struct FetchGuard {
    current: Arc<AtomicU64>,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 标记一次新的请求发起，返回其代号。
    ///
    /// 同时使所有更早发起的请求过期。
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// 判断某次发起是否仍是最新的
    pub fn is_current(&self, issue: u64) -> bool {
        self.current.load(Ordering::Relaxed) == issue
    }

    /// 使所有在途请求过期（页面卸载时调用）
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_issue_supersedes_earlier_one() {
        let guard = FetchGuard::new();
        let fetch_a = guard.begin();
        let fetch_b = guard.begin();

        // B 的响应先到：写入
        assert!(guard.is_current(fetch_b));
        // A 的响应后到：丢弃，状态保持为 B 的结果
        assert!(!guard.is_current(fetch_a));
    }

    #[test]
    fn in_order_completion_applies_normally() {
        let guard = FetchGuard::new();
        let fetch_a = guard.begin();
        assert!(guard.is_current(fetch_a));

        let fetch_b = guard.begin();
        assert!(guard.is_current(fetch_b));
    }

    #[test]
    fn clones_share_the_same_counter() {
        let guard = FetchGuard::new();
        let issuer = guard.clone();
        let fetch_a = issuer.begin();
        assert!(guard.is_current(fetch_a));

        issuer.begin();
        assert!(!guard.is_current(fetch_a));
    }

    #[test]
    fn invalidate_expires_everything_in_flight() {
        let guard = FetchGuard::new();
        let fetch_a = guard.begin();
        guard.invalidate();
        assert!(!guard.is_current(fetch_a));
    }
}
