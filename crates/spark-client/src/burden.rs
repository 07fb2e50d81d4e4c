use alloc::{boxed::Box, sync::Arc, vec::Vec};
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use spin::Mutex;

use crate::channel::Channel;

/// 可被负担追踪并在组件销毁时释放的资源。
///
/// # 契约说明（What）
/// - `release` 必须幂等且不得阻塞过久：负担在组件销毁路径上同步逐个调用它；
/// - 实现者自行保证内部可变性与线程安全（`Send + Sync`）。
pub trait BurdenResource: Send + Sync + 'static {
    /// 释放资源。
    fn release(&self);
}

impl<F> BurdenResource for F
where
    F: Fn() + Send + Sync + 'static,
{
    fn release(&self) {
        self();
    }
}

/// `Burden` 是一次创建路径（默认或请求级覆盖）所依附资源的账本。
///
/// # 设计背景（Why）
/// - 通道、附着扩展等资源的生命周期与产生它们的组件实例绑定，而不是与单次调用绑定；
///   激活层把它们集中登记到负担上，在组件销毁时一次性释放，避免各处散落的清理逻辑。
/// - 负担同时被激活器（默认路径缓存）与请求级创建上下文共同持有，因此以 `Arc<Burden>`
///   共享，内部用锁保护资源清单。
///
/// # 逻辑解析（How）
/// - `track` 向清单追加资源；
/// - `release` 通过原子标志保证只执行一次：先整体取出清单，再逐个调用 [`BurdenResource::release`]；
/// - 通道创建包装会把负担写入通道扩展表，[`Burden::of`] 提供反向检索。
///
/// # 契约说明（What）
/// - **后置条件**：`release` 之后 `is_released` 恒为真，重复调用与并发调用均无副作用；
/// - `release` 之后继续 `track` 的资源不再被本负担管理，调用方应视为装配缺陷。
///
/// # 风险提示（Trade-offs）
/// - 释放顺序为登记顺序，不做拓扑排序；互相依赖的资源应封装为单个 [`BurdenResource`]。
#[derive(Default)]
pub struct Burden {
    resources: Mutex<Vec<Box<dyn BurdenResource>>>,
    released: AtomicBool,
}

impl Burden {
    /// 创建空负担。
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一项资源。
    pub fn track(&self, resource: impl BurdenResource) {
        self.resources.lock().push(Box::new(resource));
    }

    /// 登记一个已装箱的资源。
    pub fn track_boxed(&self, resource: Box<dyn BurdenResource>) {
        self.resources.lock().push(resource);
    }

    /// 返回当前登记的资源数量。
    pub fn resource_count(&self) -> usize {
        self.resources.lock().len()
    }

    /// 是否已执行过释放。
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// 释放全部资源；只有首次调用生效。
    pub fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        let drained: Vec<Box<dyn BurdenResource>> = {
            let mut resources = self.resources.lock();
            resources.drain(..).collect()
        };
        for resource in &drained {
            resource.release();
        }
    }

    /// 从通道扩展表中取回附着的负担。
    pub fn of(channel: &dyn Channel) -> Option<Arc<Burden>> {
        channel.extensions().get::<Burden>()
    }
}

impl fmt::Debug for Burden {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Burden")
            .field("resources", &self.resource_count())
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::AtomicUsize;

    #[test]
    fn release_fires_each_resource_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let burden = Burden::new();
        for _ in 0..3 {
            let counter = counter.clone();
            burden.track(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(burden.resource_count(), 3);

        burden.release();
        burden.release();

        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert!(burden.is_released());
        assert_eq!(burden.resource_count(), 0);
    }
}
