use alloc::{collections::BTreeMap, sync::Arc};
use core::any::{Any, TypeId};
use core::fmt;

use spin::RwLock;

/// 以 `TypeId` 为键的并发扩展存储。
///
/// # 设计背景（Why）
/// - 通道需要携带“谁的负担”这类跨组件元数据，组件描述符需要发布默认负担供其他协作者观察；
///   两者共享同一种类型安全、线程安全的扩展表抽象。
/// - 键使用类型本身而非字符串，调用方通过新类型封装即可避免碰撞。
///
/// # 逻辑解析（How）
/// - 内部为 `spin::RwLock<BTreeMap<TypeId, Arc<dyn Any + Send + Sync>>>`；
/// - 值以 `Arc` 存放，读取时克隆引用计数并向下转型，避免向调用方暴露受锁保护的引用。
///
/// # 契约说明（What）
/// - 所有值需满足 `'static + Send + Sync`，确保跨线程访问安全；
/// - `get` 返回拥有所有权的 `Arc<T>` 快照，插入同类型值会覆盖旧值；
/// - **后置条件**：`remove` 返回被移除的值（若存在），`clear` 清空所有条目。
///
/// # 风险提示（Trade-offs）
/// - 自旋锁在激活层的冷路径（装配、打开）上开销可忽略；不建议在每消息热路径上高频读写本表。
#[derive(Default)]
pub struct Extensions {
    entries: RwLock<BTreeMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl Extensions {
    /// 创建空扩展表。
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入指定类型的扩展数据，返回被覆盖的旧值（若存在）。
    pub fn insert<T: Send + Sync + 'static>(&self, value: Arc<T>) -> Option<Arc<T>> {
        let mut entries = self.entries.write();
        entries
            .insert(TypeId::of::<T>(), value)
            .and_then(|previous| previous.downcast::<T>().ok())
    }

    /// 获取扩展数据的共享快照。
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let entries = self.entries.read();
        entries
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }

    /// 移除扩展数据，返回拥有所有权的快照。
    pub fn remove<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let mut entries = self.entries.write();
        entries
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
    }

    /// 判断扩展是否存在。
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.entries.read().contains_key(&TypeId::of::<T>())
    }

    /// 清空所有扩展。
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// 返回条目数量，便于调试与测试断言。
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// 判断扩展表是否为空。
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker(u32);

    #[test]
    fn insert_then_get_returns_snapshot() {
        let extensions = Extensions::new();
        assert!(extensions.insert(Arc::new(Marker(7))).is_none());
        let snapshot = extensions.get::<Marker>().expect("value should exist");
        assert_eq!(*snapshot, Marker(7));
    }

    #[test]
    fn insert_same_type_overwrites() {
        let extensions = Extensions::new();
        extensions.insert(Arc::new(Marker(1)));
        let previous = extensions.insert(Arc::new(Marker(2)));
        assert_eq!(previous.as_deref(), Some(&Marker(1)));
        assert_eq!(extensions.get::<Marker>().as_deref(), Some(&Marker(2)));
        assert_eq!(extensions.len(), 1);
    }

    #[test]
    fn remove_clears_entry() {
        let extensions = Extensions::new();
        extensions.insert(Arc::new(Marker(3)));
        assert_eq!(extensions.remove::<Marker>().as_deref(), Some(&Marker(3)));
        assert!(!extensions.contains::<Marker>());
        assert!(extensions.is_empty());
    }
}
