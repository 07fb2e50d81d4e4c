use alloc::{collections::BTreeMap, sync::Arc};
use core::any::TypeId;
use core::fmt;

use spin::RwLock;

use crate::Error;
use crate::builder::strategy::{ChannelBuilder, DynChannelBuilder, TypedChannelBuilderAdapter};

/// 注册策略时可能遇到的错误。
#[derive(Debug)]
pub enum BuilderRegistrationError {
    /// 该模型变体已绑定策略，禁止重复注册。
    Duplicate { model: &'static str },
}

impl fmt::Display for BuilderRegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderRegistrationError::Duplicate { model } => {
                write!(f, "channel builder for `{model}` already registered")
            }
        }
    }
}

impl Error for BuilderRegistrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

/// `BuilderRegistry` 维护“模型变体类型 → 通道建造策略”的目录。
///
/// # 设计背景（Why）
/// - 激活层按客户端模型的具体变体解析建造策略，集中注册可以让命名冲突在装配期即被捕获，
///   避免运行期才发现同一变体被绑定了两种建法。
///
/// # 设计要点（How）
/// - 内部使用 `spin::RwLock<BTreeMap<TypeId, Arc<dyn DynChannelBuilder>>>`：
///   `BTreeMap` 保证遍历顺序稳定，读写锁让注册期写入与运行期解析互不阻塞；
/// - `register` 接收静态泛型策略并自动包上 [`TypedChannelBuilderAdapter`]；
///   已适配好的对象层策略可走 `register_dyn`。
///
/// # 契约说明（What）
/// - 键为变体的 `TypeId`；重复注册返回 [`BuilderRegistrationError::Duplicate`]；
/// - `resolve` 未命中返回 `None`，由上层的派生缓存将其物化为调用期的通信错误。
///
/// # 风险与注意事项（Trade-offs）
/// - 注册表预期在进程启动阶段完成填充；策略缓存不会感知后续追加的注册
///   （派生结果按类型只计算一次），运行中途注册新策略属于装配缺陷。
#[derive(Default)]
pub struct BuilderRegistry {
    entries: RwLock<BTreeMap<TypeId, Arc<dyn DynChannelBuilder>>>,
}

impl BuilderRegistry {
    /// 创建空注册表。
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个静态泛型策略，键为其 `Model` 关联类型。
    pub fn register<B>(&self, builder: B) -> Result<(), BuilderRegistrationError>
    where
        B: ChannelBuilder,
    {
        self.register_dyn(
            TypeId::of::<B::Model>(),
            Arc::new(TypedChannelBuilderAdapter::new(builder)),
        )
    }

    /// 注册一个对象层策略。
    pub fn register_dyn(
        &self,
        model: TypeId,
        builder: Arc<dyn DynChannelBuilder>,
    ) -> Result<(), BuilderRegistrationError> {
        let mut entries = self.entries.write();
        if entries.contains_key(&model) {
            return Err(BuilderRegistrationError::Duplicate {
                model: builder.model_name(),
            });
        }
        entries.insert(model, builder);
        Ok(())
    }

    /// 按变体类型解析策略。
    pub fn resolve(&self, model: &TypeId) -> Option<Arc<dyn DynChannelBuilder>> {
        self.entries.read().get(model).cloned()
    }

    /// 返回已注册的策略数量。
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// 判断注册表是否为空。
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StandardClientModel;
    use crate::test_stubs::builder::MemoryChannelBuilder;
    use alloc::string::ToString;

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = BuilderRegistry::new();
        registry
            .register(MemoryChannelBuilder::new())
            .expect("first registration should succeed");
        let error = registry
            .register(MemoryChannelBuilder::new())
            .expect_err("second registration must collide");
        assert!(error.to_string().contains("StandardClientModel"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn resolve_hits_registered_variant_only() {
        let registry = BuilderRegistry::new();
        registry.register(MemoryChannelBuilder::new()).unwrap();
        assert!(
            registry
                .resolve(&TypeId::of::<StandardClientModel>())
                .is_some()
        );
        assert!(registry.resolve(&TypeId::of::<u32>()).is_none());
    }
}
