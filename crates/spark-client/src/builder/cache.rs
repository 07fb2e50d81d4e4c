use alloc::{collections::BTreeMap, format, sync::Arc};
use core::any::TypeId;
use core::fmt;

use spin::{Once, RwLock};

use crate::builder::strategy::{CreatorBundle, DynChannelBuilder};
use crate::contract::ServiceContract;
use crate::error::{ClientError, codes};
use crate::model::ClientModel;

/// `CreatorFactory` 是按模型变体绑定好的策略委托：缓存中的最终形态。
///
/// # 契约说明（What）
/// - `build` 以任意该变体的模型实例产出（创建函数、负担）对；
/// - 若派生阶段未能解析到策略，`build` 返回 [`codes::CREATOR_UNAVAILABLE`]：
///   按契约，缺失策略在调用期报告，缓存查找本身永不失败。
pub struct CreatorFactory {
    builder: Option<Arc<dyn DynChannelBuilder>>,
    model_name: &'static str,
}

impl CreatorFactory {
    /// 以解析结果构造委托；`model_name` 用于缺失策略时的诊断信息。
    pub fn new(builder: Option<Arc<dyn DynChannelBuilder>>, model_name: &'static str) -> Self {
        Self {
            builder,
            model_name,
        }
    }

    /// 是否成功绑定了策略。
    pub fn is_buildable(&self) -> bool {
        self.builder.is_some()
    }

    /// 调用绑定的策略派生创建函数与负担。
    pub fn build(
        &self,
        model: &dyn ClientModel,
        contract: &ServiceContract,
    ) -> Result<CreatorBundle, ClientError> {
        match &self.builder {
            Some(builder) => builder.build_channel_creator_dyn(model, contract),
            None => Err(ClientError::new(
                codes::CREATOR_UNAVAILABLE,
                format!(
                    "无法为模型变体 `{}` 派生通道创建函数：未注册建造策略或端点不可达",
                    self.model_name,
                ),
            )),
        }
    }
}

impl fmt::Debug for CreatorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatorFactory")
            .field("model", &self.model_name)
            .field("buildable", &self.is_buildable())
            .finish()
    }
}

/// `CreatorFactoryCache` 按模型变体类型缓存策略派生结果，进程生命周期内至多派生一次。
///
/// # 设计背景（Why）
/// - 策略解析与绑定相对昂贵，而同一变体的所有模型实例共享同一种建法；
///   把派生成本摊到“每类型一次”而非“每实例一次”，让每次创建请求保持廉价。
///
/// # 逻辑解析（How）
/// - 外层 `spin::RwLock<BTreeMap<TypeId, ...>>` 仅保护槽位表；
/// - 每个槽位是 `Arc<spin::Once<Arc<CreatorFactory>>>`：并发首次访问时，竞争插槽失败的一方
///   采纳胜者的槽位，随后 `call_once` 保证派生闭包恰好执行一次，其余调用方阻塞等待并共享结果；
/// - 槽位一经建立永不逐出：键空间受限于进程内注册的变体类型数量，天然有界。
///
/// # 契约说明（What）
/// - `get_or_build` 对同一类型并发调用 N 次，派生闭包恰好执行一次，N 方拿到同一份
///   `Arc<CreatorFactory>`；
/// - 缓存查找无可观察副作用，也不产生错误：策略缺失由 [`CreatorFactory::build`] 在调用期报告。
///
/// # 风险提示（Trade-offs）
/// - 派生闭包在 `Once` 内执行期间持有槽位，闭包必须保持廉价（仅注册表解析与绑定），
///   不得在其中执行网络或阻塞 I/O。
#[derive(Default)]
pub struct CreatorFactoryCache {
    slots: RwLock<BTreeMap<TypeId, Arc<Once<Arc<CreatorFactory>>>>>,
}

impl CreatorFactoryCache {
    /// 创建空缓存。
    pub fn new() -> Self {
        Self::default()
    }

    /// 返回变体 `variant` 对应的策略委托；缺失时以 `derive` 派生，并发下至多执行一次。
    pub fn get_or_build<F>(&self, variant: TypeId, derive: F) -> Arc<CreatorFactory>
    where
        F: FnOnce() -> CreatorFactory,
    {
        let slot = {
            let slots = self.slots.read();
            slots.get(&variant).cloned()
        };
        let slot = match slot {
            Some(slot) => slot,
            None => {
                let mut slots = self.slots.write();
                slots
                    .entry(variant)
                    .or_insert_with(|| Arc::new(Once::new()))
                    .clone()
            }
        };
        slot.call_once(|| Arc::new(derive())).clone()
    }

    /// 返回已缓存的变体数量，供观测与测试断言。
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    /// 判断缓存是否为空。
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl fmt::Debug for CreatorFactoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreatorFactoryCache")
            .field("len", &self.len())
            .finish()
    }
}
