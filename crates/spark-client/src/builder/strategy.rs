use alloc::{format, sync::Arc};
use core::any::type_name;

use crate::burden::Burden;
use crate::channel::ChannelCreator;
use crate::contract::ServiceContract;
use crate::error::{ClientError, codes};
use crate::model::ClientModel;

/// 策略产出：通道创建函数与其资源负担，成对出现。
///
/// # 契约说明（What）
/// - `creator` 与一个确定的（模型变体、端点）组合绑定；
/// - `burden` 登记该创建路径依附的资源，由激活器或请求上下文持有直至组件销毁。
#[derive(Clone, Debug)]
pub struct CreatorBundle {
    pub creator: ChannelCreator,
    pub burden: Arc<Burden>,
}

impl CreatorBundle {
    /// 构造产出对。
    pub fn new(creator: ChannelCreator, burden: Arc<Burden>) -> Self {
        Self { creator, burden }
    }
}

/// `ChannelBuilder` 是面向具体模型变体的静态泛型策略契约。
///
/// # 设计背景（Why）
/// - 每种客户端模型变体对应一种通道建法；以关联类型绑定变体，实现者无需手写向下转型。
/// - 对象安全版本见 [`DynChannelBuilder`]，注册表内统一存放后者。
///
/// # 契约说明（What）
/// - **前置条件**：`model` 已通过激活层校验，端点保证存在；`contract` 为解析后的有效契约。
/// - **后置条件**：成功时返回的创建函数每次调用产出独立的新通道；策略认定无法建造时
///   返回携带 [`codes::CREATOR_UNAVAILABLE`] 的错误，绝不静默返回空实现。
///
/// # 风险提示（Trade-offs）
/// - 策略可能被多个激活器并发调用，实现需自行保证内部状态线程安全。
pub trait ChannelBuilder: Send + Sync + 'static {
    /// 本策略服务的模型变体。
    type Model: ClientModel;

    /// 为给定模型实例派生通道创建函数与负担。
    fn build_channel_creator(
        &self,
        model: &Self::Model,
        contract: &ServiceContract,
    ) -> Result<CreatorBundle, ClientError>;
}

/// `DynChannelBuilder` 为注册表提供对象安全的策略接口。
///
/// # 设计背景（Why）
/// - 注册表需要以 trait 对象形式存放不同变体的策略，借助 `Any` 在调用端做运行时类型检查。
///
/// # 契约说明（What）
/// - **前置条件**：调用方传入的模型变体必须与 [`DynChannelBuilder::model_name`] 声明的类型一致；
/// - **后置条件**：类型不匹配时返回 [`codes::MODEL_TYPE_MISMATCH`]，属于配置类错误。
pub trait DynChannelBuilder: Send + Sync + 'static {
    /// 返回策略服务的模型变体名称，用于诊断。
    fn model_name(&self) -> &'static str;

    /// 对象安全的派生入口。
    fn build_channel_creator_dyn(
        &self,
        model: &dyn ClientModel,
        contract: &ServiceContract,
    ) -> Result<CreatorBundle, ClientError>;
}

/// `TypedChannelBuilderAdapter` 将静态泛型策略包装为对象安全的 [`DynChannelBuilder`]。
///
/// # 逻辑解析（How）
/// - `build_channel_creator_dyn` 使用 `as_any().downcast_ref` 还原具体变体后委托给内部策略；
/// - 适配器不缓存状态，对象生命周期与内部策略一致。
pub struct TypedChannelBuilderAdapter<B>
where
    B: ChannelBuilder,
{
    inner: B,
}

impl<B> TypedChannelBuilderAdapter<B>
where
    B: ChannelBuilder,
{
    /// 构建新的适配器。
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    /// 取出内部的策略实现。
    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B> DynChannelBuilder for TypedChannelBuilderAdapter<B>
where
    B: ChannelBuilder,
{
    fn model_name(&self) -> &'static str {
        type_name::<B::Model>()
    }

    fn build_channel_creator_dyn(
        &self,
        model: &dyn ClientModel,
        contract: &ServiceContract,
    ) -> Result<CreatorBundle, ClientError> {
        match model.as_any().downcast_ref::<B::Model>() {
            Some(typed) => self.inner.build_channel_creator(typed, contract),
            None => Err(ClientError::new(
                codes::MODEL_TYPE_MISMATCH,
                format!(
                    "期待模型变体 `{}`，实际收到不兼容类型",
                    type_name::<B::Model>(),
                ),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::endpoint::Endpoint;
    use crate::error::ErrorCategory;
    use crate::model::StandardClientModel;
    use crate::test_stubs::builder::MemoryChannelBuilder;
    use alloc::sync::Arc;
    use core::any::Any;

    trait OrderService {}

    #[derive(Clone, Debug)]
    struct OtherModel;

    impl ClientModel for OtherModel {
        fn contract(&self) -> Option<&ServiceContract> {
            None
        }

        fn endpoint(&self) -> Option<&Endpoint> {
            None
        }

        fn for_endpoint(&self, _endpoint: Endpoint) -> Arc<dyn ClientModel> {
            Arc::new(Self)
        }

        fn variant_name(&self) -> &'static str {
            core::any::type_name::<Self>()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn adapter_rejects_foreign_variant() {
        let adapter = TypedChannelBuilderAdapter::new(MemoryChannelBuilder::new());
        let contract = ServiceContract::of::<dyn OrderService>();
        let error = adapter
            .build_channel_creator_dyn(&OtherModel, &contract)
            .unwrap_err();
        assert_eq!(error.code(), codes::MODEL_TYPE_MISMATCH);
        assert_eq!(error.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn adapter_delegates_to_typed_builder() {
        let adapter = TypedChannelBuilderAdapter::new(MemoryChannelBuilder::new());
        let contract = ServiceContract::of::<dyn OrderService>();
        let model = StandardClientModel::new()
            .with_contract(contract)
            .with_endpoint(Endpoint::physical("mem", "orders", 1));
        let bundle = adapter
            .build_channel_creator_dyn(&model, &contract)
            .expect("typed variant should build");
        let channel = bundle.creator.create().expect("creator should succeed");
        assert_eq!(channel.remote_endpoint().authority(), "orders");
    }
}
