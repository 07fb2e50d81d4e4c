use alloc::sync::Arc;
use core::any::{Any, TypeId, type_name};

use crate::contract::ServiceContract;
use crate::endpoint::Endpoint;

/// `ClientModel` 描述“如何到达一个服务”，是激活层与配置协作者之间的核心契约。
///
/// # 设计背景（Why）
/// - 不同寻址形态（直连、回调、REST 风格等）以各自的具体变体类型表达，激活层按变体的运行时类型
///   解析对应的通道建造策略，因此契约必须对象安全且暴露 `as_any`。
/// - 模型在组件间共享且可被多请求并发读取，约定为不可变：任何“更具体”的版本都通过
///   [`ClientModel::for_endpoint`] 派生新副本，绝不原地修改。
///
/// # 契约说明（What）
/// - `contract`：模型可达的服务契约，允许缺省（此时由组件描述符提供）。
/// - `endpoint`：模型绑定的端点；用于实际通道构造的模型必须返回 `Some`，否则校验阶段即失败。
/// - `for_endpoint`：返回绑定到指定端点的新模型，原模型保持不变。
/// - `as_any`：暴露具体变体，供按类型分发的策略适配器向下转型。
///
/// # 风险提示（Trade-offs）
/// - 变体类型是策略缓存的键；同一变体的所有实例共享一份策略派生结果，实现新变体时
///   需保证其策略对任意实例成立。
pub trait ClientModel: Send + Sync + 'static {
    /// 返回模型声明的服务契约。
    fn contract(&self) -> Option<&ServiceContract>;

    /// 返回模型绑定的端点。
    fn endpoint(&self) -> Option<&Endpoint>;

    /// 派生一个绑定到 `endpoint` 的更具体模型，不修改原模型。
    fn for_endpoint(&self, endpoint: Endpoint) -> Arc<dyn ClientModel>;

    /// 返回变体的人类可读名称，用于日志与错误消息，约定返回 `type_name::<Self>()`。
    fn variant_name(&self) -> &'static str;

    /// 暴露具体变体，供类型分发使用。
    fn as_any(&self) -> &dyn Any;
}

/// 返回模型具体变体的运行时类型，作为策略缓存的键。
pub fn model_variant(model: &dyn ClientModel) -> TypeId {
    model.as_any().type_id()
}

/// 标准客户端模型：契约加端点的最小组合，覆盖绝大多数直连场景。
///
/// # 契约说明（What）
/// - `with_contract` / `with_endpoint` 以值语义叠加配置，便于声明式装配；
/// - [`ClientModel::for_endpoint`] 克隆自身并替换端点，契约保持不变。
#[derive(Clone, Debug, Default)]
pub struct StandardClientModel {
    contract: Option<ServiceContract>,
    endpoint: Option<Endpoint>,
}

impl StandardClientModel {
    /// 创建空模型，契约与端点待后续补全。
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明模型可达的服务契约。
    pub fn with_contract(mut self, contract: ServiceContract) -> Self {
        self.contract = Some(contract);
        self
    }

    /// 绑定端点。
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }
}

impl ClientModel for StandardClientModel {
    fn contract(&self) -> Option<&ServiceContract> {
        self.contract.as_ref()
    }

    fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    fn for_endpoint(&self, endpoint: Endpoint) -> Arc<dyn ClientModel> {
        Arc::new(Self {
            contract: self.contract,
            endpoint: Some(endpoint),
        })
    }

    fn variant_name(&self) -> &'static str {
        type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait OrderService {}

    #[test]
    fn for_endpoint_leaves_original_untouched() {
        let original = StandardClientModel::new()
            .with_contract(ServiceContract::of::<dyn OrderService>())
            .with_endpoint(Endpoint::physical("tcp", "orders-a", 7000));
        let derived = original.for_endpoint(Endpoint::physical("tcp", "orders-b", 7001));

        assert_eq!(original.endpoint().unwrap().authority(), "orders-a");
        assert_eq!(derived.endpoint().unwrap().authority(), "orders-b");
        assert_eq!(
            derived.contract().copied(),
            Some(ServiceContract::of::<dyn OrderService>())
        );
    }

    #[test]
    fn variant_key_tracks_concrete_type() {
        let model = StandardClientModel::new();
        assert_eq!(
            model_variant(&model),
            TypeId::of::<StandardClientModel>()
        );
    }
}
