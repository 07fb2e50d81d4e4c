use alloc::sync::Arc;
use core::fmt;

use crate::burden::Burden;
use crate::contract::ServiceContract;
use crate::extensions::Extensions;
use crate::model::ClientModel;

/// `ComponentDescriptor` 是容器持有的组件静态描述，生命周期覆盖该组件的所有实例。
///
/// # 设计背景（Why）
/// - 声明契约与默认客户端模型属于“每注册一次”的长生命周期配置，与单次创建请求的
///   覆盖参数严格分离；
/// - 解析出的默认负担需要让容器内其他协作者可观察（例如释放策略），
///   通过显式类型化的扩展侧表发布，而非开放的对象袋。
///
/// # 契约说明（What）
/// - `contract`：组件声明的服务契约，可缺省（此时由客户端模型提供）；
/// - `default_model`：注册的默认客户端模型，无覆盖请求时的解析起点；
/// - `publish_default_burden` / `default_burden`：默认负担的发布与读取访问器；
/// - **后置条件**：描述符自身不可变，扩展侧表内部同步，允许并发读写。
#[derive(Default)]
pub struct ComponentDescriptor {
    contract: Option<ServiceContract>,
    default_model: Option<Arc<dyn ClientModel>>,
    extensions: Extensions,
}

impl ComponentDescriptor {
    /// 创建空描述符。
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明组件的服务契约。
    pub fn with_contract(mut self, contract: ServiceContract) -> Self {
        self.contract = Some(contract);
        self
    }

    /// 注册默认客户端模型。
    pub fn with_default_model(mut self, model: Arc<dyn ClientModel>) -> Self {
        self.default_model = Some(model);
        self
    }

    /// 返回声明的服务契约。
    pub fn contract(&self) -> Option<&ServiceContract> {
        self.contract.as_ref()
    }

    /// 返回注册的默认客户端模型。
    pub fn default_model(&self) -> Option<&Arc<dyn ClientModel>> {
        self.default_model.as_ref()
    }

    /// 访问扩展侧表。
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// 发布默认创建路径的负担，供其他协作者观察。
    pub fn publish_default_burden(&self, burden: Arc<Burden>) {
        self.extensions.insert(burden);
    }

    /// 读取已发布的默认负担。
    pub fn default_burden(&self) -> Option<Arc<Burden>> {
        self.extensions.get::<Burden>()
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("contract", &self.contract.map(|c| c.name()))
            .field("has_default_model", &self.default_model.is_some())
            .field("extensions", &self.extensions)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burden_publication_roundtrip() {
        let descriptor = ComponentDescriptor::new();
        assert!(descriptor.default_burden().is_none());

        let burden = Arc::new(Burden::new());
        descriptor.publish_default_burden(burden.clone());
        let published = descriptor.default_burden().expect("burden published");
        assert!(Arc::ptr_eq(&burden, &published));
    }
}
