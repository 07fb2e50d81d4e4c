use alloc::sync::Arc;
use core::fmt;

use crate::endpoint::Endpoint;
use crate::model::ClientModel;

/// `CreationContext` 是单次创建请求携带的参数袋。
///
/// # 设计背景（Why）
/// - 激活层必须区分“请求级覆盖”与“组件级默认”两种配置：覆盖只影响本次创建，
///   默认被解析一次后跨请求复用。上下文只承载前者。
///
/// # 契约说明（What）
/// - `model_override`：请求级客户端模型，存在时完全绕开组件默认；
/// - `endpoint_override`：请求级端点；单独出现时会在默认（或覆盖）模型上派生特化副本；
/// - **后置条件**：上下文为只读值对象，构造完成后不再变化。
#[derive(Default)]
pub struct CreationContext {
    model_override: Option<Arc<dyn ClientModel>>,
    endpoint_override: Option<Endpoint>,
}

impl CreationContext {
    /// 创建不携带任何覆盖的上下文。
    pub fn new() -> Self {
        Self::default()
    }

    /// 携带请求级模型覆盖。
    pub fn with_model(mut self, model: Arc<dyn ClientModel>) -> Self {
        self.model_override = Some(model);
        self
    }

    /// 携带请求级端点覆盖。
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint_override = Some(endpoint);
        self
    }

    /// 返回模型覆盖。
    pub fn model_override(&self) -> Option<&Arc<dyn ClientModel>> {
        self.model_override.as_ref()
    }

    /// 返回端点覆盖。
    pub fn endpoint_override(&self) -> Option<&Endpoint> {
        self.endpoint_override.as_ref()
    }

    /// 是否携带任一覆盖。
    pub fn has_override(&self) -> bool {
        self.model_override.is_some() || self.endpoint_override.is_some()
    }
}

impl fmt::Debug for CreationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreationContext")
            .field("has_model_override", &self.model_override.is_some())
            .field("endpoint_override", &self.endpoint_override)
            .finish()
    }
}
