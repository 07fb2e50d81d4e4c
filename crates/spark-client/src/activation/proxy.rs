use alloc::{boxed::Box, sync::Arc};
use core::any::Any;
use core::fmt;

use crate::activation::context::CreationContext;
use crate::activation::descriptor::ComponentDescriptor;
use crate::channel::ChannelHolder;
use crate::error::ClientError;
use crate::model::ClientModel;

/// 类型擦除的代理对象：具体契约类型由下游定义，调用方按约定向下转型。
pub type BoxProxy = Box<dyn Any + Send + Sync>;

/// `ProxyRequest` 是激活器交给代理生成协作者的完整素材。
///
/// # 契约说明（What）
/// - `holder`：已包装（先打开、再挂负担）的通道创建函数与负担账本；
/// - `model`：本次创建生效的客户端模型；
/// - `descriptor` / `context`：组件静态描述与请求级参数，供代理层读取装配细节。
pub struct ProxyRequest<'a> {
    holder: ChannelHolder,
    model: Arc<dyn ClientModel>,
    descriptor: &'a ComponentDescriptor,
    context: &'a CreationContext,
}

impl<'a> ProxyRequest<'a> {
    /// 组装代理请求。
    pub fn new(
        holder: ChannelHolder,
        model: Arc<dyn ClientModel>,
        descriptor: &'a ComponentDescriptor,
        context: &'a CreationContext,
    ) -> Self {
        Self {
            holder,
            model,
            descriptor,
            context,
        }
    }

    /// 访问通道持有者。
    pub fn holder(&self) -> &ChannelHolder {
        &self.holder
    }

    /// 消费请求，取出通道持有者。
    pub fn into_holder(self) -> ChannelHolder {
        self.holder
    }

    /// 访问生效的客户端模型。
    pub fn model(&self) -> &Arc<dyn ClientModel> {
        &self.model
    }

    /// 访问组件描述符。
    pub fn descriptor(&self) -> &ComponentDescriptor {
        self.descriptor
    }

    /// 访问创建上下文。
    pub fn context(&self) -> &CreationContext {
        self.context
    }
}

impl fmt::Debug for ProxyRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyRequest")
            .field("descriptor", &self.descriptor)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// 代理生成协作者的接入契约。
///
/// # 设计背景（Why）
/// - 动态代理的产生方式（宏、代码生成、手写包装）不属于激活核心；本契约只约定素材与产物。
///
/// # 契约说明（What）
/// - **前置条件**：`request.holder()` 产出的通道已按激活语义打开并携带负担；
/// - **后置条件**：成功时返回实现服务契约的代理对象；失败时返回协作者自有码值的
///   [`ClientError`]，实例化边界会将其包装为激活失败。
pub trait ProxyFactory: Send + Sync + 'static {
    /// 以给定素材生成面向调用方的代理对象。
    fn create_proxy(&self, request: ProxyRequest<'_>) -> Result<BoxProxy, ClientError>;
}
