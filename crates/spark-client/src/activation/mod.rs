//! 激活子系统：从创建请求编排出“已打开通道 + 负担 + 代理”的完整客户端对象。
//!
//! # 模块职责（Why）
//! - `descriptor`：容器侧的组件静态描述，含声明契约、注册默认模型与扩展侧表；
//! - `context`：单次创建请求携带的覆盖参数；
//! - `validate`：装配期校验，失败先于任何资源操作；
//! - `proxy`：代理生成协作者的接入缝；
//! - `activator`：核心编排器，实现默认/覆盖解析状态机与实例化错误翻译。

mod activator;
mod context;
mod descriptor;
mod proxy;
mod validate;

pub use activator::ChannelActivator;
pub use context::CreationContext;
pub use descriptor::ComponentDescriptor;
pub use proxy::{BoxProxy, ProxyFactory, ProxyRequest};
pub use validate::validate_client_model;
