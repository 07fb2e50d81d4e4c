use alloc::{format, string::String, sync::Arc};
use core::fmt;

use spin::RwLock;

use crate::activation::context::CreationContext;
use crate::activation::descriptor::ComponentDescriptor;
use crate::activation::proxy::{BoxProxy, ProxyFactory, ProxyRequest};
use crate::activation::validate::validate_client_model;
use crate::builder::{BuilderRegistry, CreatorFactory, CreatorFactoryCache};
use crate::burden::Burden;
use crate::channel::{Channel, ChannelCreator, ChannelHolder};
use crate::error::{ClientError, ErrorCategory, codes};
use crate::model::{ClientModel, model_variant};
use crate::observability::{KeyValue, Logger, NoopLogger};

/// 默认路径解析出的创建三元组，整体缓存、整体复用。
#[derive(Clone)]
struct ResolvedDefault {
    creator: ChannelCreator,
    burden: Arc<Burden>,
    model: Arc<dyn ClientModel>,
}

/// `ChannelActivator` 是激活层的编排核心：每个容器组件注册对应一个实例。
///
/// # 教案级说明
///
/// ## 意图 (Why)
/// - 把“解析生效模型、派生创建函数、先打开再挂负担、交给代理层”的完整链路集中到
///   单一入口，容器只需在每次请求组件实例时调用 [`ChannelActivator::instantiate`]；
/// - 默认配置的解析结果跨请求复用，覆盖配置的构建严格请求级隔离，两条路径互不干扰。
///
/// ## 解析逻辑 (How)
/// - 策略派生走 [`CreatorFactoryCache`]，同一模型变体只支付一次注册表解析成本；
/// - 默认解析槽使用 `spin::RwLock<Option<..>>`：读多写一，写入只发生在
///   `Unresolved → DefaultResolved` 迁移；
/// - 每个对外返回的创建函数都经过包装：调用时先构造原始通道，立即 `open`，
///   再把负担写入通道扩展表（未打开的通道会让首个请求在传输内部排队，必须避免）。
///
/// ## 契约定义 (What)
/// - [`ChannelActivator::instantiate`]：容器入口，返回代理对象或激活错误；
/// - [`ChannelActivator::resolve_creation`]：按上下文解析（创建函数、负担、模型）三元组；
/// - [`ChannelActivator::create_channel_creator`]：对给定模型执行校验、派生与包装。
///
/// ## 风险与权衡 (Trade-offs & Gotchas)
/// - `Unresolved → DefaultResolved` 是多写者竞争：并发的无覆盖请求可能各自构建一份
///   等价的默认创建函数，最后写入者胜出。这是刻意保留的良性竞争（所有构建产物指向
///   同一模型与端点，通道正确性不受影响），省去跨构建过程持锁的复杂度；重复构建会以
///   DEBUG 日志留痕，不视为缺陷；
/// - 解析槽只在短暂的读写瞬间持锁，绝不跨越策略调用或通道打开持锁。
pub struct ChannelActivator {
    descriptor: Arc<ComponentDescriptor>,
    registry: Arc<BuilderRegistry>,
    cache: Arc<CreatorFactoryCache>,
    proxy_factory: Arc<dyn ProxyFactory>,
    logger: Arc<dyn Logger>,
    resolved_default: RwLock<Option<ResolvedDefault>>,
}

impl ChannelActivator {
    /// 构造激活器，聚合组件描述、策略注册表、派生缓存与代理工厂。
    ///
    /// # 契约说明
    /// - **前置条件**：`cache` 通常为进程级共享实例，使策略派生在组件间摊销；
    /// - **后置条件**：激活器处于 `Unresolved` 状态，尚未解析任何默认创建函数。
    pub fn new(
        descriptor: Arc<ComponentDescriptor>,
        registry: Arc<BuilderRegistry>,
        cache: Arc<CreatorFactoryCache>,
        proxy_factory: Arc<dyn ProxyFactory>,
    ) -> Self {
        Self {
            descriptor,
            registry,
            cache,
            proxy_factory,
            logger: Arc::new(NoopLogger),
            resolved_default: RwLock::new(None),
        }
    }

    /// 注入日志后端，默认使用 [`NoopLogger`]。
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// 访问组件描述符。
    pub fn descriptor(&self) -> &Arc<ComponentDescriptor> {
        &self.descriptor
    }

    /// 默认创建函数是否已解析并缓存。
    pub fn is_default_resolved(&self) -> bool {
        self.resolved_default.read().is_some()
    }

    /// 容器入口：按创建上下文实例化一个面向调用方的代理对象。
    ///
    /// # 契约说明（What）
    /// - 配置类、通信类与既有激活类错误原样传播（它们已携带精确语义）；
    /// - 其余任何故障（通常来自代理工厂）被包装一次为 [`codes::ACTIVATION_FAILED`]，
    ///   携带受影响的契约名并保留原错误为底层原因。调用方因此只会观察到
    ///   “通信失败”与“激活失败”两种故障形态，外加装配期即返回的配置错误。
    pub fn instantiate(&self, context: &CreationContext) -> Result<BoxProxy, ClientError> {
        let result = self
            .resolve_creation(context)
            .and_then(|(creator, burden, model)| {
                let holder = ChannelHolder::new(creator, burden);
                let request = ProxyRequest::new(holder, model, &self.descriptor, context);
                self.proxy_factory.create_proxy(request)
            });

        result.map_err(|error| match error.category() {
            ErrorCategory::Configuration
            | ErrorCategory::Communication
            | ErrorCategory::Activation => error,
            ErrorCategory::Uncategorized => {
                let contract = self.contract_display_name();
                self.logger.error(
                    "实例化客户端代理时出现未预期故障",
                    Some(&error),
                    &[KeyValue::new("contract", contract.clone())],
                );
                ClientError::new(
                    codes::ACTIVATION_FAILED,
                    format!("激活服务契约 `{contract}` 的客户端代理失败"),
                )
                .with_cause(error)
            }
        })
    }

    /// 按创建上下文解析生效的（创建函数、负担、模型）三元组。
    ///
    /// # 逻辑解析（How）
    /// - 携带覆盖的请求构建请求级产物，绝不读改共享的默认槽之外的状态，也绝不写入默认槽；
    /// - 端点覆盖未伴随模型覆盖时，以“最近缓存的默认模型，其次组件注册默认”为基底派生特化副本；
    /// - 无覆盖请求首次到达时解析组件默认并缓存，之后幂等复用（复用的是策略绑定，
    ///   每次调用创建函数仍产出全新通道）。
    pub fn resolve_creation(
        &self,
        context: &CreationContext,
    ) -> Result<(ChannelCreator, Arc<Burden>, Arc<dyn ClientModel>), ClientError> {
        if context.has_override() {
            let base: Arc<dyn ClientModel> = match context.model_override() {
                Some(model) => model.clone(),
                None => self
                    .cached_default_model()
                    .or_else(|| self.descriptor.default_model().cloned())
                    .ok_or_else(|| self.missing_model_error())?,
            };
            let effective = match context.endpoint_override() {
                Some(endpoint) => base.for_endpoint(endpoint.clone()),
                None => base,
            };
            let (creator, burden) = self.create_channel_creator(&effective)?;
            return Ok((creator, burden, effective));
        }

        if let Some(default) = self.resolved_default.read().clone() {
            return Ok((default.creator, default.burden, default.model));
        }

        let model = self
            .descriptor
            .default_model()
            .cloned()
            .ok_or_else(|| self.missing_model_error())?;
        let (creator, burden) = self.create_channel_creator(&model)?;

        let duplicate = {
            let mut slot = self.resolved_default.write();
            let duplicate = slot.is_some();
            *slot = Some(ResolvedDefault {
                creator: creator.clone(),
                burden: burden.clone(),
                model: model.clone(),
            });
            duplicate
        };
        if duplicate {
            self.logger.debug(
                "默认创建函数出现并发重复构建，较早的结果已被最新写入覆盖",
                &[KeyValue::new("contract", self.contract_display_name())],
            );
        }
        self.descriptor.publish_default_burden(burden.clone());
        self.logger.info(
            "默认客户端模型已解析并缓存",
            &[
                KeyValue::new("contract", self.contract_display_name()),
                KeyValue::new("variant", model.variant_name()),
            ],
        );

        Ok((creator, burden, model))
    }

    /// 对给定模型执行校验、策略派生与创建函数包装。
    ///
    /// # 契约说明（What）
    /// - 校验失败先于任何资源操作返回（配置类错误）；
    /// - 策略缺失由派生出的委托在调用期报告为 [`codes::CREATOR_UNAVAILABLE`]；
    /// - **后置条件**：返回的创建函数每次调用产出一条已打开、已挂负担的新通道。
    pub fn create_channel_creator(
        &self,
        model: &Arc<dyn ClientModel>,
    ) -> Result<(ChannelCreator, Arc<Burden>), ClientError> {
        let contract = validate_client_model(&self.descriptor, model.as_ref())?;

        let variant = model_variant(model.as_ref());
        let factory = self.cache.get_or_build(variant, || {
            let builder = self.registry.resolve(&variant);
            self.logger.debug(
                "已为模型变体派生通道建造委托",
                &[
                    KeyValue::new("variant", model.variant_name()),
                    KeyValue::new(
                        "buildable",
                        if builder.is_some() { "true" } else { "false" },
                    ),
                ],
            );
            CreatorFactory::new(builder, model.variant_name())
        });

        let bundle = factory.build(model.as_ref(), &contract)?;
        let burden = bundle.burden;
        let creator = Self::wrap_open_on_create(bundle.creator, burden.clone());
        Ok((creator, burden))
    }

    /// 包装原始创建函数：构造后立即打开通道，并把负担写入通道扩展表。
    fn wrap_open_on_create(raw: ChannelCreator, burden: Arc<Burden>) -> ChannelCreator {
        ChannelCreator::new(move || {
            let channel = raw.create()?;
            channel.open()?;
            channel.extensions().insert(burden.clone());
            Ok(channel)
        })
    }

    /// 最近缓存的默认模型，端点覆盖派生时的首选基底。
    fn cached_default_model(&self) -> Option<Arc<dyn ClientModel>> {
        self.resolved_default
            .read()
            .as_ref()
            .map(|default| default.model.clone())
    }

    fn missing_model_error(&self) -> ClientError {
        ClientError::new(
            codes::MODEL_MISSING,
            format!(
                "组件未注册默认客户端模型，且请求未携带模型覆盖（契约 `{}`）",
                self.contract_display_name(),
            ),
        )
    }

    /// 用于日志与错误消息的契约展示名。
    fn contract_display_name(&self) -> String {
        self.descriptor
            .contract()
            .map(|contract| String::from(contract.name()))
            .or_else(|| {
                self.descriptor
                    .default_model()
                    .and_then(|model| model.contract().map(|contract| String::from(contract.name())))
            })
            .unwrap_or_else(|| String::from("<unknown>"))
    }
}

impl fmt::Debug for ChannelActivator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelActivator")
            .field("descriptor", &self.descriptor)
            .field("default_resolved", &self.is_default_resolved())
            .finish_non_exhaustive()
    }
}
