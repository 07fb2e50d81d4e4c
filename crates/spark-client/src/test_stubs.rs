//! 激活契约使用的官方测试桩集合。
//!
//! # 设计定位（Why）
//! - 集成测试与示例经常需要满足 [`Channel`](crate::channel::Channel)、
//!   [`ChannelBuilder`](crate::builder::ChannelBuilder)、[`ProxyFactory`](crate::activation::ProxyFactory)
//!   等契约，但多数场景仅关注激活编排逻辑本身；
//! - 统一出口避免各测试文件重复定义内存通道与记录器，并在契约调整时获得集中编译错误提示。
//!
//! # 使用方式（How）
//! - 通过 `use spark_client::test_stubs::channel::*;` 等语句引入需要的桩类型；
//! - 记录型桩（建造计数、日志记录）内部均以原子量或自旋锁同步，可跨线程共享；
//! - 所有桩在 `no_std + alloc` 环境同样可用。
//!
//! # 风险与权衡（Trade-offs）
//! - 内存通道不做任何真实 I/O，`open` 失败场景通过构造参数显式注入；
//!   如需验证真实传输行为，应替换为具体传输实现。

pub mod channel {
    //! 内存通道桩：记录打开次数，支持注入打开失败。

    use alloc::{boxed::Box, format};
    use core::sync::atomic::{AtomicUsize, Ordering};

    use spin::Mutex;

    use crate::channel::{BoxChannel, Channel, ChannelState};
    use crate::endpoint::Endpoint;
    use crate::error::{ClientError, codes};
    use crate::extensions::Extensions;

    /// 绑定到固定端点的内存通道，仅推进状态机而不做真实 I/O。
    pub struct MemoryChannel {
        endpoint: Endpoint,
        state: Mutex<ChannelState>,
        open_calls: AtomicUsize,
        fail_open: bool,
        extensions: Extensions,
    }

    impl MemoryChannel {
        /// 创建处于 `Initialized` 状态的通道。
        pub fn new(endpoint: Endpoint) -> Self {
            Self {
                endpoint,
                state: Mutex::new(ChannelState::Initialized),
                open_calls: AtomicUsize::new(0),
                fail_open: false,
                extensions: Extensions::new(),
            }
        }

        /// 创建打开必定失败的通道，用于验证通信错误传播。
        pub fn failing(endpoint: Endpoint) -> Self {
            Self {
                fail_open: true,
                ..Self::new(endpoint)
            }
        }

        /// 装箱为对象安全形态。
        pub fn boxed(self) -> BoxChannel {
            Box::new(self)
        }

        /// 返回 `open` 被调用的次数。
        pub fn open_calls(&self) -> usize {
            self.open_calls.load(Ordering::SeqCst)
        }
    }

    impl Channel for MemoryChannel {
        fn state(&self) -> ChannelState {
            *self.state.lock()
        }

        fn open(&self) -> Result<(), ClientError> {
            self.open_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_open {
                return Err(ClientError::new(
                    codes::CHANNEL_OPEN,
                    format!("无法打开到 `{}` 的内存通道", self.endpoint.authority()),
                ));
            }
            let mut state = self.state.lock();
            match *state {
                ChannelState::Initialized | ChannelState::Active => {
                    *state = ChannelState::Active;
                    Ok(())
                }
                ChannelState::Closed => Err(ClientError::new(
                    codes::CHANNEL_OPEN,
                    "通道已关闭，无法再次打开",
                )),
            }
        }

        fn close(&self) {
            *self.state.lock() = ChannelState::Closed;
        }

        fn remote_endpoint(&self) -> &Endpoint {
            &self.endpoint
        }

        fn extensions(&self) -> &Extensions {
            &self.extensions
        }
    }
}

pub mod builder {
    //! 面向 [`StandardClientModel`] 的内存通道建造桩，记录策略调用次数。

    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use crate::builder::{ChannelBuilder, CreatorBundle};
    use crate::burden::Burden;
    use crate::channel::ChannelCreator;
    use crate::contract::ServiceContract;
    use crate::error::{ClientError, codes};
    use crate::model::{ClientModel, StandardClientModel};
    use crate::test_stubs::channel::MemoryChannel;

    /// 为 [`StandardClientModel`] 派生内存通道创建函数的策略桩。
    ///
    /// # 契约说明（What）
    /// - 每次 `build_channel_creator` 产出全新的（创建函数、负担）对，并在负担上登记一项
    ///   标记资源，便于测试断言负担归属；
    /// - `build_invocations` / `channels_created` 暴露原子计数，克隆体共享同一组计数器。
    #[derive(Clone, Default)]
    pub struct MemoryChannelBuilder {
        build_invocations: Arc<AtomicUsize>,
        channels_created: Arc<AtomicUsize>,
        fail_open: bool,
    }

    impl MemoryChannelBuilder {
        /// 创建产出可正常打开通道的建造桩。
        pub fn new() -> Self {
            Self::default()
        }

        /// 创建产出打开必定失败通道的建造桩。
        pub fn with_failing_open() -> Self {
            Self {
                fail_open: true,
                ..Self::default()
            }
        }

        /// 返回策略被调用的次数。
        pub fn build_invocations(&self) -> usize {
            self.build_invocations.load(Ordering::SeqCst)
        }

        /// 返回经由本策略创建函数产出的通道总数。
        pub fn channels_created(&self) -> usize {
            self.channels_created.load(Ordering::SeqCst)
        }
    }

    impl ChannelBuilder for MemoryChannelBuilder {
        type Model = StandardClientModel;

        fn build_channel_creator(
            &self,
            model: &Self::Model,
            _contract: &ServiceContract,
        ) -> Result<CreatorBundle, ClientError> {
            self.build_invocations.fetch_add(1, Ordering::SeqCst);

            // 校验层保证端点存在；缺失视为前置条件被破坏。
            let endpoint = model.endpoint().cloned().ok_or_else(|| {
                ClientError::new(codes::ENDPOINT_MISSING, "建造桩要求模型已绑定端点")
            })?;
            let burden = Arc::new(Burden::new());
            burden.track(|| {});

            let channels_created = self.channels_created.clone();
            let fail_open = self.fail_open;
            let creator = ChannelCreator::new(move || {
                channels_created.fetch_add(1, Ordering::SeqCst);
                let channel = if fail_open {
                    MemoryChannel::failing(endpoint.clone())
                } else {
                    MemoryChannel::new(endpoint.clone())
                };
                Ok(channel.boxed())
            });
            Ok(CreatorBundle::new(creator, burden))
        }
    }
}

pub mod proxy {
    //! 记录型代理工厂桩：立即产出一条通道并包入最小代理对象。

    use alloc::{boxed::Box, sync::Arc};
    use core::sync::atomic::{AtomicUsize, Ordering};

    use crate::activation::{BoxProxy, ProxyFactory, ProxyRequest};
    use crate::burden::Burden;
    use crate::channel::{BoxChannel, Channel};
    use crate::error::ClientError;

    /// 最小代理对象：持有底层通道与负担，测试借此检查打开状态与负担附着。
    pub struct ChannelProxy {
        channel: BoxChannel,
        burden: Arc<Burden>,
    }

    impl ChannelProxy {
        /// 访问底层通道。
        pub fn channel(&self) -> &dyn Channel {
            self.channel.as_ref()
        }

        /// 访问关联负担。
        pub fn burden(&self) -> &Arc<Burden> {
            &self.burden
        }
    }

    /// 代理工厂桩：每次调用即刻通过持有者产出一条通道。
    ///
    /// # 契约说明（What）
    /// - 成功路径返回 [`ChannelProxy`]（以 [`BoxProxy`] 擦除），`proxies_created` 记录次数；
    /// - `failing` 构造的工厂返回携带自有码值的错误，用于验证实例化边界的包装行为。
    #[derive(Clone, Default)]
    pub struct RecordingProxyFactory {
        proxies_created: Arc<AtomicUsize>,
        failure: Option<(&'static str, &'static str)>,
    }

    impl RecordingProxyFactory {
        /// 创建成功路径的工厂桩。
        pub fn new() -> Self {
            Self::default()
        }

        /// 创建以给定码值失败的工厂桩。
        pub fn failing(code: &'static str, message: &'static str) -> Self {
            Self {
                failure: Some((code, message)),
                ..Self::default()
            }
        }

        /// 返回已生成的代理数量。
        pub fn proxies_created(&self) -> usize {
            self.proxies_created.load(Ordering::SeqCst)
        }
    }

    impl ProxyFactory for RecordingProxyFactory {
        fn create_proxy(&self, request: ProxyRequest<'_>) -> Result<BoxProxy, ClientError> {
            if let Some((code, message)) = self.failure {
                return Err(ClientError::new(code, message));
            }
            let holder = request.into_holder();
            let burden = holder.burden().clone();
            let channel = holder.obtain_channel()?;
            self.proxies_created.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(ChannelProxy { channel, burden }))
        }
    }
}

pub mod observability {
    //! 记录型日志桩，验证激活路径的留痕行为。

    use alloc::{
        string::{String, ToString},
        vec::Vec,
    };

    use spin::Mutex;

    use crate::observability::{LogRecord, LogSeverity, Logger};

    /// 单条被捕获的日志。
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CapturedRecord {
        pub severity: LogSeverity,
        pub message: String,
        pub attributes: Vec<(String, String)>,
    }

    /// 记录日志调用的简易 Logger，用于验证消息与字段。
    #[derive(Default)]
    pub struct RecordingLogger {
        records: Mutex<Vec<CapturedRecord>>,
    }

    impl RecordingLogger {
        /// 创建空记录器。
        pub fn new() -> Self {
            Self::default()
        }

        /// 返回全部记录的快照。
        pub fn records(&self) -> Vec<CapturedRecord> {
            self.records.lock().clone()
        }

        /// 返回最后一条记录。
        pub fn last(&self) -> Option<CapturedRecord> {
            self.records.lock().last().cloned()
        }
    }

    impl Logger for RecordingLogger {
        fn log(&self, record: &LogRecord<'_>) {
            let mut attributes = Vec::new();
            for entry in record.attributes {
                attributes.push((entry.key.to_string(), entry.value.to_string()));
            }
            self.records.lock().push(CapturedRecord {
                severity: record.severity,
                message: record.message.to_string(),
                attributes,
            });
        }
    }
}
