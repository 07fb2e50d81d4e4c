//! 策略派生缓存与默认解析的并发性质验证
//!
//! # 教案级注释概览
//!
//! - **核心目标 (Why)**：并发首次访问下，同一模型变体的策略派生必须恰好执行一次，
//!   所有竞争方共享同一份委托；默认解析的多写者竞争必须保持良性，即所有并发请求
//!   都成功且产出功能等价的通道。
//! - **设计手法 (How)**：以 `std::thread` + `Barrier` 构造同时刻的竞争窗口，
//!   原子计数器记录派生闭包与策略调用的真实次数，`Arc::ptr_eq` 断言共享同一份产物。
//! - **合同与边界 (What)**：本文件不依赖时序运气之外的调度假设；断言均为
//!   “至多/恰好一次”与“全部成功”的强性质，失败即暴露同步缺陷。

use std::any::TypeId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use spark_client::test_stubs::builder::MemoryChannelBuilder;
use spark_client::test_stubs::proxy::{ChannelProxy, RecordingProxyFactory};
use spark_client::{
    BuilderRegistry, Channel, ChannelActivator, ComponentDescriptor, CreationContext,
    CreatorFactory, CreatorFactoryCache, Endpoint, ServiceContract, StandardClientModel,
};

trait OrderService {}

const CONTENDERS: usize = 8;

#[test]
fn concurrent_lookups_derive_exactly_once() {
    let cache = Arc::new(CreatorFactoryCache::new());
    let derivations = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(CONTENDERS));

    let handles: Vec<_> = (0..CONTENDERS)
        .map(|_| {
            let cache = cache.clone();
            let derivations = derivations.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                cache.get_or_build(TypeId::of::<StandardClientModel>(), || {
                    derivations.fetch_add(1, Ordering::SeqCst);
                    CreatorFactory::new(None, "StandardClientModel")
                })
            })
        })
        .collect();

    let factories: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("lookup thread completes"))
        .collect();

    assert_eq!(derivations.load(Ordering::SeqCst), 1);
    for factory in &factories[1..] {
        assert!(Arc::ptr_eq(&factories[0], factory));
    }
    assert_eq!(cache.len(), 1);
}

#[test]
fn distinct_variants_occupy_distinct_slots() {
    let cache = CreatorFactoryCache::new();
    cache.get_or_build(TypeId::of::<StandardClientModel>(), || {
        CreatorFactory::new(None, "StandardClientModel")
    });
    cache.get_or_build(TypeId::of::<u64>(), || CreatorFactory::new(None, "u64"));
    assert_eq!(cache.len(), 2);
}

#[test]
fn concurrent_default_resolution_race_is_benign() {
    let contract = ServiceContract::of::<dyn OrderService>();
    let descriptor = Arc::new(
        ComponentDescriptor::new()
            .with_contract(contract)
            .with_default_model(Arc::new(
                StandardClientModel::new()
                    .with_contract(contract)
                    .with_endpoint(Endpoint::physical("mem", "orders-e1", 7000)),
            )),
    );
    let registry = Arc::new(BuilderRegistry::new());
    let builder = MemoryChannelBuilder::new();
    registry.register(builder.clone()).unwrap();
    let activator = Arc::new(ChannelActivator::new(
        descriptor.clone(),
        registry,
        Arc::new(CreatorFactoryCache::new()),
        Arc::new(RecordingProxyFactory::new()),
    ));

    let barrier = Arc::new(Barrier::new(CONTENDERS));
    let handles: Vec<_> = (0..CONTENDERS)
        .map(|_| {
            let activator = activator.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                activator
                    .instantiate(&CreationContext::new())
                    .expect("concurrent default activation succeeds")
            })
        })
        .collect();

    for handle in handles {
        let proxy = handle
            .join()
            .expect("activation thread completes")
            .downcast::<ChannelProxy>()
            .expect("stub proxy type");
        // 竞争期间构建的任一默认产物都绑定同一端点，功能等价。
        assert_eq!(proxy.channel().remote_endpoint().authority(), "orders-e1");
    }

    assert!(activator.is_default_resolved());
    // 允许的良性重复构建数量受竞争者数量约束。
    let raced_builds = builder.build_invocations();
    assert!((1..=CONTENDERS).contains(&raced_builds));

    // 竞争结束后进入稳定复用：不再产生新的策略调用。
    activator.instantiate(&CreationContext::new()).unwrap();
    assert_eq!(builder.build_invocations(), raced_builds);
    assert!(descriptor.default_burden().is_some());
}
