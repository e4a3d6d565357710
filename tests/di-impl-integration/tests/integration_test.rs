//! 依赖注入层端到端集成测试

use anyhow::Result;
use di_abstractions::{autowired, Autowired};
use di_common::{DependencyResult, InterfaceKey, ServiceScope};
use di_composition::{ApplicationBuilder, DiSettings};
use di_impl::{
    get_service_registry, service, BaseService, RegistryWarningKind, RequestScopedBaseService,
    Service, ServiceArgs, ServiceCatalog,
};
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tempfile::NamedTempFile;

trait IPriceSource: Send + Sync {
    fn price(&self, sku: &str) -> u64;
}

/// 应用作用域的价格表
struct PriceTable {
    base: BaseService,
}

impl IPriceSource for PriceTable {
    fn price(&self, sku: &str) -> u64 {
        sku.len() as u64 * 100
    }
}

impl Service for PriceTable {
    fn scope_marker() -> Option<ServiceScope> {
        Some(ServiceScope::Application)
    }

    fn create(args: &ServiceArgs) -> DependencyResult<Self> {
        Ok(Self {
            base: BaseService::new(args)?,
        })
    }
}

/// 请求作用域的购物车
struct Cart {
    base: RequestScopedBaseService,
    prices: Autowired<PriceTable>,
    total: AtomicU64,
}

impl Cart {
    fn add(&self, sku: &str) -> DependencyResult<u64> {
        let price = self.prices.get(&self.base)?.price(sku);
        Ok(self.total.fetch_add(price, Ordering::SeqCst) + price)
    }
}

impl Service for Cart {
    fn scope_marker() -> Option<ServiceScope> {
        Some(ServiceScope::Request)
    }

    fn create(args: &ServiceArgs) -> DependencyResult<Self> {
        Ok(Self {
            base: RequestScopedBaseService::new(args)?,
            prices: autowired(InterfaceKey::interface::<dyn IPriceSource>(), "")
                .bind("prices")
                .bind("price_source"),
            total: AtomicU64::new(0),
        })
    }
}

/// 同一请求中依赖购物车的结账服务
struct Checkout {
    base: RequestScopedBaseService,
    cart: Autowired<Cart>,
}

impl Service for Checkout {
    fn scope_marker() -> Option<ServiceScope> {
        Some(ServiceScope::Request)
    }

    fn create(args: &ServiceArgs) -> DependencyResult<Self> {
        Ok(Self {
            base: RequestScopedBaseService::new(args)?,
            cart: Autowired::by_type().bind("cart"),
        })
    }
}

fn catalog() -> ServiceCatalog {
    ServiceCatalog::new()
        .with(service::<PriceTable>().with_interface(InterfaceKey::interface::<dyn IPriceSource>()))
        .with(service::<Cart>())
        .with(service::<Checkout>())
}

#[test]
fn test_request_scope_end_to_end() -> Result<()> {
    let app = ApplicationBuilder::new().add_catalog(catalog()).build()?;

    let request = app.request_context();
    let checkout: Arc<Checkout> = request.find_service(&InterfaceKey::of::<Checkout>(), "")?;
    let cart: Arc<Cart> = request.find_service(&InterfaceKey::of::<Cart>(), "")?;

    assert_eq!(cart.add("abc")?, 300);
    let same_cart = checkout.cart.get(&checkout.base)?;
    assert!(Arc::ptr_eq(&cart, &same_cart));
    assert_eq!(same_cart.add("de")?, 500);

    let by_alias = cart.prices.get_as("price_source", &cart.base)?;
    assert!(Arc::ptr_eq(&by_alias, &cart.prices.get(&cart.base)?));

    drop(request);
    let next = app.request_context();
    let fresh: Arc<Cart> = next.find_service(&InterfaceKey::of::<Cart>(), "")?;
    assert!(!Arc::ptr_eq(&cart, &fresh));
    assert_eq!(fresh.add("a")?, 100);
    Ok(())
}

#[test]
fn test_request_services_released_with_context() -> Result<()> {
    let app = ApplicationBuilder::new().add_catalog(catalog()).build()?;

    let request = app.request_context();
    let checkout: Arc<Checkout> = request.find_service(&InterfaceKey::of::<Checkout>(), "")?;
    let cart = checkout.cart.get(&checkout.base)?;
    assert_eq!(cart.add("abc")?, 300);

    let cart_ref: Weak<Cart> = Arc::downgrade(&cart);
    let checkout_ref = Arc::downgrade(&checkout);
    drop(cart);
    drop(checkout);

    // 请求仍在进行时缓存持有实例
    assert!(cart_ref.upgrade().is_some());

    drop(request);
    assert!(checkout_ref.upgrade().is_none());
    assert!(cart_ref.upgrade().is_none());
    Ok(())
}

#[test]
fn test_service_registry_exposes_application_services() -> Result<()> {
    let app = ApplicationBuilder::new().add_catalog(catalog()).build()?;

    let services = get_service_registry(app.registry());
    assert_eq!(services.attribute_names(), ["price_source"]);
    let prices = services
        .get::<PriceTable>("price_source")
        .expect("价格表已注册");
    assert!(Arc::ptr_eq(&prices.base.registry()?, app.registry()));
    Ok(())
}

#[test]
fn test_settings_and_duplicate_catalogs() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "[registry]\nname = \"shop\"\n\n[logging]\nlevel = \"debug\"")?;

    let settings = DiSettings::from_file(file.path())?;
    let app = ApplicationBuilder::new()
        .with_settings(settings)
        .add_catalog(catalog())
        .add_catalog(ServiceCatalog::new().with(
            service::<PriceTable>().with_interface(InterfaceKey::interface::<dyn IPriceSource>()),
        ))
        .build()?;

    assert_eq!(app.registry().name(), "shop");
    let warnings = app.registry().warnings();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        warnings[0].kind,
        RegistryWarningKind::DuplicateRegistration { .. }
    ));
    Ok(())
}
