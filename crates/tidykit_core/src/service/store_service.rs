//! Storefront use-cases: catalogue favorites and the order list.
//!
//! # Responsibility
//! - Hold the bundled product catalogue and user display settings.
//! - Persist orders as a JSON array in `<support_dir>/Orders.json`.
//! - Issue sequential order ids from a counter in a `KeyValueStore`.
//!
//! # Invariants
//! - Order list changes are written to disk before they are reported as
//!   successful; a failed write restores the previous list.
//! - The id counter is advanced before an order is appended, so a failed
//!   append can leave a gap but never reuses an id.

use crate::kv::{KeyValueStore, KvError};
use crate::model::product::{
    validate_quantity, AppSetting, Order, OrderId, OrderValidationError, Product,
};
use crate::notify::ChangeNotifier;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

pub const DEFAULT_ORDERS_FILE_NAME: &str = "Orders.json";
pub const DEFAULT_LAST_ORDER_ID_KEY: &str = "LastOrderID";

/// Storage locations for [`MartStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// App-private directory holding the orders file. Created on open.
    pub support_dir: PathBuf,
    pub orders_file_name: String,
    pub last_order_id_key: String,
}

impl StoreConfig {
    pub fn new(support_dir: impl Into<PathBuf>) -> Self {
        Self {
            support_dir: support_dir.into(),
            orders_file_name: DEFAULT_ORDERS_FILE_NAME.to_string(),
            last_order_id_key: DEFAULT_LAST_ORDER_ID_KEY.to_string(),
        }
    }

    pub fn orders_path(&self) -> PathBuf {
        self.support_dir.join(&self.orders_file_name)
    }
}

/// Storefront failures.
#[derive(Debug)]
pub enum StoreError {
    Validation(OrderValidationError),
    Kv(KvError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Encode(serde_json::Error),
    ProductNotFound(String),
    OrderIndexOutOfRange {
        index: usize,
        len: usize,
    },
    /// The stored counter cannot be advanced any further.
    OrderIdExhausted(OrderId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Kv(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Encode(err) => write!(f, "failed to encode orders: {err}"),
            Self::ProductNotFound(name) => write!(f, "product not found: {name}"),
            Self::OrderIndexOutOfRange { index, len } => {
                write!(f, "order index {index} out of range for {len} orders")
            }
            Self::OrderIdExhausted(last) => write!(f, "order id counter exhausted at {last}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Kv(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<OrderValidationError> for StoreError {
    fn from(value: OrderValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// Published after each committed storefront change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    FavoriteToggled { name: String, is_favorite: bool },
    OrderPlaced(OrderId),
    OrderDeleted(OrderId),
    OrdersMoved,
    SettingChanged,
}

/// Storefront state holder.
pub struct MartStore<S: KeyValueStore> {
    storage: S,
    config: StoreConfig,
    app_setting: AppSetting,
    products: Vec<Product>,
    orders: Vec<Order>,
    notifier: ChangeNotifier<StoreEvent>,
}

impl<S: KeyValueStore> MartStore<S> {
    /// Opens the store with `products` from the bundle and orders from disk.
    ///
    /// A missing orders file yields an empty list; an unreadable or corrupt
    /// one is logged and also yields an empty list.
    ///
    /// # Errors
    /// - `Io` when the support directory cannot be created.
    pub fn open(config: StoreConfig, storage: S, products: Vec<Product>) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.support_dir).map_err(|source| StoreError::Io {
            path: config.support_dir.clone(),
            source,
        })?;

        let orders = load_orders(&config.orders_path());
        info!(
            "event=store_open module=store_service status=ok products={} orders={}",
            products.len(),
            orders.len()
        );

        Ok(Self {
            storage,
            config,
            app_setting: AppSetting::default(),
            products,
            orders,
            notifier: ChangeNotifier::new(),
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn favorite_products(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_favorite).collect()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn app_setting(&self) -> &AppSetting {
        &self.app_setting
    }

    pub fn set_app_setting(&mut self, setting: AppSetting) {
        if setting != self.app_setting {
            self.app_setting = setting;
            self.notifier.notify(StoreEvent::SettingChanged);
        }
    }

    /// Last order id handed out, `0` before the first order.
    pub fn last_order_id(&self) -> Result<OrderId, StoreError> {
        Ok(self.storage.get_integer(&self.config.last_order_id_key)?)
    }

    /// Flips the favorite flag of the product named `name` and returns the
    /// new value. Favorites live in memory only.
    pub fn toggle_favorite(&mut self, name: &str) -> Result<bool, StoreError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| StoreError::ProductNotFound(name.to_string()))?;
        product.is_favorite = !product.is_favorite;
        let is_favorite = product.is_favorite;
        self.notifier.notify(StoreEvent::FavoriteToggled {
            name: name.to_string(),
            is_favorite,
        });
        Ok(is_favorite)
    }

    /// Places an order for `quantity` units of `product`.
    pub fn place_order(&mut self, product: &Product, quantity: u32) -> Result<Order, StoreError> {
        validate_quantity(quantity)?;

        let key = self.config.last_order_id_key.clone();
        let last = self.storage.get_integer(&key)?;
        let id = last
            .checked_add(1)
            .ok_or(StoreError::OrderIdExhausted(last))?;
        self.storage.set_integer(&key, id)?;

        let order = Order {
            id,
            product: product.clone(),
            quantity,
        };
        self.orders.push(order.clone());
        if let Err(err) = self.save_orders() {
            self.orders.pop();
            error!(
                "event=order_place module=store_service status=rolled_back order_id={id} error={err}"
            );
            return Err(err);
        }

        info!(
            "event=order_place module=store_service status=ok order_id={id} quantity={quantity}"
        );
        self.notifier.notify(StoreEvent::OrderPlaced(id));
        Ok(order)
    }

    /// Removes the order at `index` and returns it.
    pub fn delete_order(&mut self, index: usize) -> Result<Order, StoreError> {
        let len = self.orders.len();
        if index >= len {
            return Err(StoreError::OrderIndexOutOfRange { index, len });
        }

        let removed = self.orders.remove(index);
        if let Err(err) = self.save_orders() {
            self.orders.insert(index, removed);
            error!(
                "event=order_delete module=store_service status=rolled_back index={index} error={err}"
            );
            return Err(err);
        }

        info!(
            "event=order_delete module=store_service status=ok order_id={}",
            removed.id
        );
        self.notifier.notify(StoreEvent::OrderDeleted(removed.id));
        Ok(removed)
    }

    /// Moves the orders at `from` so they land before the element that was
    /// at `to`, keeping their relative order. `to == len` moves to the end.
    pub fn move_order(&mut self, from: &[usize], to: usize) -> Result<(), StoreError> {
        let len = self.orders.len();
        if let Some(&index) = from.iter().find(|&&index| index >= len) {
            return Err(StoreError::OrderIndexOutOfRange { index, len });
        }
        if to > len {
            return Err(StoreError::OrderIndexOutOfRange { index: to, len });
        }

        let previous = self.orders.clone();
        move_offsets(&mut self.orders, from, to);
        if let Err(err) = self.save_orders() {
            self.orders = previous;
            error!("event=order_move module=store_service status=rolled_back error={err}");
            return Err(err);
        }

        self.notifier.notify(StoreEvent::OrdersMoved);
        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.notifier.subscribe()
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    fn save_orders(&self) -> Result<(), StoreError> {
        let path = self.config.orders_path();
        let bytes = serde_json::to_vec(&self.orders).map_err(StoreError::Encode)?;
        std::fs::write(&path, bytes).map_err(|source| StoreError::Io { path, source })
    }
}

fn load_orders(path: &Path) -> Vec<Order> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!("event=orders_load module=store_service status=error error={err}");
            return Vec::new();
        }
    };
    serde_json::from_slice(&bytes).unwrap_or_else(|err| {
        warn!(
            "event=orders_load module=store_service status=error error_code=decode_failed error={err}"
        );
        Vec::new()
    })
}

/// List move with "insert before original index `to`" semantics.
fn move_offsets<T>(items: &mut Vec<T>, from: &[usize], to: usize) {
    let mut offsets = from.to_vec();
    offsets.sort_unstable();
    offsets.dedup();

    let shift = offsets.iter().filter(|&&index| index < to).count();
    let mut moved = Vec::with_capacity(offsets.len());
    for &index in offsets.iter().rev() {
        moved.push(items.remove(index));
    }
    moved.reverse();

    let insert_at = to - shift;
    items.splice(insert_at..insert_at, moved);
}
