//! Order catalog and customer directory loading.
//!
//! A catalog is a JSON object mapping each customer location to the list of
//! orders placed from it:
//!
//! ```json
//! {
//!   "Harbor Cafe": [
//!     {
//!       "order_id": "harbor_1",
//!       "send_time": 6,
//!       "plants": [
//!         { "plant_filename": "pothos.png", "plant_name_fi": "Kultaköynnös", "plant_name_en": "Pothos", "amount": 2 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Orders come out in file order (locations in the order written, orders in
//! list order) and form the initial AVAILABLE pool. Both the current key
//! names (`base_delay`, `item_id`, `name_<locale>`) and the older editor
//! names (`send_time`, `plant_filename`, `filename`, `plant_name_<locale>`)
//! are accepted. `base_delay` defaults to 0 and `amount` to 1.
//!
//! The optional customer directory is a JSON list of `{ "name", "email" }`
//! objects; it attaches a contact address to every order of that location.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use greenhaul_types::{ItemId, LocationKey, OrderId, OrderRecord, PlantRequest};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::LoadError;

const PLANT_NAME_PREFIX: &str = "plant_name_";
const NAME_PREFIX: &str = "name_";

// ---------------------------------------------------------------------------
// Raw JSON shapes
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawOrder {
    order_id: Option<String>,
    #[serde(default, alias = "send_time")]
    base_delay: f64,
    #[serde(default)]
    plants: Vec<RawPlant>,
}

#[derive(Deserialize)]
struct RawPlant {
    #[serde(alias = "plant_filename", alias = "filename")]
    item_id: Option<String>,
    #[serde(default = "default_amount")]
    amount: u32,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

const fn default_amount() -> u32 {
    1
}

#[derive(Deserialize)]
struct RawCustomer {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

/// Collect `name_<locale>` and `plant_name_<locale>` keys into a locale map.
///
/// `plant_name_<locale>` wins when both spellings are present.
fn localized_names(extra: &BTreeMap<String, Value>) -> BTreeMap<String, String> {
    let mut names = BTreeMap::new();
    for (key, value) in extra {
        let Some(text) = value.as_str().filter(|t| !t.is_empty()) else {
            continue;
        };
        if let Some(locale) = key.strip_prefix(PLANT_NAME_PREFIX) {
            names.insert(locale.to_owned(), text.to_owned());
        } else if let Some(locale) = key.strip_prefix(NAME_PREFIX) {
            names
                .entry(locale.to_owned())
                .or_insert_with(|| text.to_owned());
        }
    }
    names
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CustomerDirectory
// ---------------------------------------------------------------------------

/// Contact addresses of customer locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDirectory {
    emails: BTreeMap<LocationKey, String>,
}

impl CustomerDirectory {
    /// Parse a directory from a JSON list of `{ "name", "email" }` objects.
    ///
    /// Entries without a name are skipped. Extra fields are ignored.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let raw: Vec<RawCustomer> = serde_json::from_str(json)?;
        let emails = raw
            .into_iter()
            .filter(|c| !c.name.is_empty())
            .map(|c| (LocationKey::new(c.name), c.email))
            .collect();
        Ok(Self { emails })
    }

    /// Read and parse a directory file.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        Self::from_json(&read_file(path)?)
    }

    /// Contact address of `location`, if one is listed and non-empty.
    pub fn email(&self, location: &str) -> Option<&str> {
        self.emails
            .get(location)
            .map(String::as_str)
            .filter(|e| !e.is_empty())
    }

    /// Number of listed locations.
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// Whether the directory lists no locations.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

// ---------------------------------------------------------------------------
// OrderCatalog
// ---------------------------------------------------------------------------

/// Every order of one map, validated and ready to seed the scheduler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderCatalog {
    orders: Vec<OrderRecord>,
}

impl OrderCatalog {
    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] for malformed JSON, and the matching
    /// [`LoadError`] variant for a missing `order_id`, a plant without an
    /// item, an empty plant list, a zero amount, a negative delay, or a
    /// repeated `order_id`.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        // `preserve_order` keeps locations in document order.
        let lists: Map<String, Value> = serde_json::from_str(json)?;

        let mut seen: BTreeSet<OrderId> = BTreeSet::new();
        let mut orders = Vec::new();
        for (location, value) in lists {
            let raw_orders: Vec<RawOrder> = serde_json::from_value(value)?;
            for raw in raw_orders {
                let order = build_order(&location, raw)?;
                if !seen.insert(order.order_id.clone()) {
                    return Err(LoadError::DuplicateOrder {
                        order_id: order.order_id,
                    });
                }
                orders.push(order);
            }
        }
        Ok(Self { orders })
    }

    /// Read and parse a catalog file.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        Self::from_json(&read_file(path)?)
    }

    /// Attach customer contact addresses from `directory`.
    #[must_use]
    pub fn with_customers(mut self, directory: &CustomerDirectory) -> Self {
        for order in &mut self.orders {
            order.customer_email = directory.email(order.location.as_str()).map(str::to_owned);
        }
        self
    }

    /// The orders, in file order.
    pub fn orders(&self) -> &[OrderRecord] {
        &self.orders
    }

    /// Consume the catalog and return its orders.
    pub fn into_orders(self) -> Vec<OrderRecord> {
        self.orders
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether the catalog holds no orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Every item requested by any order. Used to stock the greenhouse.
    pub fn item_ids(&self) -> BTreeSet<ItemId> {
        self.orders
            .iter()
            .flat_map(|o| o.requests.iter().map(|r| r.item_id.clone()))
            .collect()
    }

    /// Distinct locations, in file order.
    pub fn locations(&self) -> Vec<&LocationKey> {
        let mut out: Vec<&LocationKey> = Vec::new();
        for order in &self.orders {
            if !out.contains(&&order.location) {
                out.push(&order.location);
            }
        }
        out
    }
}

fn build_order(location: &str, raw: RawOrder) -> Result<OrderRecord, LoadError> {
    let order_id = match raw.order_id {
        Some(id) if !id.is_empty() => OrderId::new(id),
        _ => {
            return Err(LoadError::MissingOrderId {
                location: location.to_owned(),
            });
        }
    };

    if !raw.base_delay.is_finite() || raw.base_delay < 0.0 {
        return Err(LoadError::InvalidDelay {
            order_id,
            value: raw.base_delay,
        });
    }

    if raw.plants.is_empty() {
        return Err(LoadError::EmptyOrder { order_id });
    }

    let mut requests = Vec::with_capacity(raw.plants.len());
    for plant in raw.plants {
        let item = match plant.item_id {
            Some(item) if !item.is_empty() => item,
            _ => return Err(LoadError::MissingItem { order_id }),
        };
        if plant.amount == 0 {
            return Err(LoadError::ZeroAmount {
                order_id,
                item_id: item,
            });
        }
        requests.push(PlantRequest {
            item_id: ItemId::new(item),
            names: localized_names(&plant.extra),
            requested_amount: plant.amount,
        });
    }

    Ok(OrderRecord::new(order_id, location, requests, raw.base_delay))
}
