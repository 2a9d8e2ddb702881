//! Event bindings between the page's forms and the inventory API.
//!
//! Every trigger reads its fields, composes one request and writes the
//! outcome into the output region. Requests are numbered as they start; a
//! response that arrives after a newer request has started is dropped, so the
//! output always reflects the last request the user made. Numbering and the
//! loading write happen under one lock, as do the staleness check and the
//! final write, so a stale result can never land after a newer one.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use tracing::{debug, info};

use crate::client::ApiClient;
use crate::config::BridgeConfig;
use crate::dom::{self, Dom};
use crate::error::{ApiError, BridgeError};
use crate::output;
use crate::product::{self, NewProduct};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Trigger {
    ViewAll,
    Search,
    Category,
    Stock,
    PriceRange,
    AddProduct,
    ByName,
    UpdateProduct,
    DeleteProduct,
}

impl Trigger {
    pub const ALL: [Trigger; 9] = [
        Trigger::ViewAll,
        Trigger::Search,
        Trigger::Category,
        Trigger::Stock,
        Trigger::PriceRange,
        Trigger::AddProduct,
        Trigger::ByName,
        Trigger::UpdateProduct,
        Trigger::DeleteProduct,
    ];

    /// Id of the button or form the trigger is bound to.
    pub fn element_id(self) -> &'static str {
        match self {
            Self::ViewAll => "viewAllProductsBtn",
            Self::Search => "searchForm",
            Self::Category => "categoryForm",
            Self::Stock => "stockForm",
            Self::PriceRange => "priceForm",
            Self::AddProduct => "addProductForm",
            Self::ByName => "nameForm",
            Self::UpdateProduct => "updateProductForm",
            Self::DeleteProduct => "deleteProductForm",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.element_id() == id.trim())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The response was rendered.
    Rendered,
    /// The failure was rendered.
    Failed,
    /// The form did not validate; nothing was sent and the output is untouched.
    Skipped,
    /// A newer request started before this one finished; its result was dropped.
    Superseded,
}

pub struct Bridge<D> {
    dom: D,
    client: ApiClient,
    output_id: String,
    latest: Mutex<u64>,
}

impl<D: Dom> Bridge<D> {
    pub fn new(dom: D, config: &BridgeConfig) -> Result<Self, BridgeError> {
        Ok(Self {
            dom,
            client: ApiClient::new(config)?,
            output_id: config.output_id.clone(),
            latest: Mutex::new(0),
        })
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn dispatch(&self, trigger: Trigger) -> Outcome {
        debug!(element = trigger.element_id(), "trigger");
        match trigger {
            Trigger::ViewAll => self.view_all().await,
            Trigger::Search => self.search().await,
            Trigger::Category => self.category().await,
            Trigger::Stock => self.stock().await,
            Trigger::PriceRange => self.price_range().await,
            Trigger::AddProduct => self.add_product().await,
            Trigger::ByName => self.by_name().await,
            Trigger::UpdateProduct => self.update_product().await,
            Trigger::DeleteProduct => self.delete_product().await,
        }
    }

    pub async fn view_all(&self) -> Outcome {
        self.get(&[], &[]).await
    }

    pub async fn search(&self) -> Outcome {
        let Some(keyword) = self.text(dom::KEYWORD) else {
            return skipped(dom::KEYWORD);
        };
        self.get(&["search"], &[("keyword", keyword)]).await
    }

    pub async fn category(&self) -> Outcome {
        let Some(category) = product::path_value(&self.field(dom::CATEGORY)) else {
            return skipped(dom::CATEGORY);
        };
        self.get(&["category", category.as_str()], &[]).await
    }

    pub async fn stock(&self) -> Outcome {
        let Some(stock) = product::parse_int(&self.field(dom::STOCK)) else {
            return skipped(dom::STOCK);
        };
        self.get(&["stock", stock.to_string().as_str()], &[]).await
    }

    pub async fn price_range(&self) -> Outcome {
        let min = product::parse_price(&self.field(dom::MIN_PRICE));
        let max = product::parse_price(&self.field(dom::MAX_PRICE));
        let (Some(min), Some(max)) = (min, max) else {
            return skipped("minPrice/maxPrice");
        };
        self.get(
            &["price"],
            &[("minPrice", min.to_string()), ("maxPrice", max.to_string())],
        )
        .await
    }

    pub async fn add_product(&self) -> Outcome {
        let Some(new_product) = NewProduct::from_fields(
            &self.field(dom::PRODUCT_NAME),
            &self.field(dom::PRODUCT_CATEGORY),
            &self.field(dom::PRODUCT_QUANTITY),
            &self.field(dom::PRODUCT_STOCK),
            &self.field(dom::PRODUCT_PRICE),
        ) else {
            return skipped("product fields");
        };
        self.post(&new_product).await
    }

    pub async fn by_name(&self) -> Outcome {
        let Some(name) = product::path_value(&self.field(dom::LOOKUP_NAME)) else {
            return skipped(dom::LOOKUP_NAME);
        };
        self.get(&["name", name.as_str()], &[]).await
    }

    pub async fn update_product(&self) -> Outcome {
        let Some(id) = product::parse_id(&self.field(dom::UPDATE_ID)) else {
            return skipped(dom::UPDATE_ID);
        };
        let Some(changes) = NewProduct::from_fields(
            &self.field(dom::UPDATE_NAME),
            &self.field(dom::UPDATE_CATEGORY),
            &self.field(dom::UPDATE_QUANTITY),
            &self.field(dom::UPDATE_STOCK),
            &self.field(dom::UPDATE_PRICE),
        ) else {
            return skipped("product fields");
        };
        let id = id.to_string();
        self.run(async {
            let url = self.client.endpoint(&[id.as_str()])?;
            self.client.put(url, &changes).await
        })
        .await
    }

    pub async fn delete_product(&self) -> Outcome {
        let Some(id) = product::parse_id(&self.field(dom::DELETE_ID)) else {
            return skipped(dom::DELETE_ID);
        };
        let id = id.to_string();
        self.run(async {
            let url = self.client.endpoint(&[id.as_str()])?;
            self.client.delete(url).await
        })
        .await
    }

    /// Shared GET routine: base endpoint plus `segments`, with `params` as
    /// the query string when there are any.
    pub async fn get(&self, segments: &[&str], params: &[(&str, String)]) -> Outcome {
        self.run(async {
            let url = self.client.endpoint(segments)?;
            self.client.get(url, params).await
        })
        .await
    }

    /// Shared POST routine: `body` sent as JSON to the base endpoint.
    pub async fn post(&self, body: &NewProduct) -> Outcome {
        self.run(async {
            let url = self.client.endpoint(&[])?;
            self.client.post(url, body).await
        })
        .await
    }

    pub fn display_results(&self, value: &Value) {
        self.dom
            .set_html(&self.output_id, &output::render_results(value));
    }

    pub fn handle_error(&self, err: &ApiError) {
        info!(error = %err, details = ?err, "request failed");
        self.dom.set_html(&self.output_id, &output::render_error(err));
    }

    pub fn show_loading(&self) {
        self.dom.set_html(&self.output_id, &output::render_loading());
    }

    async fn run<F>(&self, request: F) -> Outcome
    where
        F: Future<Output = Result<Value, ApiError>>,
    {
        let seq = {
            let mut latest = self.latest();
            *latest += 1;
            self.show_loading();
            *latest
        };
        let result = request.await;

        let latest = self.latest();
        if *latest != seq {
            debug!(seq, latest = *latest, "dropping stale response");
            return Outcome::Superseded;
        }
        match result {
            Ok(value) => {
                self.display_results(&value);
                Outcome::Rendered
            }
            Err(err) => {
                self.handle_error(&err);
                Outcome::Failed
            }
        }
    }

    fn latest(&self) -> MutexGuard<'_, u64> {
        self.latest.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn field(&self, id: &str) -> String {
        self.dom.value(id).unwrap_or_default()
    }

    fn text(&self, id: &str) -> Option<String> {
        product::non_empty(&self.field(id))
    }
}

fn skipped(field: &str) -> Outcome {
    debug!(field, "submission skipped, no request sent");
    Outcome::Skipped
}
