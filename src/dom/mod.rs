pub mod memory;
pub mod terminal;

use std::sync::Arc;

pub use memory::MemoryDom;
pub use terminal::TerminalDom;

/// The single element every result, error and loading marker is written to.
pub const RESULT_OUTPUT: &str = "resultOutput";

// form field ids
pub const KEYWORD: &str = "keyword";
pub const CATEGORY: &str = "category";
pub const STOCK: &str = "stock";
pub const MIN_PRICE: &str = "minPrice";
pub const MAX_PRICE: &str = "maxPrice";
pub const PRODUCT_NAME: &str = "productName";
pub const PRODUCT_CATEGORY: &str = "productCategory";
pub const PRODUCT_QUANTITY: &str = "productQuantity";
pub const PRODUCT_STOCK: &str = "productStock";
pub const PRODUCT_PRICE: &str = "productPrice";
pub const LOOKUP_NAME: &str = "productLookupName";
pub const UPDATE_ID: &str = "updateProductId";
pub const UPDATE_NAME: &str = "updateProductName";
pub const UPDATE_CATEGORY: &str = "updateProductCategory";
pub const UPDATE_QUANTITY: &str = "updateProductQuantity";
pub const UPDATE_STOCK: &str = "updateProductStock";
pub const UPDATE_PRICE: &str = "updateProductPrice";
pub const DELETE_ID: &str = "deleteProductId";

/// Access to the page the bridge is bound to: reading form fields and
/// replacing the markup of an element.
///
/// Writes go through `&self` so several in-flight requests can share one page.
pub trait Dom {
    fn value(&self, id: &str) -> Option<String>;

    fn set_html(&self, id: &str, html: &str);
}

impl<T: Dom + ?Sized> Dom for &T {
    fn value(&self, id: &str) -> Option<String> {
        (**self).value(id)
    }

    fn set_html(&self, id: &str, html: &str) {
        (**self).set_html(id, html)
    }
}

impl<T: Dom + ?Sized> Dom for Arc<T> {
    fn value(&self, id: &str) -> Option<String> {
        (**self).value(id)
    }

    fn set_html(&self, id: &str, html: &str) {
        (**self).set_html(id, html)
    }
}
