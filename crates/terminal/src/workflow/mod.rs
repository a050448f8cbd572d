//! Order-composition workflow.
//!
//! The [`WorkflowController`] owns the session and drives the clerk through
//!
//! ```text
//! Idle -> CustomerPending -> CustomerReady -> CategorySelected <-> ProductSelected
//! ```
//!
//! Confirming a quantity on `ProductSelected` appends a line and returns to
//! `CategorySelected`. There is no terminal state: the cart is handed to an
//! external checkout stage.
//!
//! # Failures
//!
//! A failed transition leaves the state as it was and posts one error status
//! on the panel it came from. Local preconditions are checked before any
//! backend call.
//!
//! # Overlapping product picks
//!
//! Product detail is requested through [`WorkflowController::begin_product_request`]
//! and applied through [`WorkflowController::complete_product_request`]. Each
//! request gets a [`RequestTag`]; only the latest tag is applied, so a slow
//! response for an earlier pick can never replace a newer selection.
//! [`WorkflowController::select_product`] does both steps back to back.

mod state;

use rust_decimal::Decimal;
use store_counter_core::{
    Cart, CartAccumulator, CheckoutRequest, Customer, LineItem, PaymentMethod, Phone, Product,
    ProductId, SelectedProduct,
};
use tracing::{debug, info, instrument, warn};

pub use state::{RequestTag, WorkflowState};
use state::RequestTracker;

use crate::backend::{ApiError, Backend};
use crate::error::{WorkflowError, add_breadcrumb};
use crate::presenter::{Container, ListContent, Panel, Presenter, ProductDetailView, Severity};

/// Session-scoped state owned by the controller.
#[derive(Debug, Default)]
pub struct Session {
    state: WorkflowState,
    order: CartAccumulator,
    category: Option<String>,
    product_requests: RequestTracker,
}

impl Session {
    #[must_use]
    pub const fn state(&self) -> WorkflowState {
        self.state
    }

    #[must_use]
    pub const fn customer(&self) -> Option<&Customer> {
        self.order.customer()
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&SelectedProduct> {
        self.order.selected()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        self.order.cart()
    }

    /// The category currently listed.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The product whose detail is still being fetched, if any.
    #[must_use]
    pub const fn pending_product(&self) -> Option<ProductId> {
        match self.product_requests.outstanding() {
            Some((_, product_id)) => Some(product_id),
            None => None,
        }
    }
}

/// Outcome of a product-detail response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductResolution {
    /// The response was applied and is now the selection.
    Selected(SelectedProduct),
    /// A newer pick superseded this request; the response was dropped.
    Superseded,
}

/// Drives the order-composition workflow against a backend and a presenter.
pub struct WorkflowController<B, P> {
    backend: B,
    presenter: P,
    session: Session,
}

impl<B, P> WorkflowController<B, P>
where
    B: Backend,
    P: Presenter,
{
    /// Create a controller with a fresh session.
    pub fn new(backend: B, presenter: P) -> Self {
        Self {
            backend,
            presenter,
            session: Session::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> WorkflowState {
        self.session.state
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub const fn presenter(&self) -> &P {
        &self.presenter
    }

    pub const fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    // =========================================================================
    // Customer
    // =========================================================================

    /// React to an edit of either customer field.
    ///
    /// Registration fires only when both trimmed fields are non-blank, so
    /// partial input never reaches the backend. Every edit re-evaluates the
    /// gate, which is also how the clerk retries after a failure.
    ///
    /// Returns the registered customer, or `None` if the gate is not met.
    ///
    /// # Errors
    ///
    /// Returns the registration failure after reporting it on the customer
    /// panel. The previously active customer, if any, is kept.
    #[instrument(skip_all, fields(state = %self.session.state))]
    pub async fn customer_fields_changed(
        &mut self,
        name: &str,
        phone: &str,
    ) -> Result<Option<Customer>, WorkflowError> {
        if name.is_empty() && phone.is_empty() {
            return Ok(None);
        }
        if self.session.state == WorkflowState::Idle {
            self.transition(WorkflowState::CustomerPending);
        }

        let name = name.trim();
        if name.is_empty() || phone.trim().is_empty() {
            return Ok(None);
        }

        let phone = match Phone::parse(phone) {
            Ok(phone) => phone,
            Err(err) => {
                return Err(self.fail(Panel::Customer, "Error registering customer: ", err.into()));
            }
        };

        add_breadcrumb("workflow", "Registering customer", None);
        match self.backend.register_customer(name, &phone).await {
            Ok(customer) => {
                info!(user_id = %customer.user_id, "customer registered");
                if let Some(previous) = self.session.order.set_customer(customer.clone())
                    && previous.user_id != customer.user_id
                {
                    info!(previous = %previous.user_id, "active customer replaced");
                }
                if self.session.state < WorkflowState::CustomerReady {
                    self.transition(WorkflowState::CustomerReady);
                }
                self.presenter.show_status(
                    Panel::Customer,
                    &format!("Customer registered (ID: {})", customer.user_id),
                    Severity::Success,
                );
                Ok(Some(customer))
            }
            Err(err) => Err(self.fail(Panel::Customer, "Error registering customer: ", err.into())),
        }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List a category.
    ///
    /// A blank category is ignored and returns `None`. On success any open
    /// product detail is closed, outstanding product requests are dropped,
    /// and the listing (or the "no products" message) is rendered.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::OutOfOrder`] without a backend call if no
    /// customer is registered, or the catalog failure after reporting it on
    /// the product panel.
    #[instrument(skip(self), fields(state = %self.session.state))]
    pub async fn select_category(
        &mut self,
        category: &str,
    ) -> Result<Option<Vec<Product>>, WorkflowError> {
        let category = category.trim();
        if category.is_empty() {
            return Ok(None);
        }
        if self.session.order.customer().is_none() {
            let err = self.out_of_order("choose a category", "register a customer first");
            return Err(self.fail(Panel::Customer, "", err));
        }

        add_breadcrumb("workflow", "Listing category", Some(&[("category", category)]));
        match self.backend.list_products(category).await {
            Ok(products) => {
                info!(count = products.len(), "category listed");
                self.session.product_requests.invalidate();
                if self.session.order.clear_selection().is_some() {
                    self.presenter.hide_product_detail();
                }
                self.session.category = Some(category.to_owned());
                self.transition(WorkflowState::CategorySelected);
                self.presenter
                    .render_list(Container::Products, ListContent::for_products(&products));
                Ok(Some(products))
            }
            Err(err) => Err(self.fail(Panel::Product, "Error loading products: ", err.into())),
        }
    }

    // =========================================================================
    // Product detail
    // =========================================================================

    /// Record a product pick and issue the tag its response must carry.
    ///
    /// Issuing a tag supersedes every earlier outstanding request.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::OutOfOrder`] if no category is listed.
    pub fn begin_product_request(
        &mut self,
        product_id: ProductId,
    ) -> Result<RequestTag, WorkflowError> {
        if self.session.state < WorkflowState::CategorySelected {
            let err = self.out_of_order("select a product", "choose a category first");
            return Err(self.fail(Panel::Product, "", err));
        }

        let tag = self.session.product_requests.issue(product_id);
        debug!(%tag, %product_id, "product request issued");
        add_breadcrumb(
            "workflow",
            "Selecting product",
            Some(&[("product_id", &product_id.to_string())]),
        );
        Ok(tag)
    }

    /// Apply the response of a product request.
    ///
    /// Responses for anything but the latest pick are dropped without
    /// touching the selection or the presenter, failures included.
    ///
    /// # Errors
    ///
    /// Returns the resolver failure after reporting it on the product panel.
    /// The previous selection, if any, survives.
    pub fn complete_product_request(
        &mut self,
        tag: RequestTag,
        result: Result<Product, ApiError>,
    ) -> Result<ProductResolution, WorkflowError> {
        let Some(requested) = self.session.product_requests.settle(tag) else {
            debug!(%tag, ok = result.is_ok(), "dropping superseded product response");
            return Ok(ProductResolution::Superseded);
        };

        match result {
            Ok(product) => {
                if product.product_id != requested {
                    warn!(%requested, returned = %product.product_id, "backend returned a different product");
                }
                let selected = self.session.order.select(product).clone();
                info!(product_id = %selected.product.product_id, step = %selected.policy.step, max = %selected.policy.max, "product selected");
                self.transition(WorkflowState::ProductSelected);
                self.presenter
                    .show_product_detail(&ProductDetailView::from(&selected.product));
                self.presenter.set_quantity_input_policy(&selected.policy);
                Ok(ProductResolution::Selected(selected))
            }
            Err(err) => Err(self.fail(Panel::Product, "Error loading product: ", err.into())),
        }
    }

    /// Pick a product and wait for its detail.
    ///
    /// # Errors
    ///
    /// See [`Self::begin_product_request`] and [`Self::complete_product_request`].
    #[instrument(skip(self), fields(state = %self.session.state))]
    pub async fn select_product(
        &mut self,
        product_id: ProductId,
    ) -> Result<ProductResolution, WorkflowError> {
        let tag = self.begin_product_request(product_id)?;
        let result = self.backend.get_product(product_id).await;
        self.complete_product_request(tag, result)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Confirm a quantity for the selected product and add it to the cart.
    ///
    /// The bound is checked against the stock captured when the product was
    /// fetched; authoritative stock checks happen at checkout.
    ///
    /// # Errors
    ///
    /// Returns the cart precondition failure after reporting it on the cart
    /// panel. Nothing changes on failure.
    pub fn confirm_quantity(&mut self, quantity: Decimal) -> Result<LineItem, WorkflowError> {
        match self.session.order.add_line_item(quantity) {
            Ok(line) => {
                info!(product_id = %line.product_id, quantity = %line.quantity, lines = self.session.order.cart().len(), "line item added");
                add_breadcrumb(
                    "workflow",
                    "Added line item",
                    Some(&[("product_id", &line.product_id.to_string())]),
                );
                self.transition(WorkflowState::CategorySelected);
                self.presenter.hide_product_detail();
                self.render_cart();
                self.presenter.show_status(
                    Panel::Cart,
                    &format!(
                        "Added {} {} {} to cart",
                        line.quantity.normalize(),
                        line.unit,
                        line.name
                    ),
                    Severity::Success,
                );
                Ok(line)
            }
            Err(err) => Err(self.fail(Panel::Cart, "Could not add to cart: ", err.into())),
        }
    }

    /// Remove a confirmed line, e.g. to re-add it with a corrected quantity.
    ///
    /// # Errors
    ///
    /// Returns [`store_counter_core::CartError::LineNotFound`] (wrapped) after
    /// reporting it on the cart panel.
    pub fn remove_line_item(&mut self, index: usize) -> Result<LineItem, WorkflowError> {
        match self.session.order.remove_line_item(index) {
            Ok(line) => {
                info!(product_id = %line.product_id, index, "line item removed");
                self.render_cart();
                self.presenter.show_status(
                    Panel::Cart,
                    &format!("Removed {} from cart", line.name),
                    Severity::Success,
                );
                Ok(line)
            }
            Err(err) => Err(self.fail(Panel::Cart, "Could not remove line: ", err.into())),
        }
    }

    /// Empty the cart, keeping the customer and the current listing.
    pub fn clear_cart(&mut self) {
        self.session.order.clear();
        self.render_cart();
    }

    /// Build the hand-off payload for the external checkout stage.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NoCustomer`] or an empty-cart error after
    /// reporting it on the cart panel.
    pub fn checkout_request(
        &mut self,
        payment_method: PaymentMethod,
    ) -> Result<CheckoutRequest, WorkflowError> {
        let result = match self.session.order.customer() {
            Some(customer) => {
                CheckoutRequest::from_cart(customer, self.session.order.cart(), payment_method)
                    .map_err(WorkflowError::from)
            }
            None => Err(WorkflowError::NoCustomer),
        };

        result.map_err(|err| self.fail(Panel::Cart, "Cannot check out: ", err))
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Start over: forget the customer, selection, listing and cart.
    ///
    /// Outstanding product requests become stale.
    pub fn reset(&mut self) {
        info!("session reset");
        self.session.order.reset();
        self.session.category = None;
        self.session.product_requests.invalidate();
        self.transition(WorkflowState::Idle);
        self.presenter.hide_product_detail();
        self.render_cart();
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn transition(&mut self, next: WorkflowState) {
        if self.session.state != next {
            info!(from = %self.session.state, to = %next, "workflow transition");
            self.session.state = next;
        }
    }

    fn render_cart(&mut self) {
        self.presenter.render_list(
            Container::Cart,
            ListContent::for_cart(self.session.order.cart()),
        );
    }

    const fn out_of_order(&self, action: &'static str, hint: &'static str) -> WorkflowError {
        WorkflowError::OutOfOrder {
            action,
            hint,
            state: self.session.state,
        }
    }

    /// Report a failure to the clerk and hand it back.
    fn fail(&mut self, panel: Panel, context: &str, err: WorkflowError) -> WorkflowError {
        warn!(panel = panel.id(), state = %self.session.state, error = %err, "transition failed");
        self.presenter
            .show_status(panel, &format!("{context}{err}"), Severity::Error);
        err
    }
}
