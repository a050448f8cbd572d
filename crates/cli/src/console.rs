//! Line-oriented [`Presenter`] for the terminal.

use std::io::{self, Write};

use store_counter_core::QuantityPolicy;
use store_counter_terminal::{Container, ListContent, Panel, Presenter, Severity};
use store_counter_terminal::presenter::ProductDetailView;

/// Writes every presenter call as plain text lines.
pub struct ConsolePresenter<W> {
    out: W,
}

impl ConsolePresenter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write raw lines, e.g. a JSON payload.
    pub fn print(&mut self, text: &str) {
        self.line(format_args!("{text}"));
    }

    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{args}") {
            tracing::warn!(error = %err, "failed to write to console");
        }
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn render_list(&mut self, container: Container, content: ListContent) {
        if container == Container::Products {
            self.line(format_args!("Products:"));
        }
        match content {
            ListContent::Empty(message) => self.line(format_args!("  {message}")),
            ListContent::Products(cards) => {
                for card in cards {
                    self.line(format_args!(
                        "  [{}] {:<24} {:>12}  stock {}",
                        card.product_id, card.name, card.price_label, card.stock_label
                    ));
                }
            }
            ListContent::LineItems { lines, total_label } => {
                for (index, line) in lines.iter().enumerate() {
                    self.line(format_args!(
                        "  {index}. {:<24} {:>8} x {:>12} = {:>10}",
                        line.name, line.quantity_label, line.unit_price_label, line.line_total_label
                    ));
                }
                self.line(format_args!("  Total: {total_label}"));
            }
        }
    }

    fn show_status(&mut self, panel: Panel, message: &str, severity: Severity) {
        let marker = match severity {
            Severity::Success => "ok",
            Severity::Error => "error",
        };
        self.line(format_args!("[{}] {marker}: {message}", panel.id()));
    }

    fn set_quantity_input_policy(&mut self, policy: &QuantityPolicy) {
        self.line(format_args!(
            "  quantity: step {}, max {}, default {}",
            policy.step.normalize(),
            policy.max.normalize(),
            policy.default_value
        ));
    }

    fn show_product_detail(&mut self, detail: &ProductDetailView) {
        self.line(format_args!(
            "  {} ({}) - {}, available {}",
            detail.name, detail.product_id, detail.price_label, detail.available_label
        ));
    }

    fn hide_product_detail(&mut self) {}
}
