//! Interactive order composition.
//!
//! Reads one command per line from stdin and feeds it to a
//! [`WorkflowController`]. Failed steps are reported by the controller and
//! the session carries on, so the clerk can correct and retry.

use std::io::Write;
use std::str::FromStr;

use rust_decimal::Decimal;
use store_counter_core::{PaymentMethod, ProductId};
use store_counter_terminal::{Backend, Container, ListContent, Presenter, WorkflowController};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::CommandError;
use crate::console::ConsolePresenter;

const HELP: &str = "\
Commands:
  name <NAME>          set the customer name
  phone <PHONE>        set the customer phone
  category <CATEGORY>  list a category
  select <ID>          pick a product from the listing
  qty <QUANTITY>       add the picked product to the cart
  remove <LINE>        remove a cart line (0-based)
  cart                 show the cart
  clear                empty the cart
  checkout [METHOD]    print the checkout hand-off (Cash, Card, UPI)
  reset                start a new order
  help                 show this help
  quit                 leave the session";

/// One line of clerk input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Name(String),
    Phone(String),
    Category(String),
    Select(ProductId),
    Quantity(Decimal),
    Remove(usize),
    Cart,
    Clear,
    Checkout(Option<PaymentMethod>),
    Reset,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let rest = rest.trim();

        let command = match verb.to_ascii_lowercase().as_str() {
            "name" => Self::Name(rest.to_string()),
            "phone" => Self::Phone(rest.to_string()),
            "category" | "cat" => Self::Category(rest.to_string()),
            "select" | "sel" => Self::Select(
                rest.parse()
                    .map_err(|_| format!("Invalid product ID: {rest}"))?,
            ),
            "qty" | "quantity" => Self::Quantity(
                Decimal::from_str(rest).map_err(|_| format!("Invalid quantity: {rest}"))?,
            ),
            "remove" | "rm" => {
                Self::Remove(rest.parse().map_err(|_| format!("Invalid line: {rest}"))?)
            }
            "cart" => Self::Cart,
            "clear" => Self::Clear,
            "checkout" if rest.is_empty() => Self::Checkout(None),
            "checkout" => Self::Checkout(Some(rest.parse()?)),
            "reset" => Self::Reset,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err(format!("Unknown command: {verb} (try `help`)")),
        };
        Ok(command)
    }
}

/// Customer fields as currently typed.
#[derive(Debug, Default)]
struct CustomerFields {
    name: String,
    phone: String,
}

/// Run an interactive session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or a checkout payload cannot be
/// encoded.
pub async fn run<B: Backend>(
    backend: B,
    payment_method: PaymentMethod,
) -> Result<(), CommandError> {
    let mut controller = WorkflowController::new(backend, ConsolePresenter::stdout());
    let mut fields = CustomerFields::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    controller.presenter_mut().print(HELP);

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(message) => {
                controller.presenter_mut().print(&message);
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }
        apply(&mut controller, &mut fields, command, payment_method).await?;
    }

    tracing::info!(state = %controller.state(), "Session ended");
    Ok(())
}

async fn apply<B, W>(
    controller: &mut WorkflowController<B, ConsolePresenter<W>>,
    fields: &mut CustomerFields,
    command: SessionCommand,
    default_method: PaymentMethod,
) -> Result<(), CommandError>
where
    B: Backend,
    W: Write,
{
    // Workflow errors have already been shown on their panel.
    let outcome = match command {
        SessionCommand::Name(name) => {
            fields.name = name;
            controller
                .customer_fields_changed(&fields.name, &fields.phone)
                .await
                .map(drop)
        }
        SessionCommand::Phone(phone) => {
            fields.phone = phone;
            controller
                .customer_fields_changed(&fields.name, &fields.phone)
                .await
                .map(drop)
        }
        SessionCommand::Category(category) => {
            controller.select_category(&category).await.map(drop)
        }
        SessionCommand::Select(product_id) => controller.select_product(product_id).await.map(drop),
        SessionCommand::Quantity(quantity) => controller.confirm_quantity(quantity).map(drop),
        SessionCommand::Remove(index) => controller.remove_line_item(index).map(drop),
        SessionCommand::Cart => {
            let content = ListContent::for_cart(controller.session().cart());
            controller.presenter_mut().render_list(Container::Cart, content);
            Ok(())
        }
        SessionCommand::Clear => {
            controller.clear_cart();
            Ok(())
        }
        SessionCommand::Checkout(method) => {
            match controller.checkout_request(method.unwrap_or(default_method)) {
                Ok(request) => {
                    let json = serde_json::to_string_pretty(&request)?;
                    controller.presenter_mut().print(&json);
                    Ok(())
                }
                Err(err) => Err(err),
            }
        }
        SessionCommand::Reset => {
            *fields = CustomerFields::default();
            controller.reset();
            Ok(())
        }
        SessionCommand::Help => {
            controller.presenter_mut().print(HELP);
            Ok(())
        }
        SessionCommand::Quit => Ok(()),
    };

    if let Err(err) = outcome {
        tracing::debug!(error = %err, "Session step failed");
    }
    Ok(())
}
