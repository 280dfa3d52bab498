//! # Counter Session
//!
//! One operator at one terminal: a catalog, the order being rung up, and
//! the menu loop that drives them.
//!
//! ## Menu Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Main menu                     Core call                                │
//! │  ─────────                     ─────────                                │
//! │  1 Ver cardápio ─────────────► catalog.list()                           │
//! │  2 Adicionar item ───────────► order.add_item()                         │
//! │  3 Resumo do pedido ─────────► totals::compute()                        │
//! │  4 Editar cardápio ──┬───────► catalog.add_product()                    │
//! │                      ├───────► catalog.edit_product()                   │
//! │                      └───────► catalog.remove_product()                 │
//! │  5 Finalizar e sair ─────────► order.finalize()  (optional)             │
//! │  6 Emitir nota ──────────────► order.set_payment() + order.finalize()   │
//! │  7 Alterar quantidade ───────► order.set_quantity()                     │
//! │  8 Remover item ─────────────► order.remove_item()                      │
//! │  9 Limpar pedido ────────────► order.clear()                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Positions typed by the operator are 1-based; the core takes 0-based
//! indices. End of input ends the session cleanly.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use cafe_core::totals::{self, ChangeStatus};
use cafe_core::{Catalog, CoreError, Order, OrderLine, PaymentMethod, ReceiptOptions};

use crate::config::TerminalConfig;
use crate::error::AppError;

/// What the menu loop does after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Catalog and order owned by one terminal, plus its input and output.
pub struct Session<R, W> {
    input: R,
    output: W,
    catalog: Catalog,
    order: Order,
    config: TerminalConfig,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a session; the catalog starts with the café menu when
    /// `config.seed_menu` is set.
    pub fn new(input: R, output: W, config: TerminalConfig) -> Self {
        let catalog = if config.seed_menu {
            Catalog::cafe_menu()
        } else {
            Catalog::new()
        };

        Session {
            input,
            output,
            catalog,
            order: Order::new(),
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the main menu until the operator exits or input ends.
    ///
    /// Recoverable errors are shown and the menu is offered again; only
    /// I/O errors end the session early.
    pub fn run(&mut self) -> Result<(), AppError> {
        info!(order_id = %self.order.id, products = self.catalog.len(), "Session started");

        loop {
            self.print_main_menu()?;
            let Some(choice) = self.prompt("Escolha uma opção: ")? else {
                break;
            };

            let result = self.dispatch_main(choice.trim());
            if self.settle(result)? == Flow::Exit {
                break;
            }
        }

        info!(order_id = %self.order.id, status = ?self.order.status(), "Session ended");
        Ok(())
    }

    fn dispatch_main(&mut self, choice: &str) -> Result<Flow, AppError> {
        debug!(choice, "Main menu");
        match choice {
            "1" => self.show_catalog().map(|_| Flow::Continue),
            "2" => self.add_item_to_order(),
            "3" => self.show_summary().map(|_| Flow::Continue),
            "4" => self.catalog_menu(),
            "5" => self.finish(),
            "6" => self.emit_receipt(),
            "7" => self.change_quantity(),
            "8" => self.remove_item(),
            "9" => {
                self.order.clear();
                writeln!(self.output, "🧹 Pedido limpo.")?;
                Ok(Flow::Continue)
            }
            _ => Err(AppError::invalid_input("Opção inválida!")),
        }
    }

    /// Prints recoverable errors and keeps going; passes the rest up.
    fn settle(&mut self, result: Result<Flow, AppError>) -> Result<Flow, AppError> {
        match result {
            Ok(flow) => Ok(flow),
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "Action rejected");
                writeln!(self.output, "{}", e.user_message())?;
                Ok(Flow::Continue)
            }
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Prompting
    // =========================================================================

    /// Writes `question` and reads one line. `None` at end of input.
    fn prompt(&mut self, question: &str) -> Result<Option<String>, AppError> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        Ok(Some(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string()))
    }

    fn money(&self, cents: i64) -> String {
        self.config.currency.format(cents)
    }

    fn print_main_menu(&mut self) -> Result<(), AppError> {
        writeln!(self.output, "\n=== {} ===", self.config.store_name)?;
        writeln!(self.output, "1. Ver cardápio")?;
        writeln!(self.output, "2. Adicionar item ao pedido")?;
        writeln!(self.output, "3. Ver resumo do pedido")?;
        writeln!(self.output, "4. Editar cardápio")?;
        writeln!(self.output, "5. Finalizar pedido e sair")?;
        writeln!(self.output, "6. Emitir nota no terminal (comprovante)")?;
        writeln!(self.output, "7. Alterar quantidade de um item")?;
        writeln!(self.output, "8. Remover item do pedido")?;
        writeln!(self.output, "9. Limpar pedido\n")?;
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    fn show_catalog(&mut self) -> Result<(), AppError> {
        writeln!(self.output, "\n📜 CARDÁPIO ATUAL:")?;

        if self.catalog.is_empty() {
            writeln!(self.output, "⚠️ Nenhum produto cadastrado.")?;
            return Ok(());
        }

        for (i, product) in self.catalog.list().iter().enumerate() {
            writeln!(
                self.output,
                "{}. {} ({}) - {}",
                i + 1,
                product.name,
                product.category,
                self.config.currency.format(product.price_cents)
            )?;
        }
        Ok(())
    }

    fn catalog_menu(&mut self) -> Result<Flow, AppError> {
        loop {
            writeln!(self.output, "\n=== EDITAR CARDÁPIO ===")?;
            writeln!(self.output, "1. Adicionar produto")?;
            writeln!(self.output, "2. Editar produto existente")?;
            writeln!(self.output, "3. Remover produto")?;
            writeln!(self.output, "4. Voltar ao menu principal\n")?;

            let Some(choice) = self.prompt("Escolha uma opção: ")? else {
                return Ok(Flow::Exit);
            };

            let result = match choice.trim() {
                "1" => self.add_product(),
                "2" => self.edit_product(),
                "3" => self.remove_product(),
                "4" => return Ok(Flow::Continue),
                _ => Err(AppError::invalid_input("Opção inválida!")),
            };

            if self.settle(result)? == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
    }

    fn price_prompt(&self, label: &str) -> String {
        format!("{label}: {} ", self.config.currency.symbol)
    }

    fn add_product(&mut self) -> Result<Flow, AppError> {
        let Some(name) = self.prompt("\nNome do produto: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(category) = self.prompt("Categoria: ")? else {
            return Ok(Flow::Exit);
        };
        let question = self.price_prompt("Preço");
        let Some(price) = self.prompt(&question)? else {
            return Ok(Flow::Exit);
        };

        let price = self.config.currency.parse(&price)?;
        let product = self.catalog.add_product(&name, &category, price.cents())?;
        writeln!(self.output, "✅ Produto \"{}\" adicionado ao cardápio!", product.name)?;
        Ok(Flow::Continue)
    }

    fn edit_product(&mut self) -> Result<Flow, AppError> {
        self.show_catalog()?;
        let Some(number) = self.prompt("\nDigite o número do produto a editar: ")? else {
            return Ok(Flow::Exit);
        };
        let index = self.catalog_index(&number)?;

        let Some(name) = self.prompt("Novo nome: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(category) = self.prompt("Nova categoria: ")? else {
            return Ok(Flow::Exit);
        };
        let question = self.price_prompt("Novo preço");
        let Some(price) = self.prompt(&question)? else {
            return Ok(Flow::Exit);
        };

        let price = self.config.currency.parse(&price)?;
        self.catalog.edit_product(index, &name, &category, price.cents())?;
        writeln!(self.output, "✏️ Produto #{} atualizado com sucesso!", index + 1)?;
        Ok(Flow::Continue)
    }

    fn remove_product(&mut self) -> Result<Flow, AppError> {
        self.show_catalog()?;
        let Some(number) = self.prompt("\nDigite o número do produto a remover: ")? else {
            return Ok(Flow::Exit);
        };
        let index = self.catalog_index(&number)?;

        let product = self.catalog.remove_product(index)?;
        writeln!(self.output, "🗑️ Produto \"{}\" removido!", product.name)?;
        Ok(Flow::Continue)
    }

    /// Turns a typed 1-based position into a catalog index in range.
    fn catalog_index(&self, number: &str) -> Result<usize, AppError> {
        let len = self.catalog.len();
        match parse_position(number) {
            Some(index) if index < len => Ok(index),
            Some(index) => Err(CoreError::NotFound { index, len }.into()),
            None => Err(AppError::invalid_input("Produto não encontrado.")),
        }
    }

    // =========================================================================
    // Order
    // =========================================================================

    fn add_item_to_order(&mut self) -> Result<Flow, AppError> {
        self.show_catalog()?;
        let Some(number) = self.prompt("\nDigite o número do produto: ")? else {
            return Ok(Flow::Exit);
        };
        let product = parse_position(&number)
            .and_then(|i| self.catalog.at(i))
            .cloned()
            .ok_or_else(|| AppError::invalid_input("Produto inválido!"))?;

        let Some(quantity) = self.prompt("Digite a quantidade: ")? else {
            return Ok(Flow::Exit);
        };
        let quantity = parse_quantity(&quantity)?;

        self.order.add_item(&product, quantity)?;
        writeln!(self.output, "✅ Adicionado: {}x {}", quantity, product.name)?;
        Ok(Flow::Continue)
    }

    fn show_summary(&mut self) -> Result<(), AppError> {
        writeln!(self.output, "\n🧾 RESUMO DO PEDIDO:")?;

        let totals = totals::compute(&self.order);
        if totals.lines.is_empty() {
            writeln!(self.output, "Nenhum item adicionado ainda.")?;
            return Ok(());
        }

        for (i, line) in totals.lines.iter().enumerate() {
            let amount = self.money(line.line_total_cents);
            writeln!(self.output, "{}. {} x{} = {}", i + 1, line.name, line.quantity, amount)?;
        }
        let total = self.money(totals.total_cents());
        writeln!(self.output, "💰 Total a pagar: {total}\n")?;
        Ok(())
    }

    /// Asks which order line to act on (1-based, as listed in the summary).
    fn pick_line(&mut self, question: &str) -> Result<Option<OrderLine>, AppError> {
        let Some(number) = self.prompt(question)? else {
            return Ok(None);
        };

        parse_position(&number)
            .and_then(|i| self.order.lines().get(i))
            .cloned()
            .map(Some)
            .ok_or_else(|| AppError::invalid_input("Item inválido!"))
    }

    fn change_quantity(&mut self) -> Result<Flow, AppError> {
        self.show_summary()?;
        if self.order.is_empty() {
            return Ok(Flow::Continue);
        }

        let Some(line) = self.pick_line("Número do item: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(quantity) = self.prompt("Nova quantidade: ")? else {
            return Ok(Flow::Exit);
        };
        let quantity = parse_quantity(&quantity)?;

        self.order.set_quantity(line.product_id, quantity)?;
        let stored = self
            .order
            .line(line.product_id)
            .map_or(quantity, |l| l.quantity);
        writeln!(self.output, "✏️ Quantidade atualizada: {} x{}", line.name, stored)?;
        Ok(Flow::Continue)
    }

    fn remove_item(&mut self) -> Result<Flow, AppError> {
        self.show_summary()?;
        if self.order.is_empty() {
            return Ok(Flow::Continue);
        }

        let Some(line) = self.pick_line("Número do item a remover: ")? else {
            return Ok(Flow::Exit);
        };

        self.order.remove_item(line.product_id);
        writeln!(self.output, "🗑️ Item removido: {}", line.name)?;
        Ok(Flow::Continue)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    fn emit_receipt(&mut self) -> Result<Flow, AppError> {
        if self.order.is_empty() {
            return Err(CoreError::EmptyOrder.into());
        }

        let Some(customer) = self.prompt("Nome do cliente (opcional): ")? else {
            return Ok(Flow::Exit);
        };
        let Some(method) =
            self.prompt("Forma de pagamento (opcional) [dinheiro/cartão/pix/vale]: ")?
        else {
            return Ok(Flow::Exit);
        };
        let method: PaymentMethod = method
            .parse()
            .map_err(|_| AppError::invalid_input("Forma de pagamento inválida."))?;

        let mut cash_received_cents = 0;
        if method == PaymentMethod::Cash {
            let question = self.price_prompt("Valor recebido");
            let Some(cash) = self.prompt(&question)? else {
                return Ok(Flow::Exit);
            };
            cash_received_cents = self.config.currency.parse(&cash)?.cents();

            let subtotal = totals::compute(&self.order).subtotal_cents;
            let due = totals::change_due(subtotal, cash_received_cents);
            if due.status == ChangeStatus::Insufficient {
                return Err(AppError::invalid_input(format!(
                    "Faltam {} para cobrir o total.",
                    self.money(due.amount_cents)
                )));
            }
        }

        self.order.set_payment(method, cash_received_cents)?;
        let options = self.config.receipt_options().with_customer(customer);
        self.print_receipt(&options)?;
        Ok(Flow::Continue)
    }

    fn finish(&mut self) -> Result<Flow, AppError> {
        self.show_summary()?;

        if !self.order.is_empty() {
            let answer = self.prompt("Deseja gerar comprovante no terminal agora? (s/n) ")?;
            if answer.is_some_and(|a| a.trim().eq_ignore_ascii_case("s")) {
                let options = self.config.receipt_options();
                self.print_receipt(&options)?;
            }
        }

        writeln!(self.output, "👋 Obrigado por usar o sistema da cafeteria!")?;
        Ok(Flow::Exit)
    }

    fn print_receipt(&mut self, options: &ReceiptOptions) -> Result<(), AppError> {
        let receipt = self.order.finalize(options)?;
        writeln!(self.output, "\n{receipt}\n")?;
        Ok(())
    }
}

/// Parses a 1-based position into a 0-based index.
fn parse_position(text: &str) -> Option<usize> {
    text.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n >= 1)
        .map(|n| n - 1)
}

fn parse_quantity(text: &str) -> Result<i64, AppError> {
    text.trim()
        .parse()
        .map_err(|_| AppError::invalid_input("Quantidade inválida."))
}

// =============================================================================
// Unit Tests
// =============================================================================
