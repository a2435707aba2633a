//! Interactive converter session.
//!
//! Reads one command per line and re-renders both amount rows after every
//! change. Rate requests run on spawned tasks and report back over a
//! channel, so the prompt stays responsive while a request is in flight.

use super::{currencies, ui};
use crate::core::config::Defaults;
use crate::core::currency::{find_currency, label_for};
use crate::core::{
    AmountField, ConversionController, CurrencyCode, CurrencyRateProvider, FetchError, FetchTicket,
};
use anyhow::{Result, anyhow, bail};
use indicatif::ProgressBar;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::debug;

const HELP: &str = "\
Commands:
  base <amount>   (b)  set the base amount, empty clears both fields
  target <amount> (t)  set the target amount
  from <CODE|name>     select the base currency
  to <CODE|name>       select the target currency
  codes                list available currencies
  dismiss              close the error message
  help                 show this help
  quit            (q)  exit";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    EditBase(String),
    EditTarget(String),
    SelectBase(CurrencyCode),
    SelectTarget(CurrencyCode),
    ListCodes,
    Dismiss,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<SessionCommand> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let select_code = |rest: &str| -> Result<CurrencyCode> {
        if rest.is_empty() {
            bail!("Please provide a currency code");
        }
        match find_currency(rest) {
            Some(code) => Ok(code),
            None => bail!("Unsupported currency code: {rest}. Type `codes` for the list."),
        }
    };

    match word.to_lowercase().as_str() {
        "b" | "base" => Ok(SessionCommand::EditBase(rest.to_string())),
        "t" | "target" => Ok(SessionCommand::EditTarget(rest.to_string())),
        "from" => Ok(SessionCommand::SelectBase(select_code(rest)?)),
        "to" => Ok(SessionCommand::SelectTarget(select_code(rest)?)),
        "codes" => Ok(SessionCommand::ListCodes),
        "dismiss" => Ok(SessionCommand::Dismiss),
        "help" | "?" => Ok(SessionCommand::Help),
        "q" | "quit" | "exit" => Ok(SessionCommand::Quit),
        "" => Err(anyhow!("Type `help` for the list of commands")),
        other => Err(anyhow!("Unknown command: {other}. Type `help` for the list of commands")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

type FetchOutcome = (FetchTicket, std::result::Result<f64, FetchError>);

pub struct Session {
    controller: ConversionController,
    provider: Arc<dyn CurrencyRateProvider>,
    results_tx: mpsc::UnboundedSender<FetchOutcome>,
    results_rx: mpsc::UnboundedReceiver<FetchOutcome>,
    spinner: Option<ProgressBar>,
    notice: Option<String>,
}

impl Session {
    pub fn new(defaults: Defaults, provider: Arc<dyn CurrencyRateProvider>) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Session {
            controller: ConversionController::new(defaults),
            provider,
            results_tx,
            results_rx,
            spinner: None,
            notice: None,
        }
    }

    pub fn controller(&self) -> &ConversionController {
        &self.controller
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn handle(&mut self, command: SessionCommand) -> Flow {
        match command {
            SessionCommand::EditBase(_) | SessionCommand::EditTarget(_)
                if self.controller.is_loading() =>
            {
                self.notice = Some("Exchange rate is loading, please wait".to_string());
            }
            SessionCommand::EditBase(raw) => self.controller.edit_base_amount(&raw),
            SessionCommand::EditTarget(raw) => self.controller.edit_target_amount(&raw),
            SessionCommand::SelectBase(code) => self.controller.select_base_code(code),
            SessionCommand::SelectTarget(code) => self.controller.select_target_code(code),
            SessionCommand::ListCodes => {
                self.notice = Some(currencies::currency_table().to_string());
            }
            SessionCommand::Dismiss => self.controller.clear_error(),
            SessionCommand::Help => self.notice = Some(HELP.to_string()),
            SessionCommand::Quit => return Flow::Quit,
        }
        self.dispatch_fetch();
        Flow::Continue
    }

    /// Spawns a rate request if the selected pair changed.
    pub fn dispatch_fetch(&mut self) {
        let Some(ticket) = self.controller.next_fetch() else {
            return;
        };
        let provider = Arc::clone(&self.provider);
        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let result = provider.get_rate(&ticket.base, &ticket.target).await;
            if tx.send((ticket, result)).is_err() {
                debug!("Session closed before the rate arrived");
            }
        });
    }

    fn on_fetch_complete(&mut self, outcome: FetchOutcome) {
        let (ticket, result) = outcome;
        self.controller.apply_fetch(&ticket, result);
    }

    pub fn render(&self) -> String {
        let decimals = self.controller.fixed_decimals();
        let row = |amount: AmountField, code: &CurrencyCode| {
            format!(
                "  [ {} ]  {}  {}",
                ui::style_text(
                    &format!("{:>14}", ui::format_amount(amount, decimals)),
                    ui::StyleType::Amount
                ),
                ui::style_text(code.as_str(), ui::StyleType::Code),
                ui::style_text(label_for(code).unwrap_or(""), ui::StyleType::Subtle),
            )
        };

        let status = if self.controller.is_loading() {
            "Loading exchange rate...".to_string()
        } else if self.controller.rate() > 0.0 {
            format!(
                "1 {} = {} {}",
                self.controller.base_code(),
                self.controller.rate(),
                self.controller.target_code()
            )
        } else {
            "No exchange rate available".to_string()
        };

        let mut lines = vec![
            ui::style_text("Currency converter", ui::StyleType::Title),
            row(self.controller.base_amount(), self.controller.base_code()),
            row(self.controller.target_amount(), self.controller.target_code()),
            ui::style_text(&status, ui::StyleType::Subtle),
        ];
        if let Some(error) = self.controller.error() {
            lines.push(ui::error_banner(error));
        }
        if let Some(notice) = &self.notice {
            lines.push(notice.clone());
        }
        lines.join("\n")
    }

    fn redraw(&mut self) {
        let view = self.render();
        match &self.spinner {
            Some(pb) => pb.suspend(|| println!("\n{view}")),
            None => println!("\n{view}"),
        }
        self.notice = None;
        self.sync_spinner();
    }

    fn sync_spinner(&mut self) {
        match (self.controller.is_loading(), self.spinner.take()) {
            (true, None) => self.spinner = Some(ui::new_spinner("Fetching exchange rate...")),
            (true, Some(pb)) => self.spinner = Some(pb),
            (false, Some(pb)) => pb.finish_and_clear(),
            (false, None) => {}
        }
    }

    /// Runs the session until `quit` or end of input.
    pub async fn run<R>(mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        println!("{}", ui::style_text("Type `help` for commands.", ui::StyleType::Subtle));
        self.dispatch_fetch();
        self.redraw();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match parse_command(&line) {
                        Ok(command) => {
                            if self.handle(command) == Flow::Quit {
                                break;
                            }
                        }
                        Err(e) => self.notice = Some(ui::style_text(&e.to_string(), ui::StyleType::Error)),
                    }
                    self.redraw();
                }
                Some(outcome) = self.results_rx.recv() => {
                    self.on_fetch_complete(outcome);
                    self.redraw();
                }
            }
        }

        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
        Ok(())
    }

    /// Waits until no fetch is in flight.
    #[cfg(test)]
    async fn settle(&mut self) {
        while self.controller.is_loading() {
            match self.results_rx.recv().await {
                Some(outcome) => self.on_fetch_complete(outcome),
                None => break,
            }
        }
    }
}

pub async fn run(defaults: Defaults, provider: Arc<dyn CurrencyRateProvider>) -> Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    Session::new(defaults, provider).run(stdin).await
}
