use super::ui;
use crate::core::config::Defaults;
use crate::core::currency::find_currency;
use crate::core::{AmountField, ConversionController, CurrencyCode, CurrencyRateProvider, FetchState};
use anyhow::{Result, anyhow, bail};

/// One-shot conversion request from the command line.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: String,
    /// Treat `amount` as the target amount and convert backwards.
    pub reverse: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub base_code: CurrencyCode,
    pub target_code: CurrencyCode,
    pub base_amount: AmountField,
    pub target_amount: AmountField,
    pub rate: f64,
}

fn known_code(raw: &str) -> Result<CurrencyCode> {
    match find_currency(raw) {
        Some(code) => Ok(code),
        None => bail!("Unsupported currency code: {raw}. Run `xconv currencies` for the list."),
    }
}

pub async fn convert(
    request: &ConvertRequest,
    defaults: Defaults,
    provider: &dyn CurrencyRateProvider,
) -> Result<Conversion> {
    if AmountField::parse(&request.amount).is_none_or(|a| a.is_empty()) {
        bail!("Invalid amount: '{}'", request.amount);
    }

    let mut controller = ConversionController::new(defaults);
    if let Some(from) = &request.from {
        controller.select_base_code(known_code(from)?);
    }
    if let Some(to) = &request.to {
        controller.select_target_code(known_code(to)?);
    }

    if let FetchState::Failed(message) = controller.refresh(provider).await {
        return Err(anyhow!(message));
    }

    if request.reverse {
        controller.edit_target_amount(&request.amount);
    } else {
        controller.edit_base_amount(&request.amount);
    }

    Ok(Conversion {
        base_code: controller.base_code().clone(),
        target_code: controller.target_code().clone(),
        base_amount: controller.base_amount(),
        target_amount: controller.target_amount(),
        rate: controller.rate(),
    })
}

pub fn render(conversion: &Conversion, decimals: u32) -> String {
    format!(
        "{} {} = {} {}  {}",
        ui::style_text(
            &ui::format_amount(conversion.base_amount, decimals),
            ui::StyleType::Amount
        ),
        ui::style_text(conversion.base_code.as_str(), ui::StyleType::Code),
        ui::style_text(
            &ui::format_amount(conversion.target_amount, decimals),
            ui::StyleType::Amount
        ),
        ui::style_text(conversion.target_code.as_str(), ui::StyleType::Code),
        ui::style_text(&format!("(rate: {})", conversion.rate), ui::StyleType::Subtle),
    )
}

pub async fn run(
    request: &ConvertRequest,
    defaults: Defaults,
    provider: &dyn CurrencyRateProvider,
) -> Result<()> {
    let decimals = defaults.fixed_decimals;
    let spinner = ui::new_spinner("Fetching exchange rate...");
    let result = convert(request, defaults, provider).await;
    spinner.finish_and_clear();

    println!("{}", render(&result?, decimals));
    Ok(())
}
