use super::ui;
use crate::core::currency::CURRENCIES;
use comfy_table::Table;

/// Builds the table of selectable currencies.
pub fn currency_table() -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);
    for (code, label) in CURRENCIES {
        table.add_row(vec![*code, *label]);
    }
    table
}

pub fn run() -> anyhow::Result<()> {
    println!("{}", currency_table());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_currency() {
        let mut table = currency_table();
        table.set_content_arrangement(comfy_table::ContentArrangement::Disabled);
        let rendered = table.to_string();
        for (code, label) in CURRENCIES {
            assert!(rendered.contains(code), "missing {code}");
            assert!(rendered.contains(label), "missing {label}");
        }
    }
}
