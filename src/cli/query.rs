use super::ui;
use crate::core::{FundPage, FundQuery, load_funds, run_query};
use anyhow::Result;
use comfy_table::Cell;
use std::path::Path;
use tracing::debug;

impl FundPage {
    pub fn display_as_table(&self) -> String {
        if self.funds.is_empty() {
            let message = if self.total == 0 {
                "No funds match the given filters.".to_string()
            } else {
                format!("Page {} is empty ({} pages available).", self.page, self.total_pages)
            };
            return ui::style_text(&message, ui::StyleType::Error);
        }

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("ISIN"),
            ui::header_cell("Name"),
            ui::header_cell("Currency"),
            ui::header_cell("Category"),
            ui::header_cell("Risk"),
            ui::header_cell("Rating"),
            ui::header_cell("YTD"),
            ui::header_cell("1Y"),
            ui::header_cell("3Y"),
            ui::header_cell("Mgmt fee"),
        ]);

        for fund in &self.funds {
            table.add_row(vec![
                Cell::new(&fund.isin),
                Cell::new(&fund.name),
                Cell::new(&fund.currency),
                Cell::new(&fund.category),
                Cell::new(fund.risk_level),
                ui::rating_cell(fund.morningstar_rating),
                ui::change_cell(fund.ytd_return),
                ui::change_cell(fund.one_year_return),
                ui::change_cell(fund.three_year_return),
                ui::percentage_cell(fund.management_fee),
            ]);
        }

        let mut output = table.to_string();
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!(
                    "Page {} of {} ({} matching funds, {} per page)",
                    self.page, self.total_pages, self.total, self.limit
                ),
                ui::StyleType::Subtle,
            )
        ));
        output
    }
}

/// Runs one catalog query against the dataset and prints the page.
pub async fn run(data_path: &Path, query: &FundQuery) -> Result<()> {
    debug!(?query, "Running catalog query");
    let funds = load_funds(data_path).await?;
    let page = run_query(&funds, query);

    println!(
        "{}\n",
        ui::style_text(
            &format!("Fund catalog: {}", data_path.display()),
            ui::StyleType::Title
        )
    );
    println!("{}", page.display_as_table());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_funds;

    const DATASET: &str = "ISIN;Nombre;Divisa;Categoria Singular Bank;REQ;Morningstar Rating;Rent YTD;Comisión Gestión;Disponible para asesoramiento con cobro implícito
LU0000000001;Alpha Equity;EUR;RV Europa;55;4;3,5;1,2;Y
LU0000000002;Beta Bonds;USD;RF Global;15;0;-0,8;0,6;Y";

    #[test]
    fn test_table_lists_funds_and_footer() {
        let funds = parse_funds(DATASET).unwrap();
        let page = run_query(&funds, &FundQuery::default());
        let output = page.display_as_table();

        assert!(output.contains("LU0000000001"));
        assert!(output.contains("Beta Bonds"));
        assert!(output.contains("Medium-High"));
        assert!(output.contains("★★★★"));
        assert!(output.contains("3.50%"));
        assert!(output.contains("-0.80%"));
        assert!(output.contains("Page 1 of 1 (2 matching funds, 10 per page)"));
    }

    #[test]
    fn test_table_renders_off_scale_rating() {
        let dataset = "ISIN;Nombre;Morningstar Rating;Disponible para asesoramiento con cobro implícito
LU0000000003;Gamma;9223372036854775807;Y";
        let funds = parse_funds(dataset).unwrap();
        let output = run_query(&funds, &FundQuery::default()).display_as_table();
        assert!(output.contains("9223372036854775807"));
    }

    #[test]
    fn test_empty_page_messages() {
        let funds = parse_funds(DATASET).unwrap();
        let none = run_query(
            &funds,
            &FundQuery {
                currency: "JPY".to_string(),
                ..FundQuery::default()
            },
        );
        assert!(none.display_as_table().contains("No funds match"));

        let past_end = run_query(
            &funds,
            &FundQuery {
                page: 5,
                ..FundQuery::default()
            },
        );
        assert!(past_end.display_as_table().contains("Page 5 is empty"));
    }
}
