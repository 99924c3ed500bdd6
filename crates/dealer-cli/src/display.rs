// Plain-text rendering of inventory listings and sales reports
//
// Renderers return strings so the command handlers decide where output
// goes; colors are added by the handlers, never here.

use dealer_core::car::format_price;
use dealer_core::{Car, SalesReport};

const RULE_WIDTH: usize = 60;

/// Renders a numbered listing followed by a count and value footer.
///
/// Returns `None` when there is nothing to list.
pub fn inventory_listing(title: &str, cars: &[&Car]) -> Option<String> {
    if cars.is_empty() {
        return None;
    }

    let mut lines = vec![format!("--- {} ---", title)];
    for (i, car) in cars.iter().enumerate() {
        lines.push(format!("[{:02}]: {}", i + 1, car));
    }
    lines.push("-".repeat(RULE_WIDTH));

    let value: f64 = cars.iter().map(|c| c.price()).sum();
    lines.push(format!("Total Vehicles: {}", cars.len()));
    lines.push(format!("Total Value:    ${}", format_price(value)));
    Some(lines.join("\n"))
}

/// Renders a car on several labelled lines.
pub fn car_details(car: &Car) -> String {
    let lines = [
        format!("VIN:   {}", car.vin()),
        format!("Make:  {}", car.make()),
        format!("Model: {}", car.model()),
        format!("Year:  {}", car.year()),
        format!("Price: ${}", format_price(car.price())),
        format!("Image: {}", car.image_url()),
    ];
    lines.join("\n")
}

/// Renders totals followed by the sales history, newest first.
pub fn sales_summary(report: &SalesReport) -> String {
    let mut lines = vec![
        "--- Sales Report ---".to_string(),
        format!("Cars Sold:     {}", report.total_sold),
        format!("Total Revenue: ${}", format_price(report.total_revenue)),
    ];

    if report.history.is_empty() {
        lines.push(String::new());
        lines.push("No sales recorded yet.".to_string());
        return lines.join("\n");
    }

    lines.push("-".repeat(RULE_WIDTH));
    for sale in &report.history {
        lines.push(sale.to_string());
    }
    lines.join("\n")
}
