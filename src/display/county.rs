//! County display formatting
//!
//! Formats counties for terminal output in table and detail views.

use crate::models::County;

/// Format a list of counties as a table
pub fn format_county_list(counties: &[County]) -> String {
    if counties.is_empty() {
        return "No counties found.".to_string();
    }

    let name_width = counties
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:<name_width$}  {:>12}  {:>18}  {:>14}  {:>5}\n",
        "ID",
        "Name",
        "Population",
        "Economic Output",
        "GDP/Capita",
        "Score",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<8}  {:-<name_width$}  {:->12}  {:->18}  {:->14}  {:->5}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for county in counties {
        output.push_str(&format!(
            "{:<8}  {:<name_width$}  {:>12}  {:>18.2}  {:>14.2}  {:>5}\n",
            county.id.to_string(),
            county.name,
            county.population,
            county.economic_output,
            county.gdp_per_capita(),
            county.project_score,
            name_width = name_width,
        ));
    }

    output.push_str(&format!("\n{} county(ies)\n", counties.len()));
    output
}

/// Format a single county's details
pub fn format_county_details(county: &County, allocation_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("County: {}\n", county.name));
    output.push_str(&format!("  ID:              {}\n", county.id));
    output.push_str(&format!("  Population:      {}\n", county.population));
    output.push_str(&format!("  Economic Output: {:.2}\n", county.economic_output));
    output.push_str(&format!("  GDP per Capita:  {:.2}\n", county.gdp_per_capita()));
    output.push_str(&format!("  Project Score:   {}/10\n", county.project_score));
    output.push_str(&format!("  Allocations:     {}\n", allocation_count));

    output
}
