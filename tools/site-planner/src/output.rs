//! Human-readable rendering of compute results and the catalog

use colored::*;
use site_model::{ComputeResult, DeviceCatalog};
use std::fmt::{self, Write};

/// Group the integer part of a value with thousands separators: 1234567.5 -> "1,234,568"
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn render_result(result: &ComputeResult) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let totals = &result.totals;
    let layout = &result.layout;

    writeln!(out, "{}", "Device counts".bright_cyan().bold())?;
    for (device_type, count) in result.counts.iter() {
        let marker = if device_type.is_battery() {
            ""
        } else {
            " (derived)"
        };
        writeln!(out, "  {:<12} {:>6}{}", device_type.as_str(), count, marker.dimmed())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", "Totals".bright_cyan().bold())?;
    writeln!(out, "  {:<16} ${}", "Cost", format_thousands(totals.total_cost))?;
    writeln!(out, "  {:<16} {} MWh", "Net energy", totals.total_energy_mwh)?;
    writeln!(
        out,
        "  {:<16} {:.6} MWh/sq ft",
        "Energy density", totals.energy_density
    )?;

    writeln!(out)?;
    writeln!(out, "{}", "Layout".bright_cyan().bold())?;
    writeln!(
        out,
        "  {:<16} {} x {} ft ({} sq ft), max width {} ft",
        "Site",
        layout.site_width_ft,
        layout.site_length_ft,
        layout.site_area_sq_ft,
        layout.max_width_ft
    )?;
    writeln!(out, "  {:<16} {}", "Rows", layout.row_count())?;

    if !layout.placements.is_empty() {
        writeln!(out)?;
        writeln!(
            out,
            "  {:<16} {:<12} {:>7} {:>7} {:>7} {:>7}",
            "ID".bold(),
            "TYPE".bold(),
            "X".bold(),
            "Y".bold(),
            "W".bold(),
            "D".bold()
        )?;
        for p in &layout.placements {
            writeln!(
                out,
                "  {:<16} {:<12} {:>7} {:>7} {:>7} {:>7}",
                p.id,
                p.device_type.as_str(),
                p.x,
                p.y,
                p.width,
                p.depth
            )?;
        }
    }

    Ok(out)
}

pub fn render_catalog(catalog: &DeviceCatalog, max_width_ft: f64) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{} (max site width {} ft)",
        "Device catalog".bright_cyan().bold(),
        max_width_ft
    )?;
    writeln!(
        out,
        "  {:<12} {:>6} {:>6} {:>6} {:>10} {:>8}",
        "TYPE".bold(),
        "W".bold(),
        "D".bold(),
        "MWh".bold(),
        "COST".bold(),
        "RELEASE".bold()
    )?;
    for (device_type, spec) in catalog.iter() {
        let release = spec
            .release_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "  {:<12} {:>6} {:>6} {:>6} {:>10} {:>8}",
            device_type.as_str(),
            spec.width,
            spec.depth,
            spec.energy_capacity_mwh,
            format_thousands(spec.unit_cost),
            release
        )?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use site_model::SiteEngine;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(60_000.0), "60,000");
        assert_eq!(format_thousands(1_234_567.5), "1,234,568");
        assert_eq!(format_thousands(-10_000.0), "-10,000");
    }

    #[test]
    fn test_render_result_lists_placements() {
        colored::control::set_override(false);
        let result = SiteEngine::standard()
            .compute_all(&json!({ "Megapack": 1 }))
            .unwrap();
        let text = render_result(&result).unwrap();
        assert!(text.contains("Megapack-1"));
        assert!(text.contains("Transformer-2"));
        assert!(text.contains("$60,000"));
        assert!(text.contains("(derived)"));
        assert!(text.contains("40 x 10 ft"));
    }

    #[test]
    fn test_render_catalog_shows_release_years() {
        colored::control::set_override(false);
        let text = render_catalog(&DeviceCatalog::standard(), 100.0).unwrap();
        assert!(text.contains("MegapackXL"));
        assert!(text.contains("2022"));
        assert!(text.contains("120,000"));
        assert!(text.contains("max site width 100 ft"));
    }
}
