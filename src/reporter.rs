//! Reporting of verification results

use std::path::PathBuf;

use crate::metrics::LedgerSummary;
use crate::scenario::{ScenarioConfig, ScenarioOutcome};
use crate::visualise::Visualiser;

/// Configuration for the reporter
pub struct ReporterConfig {
    /// Directory where the report and charts will be written
    pub output_dir: PathBuf,
    /// Directory containing gnuplot template files
    pub templates_dir: PathBuf,
    /// Whether to run gnuplot. Chart data files are written either way.
    pub render_charts: bool,
}

/// Reporter for printing summary statistics and writing the HTML report
pub struct Reporter<'a> {
    outcome: &'a ScenarioOutcome,
    scenario_config: &'a ScenarioConfig,
    config: ReporterConfig,
}

impl<'a> Reporter<'a> {
    /// Create a new reporter
    pub fn new(
        outcome: &'a ScenarioOutcome,
        scenario_config: &'a ScenarioConfig,
        config: ReporterConfig,
    ) -> Self {
        Self {
            outcome,
            scenario_config,
            config,
        }
    }

    /// Print summary statistics to stdout
    pub fn print_summary(&self) {
        let scenario = self.scenario_config;
        let outcome = self.outcome;

        println!("\n=== Scenario Configuration ===");
        println!("Name:          {}", scenario.name);
        println!("Seed:          {}", seed_label(scenario.seed));
        println!("Sample size:   {}", scenario.sample_size);
        println!("Termination:   {}", scenario.termination);
        println!("Hotel:         {}", scenario.hotel);
        println!("Timing:        {}", scenario.timing);
        println!("Price mix:     {}", scenario.price_mix);

        println!("\n=== Analytic Bounds ===");
        println!(
            "Revenue:       {:.2} to {:.2}",
            outcome.bounds.min_revenue, outcome.bounds.max_revenue
        );
        println!("Expenses:      {:.2}", outcome.bounds.expenses);
        println!(
            "Profit:        {:.2} to {:.2}",
            outcome.bounds.min_profit(),
            outcome.bounds.max_profit()
        );

        println!("\n=== Queues (λ = {:.4} guests/min) ===", outcome.arrival_rate);
        println!(
            "{:<16} {:>3} {:>7} {:>8} {:>8} {:>9} {:>9}",
            "resource", "c", "rho", "L", "Lq", "w (min)", "wq (min)"
        );
        for q in &outcome.queues {
            println!(
                "{:<16} {:>3} {:>7.3} {:>8.3} {:>8.3} {:>9.2} {:>9.2}",
                q.resource.to_string(),
                q.channels,
                q.rho,
                q.l,
                q.lq,
                q.w,
                q.wq
            );
        }

        let summary = &outcome.summary;
        println!("\n=== Guest Ledger ===");
        println!("Guests:               {}", summary.guests);
        println!("Parties:              {}", summary.batches.total_batches);
        println!("Mean party size:      {:.2}", summary.batches.mean_batch_size);
        println!("Premium share:        {:.1}%", summary.premium_share * 100.0);
        println!(
            "Checked out by {:>5}: {}",
            scenario.timing.horizon(),
            summary.checked_out_within_horizon
        );
        if outcome.horizon_mismatch {
            println!("Warning:              guest cutoff and horizon cover different periods");
        }

        println!("\n=== Profit Estimate ===");
        println!("Guests:        {}", outcome.profit.guests);
        println!("Revenue:       {:.2}", outcome.profit.revenue);
        println!("Profit:        {:.2}", outcome.profit.profit);
        println!("Verdict:       {}", outcome.verdict);
    }

    /// Render the full report as a standalone HTML page.
    pub fn render_html(&self) -> String {
        let scenario = self.scenario_config;
        let outcome = self.outcome;
        let bounds = &outcome.bounds;
        let name = escape(&scenario.name);

        let mut html = String::with_capacity(8192);
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{name}</title>\n</head>\n<body>\n"));
        html.push_str(&format!("<h1>Hotel operations verification: {name}</h1>\n"));

        html.push_str("<h2>Configuration</h2>\n<ul>\n");
        for (label, value) in [
            ("Seed", seed_label(scenario.seed)),
            ("Sample size", scenario.sample_size.to_string()),
            ("Termination", scenario.termination.to_string()),
            ("Hotel", scenario.hotel.to_string()),
            ("Timing", scenario.timing.to_string()),
            ("Price mix", scenario.price_mix.to_string()),
        ] {
            html.push_str(&format!("<li><b>{label}:</b> {}</li>\n", escape(&value)));
        }
        html.push_str("</ul>\n");

        html.push_str("<h2>Bounds and estimate</h2>\n");
        html.push_str(&table(
            &["", "revenue", "expenses", "profit"],
            [
                vec![
                    "worst case".to_string(),
                    money(bounds.min_revenue),
                    money(bounds.expenses),
                    money(bounds.min_profit()),
                ],
                vec![
                    "estimate".to_string(),
                    money(outcome.profit.revenue),
                    money(outcome.profit.expenses),
                    money(outcome.profit.profit),
                ],
                vec![
                    "best case".to_string(),
                    money(bounds.max_revenue),
                    money(bounds.expenses),
                    money(bounds.max_profit()),
                ],
            ],
        ));
        html.push_str(&format!(
            "<p>{} guests at a blended price of {}: <b>{}</b>.</p>\n",
            outcome.profit.guests,
            money(outcome.profit.blended_price),
            outcome.verdict
        ));

        html.push_str("<h2>Queues</h2>\n");
        html.push_str(&format!(
            "<p>Estimated arrival rate: {:.4} guests per minute.</p>\n",
            outcome.arrival_rate
        ));
        html.push_str(&table(
            &["resource", "λ", "μ", "c", "ρ", "P(wait)", "L", "Lq", "w", "wq"],
            outcome.queues.iter().map(|q| {
                vec![
                    q.resource.to_string(),
                    format!("{:.4}", q.arrival_rate),
                    format!("{:.4}", q.service_rate),
                    q.channels.to_string(),
                    format!("{:.3}", q.rho),
                    format!("{:.3}", q.prob_wait),
                    format!("{:.3}", q.l),
                    format!("{:.3}", q.lq),
                    format!("{:.2}", q.w),
                    format!("{:.2}", q.wq),
                ]
            }),
        ));

        html.push_str(&ledger_section(&outcome.summary, scenario.timing.horizon()));
        if outcome.horizon_mismatch {
            html.push_str(&format!(
                "<p><b>Note:</b> the ledger stops at a guest count, which does not line up \
                 with the {} minute horizon.</p>\n",
                scenario.timing.horizon()
            ));
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Write `report.html` to the output directory
    pub fn write_html(&self) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;
        let path = self.config.output_dir.join("report.html");
        std::fs::write(&path, self.render_html())?;
        Ok(path)
    }

    /// Generate chart data, and the charts themselves if enabled
    pub fn generate_visualizations(&self) -> std::io::Result<()> {
        let visualiser = Visualiser::new(
            &self.outcome.ledger,
            &self.config.output_dir,
            &self.config.templates_dir,
        );

        if self.config.render_charts {
            visualiser.generate_all()?;

            println!("\n=== Charts ===");
            let chart = |file: &str| self.config.output_dir.join(file);
            println!("Stage durations: {}", chart("stage_durations.png").display());
            println!("Guest timeline:  {}", chart("guest_timeline.png").display());
            println!("Party sizes:     {}", chart("batch_sizes.png").display());
        } else {
            visualiser.write_all_data()?;
        }

        Ok(())
    }

    /// Print summary, write the HTML report and generate visualizations
    pub fn report(&self) -> std::io::Result<PathBuf> {
        self.print_summary();
        let path = self.write_html()?;
        self.generate_visualizations()?;
        println!("\nReport: {}", path.display());
        Ok(path)
    }
}

fn ledger_section(summary: &LedgerSummary, horizon: f64) -> String {
    let mut html = String::from("<h2>Guest ledger</h2>\n");
    html.push_str(&format!(
        "<p>{} guests in {} parties, {:.1}% premium. {} checked out within {} minutes.</p>\n",
        summary.guests,
        summary.batches.total_batches,
        summary.premium_share * 100.0,
        summary.checked_out_within_horizon,
        horizon
    ));

    html.push_str(&table(
        &["stage", "mean", "p50", "p99", "min", "max"],
        summary.stages.iter().map(|s| {
            vec![
                s.stage.name().to_string(),
                format!("{:.2}", s.mean),
                format!("{:.2}", s.p50),
                format!("{:.2}", s.p99),
                format!("{:.2}", s.min),
                format!("{:.2}", s.max),
            ]
        }),
    ));

    html.push_str(&table(
        &["party size", "parties", "share"],
        summary
            .batches
            .size_distribution_sorted()
            .into_iter()
            .map(|(size, count)| {
                vec![
                    size.to_string(),
                    count.to_string(),
                    format!("{:.1}%", summary.batches.percentage_of(size)),
                ]
            }),
    ));
    html
}

fn table(headers: &[&str], rows: impl IntoIterator<Item = Vec<String>>) -> String {
    let mut html = String::from("<table border=\"1\" cellpadding=\"4\">\n<tr>");
    for header in headers {
        html.push_str(&format!("<th>{}</th>", escape(header)));
    }
    html.push_str("</tr>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(&cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn seed_label(seed: Option<u64>) -> String {
    seed.map_or_else(|| "random".to_string(), |s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioRunner;

    fn reporter_config(dir: &std::path::Path) -> ReporterConfig {
        ReporterConfig {
            output_dir: dir.to_path_buf(),
            templates_dir: PathBuf::from("templates"),
            render_charts: false,
        }
    }

    #[test]
    fn html_embeds_bounds_and_queues() {
        let config = ScenarioConfig::builder().name("<lobby>").build();
        let outcome = ScenarioRunner::new(config.clone()).run().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let html = Reporter::new(&outcome, &config, reporter_config(dir.path())).render_html();

        assert!(html.contains("&lt;lobby&gt;"));
        assert!(!html.contains("<lobby>"));
        assert!(html.contains(&money(outcome.bounds.max_revenue)));
        assert!(html.contains("within bounds"));
        for q in &outcome.queues {
            assert!(html.contains(&q.resource.to_string()), "{} missing", q.resource);
        }
        assert!(html.contains("time in hotel"));
    }

    #[test]
    fn html_page_is_complete() {
        let config = ScenarioConfig::default();
        let outcome = ScenarioRunner::new(config.clone()).run().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let html = Reporter::new(&outcome, &config, reporter_config(dir.path())).render_html();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
        // Bounds, queues, stage statistics and party sizes.
        assert_eq!(html.matches("<table").count(), 4);
        assert_eq!(html.matches("<table").count(), html.matches("</table>").count());
        // A header row plus one row per resource.
        let queue_table = html.split("<h2>Queues</h2>").nth(1).unwrap();
        let queue_table = &queue_table[..queue_table.find("</table>").unwrap()];
        assert_eq!(queue_table.matches("<tr>").count(), outcome.queues.len() + 1);
        assert!(html.contains("does not line up with the 1440 minute horizon"));
    }

    #[test]
    fn report_writes_html_and_chart_data() {
        let config = ScenarioConfig::default();
        let outcome = ScenarioRunner::new(config.clone()).run().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = Reporter::new(&outcome, &config, reporter_config(dir.path()))
            .report()
            .unwrap();

        assert!(path.exists());
        assert!(dir.path().join("guest_timeline.dat").exists());
        assert!(dir.path().join("stage_durations.dat").exists());
        assert!(dir.path().join("batch_sizes.dat").exists());
    }
}
