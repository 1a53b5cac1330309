//! Visualisation of the guest ledger using gnuplot

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::NamedTempFile;

use crate::ledger::GuestLedger;
use crate::metrics::{BatchDistribution, Stage};

/// Visualiser for generating charts from a guest ledger
pub struct Visualiser<'a> {
    ledger: &'a GuestLedger,
    output_dir: PathBuf,
    templates_dir: PathBuf,
}

impl<'a> Visualiser<'a> {
    /// Create a new visualiser
    ///
    /// # Arguments
    /// * `ledger` - Assembled guest ledger
    /// * `output_dir` - Directory where data files and charts will be written
    /// * `templates_dir` - Directory containing gnuplot template files
    pub fn new(
        ledger: &'a GuestLedger,
        output_dir: impl Into<PathBuf>,
        templates_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            ledger,
            output_dir: output_dir.into(),
            templates_dir: templates_dir.into(),
        }
    }

    /// Write the per-guest stage durations, one column per stage
    pub fn write_stage_durations(&self) -> std::io::Result<PathBuf> {
        let path = self.output_dir.join("stage_durations.dat");
        write_data_file(&path, |out| {
            write!(out, "# guest")?;
            for stage in Stage::ALL {
                write!(out, " {}", stage.name().replace(' ', "_"))?;
            }
            writeln!(out)?;

            for guest in self.ledger.guests() {
                write!(out, "{}", guest.index)?;
                for stage in Stage::ALL {
                    write!(out, " {:.3}", stage.duration(guest))?;
                }
                writeln!(out)?;
            }
            Ok(())
        })?;
        Ok(path)
    }

    /// Write arrival, room entry, checkout and exit times for each guest
    pub fn write_guest_timeline(&self) -> std::io::Result<PathBuf> {
        let path = self.output_dir.join("guest_timeline.dat");
        write_data_file(&path, |out| {
            writeln!(out, "# guest arrival room_entry checkout exit room_ready")?;
            for g in self.ledger.guests() {
                writeln!(
                    out,
                    "{} {:.3} {:.3} {:.3} {:.3} {:.3}",
                    g.index,
                    g.arrival,
                    g.room_entry(),
                    g.checkout(),
                    g.exit(),
                    g.room_ready()
                )?;
            }
            Ok(())
        })?;
        Ok(path)
    }

    /// Write the party size distribution
    pub fn write_batch_sizes(&self) -> std::io::Result<PathBuf> {
        let path = self.output_dir.join("batch_sizes.dat");
        let distribution = BatchDistribution::for_ledger(self.ledger);
        write_data_file(&path, |out| {
            writeln!(out, "# batch_size count")?;
            for (size, count) in distribution.size_distribution_sorted() {
                writeln!(out, "{} {}", size, count)?;
            }
            Ok(())
        })?;
        Ok(path)
    }

    /// Write every data file without running gnuplot
    pub fn write_all_data(&self) -> std::io::Result<()> {
        self.write_stage_durations()?;
        self.write_guest_timeline()?;
        self.write_batch_sizes()?;
        Ok(())
    }

    /// Generate stage duration box chart
    pub fn stage_durations_chart(&self) -> std::io::Result<()> {
        let data_path = self.write_stage_durations()?;
        self.plot("stage_durations", &data_path)
    }

    /// Generate guest timeline chart
    pub fn guest_timeline_chart(&self) -> std::io::Result<()> {
        let data_path = self.write_guest_timeline()?;
        self.plot("guest_timeline", &data_path)
    }

    /// Generate party size histogram
    pub fn batch_size_histogram(&self) -> std::io::Result<()> {
        let data_path = self.write_batch_sizes()?;
        self.plot("batch_sizes", &data_path)
    }

    /// Generate all standard visualizations
    pub fn generate_all(&self) -> std::io::Result<()> {
        if self.ledger.is_empty() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "No guests in the ledger",
            ));
        }

        self.stage_durations_chart()?;
        self.guest_timeline_chart()?;
        self.batch_size_histogram()?;
        Ok(())
    }

    fn plot(&self, chart: &str, data_path: &Path) -> std::io::Result<()> {
        let output_path = self.output_dir.join(format!("{chart}.png"));
        let template_path = self.templates_dir.join(format!("{chart}.gnuplot"));
        run_gnuplot(&template_path, &output_path, data_path)?;
        println!("Generated chart: {}", output_path.display());
        Ok(())
    }
}

fn write_data_file(
    path: &Path,
    write_rows: impl FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
) -> std::io::Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut out = BufWriter::new(File::create(path)?);
    write_rows(&mut out)?;
    out.flush()
}

/// Fill in a gnuplot template and run it
pub fn run_gnuplot(
    template_path: &Path,
    output_path: &Path,
    data_path: &Path,
) -> std::io::Result<()> {
    let template = std::fs::read_to_string(template_path)?;
    let script_content = render_template(&template, output_path, data_path);

    // Write gnuplot script to a unique temp file
    let mut temp_script = NamedTempFile::new()?;
    temp_script.write_all(script_content.as_bytes())?;
    temp_script.flush()?;

    // Run gnuplot (temp file will be automatically deleted when dropped)
    let output = Command::new("gnuplot").arg(temp_script.path()).output()?;

    if !output.status.success() {
        return Err(std::io::Error::other(format!(
            "gnuplot failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    Ok(())
}

fn render_template(template: &str, output_path: &Path, data_path: &Path) -> String {
    template
        .replace("{{OUTPUT_PATH}}", &output_path.display().to_string())
        .replace("{{DATA_PATH}}", &data_path.display().to_string())
}
