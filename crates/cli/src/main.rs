use anyhow::Context;
use clap::{Parser, Subcommand};
use patientor_core::{
    data_dir_from_env_value, CoreConfig, DiagnosisService, Services, SickLeavePolicy,
};
use patientor_uuid::{IdGenerator, SequentialIdGenerator};
use records::{Entry, EntryDetails, NewEntry};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "patientor")]
#[command(about = "Patientor patient record CLI")]
struct Cli {
    /// Directory containing patients.json and diagnoses.json (defaults to the bundled data)
    #[arg(long, global = true, env = "PATIENTOR_DATA_DIR")]
    data_dir: Option<String>,

    /// How malformed sick leave on occupational entries is treated
    #[arg(long, global = true, env = "PATIENTOR_SICK_LEAVE_POLICY")]
    sick_leave_policy: Option<SickLeavePolicy>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// List all diagnosis codes
    Diagnoses,
    /// Show one patient and their entries
    Show {
        /// Patient identifier
        id: String,
    },
    /// Validate an entry payload file without storing it
    CheckEntry {
        /// Path to a JSON entry payload
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cfg = Arc::new(CoreConfig::new(
        data_dir_from_env_value(cli.data_dir),
        cli.sick_leave_policy.unwrap_or_default(),
    )?);

    match cli.command {
        Some(Commands::List) => {
            let services = Services::load(cfg)?;
            let patients = services.patients.list_patients()?;
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for patient in patients {
                    println!(
                        "ID: {}, Name: {}, Gender: {}, Occupation: {}, Entries: {}",
                        patient.id,
                        patient.name,
                        patient.gender,
                        patient.occupation,
                        patient.entries.len()
                    );
                }
            }
        }
        Some(Commands::Diagnoses) => {
            let services = Services::load(cfg)?;
            for diagnosis in services.diagnoses.list() {
                println!("{}  {}", diagnosis.code, diagnosis.name);
            }
        }
        Some(Commands::Show { id }) => {
            let services = Services::load(cfg)?;
            let patient = services.patients.get_patient(&id)?;
            println!("{} ({})", patient.name, patient.id);
            println!("  Born: {}", patient.date_of_birth);
            println!("  SSN: {}", patient.ssn);
            println!("  Gender: {}", patient.gender);
            println!("  Occupation: {}", patient.occupation);
            if patient.entries.is_empty() {
                println!("  No entries.");
            }
            for entry in &patient.entries {
                for line in entry_lines(entry, &services.diagnoses) {
                    println!("  {line}");
                }
            }
        }
        Some(Commands::CheckEntry { path }) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let payload: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not valid JSON", path.display()))?;

            let new_entry = NewEntry::parse(&payload, cfg.sick_leave_policy())
                .with_context(|| format!("{} is not a valid entry", path.display()))?;
            let ids = SequentialIdGenerator::new("preview")?;
            let entry = new_entry.into_entry(ids.next_id());
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        None => {
            println!("Use 'patientor --help' for commands");
        }
    }

    Ok(())
}

/// Renders an entry for `show`, resolving diagnosis codes to names where known.
fn entry_lines(entry: &Entry, diagnoses: &DiagnosisService) -> Vec<String> {
    let mut lines = vec![format!(
        "{} [{}] {} ({})",
        entry.date,
        entry.kind(),
        entry.description,
        entry.specialist
    )];

    match &entry.details {
        EntryDetails::Hospital { discharge } => {
            lines.push(format!(
                "    Discharged {}: {}",
                discharge.date, discharge.criteria
            ));
        }
        EntryDetails::OccupationalHealthcare {
            employer_name,
            sick_leave,
        } => {
            lines.push(format!("    Employer: {employer_name}"));
            if let Some(leave) = sick_leave {
                lines.push(format!(
                    "    Sick leave: {} to {}",
                    leave.start_date, leave.end_date
                ));
            }
        }
        EntryDetails::HealthCheck {
            health_check_rating,
        } => {
            lines.push(format!(
                "    Rating: {} ({})",
                health_check_rating.as_u8(),
                health_check_rating.label()
            ));
        }
    }

    for code in entry.diagnosis_codes.iter().flatten() {
        let name = diagnoses
            .find(code)
            .map(|d| d.name.as_str())
            .unwrap_or("unknown code");
        lines.push(format!("    {code}: {name}"));
    }

    lines
}
