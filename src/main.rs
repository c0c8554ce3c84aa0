use std::fs;
use std::path::{Path, PathBuf};
use csv::Writer;
use rayon::prelude::*;
use walkdir::WalkDir;

use swing_kinematics::{analyze_recordings, summarize_session, AnalysisConfig, SessionSummary, SwingAnalysisResult};

const MOMENTUM_SUFFIX: &str = "_momentum.csv";
const ROTATION_SUFFIX: &str = "_rotation.csv";

/// One session export: a momentum table and an optional rotation table
/// sharing the same file prefix.
#[derive(Debug, Clone)]
struct SessionFiles {
    name: String,
    momentum: PathBuf,
    rotation: Option<PathBuf>,
}

struct SessionReport {
    name: String,
    results: Vec<SwingAnalysisResult>,
    summary: SessionSummary,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <session_folder> [output_folder]", args[0]);
        std::process::exit(2);
    }
    let input_folder = PathBuf::from(&args[1]);
    let output_folder = args.get(2).map(PathBuf::from).unwrap_or_else(|| input_folder.clone());

    println!("\n⚾ SWING KINEMATIC ANALYSIS");
    println!("==========================");
    println!("📁 Input folder: {}", input_folder.display());
    println!("📁 Output folder: {}", output_folder.display());
    println!("⚡ Using parallel processing on {} cores", num_cpus::get());

    fs::create_dir_all(&output_folder)?;

    let sessions = find_sessions(&input_folder)?;
    println!("🔍 Found {} session exports\n", sessions.len());
    if sessions.is_empty() {
        println!("⚠️  No *{} files found", MOMENTUM_SUFFIX);
        return Ok(());
    }

    let config = AnalysisConfig::default();
    let outcomes: Vec<(String, Result<SessionReport, String>)> = sessions
        .par_iter()
        .map(|session| {
            let outcome = process_session(session, &config).map_err(|e| e.to_string());
            (session.name.clone(), outcome)
        })
        .collect();

    let mut reports = Vec::new();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                let output_path = output_folder.join(format!("{}_swing_results.csv", report.name));
                write_results_csv(&report.results, &output_path)?;
                print_session_report(&report);
                reports.push(report);
            }
            Err(e) => {
                eprintln!("❌ Error processing {}: {}", name, e);
            }
        }
    }

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let summary_path = output_folder.join(format!("session_summaries_{}.csv", stamp));
    write_summaries_csv(&reports, &summary_path)?;

    println!("\n✅ Processed {} out of {} sessions", reports.len(), sessions.len());
    println!("📁 Summaries saved to: {}", summary_path.display());

    Ok(())
}

fn find_sessions(folder: &Path) -> Result<Vec<SessionFiles>, Box<dyn std::error::Error>> {
    let mut sessions = Vec::new();

    for entry in WalkDir::new(folder).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        let Some(prefix) = file_name.strip_suffix(MOMENTUM_SUFFIX) else {
            continue;
        };

        let rotation = entry.path().with_file_name(format!("{}{}", prefix, ROTATION_SUFFIX));
        sessions.push(SessionFiles {
            name: prefix.to_string(),
            momentum: entry.path().to_path_buf(),
            rotation: rotation.exists().then_some(rotation),
        });
    }

    Ok(sessions)
}

fn process_session(session: &SessionFiles, config: &AnalysisConfig) -> Result<SessionReport, Box<dyn std::error::Error>> {
    let momentum = fs::read_to_string(&session.momentum)?;
    let rotation = match &session.rotation {
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };

    let results = analyze_recordings(&momentum, rotation.as_deref(), config);
    let summary = summarize_session(&results);

    Ok(SessionReport {
        name: session.name.clone(),
        results,
        summary,
    })
}

fn write_results_csv(results: &[SwingAnalysisResult], output_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = Writer::from_path(output_path)?;
    for result in results {
        wtr.serialize(result)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_summaries_csv(reports: &[SessionReport], output_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = Writer::from_path(output_path)?;

    wtr.write_record([
        "Session",
        "Movements",
        "Dominant Category",
        "Consistency %",
        "Mean Timing Gap (ms)",
        "Sequencing %",
        "Deceleration %",
    ])?;

    for report in reports {
        let s = &report.summary;
        wtr.write_record(&[
            report.name.clone(),
            s.movement_count.to_string(),
            s.dominant_category.map(|c| c.to_string()).unwrap_or_default(),
            format!("{:.1}", s.consistency * 100.0),
            format!("{:.1}", s.mean_timing_gap_ms),
            format!("{:.1}", s.sequencing_rate * 100.0),
            format!("{:.1}", s.deceleration_rate * 100.0),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn print_session_report(report: &SessionReport) {
    let s = &report.summary;
    println!("📊 {}: {} movements", report.name, s.movement_count);

    match s.dominant_category {
        Some(category) => {
            println!("   Dominant pattern: {} ({:.0}% of swings)", category, s.consistency * 100.0);
            println!("   Mean pelvis→torso gap: {:.1}ms", s.mean_timing_gap_ms);
            println!("   Correct sequencing: {:.0}%", s.sequencing_rate * 100.0);
            println!("   Full deceleration: {:.0}%", s.deceleration_rate * 100.0);
        }
        None => println!("   ⚠️  No movement had enough samples to analyse"),
    }
}
