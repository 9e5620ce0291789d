use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use marksheet::course::{Course, CourseLookup, MarkStore, Student};
use marksheet::error::EngineError;
use marksheet::grading::GradeScale;
use marksheet::mark::Mark;
use marksheet::records::Records;
use marksheet::scheme::{LeafKey, SchemeBuilder};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_RECORDS: i32 = 5;
const EXIT_ENGINE: i32 = 6;

#[derive(Subcommand, Debug)]
enum CourseCommand {
    /// Add a course without an assessment scheme
    Add {
        id: String,
        name: String,
        /// Academic units (GPA weight)
        #[arg(long)]
        au: u32,
    },
    /// List courses
    List,
}

#[derive(Subcommand, Debug)]
enum StudentCommand {
    /// Add a student
    Add { id: String, name: String },
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config file
    Init,
    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommand,
    },
    /// Manage students
    Student {
        #[command(subcommand)]
        action: StudentCommand,
    },
    /// Build a course's assessment scheme interactively
    Scheme {
        course: String,
        /// Print the existing scheme instead of building one
        #[arg(long)]
        show: bool,
    },
    /// Record a student's scores for a course, replacing any earlier mark
    Record {
        course: String,
        student: String,
        /// Scores as Main=value or Main/Sub=value
        #[arg(required = true, value_parser = parse_score)]
        scores: Vec<(LeafKey, f64)>,
    },
    /// Cohort statistics for a course
    Stats { course: String },
    /// Grades, semester GPA and honours for a student
    Transcript { student: String },
}

#[derive(Parser, Debug)]
#[command(name = "marksheet")]
#[command(about = "Weighted course assessment and GPA calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/marksheet/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Parse a `leaf=value` argument
fn parse_score(arg: &str) -> Result<(LeafKey, f64), String> {
    let (leaf, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected LEAF=VALUE, got '{}'", arg))?;
    let key = LeafKey::parse(leaf).ok_or_else(|| format!("invalid component '{}'", leaf))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid score '{}' for {}", value.trim(), key))?;
    Ok((key, value))
}

/// Report an error and exit. Engine failures get their own exit code.
fn fail(context: &str, err: anyhow::Error) -> ! {
    eprintln!("{}: {:#}", context, err);
    let code = if err.downcast_ref::<EngineError>().is_some() {
        EXIT_ENGINE
    } else {
        EXIT_RECORDS
    };
    std::process::exit(code);
}

fn fail_engine(err: EngineError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(EXIT_ENGINE);
}

fn load(path: &Path) -> Records {
    match marksheet::records::load_records(path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Records error: {:#}", e);
            std::process::exit(EXIT_RECORDS);
        }
    }
}

fn save(path: &Path, records: &Records) {
    if let Err(e) = marksheet::records::save_records(path, records) {
        fail("Records error", e);
    }
}

fn find_course<'a>(records: &'a Records, course_id: &str) -> &'a Course {
    match records.course(course_id) {
        Some(c) => c,
        None => fail_engine(EngineError::UnknownCourse(course_id.to_string())),
    }
}

fn main() {
    let cli = Cli::parse();
    let use_colors = marksheet::output::should_use_colors();

    if let Commands::Init = cli.command {
        if let Err(e) = marksheet::telemetry::init_tracing(cli.verbose, None) {
            eprintln!("Logging setup failed: {}", e);
        }
        let path = match cli.config.clone().map_or_else(marksheet::config::get_config_path, Ok) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Config error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
        if let Err(e) = marksheet::config::write_default_config(&path) {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote default config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match marksheet::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(e) = marksheet::telemetry::init_tracing(cli.verbose, config.log_level.as_deref()) {
        eprintln!("Logging setup failed: {}", e);
    }

    // Validate grading config at startup
    let effective_grading = config.grading.clone().unwrap_or_default();
    let scale = match GradeScale::from_config(&effective_grading) {
        Ok(s) => s,
        Err(errors) => {
            eprintln!("Grading config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    };

    let records_path = match marksheet::config::records_path(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    tracing::debug!(path = %records_path.display(), "using records file");
    let mut records = load(&records_path);

    match cli.command {
        // Handled before the config is loaded.
        Commands::Init => {}
        Commands::Course { action } => match action {
            CourseCommand::Add { id, name, au } => {
                if !records.add_course(Course::new(id.clone(), name, au)) {
                    eprintln!("Course {} already exists.", id);
                    std::process::exit(EXIT_RECORDS);
                }
                save(&records_path, &records);
                println!("Added course {}. Build its scheme with `marksheet scheme {}`.", id, id);
            }
            CourseCommand::List => {
                if records.courses.is_empty() {
                    println!("No courses.");
                }
                for course in &records.courses {
                    let status = if course.has_scheme() { "" } else { "  (no scheme)" };
                    println!(
                        "{}  {}  {} AU{}",
                        course.id, course.name, course.academic_units, status
                    );
                }
            }
        },
        Commands::Student { action } => match action {
            StudentCommand::Add { id, name } => {
                if !records.add_student(Student {
                    id: id.clone(),
                    name,
                }) {
                    eprintln!("Student {} already exists.", id);
                    std::process::exit(EXIT_RECORDS);
                }
                save(&records_path, &records);
                println!("Added student {}.", id);
            }
        },
        Commands::Scheme { course, show } => {
            let existing = find_course(&records, &course);
            if show {
                println!("{}", marksheet::output::format_scheme(existing, use_colors));
                std::process::exit(EXIT_SUCCESS);
            }

            let builder = match SchemeBuilder::for_course(existing) {
                Ok(b) => b,
                Err(e) => fail_engine(e),
            };
            let mut input = marksheet::prompt::PromptInput::stdio();
            let scheme = match marksheet::scheme::build_scheme(builder, &mut input) {
                Ok(s) => s,
                Err(e) => fail("Scheme not saved", e),
            };

            let Some(target) = records.course_mut(&course) else {
                fail_engine(EngineError::UnknownCourse(course));
            };
            if let Err(e) = target.attach_scheme(scheme) {
                fail_engine(e);
            }
            save(&records_path, &records);
            println!();
            println!(
                "{}",
                marksheet::output::format_scheme(find_course(&records, &course), use_colors)
            );
        }
        Commands::Record {
            course,
            student,
            scores,
        } => {
            if records.student(&student).is_none() {
                eprintln!("No student with id {}.", student);
                std::process::exit(EXIT_RECORDS);
            }
            let target = find_course(&records, &course);
            let scheme = match target.require_scheme() {
                Ok(s) => s,
                Err(e) => fail_engine(e),
            };
            let mark = match Mark::record(scheme, &student, &course, scores) {
                Ok(m) => m,
                Err(e) => fail_engine(e),
            };
            let breakdown = match marksheet::mark::breakdown(&mark, scheme) {
                Ok(b) => b,
                Err(e) => fail_engine(e),
            };

            let replaced = records.put_mark(mark).is_some();
            save(&records_path, &records);
            let verb = if replaced { "Replaced" } else { "Recorded" };
            println!("{} mark for {} in {}", verb, student, course);
            println!("{}", marksheet::output::format_breakdown(&breakdown, use_colors));
        }
        Commands::Stats { course } => {
            let target = find_course(&records, &course);
            let marks = records.marks_for_course(&course);
            let stats = match marksheet::stats::course_statistics(target, &marks) {
                Ok(s) => s,
                Err(e) => fail_engine(e),
            };
            println!(
                "{}",
                marksheet::output::format_course_statistics(&stats, use_colors)
            );
        }
        Commands::Transcript { student } => {
            let marks = records.marks_for_student(&student);
            let transcript =
                match marksheet::grading::transcript(&student, &marks, &records, &scale) {
                    Ok(t) => t,
                    Err(e) => fail_engine(e),
                };
            let name = records.student(&student).map(|s| s.name.as_str());
            println!(
                "{}",
                marksheet::output::format_transcript(&transcript, name, use_colors)
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
