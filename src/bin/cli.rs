use anyhow::Context;
use clap::Parser;
use roster_tool::{
    DEFAULT_DATA_PATH, DailyLesson, IntegrityPolicy, RosterConfig, RosterStore, ScheduleManager,
    save_attendance_to_csv,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Front desk roster for a music school")]
struct Cli {
    /// JSON data file holding students, teachers, courses and attendance
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// Refuse to start when the data file has dangling or one-sided references
    #[arg(long)]
    strict: bool,
}

/// Logs go to stderr; stdout is reserved for the menu.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "roster_tool=warn".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn print_menu() {
    println!("\n===== Music School Roster =====");
    println!("1. View daily roster");
    println!("2. Student check-in");
    println!("3. Switch course");
    println!("4. Export attendance to CSV");
    println!("Q. Quit");
}

fn print_daily_roster(day: &str, lessons: &[DailyLesson]) {
    println!("\n--- Daily Roster for {day} ---");
    if lessons.is_empty() {
        println!("No lessons scheduled for this day.");
        return;
    }
    for (i, lesson) in lessons.iter().enumerate() {
        let students = if lesson.students.is_empty() {
            "None".to_string()
        } else {
            lesson.students.join(", ")
        };
        println!("\nLesson {}:", i + 1);
        println!("  Course: {} ({})", lesson.course_name, lesson.instrument);
        println!("  Teacher: {}", lesson.teacher);
        println!("  Time: {}", lesson.time);
        println!("  Students: {students}");
    }
}

/// Prints `label` and reads one line. `None` means stdin is closed.
fn prompt<I>(input: &mut I, label: &str) -> io::Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("{label}");
    io::stdout().flush()?;
    input
        .next()
        .transpose()
        .map(|line| line.map(|l| l.trim().to_string()))
}

fn parse_id(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok()
}

fn run_menu<S, I>(manager: &mut ScheduleManager<S>, input: &mut I) -> anyhow::Result<()>
where
    S: RosterStore,
    I: Iterator<Item = io::Result<String>>,
{
    loop {
        print_menu();
        let Some(choice) = prompt(input, "Enter choice: ")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let Some(day) = prompt(input, "Enter day (e.g., Monday): ")? else {
                    break;
                };
                print_daily_roster(&day, &manager.get_daily_lessons(&day));
            }
            "2" => {
                let Some(student_raw) = prompt(input, "Enter student ID: ")? else {
                    break;
                };
                let Some(course_raw) = prompt(input, "Enter course ID: ")? else {
                    break;
                };
                let (Some(student_id), Some(course_id)) =
                    (parse_id(&student_raw), parse_id(&course_raw))
                else {
                    println!("Error: IDs must be whole numbers.");
                    continue;
                };
                match manager.check_in(student_id, course_id) {
                    Ok(_) => {
                        let student = manager
                            .find_student_by_id(student_id)
                            .map(|s| s.name.as_str())
                            .unwrap_or_default();
                        let course = manager
                            .find_course_by_id(course_id)
                            .map(|c| c.name.as_str())
                            .unwrap_or_default();
                        println!("Success: Student {student} checked into {course}.");
                    }
                    Err(err) => println!("Error: Check-in failed. {err}."),
                }
            }
            "3" => {
                let Some(student_raw) = prompt(input, "Enter student ID: ")? else {
                    break;
                };
                let Some(from_raw) = prompt(input, "Enter course ID to leave: ")? else {
                    break;
                };
                let Some(to_raw) = prompt(input, "Enter course ID to join: ")? else {
                    break;
                };
                let (Some(student_id), Some(from_id), Some(to_id)) =
                    (parse_id(&student_raw), parse_id(&from_raw), parse_id(&to_raw))
                else {
                    println!("Error: IDs must be whole numbers.");
                    continue;
                };
                match manager.switch_course(student_id, from_id, to_id) {
                    Ok(()) => {
                        let name_of = |id| {
                            manager
                                .find_course_by_id(id)
                                .map(|c| c.name.clone())
                                .unwrap_or_default()
                        };
                        let student = manager
                            .find_student_by_id(student_id)
                            .map(|s| s.name.clone())
                            .unwrap_or_default();
                        println!(
                            "Success: Student {student} switched from {} to {}.",
                            name_of(from_id),
                            name_of(to_id)
                        );
                    }
                    Err(err) => println!("Error: Course switch failed. {err}."),
                }
            }
            "4" => {
                let Some(path) = prompt(input, "Enter CSV path: ")? else {
                    break;
                };
                match save_attendance_to_csv(manager.attendance_log(), &path) {
                    Ok(count) => println!("Exported {count} attendance records to {path}."),
                    Err(err) => println!("Error: Export failed. {err}."),
                }
            }
            choice if choice.eq_ignore_ascii_case("q") => break,
            _ => println!("Error: Invalid choice."),
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let integrity = if cli.strict {
        IntegrityPolicy::Strict
    } else {
        IntegrityPolicy::Permissive
    };
    let config = RosterConfig::new(cli.data).with_integrity(integrity);
    let mut manager = ScheduleManager::open(&config)
        .with_context(|| format!("failed to load roster from {}", config.data_path.display()))?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    run_menu(&mut manager, &mut lines)
}
