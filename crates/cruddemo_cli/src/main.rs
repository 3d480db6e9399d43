//! Student CRUD demo driver.
//!
//! # Responsibility
//! - Resolve configuration, open the database and bind the student service.
//! - Run a fixed sequence of create/read/query/update calls and print results.
//!
//! Configuration comes from `CRUDDEMO_DB_PATH`, `CRUDDEMO_LOG_LEVEL` and
//! `CRUDDEMO_LOG_DIR`; with none set the demo runs against an in-memory
//! database without file logging.

use cruddemo_core::{
    core_version, init_logging, AppConfig, SqliteStudentDao, Student, StudentDao, StudentId,
    StudentService,
};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::process::ExitCode;

type DemoResult<T> = Result<T, Box<dyn Error>>;

/// A row written earlier in this run could not be read back.
#[derive(Debug)]
struct MissingStudent(StudentId);

impl Display for MissingStudent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "student {} was saved in this run but is no longer stored", self.0)
    }
}

impl Error for MissingStudent {}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=demo_run module=cli status=error error={err}");
            eprintln!("cruddemo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> DemoResult<()> {
    let config = AppConfig::from_env()?;
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(config.log_level, log_dir)?;
    }
    info!(
        "event=demo_run module=cli status=start version={}",
        core_version()
    );

    let conn = config.open_database()?;
    let service = StudentService::new(SqliteStudentDao::try_new(&conn)?);

    let first_id = create_student(&service)?;
    create_multiple_students(&service)?;
    read_student(&service)?;
    query_for_students(&service)?;
    query_for_students_ordered(&service)?;
    query_for_students_by_last_name(&service, "Vegas")?;
    update_student(&service, first_id)?;

    info!("event=demo_run module=cli status=ok");
    Ok(())
}

fn create_student<R: StudentDao>(service: &StudentService<R>) -> DemoResult<StudentId> {
    println!("Creating and saving new student...");
    let student = service.create_student("Agustin", "Bollati", "agubollati@miempresa.com.ar")?;
    let id = student.id.ok_or("saved student has no generated id")?;

    println!("Saved student. Generated id: {id}");
    Ok(id)
}

fn create_multiple_students<R: StudentDao>(service: &StudentService<R>) -> DemoResult<()> {
    println!("Creating and saving 3 students...");
    for (first_name, last_name, email) in [
        ("Javier", "Vegas", "javi.vegas@miempresa.com.ar"),
        ("Mailen", "Mancuso", "mailen.mancuso@miempresa.com.ar"),
        ("Diego", "Vitulli", "diego.vitulli@miempresa.com.ar"),
    ] {
        let student = service.create_student(first_name, last_name, email)?;
        println!("  saved {student}");
    }
    Ok(())
}

fn read_student<R: StudentDao>(service: &StudentService<R>) -> DemoResult<()> {
    println!("Creating new student object...");
    let mut student = Student::new("Daffy", "Duck", "daffy@miempresa.com.ar");

    println!("Saving the student...");
    let id = service.save(&mut student)?;
    println!("Saved student. Generated id: {id}");

    println!("Retrieving student with id: {id}");
    let found = service.find_by_id(id)?.ok_or(MissingStudent(id))?;
    println!("Found the student: {found}");
    Ok(())
}

fn query_for_students<R: StudentDao>(service: &StudentService<R>) -> DemoResult<()> {
    print_students("All students:", &service.find_all()?);
    Ok(())
}

fn query_for_students_ordered<R: StudentDao>(service: &StudentService<R>) -> DemoResult<()> {
    print_students(
        "All students ordered by last name:",
        &service.find_all_order_by_last_name()?,
    );
    Ok(())
}

fn query_for_students_by_last_name<R: StudentDao>(
    service: &StudentService<R>,
    last_name: &str,
) -> DemoResult<()> {
    print_students(
        &format!("Students with last name '{last_name}':"),
        &service.find_by_last_name(last_name)?,
    );
    Ok(())
}

fn update_student<R: StudentDao>(service: &StudentService<R>, id: StudentId) -> DemoResult<()> {
    println!("Getting student with id: {id}");
    let mut student = service.find_by_id(id)?.ok_or(MissingStudent(id))?;

    println!("Updating student...");
    student.first_name = "Scooby".to_string();
    service.update(&student)?;

    let updated = service.find_by_id(id)?.ok_or(MissingStudent(id))?;
    println!("Updated student: {updated}");
    Ok(())
}

fn print_students(title: &str, students: &[Student]) {
    println!("{title}");
    if students.is_empty() {
        println!("  (none)");
    }
    for student in students {
        println!("  {student}");
    }
}
