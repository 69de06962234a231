use crate::models::{
    AttendanceRecord, NewAttendance, NewSpecialEvent, NewStudent, SpecialEvent, Student,
    StudentUpdate,
};
use crate::schema;
use chrono::NaiveDate;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::result::QueryResult;
use dotenvy::dotenv;
use std::env;

/// DDL for the full mess-attendance schema. Executed by the `setup` binary
/// and by test fixtures against in-memory databases.
pub const SCHEMA_DDL: &str = "
CREATE TABLE IF NOT EXISTS students (
    student_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    room_no TEXT NOT NULL,
    department TEXT NOT NULL,
    join_date DATE NOT NULL
);

CREATE TABLE IF NOT EXISTS daily_attendance (
    attendance_id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students (student_id),
    date DATE NOT NULL,
    meal_type TEXT NOT NULL,
    is_present BOOLEAN NOT NULL DEFAULT 1,
    UNIQUE (student_id, date, meal_type)
);

CREATE TABLE IF NOT EXISTS special_events (
    event_id INTEGER PRIMARY KEY AUTOINCREMENT,
    event_date DATE NOT NULL,
    event_name TEXT NOT NULL,
    expected_impact TEXT NOT NULL
);
";

/// The manager for recording, modifying, and retrieving meal attendance data.
pub struct AttendanceManager {
    db: SqliteConnection,
}

impl AttendanceManager {
    /// Creates a new `AttendanceManager` by connecting to the `sqlite3` instance located at the
    /// `DATABASE_URL` environment variable.
    pub fn connect() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let connection = SqliteConnection::establish(&database_url)
            .unwrap_or_else(|_| panic!("Error connecting to {}", database_url));

        Self { db: connection }
    }

    /// Creates a manager backed by a fresh in-memory database with the schema applied.
    pub fn open_in_memory() -> Self {
        let connection = SqliteConnection::establish(":memory:")
            .expect("in-memory SQLite databases are always available");

        let mut manager = Self { db: connection };
        manager
            .initialize_schema()
            .expect("the built-in schema DDL is valid");
        manager
    }

    /// Creates all tables if they do not already exist.
    pub fn initialize_schema(&mut self) -> QueryResult<()> {
        self.db.batch_execute(SCHEMA_DDL)
    }

    // ===== Students =====

    /// Returns the total number of students on the roster.
    pub fn num_students(&mut self) -> QueryResult<usize> {
        use schema::students::dsl::*;

        students
            .count()
            .get_result(&mut self.db)
            .map(|count: i64| count as usize)
    }

    /// Retrieves all students on the roster, ordered by ID.
    pub fn get_roster(&mut self) -> QueryResult<Vec<Student>> {
        use schema::students::dsl::*;

        students
            .select(Student::as_select())
            .order(student_id.asc())
            .load(&mut self.db)
    }

    /// Retrieves a specific student from the roster based on their ID.
    pub fn get_student(&mut self, id: i32) -> QueryResult<Student> {
        schema::students::table
            .find(id)
            .select(Student::as_select())
            .first(&mut self.db)
    }

    /// Inserts a student and returns the stored row, including the assigned ID.
    pub fn insert_student(&mut self, new_student: &NewStudent) -> QueryResult<Student> {
        diesel::insert_into(schema::students::table)
            .values(new_student)
            .returning(Student::as_returning())
            .get_result(&mut self.db)
    }

    /// Inserts students into the database.
    pub fn insert_students(&mut self, new_students: &[NewStudent]) -> QueryResult<()> {
        let students_inserted = diesel::insert_into(schema::students::table)
            .values(new_students)
            .execute(&mut self.db)?;

        assert_eq!(students_inserted, new_students.len());

        Ok(())
    }

    /// Applies a partial update to a student. Returns the number of rows changed,
    /// which is zero when no such student exists or the changeset is empty.
    pub fn update_student(&mut self, id: i32, changes: &StudentUpdate) -> QueryResult<usize> {
        if changes.is_empty() {
            return Ok(0);
        }

        diesel::update(schema::students::table.find(id))
            .set(changes)
            .execute(&mut self.db)
    }

    /// Removes and returns a student from the roster given their ID.
    ///
    /// Any attendance records for the student are removed first so the foreign
    /// key constraint cannot be violated.
    pub fn delete_student(&mut self, id: i32) -> QueryResult<Student> {
        use schema::daily_attendance::dsl as attendance;

        diesel::delete(attendance::daily_attendance.filter(attendance::student_id.eq(id)))
            .execute(&mut self.db)?;

        diesel::delete(schema::students::table.find(id))
            .returning(Student::as_returning())
            .get_result(&mut self.db)
    }

    // ===== Attendance =====

    /// Records one meal attendance row and returns it with the assigned ID.
    pub fn insert_attendance(&mut self, record: &NewAttendance) -> QueryResult<AttendanceRecord> {
        diesel::insert_into(schema::daily_attendance::table)
            .values(record)
            .returning(AttendanceRecord::as_returning())
            .get_result(&mut self.db)
    }

    /// Updates the presence flag of an attendance record. Returns the number of
    /// rows changed.
    pub fn update_attendance(&mut self, id: i32, present: bool) -> QueryResult<usize> {
        use schema::daily_attendance::dsl::*;

        diesel::update(daily_attendance.find(id))
            .set(is_present.eq(present))
            .execute(&mut self.db)
    }

    /// Removes an attendance record. Returns the number of rows deleted.
    pub fn delete_attendance(&mut self, id: i32) -> QueryResult<usize> {
        diesel::delete(schema::daily_attendance::table.find(id)).execute(&mut self.db)
    }

    /// Retrieves all attendance records for a given date, joined with the
    /// corresponding student, ordered by meal and then student name.
    pub fn attendance_on(
        &mut self,
        day: NaiveDate,
    ) -> QueryResult<Vec<(AttendanceRecord, Student)>> {
        use schema::daily_attendance::dsl as attendance;
        use schema::students::dsl as students;

        attendance::daily_attendance
            .inner_join(students::students)
            .filter(attendance::date.eq(day))
            .select((AttendanceRecord::as_select(), Student::as_select()))
            .order((attendance::meal_type.asc(), students::name.asc()))
            .load(&mut self.db)
    }

    /// Retrieves every attendance record joined with its student.
    pub fn all_attendance_with_students(
        &mut self,
    ) -> QueryResult<Vec<(AttendanceRecord, Student)>> {
        schema::daily_attendance::table
            .inner_join(schema::students::table)
            .select((AttendanceRecord::as_select(), Student::as_select()))
            .load(&mut self.db)
    }

    /// Retrieves every attendance record.
    pub fn all_attendance(&mut self) -> QueryResult<Vec<AttendanceRecord>> {
        schema::daily_attendance::table
            .select(AttendanceRecord::as_select())
            .load(&mut self.db)
    }

    // ===== Special events =====

    /// Records a special event (festival, holiday, exam week) that may affect
    /// mess turnout.
    pub fn insert_special_event(&mut self, event: &NewSpecialEvent) -> QueryResult<SpecialEvent> {
        diesel::insert_into(schema::special_events::table)
            .values(event)
            .returning(SpecialEvent::as_returning())
            .get_result(&mut self.db)
    }

    /// Retrieves all special events ordered by date.
    pub fn special_events(&mut self) -> QueryResult<Vec<SpecialEvent>> {
        use schema::special_events::dsl::*;

        special_events
            .select(SpecialEvent::as_select())
            .order(event_date.asc())
            .load(&mut self.db)
    }
}
