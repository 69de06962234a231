use crate::schema::{daily_attendance, special_events, students};
use chrono::NaiveDate;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// The three meals served by the mess each day, stored as text in the
/// `daily_attendance` table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
        }
    }

    /// The numeric encoding used as a regression feature.
    pub fn encoded(&self) -> i64 {
        match self {
            MealType::Breakfast => 0,
            MealType::Lunch => 1,
            MealType::Dinner => 2,
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Breakfast" | "breakfast" => Ok(MealType::Breakfast),
            "Lunch" | "lunch" => Ok(MealType::Lunch),
            "Dinner" | "dinner" => Ok(MealType::Dinner),
            other => Err(format!(
                "unknown meal type '{other}', expected Breakfast, Lunch, or Dinner"
            )),
        }
    }
}

impl ToSql<Text, Sqlite> for MealType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for MealType {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        text.parse().map_err(Into::into)
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Tabled)]
#[diesel(table_name = students)]
#[diesel(primary_key(student_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Student {
    pub student_id: i32,
    pub name: String,
    pub room_no: String,
    pub department: String,
    pub join_date: NaiveDate,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = students)]
pub struct NewStudent<'a> {
    pub name: &'a str,
    pub room_no: &'a str,
    pub department: &'a str,
    pub join_date: NaiveDate,
}

/// Partial update for a student row. `None` fields are left untouched.
#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = students)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub room_no: Option<String>,
    pub department: Option<String>,
}

impl StudentUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.room_no.is_none() && self.department.is_none()
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Tabled)]
#[diesel(table_name = daily_attendance)]
#[diesel(primary_key(attendance_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AttendanceRecord {
    pub attendance_id: i32,
    pub student_id: i32,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub is_present: bool,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = daily_attendance)]
pub struct NewAttendance {
    pub student_id: i32,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub is_present: bool,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Tabled)]
#[diesel(table_name = special_events)]
#[diesel(primary_key(event_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SpecialEvent {
    pub event_id: i32,
    pub event_date: NaiveDate,
    pub event_name: String,
    pub expected_impact: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = special_events)]
pub struct NewSpecialEvent<'a> {
    pub event_date: NaiveDate,
    pub event_name: &'a str,
    pub expected_impact: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_type_parses_case_insensitively() {
        assert_eq!("Breakfast".parse::<MealType>().unwrap(), MealType::Breakfast);
        assert_eq!("lunch".parse::<MealType>().unwrap(), MealType::Lunch);
        assert!("Brunch".parse::<MealType>().is_err());
    }

    #[test]
    fn meal_type_encoding_is_stable() {
        assert_eq!(MealType::Breakfast.encoded(), 0);
        assert_eq!(MealType::Lunch.encoded(), 1);
        assert_eq!(MealType::Dinner.encoded(), 2);
    }
}
