use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::students;
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::Student;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[allow(dead_code)] // Timestamps are only used for ordering
pub struct StudentRow {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub city: String,
    pub email: String,
    pub group_name: String,
    pub phone: String,
    pub address: String,
    pub tuition_fee: f64,
    pub enrolled: bool,
    pub mentor: String,
    pub subjects: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub struct NewStudentRow<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub age: i32,
    pub city: &'a str,
    pub email: &'a str,
    pub group_name: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub tuition_fee: f64,
    pub enrolled: bool,
    pub mentor: &'a str,
    pub subjects: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = students)]
pub struct StudentChangeset<'a> {
    pub name: &'a str,
    pub age: i32,
    pub city: &'a str,
    pub email: &'a str,
    pub group_name: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
    pub tuition_fee: f64,
    pub enrolled: bool,
    pub mentor: &'a str,
    pub subjects: String,
    pub updated_at: NaiveDateTime,
}

impl<'a> NewStudentRow<'a> {
    pub fn from_student(student: &'a Student, now: NaiveDateTime) -> RepositoryResult<Self> {
        Ok(Self {
            id: &student.id,
            name: &student.name,
            age: student.age,
            city: &student.city,
            email: &student.email,
            group_name: &student.group_name,
            phone: &student.phone,
            address: &student.address,
            tuition_fee: student.tuition_fee,
            enrolled: student.enrolled,
            mentor: &student.mentor,
            subjects: subjects_to_json(&student.subjects)?,
            created_at: now,
            updated_at: now,
        })
    }
}

impl<'a> StudentChangeset<'a> {
    pub fn from_student(student: &'a Student, now: NaiveDateTime) -> RepositoryResult<Self> {
        Ok(Self {
            name: &student.name,
            age: student.age,
            city: &student.city,
            email: &student.email,
            group_name: &student.group_name,
            phone: &student.phone,
            address: &student.address,
            tuition_fee: student.tuition_fee,
            enrolled: student.enrolled,
            mentor: &student.mentor,
            subjects: subjects_to_json(&student.subjects)?,
            updated_at: now,
        })
    }
}

impl TryFrom<StudentRow> for Student {
    type Error = RepositoryError;

    fn try_from(row: StudentRow) -> Result<Self, Self::Error> {
        let subjects = subjects_from_json(&row.subjects).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Failed to unmarshal subjects: {}", e),
                ErrorContext::new("decode_student_row")
                    .with_entity("student")
                    .with_entity_id(&row.id),
            )
        })?;

        Ok(Student {
            id: row.id,
            name: row.name,
            age: row.age,
            city: row.city,
            email: row.email,
            group_name: row.group_name,
            phone: row.phone,
            address: row.address,
            tuition_fee: row.tuition_fee,
            enrolled: row.enrolled,
            mentor: row.mentor,
            subjects,
        })
    }
}

fn subjects_to_json(subjects: &[String]) -> RepositoryResult<String> {
    serde_json::to_string(subjects)
        .map_err(|e| RepositoryError::internal(format!("Failed to marshal subjects: {}", e)))
}

fn subjects_from_json(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
}
