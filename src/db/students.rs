use std::path::PathBuf;

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{ensure_schema, open, StoreError};
use crate::models::{Student, StudentFields};

const STUDENT_COLUMNS: &str = "idstudent, name, email, sex, branch, programming";

/// Handle to the SQLite file holding the `student` table. The store keeps only
/// the path: every operation opens its own connection, runs one statement and
/// drops it again.
#[derive(Debug, Clone)]
pub struct StudentStore {
    db_path: PathBuf,
}

impl StudentStore {
    /// Point the store at `db_path`, creating the file and the table if they
    /// do not exist yet.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let db_path = db_path.into();
        ensure_schema(&db_path)?;
        debug!("student store ready at {}", db_path.display());
        Ok(Self { db_path })
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        open(&self.db_path)
    }

    /// Insert a new student and return the id SQLite assigned to it.
    pub fn create(&self, fields: &StudentFields) -> Result<i64, StoreError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO student (name, email, sex, branch, programming)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                fields.name,
                fields.email,
                fields.sex,
                fields.branch,
                fields.programming
            ],
        )
        .map_err(|err| StoreError::from_write(err, fields.email.as_deref()))?;

        let id = conn.last_insert_rowid();
        debug!("inserted student {id}");
        Ok(id)
    }

    /// Replace every mutable column of the student `id`. Updating an id that
    /// does not exist touches zero rows and is not reported.
    pub fn update(&self, id: i64, fields: &StudentFields) -> Result<(), StoreError> {
        let conn = self.connect()?;
        let updated = conn
            .execute(
                "UPDATE student
                 SET name = ?1, email = ?2, sex = ?3, branch = ?4, programming = ?5
                 WHERE idstudent = ?6",
                params![
                    fields.name,
                    fields.email,
                    fields.sex,
                    fields.branch,
                    fields.programming,
                    id
                ],
            )
            .map_err(|err| StoreError::from_write(err, fields.email.as_deref()))?;

        debug!("updated student {id} ({updated} row(s))");
        Ok(())
    }

    /// Remove the student `id`. Deleting a missing id is a no-op.
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.connect()?;
        let deleted = conn.execute("DELETE FROM student WHERE idstudent = ?1", params![id])?;
        debug!("deleted student {id} ({deleted} row(s))");
        Ok(())
    }

    /// Every student in storage order. There is no ORDER BY: the listing shows
    /// rows the way SQLite returns them, which is insertion order in practice.
    pub fn list_all(&self) -> Result<Vec<Student>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("SELECT {STUDENT_COLUMNS} FROM student"))?;

        let students = stmt
            .query_map([], student_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(students)
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<Student>, StoreError> {
        let conn = self.connect()?;
        let student = conn
            .query_row(
                &format!("SELECT {STUDENT_COLUMNS} FROM student WHERE idstudent = ?1"),
                params![id],
                student_from_row,
            )
            .optional()?;

        Ok(student)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<Student>, StoreError> {
        let conn = self.connect()?;
        let student = conn
            .query_row(
                &format!("SELECT {STUDENT_COLUMNS} FROM student WHERE email = ?1"),
                params![email],
                student_from_row,
            )
            .optional()?;

        Ok(student)
    }
}

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        sex: row.get(3)?,
        branch: row.get(4)?,
        programming: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, StudentStore) {
        let dir = TempDir::new().expect("create temp dir");
        let store = StudentStore::open(dir.path().join("students.sqlite")).expect("open store");
        (dir, store)
    }

    fn fields(name: &str, email: Option<&str>) -> StudentFields {
        StudentFields {
            name: Some(name.to_string()),
            email: email.map(str::to_string),
            sex: Some("female".to_string()),
            branch: Some("CSE".to_string()),
            programming: Some("python".to_string()),
        }
    }

    #[test]
    fn open_creates_missing_directories() {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("nested").join("data").join("students.sqlite");
        let store = StudentStore::open(&path).expect("open store");

        assert!(path.exists());
        assert!(store.list_all().expect("list").is_empty());
    }

    #[test]
    fn create_assigns_fresh_ids_and_persists_columns() {
        let (_dir, store) = temp_store();
        let first = store.create(&fields("Ada", Some("a@x.com"))).expect("create");
        let second = store.create(&fields("Grace", Some("g@x.com"))).expect("create");
        assert_ne!(first, second);

        let ada = store.find_by_id(first).expect("find").expect("present");
        assert_eq!(ada.name.as_deref(), Some("Ada"));
        assert_eq!(ada.email.as_deref(), Some("a@x.com"));
        assert_eq!(ada.branch.as_deref(), Some("CSE"));
    }

    #[test]
    fn create_rejects_duplicate_email() {
        let (_dir, store) = temp_store();
        store.create(&fields("Ada", Some("a@x.com"))).expect("create");

        let err = store
            .create(&fields("Imposter", Some("a@x.com")))
            .expect_err("duplicate must fail");
        assert!(err.is_uniqueness_violation());
        assert_eq!(store.list_all().expect("list").len(), 1);
    }

    #[test]
    fn absent_emails_do_not_collide() {
        let (_dir, store) = temp_store();
        store.create(&fields("Ada", None)).expect("create");
        store.create(&fields("Grace", None)).expect("create");

        assert_eq!(store.list_all().expect("list").len(), 2);
    }

    #[test]
    fn create_without_name_is_a_storage_error() {
        let (_dir, store) = temp_store();
        let mut nameless = fields("ignored", Some("n@x.com"));
        nameless.name = None;

        let err = store.create(&nameless).expect_err("NOT NULL must fire");
        assert!(matches!(err, StoreError::Storage(_)));
        assert!(store.find_by_email("n@x.com").expect("find").is_none());
    }

    #[test]
    fn update_replaces_all_fields() {
        let (_dir, store) = temp_store();
        let id = store.create(&fields("Ada", Some("a@x.com"))).expect("create");

        let replacement = StudentFields {
            name: Some("Ada Lovelace".into()),
            email: None,
            sex: None,
            branch: Some("MECH".into()),
            programming: Some("c".into()),
        };
        store.update(id, &replacement).expect("update");

        let updated = store.find_by_id(id).expect("find").expect("present");
        assert_eq!(updated.id, id);
        assert_eq!(updated.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(updated.email, None);
        assert_eq!(updated.sex, None);
        assert_eq!(updated.branch.as_deref(), Some("MECH"));
    }

    #[test]
    fn update_of_missing_id_is_silent() {
        let (_dir, store) = temp_store();
        store.update(404, &fields("Nobody", Some("n@x.com"))).expect("no-op");
        assert!(store.list_all().expect("list").is_empty());
    }

    #[test]
    fn update_rejects_email_owned_by_another_record() {
        let (_dir, store) = temp_store();
        store.create(&fields("Ada", Some("a@x.com"))).expect("create");
        let grace = store.create(&fields("Grace", Some("g@x.com"))).expect("create");

        let err = store
            .update(grace, &fields("Grace", Some("a@x.com")))
            .expect_err("collision must fail");
        assert!(err.is_uniqueness_violation());

        let unchanged = store.find_by_id(grace).expect("find").expect("present");
        assert_eq!(unchanged.email.as_deref(), Some("g@x.com"));
    }

    #[test]
    fn update_may_keep_its_own_email() {
        let (_dir, store) = temp_store();
        let id = store.create(&fields("Ada", Some("a@x.com"))).expect("create");
        store.update(id, &fields("Ada L.", Some("a@x.com"))).expect("update");

        let found = store.find_by_email("a@x.com").expect("find").expect("present");
        assert_eq!(found.id, id);
        assert_eq!(found.name.as_deref(), Some("Ada L."));
    }

    #[test]
    fn delete_is_idempotent_and_ids_are_not_reused() {
        let (_dir, store) = temp_store();
        let first = store.create(&fields("Ada", Some("a@x.com"))).expect("create");
        let second = store.create(&fields("Grace", Some("g@x.com"))).expect("create");

        store.delete(second).expect("delete");
        store.delete(second).expect("second delete is a no-op");
        assert!(store.find_by_id(second).expect("find").is_none());

        let third = store.create(&fields("Hedy", Some("h@x.com"))).expect("create");
        assert!(third > second);

        let ids: Vec<i64> = store
            .list_all()
            .expect("list")
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![first, third]);
    }

    #[test]
    fn find_by_email_misses_unknown_address() {
        let (_dir, store) = temp_store();
        store.create(&fields("Ada", Some("a@x.com"))).expect("create");
        assert!(store.find_by_email("b@x.com").expect("find").is_none());
    }
}
