use std::collections::VecDeque;

use crate::models::{FormField, StudentRow};
use crate::service::DisplaySurface;

use super::forms::StudentForm;

/// Listing of every student plus the highlighted row, if any.
#[derive(Debug, Default)]
pub(crate) struct StudentTable {
    pub(crate) rows: Vec<StudentRow>,
    pub(crate) selected: Option<usize>,
}

impl StudentTable {
    /// Replace the rows. The previous selection pointed into the old listing,
    /// so it is dropped.
    pub(crate) fn set_rows(&mut self, rows: Vec<StudentRow>) {
        self.rows = rows;
        self.selected = None;
    }

    pub(crate) fn selected_id(&self) -> Option<i64> {
        self.selected
            .and_then(|idx| self.rows.get(idx))
            .map(|row| row.id)
    }

    /// Move the highlight by `offset`, clamping to the listing. With nothing
    /// selected, moving down starts at the top and moving up at the bottom.
    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            self.selected = None;
            return;
        }

        let last = self.rows.len() as isize - 1;
        let next = match self.selected {
            Some(idx) => (idx as isize + offset).clamp(0, last),
            None if offset >= 0 => 0,
            None => last,
        };
        self.selected = Some(next as usize);
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = if self.rows.is_empty() { None } else { Some(0) };
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.rows.len().checked_sub(1);
    }
}

/// Severity of a modal notice.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum NoticeKind {
    Info,
    Warning,
}

/// Modal message waiting to be dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) kind: NoticeKind,
}

/// Everything the registers screen shows: the form on the left, the listing
/// on the right and any notices stacked on top.
#[derive(Debug, Default)]
pub(crate) struct RegistersScreen {
    pub(crate) form: StudentForm,
    pub(crate) table: StudentTable,
    pub(crate) notices: VecDeque<Notice>,
}

impl RegistersScreen {
    pub(crate) fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub(crate) fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    fn push_notice(&mut self, title: &str, message: &str, kind: NoticeKind) {
        self.notices.push_back(Notice {
            title: title.to_string(),
            message: message.to_string(),
            kind,
        });
    }
}

impl DisplaySurface for RegistersScreen {
    fn clear_fields(&mut self) {
        self.form.clear_text();
    }

    fn clear_feedback(&mut self) {
        self.form.clear_feedback();
    }

    fn set_feedback(&mut self, field: FormField, message: &str) {
        self.form.set_feedback(field, message);
    }

    fn refresh_listing(&mut self, rows: Vec<StudentRow>) {
        self.table.set_rows(rows);
    }

    fn show_info(&mut self, title: &str, message: &str) {
        self.push_notice(title, message, NoticeKind::Info);
    }

    fn show_warning(&mut self, title: &str, message: &str) {
        self.push_notice(title, message, NoticeKind::Warning);
    }
}
