use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{FormField, StudentInput, StudentRow, BRANCHES, LANGUAGES, SEXES};

/// A widget that holds free text and can show a feedback message below it.
pub(crate) trait TextField {
    /// Current contents with surrounding whitespace removed.
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
    fn set_feedback(&mut self, feedback: &str);
}

/// A widget that holds one value out of a fixed list of options.
pub(crate) trait ChoiceField {
    fn options(&self) -> &'static [&'static str];
    /// The selected option, or an empty string when nothing is selected.
    fn selection(&self) -> &str;
    /// Select `value`; values outside the option list clear the selection.
    fn set_selection(&mut self, value: &str);
    /// Move the selection by `offset`, wrapping around the option list.
    fn cycle(&mut self, offset: isize);
}

/// Single-line text entry with a feedback line.
#[derive(Debug, Default, Clone)]
pub(crate) struct TextInput {
    value: String,
    feedback: String,
}

impl TextInput {
    /// Append a character, ignoring control characters.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            false
        } else {
            self.value.push(ch);
            true
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.value.pop();
    }

    pub(crate) fn raw(&self) -> &str {
        &self.value
    }

    pub(crate) fn feedback(&self) -> &str {
        &self.feedback
    }

    pub(crate) fn value_len(&self) -> usize {
        self.value.chars().count()
    }
}

impl TextField for TextInput {
    fn text(&self) -> String {
        self.value.trim().to_string()
    }

    fn set_text(&mut self, text: &str) {
        self.value = text.to_string();
    }

    fn set_feedback(&mut self, feedback: &str) {
        self.feedback = feedback.to_string();
    }
}

/// Shared state of the choice widgets: the option list and the selected
/// index, if any.
#[derive(Debug, Clone)]
struct Choices {
    options: &'static [&'static str],
    selected: Option<usize>,
}

impl Choices {
    /// Start out on the first option.
    fn new(options: &'static [&'static str]) -> Self {
        Self {
            options,
            selected: if options.is_empty() { None } else { Some(0) },
        }
    }

    fn selection(&self) -> &str {
        self.selected
            .and_then(|idx| self.options.get(idx).copied())
            .unwrap_or("")
    }

    fn set_selection(&mut self, value: &str) {
        self.selected = self.options.iter().position(|option| *option == value);
    }

    fn cycle(&mut self, offset: isize) {
        let len = self.options.len() as isize;
        if len == 0 {
            return;
        }
        let current = match self.selected {
            Some(idx) => idx as isize,
            None if offset >= 0 => -1,
            None => 0,
        };
        self.selected = Some((current + offset).rem_euclid(len) as usize);
    }
}

/// Radio group: every option is visible, one is marked.
#[derive(Debug, Clone)]
pub(crate) struct RadioInput {
    choices: Choices,
}

impl RadioInput {
    pub(crate) fn new(options: &'static [&'static str]) -> Self {
        Self {
            choices: Choices::new(options),
        }
    }

    fn spans(&self, active: bool) -> Vec<Span<'static>> {
        let mut spans = Vec::with_capacity(self.options().len());
        for (idx, option) in self.options().iter().enumerate() {
            let checked = self.choices.selected == Some(idx);
            let marker = if checked { "(•)" } else { "( )" };
            let style = if checked && active {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if checked {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!("{marker} {option}  "), style));
        }
        spans
    }
}

impl ChoiceField for RadioInput {
    fn options(&self) -> &'static [&'static str] {
        self.choices.options
    }

    fn selection(&self) -> &str {
        self.choices.selection()
    }

    fn set_selection(&mut self, value: &str) {
        self.choices.set_selection(value);
    }

    fn cycle(&mut self, offset: isize) {
        self.choices.cycle(offset);
    }
}

/// Combo box: only the selected option is shown, arrows flip through the
/// rest.
#[derive(Debug, Clone)]
pub(crate) struct ComboInput {
    choices: Choices,
}

impl ComboInput {
    pub(crate) fn new(options: &'static [&'static str]) -> Self {
        Self {
            choices: Choices::new(options),
        }
    }

    fn spans(&self, active: bool) -> Vec<Span<'static>> {
        let current = self.choices.selection();
        let display = if current.is_empty() {
            "<none>".to_string()
        } else {
            current.to_string()
        };
        let style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        vec![
            Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
            Span::styled(display, style),
            Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
        ]
    }
}

impl ChoiceField for ComboInput {
    fn options(&self) -> &'static [&'static str] {
        self.choices.options
    }

    fn selection(&self) -> &str {
        self.choices.selection()
    }

    fn set_selection(&mut self, value: &str) {
        self.choices.set_selection(value);
    }

    fn cycle(&mut self, offset: isize) {
        self.choices.cycle(offset);
    }
}

/// Focus targets on the registers screen, in tab order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum Focus {
    #[default]
    Name,
    Email,
    Sex,
    Programming,
    Branch,
    Table,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Name,
        Focus::Email,
        Focus::Sex,
        Focus::Programming,
        Focus::Branch,
        Focus::Table,
    ];

    pub(crate) fn next(self) -> Self {
        self.step(1)
    }

    pub(crate) fn previous(self) -> Self {
        self.step(-1)
    }

    fn step(self, offset: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let idx = Self::ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or(0) as isize;
        Self::ORDER[(idx + offset).rem_euclid(len) as usize]
    }
}

/// The student form: two text inputs, two radio groups and a combo box.
#[derive(Debug, Clone)]
pub(crate) struct StudentForm {
    pub(crate) name: TextInput,
    pub(crate) email: TextInput,
    pub(crate) sex: RadioInput,
    pub(crate) programming: RadioInput,
    pub(crate) branch: ComboInput,
}

impl Default for StudentForm {
    fn default() -> Self {
        Self {
            name: TextInput::default(),
            email: TextInput::default(),
            sex: RadioInput::new(SEXES),
            programming: RadioInput::new(LANGUAGES),
            branch: ComboInput::new(BRANCHES),
        }
    }
}

impl StudentForm {
    /// Snapshot the raw values the registration service expects.
    pub(crate) fn read_input(&self) -> StudentInput {
        StudentInput {
            name: self.name.text(),
            email: self.email.text(),
            sex: self.sex.selection().to_string(),
            branch: self.branch.selection().to_string(),
            programming: self.programming.selection().to_string(),
        }
    }

    /// Copy a listing row into the widgets when a row is selected.
    pub(crate) fn fill(&mut self, row: &StudentRow) {
        self.name.set_text(&row.name);
        self.email.set_text(&row.email);
        self.sex.set_selection(&row.sex);
        self.branch.set_selection(&row.branch);
        self.programming.set_selection(&row.programming);
    }

    /// Empty the text inputs. Choice widgets keep their current value.
    pub(crate) fn clear_text(&mut self) {
        self.name.set_text("");
        self.email.set_text("");
    }

    pub(crate) fn clear_feedback(&mut self) {
        self.name.set_feedback("");
        self.email.set_feedback("");
    }

    pub(crate) fn set_feedback(&mut self, field: FormField, message: &str) {
        match field {
            FormField::Name => self.name.set_feedback(message),
            FormField::Email => self.email.set_feedback(message),
        }
    }

    /// The text input that has focus, if any.
    pub(crate) fn text_input_mut(&mut self, focus: Focus) -> Option<&mut TextInput> {
        match focus {
            Focus::Name => Some(&mut self.name),
            Focus::Email => Some(&mut self.email),
            _ => None,
        }
    }

    /// The choice widget that has focus, if any.
    pub(crate) fn choice_mut(&mut self, focus: Focus) -> Option<&mut dyn ChoiceField> {
        match focus {
            Focus::Sex => Some(&mut self.sex as &mut dyn ChoiceField),
            Focus::Programming => Some(&mut self.programming as &mut dyn ChoiceField),
            Focus::Branch => Some(&mut self.branch as &mut dyn ChoiceField),
            _ => None,
        }
    }

    /// Render the form as lines: each text input takes two lines (value and
    /// feedback), each choice widget one line with a blank spacer.
    pub(crate) fn build_lines(&self, focus: Focus) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(10);
        lines.extend(text_lines("Full name", &self.name, focus == Focus::Name));
        lines.extend(text_lines("Email", &self.email, focus == Focus::Email));

        let mut sex = vec![label_span("Sex", focus == Focus::Sex)];
        sex.extend(self.sex.spans(focus == Focus::Sex));
        lines.push(Line::from(sex));
        lines.push(Line::from(""));

        let mut programming = vec![label_span("Programming", focus == Focus::Programming)];
        programming.extend(self.programming.spans(focus == Focus::Programming));
        lines.push(Line::from(programming));
        lines.push(Line::from(""));

        let mut branch = vec![label_span("Branch", focus == Focus::Branch)];
        branch.extend(self.branch.spans(focus == Focus::Branch));
        lines.push(Line::from(branch));

        lines
    }
}

fn label_span(label: &str, active: bool) -> Span<'static> {
    let style = if active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Span::styled(format!("{label}: "), style)
}

fn text_lines(label: &str, input: &TextInput, active: bool) -> [Line<'static>; 2] {
    let value_style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    [
        Line::from(vec![
            label_span(label, active),
            Span::styled(input.raw().to_string(), value_style),
        ]),
        Line::from(Span::styled(
            input.feedback().to_string(),
            Style::default().fg(Color::Red),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_input_trims_and_skips_control_characters() {
        let mut input = TextInput::default();
        for ch in "  Ada ".chars() {
            input.push_char(ch);
        }
        assert!(!input.push_char('\u{7}'));
        assert_eq!(input.text(), "Ada");
        input.backspace();
        assert_eq!(input.raw(), "  Ada");
    }

    #[test]
    fn choices_default_to_first_option_and_wrap() {
        let mut branch = ComboInput::new(BRANCHES);
        assert_eq!(branch.selection(), "CSE");
        branch.cycle(-1);
        assert_eq!(branch.selection(), "CIVIL");
        branch.cycle(1);
        assert_eq!(branch.selection(), "CSE");
    }

    #[test]
    fn unknown_selection_reads_as_empty() {
        let mut sex = RadioInput::new(SEXES);
        sex.set_selection("");
        assert_eq!(sex.selection(), "");
        sex.cycle(1);
        assert_eq!(sex.selection(), "male");
    }

    #[test]
    fn fill_then_read_round_trips_a_row() {
        let row = StudentRow {
            id: 3,
            name: "Ada".into(),
            email: "a@x.com".into(),
            sex: "female".into(),
            branch: "ENTC".into(),
            programming: "c".into(),
        };
        let mut form = StudentForm::default();
        form.fill(&row);

        let input = form.read_input();
        assert_eq!(input.name, "Ada");
        assert_eq!(input.email, "a@x.com");
        assert_eq!(input.sex, "female");
        assert_eq!(input.branch, "ENTC");
        assert_eq!(input.programming, "c");
    }

    #[test]
    fn clear_text_keeps_choices() {
        let mut form = StudentForm::default();
        form.name.set_text("Ada");
        form.programming.set_selection("java");
        form.clear_text();

        let input = form.read_input();
        assert_eq!(input.name, "");
        assert_eq!(input.programming, "java");
    }

    #[test]
    fn focus_cycles_in_both_directions() {
        assert_eq!(Focus::Table.next(), Focus::Name);
        assert_eq!(Focus::Name.previous(), Focus::Table);
        assert_eq!(Focus::Email.next(), Focus::Sex);
    }
}
