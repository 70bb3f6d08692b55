//! Interactive menus over the core services.
//!
//! # Responsibility
//! - Prompt, read and validate console input.
//! - Route logged-in users to the admin or standard menu.
//!
//! # Invariants
//! - Domain failures are reported and the loop continues.
//! - End of input ends the program cleanly; only console I/O errors abort.

use std::io::{self, BufRead, Write};
use std::path::Path;
use studentdb_core::{
    AccountService, CredentialVerifier, Role, Session, SessionResult, Student, StudentDraft,
    StudentId, StudentRepository,
};

/// Console endpoints the menus read from and write to.
pub struct Shell<R: BufRead, W: Write> {
    input: R,
    output: W,
}

enum Choice {
    Continue,
    Leave,
    EndOfInput,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the main menu until the user exits or input ends.
    pub fn run<S, V>(&mut self, accounts: &AccountService<V>, store: &mut S) -> io::Result<()>
    where
        S: StudentRepository,
        V: CredentialVerifier,
    {
        writeln!(self.output, "==== Student Record Management System ====")?;
        loop {
            let Some(choice) =
                self.read_line("\nMain Menu:\n1) Register\n2) Login\n3) Exit\nChoice: ")?
            else {
                return Ok(());
            };
            let next = match choice.as_str() {
                "1" => self.register(accounts)?,
                "2" => self.login(accounts, store)?,
                "3" => {
                    writeln!(self.output, "Goodbye.")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.output, "Invalid choice.")?;
                    Choice::Continue
                }
            };
            if matches!(next, Choice::EndOfInput) {
                return Ok(());
            }
        }
    }

    fn register<V: CredentialVerifier>(
        &mut self,
        accounts: &AccountService<V>,
    ) -> io::Result<Choice> {
        let Some(username) = self.read_line("Choose username: ")? else {
            return Ok(Choice::EndOfInput);
        };
        if username.is_empty() {
            writeln!(self.output, "Invalid.")?;
            return Ok(Choice::Continue);
        }
        let Some(secret) = self.read_line("Choose password: ")? else {
            return Ok(Choice::EndOfInput);
        };

        match accounts.register(&username, &secret) {
            Ok(true) => writeln!(self.output, "Registered. You can login now.")?,
            Ok(false) => writeln!(self.output, "User exists. Choose different name.")?,
            Err(err) => writeln!(self.output, "Registration failed: {err}")?,
        }
        Ok(Choice::Continue)
    }

    fn login<S, V>(&mut self, accounts: &AccountService<V>, store: &mut S) -> io::Result<Choice>
    where
        S: StudentRepository,
        V: CredentialVerifier,
    {
        let Some(username) = self.read_line("Username: ")? else {
            return Ok(Choice::EndOfInput);
        };
        let Some(secret) = self.read_line("Password: ")? else {
            return Ok(Choice::EndOfInput);
        };

        let role = match accounts.login(&username, &secret) {
            Ok(Some(role)) => role,
            Ok(None) => {
                writeln!(self.output, "Login failed.")?;
                return Ok(Choice::Continue);
            }
            Err(err) => {
                writeln!(self.output, "Login failed: {err}")?;
                return Ok(Choice::Continue);
            }
        };

        writeln!(self.output, "Login success. Welcome {username}")?;
        let activity = accounts.credentials().activity();
        let mut session = Session::new(store, activity, username, role);
        let exit = loop {
            let next = match role {
                Role::Admin => self.admin_action(&mut session)?,
                Role::Standard => self.standard_action(&mut session)?,
            };
            if !matches!(next, Choice::Continue) {
                break next;
            }
        };

        if let Err(err) = session.logout() {
            writeln!(self.output, "Logout not recorded: {err}")?;
        }
        Ok(exit)
    }

    fn admin_action<S: StudentRepository>(
        &mut self,
        session: &mut Session<'_, S>,
    ) -> io::Result<Choice> {
        let prompt = format!(
            "\n===== Admin Menu ({}) =====\n1) Add Student\n2) View All\n3) Search by Name\n4) Search by ID\n5) Update Student\n6) Delete Student\n7) Import CSV\n8) Logout\nChoice: ",
            session.username()
        );
        let Some(choice) = self.read_line(&prompt)? else {
            return Ok(Choice::EndOfInput);
        };

        match choice.as_str() {
            "1" => {
                let Some(draft) = self.read_draft(false)? else {
                    return Ok(Choice::EndOfInput);
                };
                let result = session.add_student(draft);
                self.report(result, |out, student| {
                    writeln!(out, "Added student with ID {}", student.id)
                })?;
            }
            "2" => self.view_all(session)?,
            "3" => return self.search_name(session),
            "4" => return self.search_id(session),
            "5" => return self.update(session),
            "6" => {
                let Some(id) = self.read_id("Enter ID to delete: ")? else {
                    return Ok(Choice::EndOfInput);
                };
                let result = session.remove_student(id);
                self.report(result, |out, removed| {
                    writeln!(out, "{}", if removed { "Deleted." } else { "Delete failed." })
                })?;
            }
            "7" => {
                let Some(path) = self.read_line("Enter CSV file path to import: ")? else {
                    return Ok(Choice::EndOfInput);
                };
                let result = session.import_records(Path::new(&path));
                self.report(result, |out, imported| {
                    let message = if imported { "Import successful." } else { "Import failed." };
                    writeln!(out, "{message}")
                })?;
            }
            "8" => return Ok(Choice::Leave),
            _ => writeln!(self.output, "Invalid choice.")?,
        }
        Ok(Choice::Continue)
    }

    fn standard_action<S: StudentRepository>(
        &mut self,
        session: &mut Session<'_, S>,
    ) -> io::Result<Choice> {
        let prompt = format!(
            "\n===== User Menu ({}) =====\n1) View All Students\n2) Search by Name\n3) Search by ID\n4) Logout\nChoice: ",
            session.username()
        );
        let Some(choice) = self.read_line(&prompt)? else {
            return Ok(Choice::EndOfInput);
        };

        match choice.as_str() {
            "1" => self.view_all(session)?,
            "2" => return self.search_name(session),
            "3" => return self.search_id(session),
            "4" => return Ok(Choice::Leave),
            _ => writeln!(self.output, "Invalid.")?,
        }
        Ok(Choice::Continue)
    }

    fn view_all<S: StudentRepository>(&mut self, session: &mut Session<'_, S>) -> io::Result<()> {
        let result = session.list_students();
        self.report(result, |out, students| {
            writeln!(out, "Total students: {}", students.len())?;
            students
                .iter()
                .try_for_each(|student| print_student(out, student))
        })
    }

    fn search_name<S: StudentRepository>(
        &mut self,
        session: &mut Session<'_, S>,
    ) -> io::Result<Choice> {
        let Some(term) = self.read_line("Enter search term: ")? else {
            return Ok(Choice::EndOfInput);
        };
        let result = session.search_by_name(&term);
        self.report(result, |out, students| {
            students
                .iter()
                .try_for_each(|student| print_student(out, student))
        })?;
        Ok(Choice::Continue)
    }

    fn search_id<S: StudentRepository>(
        &mut self,
        session: &mut Session<'_, S>,
    ) -> io::Result<Choice> {
        let Some(id) = self.read_id("Enter ID: ")? else {
            return Ok(Choice::EndOfInput);
        };
        let result = session.find_by_id(id);
        self.report(result, |out, found| match found {
            Some(student) => print_student(out, &student),
            None => writeln!(out, "Not found."),
        })?;
        Ok(Choice::Continue)
    }

    fn update<S: StudentRepository>(
        &mut self,
        session: &mut Session<'_, S>,
    ) -> io::Result<Choice> {
        let Some(id) = self.read_id("Enter ID to update: ")? else {
            return Ok(Choice::EndOfInput);
        };
        let Some(current) = session.peek(id) else {
            writeln!(self.output, "No student with that ID.")?;
            return Ok(Choice::Continue);
        };

        write!(self.output, "Current: ")?;
        print_student(&mut self.output, &current)?;
        let Some(draft) = self.read_draft(true)? else {
            return Ok(Choice::EndOfInput);
        };
        let result = session.update_student(id, draft);
        self.report(result, |out, updated| {
            writeln!(out, "{}", if updated { "Updated." } else { "Update failed." })
        })?;
        Ok(Choice::Continue)
    }

    fn read_draft(&mut self, replacing: bool) -> io::Result<Option<StudentDraft>> {
        let (name_prompt, age_prompt, branch_prompt, cgpa_prompt) = if replacing {
            ("New name: ", "New age: ", "New branch: ", "New CGPA: ")
        } else {
            ("Enter name: ", "Enter age: ", "Enter branch: ", "Enter CGPA: ")
        };

        let Some(name) = self.read_line(name_prompt)? else {
            return Ok(None);
        };
        let Some(age) = self.read_number::<i32>(age_prompt)? else {
            return Ok(None);
        };
        let Some(branch) = self.read_line(branch_prompt)? else {
            return Ok(None);
        };
        let Some(cgpa) = self.read_number::<f64>(cgpa_prompt)? else {
            return Ok(None);
        };
        Ok(Some(StudentDraft::new(name, age, branch, cgpa)))
    }

    fn read_id(&mut self, prompt: &str) -> io::Result<Option<StudentId>> {
        self.read_number::<StudentId>(prompt)
    }

    /// Re-prompts until the input parses; `None` at end of input.
    fn read_number<T: std::str::FromStr>(&mut self, prompt: &str) -> io::Result<Option<T>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            match line.trim().parse::<T>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "Enter a valid number.")?,
            }
        }
    }

    /// Prints `prompt` and reads one line without its terminator.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    fn report<T>(
        &mut self,
        result: SessionResult<T>,
        on_ok: impl FnOnce(&mut W, T) -> io::Result<()>,
    ) -> io::Result<()> {
        match result {
            Ok(value) => on_ok(&mut self.output, value),
            Err(err) => writeln!(self.output, "Operation failed: {err}"),
        }
    }
}

fn print_student(out: &mut impl Write, student: &Student) -> io::Result<()> {
    writeln!(
        out,
        "ID: {} | Name: {} | Age: {} | Branch: {} | CGPA: {}",
        student.id, student.name, student.age, student.branch, student.cgpa
    )
}
