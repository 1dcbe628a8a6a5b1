//! Terminal operator: renders the tree and reads answers line by line

use super::messages::Messages;
use super::tree::TreeLayout;
use crate::config::{validate_root, TimeMode};
use crate::protocol::{Choice, DecisionRequest, Event, Operator};
use crate::types::RekonError;
use console::style;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// [`Operator`] on a pair of text streams, normally locked stdin and stdout
pub struct ConsoleOperator<R, W> {
    input: R,
    output: W,
    messages: Messages,
    layout: TreeLayout,
    dry_run: bool,
    styled: bool,
    time_mode: TimeMode,
    last_request: Option<DecisionRequest>,
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W, messages: Messages, dry_run: bool) -> Self {
        Self {
            input,
            output,
            messages,
            layout: TreeLayout::default(),
            dry_run,
            styled: false,
            time_mode: TimeMode::default(),
            last_request: None,
        }
    }

    /// Emit ANSI styling (off by default)
    pub fn styled(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    /// Timestamp named in time divergence lines
    pub fn time_mode(mut self, time_mode: TimeMode) -> Self {
        self.time_mode = time_mode;
        self
    }

    pub fn messages(&self) -> Messages {
        self.messages
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<String, RekonError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(RekonError::InputClosed);
        }
        Ok(line)
    }

    /// Ask for a root folder until an existing directory is given
    pub fn prompt_root(&mut self, question: &str) -> Result<PathBuf, RekonError> {
        loop {
            write!(self.output, "{}", question)?;
            let answer = self.read_line()?;
            let path = PathBuf::from(answer.trim());
            match validate_root(&path) {
                Ok(()) => return Ok(path),
                Err(_) if path.exists() => {
                    writeln!(self.output, "{}", self.messages.not_a_folder(&path))?
                }
                Err(_) => writeln!(self.output, "{}", self.messages.folder_not_found(&path))?,
            }
        }
    }

    pub fn banner(&mut self) -> Result<(), RekonError> {
        let banner = style(self.messages.dry_run_banner())
            .yellow()
            .bold()
            .force_styling(self.styled);
        writeln!(self.output, "{}", banner)?;
        Ok(())
    }

    /// Print `line` unindented
    pub fn say(&mut self, line: &str) -> Result<(), RekonError> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Print `message` and wait for Enter; a closed input also releases
    pub fn pause(&mut self, message: &str) -> Result<(), RekonError> {
        write!(self.output, "{}", message)?;
        match self.read_line() {
            Ok(_) | Err(RekonError::InputClosed) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn tagged(&self, text: String) -> String {
        if self.dry_run {
            format!("{} {}", self.messages.dry_run_tag(), text)
        } else {
            text
        }
    }

    fn body(&self, depth: usize, request: &DecisionRequest) -> Vec<String> {
        let layout = &self.layout;
        let messages = &self.messages;
        match request {
            DecisionRequest::SourceExtras { names } | DecisionRequest::DestinationExtras { names } => {
                let header = if matches!(request, DecisionRequest::SourceExtras { .. }) {
                    messages.source_extras()
                } else {
                    messages.destination_extras()
                };
                let mut lines = vec![
                    layout.connector(depth),
                    layout.regular(
                        depth,
                        &style(header).yellow().force_styling(self.styled).to_string(),
                    ),
                ];
                lines.extend(
                    names
                        .iter()
                        .map(|name| layout.regular(depth, &format!("  {}", name))),
                );
                if matches!(request, DecisionRequest::DestinationExtras { .. }) {
                    lines.push(layout.regular(depth, messages.please_acknowledge()));
                }
                lines
            }
            DecisionRequest::KindMismatch {
                source,
                destination,
                ..
            } => vec![layout.regular(
                depth,
                &style(messages.kind_mismatch(*source, *destination))
                    .red()
                    .force_styling(self.styled)
                    .to_string(),
            )],
            DecisionRequest::RepositoryDivergence { name } => vec![layout.regular(
                depth,
                &style(messages.repository_divergent(name))
                    .red()
                    .force_styling(self.styled)
                    .to_string(),
            )],
            DecisionRequest::ContentDivergence {
                entry_kind,
                size,
                time,
                ..
            } => {
                let mut lines = Vec::new();
                if let Some((src, dst)) = size {
                    lines.push(layout.regular(depth, &messages.size_differs(*entry_kind, *src, *dst)));
                }
                if let Some((src, dst)) = time {
                    let line = messages.time_differs(*entry_kind, self.time_mode, *src, *dst);
                    lines.push(layout.regular(depth, &line));
                }
                lines
            }
            DecisionRequest::CopyItem { .. } => Vec::new(),
        }
    }

    fn prompt(&self, depth: usize, request: &DecisionRequest, options: &[Choice]) -> String {
        let messages = self.messages;
        let listed = self.layout.options(options, |choice| messages.choice(choice));
        let question = match request {
            DecisionRequest::SourceExtras { .. } => Some(messages.copy_all_question().to_string()),
            DecisionRequest::CopyItem { name } => Some(name.clone()),
            DecisionRequest::ContentDivergence { .. } => {
                Some(messages.replace_question().to_string())
            }
            _ => None,
        };
        match question {
            Some(question) => self.layout.regular(depth, &format!("{} {}", question, listed)),
            None => format!("{}{}", self.layout.prompt_indent(depth), listed),
        }
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn show(&mut self, depth: usize, event: &Event) -> Result<(), RekonError> {
        self.last_request = None;
        let line = match event {
            Event::Enter { .. } if depth <= 1 => {
                style(self.messages.root()).bold().force_styling(self.styled).to_string()
            }
            Event::Enter { name } => {
                writeln!(self.output, "{}", self.layout.connector(depth))?;
                let name = style(name).bold().force_styling(self.styled).to_string();
                self.layout.branch(depth, &name)
            }
            Event::Copied { name } => {
                let text = self.tagged(self.messages.copied(name));
                let text = style(text).green().force_styling(self.styled).to_string();
                self.layout.regular(depth, &text)
            }
            Event::Replaced { name } => {
                let text = self.tagged(self.messages.replaced(name));
                let text = style(text).green().force_styling(self.styled).to_string();
                self.layout.regular(depth, &text)
            }
            Event::RepositoryInSync { name } => {
                let text = self.messages.repository_in_sync(name);
                let text = style(text).dim().force_styling(self.styled).to_string();
                self.layout.regular(depth, &text)
            }
            Event::AllProcessed => self.layout.regular(depth, self.messages.all_processed()),
        };
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    fn ask(
        &mut self,
        depth: usize,
        request: &DecisionRequest,
        options: &[Choice],
    ) -> Result<String, RekonError> {
        // A re-ask after invalid input repeats only the prompt
        if self.last_request.as_ref() != Some(request) {
            for line in self.body(depth, request) {
                writeln!(self.output, "{}", line)?;
            }
            self.last_request = Some(request.clone());
        }
        let prompt = self.prompt(depth, request, options);
        write!(self.output, "{}", prompt)?;
        let answer = self.read_line()?;
        if Choice::parse(answer.trim_end_matches(['\r', '\n']), options) == Some(Choice::Quit) {
            writeln!(self.output, "{}", self.messages.quitting())?;
        }
        Ok(answer)
    }
}
