use std::{
    fmt::Write,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::{fs, io::AsyncWriteExt};

use crate::{
    error::PuzzleError,
    game::{solution, SolutionGrid},
    models::Puzzle,
};

/// Lines copied verbatim before the generated body
pub const HEAD_LINES: usize = 11;
/// Lines copied verbatim after the generated body
pub const TAIL_LINES: usize = 3;

const BUNDLED_TEMPLATE: &str = include_str!("../../templates/index.html");

/// Page wrapper split into the part before and after the puzzle body
#[derive(Debug, Clone)]
pub struct HtmlTemplate {
    head: Vec<String>,
    tail: Vec<String>,
}

impl HtmlTemplate {
    pub fn from_text(text: &str) -> Result<Self, PuzzleError> {
        let lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();
        let required = HEAD_LINES + TAIL_LINES;
        if lines.len() < required {
            return Err(PuzzleError::TemplateTooShort {
                lines: lines.len(),
                required,
            });
        }

        Ok(Self {
            head: lines[..HEAD_LINES].to_vec(),
            tail: lines[HEAD_LINES..required].to_vec(),
        })
    }

    /// Template shipped with the crate
    pub fn bundled() -> Self {
        Self::from_text(BUNDLED_TEMPLATE).unwrap_or_else(|_| Self {
            head: Vec::new(),
            tail: Vec::new(),
        })
    }

    /// Load the configured template, falling back to the bundled one when the file is absent
    pub async fn load(path: &Path) -> Result<Self, PuzzleError> {
        match fs::read_to_string(path).await {
            Ok(text) => Self::from_text(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    "Template {} not found, using bundled template",
                    path.display()
                );
                Ok(Self::bundled())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Full page for a puzzle: grid, solution, word list and size
    pub fn render(&self, puzzle: &Puzzle, words: &[String]) -> String {
        let mut page = String::new();
        page.extend(self.head.iter().map(String::as_str));

        write_table(&mut page, &letter_rows(puzzle));
        page.push_str("<br><br>");

        page.push_str("\n<br><br><h2 align=\"center\">Solution</h2><br><br>\n");
        write_table(&mut page, &solution_rows(&solution(puzzle)));
        page.push_str("<br><br>");

        page.push_str("\n<br><br><h2 align=\"center\">Words</h2><br><br>\n");
        let items: Vec<String> = words.iter().map(|w| escape(w)).collect();
        let _ = writeln!(
            page,
            "<ul align=\"center\"><li>{}</li></ul>",
            items.join("</li><li>")
        );
        let _ = writeln!(
            page,
            "\n<br><br><h2 align=\"center\">SIZE: {size}x{size}</h2><br><br>",
            size = puzzle.size
        );

        page.extend(self.tail.iter().map(String::as_str));
        page
    }
}

fn letter_rows(puzzle: &Puzzle) -> Vec<Vec<String>> {
    puzzle
        .grid
        .iter()
        .map(|row| row.iter().map(|c| escape(&c.to_string())).collect())
        .collect()
}

fn solution_rows(view: &SolutionGrid) -> Vec<Vec<String>> {
    view.iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Some(c) => escape(&c.to_string()),
                    None => "&nbsp;".to_string(),
                })
                .collect()
        })
        .collect()
}

fn write_table(page: &mut String, rows: &[Vec<String>]) {
    page.push_str("<table align=\"center\">\n");
    for row in rows {
        page.push_str("\t<tr>\n\t\t");
        for cell in row {
            let _ = write!(page, "<td padding=2em>{}</td>", cell);
        }
        page.push_str("\t</tr>\n");
    }
    page.push_str("</table>\n");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Write a page into `dir` under the first free `WordSearch{n}.html` name
pub async fn export_to_dir(dir: &Path, page: &str) -> Result<PathBuf, PuzzleError> {
    fs::create_dir_all(dir).await?;

    let mut number = 0u32;
    let mut path = dir.join("WordSearch.html");
    // create_new claims the name atomically
    let mut file = loop {
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => break file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                number += 1;
                path = dir.join(format!("WordSearch{}.html", number));
            }
            Err(e) => return Err(e.into()),
        }
    };

    file.write_all(page.as_bytes()).await?;
    file.flush().await?;
    tracing::info!("Exported puzzle to {}", path.display());

    Ok(path)
}
