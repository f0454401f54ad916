use std::io::{BufRead, Write};

use tracing::debug;

use xmldb_text::XmlSearcher;

pub const PROMPT: &str = "Enter query: ";

/// Prompts for queries until a blank line or end of input.
///
/// Every error, including a query that fails to parse, ends the loop and
/// is returned to the caller.
pub fn run_shell<R: BufRead, W: Write>(searcher: &XmlSearcher, mut input: R, mut output: W) -> anyhow::Result<()> {
    loop {
        writeln!(output)?;
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            debug!("end of input");
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            break;
        }

        let results = searcher.run_query(query)?;
        write!(output, "{}", results)?;
    }
    output.flush()?;
    Ok(())
}
